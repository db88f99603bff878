use std::cmp::Ordering;

/// Best binary split found for one node: `feature <= threshold` goes left.
#[derive(Debug, Clone)]
pub struct SplitSuggestion {
    feature: usize,
    threshold: f64,
    resulting_class_distribution: [Vec<f64>; 2],
    merit: f64,
}

impl SplitSuggestion {
    pub fn new(feature: usize, threshold: f64, left: Vec<f64>, right: Vec<f64>, merit: f64) -> Self {
        Self {
            feature,
            threshold,
            resulting_class_distribution: [left, right],
            merit,
        }
    }

    pub fn feature(&self) -> usize {
        self.feature
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn merit(&self) -> f64 {
        self.merit
    }

    pub fn resulting_class_distribution(&self) -> &[Vec<f64>; 2] {
        &self.resulting_class_distribution
    }
}

impl PartialEq for SplitSuggestion {
    fn eq(&self, other: &Self) -> bool {
        self.merit == other.merit
    }
}

impl Eq for SplitSuggestion {}

impl PartialOrd for SplitSuggestion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SplitSuggestion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.merit.total_cmp(&other.merit)
    }
}
