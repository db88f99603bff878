use crate::classifiers::classifier::check_training_set;
use crate::classifiers::{Classifier, FitError};
use crate::core::matrix::{Matrix, RowView};
use crate::utils::math::{normalize_in_place, squared_euclidean};
use serde::{Deserialize, Serialize};
use schemars::JsonSchema;

/// How the k nearest neighbours are weighted when voting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NeighborWeights {
    #[default]
    Uniform,
    Distance,
}

/// Brute-force k-nearest-neighbours over Euclidean distance.
///
/// Equidistant neighbours are taken in training order.
#[derive(Debug, Clone)]
pub struct KNeighbors {
    n_neighbors: usize,
    weights: NeighborWeights,
    train: Matrix,
    classes: Vec<usize>,
    n_classes: usize,
}

impl KNeighbors {
    pub fn new(n_neighbors: usize, weights: NeighborWeights) -> Result<Self, FitError> {
        if n_neighbors == 0 {
            return Err(FitError::InvalidParameter("n_neighbors must be > 0".into()));
        }
        Ok(Self {
            n_neighbors,
            weights,
            train: <Matrix as Default>::default(),
            classes: Vec::new(),
            n_classes: 0,
        })
    }
}

impl Classifier for KNeighbors {
    fn fit(&mut self, features: &Matrix, classes: &[usize], n_classes: usize) -> Result<(), FitError> {
        check_training_set(features, classes, n_classes)?;
        if self.n_neighbors > features.nrows() {
            return Err(FitError::InvalidParameter(format!(
                "n_neighbors = {} exceeds the {} training rows",
                self.n_neighbors,
                features.nrows()
            )));
        }
        self.train = features.clone();
        self.classes = classes.to_vec();
        self.n_classes = n_classes;
        Ok(())
    }

    fn get_votes_for_instance(&self, instance: RowView<'_>) -> Option<Vec<f64>> {
        if self.classes.is_empty() || instance.len() != self.train.ncols() {
            return None;
        }
        let mut dist: Vec<(f64, usize)> = self
            .train
            .outer_iter()
            .enumerate()
            .map(|(i, row)| (squared_euclidean(row, instance), i))
            .collect();
        dist.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let nearest = &dist[..self.n_neighbors];

        let mut votes = vec![0.0; self.n_classes];
        match self.weights {
            NeighborWeights::Uniform => {
                for &(_, i) in nearest {
                    votes[self.classes[i]] += 1.0;
                }
            }
            NeighborWeights::Distance => {
                // exact matches take all the weight
                if nearest.iter().any(|&(d, _)| d == 0.0) {
                    for &(d, i) in nearest.iter().filter(|&&(d, _)| d == 0.0) {
                        votes[self.classes[i]] += 1.0 + d;
                    }
                } else {
                    for &(d, i) in nearest {
                        votes[self.classes[i]] += 1.0 / d.sqrt();
                    }
                }
            }
        }
        normalize_in_place(&mut votes);
        Some(votes)
    }
}
