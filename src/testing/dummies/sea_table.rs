use crate::core::dataset::{Dataset, Value};
use crate::core::metadata::{ColumnMetadata, ColumnType, DatasetMetadata};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const LABEL_COLUMN: &str = "class";

/// Seeded SEA-concept table: two numeric attributes in `[0, 10)`, a
/// three-valued `group` attribute and a binary `class` that is `groupA`
/// when `attrib1 + attrib2 <= threshold`.
#[derive(Debug, Clone)]
pub struct SeaTable {
    pub rows: usize,
    pub threshold: f64,
    pub noise_percentage: u32,
    pub seed: u64,
}

impl SeaTable {
    pub fn new(rows: usize, seed: u64) -> Self {
        Self {
            rows,
            threshold: 9.0,
            noise_percentage: 0,
            seed,
        }
    }

    pub fn with_noise(mut self, percentage: u32) -> Self {
        self.noise_percentage = percentage.min(100);
        self
    }

    pub fn input_columns() -> Vec<String> {
        vec!["attrib1".into(), "attrib2".into(), "group".into()]
    }

    pub fn metadata() -> DatasetMetadata {
        let col = |name: &str, column_type| ColumnMetadata {
            name: name.into(),
            column_type,
        };
        DatasetMetadata::new(vec![
            col("attrib1", ColumnType::ContinuousNumerical),
            col("attrib2", ColumnType::ContinuousNumerical),
            col("group", ColumnType::Categorical),
            col(LABEL_COLUMN, ColumnType::Categorical),
        ])
    }

    pub fn generate(&self) -> Dataset {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let rows = (0..self.rows)
            .map(|_| {
                let a1: f64 = rng.random_range(0.0..10.0);
                let a2: f64 = rng.random_range(0.0..10.0);
                let group = ["g0", "g1", "g2"][rng.random_range(0..3)];
                let mut positive = a1 + a2 > self.threshold;
                let roll: u32 = rng.random_range(1..=100);
                if roll <= self.noise_percentage {
                    positive = !positive;
                }
                let label = if positive { "groupB" } else { "groupA" };
                vec![Value::Number(a1), Value::Number(a2), Value::from(group), Value::from(label)]
            })
            .collect();
        Dataset::from_rows(&["attrib1", "attrib2", "group", LABEL_COLUMN], rows)
            .unwrap_or_else(|e| panic!("sea table has a fixed schema: {e}"))
    }
}

/// Replaces every label with a uniformly drawn one from `labels`.
pub fn randomize_labels(data: &mut Dataset, column: &str, labels: &[&str], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    if let Some(col) = data.column_mut(column) {
        for v in col.values.iter_mut() {
            *v = Value::from(labels[rng.random_range(0..labels.len())]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_table() {
        let a = SeaTable::new(50, 7).generate();
        let b = SeaTable::new(50, 7).generate();
        assert_eq!(a, b);
        assert_eq!(a.n_rows(), 50);
        assert_eq!(a.column_names(), vec!["attrib1", "attrib2", "group", "class"]);
    }

    #[test]
    fn labels_follow_the_threshold_without_noise() {
        let d = SeaTable::new(100, 3).generate();
        for i in 0..d.n_rows() {
            let row = d.row(i).unwrap();
            let sum = row[0].as_f64().unwrap() + row[1].as_f64().unwrap();
            let expected = if sum > 9.0 { "groupB" } else { "groupA" };
            assert_eq!(row[3].category(), expected);
        }
    }

    #[test]
    fn full_noise_flips_every_label() {
        let clean = SeaTable::new(40, 5).generate();
        let flipped = SeaTable::new(40, 5).with_noise(100).generate();
        let labels = |d: &Dataset| d.categories_of(LABEL_COLUMN).unwrap();
        for (a, b) in labels(&clean).iter().zip(labels(&flipped)) {
            assert_ne!(a, &b);
        }
        assert_eq!(SeaTable::new(1, 0).with_noise(250).noise_percentage, 100);
    }
}
