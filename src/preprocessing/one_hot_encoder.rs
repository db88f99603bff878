use crate::core::dataset::sorted_categories;
use ndarray::ArrayViewMut1;

/// One-hot encoding over the categories seen at fit time.
///
/// Categories never seen during fitting encode to all zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct OneHotEncoder {
    categories: Vec<String>,
}

impl OneHotEncoder {
    pub fn fit<S: AsRef<str>>(values: &[S]) -> Self {
        Self {
            categories: sorted_categories(values.iter().map(|v| v.as_ref().to_string())),
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.categories.len()
    }

    /// Writes the encoding of `value` into `out`, which must be `width()` long.
    pub fn encode_into(&self, value: &str, mut out: ArrayViewMut1<'_, f64>) {
        out.fill(0.0);
        if let Some(i) = self.categories.iter().position(|c| c == value) {
            out[i] = 1.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};

    #[test]
    fn known_categories_are_one_hot() {
        let enc = OneHotEncoder::fit(&["red", "blue", "red", "green"]);
        assert_eq!(enc.categories(), &["blue", "green", "red"]);
        let mut out = Array1::from_elem(enc.width(), 9.0);
        enc.encode_into("red", out.view_mut());
        assert_eq!(out, array![0.0, 0.0, 1.0]);
    }

    #[test]
    fn unknown_category_is_all_zero() {
        let enc = OneHotEncoder::fit(&["a", "b"]);
        let mut out = Array1::from_elem(2, 1.0);
        enc.encode_into("c", out.view_mut());
        assert_eq!(out, array![0.0, 0.0]);
    }
}
