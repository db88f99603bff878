use ndarray::{Array2, ArrayView1};

/// Index of the largest finite value; the first one wins ties.
#[inline]
pub fn argmax(v: &[f64]) -> Option<usize> {
    let mut best = None;
    let mut best_value = f64::NEG_INFINITY;
    for (i, &x) in v.iter().enumerate() {
        if !x.is_finite() {
            continue;
        }
        if best.is_none() || x > best_value {
            best = Some(i);
            best_value = x;
        }
    }
    best
}

/// In-place softmax, stable for large inputs.
pub fn softmax_in_place(v: &mut [f64]) {
    let max = v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        let u = 1.0 / v.len().max(1) as f64;
        v.fill(u);
        return;
    }
    let mut sum = 0.0;
    for x in v.iter_mut() {
        *x = (*x - max).exp();
        sum += *x;
    }
    for x in v.iter_mut() {
        *x /= sum;
    }
}

/// Row-wise softmax of a score matrix.
pub fn softmax_rows(m: &mut Array2<f64>) {
    for mut row in m.outer_iter_mut() {
        let max = row.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        if !max.is_finite() {
            row.fill(1.0 / row.len().max(1) as f64);
            continue;
        }
        row.mapv_inplace(|x| (x - max).exp());
        let sum = row.sum();
        row /= sum;
    }
}

/// Scales non-negative weights to sum to one; all-zero input stays zero.
pub fn normalize_in_place(v: &mut [f64]) {
    let sum: f64 = v.iter().sum();
    if sum > 0.0 {
        for x in v.iter_mut() {
            *x /= sum;
        }
    }
}

#[inline]
pub fn squared_euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}
