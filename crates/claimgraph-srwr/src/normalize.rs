//! Semi-row normalization and the positive/negative split.

use ndarray::{Array2, Axis};

/// Positive and negative parts of a row-normalized signed adjacency matrix.
///
/// Both matrices are entrywise non-negative and `pos - neg` is the
/// row-normalized matrix they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitMatrices {
    pub pos: Array2<f64>,
    pub neg: Array2<f64>,
}

impl SplitMatrices {
    /// Number of nodes the matrices cover.
    pub fn len(&self) -> usize {
        self.pos.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recombine into the signed row-normalized matrix.
    pub fn normalized(&self) -> Array2<f64> {
        &self.pos - &self.neg
    }
}

/// Divide each row by the sum of its absolute values.
///
/// A row with zero absolute sum stays all zero.
pub fn row_normalize(a: &Array2<f64>) -> Array2<f64> {
    let degrees = a.mapv(f64::abs).sum_axis(Axis(1));
    let mut n = a.clone();
    for (mut row, &degree) in n.axis_iter_mut(Axis(0)).zip(degrees.iter()) {
        if degree > 0.0 {
            row.mapv_inplace(|x| x / degree);
        }
    }
    n
}

/// Row-normalize `a` and split it into its positive and negative parts.
pub fn split(a: &Array2<f64>) -> SplitMatrices {
    let n = row_normalize(a);
    SplitMatrices {
        pos: n.mapv(|x| if x > 0.0 { x } else { 0.0 }),
        neg: n.mapv(|x| if x < 0.0 { -x } else { 0.0 }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_row_normalize_uses_absolute_degree() {
        let a = array![[0.0, 0.6, -0.2], [0.6, 0.0, 0.0], [-0.2, 0.0, 0.0]];
        let n = row_normalize(&a);
        assert!((n[[0, 1]] - 0.75).abs() < 1e-12);
        assert!((n[[0, 2]] + 0.25).abs() < 1e-12);
        assert_eq!(n[[1, 0]], 1.0);
        assert_eq!(n[[2, 0]], -1.0);
    }

    #[test]
    fn test_zero_degree_row_stays_zero() {
        let a = array![[0.0, 0.0], [0.0, 0.0]];
        let s = split(&a);
        assert_eq!(s.pos, Array2::<f64>::zeros((2, 2)));
        assert_eq!(s.neg, Array2::<f64>::zeros((2, 2)));
        assert!(s.pos.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_split_non_negative_and_recombines() {
        let a = array![
            [0.0, 0.9, -0.4, 0.0],
            [0.9, 0.0, 0.3, -0.7],
            [-0.4, 0.3, 0.0, 0.0],
            [0.0, -0.7, 0.0, 0.0]
        ];
        let s = split(&a);
        assert!(s.pos.iter().all(|&x| x >= 0.0));
        assert!(s.neg.iter().all(|&x| x >= 0.0));

        let expected = row_normalize(&a);
        let diff = (&s.normalized() - &expected).mapv(f64::abs).sum();
        assert!(diff < 1e-12);
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_row_sums_are_one_for_connected_rows() {
        let a = array![[0.0, 2.0, -1.0], [2.0, 0.0, 0.0], [-1.0, 0.0, 0.0]];
        let s = split(&a);
        let sums = (&s.pos + &s.neg).sum_axis(Axis(1));
        for &sum in sums.iter() {
            assert!((sum - 1.0).abs() < 1e-12);
        }
    }
}
