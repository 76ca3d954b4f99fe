//! Gram matrix YtY
//!
//! Computed once from the item factors and reused, unmodified, by every user-vector solve.

use ndarray::Array2;

/// Cross-product of the item factor matrix with itself: [n_factors x n_factors]
#[derive(Debug, Clone)]
pub struct GramMatrix {
    squared_item_factors: Array2<f64>,
}

impl GramMatrix {
    pub fn compute(item_factors: &Array2<f64>) -> Self {
        Self {
            squared_item_factors: item_factors.t().dot(item_factors),
        }
    }

    pub fn dim(&self) -> usize {
        self.squared_item_factors.nrows()
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.squared_item_factors
    }

    /// Fresh copy of YtY + regularization * I
    pub fn regularized(&self, regularization: f64) -> Array2<f64> {
        let mut a = self.squared_item_factors.clone();
        a.diag_mut().mapv_inplace(|v| v + regularization);
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_single_row_gram() {
        let y = array![[1.0, 2.0, 3.0]];
        let gram = GramMatrix::compute(&y);

        assert_eq!(gram.dim(), 3);
        assert_eq!(
            gram.matrix(),
            &array![[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [3.0, 6.0, 9.0]]
        );
    }

    #[test]
    fn test_gram_matches_naive_product() {
        let y = array![[1.0, 2.0, 3.0], [3.0, 2.0, 1.0], [0.5, -1.0, 4.0]];
        let gram = GramMatrix::compute(&y);

        for i in 0..3 {
            for j in 0..3 {
                let expected: f64 = (0..3).map(|row| y[[row, i]] * y[[row, j]]).sum();
                assert!((gram.matrix()[[i, j]] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_regularized_leaves_gram_untouched() {
        let y = array![[1.0, 0.0], [0.0, 2.0]];
        let gram = GramMatrix::compute(&y);

        let a = gram.regularized(0.5);

        assert_eq!(a, array![[1.5, 0.0], [0.0, 4.5]]);
        assert_eq!(gram.matrix(), &array![[1.0, 0.0], [0.0, 4.0]]);
    }
}
