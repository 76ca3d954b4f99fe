//! User-Vector Solver
//!
//! Recovers a user's latent vector from the items they consumed, following
//! "Collaborative Filtering for Implicit Feedback Datasets" (Hu, Koren & Volinsky):
//!
//! ```text
//! x_u   = (YtCuY + λI)^-1 · YtCuPu
//! YtCuY = YtY + Σ (c - 1) · f fᵗ     over the consumed item factors f
//! YtCuPu = Σ c · f
//! ```
//!
//! Only the rank-one terms depend on the user, so every solve starts from the precomputed
//! Gram matrix. For λ > 0 and c >= 1 the system is symmetric positive definite and is solved
//! through its Cholesky (LLᵗ) factor.

use crate::error::{Result, VectorModelError};
use crate::factors::{FactorStore, ItemId};
use crate::gram::GramMatrix;
use faer::linalg::solvers::{Llt, Solve};
use faer::{Mat, Side};
use ndarray::{Array1, Array2, ArrayView1};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, debug_span};

/// Confidence of every retained consumed item, keyed by factor row
pub(crate) type ConfidenceMap = BTreeMap<usize, f64>;

/// Per-request solver borrowing the model's read-only state
pub struct UserVectorSolver<'a> {
    factors: &'a FactorStore,
    gram: &'a GramMatrix,
    confidence: f64,
    regularization: f64,
}

impl<'a> UserVectorSolver<'a> {
    pub fn new(
        factors: &'a FactorStore,
        gram: &'a GramMatrix,
        confidence: f64,
        regularization: f64,
    ) -> Self {
        Self {
            factors,
            gram,
            confidence,
            regularization,
        }
    }

    /// Solve the user vector for a set of consumed items.
    ///
    /// Items unknown to the model are ignored. Fails with `InsufficientHistory` when none of
    /// the items is known and with `SingularSystem` when the system cannot be factorized.
    pub fn user_vector(&self, seen: &HashSet<ItemId>) -> Result<Array1<f64>> {
        let _span = debug_span!("user_vector", history = seen.len()).entered();

        let confidence = self.confidence_map(seen);
        if confidence.is_empty() {
            return Err(VectorModelError::InsufficientHistory {
                history: seen.len(),
                model: self.factors.n_items(),
            });
        }

        debug!(
            retained = confidence.len(),
            ignored = seen.len() - confidence.len(),
            "Solving user vector"
        );

        self.solve(&confidence)
    }

    pub(crate) fn confidence_map(&self, seen: &HashSet<ItemId>) -> ConfidenceMap {
        seen.iter()
            .filter_map(|item_id| self.factors.index_of(*item_id))
            .map(|index| (index, self.confidence))
            .collect()
    }

    pub(crate) fn solve(&self, confidence: &ConfidenceMap) -> Result<Array1<f64>> {
        let k = self.gram.dim();

        // A = YtY + reg * I, plus one rank-one term per consumed item
        let mut a = self.gram.regularized(self.regularization);
        let mut b = Array1::<f64>::zeros(k);

        for (&index, &c) in confidence {
            let factor = self.factors.row(index);
            add_scaled_outer(&mut a, c - 1.0, factor);
            b.scaled_add(c, &factor);
        }

        cholesky_solve(&a, &b)
    }
}

/// a += scale * outer(factor, factor)
fn add_scaled_outer(a: &mut Array2<f64>, scale: f64, factor: ArrayView1<'_, f64>) {
    for ((i, j), value) in a.indexed_iter_mut() {
        *value += scale * factor[i] * factor[j];
    }
}

/// Solve a·x = b for symmetric positive definite `a`, reading its lower triangle.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = b.len();
    if n == 0 {
        return Ok(Array1::zeros(0));
    }

    let system = Mat::from_fn(n, n, |i, j| a[[i, j]]);
    let rhs = Mat::from_fn(n, 1, |i, _| b[i]);

    let factor = Llt::new(system.as_ref(), Side::Lower).map_err(|err| {
        VectorModelError::SingularSystem(format!("matrix is not positive definite ({:?})", err))
    })?;
    let solution = factor.solve(rhs.as_ref());

    let x = Array1::from_shape_fn(n, |i| solution[(i, 0)]);
    if x.iter().any(|v| !v.is_finite()) {
        return Err(VectorModelError::SingularSystem(
            "solution contains non-finite values".to_string(),
        ));
    }

    Ok(x)
}
