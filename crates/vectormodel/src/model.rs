//! Vector Model
//!
//! Serves recommendations from pre-trained implicit-feedback item factors. User vectors are
//! computed per request from the consumed items and never stored.
//!
//! The model is immutable after construction and can be shared across threads without
//! locking; every request allocates its own system, user vector and score buffers.

use crate::error::Result;
use crate::factors::{FactorStore, ItemId};
use crate::gram::GramMatrix;
use crate::scoring::{DocumentScore, Scorer};
use crate::solver::UserVectorSolver;
use ndarray::{Array1, Array2, ArrayView1};
use std::collections::HashSet;
use tracing::{info, warn};

/// Document vector space model
#[derive(Debug, Clone)]
pub struct VectorModel {
    confidence: f64,
    regularization: f64,
    factors: FactorStore,
    gram: GramMatrix,
}

impl VectorModel {
    /// Build a model from `(item id, factor vector)` pairs.
    ///
    /// `confidence` weights every consumed item, `regularization` is the ridge term of the
    /// per-user normal equations. Fails with `InvalidDimension` if vector lengths disagree.
    pub fn new<I, V>(items: I, confidence: f64, regularization: f64) -> Result<Self>
    where
        I: IntoIterator<Item = (ItemId, V)>,
        V: AsRef<[f64]>,
    {
        let factors = FactorStore::new(items)?;
        let gram = GramMatrix::compute(factors.matrix());

        if factors.is_empty() {
            warn!("Vector model built without items, every request will lack history");
        } else {
            info!(
                items = factors.n_items(),
                factors = factors.n_factors(),
                confidence,
                regularization,
                "Vector model loaded"
            );
        }

        Ok(Self {
            confidence,
            regularization,
            factors,
            gram,
        })
    }

    /// Reorder `candidates` in place, best first, and return the parallel scores.
    ///
    /// Candidates unknown to the model score `0.0`, candidates in `seen` score `-1.0` and
    /// always end up last. Ties keep their original relative order.
    pub fn rank(&self, candidates: &mut [ItemId], seen: &HashSet<ItemId>) -> Result<Vec<f64>> {
        let ranked = self.rank_documents(candidates, seen)?;

        let mut scores = Vec::with_capacity(ranked.len());
        for (slot, document) in candidates.iter_mut().zip(ranked.iter()) {
            *slot = document.document_id;
            scores.push(document.score());
        }

        Ok(scores)
    }

    /// Ranked copy of `candidates`; see [`VectorModel::rank`].
    pub fn rank_documents(
        &self,
        candidates: &[ItemId],
        seen: &HashSet<ItemId>,
    ) -> Result<Vec<DocumentScore>> {
        let user_vector = self.user_vector(seen)?;
        Ok(Scorer::new(&self.factors, &user_vector).rank(candidates, seen))
    }

    /// Top `n` items of the model for a user history, best first.
    ///
    /// Seen items are scored too and sink to the bottom; with fewer than `n` items in the
    /// model every item is returned.
    pub fn recommend(&self, seen: &HashSet<ItemId>, n: usize) -> Result<Vec<DocumentScore>> {
        let user_vector = self.user_vector(seen)?;

        let mut recommendations = Scorer::new(&self.factors, &user_vector).rank_all(seen);
        recommendations.truncate(n);

        Ok(recommendations)
    }

    /// Implicit user vector for a set of consumed items
    pub fn user_vector(&self, seen: &HashSet<ItemId>) -> Result<Array1<f64>> {
        self.solver().user_vector(seen)
    }

    /// Scores of every item (row order, see [`VectorModel::item_ids`]) for a user vector
    pub fn scores_for_user_vector(&self, user_vector: &Array1<f64>) -> Array1<f64> {
        Scorer::new(&self.factors, user_vector).scores()
    }

    fn solver(&self) -> UserVectorSolver<'_> {
        UserVectorSolver::new(
            &self.factors,
            &self.gram,
            self.confidence,
            self.regularization,
        )
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn regularization(&self) -> f64 {
        self.regularization
    }

    pub fn n_items(&self) -> usize {
        self.factors.n_items()
    }

    pub fn n_factors(&self) -> usize {
        self.factors.n_factors()
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.factors.contains(item_id)
    }

    /// Item IDs in row order
    pub fn item_ids(&self) -> &[ItemId] {
        self.factors.item_ids()
    }

    pub fn item_factors(&self, item_id: ItemId) -> Option<ArrayView1<'_, f64>> {
        self.factors.factors(item_id)
    }

    /// Item factor matrix Y
    pub fn factor_matrix(&self) -> &Array2<f64> {
        self.factors.matrix()
    }

    /// Precomputed YtY
    pub fn gram(&self) -> &Array2<f64> {
        self.gram.matrix()
    }
}
