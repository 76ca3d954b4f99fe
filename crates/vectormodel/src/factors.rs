//! Factor Store
//!
//! Immutable in-memory matrix of item latent factors produced by an offline trainer,
//! together with the bijective item ID <-> row index mapping.

use crate::error::{Result, VectorModelError};
use ndarray::{Array2, ArrayView1};
use std::collections::HashMap;

/// External item (document) identifier
pub type ItemId = i64;

/// Item latent factors plus ID index
#[derive(Debug, Clone)]
pub struct FactorStore {
    /// Item latent factors: [num_items x n_factors]
    item_factors: Array2<f64>,
    /// Reverse mapping: row index to item ID
    item_ids: Vec<ItemId>,
    /// Item ID to row index mapping
    item_index: HashMap<ItemId, usize>,
}

impl FactorStore {
    /// Build the store from `(item id, factor vector)` pairs.
    ///
    /// Rows are assigned in iteration order. Every vector must have the length of the first
    /// one; an empty input yields a zero-item, zero-factor store.
    pub fn new<I, V>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = (ItemId, V)>,
        V: AsRef<[f64]>,
    {
        let mut item_ids = Vec::new();
        let mut item_index = HashMap::new();
        let mut rows: Vec<V> = Vec::new();
        let mut n_factors = None;

        for (item_id, vector) in items {
            let actual = vector.as_ref().len();
            let expected = *n_factors.get_or_insert(actual);
            if actual != expected {
                return Err(VectorModelError::InvalidDimension {
                    item_id,
                    expected,
                    actual,
                });
            }

            if item_index.insert(item_id, item_ids.len()).is_some() {
                return Err(VectorModelError::DuplicateItem(item_id));
            }
            item_ids.push(item_id);
            rows.push(vector);
        }

        let n_factors = n_factors.unwrap_or(0);
        let item_factors =
            Array2::from_shape_fn((rows.len(), n_factors), |(i, j)| rows[i].as_ref()[j]);

        Ok(Self {
            item_factors,
            item_ids,
            item_index,
        })
    }

    pub fn n_items(&self) -> usize {
        self.item_ids.len()
    }

    pub fn n_factors(&self) -> usize {
        self.item_factors.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.item_index.contains_key(&item_id)
    }

    /// Row index of an item, if the item is part of the model
    pub fn index_of(&self, item_id: ItemId) -> Option<usize> {
        self.item_index.get(&item_id).copied()
    }

    /// Item IDs in row order
    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.item_factors.row(index)
    }

    /// Factor vector of an item, if the item is part of the model
    pub fn factors(&self, item_id: ItemId) -> Option<ArrayView1<'_, f64>> {
        self.index_of(item_id).map(|index| self.row(index))
    }

    /// The full item factor matrix Y
    pub fn matrix(&self) -> &Array2<f64> {
        &self.item_factors
    }
}
