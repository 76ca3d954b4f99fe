//! Scorer/Ranker
//!
//! Projects candidate items onto a solved user vector and orders them.
//!
//! Ranking policy, highest first:
//! - items present in the model and not yet seen, by their dot product with the user vector
//! - items unknown to the model, ranked as a neutral score of `0.0` among the former
//! - items the user has already seen, always last
//!
//! Seen items are reported with the conventional score `-1.0`, but their position never
//! depends on that number, so genuine scores below `-1.0` cannot overtake them. Equal keys
//! keep their input order.

use crate::factors::{FactorStore, ItemId};
use ndarray::Array1;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Score reported for items the user has already consumed
pub const SEEN_SCORE: f64 = -1.0;

/// Score reported for items absent from the model
pub const UNKNOWN_SCORE: f64 = 0.0;

/// Ordering key of a candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RankKey {
    /// Already consumed by the user
    Seen,
    /// Not present in the model
    Unknown,
    /// Dot product of the item factors with the user vector
    Scored(f64),
}

impl RankKey {
    /// Numeric score handed back to callers
    pub fn score(&self) -> f64 {
        match self {
            RankKey::Seen => SEEN_SCORE,
            RankKey::Unknown => UNKNOWN_SCORE,
            RankKey::Scored(score) => *score,
        }
    }

    /// Total order used for ranking; `Greater` ranks first.
    pub fn rank_cmp(&self, other: &RankKey) -> Ordering {
        match (self, other) {
            (RankKey::Seen, RankKey::Seen) => Ordering::Equal,
            (RankKey::Seen, _) => Ordering::Less,
            (_, RankKey::Seen) => Ordering::Greater,
            _ => self.score().total_cmp(&other.score()),
        }
    }
}

/// A ranked candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentScore {
    pub document_id: ItemId,
    pub key: RankKey,
}

impl DocumentScore {
    pub fn score(&self) -> f64 {
        self.key.score()
    }
}

/// Scores candidates against one user vector
pub struct Scorer<'a> {
    factors: &'a FactorStore,
    user_vector: &'a Array1<f64>,
}

impl<'a> Scorer<'a> {
    pub fn new(factors: &'a FactorStore, user_vector: &'a Array1<f64>) -> Self {
        Self {
            factors,
            user_vector,
        }
    }

    /// Y·x for every item, in row order
    pub fn scores(&self) -> Array1<f64> {
        self.factors.matrix().dot(self.user_vector)
    }

    pub fn key(&self, item_id: ItemId, seen: &HashSet<ItemId>) -> RankKey {
        if seen.contains(&item_id) {
            return RankKey::Seen;
        }
        match self.factors.index_of(item_id) {
            Some(index) => RankKey::Scored(self.factors.row(index).dot(self.user_vector)),
            None => RankKey::Unknown,
        }
    }

    /// Score an arbitrary candidate list and sort it.
    pub fn rank(&self, candidates: &[ItemId], seen: &HashSet<ItemId>) -> Vec<DocumentScore> {
        let mut ranked: Vec<DocumentScore> = candidates
            .iter()
            .map(|&document_id| DocumentScore {
                document_id,
                key: self.key(document_id, seen),
            })
            .collect();
        sort_ranked(&mut ranked);
        ranked
    }

    /// Score every item in the model, in row order, and sort.
    pub fn rank_all(&self, seen: &HashSet<ItemId>) -> Vec<DocumentScore> {
        let scores = self.scores();
        let mut ranked: Vec<DocumentScore> = self
            .factors
            .item_ids()
            .iter()
            .zip(scores.iter())
            .map(|(&document_id, &score)| DocumentScore {
                document_id,
                key: if seen.contains(&document_id) {
                    RankKey::Seen
                } else {
                    RankKey::Scored(score)
                },
            })
            .collect();
        sort_ranked(&mut ranked);
        ranked
    }
}

/// Stable descending sort by rank key
pub fn sort_ranked(ranked: &mut [DocumentScore]) {
    ranked.sort_by(|a, b| b.key.rank_cmp(&a.key));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn doc(document_id: ItemId, key: RankKey) -> DocumentScore {
        DocumentScore { document_id, key }
    }

    #[test]
    fn test_rank_key_order() {
        use RankKey::*;

        assert_eq!(Scored(0.5).rank_cmp(&Unknown), Ordering::Greater);
        assert_eq!(Scored(-0.5).rank_cmp(&Unknown), Ordering::Less);
        assert_eq!(Scored(-5.0).rank_cmp(&Seen), Ordering::Greater);
        assert_eq!(Unknown.rank_cmp(&Seen), Ordering::Greater);
        assert_eq!(Seen.rank_cmp(&Seen), Ordering::Equal);
        assert_eq!(Unknown.rank_cmp(&Scored(0.0)), Ordering::Equal);
    }

    #[test]
    fn test_reported_scores() {
        assert_eq!(RankKey::Seen.score(), -1.0);
        assert_eq!(RankKey::Unknown.score(), 0.0);
        assert_eq!(RankKey::Scored(0.25).score(), 0.25);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut ranked = vec![
            doc(5, RankKey::Scored(1.0)),
            doc(3, RankKey::Seen),
            doc(9, RankKey::Scored(1.0)),
            doc(1, RankKey::Seen),
            doc(2, RankKey::Scored(2.0)),
        ];
        sort_ranked(&mut ranked);

        let ids: Vec<ItemId> = ranked.iter().map(|d| d.document_id).collect();
        assert_eq!(ids, vec![2, 5, 9, 3, 1]);
    }

    #[test]
    fn test_scores_for_user_vector() {
        let factors =
            FactorStore::new(vec![(1234, [1.0, 2.0, 3.0]), (4567, [3.0, 2.0, 1.0])]).unwrap();
        let user = array![0.2, 0.1, 0.0];
        let scorer = Scorer::new(&factors, &user);

        let scores = scorer.scores();

        assert_eq!(scores.len(), 2);
        assert!((scores[factors.index_of(1234).unwrap()] - 0.4).abs() < 1e-12);
        assert!((scores[factors.index_of(4567).unwrap()] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_rank_candidates() {
        let factors =
            FactorStore::new(vec![(1, [1.0, 0.0]), (2, [0.0, 1.0]), (3, [-1.0, 0.0])]).unwrap();
        let user = array![1.0, 0.5];
        let scorer = Scorer::new(&factors, &user);
        let seen: HashSet<ItemId> = [2].into_iter().collect();

        let ranked = scorer.rank(&[3, 2, 42, 1], &seen);

        let ids: Vec<ItemId> = ranked.iter().map(|d| d.document_id).collect();
        assert_eq!(ids, vec![1, 42, 3, 2]);
        let scores: Vec<f64> = ranked.iter().map(|d| d.score()).collect();
        assert_eq!(scores, vec![1.0, 0.0, -1.0, -1.0]);
        assert_eq!(ranked[2].key, RankKey::Scored(-1.0));
        assert_eq!(ranked[3].key, RankKey::Seen);
    }

    #[test]
    fn test_rank_all_marks_seen_items() {
        let factors = FactorStore::new(vec![(1, [1.0]), (2, [2.0]), (3, [3.0])]).unwrap();
        let user = array![1.0];
        let scorer = Scorer::new(&factors, &user);
        let seen: HashSet<ItemId> = [3].into_iter().collect();

        let ranked = scorer.rank_all(&seen);

        let ids: Vec<ItemId> = ranked.iter().map(|d| d.document_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(ranked[2].key, RankKey::Seen);
    }
}
