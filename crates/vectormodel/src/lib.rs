//! Real-time recommendations from pre-trained implicit-feedback matrix factorization.
//!
//! Item (document) factor vectors come from an offline ALS trainer. On every request the
//! user's latent vector is solved from the items they consumed and candidates are ranked
//! against it; user vectors are never stored.
//!
//! ```
//! use std::collections::HashSet;
//! use vectormodel::VectorModel;
//!
//! let model = VectorModel::new(
//!     vec![(1234, vec![1.0, 2.0, 3.0]), (4567, vec![3.0, 2.0, 1.0])],
//!     40.0,
//!     0.01,
//! )?;
//!
//! let seen: HashSet<i64> = [1234].into_iter().collect();
//! let recommendations = model.recommend(&seen, 10)?;
//! assert_eq!(recommendations[0].document_id, 4567);
//! # Ok::<(), vectormodel::VectorModelError>(())
//! ```

pub mod config;
pub mod error;
pub mod factors;
pub mod gram;
pub mod loader;
pub mod model;
pub mod observability;
pub mod scoring;
pub mod server;
pub mod solver;

// Re-export key types
pub use config::{LogFormat, LoggingConfig, ModelConfig, ServerConfig, ServiceConfig};
pub use error::{Result, VectorModelError};
pub use factors::{FactorStore, ItemId};
pub use gram::GramMatrix;
pub use loader::{load_factors, load_model};
pub use model::VectorModel;
pub use observability::init_logging;
pub use scoring::{DocumentScore, RankKey, Scorer, SEEN_SCORE, UNKNOWN_SCORE};
pub use solver::UserVectorSolver;
