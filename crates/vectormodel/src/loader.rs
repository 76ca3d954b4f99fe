//! Item factor ingestion
//!
//! Reads the item vectors exported by the offline trainer. The expected format is a JSON
//! object keyed by decimal item id:
//!
//! ```json
//! { "1234": [1.0, 2.0, 3.0], "4567": [3.0, 2.0, 1.0] }
//! ```

use crate::config::ModelConfig;
use crate::error::{Result, VectorModelError};
use crate::factors::ItemId;
use crate::model::VectorModel;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Item factors ordered by ascending item id
pub type ItemFactors = BTreeMap<ItemId, Vec<f64>>;

pub fn load_factors(path: impl AsRef<Path>) -> Result<ItemFactors> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| VectorModelError::Load(format!("{}: {}", path.display(), e)))?;

    read_factors(BufReader::new(file))
        .map_err(|e| VectorModelError::Load(format!("{}: {}", path.display(), e)))
}

pub fn read_factors<R: Read>(reader: R) -> std::result::Result<ItemFactors, serde_json::Error> {
    serde_json::from_reader(reader)
}

/// Load the configured factor file and build the model from it
pub fn load_model(config: &ModelConfig) -> Result<VectorModel> {
    let items = load_factors(&config.factors_path)?;
    info!(
        path = %config.factors_path,
        items = items.len(),
        "Loaded item factors"
    );

    VectorModel::new(items, config.confidence, config.regularization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_factors() {
        let json = r#"{"4567": [3.0, 2.0, 1.0], "1234": [1, 2, 3]}"#;

        let items = read_factors(json.as_bytes()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items.keys().copied().collect::<Vec<_>>(), vec![1234, 4567]);
        assert_eq!(items[&1234], vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_read_factors_rejects_bad_keys() {
        assert!(read_factors(r#"{"abc": [1.0]}"#.as_bytes()).is_err());
        assert!(read_factors(r#"[[1.0]]"#.as_bytes()).is_err());
    }

    #[test]
    fn test_load_model_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"1234": [1.0, 2.0, 3.0], "4567": [3.0, 2.0, 1.0]}}"#).unwrap();

        let config = ModelConfig {
            factors_path: file.path().to_string_lossy().into_owned(),
            ..ModelConfig::default()
        };
        let model = load_model(&config).unwrap();

        assert_eq!(model.n_items(), 2);
        assert_eq!(model.n_factors(), 3);
        assert_eq!(model.item_ids(), &[1234, 4567]);
        assert_eq!(model.confidence(), 40.0);
    }

    #[test]
    fn test_load_model_with_mismatched_vectors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"1": [1.0, 2.0], "2": [1.0]}}"#).unwrap();

        let config = ModelConfig {
            factors_path: file.path().to_string_lossy().into_owned(),
            ..ModelConfig::default()
        };

        assert!(matches!(
            load_model(&config),
            Err(VectorModelError::InvalidDimension { item_id: 2, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = load_factors("/nonexistent/item_factors.json");
        assert!(matches!(result, Err(VectorModelError::Load(_))));
    }
}
