//! Catalog source loading.
//!
//! The source format groups component records by `category → subcategory →
//! [records]`. Each record carries its own full field set (the grouping is
//! organizational only), so records are parsed individually and a malformed
//! record is skipped with a warning rather than aborting the whole load.

use std::{fs, io, path::Path, path::PathBuf};

use indexmap::IndexMap;
use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

use stackdraft_core::{Category, ComponentDefinition, IntegrationPattern, Layer};

use crate::Catalog;

/// Fatal catalog loading failures.
///
/// These abort startup; they are never per-call conditions.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file not found: {0}")]
    MissingFile(PathBuf),

    #[error("I/O error reading catalog: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON in catalog source: {0}")]
    Json(#[from] serde_json::Error),
}

/// One component record as it appears in the catalog source.
#[derive(Debug, Deserialize)]
struct RawRecord {
    id: String,
    name: String,
    category: Category,
    subcategory: String,
    description: String,
    layer: Layer,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    conflicts: Vec<String>,
    #[serde(default)]
    integration_patterns: Vec<IntegrationPattern>,
    #[serde(default)]
    is_core: bool,
    #[serde(default)]
    pricing_tier: Option<String>,
}

impl From<RawRecord> for ComponentDefinition {
    fn from(record: RawRecord) -> Self {
        ComponentDefinition::new(
            record.id,
            record.name,
            record.description,
            record.category,
            record.subcategory,
            record.layer,
            record.dependencies,
            record.conflicts,
            record.integration_patterns,
            record.is_core,
            record.pricing_tier,
        )
    }
}

/// Loads a catalog from a JSON file on disk.
///
/// # Errors
///
/// Returns [`CatalogError`] if the file is missing, unreadable, or not
/// valid JSON at the top level.
pub fn load_path(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CatalogError::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let catalog = parse(&content)?;

    info!(
        path:? = path,
        components = catalog.len();
        "Loaded technology catalog",
    );

    Ok(catalog)
}

/// Parses catalog source JSON into a [`Catalog`].
///
/// Individual records that fail validation are skipped with a warning;
/// only a structurally invalid document is a hard error.
pub fn parse(source: &str) -> Result<Catalog, CatalogError> {
    type Grouped = IndexMap<String, IndexMap<String, Vec<serde_json::Value>>>;

    let grouped: Grouped = serde_json::from_str(source)?;
    let mut components = Vec::new();

    for (category, subcategories) in &grouped {
        for (subcategory, records) in subcategories {
            for record in records {
                match serde_json::from_value::<RawRecord>(record.clone()) {
                    Ok(raw) => components.push(ComponentDefinition::from(raw)),
                    Err(err) => {
                        let record_id = record
                            .get("id")
                            .and_then(|id| id.as_str())
                            .unwrap_or("unknown");
                        warn!(
                            record_id, category, subcategory;
                            "Skipping invalid catalog record: {err}",
                        );
                    }
                }
            }
        }
    }

    Ok(Catalog::from_components(components))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SOURCE: &str = r#"{
        "power_platform": {
            "analytics": [
                {
                    "id": "power_bi",
                    "name": "Power BI",
                    "category": "power_platform",
                    "subcategory": "analytics",
                    "description": "Business analytics service",
                    "layer": "presentation",
                    "integration_patterns": ["rest_api", "odata"],
                    "is_core": true
                },
                {
                    "id": "broken_record",
                    "name": "Broken",
                    "category": "power_platform",
                    "subcategory": "analytics",
                    "description": "Missing layer field"
                }
            ],
            "data": [
                {
                    "id": "dataverse",
                    "name": "Dataverse",
                    "category": "power_platform",
                    "subcategory": "data",
                    "description": "Data platform",
                    "layer": "data",
                    "integration_patterns": ["dataverse_connector", "odata"]
                }
            ]
        }
    }"#;

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let catalog = parse(SOURCE).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("broken_record").is_none());
        assert!(catalog.get("power_bi").unwrap().is_core());
    }

    #[test]
    fn invalid_document_is_fatal() {
        assert!(matches!(parse("not json"), Err(CatalogError::Json(_))));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, CatalogError::MissingFile(_)));
    }

    #[test]
    fn load_path_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SOURCE.as_bytes()).unwrap();

        let catalog = load_path(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
    }
}
