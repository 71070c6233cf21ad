//! # Configuration File Parser
//!
//! Reads and parses `censuskit.toml`, the optional configuration that
//! registers table sources and tunes matching without CLI flags. Supports:
//!
//! - `[bounds]`: upper bounds given to open-ended brackets
//! - `[query]`: orchestrator settings
//! - `[sources.<id>]`: one joint table per source id, queried in file order
//!
//! Example `censuskit.toml`:
//!
//! ```toml
//! [bounds]
//! age_cap = 120
//! income_cap = 500000
//!
//! [query]
//! max_concurrency = 4
//!
//! [sources.age_income]
//! name = "Income Distribution"
//! path = "tables/age_income.json"
//! axis = "a"
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::category::{Normalizer, OpenBounds};
use crate::error::{CensusKitError, Result};
use crate::matcher::Matcher;
use crate::query::{JsonFileProvider, SourceSpec, DEFAULT_MAX_CONCURRENCY};
use crate::table::Dimension;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "censuskit.toml";

/// Top-level censuskit.toml structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CensusKitConfig {
    pub bounds: OpenBounds,
    pub query: QueryConfig,
    /// Table sources keyed by id, in file order.
    pub sources: IndexMap<String, SourceConfig>,

    /// Absolute path to the directory containing censuskit.toml.
    ///
    /// Populated by `read_config()` so relative source paths resolve against
    /// the config file's location, not the CWD.
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Upper bound on concurrent table fetches.
    pub max_concurrency: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Display name. Defaults to the source id.
    pub name: Option<String>,
    /// JSON table file, relative to the config directory.
    pub path: String,
    /// Axis to condition on (`a` or `b`). Inferred from the queried family
    /// when absent.
    pub axis: Option<String>,
}

/// Read and parse a censuskit.toml file from the given directory.
///
/// Returns `None` if the file doesn't exist (config is optional).
/// Returns an error if the file exists but can't be parsed or validated.
pub fn read_config(dir: &Path) -> Result<Option<CensusKitConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }
    read_config_file(&path).map(Some)
}

/// Read and parse a config file at an explicit path.
pub fn read_config_file(path: &Path) -> Result<CensusKitConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CensusKitError::Config {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;

    let mut config: CensusKitConfig =
        toml::from_str(&content).map_err(|e| CensusKitError::Config {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    config.config_dir = Some(std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf()));

    config.validate()?;

    Ok(config)
}

impl CensusKitConfig {
    /// Validate semantic constraints that serde cannot enforce.
    pub fn validate(&self) -> Result<()> {
        for (name, cap) in [
            ("age_cap", self.bounds.age_cap),
            ("income_cap", self.bounds.income_cap),
        ] {
            if !(cap.is_finite() && cap > 0.0) {
                return Err(CensusKitError::Config {
                    message: format!("[bounds] {} must be a positive number, got {}", name, cap),
                });
            }
        }

        if self.query.max_concurrency == Some(0) {
            return Err(CensusKitError::Config {
                message: "[query] max_concurrency must be at least 1".to_string(),
            });
        }

        for (id, source) in &self.sources {
            if source.path.trim().is_empty() {
                return Err(CensusKitError::Config {
                    message: format!(
                        "Source '{}': path is empty. Point it at a JSON table file.",
                        id
                    ),
                });
            }
            if let Some(axis) = &source.axis {
                axis.parse::<Dimension>().map_err(|_| CensusKitError::Config {
                    message: format!(
                        "Source '{}': unknown axis '{}'. Use 'a' or 'b'.",
                        id, axis
                    ),
                })?;
            }
        }
        Ok(())
    }

    /// Matcher using the configured open-ended bounds.
    pub fn matcher(&self) -> Matcher {
        Matcher::new(Normalizer::new(self.bounds))
    }

    pub fn max_concurrency(&self) -> usize {
        self.query.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY)
    }

    /// Registered sources, in file order.
    pub fn source_specs(&self) -> Result<Vec<SourceSpec>> {
        self.sources
            .iter()
            .map(|(id, source)| -> Result<SourceSpec> {
                let axis: Option<Dimension> =
                    source.axis.as_deref().map(str::parse).transpose()?;
                Ok(SourceSpec {
                    id: id.clone(),
                    name: source.name.clone().unwrap_or_else(|| id.clone()),
                    axis,
                })
            })
            .collect()
    }

    /// File provider resolving source paths against the config directory.
    pub fn provider(&self) -> JsonFileProvider {
        let root = self
            .config_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        self.sources
            .iter()
            .fold(JsonFileProvider::new(root), |provider, (id, source)| {
                provider.with_path(id.clone(), source.path.clone())
            })
    }

    /// Warnings for sources whose table file does not exist.
    ///
    /// Not an error: a missing file becomes a per-source `error` entry at
    /// query time, and the remaining sources still answer.
    pub fn missing_source_files(&self) -> Vec<String> {
        let provider = self.provider();
        self.sources
            .keys()
            .filter_map(|id| {
                let path = provider.path_for(id);
                if path.exists() {
                    None
                } else {
                    Some(format!(
                        "censuskit.toml: [sources.{}] points at {} which does not exist",
                        id,
                        path.display()
                    ))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{DEFAULT_AGE_CAP, DEFAULT_INCOME_CAP};

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[bounds]
age_cap = 100
income_cap = 250000.0

[query]
max_concurrency = 2

[sources.age_income]
name = "Income Distribution"
path = "tables/age_income.json"
axis = "a"

[sources.age_education]
path = "tables/age_education.json"
"#;

        let config: CensusKitConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.bounds.age_cap, 100.0);
        assert_eq!(config.bounds.income_cap, 250_000.0);
        assert_eq!(config.max_concurrency(), 2);
        assert_eq!(
            config.sources["age_income"].name.as_deref(),
            Some("Income Distribution")
        );
        assert_eq!(config.sources["age_income"].axis.as_deref(), Some("a"));
        assert!(config.sources["age_education"].name.is_none());

        let ids: Vec<&String> = config.sources.keys().collect();
        assert_eq!(ids, vec!["age_income", "age_education"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_empty_config() {
        let config: CensusKitConfig = toml::from_str("").unwrap();

        assert_eq!(config.bounds.age_cap, DEFAULT_AGE_CAP);
        assert_eq!(config.bounds.income_cap, DEFAULT_INCOME_CAP);
        assert_eq!(config.max_concurrency(), DEFAULT_MAX_CONCURRENCY);
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_partial_bounds_keep_defaults() {
        let config: CensusKitConfig = toml::from_str("[bounds]\nage_cap = 99").unwrap();
        assert_eq!(config.bounds.age_cap, 99.0);
        assert_eq!(config.bounds.income_cap, DEFAULT_INCOME_CAP);
    }

    #[test]
    fn test_source_specs_default_name_and_axis() {
        let toml = r#"
[sources.age_gender]
path = "b01001.json"
axis = "B"
"#;
        let config: CensusKitConfig = toml::from_str(toml).unwrap();
        let specs = config.source_specs().unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "age_gender");
        assert_eq!(specs[0].axis, Some(Dimension::B));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        for toml in [
            "[bounds]\nage_cap = 0",
            "[bounds]\nincome_cap = -5",
            "[query]\nmax_concurrency = 0",
            "[sources.x]\npath = \"\"",
            "[sources.x]\npath = \"x.json\"\naxis = \"c\"",
        ] {
            let config: CensusKitConfig = toml::from_str(toml).unwrap();
            let err = config.validate().unwrap_err();
            assert!(matches!(err, CensusKitError::Config { .. }), "{}", toml);
        }
    }

    #[test]
    fn test_validate_error_names_source() {
        let config: CensusKitConfig =
            toml::from_str("[sources.age_race]\npath = \"t.json\"\naxis = \"left\"").unwrap();
        let msg = format!("{}", config.validate().unwrap_err());
        assert!(msg.contains("age_race"), "Error should name the source: {}", msg);
        assert!(msg.contains("left"), "Error should name the axis: {}", msg);
    }

    #[test]
    fn test_read_config_nonexistent() {
        let result = read_config(Path::new("/nonexistent/dir"));
        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_read_config_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "this is not valid [[[toml").unwrap();
        assert!(read_config(dir.path()).is_err());
    }

    #[test]
    fn test_read_config_captures_dir_and_resolves_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
[sources.age_income]
path = "tables/age_income.json"

[sources.age_gender]
path = "gone.json"
"#,
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("tables")).unwrap();
        std::fs::write(dir.path().join("tables/age_income.json"), "{}").unwrap();

        let config = read_config(dir.path()).unwrap().unwrap();

        // /var is a symlink to /private/var on macOS
        let expected = std::fs::canonicalize(dir.path()).unwrap();
        assert_eq!(config.config_dir.as_deref(), Some(expected.as_path()));
        assert_eq!(
            config.provider().path_for("age_income"),
            expected.join("tables/age_income.json")
        );

        let warnings = config.missing_source_files();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("age_gender"), "{}", warnings[0]);
    }
}
