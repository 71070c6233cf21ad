use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CensusKitError, Result};
use crate::table::JointDistributionTable;

/// Per-session state carried into a query, e.g. the location under
/// discussion. Passed explicitly; the engine keeps none of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<serde_json::Value>,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location: serde_json::Value) -> Self {
        self.location = Some(location);
        self
    }

    pub(crate) fn request(&self, source_id: &str) -> TableRequest {
        TableRequest {
            source_id: source_id.to_string(),
            location: self.location.clone(),
        }
    }
}

/// What a provider is asked for: one source's table, optionally for a
/// location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRequest {
    pub source_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<serde_json::Value>,
}

/// Source of joint tables. Implementations own acquisition concerns such as
/// remote APIs, caches and timeouts.
pub trait TableProvider: Send + Sync {
    fn fetch(
        &self,
        request: &TableRequest,
    ) -> impl std::future::Future<Output = Result<JointDistributionTable>> + Send;
}

/// In-memory tables keyed by source id.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    tables: IndexMap<String, JointDistributionTable>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, source_id: impl Into<String>, table: JointDistributionTable) -> Self {
        self.tables.insert(source_id.into(), table);
        self
    }
}

impl TableProvider for StaticProvider {
    fn fetch(
        &self,
        request: &TableRequest,
    ) -> impl std::future::Future<Output = Result<JointDistributionTable>> + Send {
        let result = self
            .tables
            .get(&request.source_id)
            .cloned()
            .ok_or_else(|| CensusKitError::SourceNotFound {
                source_id: request.source_id.clone(),
            });
        async move { result }
    }
}

/// Reads one JSON table file per source id.
///
/// A source resolves to its explicitly registered path, else to
/// `<root>/<source_id>.json`. The location in the request is ignored: files
/// are already location-specific.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    root: PathBuf,
    paths: IndexMap<String, PathBuf>,
}

impl JsonFileProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            paths: IndexMap::new(),
        }
    }

    /// Register an explicit file for `source_id`. Relative paths resolve
    /// against the provider root.
    pub fn with_path(mut self, source_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(source_id.into(), path.into());
        self
    }

    pub fn path_for(&self, source_id: &str) -> PathBuf {
        match self.paths.get(source_id) {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.root.join(path),
            None => self.root.join(format!("{}.json", source_id)),
        }
    }
}

/// Read and validate a single table file.
pub async fn read_table_file(path: &Path) -> Result<JointDistributionTable> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CensusKitError::Io {
            message: format!("Failed to read table file {}", path.display()),
            source: e,
        })?;
    serde_json::from_str(&content).map_err(|e| CensusKitError::Json {
        message: format!("Failed to parse table file {}", path.display()),
        source: e,
    })
}

impl TableProvider for JsonFileProvider {
    fn fetch(
        &self,
        request: &TableRequest,
    ) -> impl std::future::Future<Output = Result<JointDistributionTable>> + Send {
        let path = self.path_for(&request.source_id);
        async move {
            tracing::debug!("reading table {}", path.display());
            read_table_file(&path).await
        }
    }
}
