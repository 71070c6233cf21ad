use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::category::Family;
use crate::error::CensusKitError;
use crate::matcher::Matcher;
use crate::table::Dimension;

use super::provider::{QueryContext, TableProvider};
use super::{reconcile_and_condition, SourceRegistration, UnifiedResult};

/// Concurrent provider fetches allowed when nothing else is configured.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// A source the engine fetches through its provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub axis: Option<Dimension>,
}

impl SourceSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            axis: None,
        }
    }

    pub fn with_axis(mut self, axis: Dimension) -> Self {
        self.axis = Some(axis);
        self
    }
}

/// Fetches every registered source concurrently, then reconciles and
/// conditions them with the synchronous core.
pub struct QueryEngine<P> {
    provider: Arc<P>,
    matcher: Matcher,
    sources: Vec<SourceSpec>,
    max_concurrency: usize,
}

impl<P: TableProvider + 'static> QueryEngine<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
            matcher: Matcher::default(),
            sources: Vec::new(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Zero is treated as one.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_source(mut self, source: SourceSpec) -> Self {
        self.sources.push(source);
        self
    }

    pub fn register(&mut self, source: SourceSpec) {
        self.sources.push(source);
    }

    pub fn sources(&self) -> &[SourceSpec] {
        &self.sources
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Fetch every source's table, at most `max_concurrency` at a time.
    /// Fetch failures are kept per source; results follow registration order.
    pub async fn fetch_all(&self, ctx: &QueryContext) -> Vec<SourceRegistration> {
        if self.sources.is_empty() {
            return Vec::new();
        }
        let permits = self.sources.len().min(self.max_concurrency);
        let semaphore = Arc::new(Semaphore::new(permits));

        let handles: Vec<_> = self
            .sources
            .iter()
            .map(|spec| {
                let provider = Arc::clone(&self.provider);
                let semaphore = Arc::clone(&semaphore);
                let request = ctx.request(&spec.id);
                tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await.map_err(|e| {
                        CensusKitError::Other(format!("fetch limiter closed: {}", e))
                    })?;
                    provider.fetch(&request).await
                })
            })
            .collect();

        let mut registrations = Vec::with_capacity(handles.len());
        for (spec, handle) in self.sources.iter().zip(handles) {
            let table = match handle.await {
                Ok(table) => table,
                Err(e) => Err(CensusKitError::Provider {
                    source_id: spec.id.clone(),
                    message: format!("fetch task failed: {}", e),
                }),
            };
            registrations.push(SourceRegistration {
                id: spec.id.clone(),
                name: spec.name.clone(),
                table,
                axis: spec.axis,
            });
        }
        registrations
    }

    /// Run one unified query across every registered source.
    pub async fn query(&self, ctx: &QueryContext, family: Family, value: &str) -> UnifiedResult {
        let registrations = self.fetch_all(ctx).await;
        tracing::debug!(
            "querying {} '{}' across {} sources",
            family,
            value,
            registrations.len()
        );
        reconcile_and_condition(family, value, &registrations, &self.matcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::provider::{StaticProvider, TableRequest};
    use crate::query::SourceStatus;
    use crate::table::{Cell, JointDistributionTable};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn age_gender() -> JointDistributionTable {
        JointDistributionTable::new(
            Family::Age,
            Family::Gender,
            vec![
                Cell::new("25 to 29 years", "Male", 4),
                Cell::new("25 to 29 years", "Female", 6),
            ],
        )
        .unwrap()
    }

    /// Tracks the highest number of fetches in flight at once.
    struct CountingProvider {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl TableProvider for CountingProvider {
        fn fetch(
            &self,
            _request: &TableRequest,
        ) -> impl std::future::Future<Output = crate::Result<JointDistributionTable>> + Send
        {
            async move {
                let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(age_gender())
            }
        }
    }

    #[tokio::test]
    async fn test_query_keeps_registration_order() {
        let provider = StaticProvider::new().with_table("age_gender", age_gender());
        let engine = QueryEngine::new(provider)
            .with_source(SourceSpec::new("missing", "Missing"))
            .with_source(SourceSpec::new("age_gender", "Gender Distribution"));

        let result = engine
            .query(&QueryContext::new(), Family::Age, "25 to 29 years")
            .await;
        let keys: Vec<&String> = result.sources.keys().collect();
        assert_eq!(keys, vec!["missing", "age_gender"]);
        assert_eq!(result.sources["missing"].status, SourceStatus::Error);
        assert_eq!(result.sources["age_gender"].status, SourceStatus::Success);
        assert_eq!(result.summary.successful, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_fetches_are_bounded_by_max_concurrency() {
        let provider = CountingProvider {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        };
        let mut engine = QueryEngine::new(provider).with_max_concurrency(2);
        for i in 0..6 {
            engine.register(SourceSpec::new(format!("s{}", i), format!("Source {}", i)));
        }

        let result = engine
            .query(&QueryContext::new(), Family::Gender, "Female")
            .await;
        assert_eq!(result.summary.successful, 6);
        let peak = engine.provider.peak.load(Ordering::SeqCst);
        assert!(peak >= 1 && peak <= 2, "peak concurrency was {}", peak);
    }

    #[tokio::test]
    async fn test_zero_concurrency_clamped() {
        let engine = QueryEngine::new(StaticProvider::new()).with_max_concurrency(0);
        assert_eq!(engine.max_concurrency(), 1);
        let result = engine
            .query(&QueryContext::new(), Family::Age, "Under 5 years")
            .await;
        assert_eq!(result.summary.total, 0);
    }
}
