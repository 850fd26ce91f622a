//! Dataset sources: where the immutable marketing snapshot comes from.
//!
//! A load is all-or-nothing: any I/O or parse failure surfaces as a single
//! [`InsightsError::Fetch`] and no partial dataset is ever returned.

use crate::error::{InsightsError, InsightsResult};
use crate::types::MarketingData;
use std::future::Future;
use std::path::PathBuf;
use tracing::{debug, info};

/// Provides the full dataset for one load cycle.
pub trait DatasetSource {
    fn fetch(&self) -> impl Future<Output = InsightsResult<MarketingData>> + Send;
}

/// Reads a JSON snapshot from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for FileSource {
    async fn fetch(&self) -> InsightsResult<MarketingData> {
        debug!(path = %self.path.display(), "Reading marketing snapshot");
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| InsightsError::Fetch(format!("{}: {e}", self.path.display())))?;
        let data = parse_snapshot(&bytes)?;
        info!(
            path = %self.path.display(),
            campaigns = data.campaigns.len(),
            "Marketing snapshot loaded"
        );
        Ok(data)
    }
}

/// Serves a dataset already held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    data: MarketingData,
}

impl StaticSource {
    pub fn new(data: MarketingData) -> Self {
        Self { data }
    }
}

impl DatasetSource for StaticSource {
    async fn fetch(&self) -> InsightsResult<MarketingData> {
        Ok(self.data.clone())
    }
}

/// Parse a raw JSON payload into a dataset.
pub fn parse_snapshot(bytes: &[u8]) -> InsightsResult<MarketingData> {
    serde_json::from_slice(bytes).map_err(|e| InsightsError::Fetch(format!("invalid payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Campaign;

    #[tokio::test]
    async fn test_file_source_reads_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(
            &path,
            r#"{"message": "ok", "campaigns": [{"id": 1, "name": "Eid Offers"}]}"#,
        )
        .unwrap();

        let data = FileSource::new(&path).fetch().await.unwrap();
        assert_eq!(data.campaigns.len(), 1);
        assert_eq!(data.campaigns[0].name, "Eid Offers");
    }

    #[tokio::test]
    async fn test_missing_file_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::new(dir.path().join("absent.json"))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, InsightsError::Fetch(_)));
        assert!(err.to_string().starts_with("failed to load marketing data"));
    }

    #[tokio::test]
    async fn test_malformed_payload_yields_no_partial_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{"campaigns": [{"id": 1, "name": "A"}, {"id": "#).unwrap();

        let result = FileSource::new(&path).fetch().await;
        assert!(matches!(result, Err(InsightsError::Fetch(_))));
    }

    #[test]
    fn test_bundled_sample_parses() {
        let data = parse_snapshot(include_bytes!("../../../data/marketing-data.json")).unwrap();
        assert_eq!(data.campaigns.len(), 2);
        assert_eq!(data.campaigns[1].device_performance.len(), 2);
        assert_eq!(data.filters.available_regions.len(), 3);
    }

    #[tokio::test]
    async fn test_static_source_returns_snapshot() {
        let data = MarketingData {
            campaigns: vec![Campaign {
                id: 3,
                name: "Back to School".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let fetched = StaticSource::new(data.clone()).fetch().await.unwrap();
        assert_eq!(fetched, data);
    }
}
