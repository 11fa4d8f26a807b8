use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use super::{parse_csv, IngestError, ParsedDataset};

/// Where a dataset comes from. Abstracted so the monitor can poll for
/// changes without caring whether the bytes live on disk or elsewhere.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Human-readable description for logs and the status endpoint.
    fn describe(&self) -> String;

    /// Last-modified marker, if the source can report one.
    async fn modified(&self) -> Option<DateTime<Utc>>;

    async fn load(&self) -> Result<ParsedDataset, IngestError>;
}

/// A CSV file on the local filesystem.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn modified(&self) -> Option<DateTime<Utc>> {
        let meta = tokio::fs::metadata(&self.path).await.ok()?;
        meta.modified().ok().map(DateTime::<Utc>::from)
    }

    async fn load(&self) -> Result<ParsedDataset, IngestError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| IngestError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        parse_csv(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileSource::new("definitely/not/here.csv");
        assert!(!source.exists());
        assert!(source.modified().await.is_none());
        assert!(matches!(source.load().await, Err(IngestError::Io { .. })));
    }
}
