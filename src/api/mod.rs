pub mod client;
#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{ClassificationRecord, NewRecord, RecordId};

pub use client::HttpBackend;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),
    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Acknowledgement body returned by the mutating endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
    /// Present only when the backend echoes the id it assigned.
    #[serde(default)]
    pub id: Option<RecordId>,
}

/// The classification-history backend, reached over HTTP in production.
#[async_trait]
pub trait HistoryBackend: Send + Sync {
    async fn save(&self, record: &NewRecord) -> Result<Ack, ApiError>;
    async fn list(&self) -> Result<Vec<ClassificationRecord>, ApiError>;
    async fn delete(&self, id: RecordId) -> Result<Ack, ApiError>;
    async fn clear(&self) -> Result<Ack, ApiError>;
}
