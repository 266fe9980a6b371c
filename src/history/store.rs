use std::sync::Arc;

use crate::{
    api::{ApiError, HistoryBackend},
    domain::{ClassificationRecord, RecordId, SharedState},
};

pub const DELETED_MESSAGE: &str = "Prompt deleted.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete prompt.";
pub const CLEARED_MESSAGE: &str = "History has been cleared.";
pub const CLEAR_FAILED_MESSAGE: &str = "Failed to clear history.";
pub const SELECTED_MESSAGE: &str = "History loaded.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    Cancelled,
}

/// Local mirror of the backend's classification history.
#[derive(Clone)]
pub struct HistoryStore {
    state: SharedState,
    backend: Arc<dyn HistoryBackend>,
}

impl HistoryStore {
    pub fn new(state: SharedState, backend: Arc<dyn HistoryBackend>) -> Self {
        Self { state, backend }
    }

    /// Replaces local history with the backend's, newest first. Failures are
    /// only logged; local history is left as it was.
    pub async fn load(&self) -> Result<usize, ApiError> {
        match self.backend.list().await {
            Ok(mut records) => {
                records.reverse();
                let count = records.len();
                self.state.lock().history = records;
                tracing::info!(target: "history", count, "history loaded");
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(target: "history", error = %err, "failed to load history");
                Err(err)
            }
        }
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), ApiError> {
        match self.backend.delete(id).await {
            Ok(ack) => {
                let mut state = self.state.lock();
                state.history.retain(|record| record.id != id);
                state.report_status(DELETED_MESSAGE);
                tracing::info!(target: "history", id, ack = ?ack.message, "prompt deleted");
                Ok(())
            }
            Err(err) => {
                tracing::error!(target: "history", id, error = %err, "failed to delete prompt");
                self.state.lock().report_error(DELETE_FAILED_MESSAGE);
                Err(err)
            }
        }
    }

    /// Deletes every record, but only once the user has confirmed.
    pub async fn clear(&self, confirmed: bool) -> Result<ClearOutcome, ApiError> {
        if !confirmed {
            return Ok(ClearOutcome::Cancelled);
        }
        match self.backend.clear().await {
            Ok(ack) => {
                let mut state = self.state.lock();
                state.history.clear();
                state.report_status(CLEARED_MESSAGE);
                tracing::info!(target: "history", ack = ?ack.message, "history cleared");
                Ok(ClearOutcome::Cleared)
            }
            Err(err) => {
                tracing::error!(target: "history", error = %err, "failed to clear history");
                self.state.lock().report_error(CLEAR_FAILED_MESSAGE);
                Err(err)
            }
        }
    }

    /// Brings a past entry back into the input and result slots.
    pub fn select(&self, id: RecordId) -> Option<ClassificationRecord> {
        let mut state = self.state.lock();
        let record = state.find(id).cloned()?;
        state.input = record.text.clone();
        state.result = Some(record.classification);
        state.report_status(SELECTED_MESSAGE);
        Some(record)
    }

    pub fn records(&self) -> Vec<ClassificationRecord> {
        self.state.lock().history.clone()
    }
}
