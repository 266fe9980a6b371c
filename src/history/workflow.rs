use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::{
    ai::Classifier,
    api::{ApiError, HistoryBackend},
    domain::{ClassificationRecord, NewRecord, SessionState, SharedState},
};

pub const EMPTY_TEXT_MESSAGE: &str = "Please enter some text to classify.";
pub const DUPLICATE_TEXT_MESSAGE: &str = "This text already exists in history.";
pub const CLASSIFY_FAILED_MESSAGE: &str = "Classification failed. Try again.";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save prompt. Try again.";
pub const SAVED_MESSAGE: &str = "Prompt has been added to history.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("text to classify is empty")]
    EmptyText,
    #[error("text already exists in history")]
    DuplicateText,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("a classification is already in progress")]
    Busy,
    #[error("classification failed: {0:#}")]
    Classifier(anyhow::Error),
    #[error(transparent)]
    Network(#[from] ApiError),
}

fn check_submission(state: &SessionState, text: &str) -> Result<(), WorkflowError> {
    if state.pending {
        return Err(WorkflowError::Busy);
    }
    if text.is_empty() {
        return Err(ValidationError::EmptyText.into());
    }
    if state.contains_text(text) {
        return Err(ValidationError::DuplicateText.into());
    }
    Ok(())
}

/// Clears the pending flag however `submit` exits.
struct PendingGuard {
    state: SharedState,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.state.lock().pending = false;
    }
}

/// Validate, classify, persist, then record one piece of text.
#[derive(Clone)]
pub struct ClassificationWorkflow {
    state: SharedState,
    classifier: Arc<dyn Classifier>,
    backend: Arc<dyn HistoryBackend>,
}

impl ClassificationWorkflow {
    pub fn new(
        state: SharedState,
        classifier: Arc<dyn Classifier>,
        backend: Arc<dyn HistoryBackend>,
    ) -> Self {
        Self {
            state,
            classifier,
            backend,
        }
    }

    /// The checks `submit` runs before going pending, without touching state.
    pub fn precheck(&self, raw_text: &str) -> Result<(), WorkflowError> {
        check_submission(&self.state.lock(), raw_text.trim())
    }

    pub async fn submit(&self, raw_text: &str) -> Result<ClassificationRecord, WorkflowError> {
        let text = raw_text.trim().to_string();

        let _pending = {
            let mut state = self.state.lock();
            match check_submission(&state, &text) {
                Ok(()) => {}
                Err(WorkflowError::Validation(err)) => {
                    state.input = raw_text.to_string();
                    state.report_error(match err {
                        ValidationError::EmptyText => EMPTY_TEXT_MESSAGE,
                        ValidationError::DuplicateText => DUPLICATE_TEXT_MESSAGE,
                    });
                    tracing::debug!(target: "workflow", error = %err, "submission rejected");
                    return Err(err.into());
                }
                Err(err) => return Err(err),
            }
            state.input = raw_text.to_string();
            state.pending = true;
            state.result = None;
            state.clear_messages();
            PendingGuard {
                state: self.state.clone(),
            }
        };

        let classification = match self.classifier.classify(&text).await {
            Ok(label) => label,
            Err(err) => {
                tracing::error!(target: "workflow", error = %err, "classifier failed");
                self.state.lock().report_error(CLASSIFY_FAILED_MESSAGE);
                return Err(WorkflowError::Classifier(err));
            }
        };
        // Shown before the save resolves; only recorded once it succeeds.
        self.state.lock().result = Some(classification);

        let request = NewRecord {
            text,
            classification,
        };
        let saved = self.backend.save(&request).await;
        match saved {
            Ok(ack) => {
                let mut state = self.state.lock();
                let id = ack
                    .id
                    .unwrap_or_else(|| state.next_local_id(Utc::now().timestamp_millis()));
                let record = ClassificationRecord {
                    id,
                    text: request.text,
                    classification,
                };
                state.history.insert(0, record.clone());
                state.input.clear();
                state.report_status(SAVED_MESSAGE);
                tracing::info!(
                    target: "workflow",
                    id,
                    %classification,
                    ack = ?ack.message,
                    "prompt saved"
                );
                Ok(record)
            }
            Err(err) => {
                tracing::error!(target: "workflow", error = %err, "failed to save prompt");
                self.state.lock().report_error(SAVE_FAILED_MESSAGE);
                Err(err.into())
            }
        }
    }
}
