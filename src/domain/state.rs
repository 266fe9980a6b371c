use std::sync::Arc;

use parking_lot::Mutex;

use super::record::{ClassificationRecord, Label, RecordId};

pub type SharedState = Arc<Mutex<SessionState>>;

/// Everything the console renders: the input buffer, the last displayed
/// classification, the pending flag, messages and the local history mirror
/// (most recent first).
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub input: String,
    pub result: Option<Label>,
    pub pending: bool,
    pub error_message: Option<String>,
    pub status_message: Option<String>,
    pub history: Vec<ClassificationRecord>,
}

impl SessionState {
    pub fn shared() -> SharedState {
        Arc::new(Mutex::new(Self::default()))
    }

    pub fn contains_text(&self, text: &str) -> bool {
        self.history.iter().any(|record| record.text == text)
    }

    pub fn find(&self, id: RecordId) -> Option<&ClassificationRecord> {
        self.history.iter().find(|record| record.id == id)
    }

    pub fn report_error(&mut self, message: impl Into<String>) {
        self.status_message = None;
        self.error_message = Some(message.into());
    }

    pub fn report_status(&mut self, message: impl Into<String>) {
        self.error_message = None;
        self.status_message = Some(message.into());
    }

    pub fn clear_messages(&mut self) {
        self.error_message = None;
        self.status_message = None;
    }

    /// Id for a locally inserted record: the wall clock in milliseconds, kept
    /// strictly above every id already in history.
    pub fn next_local_id(&self, now_millis: RecordId) -> RecordId {
        let floor = self
            .history
            .iter()
            .map(|record| record.id)
            .max()
            .map_or(RecordId::MIN, |max| max.saturating_add(1));
        now_millis.max(floor)
    }
}
