use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{ClassificationRecord, NewRecord, RecordId};

use super::{Ack, ApiError, HistoryBackend};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Save(NewRecord),
    List,
    Delete(RecordId),
    Clear,
}

/// In-memory backend that keeps records in insertion order and logs every
/// call it receives.
#[derive(Default)]
pub struct FakeBackend {
    records: Mutex<Vec<ClassificationRecord>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<RecordId>,
    failing: Mutex<bool>,
    ack_id: Mutex<Option<RecordId>>,
}

impl FakeBackend {
    pub fn with_records(records: Vec<ClassificationRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self {
            records: Mutex::new(records),
            next_id: Mutex::new(next_id),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    /// Makes subsequent saves echo `id` in their acknowledgement.
    pub fn set_ack_id(&self, id: Option<RecordId>) {
        *self.ack_id.lock() = id;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn records(&self) -> Vec<ClassificationRecord> {
        self.records.lock().clone()
    }

    fn enter(&self, call: Call) -> Result<(), ApiError> {
        self.calls.lock().push(call);
        if *self.failing.lock() {
            return Err(ApiError::Rejected {
                status: 503,
                message: "backend unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl HistoryBackend for FakeBackend {
    async fn save(&self, record: &NewRecord) -> Result<Ack, ApiError> {
        self.enter(Call::Save(record.clone()))?;
        let id = {
            let mut next = self.next_id.lock();
            let id = (*next).max(1);
            *next = id + 1;
            id
        };
        self.records.lock().push(ClassificationRecord {
            id,
            text: record.text.clone(),
            classification: record.classification,
        });
        Ok(Ack {
            message: Some("Prompt saved successfully!".into()),
            id: *self.ack_id.lock(),
        })
    }

    async fn list(&self) -> Result<Vec<ClassificationRecord>, ApiError> {
        self.enter(Call::List)?;
        Ok(self.records())
    }

    async fn delete(&self, id: RecordId) -> Result<Ack, ApiError> {
        self.enter(Call::Delete(id))?;
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(ApiError::Rejected {
                status: 404,
                message: "Prompt not found".into(),
            });
        }
        Ok(Ack {
            message: Some("Prompt deleted".into()),
            id: None,
        })
    }

    async fn clear(&self) -> Result<Ack, ApiError> {
        self.enter(Call::Clear)?;
        self.records.lock().clear();
        Ok(Ack {
            message: Some("All prompts deleted".into()),
            id: None,
        })
    }
}
