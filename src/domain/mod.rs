pub mod record;
pub mod state;

pub use record::{ClassificationRecord, Label, NewRecord, RecordId};
pub use state::{SessionState, SharedState};
