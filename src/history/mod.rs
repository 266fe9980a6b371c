pub mod export;
pub mod store;
pub mod workflow;

pub use store::{ClearOutcome, HistoryStore};
pub use workflow::ClassificationWorkflow;
