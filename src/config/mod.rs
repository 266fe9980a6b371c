pub mod env;
mod loader;

pub use env::{ApiConfig, AppConfig, ClassifierKind, DirectoryConfig};
pub use loader::load_config;
