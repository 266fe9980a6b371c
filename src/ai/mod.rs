mod client;
mod inference;
mod random;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::{AppConfig, ClassifierKind},
    domain::Label,
};

pub use client::RemoteClassifier;
pub use random::RandomClassifier;

/// Decides whether a piece of email text is spam.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Label>;
}

pub fn build_classifier(http: Client, config: &AppConfig) -> Arc<dyn Classifier> {
    match config.classifier.kind {
        ClassifierKind::Mock => Arc::new(RandomClassifier::new(config.classifier.mock_latency)),
        ClassifierKind::Remote => Arc::new(RemoteClassifier::new(http, config.api.base_url.clone())),
    }
}

#[cfg(test)]
pub struct FixedClassifier(pub Label);

#[cfg(test)]
#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(&self, _text: &str) -> Result<Label> {
        Ok(self.0)
    }
}
