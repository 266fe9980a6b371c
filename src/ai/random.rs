use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use tokio::time::sleep;

use crate::domain::Label;

use super::Classifier;

/// Placeholder model: ignores the text and flips a fair coin after an
/// artificial delay.
pub struct RandomClassifier {
    latency: Duration,
}

impl RandomClassifier {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl Classifier for RandomClassifier {
    async fn classify(&self, _text: &str) -> Result<Label> {
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
        let label = if rand::rng().random_bool(0.5) {
            Label::Spam
        } else {
            Label::Ham
        };
        tracing::debug!(target: "classifier", %label, "mock classification");
        Ok(label)
    }
}
