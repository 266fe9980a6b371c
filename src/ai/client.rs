use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::domain::Label;

use super::{
    inference::{parse_response, PredictRequest, PREDICT_PATH},
    Classifier,
};

/// Delegates classification to the backend's trained model.
#[derive(Clone)]
pub struct RemoteClassifier {
    http: Client,
    base_url: Url,
}

impl RemoteClassifier {
    pub fn new(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, text: &str) -> Result<Label> {
        let url = self
            .base_url
            .join(PREDICT_PATH)
            .context("failed to build prediction endpoint")?;

        let response = self
            .http
            .post(url)
            .json(&PredictRequest { text })
            .send()
            .await?
            .error_for_status()?;

        let label = parse_response(response).await?;
        tracing::debug!(target: "classifier", %label, "remote classification");
        Ok(label)
    }
}
