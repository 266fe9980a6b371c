use anyhow::{Context, Result};
use reqwest::Response;
use serde::{Deserialize, Serialize};

use crate::domain::Label;

pub const PREDICT_PATH: &str = "predict";

#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    pub prediction: String,
}

pub async fn parse_response(response: Response) -> Result<Label> {
    let body: PredictResponse = response
        .json()
        .await
        .context("prediction response was not valid JSON")?;
    parse_prediction(&body.prediction)
}

pub fn parse_prediction(prediction: &str) -> Result<Label> {
    prediction
        .parse::<Label>()
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("unexpected prediction {prediction:?}"))
}
