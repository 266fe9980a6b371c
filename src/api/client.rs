use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

use crate::{
    config::ApiConfig,
    domain::{ClassificationRecord, NewRecord, RecordId},
};

use super::{Ack, ApiError, HistoryBackend};

pub const SAVE_PATH: &str = "api/savePrompt";
pub const LIST_PATH: &str = "api/getPrompts";
pub const DELETE_PATH: &str = "api/deletePrompt";
pub const CLEAR_PATH: &str = "api/clearPrompts";

#[derive(Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(http: Client, config: &ApiConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
        }
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    pub fn delete_endpoint(&self, id: RecordId) -> Result<Url, ApiError> {
        self.endpoint(&format!("{DELETE_PATH}/{id}"))
    }
}

#[async_trait]
impl HistoryBackend for HttpBackend {
    async fn save(&self, record: &NewRecord) -> Result<Ack, ApiError> {
        let url = self.endpoint(SAVE_PATH)?;
        tracing::debug!(target: "api", %url, chars = record.text.chars().count(), "saving prompt");
        let response = self.http.post(url).json(record).send().await?;
        decode(response).await
    }

    async fn list(&self) -> Result<Vec<ClassificationRecord>, ApiError> {
        let url = self.endpoint(LIST_PATH)?;
        tracing::debug!(target: "api", %url, "listing prompts");
        let response = self.http.get(url).send().await?;
        decode(response).await
    }

    async fn delete(&self, id: RecordId) -> Result<Ack, ApiError> {
        let url = self.delete_endpoint(id)?;
        tracing::debug!(target: "api", %url, id, "deleting prompt");
        let response = self.http.delete(url).send().await?;
        decode(response).await
    }

    async fn clear(&self) -> Result<Ack, ApiError> {
        let url = self.endpoint(CLEAR_PATH)?;
        tracing::debug!(target: "api", %url, "clearing prompts");
        let response = self.http.delete(url).send().await?;
        decode(response).await
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let body = response.text().await.unwrap_or_default();
    Err(rejection(status.as_u16(), &body))
}

/// Builds the error for a non-success status, preferring the backend's
/// `{"error": ...}` message over the raw body.
fn rejection(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.error)
        .unwrap_or_else(|_| body.trim().to_string());
    ApiError::Rejected { status, message }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        sync::oneshot,
    };

    use super::*;
    use crate::domain::Label;

    fn backend(base: &str) -> HttpBackend {
        let config = ApiConfig {
            base_url: Url::parse(base).unwrap(),
            request_timeout: None,
        };
        HttpBackend::new(Client::new(), &config)
    }

    #[test]
    fn endpoints_join_under_base() {
        let backend = backend("http://localhost:8000/");
        assert_eq!(
            backend.endpoint(SAVE_PATH).unwrap().as_str(),
            "http://localhost:8000/api/savePrompt"
        );
        assert_eq!(
            backend.endpoint(LIST_PATH).unwrap().as_str(),
            "http://localhost:8000/api/getPrompts"
        );
        assert_eq!(
            backend.endpoint(CLEAR_PATH).unwrap().as_str(),
            "http://localhost:8000/api/clearPrompts"
        );
        assert_eq!(
            backend.delete_endpoint(42).unwrap().as_str(),
            "http://localhost:8000/api/deletePrompt/42"
        );
    }

    #[test]
    fn endpoints_keep_base_path_prefix() {
        let backend = backend("https://example.com/classifier/");
        assert_eq!(
            backend.endpoint(LIST_PATH).unwrap().as_str(),
            "https://example.com/classifier/api/getPrompts"
        );
    }

    #[test]
    fn rejection_prefers_error_field() {
        match rejection(404, r#"{"error": "Prompt not found"}"#) {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Prompt not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejection_falls_back_to_raw_body() {
        match rejection(502, "  Bad Gateway\n") {
            ApiError::Rejected { message, .. } => assert_eq!(message, "Bad Gateway"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// Answers exactly one request with `status` and a JSON `body`, handing
    /// back the request head it received.
    async fn respond_once(
        status: &'static str,
        body: &'static str,
    ) -> (HttpBackend, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (head_tx, head_rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let mut read = 0;
            while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf[read..]).await.unwrap();
                if n == 0 {
                    break;
                }
                read += n;
            }
            let _ = head_tx.send(String::from_utf8_lossy(&buf[..read]).into_owned());
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        (backend(&format!("http://{addr}/")), head_rx)
    }

    #[tokio::test]
    async fn list_decodes_records_in_backend_order() {
        let (backend, head) = respond_once(
            "200 OK",
            r#"[{"id": 1, "text": "hi", "classification": "Ham"},
                {"id": 2, "text": "win $$$", "classification": "Spam"}]"#,
        )
        .await;

        let records = backend.list().await.unwrap();
        assert_eq!(
            records,
            vec![
                ClassificationRecord {
                    id: 1,
                    text: "hi".into(),
                    classification: Label::Ham,
                },
                ClassificationRecord {
                    id: 2,
                    text: "win $$$".into(),
                    classification: Label::Spam,
                },
            ]
        );
        assert!(head.await.unwrap().starts_with("GET /api/getPrompts "));
    }

    #[tokio::test]
    async fn delete_not_found_carries_backend_message() {
        let (backend, head) = respond_once("404 Not Found", r#"{"error": "Prompt not found"}"#).await;

        match backend.delete(9).await {
            Err(ApiError::Rejected { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Prompt not found");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(head.await.unwrap().starts_with("DELETE /api/deletePrompt/9 "));
    }

    #[tokio::test]
    async fn unknown_label_fails_the_whole_list() {
        let (backend, _) = respond_once(
            "200 OK",
            r#"[{"id": 1, "text": "hi", "classification": "Ham"},
                {"id": 2, "text": "odd", "classification": "Unsure"}]"#,
        )
        .await;

        assert!(matches!(backend.list().await, Err(ApiError::Request(_))));
    }

    #[tokio::test]
    async fn clear_accepts_message_ack() {
        let (backend, head) = respond_once("200 OK", r#"{"message": "All prompts deleted"}"#).await;
        let ack = backend.clear().await.unwrap();
        assert_eq!(ack.message.as_deref(), Some("All prompts deleted"));
        assert!(head.await.unwrap().starts_with("DELETE /api/clearPrompts "));
    }

    #[test]
    fn ack_tolerates_message_only_bodies() {
        let ack: Ack = serde_json::from_str(r#"{"message": "Prompt saved successfully!"}"#).unwrap();
        assert_eq!(ack.message.as_deref(), Some("Prompt saved successfully!"));
        assert_eq!(ack.id, None);
    }
}
