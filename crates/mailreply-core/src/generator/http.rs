use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};

use super::{GenerationRequestFailed, ReplyGenerator};
use crate::state::ReplyRequest;

#[derive(Clone)]
pub struct HttpReplyClient {
    client: Client,
    base_url: String,
}

impl HttpReplyClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn generate_url(&self) -> String {
        format!("{}/generate", self.base_url)
    }
}

#[async_trait]
impl ReplyGenerator for HttpReplyClient {
    async fn generate(&self, request: &ReplyRequest) -> Result<String, GenerationRequestFailed> {
        let url = self.generate_url();
        tracing::debug!(%url, "posting reply generation request");

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        tracing::debug!(%status, "generation endpoint responded");
        if !status.is_success() {
            return Err(GenerationRequestFailed::new(format!(
                "endpoint returned status {}",
                status
            )));
        }

        let body = response.text().await?;
        Ok(normalize_reply_body(&body))
    }
}

/// Turn a response body into reply text.
///
/// A JSON string is unwrapped, any other JSON value is serialized compactly,
/// and a body that is not JSON at all is taken verbatim.
pub fn normalize_reply_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(text)) => text,
        Ok(value) => value.to_string(),
        Err(_) => body.to_string(),
    }
}

/// Validate an endpoint base and strip trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(anyhow!("API URL is empty"));
    }

    let url = Url::parse(trimmed).with_context(|| format!("Invalid API URL: {}", trimmed))?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(anyhow!("Unsupported API URL scheme '{}': {}", other, trimmed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    type Captured = Arc<Mutex<Vec<serde_json::Value>>>;

    async fn spawn_server(status: StatusCode, body: &'static str) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new()
            .route(
                "/api/email/generate",
                post(
                    move |State(captured): State<Captured>,
                          Json(payload): Json<serde_json::Value>| async move {
                        captured.lock().unwrap().push(payload);
                        (status, body)
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        (format!("http://{}/api/email", addr), captured)
    }

    fn request(content: &str, tone: &str) -> ReplyRequest {
        ReplyRequest {
            email_content: content.to_string(),
            tone: tone.to_string(),
        }
    }

    #[test]
    fn test_normalize_plain_text() {
        assert_eq!(
            normalize_reply_body("Thanks, see you then."),
            "Thanks, see you then."
        );
    }

    #[test]
    fn test_normalize_json_string_is_unwrapped() {
        assert_eq!(normalize_reply_body("\"Sounds good!\""), "Sounds good!");
    }

    #[test]
    fn test_normalize_json_object_is_serialized() {
        assert_eq!(
            normalize_reply_body("{ \"reply\": \"Hi\" }"),
            "{\"reply\":\"Hi\"}"
        );
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:8080/api/email/").unwrap(),
            "http://localhost:8080/api/email"
        );
        assert!(normalize_base_url("").is_err());
        assert!(normalize_base_url("not a url").is_err());
        assert!(normalize_base_url("ftp://example.com").is_err());
    }

    #[tokio::test]
    async fn test_generate_posts_camel_case_payload() {
        let (base_url, captured) = spawn_server(StatusCode::OK, "Thanks, see you then.").await;
        let client = HttpReplyClient::new(&base_url, None).unwrap();

        let reply = client
            .generate(&request("Lunch tomorrow?", "Casual"))
            .await
            .unwrap();

        assert_eq!(reply, "Thanks, see you then.");
        let payloads = captured.lock().unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(
            payloads[0],
            serde_json::json!({ "emailContent": "Lunch tomorrow?", "tone": "Casual" })
        );
    }

    #[tokio::test]
    async fn test_generate_normalizes_json_body() {
        let (base_url, _captured) = spawn_server(StatusCode::OK, "{\"text\":\"Hello\"}").await;
        let client = HttpReplyClient::new(&base_url, None).unwrap();

        let reply = client.generate(&request("Hi", "")).await.unwrap();
        assert_eq!(reply, "{\"text\":\"Hello\"}");
    }

    #[tokio::test]
    async fn test_generate_fails_on_server_error() {
        let (base_url, _captured) =
            spawn_server(StatusCode::INTERNAL_SERVER_ERROR, "model overloaded").await;
        let client = HttpReplyClient::new(&base_url, None).unwrap();

        let err = client.generate(&request("Hi", "")).await.unwrap_err();
        assert!(err.reason.contains("500"));
    }

    #[tokio::test]
    async fn test_generate_fails_when_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpReplyClient::new(&format!("http://{}", addr), None).unwrap();
        assert!(client.generate(&request("Hi", "")).await.is_err());
    }
}
