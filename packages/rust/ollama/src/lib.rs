//! Client for the local Ollama-compatible inference service.
//!
//! Two operations back the conversion pipeline:
//! - [`OllamaClient::list_models`] — model directory lookup, degrades to an
//!   empty list on any failure so the caller can present a guided empty
//!   state instead of crashing
//! - [`OllamaClient::convert`] — single-turn chat request that turns fetched
//!   HTML into Markdown; a pure pass-through with exactly one blocking call
//!   per request

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use pagemark_shared::{ModelName, PagemarkError, Result};
use pagemark_store::{ActivityLog, LogLevel};

/// User-Agent string for inference service requests.
const USER_AGENT: &str = concat!("pagemark/", env!("CARGO_PKG_VERSION"));

/// Fixed instruction prepended to the fetched content.
const CONVERT_INSTRUCTION: &str = "Convert this HTML to markdown";

// ---------------------------------------------------------------------------
// Wire types (Ollama HTTP API)
// ---------------------------------------------------------------------------

/// Response body of `GET /api/tags`.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelDescriptor>,
}

/// One installed model as reported by the listing endpoint.
#[derive(Debug, Deserialize)]
struct ModelDescriptor {
    name: String,
}

/// Request body of `POST /api/chat`.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    /// The chat endpoint streams by default; the pipeline wants one reply.
    stream: bool,
}

/// A single chat turn.
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response body of a non-streaming `POST /api/chat`.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

// ---------------------------------------------------------------------------
// OllamaClient
// ---------------------------------------------------------------------------

/// HTTP client for a locally reachable inference service.
pub struct OllamaClient {
    endpoint: String,
    client: Client,
}

impl OllamaClient {
    /// Create a client for the service at `endpoint`
    /// (e.g. `http://localhost:11434`). A trailing slash is tolerated.
    ///
    /// No request timeout is set; inference on large pages can legitimately
    /// take minutes, and the transport's own defaults apply.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PagemarkError::Inference(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Query the set of installed models, preserving service-provided order.
    ///
    /// This operation never fails: any non-200 status, transport failure, or
    /// unparseable body degrades to an empty list, with the failure recorded
    /// in the activity log. The listing only drives the model selector, and
    /// a hard failure here would block the entire interface unnecessarily.
    #[instrument(skip_all)]
    pub async fn list_models(&self, log: &ActivityLog) -> Vec<ModelName> {
        let url = format!("{}/api/tags", self.endpoint);

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "model listing request failed");
                log.record(LogLevel::Error, &format!("Error fetching models: {e}"));
                return Vec::new();
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "model listing returned non-200");
            log.record(
                LogLevel::Error,
                &format!("Failed to fetch models: {}", status.as_u16()),
            );
            return Vec::new();
        }

        match response.json::<TagsResponse>().await {
            Ok(tags) => {
                let models: Vec<ModelName> = tags
                    .models
                    .into_iter()
                    .map(|m| ModelName::new(m.name))
                    .collect();
                debug!(count = models.len(), "model listing succeeded");
                log.record(
                    LogLevel::Info,
                    &format!(
                        "Found models: [{}]",
                        models
                            .iter()
                            .map(ModelName::as_str)
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                );
                models
            }
            Err(e) => {
                warn!(error = %e, "model listing body was unparseable");
                log.record(LogLevel::Error, &format!("Error fetching models: {e}"));
                Vec::new()
            }
        }
    }

    /// Convert `cleaned_html` to Markdown with a single-turn chat request to
    /// the named model.
    ///
    /// The full content is sent whole — no chunking, truncation, or
    /// token-budget management; the service's own limits determine success.
    /// The model's reply is returned verbatim. Fails with
    /// [`PagemarkError::Inference`] on any HTTP or transport failure, or
    /// when the reply carries no usable content.
    #[instrument(skip_all, fields(model = %model, content_len = cleaned_html.len()))]
    pub async fn convert(&self, cleaned_html: &str, model: &ModelName) -> Result<String> {
        let url = format!("{}/api/chat", self.endpoint);

        let request = ChatRequest {
            model: model.as_str(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: format!("{CONVERT_INSTRUCTION}: {cleaned_html}"),
            }],
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PagemarkError::Inference(format!("chat request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PagemarkError::Inference(format!(
                "chat request returned HTTP {}",
                status.as_u16()
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| PagemarkError::Inference(format!("invalid chat response: {e}")))?;

        if chat.message.content.is_empty() {
            return Err(PagemarkError::Inference(
                "model returned no usable content".into(),
            ));
        }

        Ok(chat.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_log() -> (tempfile::TempDir, ActivityLog) {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path()).unwrap();
        (dir, log)
    }

    #[tokio::test]
    async fn list_models_preserves_service_order() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "models": [
                {"name": "mistral:latest", "size": 4109865159u64},
                {"name": "llama2:latest", "size": 3826793677u64},
            ]
        });

        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri()).unwrap();
        let (_dir, log) = test_log();
        let models = client.list_models(&log).await;

        assert_eq!(
            models,
            vec![
                ModelName::new("mistral:latest"),
                ModelName::new("llama2:latest")
            ]
        );
    }

    #[tokio::test]
    async fn list_models_degrades_to_empty_on_non_200() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri()).unwrap();
        let (_dir, log) = test_log();
        assert!(client.list_models(&log).await.is_empty());

        // The failure is recorded, not raised.
        assert!(log.tail(10).contains("Failed to fetch models: 500"));
    }

    #[tokio::test]
    async fn list_models_degrades_to_empty_when_unreachable() {
        let client = OllamaClient::new("http://127.0.0.1:1").unwrap();
        let (_dir, log) = test_log();
        assert!(client.list_models(&log).await.is_empty());
        assert!(log.tail(10).contains("Error fetching models"));
    }

    #[tokio::test]
    async fn list_models_degrades_to_empty_on_bad_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri()).unwrap();
        let (_dir, log) = test_log();
        assert!(client.list_models(&log).await.is_empty());
    }

    #[tokio::test]
    async fn convert_sends_instruction_and_returns_reply_verbatim() {
        let server = MockServer::start().await;
        let reply = serde_json::json!({
            "model": "demo-model",
            "message": {"role": "assistant", "content": "# Hi"},
            "done": true
        });

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({
                "model": "demo-model",
                "stream": false,
                "messages": [{
                    "role": "user",
                    "content": "Convert this HTML to markdown: <h1>Hi</h1>"
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply))
            .expect(1)
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri()).unwrap();
        let markdown = client
            .convert("<h1>Hi</h1>", &ModelName::new("demo-model"))
            .await
            .unwrap();

        assert_eq!(markdown, "# Hi");
    }

    #[tokio::test]
    async fn convert_fails_on_non_200() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri()).unwrap();
        let err = client
            .convert("<p>x</p>", &ModelName::new("missing-model"))
            .await
            .unwrap_err();

        assert!(matches!(err, PagemarkError::Inference(_)));
    }

    #[tokio::test]
    async fn convert_fails_on_empty_reply_content() {
        let server = MockServer::start().await;
        let reply = serde_json::json!({
            "message": {"role": "assistant", "content": ""}
        });

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri()).unwrap();
        let err = client
            .convert("<p>x</p>", &ModelName::new("demo-model"))
            .await
            .unwrap_err();

        match err {
            PagemarkError::Inference(msg) => assert!(msg.contains("no usable content")),
            other => panic!("expected Inference error, got {other:?}"),
        }
    }
}
