//! Google Gemini provider
//!
//! Talks to the `generateContent` REST method:
//! `POST {api_base}/models/{model}:generateContent`, authenticated with the
//! `x-goog-api-key` header. The persona goes in `systemInstruction`, the
//! conversation in `contents`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{persona, Config};
use crate::conversation::{Message, Role};

use super::{outbound_turns, ModelClient, ProviderError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> From<&'a Message> for Content<'a> {
    fn from(msg: &'a Message) -> Self {
        Self {
            role: Some(match msg.role {
                Role::User => "user",
                Role::Model => "model",
            }),
            parts: vec![Part { text: &msg.content }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Error response from API
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

pub struct GeminiProvider {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.api_base, &config.api_key, &config.model)
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

fn build_request(history: &[Message]) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: persona::SYSTEM_INSTRUCTION,
            }],
        },
        contents: outbound_turns(history).iter().map(Content::from).collect(),
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(body: &str) -> Result<String, ProviderError> {
    let response: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::InvalidResponse(format!("Failed to parse response: {} - Body: {}", e, body))
    })?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ProviderError::InvalidResponse(
            "No text in response".to_string(),
        ));
    }
    Ok(text)
}

#[async_trait]
impl ModelClient for GeminiProvider {
    async fn generate(&self, history: &[Message]) -> Result<String, ProviderError> {
        let request = build_request(history);
        tracing::debug!(turns = request.contents.len(), model = %self.model, "Calling Gemini");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        extract_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_request_excludes_greeting() {
        let history = vec![Message::model("greeting"), Message::user("hi")];
        let body = serde_json::to_value(build_request(&history)).unwrap();

        assert_eq!(
            body["contents"],
            json!([{ "role": "user", "parts": [{ "text": "hi" }] }])
        );
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            persona::SYSTEM_INSTRUCTION
        );
        assert!(body["systemInstruction"].get("role").is_none());
    }

    #[test]
    fn test_request_preserves_turn_order() {
        let history = vec![
            Message::model("greeting"),
            Message::user("a"),
            Message::model("b"),
            Message::model_error("sorry"),
            Message::user("c"),
        ];
        let body = serde_json::to_value(build_request(&history)).unwrap();
        let turns: Vec<(String, String)> = body["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| {
                (
                    t["role"].as_str().unwrap().to_string(),
                    t["parts"][0]["text"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            turns,
            vec![
                ("user".into(), "a".into()),
                ("model".into(), "b".into()),
                ("model".into(), "sorry".into()),
                ("user".into(), "c".into()),
            ]
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"A resistor "},{"text":"limits current."}]}}]}"#;
        assert_eq!(extract_text(body).unwrap(), "A resistor limits current.");
    }

    #[test]
    fn test_extract_text_rejects_empty_or_malformed() {
        assert!(matches!(
            extract_text(r#"{"candidates":[]}"#),
            Err(ProviderError::InvalidResponse(_))
        ));
        assert!(matches!(
            extract_text(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            Err(ProviderError::InvalidResponse(_))
        ));
        assert!(matches!(
            extract_text("not json"),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1beta", addr)
    }

    #[tokio::test]
    async fn test_generate_round_trip() {
        let seen: Arc<Mutex<Option<(Option<String>, Value)>>> = Arc::new(Mutex::new(None));
        let captured = seen.clone();
        let router = Router::new().route(
            "/v1beta/models/:action",
            post(move |headers: axum::http::HeaderMap, Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    let key = headers
                        .get("x-goog-api-key")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    *captured.lock().unwrap() = Some((key, body));
                    Json(json!({
                        "candidates": [{ "content": { "parts": [{ "text": "**LEDs** need a resistor." }] } }]
                    }))
                }
            }),
        );
        let base = spawn_stub(router).await;

        let provider = GeminiProvider::new(base, "secret", "gemini-2.5-flash");
        let history = vec![Message::model("greeting"), Message::user("hi")];
        let reply = tokio_test::assert_ok!(provider.generate(&history).await);
        assert_eq!(reply, "**LEDs** need a resistor.");

        let (key, body) = seen.lock().unwrap().take().unwrap();
        assert_eq!(key.as_deref(), Some("secret"));
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_provider_error() {
        let router = Router::new().route(
            "/v1beta/models/:action",
            post(|| async {
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" } })),
                )
            }),
        );
        let base = spawn_stub(router).await;

        let provider = GeminiProvider::new(base, "bad", "gemini-2.5-flash");
        let err = tokio_test::assert_err!(provider.generate(&[Message::user("hi")]).await);
        match err {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_generate_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = GeminiProvider::new(format!("http://{}/v1beta", addr), "k", "m");
        let err = tokio_test::assert_err!(provider.generate(&[Message::user("hi")]).await);
        assert!(matches!(err, ProviderError::RequestFailed(_)));
    }
}
