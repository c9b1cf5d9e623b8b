//! Greeter backed by the Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{Greeter, empty_reply_greeting, fallback_greeting};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Clone)]
pub struct GeminiGreeter {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Error)]
enum GenerateError {
    #[error("Gemini API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Gemini API returned {status}: {message}")]
    Status { status: StatusCode, message: String },
}

impl GeminiGreeter {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Points the client at another host serving the same API shape.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn prompt(sender: &str, recipient: &str) -> String {
        format!(
            "Generate a short, friendly, and casual welcome message (in Spanish) that {sender} \
             is sending to {recipient} to invite them to chat on a new app. \
             Do not use quotes. Maximum 20 words."
        )
    }

    /// Returns the first text part of the reply, or an empty string when the
    /// model produced none.
    async fn generate(&self, prompt: String) -> Result<String, GenerateError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self.client.post(url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Status {
                status,
                message: error_message(&body),
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Ok(extract_text(parsed))
    }
}

#[async_trait]
impl Greeter for GeminiGreeter {
    async fn greeting(&self, sender: &str, recipient: &str) -> String {
        match self.generate(Self::prompt(sender, recipient)).await {
            Ok(text) if !text.trim().is_empty() => {
                debug!("Generated greeting for {}", recipient);
                text.trim().to_string()
            }
            Ok(_) => empty_reply_greeting(recipient),
            Err(e) => {
                warn!("Error generating welcome message: {}", e);
                fallback_greeting(recipient)
            }
        }
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| {
            let msg = wrapper.error.message?;
            Some(match wrapper.error.status {
                Some(status) if !status.is_empty() => format!("{status}: {msg}"),
                _ => msg,
            })
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_joins_text_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"¡Hola "},{"text":"Bea!"}]}},
                              {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response), "¡Hola Bea!");
    }

    #[test]
    fn extract_without_candidates_is_empty() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(extract_text(response), "");

        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(extract_text(response), "");
    }

    #[test]
    fn error_message_prefers_structured_body() {
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "INVALID_ARGUMENT: API key not valid");
        assert_eq!(error_message("plain failure"), "plain failure");
    }

    #[test]
    fn prompt_mentions_both_names() {
        let prompt = GeminiGreeter::prompt("Ana", "Bea");
        assert!(prompt.contains("Ana") && prompt.contains("Bea"));
    }

    mod endpoint {
        use std::net::SocketAddr;

        use axum::{Json, Router, http::StatusCode, routing::post};
        use serde_json::{Value, json};

        use crate::{Greeter, GeminiGreeter};

        async fn serve(router: Router) -> SocketAddr {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, router).await.unwrap();
            });
            addr
        }

        fn greeter(addr: SocketAddr) -> GeminiGreeter {
            GeminiGreeter::new("test-key").with_base_url(format!("http://{addr}/v1beta/models/"))
        }

        #[tokio::test]
        async fn uses_generated_text() {
            let router = Router::new().route(
                "/v1beta/models/{call}",
                post(|Json(body): Json<Value>| async move {
                    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
                    assert!(prompt.contains("Bea"));
                    Json(json!({"candidates":[{"content":{"parts":[{"text":"  ¡Hola Bea, charlemos!\n"}]}}]}))
                }),
            );
            let addr = serve(router).await;

            assert_eq!(greeter(addr).greeting("Ana", "Bea").await, "¡Hola Bea, charlemos!");
        }

        #[tokio::test]
        async fn empty_reply_uses_invitation_fallback() {
            let router = Router::new().route(
                "/v1beta/models/{call}",
                post(|| async { Json(json!({"candidates":[]})) }),
            );
            let addr = serve(router).await;

            assert_eq!(
                greeter(addr).greeting("Ana", "Bea").await,
                "¡Hola Bea! He empezado a usar esta app, ¡hablemos por aquí!"
            );
        }

        #[tokio::test]
        async fn http_error_uses_short_fallback() {
            let router = Router::new().route(
                "/v1beta/models/{call}",
                post(|| async {
                    (
                        StatusCode::TOO_MANY_REQUESTS,
                        Json(json!({"error":{"message":"quota","status":"RESOURCE_EXHAUSTED"}})),
                    )
                }),
            );
            let addr = serve(router).await;

            assert_eq!(greeter(addr).greeting("Ana", "Bea").await, "¡Hola Bea! ¡Hablemos por aquí!");
        }

        #[tokio::test]
        async fn unreachable_host_uses_short_fallback() {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);

            assert_eq!(greeter(addr).greeting("Ana", "Bea").await, "¡Hola Bea! ¡Hablemos por aquí!");
        }
    }
}
