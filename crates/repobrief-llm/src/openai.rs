use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::provider::LlmProvider;

/// OpenAI-compatible `/chat/completions` backend.
///
/// Prompt parts are sent as consecutive user messages.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiProvider {
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        mut base_url: String,
        model: String,
        max_tokens: u32,
    ) -> Self {
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client,
            api_key,
            base_url,
            model,
            max_tokens,
        }
    }

    async fn send_request(&self, parts: &[String]) -> Result<String, LlmError> {
        let messages: Vec<ApiMessage<'_>> = parts
            .iter()
            .map(|p| ApiMessage {
                role: "user",
                content: p,
            })
            .collect();
        let body = ChatRequest {
            model: &self.model,
            messages: &messages,
            max_tokens: self.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.map_err(LlmError::Http)?;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }

        if !status.is_success() {
            tracing::error!("OpenAI API error {status}: {text}");
            return Err(LlmError::Other(format!(
                "OpenAI API request failed (status {status})"
            )));
        }

        let resp: OpenAiChatResponse = serde_json::from_str(&text)?;

        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or(LlmError::EmptyResponse {
                provider: "openai".into(),
            })
    }
}

impl LlmProvider for OpenAiProvider {
    async fn generate_text(&self, parts: &[String]) -> Result<String, LlmError> {
        self.send_request(parts).await
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "openai"
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ApiMessage<'a>],
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn new_trims_trailing_slashes() {
        let p = OpenAiProvider::new(
            reqwest::Client::new(),
            "k".into(),
            "https://api.example.com/v1//".into(),
            "m".into(),
            512,
        );
        assert_eq!(p.base_url, "https://api.example.com/v1");
    }

    #[tokio::test]
    async fn sends_parts_as_user_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer k"))
            .and(body_partial_json(serde_json::json!({
                "model": "m",
                "messages": [
                    {"role": "user", "content": "one"},
                    {"role": "user", "content": "two"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "answer"}}]
            })))
            .mount(&server)
            .await;

        let p = OpenAiProvider::new(reqwest::Client::new(), "k".into(), server.uri(), "m".into(), 64);
        let out = p
            .generate_text(&["one".to_owned(), "two".to_owned()])
            .await
            .unwrap();
        assert_eq!(out, "answer");
    }

    #[tokio::test]
    async fn maps_429_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let p = OpenAiProvider::new(reqwest::Client::new(), "k".into(), server.uri(), "m".into(), 64);
        let err = p.generate_text(&["x".to_owned()]).await.unwrap_err();
        assert!(matches!(err, LlmError::RateLimited));
    }
}
