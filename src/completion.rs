//! 외부 언어 모델 완성(completion) 서비스 경계.
//!
//! 프롬프트 문자열을 넣으면 응답 텍스트를 돌려주거나 실패한다. 앱의 나머지 부분은
//! [`Completion`] 트레잇만 알고, 테스트에서는 클로저 스텁으로 바꿔 끼운다.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ApiConfig;

/// 완성 호출 실패.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API key environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("completion response contained no text")]
    EmptyResponse,

    #[error("completion rejected: {0}")]
    Rejected(String),
}

/// 프롬프트 → 응답 텍스트. 워커 스레드에서 호출되므로 Send + Sync.
pub trait Completion: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

impl<F> Completion for F
where
    F: Fn(&str) -> Result<String, CompletionError> + Send + Sync,
{
    fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self(prompt)
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [RequestMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Messages API에 단발성 요청을 보내는 blocking 클라이언트.
#[derive(Debug, Clone)]
pub struct MessagesClient {
    client: Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
    api_version: String,
    api_key_env: String,
    api_key: Option<String>,
}

impl MessagesClient {
    /// 설정으로 클라이언트를 만든다. API 키는 `api_key_env` 환경 변수에서 읽으며,
    /// 없으면 요청 시점에 [`CompletionError::MissingApiKey`]로 실패한다.
    pub fn from_config(cfg: &ApiConfig) -> Result<Self, CompletionError> {
        let api_key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!(env = %cfg.api_key_env, "no API key in environment");
        }
        Self::with_api_key(cfg, api_key)
    }

    pub fn with_api_key(cfg: &ApiConfig, api_key: Option<String>) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            client,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            api_version: cfg.api_version.clone(),
            api_key_env: cfg.api_key_env.clone(),
            api_key,
        })
    }
}

impl Completion for MessagesClient {
    fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CompletionError::MissingApiKey(self.api_key_env.clone()))?;

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [RequestMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "sending completion request");
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json()?;
        let text: String = parsed
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect();
        if text.trim().is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_has_single_user_message() {
        let body = MessagesRequest {
            model: "m",
            max_tokens: 7,
            messages: [RequestMessage {
                role: "user",
                content: "hi",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "m",
                "max_tokens": 7,
                "messages": [{"role": "user", "content": "hi"}]
            })
        );
    }

    #[test]
    fn non_text_blocks_are_ignored() {
        let raw = r#"{"content":[{"type":"thinking","thinking":"..."},{"type":"text","text":"{}"}]}"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert!(matches!(parsed.content[0], ContentBlock::Other));
        assert!(matches!(&parsed.content[1], ContentBlock::Text { text } if text == "{}"));
    }

    #[test]
    fn missing_key_fails_without_network() {
        let client = MessagesClient::with_api_key(&ApiConfig::default(), None).unwrap();
        let err = client.complete("x").unwrap_err();
        assert!(matches!(err, CompletionError::MissingApiKey(ref env) if env == "ANTHROPIC_API_KEY"));
    }

    #[test]
    fn closures_are_completions() {
        let stub = |p: &str| -> Result<String, CompletionError> { Ok(p.to_uppercase()) };
        assert_eq!(stub.complete("ok").unwrap(), "OK");
    }
}
