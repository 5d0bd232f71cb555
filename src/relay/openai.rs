//! OpenAI-compatible completions client.
//!
//! Posts to `{api_url}/completions` with bearer auth and a fixed generation
//! budget, and extracts the first candidate. Every transport, status, and
//! decode failure maps to [`BotError::Relay`] with enough detail for the
//! operator log; users only ever see the dispatcher's generic message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::CompletionConfig;
use crate::error::BotError;
use crate::relay::CompletionProvider;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

/// Relay implementation for OpenAI-compatible `/v1/completions` endpoints.
pub struct OpenAiCompletions {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl OpenAiCompletions {
    pub fn new(config: &CompletionConfig, api_key: String) -> Self {
        let endpoint = format!("{}/completions", config.api_url.trim_end_matches('/'));
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletions {
    async fn complete(&self, prompt: &str) -> Result<String, BotError> {
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| BotError::Relay(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Relay(format!("HTTP {status}: {body}")));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|err| BotError::Relay(format!("undecodable response: {err}")))?;

        let choice = completion
            .choices
            .first()
            .ok_or_else(|| BotError::Relay("response contained no choices".into()))?;
        Ok(choice.text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_expected_fields() {
        let request = CompletionRequest {
            model: "gpt-3.5-turbo-instruct",
            prompt: "hello",
            max_tokens: 150,
            temperature: 0.7,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo-instruct");
        assert_eq!(json["prompt"], "hello");
        assert_eq!(json["max_tokens"], 150);
        assert_eq!(json["temperature"], 0.7);
    }

    #[test]
    fn response_parses_first_choice() {
        let body = r#"{"id":"cmpl-1","choices":[{"text":"  hi there \n","index":0}]}"#;
        let response: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.choices[0].text.trim(), "hi there");
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = CompletionConfig {
            api_url: "https://api.openai.com/v1/".into(),
            ..CompletionConfig::default()
        };
        let relay = OpenAiCompletions::new(&config, "key".into());
        assert_eq!(relay.endpoint, "https://api.openai.com/v1/completions");
    }
}
