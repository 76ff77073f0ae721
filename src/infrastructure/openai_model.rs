// OpenAI-compatible chat completions client
use crate::application::language_model::LanguageModel;
use crate::infrastructure::config::ModelSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct OpenAiModel {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    response_format: ResponseFormat,
    stream: bool,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiModel {
    pub fn from_settings(settings: &ModelSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                RequestMessage {
                    role: "system",
                    content: system,
                },
                RequestMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format: ResponseFormat { kind: "json_object" },
            stream: false,
        };

        let start = Instant::now();
        let mut builder = self.client.post(self.completions_url()).json(&request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to send request to language model")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Language model request failed with status {}: {}", status, body);
        }

        let data = response
            .json::<ChatResponse>()
            .await
            .context("Failed to parse language model response")?;

        tracing::debug!(
            "Completion from {} took {}ms",
            self.model,
            start.elapsed().as_millis()
        );

        data.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .context("Language model returned an empty completion")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url_trims_slash() {
        let settings = ModelSettings {
            base_url: "http://localhost:4000/v1/".to_string(),
            ..ModelSettings::default()
        };
        let model = OpenAiModel::from_settings(&settings).unwrap();
        assert_eq!(model.completions_url(), "http://localhost:4000/v1/chat/completions");
    }

    #[test]
    fn test_request_wire_shape() {
        let request = ChatRequest {
            model: "m",
            messages: vec![RequestMessage {
                role: "user",
                content: "hi",
            }],
            response_format: ResponseFormat { kind: "json_object" },
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_response_with_null_content() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let settings = ModelSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..ModelSettings::default()
        };
        let model = OpenAiModel::from_settings(&settings).unwrap();
        assert!(model.complete("system", "prompt").await.is_err());
    }
}
