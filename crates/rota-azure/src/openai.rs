//! Azure OpenAI chat-completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use rota_chat::{ChatError, DeploymentInfo, GenerativeClient};
use rota_core::config::AzureOpenAiConfig;

/// Completion cap per answer; theatre queries need short responses.
const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.5;

/// Returned when the model comes back with no usable choice.
const NO_ANSWER: &str =
    "I'm sorry, I could not generate a response. Please try rephrasing your question.";

/// Generative client over an Azure OpenAI deployment.
pub struct AzureOpenAi {
    http: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
    deployment: String,
    api_version: String,
}

impl AzureOpenAi {
    pub fn new(config: &AzureOpenAiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            deployment: config.deployment.clone(),
            api_version: config.api_version.clone(),
        }
    }

    /// Build from config with environment overrides for the secrets.
    /// `AZURE_OPENAI_ENDPOINT` and `AZURE_OPENAI_API_KEY` win over the file.
    pub fn from_config_and_env(config: &AzureOpenAiConfig) -> Self {
        let mut client = Self::new(config);
        if let Ok(endpoint) = std::env::var("AZURE_OPENAI_ENDPOINT") {
            client.endpoint = Some(endpoint);
        }
        if let Ok(api_key) = std::env::var("AZURE_OPENAI_API_KEY") {
            client.api_key = Some(api_key);
        }
        client
    }

    /// The chat-completions URL, when an endpoint is configured.
    fn request_url(&self) -> Option<String> {
        self.endpoint.as_deref().map(|endpoint| {
            format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                endpoint.trim_end_matches('/'),
                self.deployment,
                self.api_version
            )
        })
    }
}

#[async_trait]
impl GenerativeClient for AzureOpenAi {
    fn is_ready(&self) -> bool {
        self.endpoint.is_some() && self.api_key.is_some()
    }

    fn deployment_info(&self) -> DeploymentInfo {
        DeploymentInfo {
            configured: self.is_ready(),
            deployment: self.deployment.clone(),
        }
    }

    async fn generate(
        &self,
        system_prompt: &str,
        context: &str,
        user_message: &str,
    ) -> Result<String, ChatError> {
        let url = self
            .request_url()
            .ok_or_else(|| ChatError::Llm("Azure OpenAI endpoint not configured".to_string()))?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ChatError::Llm("Azure OpenAI api key not configured".to_string()))?;

        let body = ChatRequest {
            messages: vec![
                Message {
                    role: "system",
                    content: format!("{}\n\nContext:\n{}", system_prompt, context),
                },
                Message {
                    role: "user",
                    content: user_message.to_string(),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        debug!(deployment = %self.deployment, "calling Azure OpenAI");
        let response = self
            .http
            .post(&url)
            .header("api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Llm(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ChatError::Llm(format!(
                "Azure OpenAI returned {}: {}",
                status, detail
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Llm(format!("malformed completion: {}", e)))?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .unwrap_or_else(|| NO_ANSWER.to_string()))
    }
}

#[derive(Serialize)]
struct ChatRequest {
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
