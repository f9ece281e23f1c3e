use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::info;

use crate::config::LlmConfig;
use crate::error::LlmError;

/// One system + user exchange with a chat model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn model(&self) -> &str;

    async fn chat(&self, system_prompt: &str, user_input: &str) -> Result<String, LlmError>;
}

#[derive(Clone)]
pub struct LLMClient {
    pub client: Client<OpenAIConfig>,
    pub model: String,
    pub temperature: f32,
}

impl LLMClient {
    pub fn new(api_key: String, base_url: Option<String>, model: String, temperature: f32) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url {
            config = config.with_api_base(url);
        }
        let client = Client::with_config(config);
        Self {
            client,
            model,
            temperature,
        }
    }

    pub fn from_config(config: &LlmConfig, temperature: f32) -> Self {
        Self::new(
            config.api_key.clone(),
            config.base_url.clone(),
            config.model.clone(),
            temperature,
        )
    }
}

#[async_trait]
impl ChatModel for LLMClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, system_prompt: &str, user_input: &str) -> Result<String, LlmError> {
        info!("🤖 Sending request to LLM (Model: {})...", self.model);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(self.temperature)
            .messages([
                ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessageArgs::default()
                        .content(system_prompt)
                        .build()?,
                ),
                ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(user_input)
                        .build()?,
                ),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;

        info!("🤖 LLM Response received.");

        let choice = response.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;
        Ok(choice.message.content.unwrap_or_default())
    }
}
