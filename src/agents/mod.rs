pub mod market_analyst;
pub mod news_hunter;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::AnalysisError;
use crate::llm::ChatModel;

pub use market_analyst::MarketAnalystAgent;
pub use news_hunter::NewsHunterAgent;

#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;
    fn system_prompt(&self) -> &str;

    /// Send `query` to the model under this agent's system prompt.
    async fn run(&self, query: &str, llm: &dyn ChatModel) -> Result<String, AnalysisError> {
        info!("🤖 [AGENT] Sending request to {} (model: {})...", self.name(), llm.model());
        let response = llm
            .chat(self.system_prompt(), query)
            .await
            .map_err(|source| AnalysisError::Llm {
                agent: self.name().to_string(),
                source,
            })?;
        info!("🤖 [AGENT] Response from {} ({} chars)", self.name(), response.len());
        debug!("🤖 [AGENT] {} said: {}", self.name(), response);
        Ok(response)
    }
}
