//! Narrative analysis through a completion endpoint

use crate::config::LlmSettings;
use crate::error::Result;
use crate::prompts;
use analyzer_llm::{CompletionRequest, LLMProvider, Message};
use analyzer_prompt::{JinjaTemplate, Language, PromptTemplate};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Turns the technical and fundamental text blocks into a model-written narrative
pub struct NarrativeAnalyzer {
    provider: Arc<dyn LLMProvider>,
    settings: LlmSettings,
    language: Language,
    template: JinjaTemplate,
}

impl NarrativeAnalyzer {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        settings: &LlmSettings,
        language: Language,
    ) -> Result<Self> {
        Ok(Self {
            provider,
            settings: settings.clone(),
            language,
            template: prompts::narrative_analysis()?,
        })
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Render the analysis prompt; same inputs always give the same prompt
    pub fn build_prompt(&self, technical_data: &str, fundamental_data: &str) -> Result<String> {
        let vars = json!({
            "technical_data": technical_data,
            "fundamental_data": fundamental_data,
        });
        Ok(self.template.render_with_fallback(&self.language, &vars)?)
    }

    /// One completion call; the reply text is returned as is
    #[instrument(skip_all, fields(model = %self.settings.model))]
    pub async fn analyze(&self, technical_data: &str, fundamental_data: &str) -> Result<String> {
        let prompt = self.build_prompt(technical_data, fundamental_data)?;
        debug!("Narrative prompt is {} bytes", prompt.len());

        let request = CompletionRequest::builder(self.settings.model.clone())
            .add_message(Message::user(prompt))
            .maybe_max_tokens(self.settings.max_tokens)
            .maybe_temperature(self.settings.temperature)
            .build();

        let response = self.provider.complete(request).await?;
        info!(
            "Narrative received ({} tokens)",
            response.usage.total()
        );

        Ok(response.text().to_string())
    }
}
