//! The completion provider seam

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// A remote model that answers one completion request at a time
///
/// Providers do not retry; a failed call surfaces as an [`LLMError`](crate::LLMError).
#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Short identifier such as `groq`
    fn name(&self) -> &str;
}
