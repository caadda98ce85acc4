//! Chat completion client used for the narrative analysis
//!
//! [`LLMProvider`] is the seam the dashboard depends on. A request carries a
//! model id, the conversation and sampling settings; the response carries the
//! assistant message plus token usage. The OpenAI-compatible provider
//! (feature `openai`) talks to Groq by default.

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

#[cfg(feature = "openai")]
pub mod providers;

pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;
