//! Prompt templates for the stock data analyzer
//!
//! A prompt template is a named set of Jinja2 sources, one per [`Language`].
//! Rendering picks the requested language, falling back to English and then to
//! whatever variant exists.
//!
//! # Quick Start
//!
//! ```
//! use analyzer_prompt::{JinjaTemplate, Language, PromptTemplate};
//! use serde_json::json;
//!
//! let template = JinjaTemplate::builder("greeting")
//!     .english("Hello, {{ name }}!")
//!     .indonesian("Halo, {{ name }}!")
//!     .build()
//!     .unwrap();
//!
//! let en = template.render(&Language::English, &json!({ "name": "World" })).unwrap();
//! assert_eq!(en, "Hello, World!");
//!
//! let id = template.render(&Language::Indonesian, &json!({ "name": "Dunia" })).unwrap();
//! assert_eq!(id, "Halo, Dunia!");
//! ```

mod error;
mod jinja;
mod language;
mod template;

pub use error::{PromptError, Result};
pub use jinja::{JinjaTemplate, JinjaTemplateBuilder};
pub use language::Language;
pub use template::PromptTemplate;
