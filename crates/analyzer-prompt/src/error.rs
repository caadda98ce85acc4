use thiserror::Error;

pub type Result<T> = std::result::Result<T, PromptError>;

#[derive(Error, Debug)]
pub enum PromptError {
    /// The template has no source for this language
    #[error("prompt '{name}' has no {language} variant")]
    TemplateNotFound { name: String, language: String },

    #[error("prompt '{name}' ({language}) does not compile: {detail}")]
    TemplateParseFailed {
        name: String,
        language: String,
        detail: String,
    },

    /// Strict undefined turns a missing variable into this
    #[error("prompt '{name}' failed to render: {detail}")]
    RenderError { name: String, detail: String },

    #[error("prompt '{0}' was built without any language variant")]
    NoTemplatesProvided(String),

    #[error("prompt '{0}' has neither the requested nor a fallback language")]
    NoLanguageAvailable(String),
}
