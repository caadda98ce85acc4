//! MiniJinja-based template implementation

use crate::{Language, PromptError, PromptTemplate, Result};
use minijinja::{Environment, UndefinedBehavior};

/// A prompt template backed by MiniJinja
///
/// Variants are kept in insertion order, so the fallback variant is always the
/// first one added. Rendering uses strict undefined handling: a variable the
/// caller forgot to pass is an error, not an empty string. Values are
/// interpolated verbatim (no HTML escaping).
///
/// # Examples
///
/// ```
/// use analyzer_prompt::{JinjaTemplate, Language, PromptTemplate};
/// use serde_json::json;
///
/// let template = JinjaTemplate::builder("analyzer")
///     .english("Analyze {{ symbol }}")
///     .indonesian("Analisis {{ symbol }}")
///     .build()
///     .unwrap();
///
/// let out = template.render(&Language::Indonesian, &json!({ "symbol": "BBCA.JK" })).unwrap();
/// assert_eq!(out, "Analisis BBCA.JK");
/// ```
pub struct JinjaTemplate {
    name: String,
    variants: Vec<(Language, String)>,
}

impl JinjaTemplate {
    /// Create a new template builder
    pub fn builder(name: impl Into<String>) -> JinjaTemplateBuilder {
        JinjaTemplateBuilder::new(name)
    }

    fn source(&self, lang: &Language) -> Option<&str> {
        self.variants
            .iter()
            .find(|(l, _)| l == lang)
            .map(|(_, s)| s.as_str())
    }
}

impl PromptTemplate for JinjaTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn languages(&self) -> Vec<Language> {
        self.variants.iter().map(|(l, _)| l.clone()).collect()
    }

    fn render(&self, lang: &Language, vars: &serde_json::Value) -> Result<String> {
        let source = self
            .source(lang)
            .ok_or_else(|| PromptError::TemplateNotFound {
                name: self.name.clone(),
                language: lang.code().to_string(),
            })?;

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        let value = minijinja::Value::from_serialize(vars);

        env.render_str(source, value)
            .map_err(|e| PromptError::RenderError {
                name: self.name.clone(),
                detail: e.to_string(),
            })
    }
}

impl std::fmt::Debug for JinjaTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JinjaTemplate")
            .field("name", &self.name)
            .field("languages", &self.languages())
            .finish()
    }
}

/// Builder for [`JinjaTemplate`]
pub struct JinjaTemplateBuilder {
    name: String,
    variants: Vec<(Language, String)>,
}

impl JinjaTemplateBuilder {
    /// Create a new builder with the given template name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    /// Add (or replace) the source for a language
    pub fn template(mut self, lang: Language, content: impl Into<String>) -> Self {
        let content = content.into();
        match self.variants.iter_mut().find(|(l, _)| *l == lang) {
            Some(slot) => slot.1 = content,
            None => self.variants.push((lang, content)),
        }
        self
    }

    /// Add English source
    pub fn english(self, content: impl Into<String>) -> Self {
        self.template(Language::English, content)
    }

    /// Add Indonesian source
    pub fn indonesian(self, content: impl Into<String>) -> Self {
        self.template(Language::Indonesian, content)
    }

    /// Build the template, checking that every variant parses
    pub fn build(self) -> Result<JinjaTemplate> {
        if self.variants.is_empty() {
            return Err(PromptError::NoTemplatesProvided(self.name));
        }

        let env = Environment::new();
        for (lang, content) in &self.variants {
            env.template_from_str(content)
                .map_err(|e| PromptError::TemplateParseFailed {
                    name: self.name.clone(),
                    language: lang.code().to_string(),
                    detail: e.to_string(),
                })?;
        }

        Ok(JinjaTemplate {
            name: self.name,
            variants: self.variants,
        })
    }
}
