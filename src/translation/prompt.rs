//! Prompt templates with `{name}` placeholders.
//!
//! Custom templates must use exactly `{current_lang}`, `{target_lang}` and
//! `{text}`. A template that does not is never an error for the caller: the
//! minimal [`FALLBACK_TEMPLATE`] is rendered instead.

use thiserror::Error;

pub const DEFAULT_TEMPLATE: &str = "As a professional translator, please translate the following content from {current_lang} to {target_lang}. \
Maintain the original meaning, tone, and context while ensuring the translation is culturally appropriate. \
{field_context}\
For technical terms, use industry-standard terminology. \
For business content, maintain formal language and professional tone. \
Text to translate:\n\n{text}";

pub const FALLBACK_TEMPLATE: &str =
    "Please translate the following text from {current_lang} to {target_lang}:\n\n{text}";

pub const REQUIRED_PLACEHOLDERS: [&str; 3] = ["{current_lang}", "{target_lang}", "{text}"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("template is missing placeholders: {}", .0.join(", "))]
    MissingPlaceholders(Vec<&'static str>),

    #[error("unknown placeholder {{{0}}}")]
    UnknownPlaceholder(String),

    #[error("unbalanced brace at byte {0}")]
    UnbalancedBrace(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PromptTemplate {
    #[default]
    Default,
    Custom(String),
}

impl PromptTemplate {
    /// Blank text or the default template's own text select [`PromptTemplate::Default`].
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() || text.trim() == DEFAULT_TEMPLATE.trim() {
            PromptTemplate::Default
        } else {
            PromptTemplate::Custom(text.to_string())
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            PromptTemplate::Default => DEFAULT_TEMPLATE,
            PromptTemplate::Custom(text) => text,
        }
    }

    pub fn format(&self, current_lang: &str, target_lang: &str, text: &str, field: Option<&str>) -> String {
        match self {
            PromptTemplate::Default => {
                let field_context = field_context(field);
                render(
                    DEFAULT_TEMPLATE,
                    &[
                        ("current_lang", current_lang),
                        ("target_lang", target_lang),
                        ("field_context", &field_context),
                        ("text", text),
                    ],
                )
                .unwrap_or_else(|_| fallback(current_lang, target_lang, text))
            }
            PromptTemplate::Custom(template) => {
                match try_format_custom(template, current_lang, target_lang, text) {
                    Ok(prompt) => prompt,
                    Err(e) => {
                        tracing::warn!(error = %e, "Prompt template unusable, using fallback template");
                        fallback(current_lang, target_lang, text)
                    }
                }
            }
        }
    }
}

pub fn missing_placeholders(template: &str) -> Vec<&'static str> {
    REQUIRED_PLACEHOLDERS
        .into_iter()
        .filter(|p| !template.contains(p))
        .collect()
}

fn field_context(field: Option<&str>) -> String {
    match field.map(str::trim).filter(|f| !f.is_empty()) {
        Some(field) => format!("This content is specifically related to the {} field/industry. ", field),
        None => String::new(),
    }
}

fn try_format_custom(
    template: &str,
    current_lang: &str,
    target_lang: &str,
    text: &str,
) -> Result<String, PromptError> {
    let missing = missing_placeholders(template);
    if !missing.is_empty() {
        return Err(PromptError::MissingPlaceholders(missing));
    }
    render(
        template,
        &[
            ("current_lang", current_lang),
            ("target_lang", target_lang),
            ("text", text),
        ],
    )
}

fn fallback(current_lang: &str, target_lang: &str, text: &str) -> String {
    FALLBACK_TEMPLATE
        .replace("{current_lang}", current_lang)
        .replace("{target_lang}", target_lang)
        .replace("{text}", text)
}

/// Substitutes `{name}` from `values`; `{{` and `}}` are literal braces.
fn render(template: &str, values: &[(&str, &str)]) -> Result<String, PromptError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(pos) = rest.find(|c: char| c == '{' || c == '}') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
            offset += pos + 2;
            continue;
        }
        if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
            offset += pos + 2;
            continue;
        }
        if tail.starts_with('}') {
            return Err(PromptError::UnbalancedBrace(offset + pos));
        }

        let close = tail
            .find('}')
            .ok_or(PromptError::UnbalancedBrace(offset + pos))?;
        let name = &tail[1..close];
        let value = values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| PromptError::UnknownPlaceholder(name.to_string()))?;
        out.push_str(value);

        rest = &tail[close + 1..];
        offset += pos + close + 1;
    }
    out.push_str(rest);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_without_field() {
        let prompt = PromptTemplate::Default.format("English", "Spanish", "Hello", None);
        assert!(prompt.starts_with(
            "As a professional translator, please translate the following content from English to Spanish. "
        ));
        assert!(!prompt.contains("field/industry"));
        assert!(prompt.contains("culturally appropriate. For technical terms"));
        assert!(prompt.ends_with("Text to translate:\n\nHello"));
    }

    #[test]
    fn default_template_with_field() {
        let prompt = PromptTemplate::Default.format("English", "German", "Invoice", Some("finance"));
        assert!(prompt.contains(
            "culturally appropriate. This content is specifically related to the finance field/industry. For technical terms"
        ));
    }

    #[test]
    fn blank_field_adds_no_context() {
        let prompt = PromptTemplate::Default.format("English", "German", "Invoice", Some("  "));
        assert!(!prompt.contains("field/industry"));
    }

    #[test]
    fn custom_template_is_rendered() {
        let template = PromptTemplate::from_text("{current_lang}->{target_lang}: {text} {{raw}}");
        assert_eq!(
            template.format("English", "French", "Cat", Some("ignored")),
            "English->French: Cat {raw}"
        );
    }

    #[test]
    fn custom_template_missing_text_falls_back() {
        let template = PromptTemplate::from_text(
            "You are a professional translator. Translate the following text from {current_lang} to {target_lang}. Maintain the original meaning and tone.",
        );
        assert_eq!(
            template.format("English", "Spanish", "Hello", None),
            "Please translate the following text from English to Spanish:\n\nHello"
        );
    }

    #[test]
    fn unknown_placeholder_falls_back() {
        let template = PromptTemplate::from_text("{current_lang} {target_lang} {text} {tone}");
        assert_eq!(
            template.format("English", "Korean", "Hi there", None),
            "Please translate the following text from English to Korean:\n\nHi there"
        );
    }

    #[test]
    fn stray_brace_falls_back() {
        let template = PromptTemplate::from_text("{current_lang} {target_lang} } {text}");
        assert!(template
            .format("English", "Arabic", "Peace", None)
            .starts_with("Please translate"));
    }

    #[test]
    fn default_text_and_blank_select_default() {
        assert_eq!(PromptTemplate::from_text(DEFAULT_TEMPLATE), PromptTemplate::Default);
        assert_eq!(PromptTemplate::from_text("   "), PromptTemplate::Default);
        assert_eq!(PromptTemplate::Default.as_text(), DEFAULT_TEMPLATE);
    }

    #[test]
    fn reports_missing_placeholders() {
        assert_eq!(missing_placeholders("{text}"), vec!["{current_lang}", "{target_lang}"]);
        assert!(missing_placeholders(FALLBACK_TEMPLATE).is_empty());
        assert!(missing_placeholders(DEFAULT_TEMPLATE).is_empty());
    }

    #[test]
    fn render_reports_errors() {
        assert_eq!(
            render("{a", &[("a", "x")]),
            Err(PromptError::UnbalancedBrace(0))
        );
        assert_eq!(
            render("ok }", &[]),
            Err(PromptError::UnbalancedBrace(3))
        );
        assert_eq!(
            render("{b}", &[("a", "x")]),
            Err(PromptError::UnknownPlaceholder("b".to_string()))
        );
        assert_eq!(render("{a}{{}}", &[("a", "x")]), Ok("x{}".to_string()));
    }
}
