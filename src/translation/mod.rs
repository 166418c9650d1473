pub mod client;
pub mod executor;
pub mod language;
pub mod prompt;

pub use client::{Translate, TranslationClient, TranslationRequest, SYSTEM_MESSAGE};
pub use executor::{TaskReport, TranslationExecutor};
pub use language::Language;
pub use prompt::{missing_placeholders, PromptTemplate, DEFAULT_TEMPLATE, FALLBACK_TEMPLATE};
