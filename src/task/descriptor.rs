use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::translation::{Language, PromptTemplate};
use crate::utils::{output_path_for, Result, TranslatorError};
use crate::workbook::{has_supported_extension, CellRange};

/// Raw task fields as they appear in a task file or on the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub file: PathBuf,
    pub sheet: String,
    pub cell_range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_language: Option<String>,
    pub target_languages: Vec<String>,
    #[serde(default)]
    pub comparison_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// `[[task]]` entries of a TOML task file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFile {
    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskSpec>,
}

impl TaskFile {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| TranslatorError::ConfigError(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

/// A validated translation job. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationTask {
    source_file: PathBuf,
    sheet: String,
    range: CellRange,
    source_language: Language,
    target_languages: Vec<Language>,
    comparison_mode: bool,
    prompt: PromptTemplate,
    field: Option<String>,
}

impl TranslationTask {
    /// Validates `spec`; `default_source` applies when it names no source language.
    pub fn from_spec(spec: TaskSpec, default_source: Language) -> Result<Self> {
        if !has_supported_extension(&spec.file) {
            return Err(TranslatorError::InvalidTask(format!(
                "{} is not an .xlsx/.xlsm workbook",
                spec.file.display()
            )));
        }

        let sheet = spec.sheet.trim().to_string();
        if sheet.is_empty() {
            return Err(TranslatorError::InvalidTask("sheet name is required".to_string()));
        }

        if spec.cell_range.trim().is_empty() {
            return Err(TranslatorError::InvalidTask(
                "cell range is required, e.g. 'A1:B4'".to_string(),
            ));
        }
        let range = CellRange::parse(&spec.cell_range)?;

        let source_language = match spec.current_language.as_deref() {
            Some(name) => name.parse()?,
            None => default_source,
        };

        if spec.target_languages.is_empty() {
            return Err(TranslatorError::InvalidTask(
                "at least one target language is required".to_string(),
            ));
        }
        let mut target_languages: Vec<Language> = Vec::with_capacity(spec.target_languages.len());
        for name in &spec.target_languages {
            let lang: Language = name.parse()?;
            if target_languages.contains(&lang) {
                return Err(TranslatorError::InvalidTask(format!(
                    "target language {} listed twice",
                    lang
                )));
            }
            target_languages.push(lang);
        }

        let prompt = spec
            .prompt
            .as_deref()
            .map(PromptTemplate::from_text)
            .unwrap_or_default();

        let field = spec
            .field
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());

        Ok(Self {
            source_file: spec.file,
            sheet,
            range,
            source_language,
            target_languages,
            comparison_mode: spec.comparison_mode,
            prompt,
            field,
        })
    }

    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn range(&self) -> &CellRange {
        &self.range
    }

    pub fn source_language(&self) -> Language {
        self.source_language
    }

    pub fn target_languages(&self) -> &[Language] {
        &self.target_languages
    }

    pub fn comparison_mode(&self) -> bool {
        self.comparison_mode
    }

    pub fn prompt(&self) -> &PromptTemplate {
        &self.prompt
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// `<dir>/<stem>_<Language><ext>` next to the source file.
    pub fn output_path(&self, target: Language) -> PathBuf {
        output_path_for(&self.source_file, target.name())
    }
}

impl TryFrom<TaskSpec> for TranslationTask {
    type Error = TranslatorError;

    fn try_from(spec: TaskSpec) -> Result<Self> {
        Self::from_spec(spec, Language::English)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> TaskSpec {
        TaskSpec {
            file: PathBuf::from("/data/test.xlsx"),
            sheet: "Sheet1".to_string(),
            cell_range: "A1:B2".to_string(),
            current_language: Some("English".to_string()),
            target_languages: vec!["Spanish".to_string(), "french".to_string()],
            comparison_mode: false,
            prompt: None,
            field: Some("  ".to_string()),
        }
    }

    #[test]
    fn valid_spec_builds_task() {
        let task = TranslationTask::try_from(spec()).unwrap();
        assert_eq!(task.sheet(), "Sheet1");
        assert_eq!(task.range().to_string(), "A1:B2");
        assert_eq!(task.source_language(), Language::English);
        assert_eq!(task.target_languages(), &[Language::Spanish, Language::French]);
        assert_eq!(task.prompt(), &PromptTemplate::Default);
        assert_eq!(task.field(), None);
        assert_eq!(
            task.output_path(Language::Spanish),
            PathBuf::from("/data/test_Spanish.xlsx")
        );
    }

    #[test]
    fn missing_source_language_uses_default() {
        let mut s = spec();
        s.current_language = None;
        let task = TranslationTask::from_spec(s, Language::German).unwrap();
        assert_eq!(task.source_language(), Language::German);
    }

    #[test]
    fn malformed_range_is_rejected() {
        let mut s = spec();
        s.cell_range = "InvalidRange".to_string();
        let err = TranslationTask::try_from(s).unwrap_err();
        assert!(matches!(err, TranslatorError::InvalidRange(r) if r == "InvalidRange"));
    }

    #[test]
    fn empty_range_is_rejected() {
        let mut s = spec();
        s.cell_range = " ".to_string();
        assert!(matches!(
            TranslationTask::try_from(s),
            Err(TranslatorError::InvalidTask(_))
        ));
    }

    #[test]
    fn bad_inputs_are_rejected() {
        let mut s = spec();
        s.file = PathBuf::from("notes.csv");
        assert!(matches!(TranslationTask::try_from(s), Err(TranslatorError::InvalidTask(_))));

        let mut s = spec();
        s.sheet = String::new();
        assert!(matches!(TranslationTask::try_from(s), Err(TranslatorError::InvalidTask(_))));

        let mut s = spec();
        s.target_languages.clear();
        assert!(matches!(TranslationTask::try_from(s), Err(TranslatorError::InvalidTask(_))));

        let mut s = spec();
        s.target_languages.push("Elvish".to_string());
        assert!(matches!(
            TranslationTask::try_from(s),
            Err(TranslatorError::UnsupportedLanguage(_))
        ));

        let mut s = spec();
        s.target_languages.push("SPANISH".to_string());
        assert!(matches!(TranslationTask::try_from(s), Err(TranslatorError::InvalidTask(_))));
    }

    #[test]
    fn task_file_parses_multiple_tasks() {
        let file = TaskFile::from_toml(
            r#"
            [[task]]
            file = "a.xlsx"
            sheet = "Sheet1"
            cell_range = "A1:C10"
            target_languages = ["Spanish"]

            [[task]]
            file = "b.xlsx"
            sheet = "Menu"
            cell_range = "B2:B20"
            current_language = "French"
            target_languages = ["English", "German"]
            comparison_mode = true
            field = "restaurant"
            prompt = "From {current_lang} to {target_lang}: {text}"
            "#,
        )
        .unwrap();

        assert_eq!(file.tasks.len(), 2);
        assert!(!file.tasks[0].comparison_mode);
        assert_eq!(file.tasks[1].field.as_deref(), Some("restaurant"));

        let task = TranslationTask::try_from(file.tasks[1].clone()).unwrap();
        assert!(task.comparison_mode());
        assert!(matches!(task.prompt(), PromptTemplate::Custom(_)));
    }
}
