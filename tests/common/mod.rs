#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use xlsx_translator::translation::TranslationRequest;
use xlsx_translator::{CancelToken, Result, Translate, TranslatorError};

/// Writes a workbook whose `Sheet1` holds `rows` starting at A1.
pub fn write_workbook(dir: &Path, name: &str, rows: &[&[&str]]) -> PathBuf {
    let path = dir.join(name);
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet
                .get_cell_mut(((c + 1) as u32, (r + 1) as u32))
                .set_value(*value);
        }
    }
    umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();
    path
}

pub fn sample_rows() -> Vec<&'static [&'static str]> {
    vec![
        &["Hello", "Test"],
        &["World", "Data"],
        &["Test", "Hello"],
        &["Data", "World"],
    ]
}

pub fn cell_value(path: &Path, coordinate: &str) -> String {
    let book = umya_spreadsheet::reader::xlsx::read(path).unwrap();
    book.get_sheet_by_name("Sheet1").unwrap().get_value(coordinate)
}

/// Returns `"<Target>:<text>"` and records each user prompt it was sent.
#[derive(Default)]
pub struct StubTranslator {
    pub prompts: Mutex<Vec<String>>,
    pub delay: Option<Duration>,
    pub fail_on: Option<(String, String)>,
    pub cancel_after: Option<(usize, CancelToken)>,
}

impl StubTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Fails when asked to translate `text` into `target`.
    pub fn failing_on(target: &str, text: &str) -> Self {
        Self {
            fail_on: Some((target.to_string(), text.to_string())),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Translate for StubTranslator {
    async fn translate(&self, request: TranslationRequest<'_>) -> Result<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let calls = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(request.user_prompt());
            prompts.len()
        };

        if let Some((n, token)) = &self.cancel_after {
            if calls >= *n {
                token.cancel();
            }
        }

        if let Some((target, text)) = &self.fail_on {
            if request.target.name() == target && request.text == text {
                return Err(TranslatorError::ApiError("API returned 503: overloaded".to_string()));
            }
        }

        Ok(format!("{}:{}", request.target, request.text))
    }
}
