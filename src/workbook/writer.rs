use std::path::{Path, PathBuf};

use umya_spreadsheet::Spreadsheet;

use crate::utils::{Result, TranslatorError};
use crate::workbook::range::CellRef;

/// One translated cell, held until it is written to the output copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub coordinate: CellRef,
    pub original: String,
    pub translated: String,
}

impl TranslationResult {
    /// Value stored in the cell; comparison mode keeps the original above.
    pub fn cell_text(&self, comparison_mode: bool) -> String {
        if comparison_mode {
            format!("{}\n\n{}", self.original, self.translated)
        } else {
            self.translated.clone()
        }
    }
}

/// In-memory copy of the source workbook bound for one output path.
pub struct OutputWorkbook {
    book: Spreadsheet,
    sheet_name: String,
    path: PathBuf,
    cells_written: usize,
}

impl OutputWorkbook {
    pub fn from_source(source: &Spreadsheet, sheet_name: &str, path: impl Into<PathBuf>) -> Result<Self> {
        if source.get_sheet_by_name(sheet_name).is_none() {
            return Err(TranslatorError::SheetNotFound(sheet_name.to_string()));
        }
        Ok(Self {
            book: source.clone(),
            sheet_name: sheet_name.to_string(),
            path: path.into(),
            cells_written: 0,
        })
    }

    pub fn write_result(&mut self, result: &TranslationResult, comparison_mode: bool) -> Result<()> {
        let sheet = self
            .book
            .get_sheet_by_name_mut(&self.sheet_name)
            .ok_or_else(|| TranslatorError::SheetNotFound(self.sheet_name.clone()))?;

        let cell = sheet.get_cell_mut(result.coordinate.position());
        cell.set_value_string(result.cell_text(comparison_mode));
        if comparison_mode {
            cell.get_style_mut().get_alignment_mut().set_wrap_text(true);
        }

        self.cells_written += 1;
        Ok(())
    }

    pub fn cells_written(&self) -> usize {
        self.cells_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the copy to its path, replacing any existing file.
    pub fn save(self) -> Result<PathBuf> {
        umya_spreadsheet::writer::xlsx::write(&self.book, &self.path)?;
        tracing::debug!(path = %self.path.display(), cells = self.cells_written, "Saved workbook");
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(coordinate: &str, original: &str, translated: &str) -> TranslationResult {
        TranslationResult {
            coordinate: coordinate.parse().unwrap(),
            original: original.to_string(),
            translated: translated.to_string(),
        }
    }

    #[test]
    fn comparison_text_interleaves_original() {
        let r = result("A1", "Hello", "Hola");
        assert_eq!(r.cell_text(false), "Hola");
        assert_eq!(r.cell_text(true), "Hello\n\nHola");
    }

    #[test]
    fn unknown_sheet_is_rejected() {
        let book = umya_spreadsheet::new_file();
        let err = OutputWorkbook::from_source(&book, "Nope", "out.xlsx").err().unwrap();
        assert!(matches!(err, TranslatorError::SheetNotFound(_)));
    }

    #[test]
    fn writes_only_into_the_copy() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = umya_spreadsheet::new_file();
        source
            .get_sheet_by_name_mut("Sheet1")
            .unwrap()
            .get_cell_mut("A1")
            .set_value("Hello");

        let mut out = OutputWorkbook::from_source(&source, "Sheet1", dir.path().join("out.xlsx")).unwrap();
        out.write_result(&result("A1", "Hello", "Hola"), true).unwrap();
        assert_eq!(out.cells_written(), 1);
        let saved = out.save().unwrap();

        let src_value = source.get_sheet_by_name("Sheet1").unwrap().get_value("A1");
        assert_eq!(src_value, "Hello");

        let written = umya_spreadsheet::reader::xlsx::read(&saved).unwrap();
        let cell = written.get_sheet_by_name("Sheet1").unwrap().get_cell("A1").unwrap();
        assert_eq!(cell.get_value(), "Hello\n\nHola");
        let wrapped = cell
            .get_style()
            .get_alignment()
            .map(|a| a.get_wrap_text().clone())
            .unwrap_or(false);
        assert!(wrapped);
    }
}
