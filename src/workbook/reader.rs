use std::path::Path;

use umya_spreadsheet::{Spreadsheet, Worksheet};

use crate::utils::{Result, TranslatorError};

const SUPPORTED_EXTENSIONS: [&str; 2] = ["xlsx", "xlsm"];

pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Exists and has a workbook extension we can rewrite.
pub fn is_valid_excel_file(path: &Path) -> bool {
    file_exists(path) && has_supported_extension(path)
}

pub fn open_workbook(path: &Path) -> Result<Spreadsheet> {
    if !file_exists(path) {
        return Err(TranslatorError::FileNotFound(path.display().to_string()));
    }
    Ok(umya_spreadsheet::reader::xlsx::read(path)?)
}

pub fn sheet_names(book: &Spreadsheet) -> Vec<String> {
    book.get_sheet_collection()
        .iter()
        .map(|sheet| sheet.get_name().to_string())
        .collect()
}

pub fn list_sheets(path: &Path) -> Result<Vec<String>> {
    let book = open_workbook(path)?;
    Ok(sheet_names(&book))
}

pub fn find_sheet<'a>(book: &'a Spreadsheet, name: &str) -> Result<&'a Worksheet> {
    book.get_sheet_by_name(name)
        .ok_or_else(|| TranslatorError::SheetNotFound(name.to_string()))
}
