use std::sync::OnceLock;

use regex::Regex;
use umya_spreadsheet::{Cell, Worksheet};

use crate::workbook::range::{CellRange, CellRef};

fn symbols_only_re() -> &'static Regex {
    static SYMBOLS_RE: OnceLock<Regex> = OnceLock::new();
    SYMBOLS_RE.get_or_init(|| {
        Regex::new(r"^[\d\s.,:;+=(){}/|!@#$%&*\[\]\\\-\^]*$")
            .expect("symbols-only regex must compile")
    })
}

const MIN_TEXT_CHARS: usize = 2;

/// A cell that passed the filter and will be sent for translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellCandidate {
    pub coordinate: CellRef,
    /// Trimmed cell text.
    pub text: String,
}

/// Digits, whitespace and punctuation only.
pub fn is_symbols_only(text: &str) -> bool {
    symbols_only_re().is_match(text)
}

pub fn is_translatable_text(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && !is_symbols_only(text) && text.chars().count() >= MIN_TEXT_CHARS
}

pub fn should_translate(cell: &Cell) -> bool {
    let value = cell.get_value();
    if value.is_empty() {
        return false;
    }

    // numbers, booleans and error values
    if matches!(cell.get_cell_value().get_data_type(), "n" | "b" | "e") {
        return false;
    }

    if cell.is_formula() {
        return false;
    }

    is_translatable_text(&value)
}

/// Candidates inside `range`, row by row and left to right.
pub fn select_candidates(sheet: &Worksheet, range: &CellRange) -> Vec<CellCandidate> {
    range
        .cells()
        .filter_map(|coordinate| {
            let cell = sheet.get_cell(coordinate.position())?;
            if !should_translate(cell) {
                return None;
            }
            Some(CellCandidate {
                coordinate,
                text: cell.get_value().trim().to_string(),
            })
        })
        .collect()
}
