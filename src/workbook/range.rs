use std::fmt;
use std::str::FromStr;

use crate::utils::{Result, TranslatorError};

/// 0-based column index to letters: 0 -> `A`, 25 -> `Z`, 26 -> `AA`.
pub fn column_letter(index: u32) -> String {
    let mut letters = Vec::new();
    let mut n = index as u64 + 1;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Letters to 0-based column index; `None` for anything that isn't `[A-Za-z]+`.
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        n = n * 26 + (c.to_ascii_uppercase() as u64 - 'A' as u64 + 1);
        if n > u32::MAX as u64 {
            return None;
        }
    }
    Some((n - 1) as u32)
}

/// 0-based row and column to an `A1` style reference.
pub fn cell_reference(row: u32, col: u32) -> String {
    format!("{}{}", column_letter(col), row + 1)
}

/// A single cell, 1-based like the spreadsheet itself. `new` clamps to `A1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    pub col: u32,
    pub row: u32,
}

impl CellRef {
    pub fn new(col: u32, row: u32) -> Self {
        Self {
            col: col.max(1),
            row: row.max(1),
        }
    }

    /// Position tuple in the `(col, row)` order the workbook API expects.
    pub fn position(&self) -> (u32, u32) {
        (self.col, self.row)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letter(self.col.saturating_sub(1)), self.row)
    }
}

impl FromStr for CellRef {
    type Err = TranslatorError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| TranslatorError::InvalidRange(s.to_string()))?;
        let (letters, digits) = s.split_at(split);

        let col = column_index(letters).ok_or_else(|| TranslatorError::InvalidRange(s.to_string()))?;
        let row: u32 = digits
            .parse()
            .map_err(|_| TranslatorError::InvalidRange(s.to_string()))?;
        if row == 0 {
            return Err(TranslatorError::InvalidRange(s.to_string()));
        }

        Ok(CellRef::new(col + 1, row))
    }
}

/// Rectangular block of cells, corners inclusive and normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    pub fn new(a: CellRef, b: CellRef) -> Self {
        Self {
            start: CellRef::new(a.col.min(b.col), a.row.min(b.row)),
            end: CellRef::new(a.col.max(b.col), a.row.max(b.row)),
        }
    }

    /// Parses `A1:B4`. Anything else, including a single cell, is `InvalidRange`.
    pub fn parse(range: &str) -> Result<Self> {
        let (start, end) = range
            .trim()
            .split_once(':')
            .ok_or_else(|| TranslatorError::InvalidRange(range.to_string()))?;

        let start: CellRef = start
            .parse()
            .map_err(|_| TranslatorError::InvalidRange(range.to_string()))?;
        let end: CellRef = end
            .parse()
            .map_err(|_| TranslatorError::InvalidRange(range.to_string()))?;

        Ok(Self::new(start, end))
    }

    pub fn contains(&self, cell: CellRef) -> bool {
        (self.start.col..=self.end.col).contains(&cell.col)
            && (self.start.row..=self.end.row).contains(&cell.row)
    }

    pub fn width(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    pub fn height(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Row by row, left to right.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        (self.start.row..=self.end.row)
            .flat_map(move |row| (self.start.col..=self.end.col).map(move |col| CellRef::new(col, row)))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl FromStr for CellRange {
    type Err = TranslatorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
