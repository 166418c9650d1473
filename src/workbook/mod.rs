pub mod range;
pub mod reader;
pub mod selector;
pub mod writer;

pub use range::{cell_reference, column_index, column_letter, CellRange, CellRef};
pub use reader::{
    file_exists, find_sheet, has_supported_extension, is_valid_excel_file, list_sheets,
    open_workbook, sheet_names,
};
pub use selector::{is_symbols_only, is_translatable_text, select_candidates, should_translate, CellCandidate};
pub use writer::{OutputWorkbook, TranslationResult};
