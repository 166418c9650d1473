pub mod config;
pub mod credentials;
pub mod errors;

pub use config::{ApiConfig, AppConfig, LoggingConfig, TranslationDefaults};
pub use credentials::{CredentialStore, API_KEY_VAR};
pub use errors::{Result, TranslatorError};

use std::path::{Path, PathBuf};

/// Percentage with one decimal place; `"0%"` before anything is done.
pub fn format_progress(completed: usize, total: usize) -> String {
    if total == 0 || completed == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", completed as f64 / total as f64 * 100.0)
}

/// `book.xlsx` + `Spanish` -> `book_Spanish.xlsx`, in the same directory.
pub fn output_path_for(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match input.extension() {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}_{}", stem, suffix),
    };
    input.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_formatting() {
        assert_eq!(format_progress(0, 10), "0%");
        assert_eq!(format_progress(10, 10), "100.0%");
        assert_eq!(format_progress(1, 3), "33.3%");
        assert_eq!(format_progress(5, 0), "0%");
    }

    #[test]
    fn output_path_inserts_suffix_before_extension() {
        assert_eq!(
            output_path_for(Path::new("/data/book.xlsx"), "Spanish"),
            PathBuf::from("/data/book_Spanish.xlsx")
        );
        assert_eq!(
            output_path_for(Path::new("report.v2.xlsm"), "German"),
            PathBuf::from("report.v2_German.xlsm")
        );
        assert_eq!(
            output_path_for(Path::new("noext"), "French"),
            PathBuf::from("noext_French")
        );
    }
}
