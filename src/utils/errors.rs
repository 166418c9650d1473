use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslatorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] umya_spreadsheet::XlsxError),

    #[error("Invalid cell range '{0}'. Please use a format like 'A1:B4'")]
    InvalidRange(String),

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Translation failed for cell {coordinate} ('{text}'): {source}")]
    TranslationFailed {
        coordinate: String,
        text: String,
        #[source]
        source: Box<TranslatorError>,
    },

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Task is already running: {0}")]
    TaskRunning(String),

    #[error("Task worker error: {0}")]
    Worker(String),

    #[error("Task was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, TranslatorError>;

impl TranslatorError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TranslatorError::Cancelled)
    }
}
