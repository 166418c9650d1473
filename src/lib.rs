pub mod task;
pub mod translation;
pub mod utils;
pub mod workbook;

pub use task::{CancelToken, ProgressSink, TaskManager, TaskSpec, TaskState, TaskStatus, TranslationTask};
pub use translation::{Language, PromptTemplate, TaskReport, Translate, TranslationClient, TranslationExecutor};
pub use utils::{AppConfig, CredentialStore, Result, TranslatorError};
pub use workbook::{CellCandidate, CellRange, CellRef, TranslationResult};
