use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::task::{CancelToken, ProgressSink, ProgressTracker, TranslationTask};
use crate::translation::client::{Translate, TranslationRequest};
use crate::translation::language::Language;
use crate::utils::{Result, TranslatorError};
use crate::workbook::{
    find_sheet, open_workbook, select_candidates, CellCandidate, OutputWorkbook, TranslationResult,
};

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub candidates: usize,
    pub cells_translated: usize,
    pub outputs: Vec<(Language, PathBuf)>,
}

/// Runs one task: every target language in order, every candidate cell in order.
pub struct TranslationExecutor {
    translator: Arc<dyn Translate>,
}

impl TranslationExecutor {
    pub fn new(translator: Arc<dyn Translate>) -> Self {
        Self { translator }
    }

    /// A language's file is written only once all of its cells are translated,
    /// so an aborted run leaves complete files for earlier languages and none
    /// for the one in progress.
    pub async fn run(
        &self,
        task: &TranslationTask,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<TaskReport> {
        cancel.check()?;

        let source = open_workbook(task.source_file())?;
        let candidates = select_candidates(find_sheet(&source, task.sheet())?, task.range());

        info!(
            file = %task.source_file().display(),
            sheet = task.sheet(),
            range = %task.range(),
            candidates = candidates.len(),
            languages = task.target_languages().len(),
            "Starting translation"
        );

        let mut tracker = ProgressTracker::new(candidates.len(), task.target_languages().len());
        let mut report = TaskReport {
            candidates: candidates.len(),
            cells_translated: 0,
            outputs: Vec::with_capacity(task.target_languages().len()),
        };

        for &target in task.target_languages() {
            let mut output = OutputWorkbook::from_source(&source, task.sheet(), task.output_path(target))?;

            for candidate in &candidates {
                cancel.check()?;

                let result = self.translate_cell(task, target, candidate).await?;
                output.write_result(&result, task.comparison_mode())?;
                report.cells_translated += 1;

                let percent = tracker.advance();
                debug!(cell = %candidate.coordinate, language = %target, progress = percent, "Cell translated");
                progress.report(percent);
            }

            let path = output.save()?;
            info!(language = %target, path = %path.display(), "Wrote translated workbook");
            report.outputs.push((target, path));
        }

        Ok(report)
    }

    async fn translate_cell(
        &self,
        task: &TranslationTask,
        target: Language,
        candidate: &CellCandidate,
    ) -> Result<TranslationResult> {
        let request = TranslationRequest {
            text: &candidate.text,
            source: task.source_language(),
            target,
            prompt: task.prompt(),
            field: task.field(),
        };

        match self.translator.translate(request).await {
            Ok(translated) => Ok(TranslationResult {
                coordinate: candidate.coordinate,
                original: candidate.text.clone(),
                translated,
            }),
            Err(e) => {
                error!(cell = %candidate.coordinate, text = %candidate.text, error = %e, "Translation failed");
                Err(TranslatorError::TranslationFailed {
                    coordinate: candidate.coordinate.to_string(),
                    text: candidate.text.clone(),
                    source: Box::new(e),
                })
            }
        }
    }
}
