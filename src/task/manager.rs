use std::collections::HashMap;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::task::cancel::CancelToken;
use crate::task::descriptor::TranslationTask;
use crate::task::{TaskState, TaskStatus};
use crate::translation::{TaskReport, Translate, TranslationExecutor};
use crate::utils::{Result, TranslatorError};

struct ManagedTask {
    task: Arc<TranslationTask>,
    state: Arc<RwLock<TaskState>>,
    progress: watch::Receiver<u8>,
    worker: Option<Worker>,
}

struct Worker {
    cancel: CancelToken,
    handle: JoinHandle<Result<TaskReport>>,
}

/// In-memory registry of translation tasks, each run on its own worker thread.
pub struct TaskManager {
    executor: Arc<TranslationExecutor>,
    tasks: HashMap<Uuid, ManagedTask>,
}

impl TaskManager {
    pub fn new(translator: Arc<dyn Translate>) -> Self {
        Self {
            executor: Arc::new(TranslationExecutor::new(translator)),
            tasks: HashMap::new(),
        }
    }

    pub fn add(&mut self, task: TranslationTask) -> Uuid {
        let id = Uuid::new_v4();
        let (_, progress) = watch::channel(0);
        self.tasks.insert(
            id,
            ManagedTask {
                task: Arc::new(task),
                state: Arc::new(RwLock::new(TaskState::new(id))),
                progress,
                worker: None,
            },
        );
        id
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.tasks.keys().copied().collect()
    }

    pub fn task(&self, id: Uuid) -> Result<&TranslationTask> {
        Ok(&self.get(id)?.task)
    }

    /// Replaces a task that is not running and resets it to idle.
    pub async fn edit(&mut self, id: Uuid, task: TranslationTask) -> Result<()> {
        let managed = self.get_mut(id)?;
        if managed.is_running() {
            return Err(TranslatorError::TaskRunning(id.to_string()));
        }
        managed.task = Arc::new(task);
        managed.worker = None;
        *managed.state.write().await = TaskState::new(id);
        let (_, progress) = watch::channel(0);
        managed.progress = progress;
        Ok(())
    }

    /// Spawns the task on a dedicated blocking thread of the current runtime.
    pub async fn start(&mut self, id: Uuid) -> Result<()> {
        let runtime = Handle::try_current().map_err(|e| TranslatorError::Worker(e.to_string()))?;
        let executor = self.executor.clone();
        let managed = self.get_mut(id)?;
        if managed.is_running() {
            return Err(TranslatorError::TaskRunning(id.to_string()));
        }

        let (progress_tx, progress_rx) = watch::channel(0u8);
        managed.progress = progress_rx;
        {
            let mut state = managed.state.write().await;
            *state = TaskState::new(id);
            state.status = TaskStatus::Running;
        }

        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let task = managed.task.clone();
        let state = managed.state.clone();

        info!(task_id = %id, file = %task.source_file().display(), "Task started");

        let handle = tokio::task::spawn_blocking(move || {
            runtime.block_on(async move {
                let outcome = executor.run(&task, &progress_tx, &worker_cancel).await;

                let mut state = state.write().await;
                match &outcome {
                    Ok(report) => {
                        progress_tx.send_replace(100);
                        state.status = TaskStatus::Completed;
                        state.report = Some(report.clone());
                        info!(task_id = %id, cells = report.cells_translated, "Task completed");
                    }
                    Err(e) if e.is_cancelled() => {
                        state.status = TaskStatus::Cancelled;
                        warn!(task_id = %id, "Task cancelled");
                    }
                    Err(e) => {
                        state.status = TaskStatus::Failed;
                        state.error = Some(e.to_string());
                        error!(task_id = %id, error = %e, "Task failed");
                    }
                }
                outcome
            })
        });

        managed.worker = Some(Worker { cancel, handle });
        Ok(())
    }

    /// Asks a running task to stop before its next cell. Returns whether it was running.
    pub fn cancel(&self, id: Uuid) -> Result<bool> {
        let managed = self.get(id)?;
        match &managed.worker {
            Some(worker) if !worker.handle.is_finished() => {
                worker.cancel.cancel();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Token of the current run, for cancelling from elsewhere (e.g. a signal handler).
    pub fn cancel_token(&self, id: Uuid) -> Result<Option<CancelToken>> {
        Ok(self
            .get(id)?
            .worker
            .as_ref()
            .map(|worker| worker.cancel.clone()))
    }

    /// Cancels the task if it is running and forgets it.
    pub fn remove(&mut self, id: Uuid) -> Result<()> {
        let managed = self
            .tasks
            .remove(&id)
            .ok_or_else(|| TranslatorError::TaskNotFound(id.to_string()))?;
        if let Some(worker) = managed.worker {
            worker.cancel.cancel();
        }
        Ok(())
    }

    pub async fn status(&self, id: Uuid) -> Result<TaskState> {
        let managed = self.get(id)?;
        let mut state = managed.state.read().await.clone();
        state.progress = *managed.progress.borrow();
        Ok(state)
    }

    pub fn subscribe(&self, id: Uuid) -> Result<watch::Receiver<u8>> {
        Ok(self.get(id)?.progress.clone())
    }

    /// Waits for the task's current run and returns its outcome.
    pub async fn wait(&mut self, id: Uuid) -> Result<TaskReport> {
        let worker = self
            .get_mut(id)?
            .worker
            .take()
            .ok_or_else(|| TranslatorError::Worker(format!("task {} was not started", id)))?;

        worker
            .handle
            .await
            .map_err(|e| TranslatorError::Worker(e.to_string()))?
    }

    pub async fn wait_all(&mut self) -> Vec<(Uuid, Result<TaskReport>)> {
        let mut ids: Vec<Uuid> = self
            .tasks
            .iter()
            .filter(|(_, managed)| managed.worker.is_some())
            .map(|(id, _)| *id)
            .collect();
        ids.sort();

        let mut outcomes = Vec::with_capacity(ids.len());
        for id in ids {
            let outcome = self.wait(id).await;
            outcomes.push((id, outcome));
        }
        outcomes
    }

    fn get(&self, id: Uuid) -> Result<&ManagedTask> {
        self.tasks
            .get(&id)
            .ok_or_else(|| TranslatorError::TaskNotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut ManagedTask> {
        self.tasks
            .get_mut(&id)
            .ok_or_else(|| TranslatorError::TaskNotFound(id.to_string()))
    }
}

impl ManagedTask {
    fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.handle.is_finished())
    }
}
