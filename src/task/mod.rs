pub mod cancel;
pub mod descriptor;
pub mod manager;
pub mod progress;

pub use cancel::CancelToken;
pub use descriptor::{TaskFile, TaskSpec, TranslationTask};
pub use manager::TaskManager;
pub use progress::{NoProgress, ProgressSink, ProgressTracker};

use crate::translation::TaskReport;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Idle,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Idle => write!(f, "idle"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
            TaskStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskState {
    pub task_id: Uuid,
    pub status: TaskStatus,
    pub progress: u8,
    pub error: Option<String>,
    pub report: Option<TaskReport>,
}

impl TaskState {
    pub fn new(task_id: Uuid) -> Self {
        Self {
            task_id,
            status: TaskStatus::Idle,
            progress: 0,
            error: None,
            report: None,
        }
    }
}
