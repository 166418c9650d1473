use tokio::sync::{mpsc, watch};

/// Receives overall task progress as an integer percentage.
pub trait ProgressSink: Send + Sync {
    fn report(&self, percent: u8);
}

impl<F> ProgressSink for F
where
    F: Fn(u8) + Send + Sync,
{
    fn report(&self, percent: u8) {
        self(percent)
    }
}

impl ProgressSink for watch::Sender<u8> {
    fn report(&self, percent: u8) {
        self.send_replace(percent);
    }
}

impl ProgressSink for mpsc::UnboundedSender<u8> {
    fn report(&self, percent: u8) {
        // a dropped receiver just means nobody is watching
        let _ = self.send(percent);
    }
}

/// Discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _percent: u8) {}
}

/// Counts completed cells across every target language of a task.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    completed: usize,
    total: usize,
}

impl ProgressTracker {
    pub fn new(candidates: usize, languages: usize) -> Self {
        Self {
            completed: 0,
            total: candidates * languages,
        }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Records one finished cell and returns the floored percentage.
    pub fn advance(&mut self) -> u8 {
        self.completed = (self.completed + 1).min(self.total);
        self.percent()
    }

    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (self.completed * 100 / self.total) as u8
    }
}
