//! Cancellation, progress reporting and parallelism for long-running
//! operations.

use core::fmt;

use enough::{Stop, StopReason, Unstoppable};

/// Receives row counts while an operation runs.
///
/// Called from worker threads when the operation runs in parallel.
pub trait Progress: Sync {
    /// A new phase with `total` units of work begins.
    fn new_phase(&self, total: usize);

    /// `units` more units are done.
    fn advance(&self, units: usize);
}

/// How an operation may spread work across threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Parallelism {
    /// Parallel for wide enough areas, unless a session requires sequential
    /// processing.
    #[default]
    Auto,
    /// Always process rows one by one, top to bottom.
    Sequential,
}

/// How an operation ended when it did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Finished,
    /// Stopped early. Rows already processed stay written.
    Cancelled(StopReason),
}

impl Completion {
    pub fn is_finished(&self) -> bool {
        matches!(self, Completion::Finished)
    }
}

static NEVER: Unstoppable = Unstoppable;

/// What an operation checks for cancellation and reports progress to.
#[derive(Clone, Copy)]
pub struct OperationContext<'a> {
    stop: &'a (dyn Stop + Sync),
    progress: Option<&'a dyn Progress>,
    parallelism: Parallelism,
}

impl<'a> OperationContext<'a> {
    pub fn new(stop: &'a (dyn Stop + Sync)) -> Self {
        Self {
            stop,
            progress: None,
            parallelism: Parallelism::Auto,
        }
    }

    /// A context that never cancels.
    pub fn unstoppable() -> OperationContext<'static> {
        OperationContext::new(&NEVER)
    }

    pub fn with_progress(mut self, progress: &'a dyn Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// `Err` with the reason once cancellation was requested.
    #[inline]
    pub fn check(&self) -> Result<(), StopReason> {
        self.stop.check()
    }

    pub fn parallelism(&self) -> Parallelism {
        self.parallelism
    }

    pub(crate) fn new_phase(&self, total: usize) {
        if let Some(progress) = self.progress {
            progress.new_phase(total);
        }
    }

    pub(crate) fn advance(&self, units: usize) {
        if let Some(progress) = self.progress {
            progress.advance(units);
        }
    }
}

impl Default for OperationContext<'static> {
    fn default() -> Self {
        OperationContext::unstoppable()
    }
}

impl fmt::Debug for OperationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationContext")
            .field("progress", &self.progress.is_some())
            .field("parallelism", &self.parallelism)
            .finish_non_exhaustive()
    }
}
