/// Work stages reported while preparing a preview.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    PageCounts,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageCounts => write!(f, "Counting pages"),
        }
    }
}

/// Trait for reporting progress from long-running batch work.
///
/// Implementations must be `Send + Sync` since batch steps run on rayon.
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A stage has started. `total_items` is the number of work items, if known.
    fn begin_stage(&self, _stage: Stage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
