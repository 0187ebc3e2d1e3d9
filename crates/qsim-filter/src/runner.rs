//! Background processing of filter lists.
//!
//! Every [`FilterRunner::submit`] bumps an execution counter and processes the
//! list on a worker thread. Results from runs that were superseded before
//! they finished are dropped when polled, so a caller only ever sees the
//! output belonging to the latest submission.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use qsim_stats::StatisticsSource;

use crate::format::FormatOptions;
use crate::list::FilterList;

/// Statistics shared with worker threads.
pub type SharedStatistics = Arc<dyn StatisticsSource + Send + Sync>;

/// Output of one background run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterUpdate {
    pub execution: u64,
    pub output: String,
}

/// Runs filter lists off the calling thread.
#[derive(Debug)]
pub struct FilterRunner {
    execution: Arc<AtomicU64>,
    sender: Sender<FilterUpdate>,
    receiver: Receiver<FilterUpdate>,
}

impl Default for FilterRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterRunner {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            execution: Arc::new(AtomicU64::new(0)),
            sender,
            receiver,
        }
    }

    /// Starts processing `list` and returns the execution number of the run.
    pub fn submit(&self, list: FilterList, stats: SharedStatistics, options: FormatOptions) -> u64 {
        let execution = self.execution.fetch_add(1, Ordering::SeqCst) + 1;
        let counter = Arc::clone(&self.execution);
        let sender = self.sender.clone();

        std::thread::spawn(move || {
            if counter.load(Ordering::SeqCst) != execution {
                tracing::debug!(execution, "filter run superseded before start");
                return;
            }
            let output = list.process(stats.as_ref(), &options);
            // The receiver is gone once the runner is dropped.
            let _ = sender.send(FilterUpdate { execution, output });
        });

        execution
    }

    /// Execution number of the latest submission (0 before the first one).
    pub fn current_execution(&self) -> u64 {
        self.execution.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, execution: u64) -> bool {
        execution == self.current_execution()
    }

    /// Drains finished runs and returns the result of the latest submission,
    /// if it has arrived.
    pub fn poll_latest(&self) -> Option<FilterUpdate> {
        let mut latest = None;
        while let Ok(update) = self.receiver.try_recv() {
            if let Some(update) = self.keep_current(update) {
                latest = Some(update);
            }
        }
        latest
    }

    /// Blocks until the latest submission finishes or `timeout` elapses.
    pub fn wait_latest(&self, timeout: Duration) -> Option<FilterUpdate> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(update) => {
                    if let Some(update) = self.keep_current(update) {
                        return Some(update);
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    fn keep_current(&self, update: FilterUpdate) -> Option<FilterUpdate> {
        if self.is_current(update.execution) {
            Some(update)
        } else {
            tracing::debug!(
                execution = update.execution,
                current = self.current_execution(),
                "discarding stale filter result"
            );
            None
        }
    }
}
