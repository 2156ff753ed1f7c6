use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by strategies and collaborators.
///
/// Strategies never retry internally; every variant is either propagated to
/// the harness boundary (which logs it and moves on to the next strategy) or
/// reported as a documented undercount.
#[derive(Debug, Error)]
pub enum Error {
    /// The corpus source could not be opened or read.
    #[error("failed to read corpus from {}: {source}", path.display())]
    Corpus {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A run stopped mid-corpus. Carries the number of pages that were fully
    /// counted before the stop, so the report can show the true partial total.
    #[error("run halted after {pages_processed} pages: {source}")]
    Halted {
        pages_processed: u64,
        #[source]
        source: Box<Error>,
    },

    /// A worker or consumer thread panicked.
    #[error("worker thread panicked: {0}")]
    Panicked(String),

    /// A spawned async task could not be joined.
    #[error("task join failed: {0}")]
    Join(String),

    /// The parallel task scheduler could not be constructed.
    #[error("failed to build task scheduler: {0}")]
    Scheduler(String),

    /// The async runtime backing the task-graph strategy failed to start.
    #[error("failed to start async runtime: {source}")]
    Runtime {
        #[source]
        source: io::Error,
    },

    /// A report could not be rendered.
    #[error("failed to render report: {0}")]
    Report(#[from] serde_json::Error),
}

impl Error {
    /// Pages counted before a halting failure, if the variant tracks it.
    pub fn pages_processed(&self) -> Option<u64> {
        match self {
            Error::Halted {
                pages_processed, ..
            } => Some(*pages_processed),
            _ => None,
        }
    }
}
