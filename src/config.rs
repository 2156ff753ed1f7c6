//! Per-run configuration, read once at start and passed explicitly to every
//! strategy invocation. There is no process-wide mutable state: two harness
//! runs in one process cannot leak into each other.

use std::time::Duration;

use typed_builder::TypedBuilder;

use crate::corpus::{CorpusSource, Pages};
use crate::error::Error;

/// Everything one strategy run needs: the corpus to iterate and the
/// concurrency knobs.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RunConfig {
    /// Corpus to count. Each strategy opens its own fresh iteration.
    pub source: CorpusSource,

    /// Worker / consumer thread count for the parallel strategies.
    #[builder(default = num_cpus::get())]
    pub workers: usize,

    /// Fork-join subrange size below which processing goes sequential.
    #[builder(default = 1000)]
    pub leaf_threshold: usize,

    /// Bound on the fixed-pool graceful drain before force-cancel.
    #[builder(default = Duration::from_secs(60))]
    pub shutdown_timeout: Duration,
}

impl RunConfig {
    /// Fresh corpus iteration for one strategy run.
    pub fn pages(&self) -> Result<Pages, Error> {
        self.source.open()
    }
}
