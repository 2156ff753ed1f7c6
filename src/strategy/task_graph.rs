//! One async task per page, joined by an aggregate barrier.
//!
//! Functionally the fixed-pool design: the same shared concurrent tally, the
//! same per-key linearizable increment, no local accumulation anywhere. Only
//! the plumbing differs. Pages become spawned tasks on a shared runtime, and
//! the run completes when a single barrier over every task handle resolves,
//! instead of a pool drain.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::join_all;

use crate::config::RunConfig;
use crate::corpus::words;
use crate::error::Error;
use crate::filter::keeps;
use crate::strategy::{RunOutcome, Strategy};
use crate::tally::SharedTally;

pub struct TaskGraph;

impl Strategy for TaskGraph {
    fn name(&self) -> &'static str {
        "task-graph"
    }

    fn run(&self, config: &RunConfig) -> Result<RunOutcome, Error> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.workers.max(1))
            .thread_name("wordbench-task")
            .build()
            .map_err(|source| Error::Runtime { source })?;

        let shared = Arc::new(SharedTally::new());
        let processed = Arc::new(AtomicU64::new(0));

        runtime.block_on(async {
            let mut handles = Vec::new();
            for page in config.pages()? {
                let page = page?;
                let shared = Arc::clone(&shared);
                let processed = Arc::clone(&processed);
                handles.push(tokio::spawn(async move {
                    for word in words(page.text()) {
                        if keeps(word) {
                            shared.increment(word);
                        }
                    }
                    processed.fetch_add(1, Ordering::Relaxed);
                }));
            }

            tracing::debug!(tasks = handles.len(), "task-graph: awaiting barrier");
            // The aggregate barrier: the shared tally is not read before
            // every per-page task has completed.
            for joined in join_all(handles).await {
                joined.map_err(|e| Error::Join(e.to_string()))?;
            }
            Ok::<(), Error>(())
        })?;

        let tally = match Arc::try_unwrap(shared) {
            Ok(shared) => shared.into_tally(),
            Err(shared) => shared.snapshot(),
        };
        Ok(RunOutcome {
            tally,
            pages_processed: processed.load(Ordering::Relaxed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusSource;

    #[test]
    fn barrier_sees_every_page_counted() {
        let texts: Vec<String> = (0..200).map(|i| format!("t{} all", i % 5)).collect();
        let config = RunConfig::builder()
            .source(CorpusSource::memory(texts))
            .workers(4)
            .build();
        let outcome = TaskGraph.run(&config).unwrap();
        assert_eq!(outcome.pages_processed, 200);
        assert_eq!(outcome.tally.count("all"), 200);
    }

    #[test]
    fn runs_with_a_single_worker_thread() {
        let config = RunConfig::builder()
            .source(CorpusSource::memory(["a b", "b"]))
            .workers(1)
            .build();
        let outcome = TaskGraph.run(&config).unwrap();
        assert_eq!(outcome.tally.count("b"), 2);
    }
}
