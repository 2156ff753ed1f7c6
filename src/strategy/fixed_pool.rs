//! One job per page on a fixed worker pool, all jobs incrementing one shared
//! concurrent tally.
//!
//! The pool is acquired for exactly this run and released on every exit path:
//! graceful drain first, then a bounded wait, then force-cancel. A forced
//! cancellation leaves the still-queued pages uncounted; the undercount is
//! logged, not corrected.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::RunConfig;
use crate::corpus::words;
use crate::error::Error;
use crate::filter::keeps;
use crate::pool::{Shutdown, WorkerPool};
use crate::strategy::{RunOutcome, Strategy};
use crate::tally::SharedTally;

pub struct FixedPool;

impl Strategy for FixedPool {
    fn name(&self) -> &'static str {
        "fixed-pool"
    }

    fn run(&self, config: &RunConfig) -> Result<RunOutcome, Error> {
        let pool = WorkerPool::new(config.workers);
        let shared = Arc::new(SharedTally::new());
        let processed = Arc::new(AtomicU64::new(0));

        tracing::info!(workers = pool.size(), "fixed-pool: submitting pages");
        // Feed inside a closure so a corpus error still reaches the shutdown
        // below; the pool itself also releases on drop if we unwind earlier.
        let fed = (|| -> Result<(), Error> {
            for page in config.pages()? {
                let page = page?;
                let shared = Arc::clone(&shared);
                let processed = Arc::clone(&processed);
                pool.submit(move || {
                    for word in words(page.text()) {
                        if keeps(word) {
                            shared.increment(word);
                        }
                    }
                    processed.fetch_add(1, Ordering::Relaxed);
                });
            }
            Ok(())
        })();

        match pool.shutdown(config.shutdown_timeout) {
            Shutdown::Drained => {}
            Shutdown::ForceCancelled { stragglers } => {
                tracing::warn!(
                    stragglers,
                    "fixed-pool: shutdown timed out, unfinished pages are not in the tally"
                );
            }
        }
        fed?;

        // After a forced cancel an abandoned worker may still hold a clone;
        // fall back to copying the accumulator out.
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
