//! Producer/consumer over a closable blocking channel.
//!
//! The producing side (this thread) reads the corpus and sends pages into an
//! unbounded channel; dropping the sender is the explicit close. Each consumer
//! thread receives until the channel is both empty and closed, counting into a
//! private tally so the counting phase itself is contention-free. After all
//! consumers are joined, their tallies fold sequentially into the final
//! mapping.
//!
//! Termination falls out of the channel contract: `recv` returns a page or,
//! once the queue is drained and the sender is gone, an error that ends the
//! consumer loop. There is no wait/notify protocol to get wrong, no lost
//! wakeups, and it holds for any consumer count ≥ 1 and any page count
//! including zero, whichever side finishes first.
//!
//! A corpus failure mid-read closes the channel the same way; consumers drain
//! what was queued, and the error is surfaced afterwards together with the
//! true partial page count.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crate::config::RunConfig;
use crate::corpus::{Page, words};
use crate::error::Error;
use crate::filter::keeps;
use crate::strategy::{RunOutcome, Strategy};
use crate::tally::WordTally;

pub struct ProducerConsumer;

impl Strategy for ProducerConsumer {
    fn name(&self) -> &'static str {
        "producer-consumer"
    }

    fn run(&self, config: &RunConfig) -> Result<RunOutcome, Error> {
        let (sender, receiver) = crossbeam_channel::unbounded::<Page>();
        let processed = Arc::new(AtomicU64::new(0));

        let consumers: Vec<_> = (0..config.workers.max(1))
            .map(|i| {
                let receiver = receiver.clone();
                let processed = Arc::clone(&processed);
                thread::Builder::new()
                    .name(format!("wordbench-consumer-{i}"))
                    .spawn(move || {
                        let mut local = WordTally::new();
                        // Runs until the queue is empty and the sender is gone.
                        while let Ok(page) = receiver.recv() {
                            for word in words(page.text()) {
                                if keeps(word) {
                                    local.consume(word);
                                }
                            }
                            processed.fetch_add(1, Ordering::Relaxed);
                        }
                        local
                    })
                    .expect("failed to spawn consumer thread")
            })
            .collect();
        drop(receiver);

        let mut production_error = None;
        match config.pages() {
            Ok(pages) => {
                for page in pages {
                    match page {
                        // Send only fails if every consumer died; nothing
                        // useful to do with the page then.
                        Ok(page) => {
                            let _ = sender.send(page);
                        }
                        Err(e) => {
                            production_error = Some(e);
                            break;
                        }
                    }
                }
            }
            Err(e) => production_error = Some(e),
        }
        // The close signal: consumers drain the queue and exit.
        drop(sender);

        let mut tally = WordTally::new();
        for consumer in consumers {
            let local = consumer
                .join()
                .map_err(|_| Error::Panicked("consumer thread panicked".into()))?;
            tally.merge(local);
        }
        let pages_processed = processed.load(Ordering::Relaxed);

        if let Some(source) = production_error {
            return Err(Error::Halted {
                pages_processed,
                source: Box::new(source),
            });
        }
        Ok(RunOutcome {
            tally,
            pages_processed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusSource;

    fn config_with_workers(texts: &[&str], workers: usize) -> RunConfig {
        RunConfig::builder()
            .source(CorpusSource::memory(texts.to_vec()))
            .workers(workers)
            .build()
    }

    #[test]
    fn consumers_terminate_when_producer_finishes_first() {
        // Tiny corpus, many consumers: most consumers find the channel
        // already closed and must still exit cleanly.
        let outcome = ProducerConsumer
            .run(&config_with_workers(&["a b"], 16))
            .unwrap();
        assert_eq!(outcome.pages_processed, 1);
        assert_eq!(outcome.tally.count("b"), 1);
    }

    #[test]
    fn consumers_terminate_on_an_empty_corpus() {
        for workers in [1, 2, 8] {
            let outcome = ProducerConsumer
                .run(&config_with_workers(&[], workers))
                .unwrap();
            assert!(outcome.tally.is_empty());
            assert_eq!(outcome.pages_processed, 0);
        }
    }

    #[test]
    fn all_queued_pages_are_drained_after_close() {
        let texts: Vec<String> = (0..500).map(|i| format!("w{} shared", i % 10)).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let outcome = ProducerConsumer
            .run(&config_with_workers(&refs, 4))
            .unwrap();
        assert_eq!(outcome.pages_processed, 500);
        assert_eq!(outcome.tally.count("shared"), 500);
    }

    #[test]
    fn open_failure_reports_zero_partial_pages() {
        let config = RunConfig::builder()
            .source(CorpusSource::file("/no/such/file", 5))
            .workers(2)
            .build();
        match ProducerConsumer.run(&config) {
            Err(Error::Halted {
                pages_processed, ..
            }) => assert_eq!(pages_processed, 0),
            other => panic!("expected a halted run, got {other:?}"),
        }
    }
}
