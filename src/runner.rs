//! The benchmark harness: runs the configured strategies back to back,
//! measures each one, and assembles the comparative report.
//!
//! Isolation rules: every strategy gets a fresh corpus iteration and builds
//! its own accumulation state, a failing or panicking strategy is logged and
//! recorded in its row without aborting the remainder, and the measurement
//! itself stays outside the strategy so it cannot perturb what it measures
//! beyond the two snapshots.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use typed_builder::TypedBuilder;

use crate::config::RunConfig;
use crate::error::Error;
use crate::metrics::{MetricsDelta, Sampler, SystemSampler};
use crate::report::{BenchmarkReport, BenchmarkRow};
use crate::strategy::StrategyKind;

const TOP_WORDS: usize = 3;

#[derive(TypedBuilder)]
pub struct Harness<S: Sampler = SystemSampler> {
    config: RunConfig,
    #[builder(default = StrategyKind::all())]
    strategies: Vec<StrategyKind>,
    sampler: S,
}

impl<S: Sampler> Harness<S> {
    /// Run every configured strategy in order and collect the report.
    pub fn run(mut self) -> BenchmarkReport {
        let mut rows = Vec::with_capacity(self.strategies.len());

        for kind in &self.strategies {
            let strategy = kind.strategy();
            tracing::info!(strategy = strategy.name(), "running");

            let before = self.sampler.snapshot();
            let started = Instant::now();
            let outcome = catch_unwind(AssertUnwindSafe(|| strategy.run(&self.config)));
            let elapsed_ms = started.elapsed().as_millis() as u64;
            let after = self.sampler.snapshot();
            let metrics = MetricsDelta::between(&before, &after);

            let row = match outcome {
                Ok(Ok(outcome)) => BenchmarkRow {
                    strategy: strategy.name().to_string(),
                    elapsed_ms,
                    pages_processed: outcome.pages_processed,
                    metrics,
                    top_words: outcome.tally.top(TOP_WORDS),
                    error: None,
                },
                Ok(Err(error)) => {
                    tracing::error!(strategy = strategy.name(), %error, "strategy failed");
                    BenchmarkRow {
                        strategy: strategy.name().to_string(),
                        elapsed_ms,
                        // A halted run still reports how far it got.
                        pages_processed: error.pages_processed().unwrap_or(0),
                        metrics,
                        top_words: Vec::new(),
                        error: Some(error.to_string()),
                    }
                }
                Err(panic) => {
                    let error = Error::Panicked(panic_message(panic));
                    tracing::error!(strategy = strategy.name(), %error, "strategy panicked");
                    BenchmarkRow {
                        strategy: strategy.name().to_string(),
                        elapsed_ms,
                        pages_processed: 0,
                        metrics,
                        top_words: Vec::new(),
                        error: Some(error.to_string()),
                    }
                }
            };
            rows.push(row);
        }

        BenchmarkReport {
            source: self.config.source.describe(),
            workers: self.config.workers,
            rows,
        }
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusSource;
    use crate::metrics::MetricsSnapshot;

    /// Fixed-step sampler so tests see deterministic deltas.
    struct TickSampler {
        ticks: u64,
    }

    impl Sampler for TickSampler {
        fn snapshot(&mut self) -> MetricsSnapshot {
            self.ticks += 1;
            MetricsSnapshot {
                wall_time_ms: self.ticks * 10,
                heap_used_bytes: self.ticks * 100,
                ..Default::default()
            }
        }
    }

    fn harness_for(source: CorpusSource, strategies: Vec<StrategyKind>) -> Harness<TickSampler> {
        Harness::builder()
            .config(RunConfig::builder().source(source).workers(2).build())
            .strategies(strategies)
            .sampler(TickSampler { ticks: 0 })
            .build()
    }

    #[test]
    fn report_has_one_row_per_strategy_in_order() {
        let report = harness_for(
            CorpusSource::memory(["a b b", "b c", "a", "I am", "b b a"]),
            StrategyKind::all(),
        )
        .run();

        let names: Vec<_> = report.rows.iter().map(|r| r.strategy.as_str()).collect();
        assert_eq!(
            names,
            [
                "sequential",
                "fixed-pool",
                "producer-consumer",
                "fork-join",
                "task-graph"
            ]
        );
        for row in &report.rows {
            assert!(row.error.is_none());
            assert_eq!(row.pages_processed, 5);
            assert_eq!(row.top_words[0], ("b".to_string(), 5));
            // Two sampler ticks per strategy, 10ms apart.
            assert_eq!(row.metrics.wall_time_ms, 10);
        }
    }

    #[test]
    fn a_failing_strategy_does_not_stop_the_rest() {
        let report = harness_for(
            CorpusSource::file("/no/such/corpus", 5),
            vec![StrategyKind::Sequential, StrategyKind::ProducerConsumer],
        )
        .run();

        assert_eq!(report.rows.len(), 2);
        for row in &report.rows {
            assert!(row.error.is_some());
            assert!(row.top_words.is_empty());
        }
    }

    #[test]
    fn rows_carry_top_three_with_deterministic_tie_break() {
        let report = harness_for(
            CorpusSource::memory(["a b b", "b c", "a", "I am", "b b a"]),
            vec![StrategyKind::Sequential],
        )
        .run();
        assert_eq!(
            report.rows[0].top_words,
            vec![
                ("b".to_string(), 5),
                ("a".to_string(), 3),
                ("I".to_string(), 1)
            ]
        );
    }
}
