//! Strategy — the interchangeable concurrency designs under study.
//!
//! A [`Strategy`] consumes one fresh iteration of the page corpus and produces
//! a single word→count mapping plus a processed-page total. Five designs are
//! compared:
//!
//! - [`Sequential`]: one thread, one local tally. The correctness baseline.
//! - [`FixedPool`]: one job per page on a bounded worker pool, all jobs
//!   incrementing a shared concurrent tally.
//! - [`ProducerConsumer`]: pages flow through a closable blocking channel to
//!   consumer threads that each count into a private tally, merged after join.
//! - [`ForkJoin`]: recursive halving of a materialized page list on a
//!   work-stealing scheduler, leaves counted sequentially, results merged up
//!   a balanced binary tree.
//! - [`TaskGraph`]: one async task per page on a shared runtime, joined by an
//!   aggregate barrier over a shared concurrent tally.
//!
//! # The one invariant that matters
//!
//! No strategy guarantees any ordering of pages or words. Correctness rests
//! entirely on [`WordTally::merge`](crate::tally::WordTally::merge) being
//! associative and commutative, and on the shared tally's per-key increment
//! being linearizable. Given that, every design above lands on the identical
//! mapping for the same corpus, which is exactly what makes their resource
//! profiles comparable.
//!
//! # Where contention lives
//!
//! Counting itself is contention-free wherever a tally is private (sequential,
//! producer/consumer locals, fork-join leaves). The shared-tally strategies
//! pay per-key shard locking instead of a merge phase. The channel strategies
//! confine locking to queue push/pop. Picking between those trade-offs is the
//! point of the benchmark, so none of them is "fixed" here.
//!
//! # Failure shape
//!
//! Strategies never retry. A corpus read error propagates out (producer runs
//! surface it after consumers drain, with the true partial page count); the
//! fixed pool's bounded shutdown may drop unfinished pages and says so in the
//! log rather than repairing the undercount.

pub mod channel;
pub mod fixed_pool;
pub mod fork_join;
pub mod sequential;
pub mod task_graph;

pub use channel::ProducerConsumer;
pub use fixed_pool::FixedPool;
pub use fork_join::ForkJoin;
pub use sequential::Sequential;
pub use task_graph::TaskGraph;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::error::Error;
use crate::tally::WordTally;

/// Result of one strategy run over one corpus iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub tally: WordTally,
    pub pages_processed: u64,
}

/// One concurrency design for turning the page stream into a tally.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Consume a fresh corpus iteration and produce the final mapping. The
    /// accumulation context is constructed inside the call; nothing persists
    /// between runs.
    fn run(&self, config: &RunConfig) -> Result<RunOutcome, Error>;
}

/// Selectable strategy set, in the order the harness runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Sequential,
    FixedPool,
    ProducerConsumer,
    ForkJoin,
    TaskGraph,
}

impl StrategyKind {
    /// Every strategy, in the canonical benchmark order.
    pub fn all() -> Vec<StrategyKind> {
        vec![
            StrategyKind::Sequential,
            StrategyKind::FixedPool,
            StrategyKind::ProducerConsumer,
            StrategyKind::ForkJoin,
            StrategyKind::TaskGraph,
        ]
    }

    pub fn strategy(&self) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Sequential => Box::new(Sequential),
            StrategyKind::FixedPool => Box::new(FixedPool),
            StrategyKind::ProducerConsumer => Box::new(ProducerConsumer),
            StrategyKind::ForkJoin => Box::new(ForkJoin),
            StrategyKind::TaskGraph => Box::new(TaskGraph),
        }
    }
}
