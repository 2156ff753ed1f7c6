//! Wordbench — a word-frequency benchmark comparing concurrent execution
//! strategies over a page corpus.
//!
//! Wordbench computes word-occurrence counts for a stream of text pages five
//! different ways (sequentially, on a fixed worker pool, through a
//! producer/consumer channel, by fork-join divide-and-conquer, and as an
//! async task graph) and measures what each design costs in wall time,
//! memory and CPU. The strategies are interchangeable because they all reduce
//! to the same associative, commutative tally merge; the harness runs them
//! back to back and emits a comparative report.
//!
//! # Architecture
//!
//! The main building blocks are:
//!
//! - [`corpus`]: the page reader and tokenizer collaborators. Thin by design;
//!   strategies treat them as opaque capabilities.
//! - [`filter`]: the pure word predicate every strategy applies identically.
//! - [`tally`]: the mergeable accumulators: [`tally::WordTally`] for
//!   single-owner counting, [`tally::SharedTally`] for concurrent increments.
//! - [`strategy`]: the five concurrency designs behind one [`strategy::Strategy`]
//!   trait. This is the system under study.
//! - [`pool`]: the fixed-size worker pool with a graceful-then-forced,
//!   deadline-bounded shutdown, used by the fixed-pool strategy.
//! - [`metrics`]: before/after resource snapshots behind the
//!   [`metrics::Sampler`] capability.
//! - [`runner`]: the harness that runs strategies in order, isolates their
//!   failures and assembles [`report::BenchmarkRow`]s.
//! - [`report`]: report types and the stdout/JSON reporters.
//!
//! # Example
//!
//! ```rust
//! use wordbench::{
//!     config::RunConfig,
//!     corpus::CorpusSource,
//!     metrics::SystemSampler,
//!     report::{Reporter, StdoutReporter},
//!     runner::Harness,
//! };
//!
//! let config = RunConfig::builder()
//!     .source(CorpusSource::memory(["a b b", "b c", "a", "I am", "b b a"]))
//!     .workers(2)
//!     .build();
//!
//! let report = Harness::builder()
//!     .config(config)
//!     .sampler(SystemSampler::new())
//!     .build()
//!     .run();
//!
//! assert_eq!(report.rows.len(), 5);
//! StdoutReporter.report(&report).unwrap();
//! ```

pub mod config;
pub mod corpus;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod pool;
pub mod report;
pub mod runner;
pub mod strategy;
pub mod tally;

pub use config::RunConfig;
pub use error::Error;
pub use report::{BenchmarkReport, BenchmarkRow, Reporter};
pub use runner::Harness;
pub use strategy::{Strategy, StrategyKind};
pub use tally::WordTally;
