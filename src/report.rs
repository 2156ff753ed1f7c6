//! Report rows and reporters.
//!
//! A [`BenchmarkRow`] is the raw record of one strategy run; a [`Reporter`]
//! turns the assembled [`BenchmarkReport`] into output. The stdout reporter
//! prints the human table; the JSON reporter serializes the same data for
//! machines.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::metrics::MetricsDelta;

/// Record of one strategy run: identity, cost, and the headline words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRow {
    pub strategy: String,
    pub elapsed_ms: u64,
    pub pages_processed: u64,
    pub metrics: MetricsDelta,
    /// Up to three (word, count) pairs, descending count, lexical tie-break.
    pub top_words: Vec<(String, u64)>,
    /// Set when the run failed; the row still appears so the report stays a
    /// complete ordered record of what was attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The full comparative report, rows in execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub source: String,
    pub workers: usize,
    pub rows: Vec<BenchmarkRow>,
}

pub trait Reporter {
    fn report(&self, report: &BenchmarkReport) -> Result<(), Error>;
}

/// Human-readable table on stdout.
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn report(&self, report: &BenchmarkReport) -> Result<(), Error> {
        println!("-----------------------------------------------------");
        println!("=== Word Count Benchmark ===");
        println!("Source: {} | Workers: {}", report.source, report.workers);
        println!("-----------------------------------------------------");
        println!(
            "{:<20} {:>10} {:>8} {:>14} {:>8} {:>9} {:>12}",
            "Strategy", "Time(ms)", "Pages", "Heap(bytes)", "CPU(%)", "GC Count", "GC Time(ms)"
        );
        for row in &report.rows {
            println!(
                "{:<20} {:>10} {:>8} {:>14} {:>8.2} {:>9} {:>12}",
                row.strategy,
                row.elapsed_ms,
                row.pages_processed,
                row.metrics.heap_used_bytes,
                row.metrics.cpu_load_percent,
                row.metrics.gc_collections,
                row.metrics.gc_time_ms,
            );
            for (word, count) in &row.top_words {
                println!("  Word: '{word}' with total {count} occurrences!");
            }
            if let Some(error) = &row.error {
                println!("  FAILED: {error}");
            }
        }
        Ok(())
    }
}

/// Machine-readable alternative: the whole report as pretty JSON.
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn report(&self, report: &BenchmarkReport) -> Result<(), Error> {
        let value = serde_json::to_string_pretty(report)?;
        println!("{value}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> BenchmarkReport {
        BenchmarkReport {
            source: "<memory: 5 pages>".into(),
            workers: 4,
            rows: vec![BenchmarkRow {
                strategy: "sequential".into(),
                elapsed_ms: 12,
                pages_processed: 5,
                metrics: MetricsDelta::default(),
                top_words: vec![("b".into(), 5), ("a".into(), 3)],
                error: None,
            }],
        }
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        let back: BenchmarkReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rows.len(), 1);
        assert_eq!(back.rows[0].strategy, "sequential");
        assert_eq!(back.rows[0].top_words[0], ("b".into(), 5));
    }

    #[test]
    fn error_field_is_omitted_from_json_when_absent() {
        let json = serde_json::to_string(&sample_report()).unwrap();
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn reporters_accept_a_report() {
        let report = sample_report();
        StdoutReporter.report(&report).unwrap();
        JsonReporter.report(&report).unwrap();
    }
}
