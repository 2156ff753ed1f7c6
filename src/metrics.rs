//! Resource measurement around each strategy run.
//!
//! Measurement is deliberately observational: readings are best-effort and
//! platform-specific, never correctness-critical. The concrete mechanism sits
//! behind the [`Sampler`] capability so the harness (and tests) can swap it.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use sysinfo::{ProcessRefreshKind, RefreshKind, System};

/// Point-in-time resource reading. Unavailable or negative raw values are
/// clamped to zero before they land here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub wall_time_ms: u64,
    pub heap_used_bytes: u64,
    pub cpu_load_percent: f64,
    pub gc_collections: u64,
    pub gc_time_ms: u64,
}

/// Per-field difference of two snapshots taken around one strategy run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsDelta {
    pub wall_time_ms: u64,
    pub heap_used_bytes: u64,
    pub cpu_load_percent: f64,
    pub gc_collections: u64,
    pub gc_time_ms: u64,
}

impl MetricsDelta {
    /// Plain subtraction per field, saturating on the unsigned ones so a
    /// shrinking reading (memory returned to the OS mid-run) never underflows.
    pub fn between(before: &MetricsSnapshot, after: &MetricsSnapshot) -> Self {
        MetricsDelta {
            wall_time_ms: after.wall_time_ms.saturating_sub(before.wall_time_ms),
            heap_used_bytes: after.heap_used_bytes.saturating_sub(before.heap_used_bytes),
            cpu_load_percent: after.cpu_load_percent - before.cpu_load_percent,
            gc_collections: after.gc_collections.saturating_sub(before.gc_collections),
            gc_time_ms: after.gc_time_ms.saturating_sub(before.gc_time_ms),
        }
    }
}

/// Capability interface the harness measures through.
pub trait Sampler {
    fn snapshot(&mut self) -> MetricsSnapshot;
}

/// Sampler backed by the host OS: process RSS for heap, one-minute load
/// average for CPU, a monotonic epoch for wall time.
///
/// The collector counters read zero here: this runtime exposes no collection
/// cycles to observe, and the clamp-unavailable-to-zero rule applies.
pub struct SystemSampler {
    epoch: Instant,
    system: System,
}

impl SystemSampler {
    pub fn new() -> Self {
        SystemSampler {
            epoch: Instant::now(),
            system: System::new_with_specifics(
                RefreshKind::nothing().with_processes(ProcessRefreshKind::nothing().with_memory()),
            ),
        }
    }

    fn process_rss_bytes(&mut self) -> u64 {
        // /proc/self/status is the cheap, accurate path on Linux.
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            let vm_rss = status
                .lines()
                .find(|line| line.starts_with("VmRSS:"))
                .and_then(|line| line.split_whitespace().nth(1))
                .and_then(|kb| kb.parse::<u64>().ok());
            if let Some(kb) = vm_rss {
                return kb * 1024;
            }
        }

        // Cross-platform fallback.
        self.system.refresh_processes_specifics(
            sysinfo::ProcessesToUpdate::All,
            false,
            ProcessRefreshKind::nothing().with_memory(),
        );
        sysinfo::get_current_pid()
            .ok()
            .and_then(|pid| self.system.process(pid))
            .map(|process| process.memory())
            .unwrap_or(0)
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        SystemSampler::new()
    }
}

impl Sampler for SystemSampler {
    fn snapshot(&mut self) -> MetricsSnapshot {
        let heap_used_bytes = self.process_rss_bytes();
        // load_average reports -1 where unsupported; clamp per the data model.
        let load = System::load_average().one.max(0.0);
        MetricsSnapshot {
            wall_time_ms: self.epoch.elapsed().as_millis() as u64,
            heap_used_bytes,
            cpu_load_percent: load * 100.0,
            gc_collections: 0,
            gc_time_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_per_field_subtraction() {
        let before = MetricsSnapshot {
            wall_time_ms: 100,
            heap_used_bytes: 1_000,
            cpu_load_percent: 10.0,
            gc_collections: 2,
            gc_time_ms: 5,
        };
        let after = MetricsSnapshot {
            wall_time_ms: 350,
            heap_used_bytes: 4_000,
            cpu_load_percent: 35.0,
            gc_collections: 3,
            gc_time_ms: 9,
        };
        let delta = MetricsDelta::between(&before, &after);
        assert_eq!(delta.wall_time_ms, 250);
        assert_eq!(delta.heap_used_bytes, 3_000);
        assert_eq!(delta.cpu_load_percent, 25.0);
        assert_eq!(delta.gc_collections, 1);
        assert_eq!(delta.gc_time_ms, 4);
    }

    #[test]
    fn unsigned_fields_saturate_instead_of_underflowing() {
        let before = MetricsSnapshot {
            heap_used_bytes: 5_000,
            ..Default::default()
        };
        let after = MetricsSnapshot {
            heap_used_bytes: 1_000,
            ..Default::default()
        };
        assert_eq!(MetricsDelta::between(&before, &after).heap_used_bytes, 0);
    }

    #[test]
    fn system_sampler_wall_time_is_monotonic() {
        let mut sampler = SystemSampler::new();
        let first = sampler.snapshot();
        let second = sampler.snapshot();
        assert!(second.wall_time_ms >= first.wall_time_ms);
    }
}
