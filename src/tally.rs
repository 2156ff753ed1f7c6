//! Word tallies: the mergeable count accumulators every strategy produces.
//!
//! [`WordTally`] is the single-owner accumulator (one per thread, task or
//! fork-join leaf while being written); [`SharedTally`] is the concurrent
//! accumulator the pool and task-graph strategies mutate from many threads at
//! once.
//!
//! `merge` must be **associative** and **commutative**: strategies partition
//! the corpus in different shapes (linear fold vs. balanced tree) and combine
//! partials in arbitrary order, and all of them have to agree on the same
//! final mapping for the same corpus.

use std::collections::HashMap;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Mapping from word to occurrence count for some subset of the corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordTally {
    counts: HashMap<String, u64>,
}

impl WordTally {
    pub fn new() -> Self {
        WordTally::default()
    }

    /// Record one occurrence of `word`.
    pub fn consume(&mut self, word: &str) {
        // get_mut first: repeat words (the common case) never re-allocate the key.
        match self.counts.get_mut(word) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(word.to_owned(), 1);
            }
        }
    }

    /// Fold `other` into `self`: for every key of `other`, add its count to
    /// ours (absent keys start from zero). Keys only in `self` are untouched.
    pub fn merge(&mut self, other: WordTally) {
        for (word, n) in other.counts {
            *self.counts.entry(word).or_insert(0) += n;
        }
    }

    pub fn count(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `n` most frequent words, descending by count. Ties break by
    /// ascending word order so the report is deterministic across runs and
    /// strategies.
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        let mut entries: Vec<_> = self
            .counts
            .iter()
            .map(|(w, c)| (w.clone(), *c))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(n);
        entries
    }
}

impl FromIterator<(String, u64)> for WordTally {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        WordTally {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Concurrent accumulator shared by every worker of a strategy run.
///
/// `increment` is linearizable per key: the underlying map locks the key's
/// shard for the read-modify-write, so simultaneous increments on one word
/// never lose an update. No further locking is exposed to callers.
#[derive(Debug, Default)]
pub struct SharedTally {
    counts: DashMap<String, u64>,
}

impl SharedTally {
    pub fn new() -> Self {
        SharedTally::default()
    }

    pub fn increment(&self, word: &str) {
        if let Some(mut count) = self.counts.get_mut(word) {
            *count += 1;
            return;
        }
        // First sighting. Two threads can race past the fast path for the
        // same word; `entry` arbitrates, so both increments land.
        *self.counts.entry(word.to_owned()).or_insert(0) += 1;
    }

    /// Freeze into a plain tally, consuming the accumulator. Only called
    /// after the run's completion barrier.
    pub fn into_tally(self) -> WordTally {
        self.counts.into_iter().collect()
    }

    /// Copy the current contents. Used when an abandoned worker may still
    /// hold a handle to the accumulator after a forced shutdown.
    pub fn snapshot(&self) -> WordTally {
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}
