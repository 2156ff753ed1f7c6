//! Recursive divide-and-conquer on a work-stealing scheduler.
//!
//! The corpus is fully drained into a page list first; the recursion then
//! halves index ranges until a range fits under the leaf threshold, counts
//! leaves sequentially into local tallies, and merges sibling results on the
//! way back up. The merge tree is balanced binary, depth O(log(N/threshold)),
//! and merge order never matters because the tally merge is associative and
//! commutative.

use rayon::ThreadPoolBuilder;

use crate::config::RunConfig;
use crate::corpus::{Page, words};
use crate::error::Error;
use crate::filter::keeps;
use crate::strategy::{RunOutcome, Strategy};
use crate::tally::WordTally;

pub struct ForkJoin;

impl Strategy for ForkJoin {
    fn name(&self) -> &'static str {
        "fork-join"
    }

    fn run(&self, config: &RunConfig) -> Result<RunOutcome, Error> {
        let pages: Vec<Page> = config.pages()?.collect::<Result<_, _>>()?;
        let pages_processed = pages.len() as u64;

        let scheduler = ThreadPoolBuilder::new()
            .num_threads(config.workers.max(1))
            .thread_name(|i| format!("wordbench-forkjoin-{i}"))
            .build()
            .map_err(|e| Error::Scheduler(e.to_string()))?;

        let threshold = config.leaf_threshold.max(1);
        let tally = scheduler.install(|| count_range(&pages, threshold));

        Ok(RunOutcome {
            tally,
            pages_processed,
        })
    }
}

/// Count a contiguous page range: sequentially below `threshold`, otherwise
/// split at the midpoint, run both halves as sibling tasks and merge the
/// right result into the left.
fn count_range(pages: &[Page], threshold: usize) -> WordTally {
    if pages.len() <= threshold {
        let mut tally = WordTally::new();
        for page in pages {
            for word in words(page.text()) {
                if keeps(word) {
                    tally.consume(word);
                }
            }
        }
        return tally;
    }

    let (left, right) = pages.split_at(pages.len() / 2);
    let (mut merged, right_tally) = rayon::join(
        || count_range(left, threshold),
        || count_range(right, threshold),
    );
    merged.merge(right_tally);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusSource;

    fn page(text: &str) -> Page {
        Page::new(text)
    }

    #[test]
    fn leaf_range_counts_sequentially() {
        let pages = vec![page("a b"), page("b b")];
        let tally = count_range(&pages, 10);
        assert_eq!(tally.count("b"), 3);
        assert_eq!(tally.count("a"), 1);
    }

    #[test]
    fn split_result_equals_leaf_result() {
        let pages: Vec<Page> = (0..33).map(|i| page(if i % 2 == 0 { "even word" } else { "odd word" })).collect();
        let whole = count_range(&pages, pages.len());
        let split = count_range(&pages, 1);
        assert_eq!(whole, split);
        assert_eq!(split.count("word"), 33);
    }

    #[test]
    fn threshold_one_on_a_single_page_terminates() {
        let pages = vec![page("only one")];
        assert_eq!(count_range(&pages, 1).count("only"), 1);
    }

    #[test]
    fn strategy_drains_corpus_before_splitting() {
        let config = RunConfig::builder()
            .source(CorpusSource::memory(["a b b", "b c", "a"]))
            .workers(2)
            .leaf_threshold(1)
            .build();
        let outcome = ForkJoin.run(&config).unwrap();
        assert_eq!(outcome.pages_processed, 3);
        assert_eq!(outcome.tally.count("b"), 3);
        assert_eq!(outcome.tally.count("a"), 2);
    }
}
