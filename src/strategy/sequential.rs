//! Single-threaded baseline: one local tally, no synchronization at all.

use crate::config::RunConfig;
use crate::corpus::words;
use crate::error::Error;
use crate::filter::keeps;
use crate::strategy::{RunOutcome, Strategy};
use crate::tally::WordTally;

pub struct Sequential;

impl Strategy for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn run(&self, config: &RunConfig) -> Result<RunOutcome, Error> {
        let mut tally = WordTally::new();
        let mut pages_processed = 0u64;

        for page in config.pages()? {
            let page = page?;
            for word in words(page.text()) {
                if keeps(word) {
                    tally.consume(word);
                }
            }
            pages_processed += 1;
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

    #[test]
    fn counts_filtered_words_across_pages() {
        let config = RunConfig::builder()
            .source(CorpusSource::memory(["a b b", "b c"]))
            .build();
        let outcome = Sequential.run(&config).unwrap();
        assert_eq!(outcome.pages_processed, 2);
        assert_eq!(outcome.tally.count("b"), 3);
        assert_eq!(outcome.tally.count("a"), 1);
        assert_eq!(outcome.tally.count("c"), 0);
    }
}
