//! Corpus collaborators: the bounded page reader and the per-page tokenizer.
//!
//! Both are deliberately thin. The reader turns a text source into an ordered,
//! length-bounded sequence of [`Page`]s; the tokenizer turns one page's text
//! into a finite, restartable sequence of word tokens in source order. The
//! strategies treat both as opaque capabilities.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Error;

/// One unit of input text. Immutable once produced; owned by whichever
/// strategy or task consumes it and discarded after its words are counted.
#[derive(Debug, Clone)]
pub struct Page(String);

impl Page {
    pub fn new(text: impl Into<String>) -> Self {
        Page(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

/// Where pages come from. `File` streams blank-line-delimited blocks from
/// disk, bounded by `max_pages`; `Memory` serves a fixed set of texts and is
/// what tests and demos use.
#[derive(Debug, Clone)]
pub enum CorpusSource {
    File { path: PathBuf, max_pages: usize },
    Memory(Arc<Vec<String>>),
}

impl CorpusSource {
    pub fn file(path: impl Into<PathBuf>, max_pages: usize) -> Self {
        CorpusSource::File {
            path: path.into(),
            max_pages,
        }
    }

    pub fn memory<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CorpusSource::Memory(Arc::new(texts.into_iter().map(Into::into).collect()))
    }

    /// Start a fresh iteration over the corpus. Each call re-reads the source
    /// from the beginning so consecutive strategy runs never share state.
    pub fn open(&self) -> Result<Pages, Error> {
        match self {
            CorpusSource::File { path, max_pages } => {
                let file = File::open(path).map_err(|source| Error::Corpus {
                    path: path.clone(),
                    source,
                })?;
                Ok(Pages {
                    inner: PagesInner::File {
                        path: path.clone(),
                        lines: BufReader::new(file).lines(),
                        remaining: *max_pages,
                    },
                })
            }
            CorpusSource::Memory(texts) => Ok(Pages {
                inner: PagesInner::Memory {
                    texts: Arc::clone(texts),
                    next: 0,
                },
            }),
        }
    }

    /// Human-readable identifier for report headers.
    pub fn describe(&self) -> String {
        match self {
            CorpusSource::File { path, .. } => path.display().to_string(),
            CorpusSource::Memory(texts) => format!("<memory: {} pages>", texts.len()),
        }
    }
}

/// Bounded iterator over the pages of one corpus opening.
///
/// Yields `Err` at most once (on an underlying read failure) and then fuses.
pub struct Pages {
    inner: PagesInner,
}

enum PagesInner {
    File {
        path: PathBuf,
        lines: io::Lines<BufReader<File>>,
        remaining: usize,
    },
    Memory {
        texts: Arc<Vec<String>>,
        next: usize,
    },
}

impl Iterator for Pages {
    type Item = Result<Page, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            PagesInner::File {
                path,
                lines,
                remaining,
            } => {
                if *remaining == 0 {
                    return None;
                }
                let mut block = String::new();
                loop {
                    match lines.next() {
                        Some(Ok(line)) => {
                            if line.trim().is_empty() {
                                // Blank line ends a page; skip leading blanks.
                                if block.is_empty() {
                                    continue;
                                }
                                break;
                            }
                            if !block.is_empty() {
                                block.push('\n');
                            }
                            block.push_str(&line);
                        }
                        Some(Err(source)) => {
                            *remaining = 0;
                            return Some(Err(Error::Corpus {
                                path: path.clone(),
                                source,
                            }));
                        }
                        None => {
                            if block.is_empty() {
                                *remaining = 0;
                                return None;
                            }
                            break;
                        }
                    }
                }
                *remaining -= 1;
                Some(Ok(Page(block)))
            }
            PagesInner::Memory { texts, next } => {
                let page = texts.get(*next).cloned().map(Page)?;
                *next += 1;
                Some(Ok(page))
            }
        }
    }
}

/// Lazy tokenizer over one page's text: yields maximal alphanumeric runs in
/// source order. Restart by constructing a new `Words` over the same text.
pub struct Words<'a> {
    rest: &'a str,
}

/// Tokenize `text`.
pub fn words(text: &str) -> Words<'_> {
    Words { rest: text }
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.rest.find(|c: char| c.is_alphanumeric())?;
        let tail = &self.rest[start..];
        let end = tail
            .find(|c: char| !c.is_alphanumeric())
            .unwrap_or(tail.len());
        let (word, rest) = tail.split_at(end);
        self.rest = rest;
        Some(word)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn words_yield_alphanumeric_runs_in_order() {
        let collected: Vec<_> = words("the quick, brown fox -- 2 times!").collect();
        assert_eq!(collected, ["the", "quick", "brown", "fox", "2", "times"]);
    }

    #[test]
    fn words_restart_from_a_fresh_iterator() {
        let text = "a b c";
        let first: Vec<_> = words(text).collect();
        let second: Vec<_> = words(text).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn words_on_empty_or_punctuation_only_text() {
        assert_eq!(words("").count(), 0);
        assert_eq!(words("... --- !!!").count(), 0);
    }

    #[test]
    fn memory_corpus_yields_every_text() {
        let source = CorpusSource::memory(["one two", "three"]);
        let pages: Vec<_> = source
            .open()
            .unwrap()
            .map(|p| p.unwrap().text().to_string())
            .collect();
        assert_eq!(pages, ["one two", "three"]);
    }

    #[test]
    fn file_corpus_splits_on_blank_lines_and_honors_bound() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "alpha beta\ngamma\n\ndelta\n\n\nepsilon\n").unwrap();

        let source = CorpusSource::file(tmp.path(), 10);
        let pages: Vec<_> = source
            .open()
            .unwrap()
            .map(|p| p.unwrap().text().to_string())
            .collect();
        assert_eq!(pages, ["alpha beta\ngamma", "delta", "epsilon"]);

        let bounded = CorpusSource::file(tmp.path(), 2);
        assert_eq!(bounded.open().unwrap().count(), 2);
    }

    #[test]
    fn missing_file_errors_on_open() {
        let source = CorpusSource::file("/definitely/not/here.txt", 1);
        assert!(source.open().is_err());
    }

    #[test]
    fn reopening_restarts_from_the_beginning() {
        let source = CorpusSource::memory(["x", "y"]);
        assert_eq!(source.open().unwrap().count(), 2);
        assert_eq!(source.open().unwrap().count(), 2);
    }
}
