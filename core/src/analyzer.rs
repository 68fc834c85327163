use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Context;
use ordered_map::{Entry, OrderedMap};
use serde::Serialize;

use crate::config::AnalyzerConfig;
use crate::text::{normalize_word, words};

/// Normalized form of `letter` as a key prefix, `None` if it has none.
fn letter_prefix(letter: char) -> Option<String> {
    let prefix = normalize_word(letter.encode_utf8(&mut [0; 4]));
    (!prefix.is_empty()).then_some(prefix)
}

/// Counts word occurrences in an [`OrderedMap`] keyed by normalized word, so
/// listings come out in ascending order.
///
/// Loading more text accumulates into the same counts.
#[derive(Debug, Clone, Default)]
pub struct WordAnalyzer {
    table: OrderedMap<String, usize>,
    total_words: usize,
    most_frequent: Option<(String, usize)>,
    paragraphs: Vec<Paragraph>,
    lines: usize,
    open_paragraph: bool,
}

/// A maximal run of non-blank lines and the valid words it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    first_line: usize,
    words: Vec<String>,
}

impl Paragraph {
    /// 1-based line the paragraph starts on, counted across all input
    pub fn first_line(&self) -> usize {
        self.first_line
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Normalized words in reading order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The first `len` words, or all of them if the paragraph is shorter.
    pub fn excerpt(&self, len: usize) -> &[String] {
        &self.words[..len.min(self.words.len())]
    }

    /// Occurrences of words in this paragraph starting with `letter`.
    pub fn occurrences_starting_with(&self, letter: char) -> usize {
        match letter_prefix(letter) {
            Some(prefix) => self
                .words
                .iter()
                .filter(|word| word.starts_with(prefix.as_str()))
                .count(),
            None => 0,
        }
    }

    /// Percentage of this paragraph's words starting with `letter`, `0.0`
    /// for a paragraph without words.
    pub fn share_starting_with(&self, letter: char) -> f64 {
        if self.words.is_empty() {
            return 0.0;
        }
        self.occurrences_starting_with(letter) as f64 * 100.0 / self.words.len() as f64
    }
}

/// Summary of everything processed so far
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub total_words: usize,
    pub unique_words: usize,
    pub paragraphs: usize,
    pub most_frequent: Option<WordCount>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

impl WordAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &AnalyzerConfig) -> Self {
        Self {
            table: OrderedMap::with_capacity(config.initial_capacity),
            ..Self::default()
        }
    }

    /// Counts every valid normalized word of `text`. Blank lines split
    /// paragraphs, and the last paragraph is closed at the end.
    pub fn process_text(&mut self, text: &str) {
        for line in text.lines() {
            self.process_line(line);
        }
        self.open_paragraph = false;
    }

    /// Processes a reader line by line, returning the number of lines read.
    pub fn process_reader<R: BufRead>(&mut self, reader: R) -> crate::Result<usize> {
        let mut lines = 0;
        for line in reader.lines() {
            self.process_line(&line?);
            lines += 1;
        }
        self.open_paragraph = false;
        Ok(lines)
    }

    fn process_line(&mut self, line: &str) {
        self.lines += 1;

        if line.trim().is_empty() {
            self.open_paragraph = false;
            return;
        }

        if !self.open_paragraph {
            self.paragraphs.push(Paragraph {
                first_line: self.lines,
                words: Vec::new(),
            });
            self.open_paragraph = true;
        }

        for word in words(line) {
            self.add_word(word);
        }
    }

    pub fn process_file<P: AsRef<Path>>(&mut self, path: P) -> crate::Result<usize> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

        let lines = self
            .process_reader(BufReader::new(file))
            .with_context(|| format!("failed to read {}", path.display()))?;

        log::debug!(
            "processed {} lines from {} ({} words, {} unique)",
            lines,
            path.display(),
            self.total_words,
            self.table.len()
        );

        Ok(lines)
    }

    fn add_word(&mut self, word: String) {
        let count = self.table.get(&word).copied().unwrap_or(0) + 1;
        self.total_words += 1;

        if let Some(paragraph) = self.paragraphs.last_mut() {
            paragraph.words.push(word.clone());
        }

        let max = self.most_frequent.as_ref().map_or(0, |(_, max)| *max);
        if count > max {
            self.most_frequent = Some((word.clone(), count));
        }

        self.table.put(word, count);
    }

    /// Occurrences of `word` after normalization, `0` if it never appeared.
    pub fn frequency(&self, word: &str) -> usize {
        self.table
            .get(normalize_word(word).as_str())
            .copied()
            .unwrap_or(0)
    }

    pub fn total_words(&self) -> usize {
        self.total_words
    }

    pub fn unique_words(&self) -> usize {
        self.table.len()
    }

    /// The first word to reach the highest count, with that count
    pub fn most_frequent(&self) -> Option<(&str, usize)> {
        self.most_frequent
            .as_ref()
            .map(|(word, count)| (word.as_str(), *count))
    }

    /// Words whose first letter normalizes to the same letter as `letter`,
    /// in ascending order with their counts.
    pub fn words_starting_with(&self, letter: char) -> Vec<(&str, usize)> {
        self.prefixed(letter)
            .map(|entry| (entry.key().as_str(), *entry.value()))
            .collect()
    }

    /// Total occurrences of the words starting with `letter`.
    pub fn occurrences_starting_with(&self, letter: char) -> usize {
        self.prefixed(letter).map(|entry| *entry.value()).sum()
    }

    fn prefixed(&self, letter: char) -> impl Iterator<Item = &Entry<String, usize>> {
        let prefix = letter_prefix(letter);

        // Keys sharing a prefix are contiguous and start at the prefix's rank
        let start = prefix
            .as_deref()
            .map_or(self.table.len(), |prefix| self.table.rank(prefix));
        self.table.entries()[start..]
            .iter()
            .take_while(move |entry| {
                prefix
                    .as_deref()
                    .is_some_and(|prefix| entry.key().starts_with(prefix))
            })
    }

    /// Paragraphs in reading order
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// The paragraph numbered `number`, counting from 1.
    pub fn paragraph(&self, number: usize) -> Option<&Paragraph> {
        number
            .checked_sub(1)
            .and_then(|index| self.paragraphs.get(index))
    }

    /// Every distinct word, ascending
    pub fn sorted_words(&self) -> Vec<String> {
        self.table.all_keys()
    }

    /// Borrowing iterator over `(word, count)` in ascending word order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.table
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
    }

    /// The underlying word table
    pub fn table(&self) -> &OrderedMap<String, usize> {
        &self.table
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            total_words: self.total_words,
            unique_words: self.unique_words(),
            paragraphs: self.paragraphs.len(),
            most_frequent: self.most_frequent().map(|(word, count)| WordCount {
                word: word.to_string(),
                count,
            }),
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total words: {}", self.total_words)?;
        writeln!(f, "Unique words: {}", self.unique_words)?;
        writeln!(f, "Paragraphs: {}", self.paragraphs)?;
        match &self.most_frequent {
            Some(WordCount { word, count }) => {
                writeln!(f, "Most frequent word: {word} ({count} occurrences)")
            }
            None => writeln!(f, "Most frequent word: none"),
        }
    }
}
