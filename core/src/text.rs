use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercases `word`, drops every non-alphabetic character and strips
/// accents by decomposing to NFD and discarding the combining marks.
///
/// ```
/// use wordtable_core::normalize_word;
///
/// assert_eq!(normalize_word("¡Señor!"), "senor");
/// assert_eq!(normalize_word("Creó,"), "creo");
/// ```
pub fn normalize_word(word: &str) -> String {
    word.to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .nfd()
        .filter(|&c| !is_combining_mark(c))
        .collect()
}

/// A normalized word counts only if it contains at least one ASCII letter.
pub fn is_valid_word(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_lowercase())
}

/// Splits a line on whitespace and yields the valid normalized words.
pub fn words(line: &str) -> impl Iterator<Item = String> + '_ {
    line.split_whitespace()
        .map(normalize_word)
        .filter(|word| is_valid_word(word))
}

/// Writes every line of `reader` as its valid normalized words joined by
/// single spaces. Blank lines are kept so paragraph breaks survive, lines
/// without a valid word are dropped. Returns the number of lines written.
pub fn clean_lines<R: BufRead, W: Write>(reader: R, mut writer: W) -> crate::Result<usize> {
    let mut written = 0;

    for line in reader.lines() {
        let line = line?;
        let cleaned: Vec<String> = words(&line).collect();

        if cleaned.is_empty() && !line.trim().is_empty() {
            continue;
        }

        writeln!(writer, "{}", cleaned.join(" "))?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}

/// Writes the cleaned copy of `path` to `<stem>.<suffix>.txt` in the same
/// directory and returns the new path.
pub fn clean_file<P: AsRef<Path>>(path: P, suffix: &str) -> crate::Result<PathBuf> {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .with_context(|| format!("{} has no file name", path.display()))?;

    let mut name = stem.to_os_string();
    name.push(format!(".{suffix}.txt"));
    let target = path.with_file_name(name);

    let input =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let output = File::create(&target)
        .with_context(|| format!("failed to create {}", target.display()))?;

    let lines = clean_lines(BufReader::new(input), BufWriter::new(output))
        .with_context(|| format!("failed to clean {}", path.display()))?;
    log::debug!("wrote {} lines to {}", lines, target.display());

    Ok(target)
}
