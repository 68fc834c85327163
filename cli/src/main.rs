use std::{
    io::{stdout, Write},
    path::PathBuf,
    time::Instant,
};

use clap::{Args, Parser, Subcommand};
use wordtable_core::{clean_file, AnalyzerConfig, WordAnalyzer};

mod logger;

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[arg(long, global = true, help = "JSON file with analyzer settings.")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Log per-file progress.")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Total, unique and most frequent word counts
    Stats(StatsArgs),
    /// Occurrences of a single word
    Count(CountArgs),
    /// Words beginning with a letter
    StartsWith(StartsWithArgs),
    /// Every distinct word in ascending order
    List(ListArgs),
    /// Word counts per paragraph, or details of a single paragraph
    Paragraphs(ParagraphsArgs),
    /// Write a normalized copy of each file next to it
    Clean(Input),
}

#[derive(Args, Debug)]
pub struct Input {
    #[arg(required = true, help = "Text files to analyze, counted together.")]
    pub files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: Input,

    #[arg(long, help = "Print the statistics as JSON.")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CountArgs {
    #[command(flatten)]
    pub input: Input,

    #[arg(long, help = "Word to look up, normalized before the lookup.")]
    pub word: String,
}

#[derive(Args, Debug)]
pub struct StartsWithArgs {
    #[command(flatten)]
    pub input: Input,

    #[arg(long, help = "Initial letter, accents are ignored.")]
    pub letter: char,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub input: Input,

    #[arg(long, help = "1-based page of the listing, sized by `page_size`.")]
    pub page: Option<usize>,

    #[arg(long, help = "Print the whole word table as JSON.")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ParagraphsArgs {
    #[command(flatten)]
    pub input: Input,

    #[arg(long, help = "1-based paragraph to show instead of the full listing.")]
    pub number: Option<usize>,

    #[arg(
        long,
        requires = "number",
        help = "Count words starting with this letter in the paragraph."
    )]
    pub letter: Option<char>,
}

fn load(input: &Input, config: &AnalyzerConfig) -> anyhow::Result<WordAnalyzer> {
    let mut analyzer = WordAnalyzer::with_config(config);

    for path in &input.files {
        let start = Instant::now();
        let lines = analyzer.process_file(path)?;

        log::info!(
            "processed {} ({} lines) in {}",
            path.display(),
            lines,
            humantime::format_duration(start.elapsed())
        );
    }

    Ok(analyzer)
}

fn write_stats<W: Write>(out: &mut W, analyzer: &WordAnalyzer, json: bool) -> anyhow::Result<()> {
    let stats = analyzer.statistics();

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
    } else {
        write!(out, "{stats}")?;
    }

    Ok(())
}

fn write_count<W: Write>(out: &mut W, analyzer: &WordAnalyzer, word: &str) -> anyhow::Result<()> {
    writeln!(
        out,
        "'{}' appears {} times",
        word,
        analyzer.frequency(word)
    )?;
    Ok(())
}

fn write_starts_with<W: Write>(
    out: &mut W,
    analyzer: &WordAnalyzer,
    letter: char,
) -> anyhow::Result<()> {
    if !letter.is_alphabetic() {
        anyhow::bail!("'{letter}' is not a letter");
    }

    let words = analyzer.words_starting_with(letter);
    if words.is_empty() {
        writeln!(out, "No words start with '{letter}'")?;
        return Ok(());
    }

    for (word, count) in &words {
        writeln!(out, "- {word} ({count} occurrences)")?;
    }
    writeln!(out, "\nTotal found: {}", words.len())?;
    writeln!(
        out,
        "Total occurrences: {}",
        analyzer.occurrences_starting_with(letter)
    )?;

    Ok(())
}

fn write_list<W: Write>(
    out: &mut W,
    analyzer: &WordAnalyzer,
    config: &AnalyzerConfig,
    args: &ListArgs,
) -> anyhow::Result<()> {
    let table = analyzer.table();

    if args.json {
        serde_json::to_writer_pretty(&mut *out, table)?;
        writeln!(out)?;
        return Ok(());
    }

    let ranks = match args.page {
        Some(0) => anyhow::bail!("pages are numbered from 1"),
        Some(page) if config.page_size > 0 => {
            let start = (page - 1).saturating_mul(config.page_size).min(table.len());
            start..start.saturating_add(config.page_size).min(table.len())
        }
        _ => 0..table.len(),
    };

    for rank in ranks {
        let word = table.select(rank)?;
        let count = table.get(word).copied().unwrap_or(0);
        writeln!(out, "{:<15} ({} occurrences)", word, count)?;
    }
    writeln!(out, "\nUnique words: {}", table.len())?;

    Ok(())
}

fn write_paragraphs<W: Write>(
    out: &mut W,
    analyzer: &WordAnalyzer,
    config: &AnalyzerConfig,
    args: &ParagraphsArgs,
) -> anyhow::Result<()> {
    let Some(number) = args.number else {
        for (i, paragraph) in analyzer.paragraphs().iter().enumerate() {
            writeln!(out, "Paragraph {:>4}: {:>6} words", i + 1, paragraph.word_count())?;
        }
        writeln!(out, "\nParagraphs: {}", analyzer.paragraphs().len())?;
        return Ok(());
    };

    let Some(paragraph) = analyzer.paragraph(number) else {
        anyhow::bail!(
            "paragraph {number} does not exist, expected 1 to {}",
            analyzer.paragraphs().len()
        );
    };

    writeln!(out, "Paragraph {number} (line {}):", paragraph.first_line())?;
    writeln!(out, "Total words: {}", paragraph.word_count())?;

    match args.letter {
        Some(letter) => {
            if !letter.is_alphabetic() {
                anyhow::bail!("'{letter}' is not a letter");
            }
            writeln!(
                out,
                "Words starting with '{letter}': {}",
                paragraph.occurrences_starting_with(letter)
            )?;
            writeln!(out, "Share: {:.2}%", paragraph.share_starting_with(letter))?;
        }
        None => {
            let excerpt = paragraph.excerpt(config.excerpt_words);
            let more = if excerpt.len() < paragraph.word_count() { " ..." } else { "" };
            writeln!(out, "Excerpt: {}{more}", excerpt.join(" "))?;
        }
    }

    Ok(())
}

fn write_clean<W: Write>(out: &mut W, input: &Input, config: &AnalyzerConfig) -> anyhow::Result<()> {
    for path in &input.files {
        let target = clean_file(path, &config.clean_suffix)?;
        writeln!(out, "{} -> {}", path.display(), target.display())?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => AnalyzerConfig::from_file(path)?,
        None => AnalyzerConfig::default(),
    };
    log::debug!("using {:?}", config);

    let mut out = stdout().lock();
    match &cli.command {
        Commands::Stats(args) => write_stats(&mut out, &load(&args.input, &config)?, args.json),
        Commands::Count(args) => write_count(&mut out, &load(&args.input, &config)?, &args.word),
        Commands::StartsWith(args) => {
            write_starts_with(&mut out, &load(&args.input, &config)?, args.letter)
        }
        Commands::List(args) => write_list(&mut out, &load(&args.input, &config)?, &config, args),
        Commands::Paragraphs(args) => {
            write_paragraphs(&mut out, &load(&args.input, &config)?, &config, args)
        }
        Commands::Clean(input) => write_clean(&mut out, input, &config),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn analyzer() -> WordAnalyzer {
        let mut analyzer = WordAnalyzer::new();
        analyzer.process_text("Yo soy el camino, y la verdad, y la vida");
        analyzer
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> anyhow::Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn list_args(page: Option<usize>) -> ListArgs {
        ListArgs {
            input: Input { files: Vec::new() },
            page,
            json: false,
        }
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_subcommand() {
        let cli = Cli::parse_from(["wordtable", "starts-with", "a.txt", "b.txt", "--letter", "v"]);
        match cli.command {
            Commands::StartsWith(args) => {
                assert_eq!(args.letter, 'v');
                assert_eq!(args.input.files.len(), 2);
            }
            _ => panic!("expected starts-with"),
        }
    }

    #[test]
    fn stats_report() {
        let text = render(|out| write_stats(out, &analyzer(), false));
        assert_eq!(
            text,
            "Total words: 10\nUnique words: 8\nParagraphs: 1\nMost frequent word: y (2 occurrences)\n"
        );
    }

    #[test]
    fn count_report() {
        let text = render(|out| write_count(out, &analyzer(), "VIDA"));
        assert_eq!(text, "'VIDA' appears 1 times\n");
    }

    #[test]
    fn starts_with_report() {
        let text = render(|out| write_starts_with(out, &analyzer(), 'v'));
        assert_eq!(text, "- verdad (1 occurrences)\n- vida (1 occurrences)\n\nTotal found: 2\nTotal occurrences: 2\n");

        let text = render(|out| write_starts_with(out, &analyzer(), 'q'));
        assert_eq!(text, "No words start with 'q'\n");

        assert!(write_starts_with(&mut Vec::new(), &analyzer(), '?').is_err());
    }

    #[test]
    fn list_pages() {
        let config = AnalyzerConfig {
            page_size: 3,
            ..AnalyzerConfig::default()
        };

        let text = render(|out| write_list(out, &analyzer(), &config, &list_args(Some(2))));
        let words: Vec<_> = text
            .lines()
            .take_while(|line| !line.is_empty())
            .map(|line| line.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(words, ["soy", "verdad", "vida"]);
        assert!(text.ends_with("\nUnique words: 8\n"));

        let text = render(|out| write_list(out, &analyzer(), &config, &list_args(Some(9))));
        assert_eq!(text, "\nUnique words: 8\n");

        assert!(write_list(&mut Vec::new(), &analyzer(), &config, &list_args(Some(0))).is_err());
    }

    #[test]
    fn list_page_past_any_length() {
        let text = render(|out| {
            write_list(out, &analyzer(), &AnalyzerConfig::default(), &list_args(Some(usize::MAX)))
        });
        assert_eq!(text, "\nUnique words: 8\n");
    }

    fn paragraphs_args(number: Option<usize>, letter: Option<char>) -> ParagraphsArgs {
        ParagraphsArgs {
            input: Input { files: Vec::new() },
            number,
            letter,
        }
    }

    fn psalm() -> WordAnalyzer {
        let mut analyzer = WordAnalyzer::new();
        analyzer.process_text("Jehová es mi pastor\nnada me faltará\n\nEn lugares de delicados pastos\nme hará descansar");
        analyzer
    }

    #[test]
    fn starts_with_counts_repeated_words() {
        let text = render(|out| write_starts_with(out, &psalm(), 'm'));
        assert_eq!(
            text,
            "- me (2 occurrences)\n- mi (1 occurrences)\n\nTotal found: 2\nTotal occurrences: 3\n"
        );
    }

    #[test]
    fn paragraphs_report() {
        let config = AnalyzerConfig {
            excerpt_words: 4,
            ..AnalyzerConfig::default()
        };

        let text = render(|out| write_paragraphs(out, &psalm(), &config, &paragraphs_args(None, None)));
        assert_eq!(
            text,
            "Paragraph    1:      7 words\nParagraph    2:      8 words\n\nParagraphs: 2\n"
        );

        let text = render(|out| write_paragraphs(out, &psalm(), &config, &paragraphs_args(Some(2), None)));
        assert_eq!(
            text,
            "Paragraph 2 (line 4):\nTotal words: 8\nExcerpt: en lugares de delicados ...\n"
        );

        let text = render(|out| {
            write_paragraphs(out, &psalm(), &config, &paragraphs_args(Some(2), Some('D')))
        });
        assert_eq!(
            text,
            "Paragraph 2 (line 4):\nTotal words: 8\nWords starting with 'D': 3\nShare: 37.50%\n"
        );

        for number in [0, 3, usize::MAX] {
            let args = paragraphs_args(Some(number), None);
            assert!(write_paragraphs(&mut Vec::new(), &psalm(), &config, &args).is_err());
        }
    }

    #[test]
    fn parse_paragraph_letter_requires_number() {
        assert!(Cli::try_parse_from(["wordtable", "paragraphs", "a.txt", "--letter", "d"]).is_err());

        let cli = Cli::parse_from(["wordtable", "paragraphs", "a.txt", "--number", "3", "--letter", "d"]);
        match cli.command {
            Commands::Paragraphs(args) => {
                assert_eq!(args.number, Some(3));
                assert_eq!(args.letter, Some('d'));
            }
            _ => panic!("expected paragraphs"),
        }
    }

    #[test]
    fn clean_report() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("salmo.txt");
        std::fs::write(&path, "Jehová es mi pastor;\nnada me faltará.\n")?;

        let input = Input { files: vec![path.clone()] };
        let text = render(|out| write_clean(out, &input, &AnalyzerConfig::default()));

        let target = dir.path().join("salmo.limpio.txt");
        assert_eq!(text, format!("{} -> {}\n", path.display(), target.display()));
        assert_eq!(
            std::fs::read_to_string(&target)?,
            "jehova es mi pastor\nnada me faltara\n"
        );
        Ok(())
    }
}
