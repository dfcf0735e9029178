use clap::Parser;
use jira2md::{Conversion, ConvertOptions, Direction, HtmlOptions};
use std::error::Error;
use std::io;
use std::path::PathBuf;

/// Convert between Jira wiki markup, Markdown and HTML.
#[derive(Debug, Parser)]
#[command(name = "jira2md", version, about)]
struct Cli {
    /// Input files. Reads stdin when none are given.
    files: Vec<PathBuf>,

    /// Conversion direction.
    #[arg(short, long, value_enum, default_value_t = Direction::WikiToMarkdown)]
    direction: Direction,

    /// Bulk mode: convert every matching file under SRC into the same layout under DST.
    #[arg(
        long,
        num_args = 2,
        value_names = ["SRC", "DST"],
        conflicts_with = "files"
    )]
    convert_all: Option<Vec<PathBuf>>,

    /// Keep single line breaks as soft breaks in HTML output.
    #[arg(long)]
    no_hard_breaks: bool,

    /// Disable curly quotes and typographic dashes in HTML output.
    #[arg(long)]
    no_smart_punctuation: bool,

    /// Decode HTML entities in the input before converting.
    #[arg(long)]
    decode_entities: bool,

    /// Print one JSON object per input instead of the raw output.
    #[arg(long)]
    json: bool,

    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .init();

    let opts = ConvertOptions {
        html: HtmlOptions {
            hard_breaks: !cli.no_hard_breaks,
            smart_punctuation: !cli.no_smart_punctuation,
        },
        decode_entities: cli.decode_entities,
    };

    if let Some(dirs) = &cli.convert_all {
        let [src, dst] = dirs.as_slice() else {
            return Err("--convert-all takes exactly two directories".into());
        };
        jira2md::convert_all_in_dirs(src, dst, cli.direction, &opts)?;
        return Ok(());
    }

    if cli.files.is_empty() {
        let input = io::read_to_string(io::stdin())?;
        let conversion = Conversion {
            direction: cli.direction,
            source: None,
            output: jira2md::convert(&input, cli.direction, &opts),
        };
        return emit(&conversion, cli.json);
    }

    for path in &cli.files {
        let conversion = Conversion {
            direction: cli.direction,
            source: Some(path.to_string_lossy().to_string()),
            output: jira2md::convert_file(path, cli.direction, &opts)?,
        };
        emit(&conversion, cli.json)?;
    }

    Ok(())
}

fn emit(conversion: &Conversion, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string(conversion)?);
    } else {
        println!("{}", conversion.output);
    }
    Ok(())
}
