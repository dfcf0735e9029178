pub mod html;
pub mod jira;
pub mod markdown;
pub mod rule;

pub use html::{HtmlOptions, md_to_html, md_to_html_with_options};
pub use jira::to_wiki;
pub use markdown::to_markdown;

use serde::Serialize;
use std::borrow::Cow;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Converts Jira wiki markup to HTML by way of Markdown.
pub fn wiki_to_html(wiki: &str) -> String {
    wiki_to_html_with_options(wiki, &HtmlOptions::default())
}

pub fn wiki_to_html_with_options(wiki: &str, opts: &HtmlOptions) -> String {
    md_to_html_with_options(&to_markdown(wiki), opts)
}

/// Which way a conversion goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, clap::ValueEnum)]
pub enum Direction {
    #[default]
    #[serde(rename = "wiki-to-md")]
    #[value(name = "wiki-to-md")]
    WikiToMarkdown,

    #[serde(rename = "md-to-wiki")]
    #[value(name = "md-to-wiki")]
    MarkdownToWiki,

    #[serde(rename = "md-to-html")]
    #[value(name = "md-to-html")]
    MarkdownToHtml,

    #[serde(rename = "wiki-to-html")]
    #[value(name = "wiki-to-html")]
    WikiToHtml,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::WikiToMarkdown,
        Direction::MarkdownToWiki,
        Direction::MarkdownToHtml,
        Direction::WikiToHtml,
    ];

    /// File extension of the input side, as used by the bulk mode.
    pub fn source_extension(self) -> &'static str {
        match self {
            Direction::WikiToMarkdown | Direction::WikiToHtml => "jira",
            Direction::MarkdownToWiki | Direction::MarkdownToHtml => "md",
        }
    }

    /// File extension of the output side, as used by the bulk mode.
    pub fn target_extension(self) -> &'static str {
        match self {
            Direction::WikiToMarkdown => "md",
            Direction::MarkdownToWiki => "jira",
            Direction::MarkdownToHtml | Direction::WikiToHtml => "html",
        }
    }
}

/// Options shared by every conversion entry point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub html: HtmlOptions,

    /// If true, decode HTML entities (`&amp;`, `&lt;`, ...) in the input before converting.
    /// Tracker APIs frequently hand back entity-encoded text.
    pub decode_entities: bool,
}

/// The result of converting one input, as printed by `--json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub direction: Direction,

    /// Path of the input file; `None` for stdin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    pub output: String,
}

/// Converts `input` in the given direction.
pub fn convert(input: &str, direction: Direction, opts: &ConvertOptions) -> String {
    let input: Cow<'_, str> = if opts.decode_entities {
        html_escape::decode_html_entities(input)
    } else {
        Cow::Borrowed(input)
    };

    debug!(?direction, bytes = input.len(), "converting");
    match direction {
        Direction::WikiToMarkdown => to_markdown(&input),
        Direction::MarkdownToWiki => to_wiki(&input),
        Direction::MarkdownToHtml => md_to_html_with_options(&input, &opts.html),
        Direction::WikiToHtml => wiki_to_html_with_options(&input, &opts.html),
    }
}

/// Reads `path` and converts its contents.
pub fn convert_file(
    path: &Path,
    direction: Direction,
    opts: &ConvertOptions,
) -> Result<String, Box<dyn Error>> {
    let text = read_lossy(path)?;
    debug!(path = %path.display(), "read input file");
    Ok(convert(&text, direction, opts))
}

/// Bulk mode: walk `src_root` and convert every file with the direction's source
/// extension into the same relative location under `dst_root`.
///
/// Returns the number of files written.
pub fn convert_all_in_dirs(
    src_root: &Path,
    dst_root: &Path,
    direction: Direction,
    opts: &ConvertOptions,
) -> Result<usize, Box<dyn Error>> {
    let start_time = Instant::now();

    if !src_root.exists() {
        return Err(format!("Source directory not found: {}", src_root.display()).into());
    }

    let source_ext = direction.source_extension();
    let mut entries: Vec<_> = WalkDir::new(src_root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == source_ext)
        })
        .collect();

    entries.sort_by(|a, b| a.path().cmp(b.path()));

    let total = entries.len();
    let mut count = 0;

    for entry in entries {
        let path = entry.path();
        // keep the source layout in the destination tree.
        let relative = path.strip_prefix(src_root)?;

        let mut dst_path = dst_root.join(relative);
        dst_path.set_extension(direction.target_extension());

        if let Some(parent) = dst_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let output = convert_file(path, direction, opts)?;
        fs::write(&dst_path, output)?;

        count += 1;

        let elapsed_ms = start_time.elapsed().as_millis();
        info!(
            "[{:>4}/{:>4}] [{:02}:{:02}.{:03}] Converted: {}",
            count,
            total,
            elapsed_ms / 60_000,
            (elapsed_ms % 60_000) / 1_000,
            elapsed_ms % 1_000,
            dst_path.display()
        );
    }

    let total_secs = start_time.elapsed().as_secs_f64();
    let avg_str = if count > 0 {
        format!("{:.3}s", total_secs / count as f64)
    } else {
        "-".to_string()
    };

    info!(
        "Done. Converted {} files in {:.3}s (avg {}/doc).",
        count, total_secs, avg_str
    );
    Ok(count)
}

fn read_lossy(path: &Path) -> Result<String, Box<dyn Error>> {
    let bytes = fs::read(path)?;

    // if we ever encounter invalid UTF-8, fallback to lossy conversion
    Ok(String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
}
