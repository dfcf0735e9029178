//! Markdown -> Jira wiki markup.
//!
//! This is not the inverse of [`crate::markdown`] rule for rule. Color annotations
//! cannot be recovered, and a Markdown table is turned into either a wiki table or
//! a `{panel}` by looking at its shape alone: one header cell over one body row is
//! taken to be a panel. A genuine one-cell table is therefore converted to a panel
//! too; content converted earlier relies on that, so the heuristic stays as is.

use crate::rule::{Pipeline, Rule};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// HTML inline tags and the wiki character that wraps their content.
///
/// `cite` (`??`) is intentionally absent: citations are not converted in either direction.
const INLINE_TAGS: [(&str, &str); 4] = [("del", "-"), ("ins", "+"), ("sup", "^"), ("sub", "~")];

static PIPELINE: LazyLock<Pipeline> = LazyLock::new(|| {
    let inline_tags = INLINE_TAGS
        .iter()
        .map(|(tag, _)| format!("<{tag}>(.*?)</{tag}>"))
        .collect::<Vec<_>>()
        .join("|");

    Pipeline::new(
        "markdown-to-wiki",
        vec![
            Rule::transform(
                "table",
                r"(?m)^\n((?:\|.*?)+\|)[ \t]*\n((?:\|\s*?-{3,}\s*?)+\|)[ \t]*\n((?:(?:\|.*?)+\|[ \t]*\n)*)$",
                table,
            ),
            Rule::scan("emphasis", emphasis),
            Rule::transform("atx header", r"(?m)^(#+)(.*?)$", atx_header),
            Rule::transform("setext header", r"(?m)^(.*?)\n([=-]+)$", setext_header),
            Rule::transform("ordered list", r"(?m)^([ \t]*)\d+\.\s+", ordered_list),
            Rule::transform("unordered list", r"(?m)^([ \t]*)\*\s+", unordered_list),
            Rule::transform("inline tag", &inline_tags, inline_tag),
            Rule::template("strikethrough", r"(\s+)~~(.*?)~~(\s+)", "$1-$2-$3"),
            Rule::transform("code block", r"```(.+\n)?(?s:(.*?))```", code_block),
            Rule::template("inline code", r"`([^`]+)`", "{{$1}}"),
            Rule::template(
                "linked image",
                r"\[!\[[^\]]*\]\(([^)]+)\)\]\(([^)]+)\)",
                "[!$1!|$2]",
            ),
            Rule::template("image", r"!\[[^\]]*\]\(([^)]+)\)", "!$1!"),
            Rule::template("named link", r"\[([^\]]+)\]\(([^)]+)\)", "[$1|$2]"),
            Rule::template("unnamed link", r"<([^>]+)>", "[$1]"),
            Rule::template("blockquote", r"(?m)^>", "bq."),
        ],
    )
});

static PANEL_BODY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\|(.*)[ \t]*\|").unwrap());

/// Converts Markdown to Jira wiki markup.
///
/// Best effort: anything the rules do not recognize is passed through as-is.
pub fn to_wiki(markdown: &str) -> String {
    pipeline().run(markdown)
}

pub(crate) fn pipeline() -> &'static Pipeline {
    &PIPELINE
}

/// Cell contents of a `|a|b|` row: every non-empty run between two pipes.
fn cells(row: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = row.split('|').collect();
    // the text after the final pipe is not a cell.
    segments.pop();
    segments.into_iter().filter(|s| !s.is_empty()).collect()
}

fn table(caps: &Captures) -> String {
    let headers = cells(&caps[1]);
    let separators = cells(&caps[2]);
    if headers.len() != separators.len() {
        return caps[0].to_string();
    }

    let rows = &caps[3];
    if headers.len() == 1 && rows.matches('\n').count() == 1 {
        let body = PANEL_BODY.replace(rows, "$1");
        return format!(
            "{{panel:title={}}}\n{}\n{{panel}}\n",
            headers[0].trim(),
            body.trim()
        );
    }

    format!("||{}||\n{}", headers.join("||"), rows)
}

fn is_wrapper(b: u8) -> bool {
    b == b'*' || b == b'_'
}

/// Markdown emphasis: a run of `*`/`_` closed by the identical run on the same line.
///
/// The closing run has to repeat the opening one exactly, which a regex without
/// backreferences cannot say, hence the scanner. The longest opening run is tried
/// first, then shorter ones; the closest closing run wins.
fn emphasis(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if !is_wrapper(bytes[i]) {
            i += 1;
            continue;
        }

        let run = bytes[i..].iter().take_while(|b| is_wrapper(**b)).count();
        let Some((len, close)) = (1..=run).rev().find_map(|len| find_closing(input, i, len)) else {
            i += 1;
            continue;
        };

        let wrapper = &input[i..i + len];
        let content = &input[i + len..close];
        out.push_str(&input[copied..i]);
        out.push_str(&wiki_emphasis(wrapper, content));

        i = close + len;
        copied = i;
    }

    out.push_str(&input[copied..]);
    out
}

/// Finds where the run `input[start..start + len]` closes, if it does.
fn find_closing(input: &str, start: usize, len: usize) -> Option<(usize, usize)> {
    let wrapper = &input[start..start + len];
    let body = &input[start + len..];

    let first = body.chars().next()?;
    if first.is_whitespace() {
        return None;
    }

    let line_end = body.find('\n').unwrap_or(body.len());
    let from = first.len_utf8();
    if line_end < from + len {
        return None;
    }

    body[from..line_end]
        .find(wrapper)
        .map(|offset| (len, start + len + from + offset))
}

fn wiki_emphasis(wrapper: &str, content: &str) -> String {
    match wrapper.len() {
        1 => format!("_{content}_"),
        2 => format!("*{content}*"),
        3 => format!("_*{content}*_"),
        _ => format!("{wrapper}{content}{wrapper}"),
    }
}

fn atx_header(caps: &Captures) -> String {
    format!("h{}.{}", caps[1].len(), &caps[2])
}

fn setext_header(caps: &Captures) -> String {
    let level = if caps[2].starts_with('=') { 1 } else { 2 };
    format!("h{}. {}", level, &caps[1])
}

fn ordered_list(caps: &Captures) -> String {
    format!("{} ", "#".repeat(caps[1].len() / 3 + 1))
}

fn unordered_list(caps: &Captures) -> String {
    format!("{} ", "*".repeat(caps[1].len() / 2 + 1))
}

fn inline_tag(caps: &Captures) -> String {
    INLINE_TAGS
        .iter()
        .enumerate()
        .find_map(|(idx, (_, wrapper))| {
            caps.get(idx + 1)
                .map(|content| format!("{wrapper}{}{wrapper}", content.as_str()))
        })
        .unwrap_or_else(|| caps[0].to_string())
}

fn code_block(caps: &Captures) -> String {
    match caps.get(1) {
        Some(lang) => format!(
            "{{code:{}}}\n{}{{code}}",
            lang.as_str().replace('\n', ""),
            &caps[2]
        ),
        None => format!("{{code}}{}{{code}}", &caps[2]),
    }
}
