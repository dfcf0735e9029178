//! Jira wiki markup -> Markdown.
//!
//! The conversion is a single [`Pipeline`] of whole-string rewrites. Order matters:
//! list markers are rewritten before emphasis so that a `*` list bullet is never
//! read as bold, and the table rules run last so they see the rows produced by
//! the panel rule.
//!
//! Citations (`??text??`) are deliberately left alone; the syntax collides with
//! too much ordinary text to be converted safely.

use crate::rule::{Pipeline, Rule};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PIPELINE: LazyLock<Pipeline> = LazyLock::new(|| {
    Pipeline::new(
        "wiki-to-markdown",
        vec![
            Rule::transform("unordered list", r"(?m)^[ \t]*(\*+)\s+", unordered_list),
            Rule::transform("ordered list", r"(?m)^[ \t]*(#+)\s+", ordered_list),
            Rule::transform("header", r"(?m)^h([0-6])\.(.*)$", header),
            Rule::template("bold", r"\*(\S.*)\*", "**$1**"),
            Rule::template("italic", r"_(\S.*)_", "*$1*"),
            Rule::template("monospace", r"\{\{([^}]+)\}\}", "`$1`"),
            Rule::template("insert", r"\+([^+]*)\+", "<ins>$1</ins>"),
            Rule::template("superscript", r"\^([^\^]*)\^", "<sup>$1</sup>"),
            Rule::template("subscript", r"~([^~]*)~", "<sub>$1</sub>"),
            Rule::template("strikethrough", r"(\s+)-(\S+.*?\S)-(\s+)", "$1~~$2~~$3"),
            Rule::template(
                "code block",
                r"\{code(:([a-z]+))?([:|]?(title|borderStyle|borderColor|borderWidth|bgColor|titleBGColor)=[^\n]+?)*\}(?s:(.*?))\n?\{code\}",
                "```${2}${5}\n```",
            ),
            Rule::template("noformat", r"\{noformat\}", "```"),
            Rule::template("unnamed link", r"\[([^|]+?)\]", "<$1>"),
            Rule::template("image", r"!(.+)!", "![]($1)"),
            Rule::template("named link", r"\[(.+?)\|(.+?)\]", "[$1]($2)"),
            Rule::template("blockquote", r"(?m)^bq\.\s+", "> "),
            Rule::template("color", r"\{color:[^}]+\}(?s:(.*?))\{color\}", "$1"),
            Rule::template(
                "panel",
                r"\{panel:title=([^}]*)\}\n?(?s:(.*?))\n?\{panel\}",
                "\n| $1 |\n| --- |\n| $2 |",
            ),
            Rule::transform(
                "table header",
                r"(?m)^[ \t]*((?:\|\|.*?)+\|\|)[ \t]*$",
                table_header,
            ),
            Rule::template("table row indent", r"(?m)^[ \t]*\|", "|"),
        ],
    )
});

static HEADER_CELL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|[^|]+").unwrap());

/// Converts Jira wiki markup to Markdown.
///
/// Best effort: anything the rules do not recognize is passed through as-is.
pub fn to_markdown(wiki: &str) -> String {
    pipeline().run(wiki)
}

pub(crate) fn pipeline() -> &'static Pipeline {
    &PIPELINE
}

fn unordered_list(caps: &Captures) -> String {
    // two spaces of indent per nesting level below the first.
    format!("{}* ", "  ".repeat(caps[1].len() - 1))
}

fn ordered_list(caps: &Captures) -> String {
    // three spaces per level, the width of `1. `.
    format!("{}1. ", "   ".repeat(caps[1].len() - 1))
}

fn header(caps: &Captures) -> String {
    let level = usize::from(caps[1].as_bytes()[0] - b'0');
    format!("{}{}", "#".repeat(level), &caps[2])
}

fn table_header(caps: &Captures) -> String {
    let single_barred = caps[1].replace("||", "|");
    let separator = HEADER_CELL.replace_all(&single_barred, "| --- ");
    format!("\n{single_barred}\n{separator}")
}
