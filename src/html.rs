//! Markdown -> HTML, via `pulldown-cmark`.

use pulldown_cmark::{Event, Options, Parser, html};

/// Flags for HTML rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Render every single line break as `<br />` instead of folding it into a space.
    pub hard_breaks: bool,

    /// Typographic substitution: curly quotes, en/em dashes and ellipses.
    pub smart_punctuation: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            hard_breaks: true,
            smart_punctuation: true,
        }
    }
}

impl HtmlOptions {
    fn parser_options(&self) -> Options {
        let mut options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        if self.smart_punctuation {
            options |= Options::ENABLE_SMART_PUNCTUATION;
        }
        options
    }
}

pub fn md_to_html(markdown: &str) -> String {
    md_to_html_with_options(markdown, &HtmlOptions::default())
}

pub fn md_to_html_with_options(markdown: &str, opts: &HtmlOptions) -> String {
    let hard_breaks = opts.hard_breaks;
    let events = Parser::new_ext(markdown, opts.parser_options()).map(move |event| match event {
        Event::SoftBreak if hard_breaks => Event::HardBreak,
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}
