//! Ordered text-rewrite rules.
//!
//! A [`Pipeline`] is a fixed list of [`Rule`]s applied one after another to the
//! whole accumulated string. Each rule sees the output of every rule declared
//! before it and none of the rules declared after it, so the declaration order
//! is part of the conversion's behavior.

use regex::{Captures, Regex};
use std::borrow::Cow;
use tracing::{debug, trace};

/// A single rewrite step.
pub struct Rule {
    name: &'static str,
    kind: RuleKind,
}

enum RuleKind {
    /// Global substitution with a `$n` replacement template.
    Template { pattern: Regex, template: &'static str },

    /// Global substitution where each match is rewritten by a function of its captures.
    Transform {
        pattern: Regex,
        transform: fn(&Captures) -> String,
    },

    /// Whole-string rewrite for constructs a backreference-free regex cannot express.
    Scan(fn(&str) -> String),
}

impl Rule {
    /// Builds a rule substituting every match of `pattern` with `template`.
    ///
    /// Patterns are compile-time literals; an invalid one is a programming error.
    pub fn template(name: &'static str, pattern: &str, template: &'static str) -> Self {
        Self {
            name,
            kind: RuleKind::Template {
                pattern: compile(name, pattern),
                template,
            },
        }
    }

    /// Builds a rule rewriting every match of `pattern` with `transform`.
    pub fn transform(name: &'static str, pattern: &str, transform: fn(&Captures) -> String) -> Self {
        Self {
            name,
            kind: RuleKind::Transform {
                pattern: compile(name, pattern),
                transform,
            },
        }
    }

    /// Builds a rule that rewrites the whole string with a hand-written scanner.
    pub fn scan(name: &'static str, scan: fn(&str) -> String) -> Self {
        Self {
            name,
            kind: RuleKind::Scan(scan),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Applies the rule, borrowing the input back when nothing matched.
    pub fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        match &self.kind {
            RuleKind::Template { pattern, template } => pattern.replace_all(input, *template),
            RuleKind::Transform { pattern, transform } => {
                pattern.replace_all(input, |caps: &Captures| transform(caps))
            }
            RuleKind::Scan(scan) => {
                let out = scan(input);
                if out == input {
                    Cow::Borrowed(input)
                } else {
                    Cow::Owned(out)
                }
            }
        }
    }
}

fn compile(name: &str, pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("rule '{name}' has an invalid pattern: {e}"),
    }
}

/// An immutable, ordered sequence of rules.
pub struct Pipeline {
    name: &'static str,
    rules: Vec<Rule>,
}

impl Pipeline {
    pub fn new(name: &'static str, rules: Vec<Rule>) -> Self {
        Self { name, rules }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Runs every rule in declaration order over `input`.
    pub fn run(&self, input: &str) -> String {
        let mut text = input.to_string();
        let mut rewrites = 0;
        for rule in &self.rules {
            if let Cow::Owned(next) = rule.apply(&text) {
                trace!(pipeline = self.name, rule = rule.name, "rule rewrote text");
                text = next;
                rewrites += 1;
            }
        }
        debug!(pipeline = self.name, rewrites, "pipeline finished");
        text
    }
}
