//! AFL++ fuzz target for `jira2md`.
//!
//! This binary is intentionally stdin-driven, so it can be used with AFL++.
//! Build and run it via `cargo-afl`:
//!
//! ```bash
//! cargo install cargo-afl
//!
//! cargo afl build --release --features afl_fuzz --bin jira2md_afl_convert
//!
//! mkdir -p fuzz/afl/out
//!
//! cargo afl fuzz \
//!   -i fuzz/afl/in \
//!   -o fuzz/afl/out \
//!   target/release/jira2md_afl_convert
//! ```
//!
//! Rust panics normally unwind and exit with a non-crashing status code.
//! AFL++ only treats crashes as signals/aborts. We therefore catch any unwind
//! and turn it into `abort()`.

use std::io::Read;

use jira2md::{ConvertOptions, Direction, md_to_html, to_markdown, wiki_to_html};

const MAX_INPUT_LEN: usize = 1_000_000; // 1MB guardrail; AFL++ will typically cap this anyway.

fn run_one_input(data: &[u8]) {
    if data.len() > MAX_INPUT_LEN {
        return;
    }

    // tracker text should be UTF-8, but AFL++ will happily hand us arbitrary bytes.
    let src = String::from_utf8_lossy(data).to_string();

    // every direction is total: no panics, whatever the input.
    let plain = ConvertOptions::default();
    let decoding = ConvertOptions {
        decode_entities: true,
        ..ConvertOptions::default()
    };
    for direction in Direction::ALL {
        let _ = jira2md::convert(&src, direction, &plain);
        let _ = jira2md::convert(&src, direction, &decoding);
    }

    // wiki -> html is exactly wiki -> markdown -> html.
    assert_eq!(wiki_to_html(&src), md_to_html(&to_markdown(&src)));
}

fn main() {
    let mut data = Vec::new();
    if std::io::stdin().read_to_end(&mut data).is_err() {
        return;
    }

    // convert any panic into an abort().
    if std::panic::catch_unwind(|| run_one_input(&data)).is_err() {
        std::process::abort();
    }
}
