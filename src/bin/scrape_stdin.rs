//! Small CLI that reads HTML from stdin and prints what the scanner sees.
//!
//! Usage: `scrape_stdin [forms|tree|outline|links|text]` (default `forms`).
//! Set `RUST_LOG=rs_tagscrape=debug` to see recovered markup problems.

use rs_tagscrape::{build_tree, encoding, extract_forms, iterate, text, Options};
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

fn run(mode: &str, html: &str) -> Result<String, String> {
    let options = Options::default();
    match mode {
        "forms" => {
            let forms = extract_forms(html, &options).map_err(|e| e.to_string())?;
            serde_json::to_string_pretty(&forms).map_err(|e| e.to_string())
        }
        "tree" => Ok(build_tree(html, &options).to_string()),
        "outline" => {
            let mut out = Vec::new();
            iterate(html, &options).with_diagnostics(&mut out).for_each(|_| {});
            Ok(String::from_utf8_lossy(&out).into_owned())
        }
        "links" => {
            let links = text::links(html, None).map_err(|e| e.to_string())?;
            serde_json::to_string_pretty(&links).map_err(|e| e.to_string())
        }
        "text" => Ok(text::norm(&rs_tagscrape::entities::expand(&text::text(html, &options)))),
        other => Err(format!("unknown mode: {other} (expected forms, tree, outline, links or text)")),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mode = std::env::args().nth(1).unwrap_or_else(|| "forms".to_string());

    // Read raw bytes so undeclared legacy pages still decode
    let mut bytes = Vec::new();
    if io::stdin().read_to_end(&mut bytes).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }
    let html = encoding::decode(&bytes);

    match run(&mode, &html) {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            if writeln!(stdout, "{}", output.trim_end()).is_err() {
                std::process::exit(1);
            }
        }
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    }
}
