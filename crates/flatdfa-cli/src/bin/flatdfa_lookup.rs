// flatdfa-lookup: Classify words from stdin with a built table.
//
// Reads words from stdin (one per line, whitespace-separated symbols) and
// prints the value of each, or `null` when the word was never inserted.
// Blank and malformed lines also print `null`, so output lines match input
// lines; the reason for a malformed line is logged to stderr.
//
// Usage:
//   flatdfa-lookup TABLE
//
// Options:
//   -h, --help              Print help

use std::io::{self, BufRead, Write};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if flatdfa_cli::wants_help(&args) {
        println!("flatdfa-lookup: Classify words from stdin with a built table.");
        println!();
        println!("Usage: flatdfa-lookup TABLE");
        println!();
        println!("TABLE is a binary table, or a JSON document if it ends in .json.");
        println!("Reads words from stdin (one per line, whitespace-separated");
        println!("symbols) and prints each word's value, or null.");
        println!();
        println!("Options:");
        println!("  -h, --help              Print this help");
        return;
    }

    flatdfa_cli::init_logging();

    let [path] = args.as_slice() else {
        flatdfa_cli::fatal("expected exactly one TABLE argument");
    };
    let table = flatdfa_cli::load_table(path).unwrap_or_else(|e| flatdfa_cli::fatal(&e.to_string()));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for (index, line) in stdin.lock().lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("error reading stdin: {e}");
                break;
            }
        };
        let written = writeln!(out, "{}", flatdfa_cli::classify_line(&table, &line, index + 1));
        if let Err(e) = written {
            flatdfa_cli::fatal(&format!("failed to write output: {e}"));
        }
    }

    if let Err(e) = out.flush() {
        flatdfa_cli::fatal(&format!("failed to write output: {e}"));
    }
}
