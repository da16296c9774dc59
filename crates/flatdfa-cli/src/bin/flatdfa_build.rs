// flatdfa-build: Build a minimal classifier table from samples.
//
// Reads samples (one per line: symbols followed by the value) from a file or
// stdin, builds the minimal table, checks that every sample classifies to its
// value, and writes the table.
//
// Usage:
//   flatdfa-build [-a N] [-l N] [--on-conflict first|error] [--format bin|json]
//                 [-o OUT] [INPUT]
//
// Options:
//   -a, --alphabet N        Alphabet size (default: largest symbol + 1)
//   -l, --length N          Word length (default: length of the first word)
//   --on-conflict POLICY    `error` (default) or `first` for repeated words
//   --format FORMAT         `bin` (default) or `json`
//   -o, --output PATH       Output file (default: stdout)
//   -h, --help              Print help

use flatdfa_build::{BuildOptions, DfaBuilder, DuplicatePolicy};
use flatdfa_cli::{CliError, TableFormat};
use tracing::info;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if flatdfa_cli::wants_help(&args) {
        println!("flatdfa-build: Build a minimal classifier table from samples.");
        println!();
        println!("Usage: flatdfa-build [-a N] [-l N] [--on-conflict first|error]");
        println!("                     [--format bin|json] [-o OUT] [INPUT]");
        println!();
        println!("Reads samples from INPUT (or stdin), one per line: the word's");
        println!("symbols followed by its value, whitespace-separated. '#' starts");
        println!("a comment. An INPUT ending in .json is read as a JSON array of");
        println!("{{\"word\": [...], \"value\": N}} objects.");
        println!();
        println!("Options:");
        println!("  -a, --alphabet N        Alphabet size (default: largest symbol + 1)");
        println!("  -l, --length N          Word length (default: first word's length)");
        println!("  --on-conflict POLICY    error (default) or first");
        println!("  --format FORMAT         bin (default) or json");
        println!("  -o, --output PATH       Output file (default: stdout)");
        println!("  -h, --help              Print this help");
        println!();
        println!("Set FLATDFA_LOG=debug to see build statistics.");
        return;
    }

    flatdfa_cli::init_logging();

    let (alphabet, args) = flatdfa_cli::parse_option(&args, "-a", "--alphabet");
    let (length, args) = flatdfa_cli::parse_option(&args, "-l", "--length");
    let (conflict, args) = flatdfa_cli::parse_option(&args, "", "--on-conflict");
    let (format, args) = flatdfa_cli::parse_option(&args, "", "--format");
    let (output, args) = flatdfa_cli::parse_option(&args, "-o", "--output");

    if let Some(unknown) = args.iter().find(|a| a.starts_with('-') && a.as_str() != "-") {
        flatdfa_cli::fatal(&format!("unknown option {unknown}"));
    }
    if args.len() > 1 {
        flatdfa_cli::fatal("expected at most one INPUT");
    }
    let input = args.first().map(String::as_str);

    let mut options = BuildOptions::default();
    if let Some(a) = alphabet {
        options = options.with_alphabet_size(flatdfa_cli::parse_value("--alphabet", &a));
    }
    if let Some(l) = length {
        options = options.with_word_length(flatdfa_cli::parse_value("--length", &l));
    }
    options = options.with_duplicates(match conflict.as_deref() {
        None | Some("error") => DuplicatePolicy::Reject,
        Some("first") => DuplicatePolicy::FirstWins,
        Some(other) => flatdfa_cli::fatal(&format!(
            "unknown conflict policy '{other}' (expected error or first)"
        )),
    });
    let format = match format {
        Some(f) => f.parse::<TableFormat>().unwrap_or_else(|e| flatdfa_cli::fatal(&e)),
        None => output
            .as_deref()
            .map(TableFormat::from_path)
            .unwrap_or_default(),
    };

    if let Err(e) = run(input, options, format, output.as_deref()) {
        flatdfa_cli::fatal(&e.to_string());
    }
}

fn run(
    input: Option<&str>,
    options: BuildOptions,
    format: TableFormat,
    output: Option<&str>,
) -> Result<(), CliError> {
    let samples = flatdfa_cli::read_samples(input)?;
    let shape = options.resolve_shape(&samples).map_err(flatdfa_build::BuildError::from)?;
    let policy = options.duplicates;

    let mut builder = DfaBuilder::new(shape, options);
    builder.insert_all(&samples)?;
    let stats = builder.stats();
    let table = builder.finish()?;

    // Under first-wins, later conflicting samples are expected to disagree.
    if policy == DuplicatePolicy::Reject {
        table.check_samples(&samples)?;
    }

    info!(
        samples = samples.len(),
        states = table.state_count(),
        values = stats.distinct_values,
        "built table"
    );
    let data = flatdfa_cli::encode_table(&table, format)?;
    flatdfa_cli::write_output(output, &data)
}
