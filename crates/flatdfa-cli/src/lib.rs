// flatdfa-cli: shared utilities for CLI tools.

use std::io::{self, Read, Write};
use std::path::Path;
use std::process;
use std::str::FromStr;

use flatdfa_build::BuildError;
use flatdfa_core::{Sample, Symbol, Value};
use flatdfa_table::document::TableDocument;
use flatdfa_table::{TableError, TransitionTable, VerifyError};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "FLATDFA_LOG";

/// Error type shared by the CLI tools.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("verification failed: {0}")]
    Verify(#[from] VerifyError),
}

/// On-disk encoding of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    #[default]
    Binary,
    Json,
}

impl FromStr for TableFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bin" | "binary" => Ok(Self::Binary),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown table format '{other}' (expected bin or json)")),
        }
    }
}

impl TableFormat {
    /// Format implied by a file name: `.json` is JSON, anything else binary.
    pub fn from_path(path: &str) -> Self {
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            _ => Self::Binary,
        }
    }
}

/// Install the stderr log subscriber, filtered by `FLATDFA_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Parse samples in the text format.
///
/// One sample per line: whitespace-separated integers, the last one is the
/// value and the rest form the word. `#` starts a comment; blank lines are
/// skipped.
pub fn parse_samples(text: &str) -> Result<Vec<Sample>, CliError> {
    let mut samples = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let mut fields: Vec<&str> = content.split_whitespace().collect();
        let Some(value_field) = fields.pop() else {
            continue;
        };
        let value: Value = value_field.parse().map_err(|_| CliError::Parse {
            line,
            message: format!("invalid value '{value_field}'"),
        })?;
        if fields.is_empty() {
            return Err(CliError::Parse {
                line,
                message: "sample has a value but no word".to_string(),
            });
        }
        let word = parse_symbols(&fields).map_err(|message| CliError::Parse { line, message })?;
        samples.push(Sample::new(word, value));
    }
    Ok(samples)
}

/// Parse a word given as whitespace-separated symbols.
pub fn parse_word(line: &str) -> Result<Vec<Symbol>, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    parse_symbols(&fields)
}

/// Output line for one input line of `flatdfa-lookup`: the value, or `null`.
///
/// Blank lines and malformed words give `null` so the output stays aligned
/// with the input; malformed words are logged with their line number.
pub fn classify_line(table: &TransitionTable, line: &str, line_number: usize) -> String {
    if line.trim().is_empty() {
        return "null".to_string();
    }
    let result = parse_word(line).and_then(|word| table.lookup(&word).map_err(|e| e.to_string()));
    match result {
        Ok(Some(value)) => value.to_string(),
        Ok(None) => "null".to_string(),
        Err(reason) => {
            warn!(line = line_number, %reason, "invalid word");
            "null".to_string()
        }
    }
}

fn parse_symbols(fields: &[&str]) -> Result<Vec<Symbol>, String> {
    fields
        .iter()
        .map(|f| f.parse::<Symbol>().map_err(|_| format!("invalid symbol '{f}'")))
        .collect()
}

/// Read a whole input file, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&str>) -> Result<Vec<u8>, CliError> {
    match path {
        None | Some("-") => {
            let mut data = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut data)
                .map_err(|source| CliError::Read {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(data)
        }
        Some(p) => std::fs::read(p).map_err(|source| CliError::Read {
            path: p.to_string(),
            source,
        }),
    }
}

/// Load samples from a text file, a `.json` array of samples, or stdin.
pub fn read_samples(path: Option<&str>) -> Result<Vec<Sample>, CliError> {
    let data = read_input(path)?;
    if path.is_some_and(|p| TableFormat::from_path(p) == TableFormat::Json) {
        return Ok(serde_json::from_slice(&data)?);
    }
    let text = String::from_utf8_lossy(&data);
    parse_samples(&text)
}

/// Load a table, choosing the decoder by file extension.
pub fn load_table(path: &str) -> Result<TransitionTable, CliError> {
    let data = read_input(Some(path))?;
    match TableFormat::from_path(path) {
        TableFormat::Json => {
            let doc: TableDocument = serde_json::from_slice(&data)?;
            Ok(TransitionTable::from_document(doc)?)
        }
        TableFormat::Binary => Ok(TransitionTable::from_bytes(&data)?),
    }
}

/// Encode a table in `format`.
pub fn encode_table(table: &TransitionTable, format: TableFormat) -> Result<Vec<u8>, CliError> {
    match format {
        TableFormat::Binary => Ok(table.to_bytes()?),
        TableFormat::Json => {
            let mut data = serde_json::to_vec_pretty(&table.to_document())?;
            data.push(b'\n');
            Ok(data)
        }
    }
}

/// Write bytes to `path`, or stdout when `path` is `None` or `-`.
pub fn write_output(path: Option<&str>, data: &[u8]) -> Result<(), CliError> {
    match path {
        None | Some("-") => {
            let mut out = io::stdout().lock();
            out.write_all(data)
                .and_then(|()| out.flush())
                .map_err(|source| CliError::Write {
                    path: "<stdout>".to_string(),
                    source,
                })
        }
        Some(p) => std::fs::write(p, data).map_err(|source| CliError::Write {
            path: p.to_string(),
            source,
        }),
    }
}

/// Parse `--name=VALUE`, `--name VALUE` or `-s VALUE` from command line args.
///
/// Returns `(value, remaining_args)`. A later occurrence overrides an earlier one.
/// Pass an empty `short` for options without a short form.
pub fn parse_option(args: &[String], short: &str, long: &str) -> (Option<String>, Vec<String>) {
    let mut value = None;
    let mut remaining = Vec::new();
    let mut skip_next = false;
    let long_eq = format!("{long}=");

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(val) = arg.strip_prefix(&long_eq) {
            value = Some(val.to_string());
        } else if arg == long || (!short.is_empty() && arg == short) {
            if i + 1 < args.len() {
                value = Some(args[i + 1].clone());
                skip_next = true;
            } else {
                fatal(&format!("{arg} requires a value"));
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    (value, remaining)
}

/// Remove a boolean flag from the args, reporting whether it was present.
pub fn take_flag(args: Vec<String>, flag: &str) -> (bool, Vec<String>) {
    let before = args.len();
    let remaining: Vec<String> = args.into_iter().filter(|a| a != flag).collect();
    (remaining.len() != before, remaining)
}

/// Parse an option value, exiting with a message naming the flag on failure.
pub fn parse_value<T: FromStr>(flag: &str, value: &str) -> T {
    value
        .parse()
        .unwrap_or_else(|_| fatal(&format!("invalid value '{value}' for {flag}")))
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}
