//! Purpose: `whouses` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, reads input, runs the library, prints results.
//! Invariants: Bench metrics and canonical documents go to stdout; diagnostics go to stderr.
//! Invariants: Errors render as text on a TTY and as one JSON line otherwise.
//! Invariants: Process exit code is derived from `to_exit_code`.
use std::error::Error as StdError;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use whouses::bench::{self, BenchArgs, BenchFormat, DEFAULT_TARGET_MB, SynthArgs};
use whouses::core::bind::bind_slice;
use whouses::core::encode;
use whouses::core::error::{Error, ErrorKind, to_exit_code};
use whouses::json::default_decoders;
use whouses::synth::PayloadShape;

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<i32, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(code);
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Run `whouses --help` for usage."));
            }
        },
    };

    init_tracing();
    dispatch(cli.command)?;
    Ok(0)
}

#[derive(Parser)]
#[command(
    name = "whouses",
    version,
    about = "Strict who-uses-json-v1 binding and throughput benchmarks",
    long_about = None,
    after_help = r#"EXAMPLES
  $ whouses bench < report.json
  $ whouses bench --input report.json --n 1000 --no-breakdown
  $ whouses synth --projects 200 --files 30 --matches 10 --n 200
  $ whouses check --pretty < report.json

Set RUST_LOG=debug to trace phase sizing on stderr."#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Benchmark binding, encoding, and the decode/bind breakdown on one input document.
    Bench {
        #[arg(long, help = "Read the document from a file instead of stdin", value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
        #[arg(long = "n", default_value_t = 0, help = "Throughput repetitions (0 = size from --target-mb)")]
        repetitions: u64,
        #[arg(long, default_value_t = DEFAULT_TARGET_MB, help = "Total MB to process when --n is 0")]
        target_mb: u64,
        #[arg(long, help = "Skip the decode/bind breakdown")]
        no_breakdown: bool,
        #[arg(long, value_enum, default_value = "table")]
        format: BenchFormat,
    },
    /// Benchmark a deterministic synthetic document of the given shape.
    Synth {
        #[arg(long, default_value = "PHP")]
        term: String,
        #[arg(long, default_value_t = 200)]
        projects: usize,
        #[arg(long, default_value_t = 30, help = "Files per project")]
        files: usize,
        #[arg(long, default_value_t = 10, help = "Matches per file")]
        matches: usize,
        #[arg(long = "n", default_value_t = 200, help = "Repetitions for throughput loops")]
        repetitions: u64,
        #[arg(long, value_enum, default_value = "table")]
        format: BenchFormat,
    },
    /// Validate a document and print its canonical serialization.
    Check {
        #[arg(long, help = "Read the document from a file instead of stdin", value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
        #[arg(long, help = "Pretty-print the canonical output")]
        pretty: bool,
    },
    /// Generate shell completions.
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn dispatch(command: Command) -> Result<(), Error> {
    let version = env!("CARGO_PKG_VERSION");
    match command {
        Command::Bench {
            input,
            repetitions,
            target_mb,
            no_breakdown,
            format,
        } => {
            let raw = read_input(input.as_deref())?;
            let args = BenchArgs {
                repetitions,
                target_mb,
                breakdown: !no_breakdown,
                format,
            };
            let report = bench::run_input_bench(&raw, &args, &default_decoders())?;
            bench::emit_bench_output(&report, args.format, version)
        }
        Command::Synth {
            term,
            projects,
            files,
            matches,
            repetitions,
            format,
        } => {
            let args = SynthArgs {
                shape: PayloadShape {
                    term,
                    projects,
                    files_per_project: files,
                    matches_per_file: matches,
                },
                repetitions,
                format,
            };
            let report = bench::run_synth_bench(&args, &default_decoders())?;
            bench::emit_bench_output(&report, args.format, version)
        }
        Command::Check { input, pretty } => {
            let raw = read_input(input.as_deref())?;
            let document = bind_slice(&raw)?;
            debug!(
                projects = document.results.len(),
                matches = document.match_count(),
                "document bound"
            );
            let mut stdout = io::stdout().lock();
            if pretty {
                let bytes = encode::to_vec_pretty(&document)?;
                stdout.write_all(&bytes).map_err(|err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write document")
                        .with_source(err)
                })?;
            } else {
                encode::to_writer(&mut stdout, &document)?;
            }
            stdout.write_all(b"\n").map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to write document")
                    .with_source(err)
            })
        }
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "whouses", &mut io::stdout());
            Ok(())
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>, Error> {
    match path {
        Some(path) => std::fs::read(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message(format!("failed to read {}", path.display()))
                .with_source(err)
        }),
        None => {
            let mut raw = Vec::new();
            io::stdin().lock().read_to_end(&mut raw).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            Ok(raw)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.trim_start_matches("error: ").to_string())
        .unwrap_or_else(|| "invalid arguments".to_string())
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err));
        return;
    }

    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::EmptyInput => "empty input".to_string(),
        ErrorKind::Decode => "malformed json".to_string(),
        ErrorKind::Validation => "schema violation".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_text(err: &Error) -> String {
    let mut text = format!("error: {}", error_message(err));
    if let Some(constraint) = err.constraint() {
        text.push_str(&format!("\n  constraint: {constraint}"));
    }
    if let Some(field) = err.field() {
        text.push_str(&format!("\n  field: {field}"));
    }
    if let Some(offset) = err.offset() {
        text.push_str(&format!("\n  offset: {offset}"));
    }
    if let Some(hint) = err.hint() {
        text.push_str(&format!("\n  hint: {hint}"));
    }
    text
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(constraint) = err.constraint() {
        inner.insert("constraint".to_string(), json!(constraint.as_str()));
    }
    if let Some(field) = err.field() {
        inner.insert("field".to_string(), json!(field));
    }
    if let Some(offset) = err.offset() {
        inner.insert("offset".to_string(), json!(offset));
    }
    if let Some((line, column)) = err.position() {
        inner.insert("line".to_string(), json!(line));
        inner.insert("column".to_string(), json!(column));
    }
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}
