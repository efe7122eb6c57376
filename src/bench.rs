// Benchmark harness for who-uses-json-v1 binding.
//
// Purpose:
// - Time fused decode+bind, encode, and (breakdown) decode-only vs bind-from-tree phases.
// - Size throughput loops from a total-bytes budget so small and large inputs both run long enough.
// - Emit machine-readable JSON and/or a human-readable table in a fixed metric order.
//
// Design notes:
// - Single-threaded; every iteration re-decodes and re-binds, nothing is cached across calls.
// - Logging happens outside timed regions.

use std::fmt;
use std::hint::black_box;
use std::io::{self, Write};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::core::bind::{bind_slice, bind_value};
use crate::core::encode;
use crate::core::error::{Error, ErrorKind};
use crate::json::parse::{self, Decoder};
use crate::synth::{self, PayloadShape};

pub const DEFAULT_TARGET_MB: u64 = 200;
pub const AUTO_MIN_REPETITIONS: u64 = 50;
pub const AUTO_MAX_REPETITIONS: u64 = 50_000;
pub const TREE_MIN_REPETITIONS: u64 = 200;
pub const TREE_MAX_REPETITIONS: u64 = 10_000;

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum BenchFormat {
    Json,
    Table,
    Both,
}

#[derive(Clone, Debug)]
pub struct BenchArgs {
    /// Explicit throughput repetitions; 0 sizes the loop from `target_mb`.
    pub repetitions: u64,
    pub target_mb: u64,
    pub breakdown: bool,
    pub format: BenchFormat,
}

impl Default for BenchArgs {
    fn default() -> Self {
        Self {
            repetitions: 0,
            target_mb: DEFAULT_TARGET_MB,
            breakdown: true,
            format: BenchFormat::Table,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SynthArgs {
    pub shape: PayloadShape,
    pub repetitions: u64,
    pub format: BenchFormat,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sizing {
    Manual,
    Auto { target_mb: u64 },
}

impl fmt::Display for Sizing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sizing::Manual => write!(f, "manual"),
            Sizing::Auto { target_mb } => write!(f, "auto(target≈{target_mb}MB)"),
        }
    }
}

/// `clamp(target_mb MiB / input_bytes, 50, 50000)`, floor-divided.
pub fn auto_repetitions(input_bytes: usize, target_mb: u64) -> u64 {
    let target_bytes = target_mb.max(1).saturating_mul(1024 * 1024);
    let per_input = (input_bytes as u64).max(1);
    (target_bytes / per_input).clamp(AUTO_MIN_REPETITIONS, AUTO_MAX_REPETITIONS)
}

/// Bound for the bind-from-tree loop, which is cheaper per call than the fused loop.
pub fn tree_repetitions(repetitions: u64) -> u64 {
    repetitions.clamp(TREE_MIN_REPETITIONS, TREE_MAX_REPETITIONS)
}

pub fn choose_repetitions(explicit: u64, input_bytes: usize, target_mb: u64) -> (u64, Sizing) {
    if explicit > 0 {
        (explicit, Sizing::Manual)
    } else {
        (
            auto_repetitions(input_bytes, target_mb),
            Sizing::Auto {
                target_mb: target_mb.max(1),
            },
        )
    }
}

/// Operations per second; infinite when the clock measured no elapsed time.
pub fn throughput(iterations: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        iterations as f64 / secs
    } else {
        f64::INFINITY
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Metric {
    Bytes {
        label: String,
        bytes: usize,
    },
    Once {
        label: String,
        elapsed: Duration,
    },
    Rate {
        label: String,
        iterations: u64,
        elapsed: Duration,
        unit: &'static str,
        note: String,
    },
}

impl Metric {
    pub fn label(&self) -> &str {
        match self {
            Metric::Bytes { label, .. } | Metric::Once { label, .. } | Metric::Rate { label, .. } => {
                label
            }
        }
    }

    pub fn per_sec(&self) -> Option<f64> {
        match self {
            Metric::Rate {
                iterations,
                elapsed,
                ..
            } => Some(throughput(*iterations, *elapsed)),
            _ => None,
        }
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("metric".to_string(), json!(self.label()));
        match self {
            Metric::Bytes { bytes, .. } => {
                map.insert("bytes".to_string(), json!(bytes));
            }
            Metric::Once { elapsed, .. } => {
                map.insert("ms".to_string(), json!(millis(*elapsed)));
            }
            Metric::Rate {
                iterations,
                elapsed,
                unit,
                note,
                ..
            } => {
                map.insert("iterations".to_string(), json!(iterations));
                map.insert("duration_ms".to_string(), json!(millis(*elapsed)));
                let rate = match self.per_sec() {
                    Some(rate) if rate.is_finite() => json!(rate),
                    _ => json!("inf"),
                };
                map.insert("per_sec".to_string(), rate);
                map.insert("unit".to_string(), json!(unit));
                map.insert("note".to_string(), json!(note));
            }
        }
        Value::Object(map)
    }
}

#[derive(Clone, Debug)]
pub struct BenchReport {
    pub title: &'static str,
    pub params: Value,
    pub metrics: Vec<Metric>,
    /// Index of the first breakdown metric, if the breakdown ran.
    pub breakdown_at: Option<usize>,
}

impl BenchReport {
    pub fn metric(&self, label: &str) -> Option<&Metric> {
        self.metrics.iter().find(|metric| metric.label() == label)
    }
}

/// Bench a caller-supplied document; the input must bind or the run aborts.
pub fn run_input_bench(
    raw: &[u8],
    args: &BenchArgs,
    decoders: &[Box<dyn Decoder>],
) -> Result<BenchReport, Error> {
    parse::ensure_not_blank(raw)?;
    let (repetitions, sizing) = choose_repetitions(args.repetitions, raw.len(), args.target_mb);
    debug!(input_bytes = raw.len(), repetitions, sizing = %sizing, "input bench sized");

    let mut metrics = vec![Metric::Bytes {
        label: "input_bytes".to_string(),
        bytes: raw.len(),
    }];

    let start = Instant::now();
    let document = bind_slice(raw)?;
    metrics.push(once("bind_slice", start.elapsed()));

    let start = Instant::now();
    let out = encode::to_vec(&document)?;
    metrics.push(once("encode", start.elapsed()));

    let elapsed = repeat(repetitions, || bind_slice(raw))?;
    metrics.push(Metric::Rate {
        label: "bind_slice_rate".to_string(),
        iterations: repetitions,
        elapsed,
        unit: "parses/sec",
        note: sizing.to_string(),
    });
    metrics.push(Metric::Bytes {
        label: "output_bytes".to_string(),
        bytes: out.len(),
    });
    drop(document);

    let mut breakdown_at = None;
    if args.breakdown && !decoders.is_empty() {
        breakdown_at = Some(metrics.len());
        let tree_reps = tree_repetitions(repetitions);
        breakdown(raw, decoders, tree_reps, &mut metrics)?;
    }

    let names: Vec<_> = decoders.iter().map(|decoder| decoder.name()).collect();
    let params = json!({
        "repetitions": repetitions,
        "sizing": sizing.to_string(),
        "target_mb": args.target_mb,
        "breakdown": args.breakdown,
        "decoders": names,
        "debug_build": cfg!(debug_assertions),
    });

    Ok(BenchReport {
        title: "who-uses-json-v1 benchmark",
        params,
        metrics,
        breakdown_at,
    })
}

/// Bench a synthesized payload: warm-up, fused phases, then a per-decoder breakdown.
pub fn run_synth_bench(args: &SynthArgs, decoders: &[Box<dyn Decoder>]) -> Result<BenchReport, Error> {
    let raw = synth::make_payload(&args.shape)?;
    let repetitions = args.repetitions.max(1);
    debug!(payload_bytes = raw.len(), repetitions, "synthetic payload ready");

    black_box(bind_slice(&raw)?);

    let mut metrics = vec![Metric::Bytes {
        label: "payload_bytes".to_string(),
        bytes: raw.len(),
    }];

    let start = Instant::now();
    let document = bind_slice(&raw)?;
    metrics.push(once("bind_slice", start.elapsed()));

    let start = Instant::now();
    let out = encode::to_vec(&document)?;
    metrics.push(once("encode", start.elapsed()));
    black_box(out);
    drop(document);

    let elapsed = repeat(repetitions, || bind_slice(&raw))?;
    metrics.push(Metric::Rate {
        label: "bind_slice_rate".to_string(),
        iterations: repetitions,
        elapsed,
        unit: "parses/sec",
        note: Sizing::Manual.to_string(),
    });

    let breakdown_at = Some(metrics.len());
    for decoder in decoders {
        let start = Instant::now();
        let tree = decoder.decode(&raw)?;
        metrics.push(once(&format!("decode:{}", decoder.name()), start.elapsed()));

        let start = Instant::now();
        black_box(bind_value(&tree)?);
        metrics.push(once(&format!("bind_value:{}", decoder.name()), start.elapsed()));

        let elapsed = repeat(repetitions, || bind_value(&tree))?;
        metrics.push(Metric::Rate {
            label: format!("bind_value_rate:{}", decoder.name()),
            iterations: repetitions,
            elapsed,
            unit: "validates/sec",
            note: decoder.name().to_string(),
        });
    }

    let shape = &args.shape;
    let params = json!({
        "term": shape.term,
        "projects": shape.projects,
        "files_per_project": shape.files_per_project,
        "matches_per_file": shape.matches_per_file,
        "repetitions": repetitions,
        "debug_build": cfg!(debug_assertions),
    });

    Ok(BenchReport {
        title: "synthetic who-uses-json-v1 benchmark",
        params,
        metrics,
        breakdown_at,
    })
}

fn breakdown(
    raw: &[u8],
    decoders: &[Box<dyn Decoder>],
    tree_reps: u64,
    metrics: &mut Vec<Metric>,
) -> Result<(), Error> {
    let mut trees = Vec::with_capacity(decoders.len());
    for decoder in decoders {
        let start = Instant::now();
        let tree = decoder.decode(raw)?;
        metrics.push(once(&format!("decode:{}", decoder.name()), start.elapsed()));
        trees.push((decoder.name(), tree));
    }

    for (name, tree) in &trees {
        let start = Instant::now();
        black_box(bind_value(tree)?);
        metrics.push(once(&format!("bind_value:{name}"), start.elapsed()));
    }

    let Some((name, tree)) = trees.last() else {
        return Ok(());
    };
    debug!(repetitions = tree_reps, decoder = %name, "tree bind loop");
    let elapsed = repeat(tree_reps, || bind_value(tree))?;
    metrics.push(Metric::Rate {
        label: "bind_value_rate".to_string(),
        iterations: tree_reps,
        elapsed,
        unit: "validates/sec",
        note: (*name).to_string(),
    });
    Ok(())
}

fn repeat<T>(iterations: u64, mut op: impl FnMut() -> Result<T, Error>) -> Result<Duration, Error> {
    let start = Instant::now();
    for _ in 0..iterations {
        black_box(op()?);
    }
    Ok(start.elapsed())
}

fn once(label: &str, elapsed: Duration) -> Metric {
    Metric::Once {
        label: label.to_string(),
        elapsed,
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

pub fn report_json(report: &BenchReport, program_version: &str) -> Value {
    let results: Vec<Value> = report.metrics.iter().map(Metric::to_json).collect();
    json!({
        "name": "whouses",
        "title": report.title,
        "version": program_version,
        "ts": rfc3339_now(SystemTime::now()),
        "system": system_json(),
        "params": report.params,
        "results": results,
    })
}

pub fn emit_bench_output(
    report: &BenchReport,
    format: BenchFormat,
    program_version: &str,
) -> Result<(), Error> {
    match format {
        BenchFormat::Json => emit_json(&report_json(report, program_version)),
        BenchFormat::Table => emit_table(&mut io::stdout().lock(), report),
        BenchFormat::Both => {
            emit_json(&report_json(report, program_version))?;
            emit_table(&mut io::stderr().lock(), report)
        }
    }
}

fn emit_json(value: &Value) -> Result<(), Error> {
    let text = serde_json::to_string_pretty(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("bench report encode failed")
            .with_source(err)
    })?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}").map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to write bench report")
            .with_source(err)
    })
}

pub fn emit_table(out: &mut impl Write, report: &BenchReport) -> Result<(), Error> {
    let io_err = |err: io::Error| {
        Error::new(ErrorKind::Io)
            .with_message("failed to write bench table")
            .with_source(err)
    };

    writeln!(out, "== {} ==", report.title).map_err(io_err)?;
    for (idx, metric) in report.metrics.iter().enumerate() {
        if Some(idx) == report.breakdown_at {
            writeln!(out, "-- breakdown --").map_err(io_err)?;
        }
        writeln!(out, "{}", table_row(metric)).map_err(io_err)?;
    }
    Ok(())
}

fn table_row(metric: &Metric) -> String {
    match metric {
        Metric::Bytes { label, bytes } => format!(
            "{:<28}{} ({})",
            format!("{label}:"),
            group_thousands(*bytes as u64),
            format_bytes(*bytes as u64)
        ),
        Metric::Once { label, elapsed } => {
            format!("{:<28}{:.3} ms", format!("{label} (1x):"), millis(*elapsed))
        }
        Metric::Rate {
            label,
            iterations,
            elapsed,
            unit,
            note,
        } => {
            let rate = throughput(*iterations, *elapsed);
            let rate = if rate.is_finite() {
                group_thousands(rate.round() as u64)
            } else {
                "inf".to_string()
            };
            format!(
                "{:<28}{rate} {unit} (N={iterations}, {note})",
                format!("{label}:")
            )
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn system_json() -> Value {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    json!({
        "os": std::env::consts::OS,
        "arch": std::env::consts::ARCH,
        "cpus": cpus,
    })
}

fn rfc3339_now(ts: SystemTime) -> String {
    let dur = ts.duration_since(UNIX_EPOCH).unwrap_or_default();
    let secs = dur.as_secs() as i64;
    let nsec = dur.subsec_nanos();
    let tm = time::OffsetDateTime::from_unix_timestamp(secs)
        .unwrap_or(time::OffsetDateTime::UNIX_EPOCH);
    let tm = tm.replace_nanosecond(nsec).unwrap_or(tm);
    tm.format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

fn format_bytes(value: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    const GB: f64 = 1024.0 * 1024.0 * 1024.0;

    let v = value as f64;
    if v >= GB {
        format!("{:.1}GiB", v / GB)
    } else if v >= MB {
        format!("{:.1}MiB", v / MB)
    } else if v >= KB {
        format!("{:.1}KiB", v / KB)
    } else {
        format!("{value}B")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{
        AUTO_MAX_REPETITIONS, AUTO_MIN_REPETITIONS, BenchArgs, BenchFormat, Metric, Sizing,
        SynthArgs, auto_repetitions, choose_repetitions, emit_table, format_bytes,
        group_thousands, run_input_bench, run_synth_bench, throughput, tree_repetitions,
    };
    use crate::core::error::{Constraint, ErrorKind};
    use crate::json::default_decoders;
    use crate::synth::{PayloadShape, make_payload};

    fn small_shape() -> PayloadShape {
        PayloadShape {
            term: "X".to_string(),
            projects: 3,
            files_per_project: 2,
            matches_per_file: 4,
        }
    }

    #[test]
    fn auto_repetitions_stay_in_bounds() {
        for size in [1usize, 7, 1024, 4096, 1 << 20, 50 << 20, usize::MAX / 2] {
            for target in [0u64, 1, 200, 10_000] {
                let n = auto_repetitions(size, target);
                assert!((AUTO_MIN_REPETITIONS..=AUTO_MAX_REPETITIONS).contains(&n));
            }
        }
    }

    #[test]
    fn auto_repetitions_floor_divide_the_budget() {
        assert_eq!(auto_repetitions(1 << 20, 200), 200);
        assert_eq!(auto_repetitions(3 << 20, 200), 66);
        assert_eq!(auto_repetitions(0, 200), AUTO_MAX_REPETITIONS);
        assert_eq!(auto_repetitions(100 << 20, 200), AUTO_MIN_REPETITIONS);
    }

    #[test]
    fn explicit_repetitions_win_over_auto_sizing() {
        assert_eq!(choose_repetitions(7, 10, 200), (7, Sizing::Manual));
        let (n, sizing) = choose_repetitions(0, 1 << 20, 0);
        assert_eq!(n, 50);
        assert_eq!(sizing.to_string(), "auto(target≈1MB)");
    }

    #[test]
    fn tree_repetitions_have_their_own_bounds() {
        assert_eq!(tree_repetitions(50), 200);
        assert_eq!(tree_repetitions(5_000), 5_000);
        assert_eq!(tree_repetitions(50_000), 10_000);
    }

    #[test]
    fn zero_elapsed_throughput_is_infinite() {
        let rate = throughput(100, Duration::ZERO);
        assert!(rate.is_infinite() && rate > 0.0);
        assert_eq!(throughput(100, Duration::from_secs(2)), 50.0);
    }

    #[test]
    fn input_bench_reports_metrics_in_order() {
        let raw = make_payload(&small_shape()).unwrap();
        let args = BenchArgs {
            repetitions: 3,
            ..BenchArgs::default()
        };
        let report = run_input_bench(&raw, &args, &default_decoders()).expect("bench");
        let labels: Vec<_> = report.metrics.iter().map(Metric::label).collect();
        assert_eq!(
            labels,
            [
                "input_bytes",
                "bind_slice",
                "encode",
                "bind_slice_rate",
                "output_bytes",
                "decode:serde_json",
                "decode:simd-json",
                "bind_value:serde_json",
                "bind_value:simd-json",
                "bind_value_rate",
            ]
        );
        assert_eq!(report.breakdown_at, Some(5));
        match report.metric("bind_value_rate") {
            Some(Metric::Rate { iterations, note, .. }) => {
                assert_eq!(*iterations, 200);
                assert_eq!(note, "simd-json");
            }
            other => panic!("unexpected metric {other:?}"),
        }
        match report.metric("output_bytes") {
            Some(Metric::Bytes { bytes, .. }) => assert_eq!(*bytes, raw.len()),
            other => panic!("unexpected metric {other:?}"),
        }
    }

    #[test]
    fn input_bench_without_breakdown_stops_after_output_size() {
        let raw = make_payload(&small_shape()).unwrap();
        let args = BenchArgs {
            repetitions: 2,
            breakdown: false,
            ..BenchArgs::default()
        };
        let report = run_input_bench(&raw, &args, &default_decoders()).expect("bench");
        assert_eq!(report.metrics.len(), 5);
        assert_eq!(report.breakdown_at, None);
    }

    #[test]
    fn invalid_input_aborts_the_bench() {
        let raw = String::from_utf8(make_payload(&small_shape()).unwrap())
            .unwrap()
            .replacen("\"line\":1", "\"line\":0", 1);
        let err = run_input_bench(raw.as_bytes(), &BenchArgs::default(), &default_decoders())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.constraint(), Some(Constraint::NotPositive));

        let err = run_input_bench(b"   ", &BenchArgs::default(), &default_decoders()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }

    #[test]
    fn synth_bench_runs_each_decoder() {
        let args = SynthArgs {
            shape: small_shape(),
            repetitions: 2,
            format: BenchFormat::Json,
        };
        let report = run_synth_bench(&args, &default_decoders()).expect("synth");
        assert!(report.metric("bind_value_rate:serde_json").is_some());
        assert!(report.metric("bind_value_rate:simd-json").is_some());
        assert_eq!(report.params["matches_per_file"], 4);
    }

    #[test]
    fn table_marks_breakdown_and_infinite_rates() {
        let raw = make_payload(&small_shape()).unwrap();
        let mut report = run_input_bench(
            &raw,
            &BenchArgs {
                repetitions: 1,
                ..BenchArgs::default()
            },
            &default_decoders(),
        )
        .unwrap();
        report.metrics[3] = Metric::Rate {
            label: "bind_slice_rate".to_string(),
            iterations: 1,
            elapsed: Duration::ZERO,
            unit: "parses/sec",
            note: "manual".to_string(),
        };
        let mut out = Vec::new();
        emit_table(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("== who-uses-json-v1 benchmark =="));
        assert!(text.contains("-- breakdown --"));
        assert!(text.contains("inf parses/sec (N=1, manual)"));
    }

    #[test]
    fn number_formatting_helpers() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(format_bytes(512), "512B");
        assert_eq!(format_bytes(2048), "2.0KiB");
    }
}
