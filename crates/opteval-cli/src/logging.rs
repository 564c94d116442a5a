//! Structured logging setup.

use std::env;
use std::fs::{File, OpenOptions};
use std::io;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LEVEL: &str = "info";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Output encoding of every sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_env(value: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        match value {
            None => Ok(LogFormat::Pretty),
            Some(value) if value.eq_ignore_ascii_case("pretty") => Ok(LogFormat::Pretty),
            Some(value) if value.eq_ignore_ascii_case("json") => Ok(LogFormat::Json),
            Some(_) => Err("Invalid OPTEVAL_LOG_FORMAT (expected 'json' or 'pretty')".into()),
        }
    }
}

fn sink<W>(writer: W, format: LogFormat, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    match format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

fn level_filter(level: &str) -> Result<EnvFilter, Box<dyn std::error::Error>> {
    if level.eq_ignore_ascii_case("off") {
        return Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()));
    }
    EnvFilter::try_new(level).map_err(|err| format!("Invalid log filter: {err}").into())
}

fn open_log_file(path: &str) -> Result<File, Box<dyn std::error::Error>> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| format!("Failed to open log file {path}: {err}").into())
}

/// Install the global subscriber. Logs go to stderr.
///
/// The level is `level` when given, else `OPTEVAL_TRACE`, else `info`; `off`
/// disables logging. `OPTEVAL_LOG_FORMAT` selects `pretty` or `json` and
/// `OPTEVAL_LOG_FILE` appends a copy of every event to a file.
pub fn init(level: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let level = level
        .map(str::to_string)
        .or_else(|| env::var("OPTEVAL_TRACE").ok())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
    let filter = level_filter(&level)?;
    let format = LogFormat::from_env(env::var("OPTEVAL_LOG_FORMAT").ok().as_deref())?;

    let mut sinks = vec![sink(io::stderr, format, true)];
    if let Ok(path) = env::var("OPTEVAL_LOG_FILE") {
        sinks.push(sink(Mutex::new(open_log_file(&path)?), format, false));
    }

    tracing_subscriber::registry()
        .with(sinks)
        .with(filter)
        .try_init()
        .map_err(|err| format!("Failed to initialize logging: {err}").into())
}
