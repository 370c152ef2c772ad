//! `core.logging`: a logger plugin writing one JSON object per record to
//! stderr.
//!
//! Select it with `logger = "core.logging.JsonLogger"` in the broker
//! configuration.
use std::io::Write;

use broker_core::declare_plugin;
use broker_core::plugin_system::{BoxError, Namespace, Plugin, PluginArgs, PluginSystemError};
use log::{LevelFilter, Log, Metadata, Record};
use serde::Serialize;

pub const NAMESPACE: &str = "core.logging";
const COMPATIBLE_API_REQ: &str = "^0.1";

pub fn namespace() -> Result<Namespace, PluginSystemError> {
    Ok(Namespace::new(NAMESPACE, env!("CARGO_PKG_VERSION"))
        .compatible_with(COMPATIBLE_API_REQ)?
        .with_type("JsonLogger", JsonLogger::from_args))
}

/// One serialized log line.
#[derive(Debug, Serialize)]
struct LogLine<'a> {
    level: &'a str,
    target: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    module: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
}

impl<'a> LogLine<'a> {
    fn from_record(record: &'a Record<'a>) -> Self {
        Self {
            level: record.level().as_str(),
            target: record.target(),
            message: record.args().to_string(),
            module: record.module_path(),
            line: record.line(),
        }
    }
}

#[derive(Debug)]
pub struct JsonLogger {
    level: LevelFilter,
}

impl JsonLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Resolved loggers always run at `Info`; use [`JsonLogger::new`] for
    /// another level.
    fn from_args(_args: &PluginArgs) -> Result<Box<dyn Plugin>, BoxError> {
        Ok(Box::new(Self::default()))
    }

    fn render(record: &Record) -> Option<String> {
        serde_json::to_string(&LogLine::from_record(record)).ok()
    }
}

impl Default for JsonLogger {
    fn default() -> Self {
        Self::new(LevelFilter::Info)
    }
}

impl Log for JsonLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(line) = Self::render(record) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}", line);
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

declare_plugin!(JsonLogger: Logger);
