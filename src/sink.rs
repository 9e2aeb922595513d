//! Output sinks for human readable measurement lines
//!
//! The text layout is meant for people reading a terminal, nothing parses it.

use crate::environment::Environment;
use crate::error::Result;
use crate::record::MeasurementRecord;
use colored::*;
use log::{info, warn};
use std::io::Write;
use std::sync::Mutex;

pub const HEADER: &str = "--- ResourceTracker ---";
pub const SEPARATOR: &str = "-----------------------";

/// Render a record as output lines
pub fn format_record(record: &MeasurementRecord, environment: Environment) -> Vec<String> {
    let mut lines = Vec::with_capacity(6);
    lines.push(HEADER.to_string());

    let timestamp = record
        .timestamp
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    let label = record
        .label
        .as_ref()
        .map(|l| format!(" [{l}]"))
        .unwrap_or_default();
    lines.push(format!("Time: {timestamp}{label} (in {environment})"));

    if let Some(duration) = record.duration_ms {
        lines.push(format!("Duration: {duration:.2} ms"));
    }
    if let Some(cpu) = record.cpu_percent {
        lines.push(format!("CPU:      {cpu:.2}%"));
    }
    if let Some(memory) = record.memory_mb {
        lines.push(format!("Memory:   {memory:.2} MB"));
    }

    lines.push(SEPARATOR.to_string());
    lines
}

/// Destination for monitor output
pub trait OutputSink: Send + Sync {
    /// Write one free-form line (initialization notice, warnings)
    fn write_line(&self, line: &str);

    /// Write a completed measurement
    fn write_record(&self, record: &MeasurementRecord, environment: Environment) {
        for line in format_record(record, environment) {
            self.write_line(&line);
        }
    }
}

/// Prints to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn write_line(&self, line: &str) {
        if line == HEADER || line == SEPARATOR {
            println!("{}", line.bright_black());
        } else {
            println!("{line}");
        }
    }
}

/// Keeps every line in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl OutputSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(line.to_string());
    }
}

/// Writes each record as one JSON object per line.
///
/// Free-form lines are not part of the stream and go to the `log` facade.
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn append(&self, record: &MeasurementRecord) -> Result<()> {
        let json = serde_json::to_string(record).map_err(std::io::Error::from)?;
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(writer, "{json}")?;
        writer.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> OutputSink for JsonLinesSink<W> {
    fn write_line(&self, line: &str) {
        info!("{line}");
    }

    fn write_record(&self, record: &MeasurementRecord, _environment: Environment) {
        if let Err(e) = self.append(record) {
            warn!("failed to write measurement record: {e}");
        }
    }
}
