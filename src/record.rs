//! Measurement records and the history buffer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One completed measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// When the measurement completed
    pub timestamp: DateTime<Utc>,
    /// Elapsed time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub duration_ms: Option<f64>,
    /// CPU usage in percent (process runtime only)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cpu_percent: Option<f64>,
    /// Memory usage in megabytes
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub memory_mb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
}

impl MeasurementRecord {
    #[cfg(test)]
    pub(crate) fn now(label: Option<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            duration_ms: None,
            cpu_percent: None,
            memory_mb: None,
            label,
        }
    }
}

/// Chronological buffer of records.
///
/// Unbounded unless a capacity is given, in which case the oldest records are
/// evicted first.
#[derive(Debug, Clone, Default)]
pub(crate) struct History {
    records: VecDeque<MeasurementRecord>,
    capacity: Option<usize>,
}

impl History {
    pub(crate) fn new(capacity: Option<usize>) -> Self {
        Self {
            records: VecDeque::new(),
            capacity,
        }
    }

    pub(crate) fn push(&mut self, record: MeasurementRecord) {
        if let Some(capacity) = self.capacity {
            while self.records.len() >= capacity {
                self.records.pop_front();
            }
        }
        self.records.push_back(record);
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    /// Copy of all records, oldest first
    pub(crate) fn to_vec(&self) -> Vec<MeasurementRecord> {
        self.records.iter().cloned().collect()
    }
}
