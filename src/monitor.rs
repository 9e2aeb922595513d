//! The resource monitor
//!
//! A [`Monitor`] measures elapsed time and resource usage in three ways:
//! since its own construction ([`Monitor::snapshot`]), around a unit of work
//! ([`Monitor::track`] and friends) and until the page finished loading in a
//! browser host ([`Monitor::track_page_load`]). Every successful measurement is
//! appended to the monitor's history and echoed to its output sink unless the
//! monitor is silent.

use crate::browser::{BrowserHost, LoadListener, ReadyState};
use crate::clock::{Clock, MonotonicClock};
use crate::config::MonitorOptions;
use crate::environment::Environment;
use crate::error::{RestrackError, Result};
use crate::record::{History, MeasurementRecord};
use crate::runtime::Runtime;
use crate::sink::{ConsoleSink, OutputSink};
use chrono::Utc;
use log::{debug, warn};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

/// Label used by page load measurements when the monitor has none
pub const PAGE_LOAD_LABEL: &str = "pageLoad";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Result of a tracked unit of work together with its measurement
#[derive(Debug, Clone, PartialEq)]
pub struct Tracked<T> {
    pub result: T,
    pub stats: MeasurementRecord,
}

pub struct Monitor {
    label: Option<String>,
    silent: bool,
    creation_time_ms: f64,
    runtime: Runtime,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn OutputSink>,
    history: Mutex<History>,
}

impl Monitor {
    /// Create a monitor for the detected environment, printing to stdout
    pub fn new(label: Option<&str>, options: MonitorOptions) -> Result<Self> {
        let mut builder = Self::builder().options(options);
        if let Some(label) = label {
            builder = builder.label(label);
        }
        builder.build()
    }

    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::default()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn environment(&self) -> Environment {
        self.runtime.environment()
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Clock reading taken when the monitor was built
    pub fn creation_time_ms(&self) -> f64 {
        self.creation_time_ms
    }

    /// Measure elapsed time and resource usage since the monitor was created.
    ///
    /// Uses the monitor's own label. Never fails; fields the environment cannot
    /// provide are left empty.
    pub async fn snapshot(&self) -> MeasurementRecord {
        self.measure_since(self.creation_time_ms, self.label.clone())
            .await
    }

    /// Run `work` to completion and measure it.
    ///
    /// The record carries `label` only; the monitor's own label is not used.
    /// A panic in `work` propagates and nothing is recorded.
    pub async fn track<F, Fut, T>(&self, work: F, label: Option<&str>) -> Tracked<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let start = self.now_ms();
        let result = work().await;
        let stats = self.measure_since(start, label.map(str::to_string)).await;
        Tracked { result, stats }
    }

    /// Like [`Monitor::track`] for synchronous work
    pub async fn track_sync<F, T>(&self, work: F, label: Option<&str>) -> Tracked<T>
    where
        F: FnOnce() -> T,
    {
        let start = self.now_ms();
        let result = work();
        let stats = self.measure_since(start, label.map(str::to_string)).await;
        Tracked { result, stats }
    }

    /// Like [`Monitor::track`] for fallible work.
    ///
    /// An error from `work` is returned unchanged and no record is appended.
    pub async fn try_track<F, Fut, T, E>(
        &self,
        work: F,
        label: Option<&str>,
    ) -> std::result::Result<Tracked<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let start = self.now_ms();
        let result = work().await?;
        let stats = self.measure_since(start, label.map(str::to_string)).await;
        Ok(Tracked { result, stats })
    }

    /// Wait for the page to finish loading and measure it.
    ///
    /// Fails with `UnsupportedEnvironment` before waiting on anything when the
    /// monitor is not running in a browser host. The duration is taken from the
    /// page's time origin, not from the monitor's creation. Waits as long as the
    /// host takes to fire its load event.
    pub async fn track_page_load(&self) -> Result<MeasurementRecord> {
        let host = match &self.runtime {
            Runtime::Browser(host) => Arc::clone(host),
            other => return Err(RestrackError::UnsupportedEnvironment(other.environment())),
        };

        if host.ready_state() != ReadyState::Complete {
            let (listener, loaded) = LoadListener::new();
            debug!("page still loading, waiting for load event");
            host.on_load(listener);
            loaded
                .await
                .map_err(|_| RestrackError::LoadListenerDropped)?;
        }

        let label = self
            .label
            .clone()
            .unwrap_or_else(|| PAGE_LOAD_LABEL.to_string());
        let record = MeasurementRecord {
            timestamp: Utc::now(),
            duration_ms: Some(host.now_ms()),
            cpu_percent: None,
            memory_mb: heap_mb(host.as_ref()),
            label: Some(label),
        };
        self.commit(&record);
        Ok(record)
    }

    /// Copy of every record so far, oldest first
    pub fn history(&self) -> Vec<MeasurementRecord> {
        self.lock_history().to_vec()
    }

    fn now_ms(&self) -> f64 {
        match &self.runtime {
            Runtime::Browser(host) => host.now_ms(),
            _ => self.clock.now_ms(),
        }
    }

    async fn measure_since(&self, start_ms: f64, label: Option<String>) -> MeasurementRecord {
        let mut cpu_percent = None;
        let mut memory_mb = None;

        match &self.runtime {
            Runtime::Browser(host) => {
                memory_mb = heap_mb(host.as_ref());
            }
            Runtime::Process { pid, sampler } => match sampler.sample(*pid).await {
                Ok(sample) => {
                    cpu_percent = Some(sample.cpu_percent);
                    memory_mb = Some(sample.memory_mb);
                }
                Err(e) => {
                    warn!("skipping cpu/memory for pid {pid}: {e}");
                    self.emit_line("Warning: sampler failed, skipping CPU/memory");
                }
            },
            Runtime::Unknown => {}
        }

        // end time is read after sampling
        let duration_ms = (self.now_ms() - start_ms).max(0.0);
        let record = MeasurementRecord {
            timestamp: Utc::now(),
            duration_ms: Some(duration_ms),
            cpu_percent,
            memory_mb,
            label,
        };
        self.commit(&record);
        record
    }

    fn commit(&self, record: &MeasurementRecord) {
        self.lock_history().push(record.clone());
        if !self.silent {
            self.sink.write_record(record, self.environment());
        }
    }

    fn emit_line(&self, line: &str) {
        if !self.silent {
            self.sink.write_line(line);
        }
    }

    fn lock_history(&self) -> MutexGuard<'_, History> {
        // pushes are atomic, a poisoned lock still holds a valid history
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("label", &self.label)
            .field("silent", &self.silent)
            .field("creation_time_ms", &self.creation_time_ms)
            .field("runtime", &self.runtime)
            .field("records", &self.lock_history().len())
            .finish()
    }
}

fn heap_mb(host: &dyn BrowserHost) -> Option<f64> {
    host.used_heap_bytes()
        .map(|bytes| bytes as f64 / BYTES_PER_MB)
}

/// Builder for [`Monitor`] with injectable runtime, clock and sink
#[derive(Default)]
pub struct MonitorBuilder {
    label: Option<String>,
    options: MonitorOptions,
    runtime: Option<Runtime>,
    clock: Option<Arc<dyn Clock>>,
    sink: Option<Arc<dyn OutputSink>>,
}

impl MonitorBuilder {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn options(mut self, options: MonitorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.options.silent = silent;
        self
    }

    /// Measure with this runtime instead of the detected one
    pub fn runtime(mut self, runtime: Runtime) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Measure inside a browser host
    pub fn browser(self, host: Arc<dyn BrowserHost>) -> Self {
        self.runtime(Runtime::browser(host))
    }

    /// Clock for process and unknown runtimes. Browser hosts use their page clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<Monitor> {
        self.options.validate()?;

        let runtime = self.runtime.unwrap_or_else(Runtime::detect);
        let clock = self.clock.unwrap_or_else(|| Arc::new(MonotonicClock));
        let sink = self.sink.unwrap_or_else(|| Arc::new(ConsoleSink));

        let creation_time_ms = match &runtime {
            Runtime::Browser(host) => host.now_ms(),
            _ => clock.now_ms(),
        };

        let monitor = Monitor {
            label: self.label,
            silent: self.options.silent,
            creation_time_ms,
            runtime,
            clock,
            sink,
            history: Mutex::new(History::new(self.options.history_capacity)),
        };

        debug!("created {monitor:?}");
        let label = monitor
            .label
            .as_ref()
            .map(|l| format!(" ({l})"))
            .unwrap_or_default();
        monitor.emit_line(&format!("Initialized{label} in {}", monitor.environment()));

        Ok(monitor)
    }
}

/// Create a monitor for the detected environment
pub fn create_monitor(label: Option<&str>, options: MonitorOptions) -> Result<Monitor> {
    Monitor::new(label, options)
}
