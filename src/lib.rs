//! restrack: elapsed time, cpu and memory around units of work
//!
//! ```no_run
//! use restrack::{create_monitor, MonitorOptions};
//!
//! # async fn demo() -> restrack::Result<()> {
//! let monitor = create_monitor(Some("startup"), MonitorOptions::default())?;
//! let tracked = monitor.track(|| async { 6 * 7 }, Some("answer")).await;
//! assert_eq!(tracked.result, 42);
//! println!("{:?}", monitor.history());
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod clock;
pub mod config;
pub mod environment;
pub mod error;
pub mod monitor;
pub mod record;
pub mod runtime;
pub mod sampler;
pub mod sink;

// Re-export the main types for use in tests and embedding hosts
pub use browser::{BrowserHost, LoadListener, ReadyState, SimulatedBrowser};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{MonitorOptions, MonitorOptionsBuilder};
pub use environment::Environment;
pub use error::{RestrackError, Result};
pub use monitor::{create_monitor, Monitor, MonitorBuilder, Tracked, PAGE_LOAD_LABEL};
pub use record::MeasurementRecord;
pub use runtime::Runtime;
pub use sampler::{ResourceSample, Sampler, SysinfoSampler};
pub use sink::{ConsoleSink, JsonLinesSink, MemorySink, OutputSink};
