//! Measurement strategy per environment
//!
//! A [`Runtime`] is resolved once when a monitor is built and carries
//! everything that environment can measure.

use crate::browser::BrowserHost;
use crate::environment::Environment;
use crate::sampler::{Sampler, SysinfoSampler};
use std::fmt;
use std::sync::Arc;

pub enum Runtime {
    /// Page clock and heap reporter come from the host
    Browser(Arc<dyn BrowserHost>),
    /// A native process sampled for cpu and memory
    Process { pid: u32, sampler: Arc<dyn Sampler> },
    /// Duration only
    Unknown,
}

impl Runtime {
    /// Runtime for the current process based on [`Environment::detect`]
    pub fn detect() -> Self {
        match Environment::detect() {
            Environment::ProcessRuntime => Runtime::current_process(),
            _ => Runtime::Unknown,
        }
    }

    /// The current process, sampled with [`SysinfoSampler`]
    pub fn current_process() -> Self {
        Runtime::Process {
            pid: std::process::id(),
            sampler: Arc::new(SysinfoSampler::new()),
        }
    }

    pub fn browser(host: Arc<dyn BrowserHost>) -> Self {
        Runtime::Browser(host)
    }

    pub fn process(pid: u32, sampler: Arc<dyn Sampler>) -> Self {
        Runtime::Process { pid, sampler }
    }

    pub fn environment(&self) -> Environment {
        match self {
            Runtime::Browser(_) => Environment::Browser,
            Runtime::Process { .. } => Environment::ProcessRuntime,
            Runtime::Unknown => Environment::Unknown,
        }
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runtime::Browser(_) => f.write_str("Runtime::Browser"),
            Runtime::Process { pid, .. } => write!(f, "Runtime::Process {{ pid: {pid} }}"),
            Runtime::Unknown => f.write_str("Runtime::Unknown"),
        }
    }
}
