//! CPU and memory sampling for a process
//!
//! The monitor talks to the OS through the [`Sampler`] trait so hosts and
//! tests can swap in their own source. [`SysinfoSampler`] is the default used
//! in the process runtime.

use crate::error::{RestrackError, Result};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// CPU and memory usage of a process at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    /// CPU usage in percent since the previous sample of the same process
    pub cpu_percent: f64,
    /// Resident memory in megabytes
    pub memory_mb: f64,
}

/// Source of process resource usage
#[async_trait]
pub trait Sampler: Send + Sync {
    /// Sample CPU and memory usage of `pid`.
    ///
    /// Returns `SamplerUnavailable` when the process cannot be queried.
    async fn sample(&self, pid: u32) -> Result<ResourceSample>;
}

/// Sampler backed by `sysinfo`.
///
/// CPU usage is computed by sysinfo relative to the previous refresh of the
/// same process, so the first sample of a pid that was never refreshed
/// reports 0%. The current process is refreshed once at construction.
#[derive(Clone)]
pub struct SysinfoSampler {
    system: Arc<Mutex<System>>,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        let sampler = Self {
            system: Arc::new(Mutex::new(System::new())),
        };
        if let Ok(pid) = sysinfo::get_current_pid() {
            if let Ok(mut system) = sampler.system.lock() {
                refresh_process(&mut system, pid);
            }
        }
        sampler
    }

    fn sample_blocking(system: &Mutex<System>, pid: u32) -> Result<ResourceSample> {
        let mut system = system.lock().map_err(|_| {
            RestrackError::SamplerUnavailable("sysinfo state lock poisoned".to_string())
        })?;

        let pid = Pid::from_u32(pid);
        refresh_process(&mut system, pid);

        let process = system
            .process(pid)
            .ok_or_else(|| RestrackError::SamplerUnavailable(format!("process {pid} not found")))?;

        // sysinfo reports memory in bytes
        Ok(ResourceSample {
            cpu_percent: f64::from(process.cpu_usage()),
            memory_mb: process.memory() as f64 / BYTES_PER_MB,
        })
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

fn refresh_process(system: &mut System, pid: Pid) {
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::nothing().with_cpu().with_memory(),
    );
}

#[async_trait]
impl Sampler for SysinfoSampler {
    async fn sample(&self, pid: u32) -> Result<ResourceSample> {
        // other executors have no blocking pool to hand the refresh to
        let sample = if tokio::runtime::Handle::try_current().is_ok() {
            let system = Arc::clone(&self.system);
            tokio::task::spawn_blocking(move || Self::sample_blocking(&system, pid))
                .await
                .map_err(|e| {
                    RestrackError::SamplerUnavailable(format!("sampling task failed: {e}"))
                })??
        } else {
            Self::sample_blocking(&self.system, pid)?
        };
        debug!(
            "sampled pid {pid}: cpu {:.2}%, memory {:.2} MB",
            sample.cpu_percent, sample.memory_mb
        );
        Ok(sample)
    }
}
