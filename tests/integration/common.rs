//! Shared fixtures for the integration tests

use async_trait::async_trait;
use restrack::{ResourceSample, RestrackError, Result, Sampler};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Sampler that always reports the same usage and counts its calls
pub struct FixedSampler {
    sample: ResourceSample,
    calls: AtomicUsize,
}

impl FixedSampler {
    pub fn new(cpu_percent: f64, memory_mb: f64) -> Self {
        Self {
            sample: ResourceSample {
                cpu_percent,
                memory_mb,
            },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sampler for FixedSampler {
    async fn sample(&self, _pid: u32) -> Result<ResourceSample> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.sample)
    }
}

/// Sampler that behaves like a platform without process statistics
pub struct UnavailableSampler;

#[async_trait]
impl Sampler for UnavailableSampler {
    async fn sample(&self, _pid: u32) -> Result<ResourceSample> {
        Err(RestrackError::SamplerUnavailable(
            "permission denied".to_string(),
        ))
    }
}
