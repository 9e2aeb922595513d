//! Error types for restrack
//!
//! Only `UnsupportedEnvironment`, `LoadListenerDropped` and
//! `InvalidConfiguration` ever reach a caller of the monitor. Sampler
//! failures are recovered inside the monitor.

use crate::environment::Environment;
use thiserror::Error;

/// Errors produced by the monitor and its collaborators
#[derive(Debug, Error)]
pub enum RestrackError {
    /// Operation needs a browser-like host
    #[error("operation is only supported in a browser environment (running in {})", .0.name())]
    UnsupportedEnvironment(Environment),

    /// The sampler could not query cpu/memory for a process
    #[error("sampler unavailable: {0}")]
    SamplerUnavailable(String),

    /// The host dropped a page load listener without firing it
    #[error("page load listener was dropped before the load event fired")]
    LoadListenerDropped,

    /// Options failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// I/O error while writing to an output sink
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RestrackError>;
