//! Environment detection
//!
//! Classifies the host the monitor runs in. A native process is always a
//! `ProcessRuntime`; a browser-like context only exists when the embedder
//! injects a [`BrowserHost`](crate::browser::BrowserHost), so detection on
//! its own never yields `Browser`.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;

static DETECTED: OnceCell<Environment> = OnceCell::new();

/// The kind of host a monitor measures in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    Browser,
    ProcessRuntime,
    Unknown,
}

impl Environment {
    /// Detect the environment of the current process.
    ///
    /// The result is computed once and reused for the lifetime of the process.
    pub fn detect() -> Self {
        *DETECTED.get_or_init(Self::classify)
    }

    fn classify() -> Self {
        // wasm targets have no process to sample and no usable pid
        if cfg!(target_family = "wasm") {
            Environment::Unknown
        } else {
            Environment::ProcessRuntime
        }
    }

    /// Human readable name used in output lines
    pub fn name(&self) -> &'static str {
        match self {
            Environment::Browser => "Browser",
            Environment::ProcessRuntime => "Process",
            Environment::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
