//! Monitor configuration

use crate::error::{RestrackError, Result};
use serde::Deserialize;

/// Options recognised by [`Monitor`](crate::Monitor)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MonitorOptions {
    /// Suppress all output sink writes for this monitor
    pub silent: bool,
    /// Keep at most this many records, evicting the oldest. Unbounded if `None`.
    pub history_capacity: Option<usize>,
}

impl MonitorOptions {
    pub fn builder() -> MonitorOptionsBuilder {
        MonitorOptionsBuilder::default()
    }

    /// Options with only `silent` set
    pub fn silent() -> Self {
        Self {
            silent: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == Some(0) {
            return Err(RestrackError::InvalidConfiguration(
                "history capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MonitorOptionsBuilder {
    options: MonitorOptions,
}

impl MonitorOptionsBuilder {
    pub fn silent(mut self, silent: bool) -> Self {
        self.options.silent = silent;
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.options.history_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> Result<MonitorOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}
