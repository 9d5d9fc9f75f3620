//! Router configuration.

use licdata_core::{BusScope, ConfigError};
use licdata_std::MissingOptionPolicy;

/// Default number of pipelines allowed to run at once.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// Settings shared by the router and the service loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterConfig {
    /// Scope every standard route subscribes and publishes on.
    pub bus_scope: BusScope,
    /// How missing derivation inputs are handled.
    pub missing_options: MissingOptionPolicy,
    /// Upper bound on concurrently running pipelines. `1` serializes them.
    pub max_in_flight: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            bus_scope: BusScope::System,
            missing_options: MissingOptionPolicy::Reject,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

impl RouterConfig {
    /// Set the bus scope.
    pub fn with_bus_scope(mut self, scope: BusScope) -> Self {
        self.bus_scope = scope;
        self
    }

    /// Set the missing option policy.
    pub fn with_missing_options(mut self, policy: MissingOptionPolicy) -> Self {
        self.missing_options = policy;
        self
    }

    /// Set the concurrency limit.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    /// Check the configuration, returning it unchanged when valid.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.max_in_flight == 0 {
            return Err(ConfigError::Invalid {
                key: "max_in_flight",
                reason: "must be at least 1".into(),
            });
        }
        Ok(self)
    }
}
