// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2024 Oxide Computer Company

//! Configuration of a transceiver module driver.

use std::time::Duration;

/// Return the default deadline for the readiness poll after insertion.
pub const fn default_ready_timeout() -> Duration {
    Duration::from_millis(100)
}

/// Return the default delay between readiness-bit reads.
pub const fn default_poll_interval() -> Duration {
    Duration::from_micros(500)
}

/// Configuration for a [`crate::QsfpModule`].
///
/// The defaults match production behavior; the [`ConfigBuilder`] can be
/// used to adjust them for testing or unusual hardware.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// How long to wait for the module's data-not-ready bit to clear
    /// during the insertion handshake before failing with
    /// [`crate::Error::ReadyTimeout`].
    pub ready_timeout: Duration,

    /// The delay inserted between consecutive readiness-bit reads, so the
    /// poll loop does not saturate the bus.
    pub poll_interval: Duration,

    /// Whether to decode the module's alarm/warning thresholds from the
    /// operating page at the end of the insertion handshake.
    ///
    /// Disabled by default; the identity read does not depend on it and
    /// enabling it changes no data layout.
    pub read_thresholds: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ready_timeout: default_ready_timeout(),
            poll_interval: default_poll_interval(),
            read_thresholds: false,
        }
    }
}

/// A builder interface for generating module driver configuration.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    ready_timeout: Option<Duration>,
    poll_interval: Option<Duration>,
    read_thresholds: bool,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deadline for the insertion readiness poll.
    pub fn ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = Some(timeout);
        self
    }

    /// Set the delay between consecutive readiness-bit reads.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Enable or disable threshold decoding during the insertion
    /// handshake.
    pub fn read_thresholds(mut self, enabled: bool) -> Self {
        self.read_thresholds = enabled;
        self
    }

    /// Build a `Config` from `self`.
    pub fn build(self) -> Config {
        Config {
            ready_timeout: self.ready_timeout.unwrap_or_else(default_ready_timeout),
            poll_interval: self.poll_interval.unwrap_or_else(default_poll_interval),
            read_thresholds: self.read_thresholds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use super::ConfigBuilder;
    use std::time::Duration;

    #[test]
    fn test_config_builder() {
        assert_eq!(ConfigBuilder::new().build(), Config::default());

        let config = ConfigBuilder::new()
            .ready_timeout(Duration::from_millis(250))
            .read_thresholds(true)
            .build();
        assert_eq!(config.ready_timeout, Duration::from_millis(250));
        assert_eq!(config.poll_interval, super::default_poll_interval());
        assert!(config.read_thresholds);
    }
}
