//! Environment-backed service configuration.
//!
//! App-platform deployments configure replicas through environment
//! variables only; there is no config file. Unset variables fall back to
//! defaults, malformed values are rejected up front rather than silently
//! corrected.

use std::env;
use std::net::Ipv4Addr;
use std::time::Duration;

use tracing::debug;

use crate::error::DiscoveryError;
use crate::net::ScanRange;

pub const DEFAULT_SERVICE_NAME: &str = "main-service";
pub const DEFAULT_REPLICA_COUNT: usize = 3;
pub const DEFAULT_PORT: u16 = 8080;

/// How many /24 subnets (third-octet values) a scan covers.
///
/// Tuned empirically for one platform's observed subnet spread, where
/// sibling replicas land on node subnets dozens apart. A tunable, not a
/// law; other topologies will want a different block.
pub const DEFAULT_SCAN_SUBNETS: u8 = 50;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(100);
pub const DEFAULT_SCAN_CONCURRENCY: usize = 100;

#[derive(Debug, Clone)]
pub struct Config {
    /// Display name of the service (`SERVICE_NAME`).
    pub service_name: String,
    /// Expected replica count (`REPLICA_COUNT`). Display only: finding
    /// fewer peers is a status discrepancy, never an error.
    pub replica_count: usize,
    /// HTTP listen port and discovery target port (`PORT`). One value by
    /// design: every replica probes the same port it serves on.
    pub port: u16,
    /// Third-octet block width (`SCAN_SUBNETS`).
    pub scan_subnets: u8,
    /// Per-candidate connect timeout (`PROBE_TIMEOUT_MS`).
    pub probe_timeout: Duration,
    /// Upper bound on in-flight probes (`SCAN_CONCURRENCY`).
    pub scan_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            replica_count: DEFAULT_REPLICA_COUNT,
            port: DEFAULT_PORT,
            scan_subnets: DEFAULT_SCAN_SUBNETS,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            scan_concurrency: DEFAULT_SCAN_CONCURRENCY,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, DiscoveryError> {
        let cfg = Self {
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string()),
            replica_count: parse_var("REPLICA_COUNT", DEFAULT_REPLICA_COUNT)?,
            port: parse_var("PORT", DEFAULT_PORT)?,
            scan_subnets: parse_var("SCAN_SUBNETS", DEFAULT_SCAN_SUBNETS)?,
            probe_timeout: Duration::from_millis(parse_var(
                "PROBE_TIMEOUT_MS",
                DEFAULT_PROBE_TIMEOUT.as_millis() as u64,
            )?),
            scan_concurrency: parse_var("SCAN_CONCURRENCY", DEFAULT_SCAN_CONCURRENCY)?,
        };

        debug!(
            service = %cfg.service_name,
            port = cfg.port,
            subnets = cfg.scan_subnets,
            "configuration loaded"
        );
        Ok(cfg)
    }

    /// Scan bounds for this deployment, anchored to `self_ip`.
    pub fn scan_range(&self, self_ip: Ipv4Addr) -> ScanRange {
        let mut range = ScanRange::anchored_to(self_ip, self.port);
        range.third_octets = 0..self.scan_subnets;
        range.probe_timeout = self.probe_timeout;
        range.max_inflight = self.scan_concurrency;
        range
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, DiscoveryError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|e| {
            DiscoveryError::Configuration(format!("{name}={raw:?} is not usable: {e}"))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_platform_tuning() {
        let cfg = Config::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.replica_count, 3);
        assert_eq!(cfg.scan_subnets, 50);
        assert_eq!(cfg.probe_timeout, Duration::from_millis(100));
        assert_eq!(cfg.scan_concurrency, 100);
    }

    #[test]
    fn malformed_value_is_rejected() {
        // Env mutation is process-global, so use a name no other test reads.
        unsafe { env::set_var("REPLICA_COUNT_TEST_ONLY", "three") };
        let parsed: Result<usize, _> = parse_var("REPLICA_COUNT_TEST_ONLY", 3);
        assert!(matches!(parsed, Err(DiscoveryError::Configuration(_))));
        unsafe { env::remove_var("REPLICA_COUNT_TEST_ONLY") };
    }

    #[test]
    fn unset_value_falls_back() {
        let parsed: usize = parse_var("FLOCK_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(parsed, 7);
    }
}
