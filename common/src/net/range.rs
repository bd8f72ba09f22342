//! # Scan Range Model
//!
//! Describes which candidate addresses one discovery call probes.
//!
//! A range is anchored to the two leading octets of the caller's own
//! address and sweeps a block of /24 subnets below it. Cross-base probing
//! is pointless here: a sibling replica scheduled on another node still
//! shares the broad private network, but can land on a third octet dozens
//! away, so the block has to be wide rather than a ± neighborhood around
//! one's own subnet.

use std::net::Ipv4Addr;
use std::ops::Range;
use std::time::Duration;

use crate::error::DiscoveryError;

/// Default third-octet block, matching observed replica spread.
pub const DEFAULT_THIRD_OCTETS: Range<u8> = 0..50;
/// Default host range; skips the `.0` network and `.255` broadcast slots.
pub const DEFAULT_FOURTH_OCTETS: Range<u8> = 1..255;

#[derive(Debug, Clone)]
pub struct ScanRange {
    /// Two leading octets shared with the caller's own address.
    pub base: (u8, u8),
    pub third_octets: Range<u8>,
    pub fourth_octets: Range<u8>,
    /// Port probed on every candidate.
    pub port: u16,
    /// Per-candidate connect timeout. Most candidates are unused
    /// addresses, so this dominates total scan time; keep it short.
    pub probe_timeout: Duration,
    /// Upper bound on concurrently in-flight probes.
    pub max_inflight: usize,
}

impl ScanRange {
    /// Builds the default range anchored to `self_ip`'s leading octets.
    pub fn anchored_to(self_ip: Ipv4Addr, port: u16) -> Self {
        let [first, second, _, _] = self_ip.octets();
        Self {
            base: (first, second),
            third_octets: DEFAULT_THIRD_OCTETS,
            fourth_octets: DEFAULT_FOURTH_OCTETS,
            port,
            probe_timeout: Duration::from_millis(100),
            max_inflight: 100,
        }
    }

    /// Rejects ranges that could never probe anything or would probe
    /// without bound. Runs before any connection attempt is made.
    pub fn validate(&self) -> Result<(), DiscoveryError> {
        if self.max_inflight == 0 {
            return Err(DiscoveryError::Configuration(
                "concurrency limit must be positive".into(),
            ));
        }
        if self.probe_timeout.is_zero() {
            return Err(DiscoveryError::Configuration(
                "probe timeout must be positive".into(),
            ));
        }
        if self.port == 0 {
            return Err(DiscoveryError::Configuration(
                "target port must be non-zero".into(),
            ));
        }
        if self.third_octets.is_empty() || self.fourth_octets.is_empty() {
            return Err(DiscoveryError::Configuration(format!(
                "octet ranges {:?} x {:?} yield no candidates",
                self.third_octets, self.fourth_octets
            )));
        }
        Ok(())
    }

    /// Every candidate address in the range, row by row. A caller-supplied
    /// fourth range that includes `.0` or `.255` is swept as given; those
    /// probes are wasted, not wrong.
    pub fn candidates(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        let (first, second) = self.base;
        self.third_octets.clone().flat_map(move |third| {
            self.fourth_octets
                .clone()
                .map(move |fourth| Ipv4Addr::new(first, second, third, fourth))
        })
    }

    pub fn candidate_count(&self) -> usize {
        self.third_octets.len() * self.fourth_octets.len()
    }

    /// Worst-case wall clock if every candidate times out: probes run in
    /// waves of `max_inflight`, one timeout each. Bounded concurrency is
    /// what keeps this a few seconds instead of
    /// `candidate_count x probe_timeout`.
    pub fn worst_case_duration(&self) -> Duration {
        let waves = self.candidate_count().div_ceil(self.max_inflight) as u32;
        self.probe_timeout * waves
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_244() -> ScanRange {
        ScanRange::anchored_to(Ipv4Addr::new(10, 244, 6, 12), 8080)
    }

    #[test]
    fn base_comes_from_leading_octets() {
        let range = ten_244();
        assert_eq!(range.base, (10, 244));
        assert_eq!(range.port, 8080);
    }

    #[test]
    fn default_range_covers_fifty_subnets() {
        let range = ten_244();
        assert_eq!(range.candidate_count(), 50 * 254);
        assert_eq!(range.candidates().count(), 50 * 254);
    }

    #[test]
    fn default_range_skips_network_and_broadcast() {
        let range = ten_244();
        assert!(
            range
                .candidates()
                .all(|ip| ip.octets()[3] != 0 && ip.octets()[3] != 255)
        );
    }

    #[test]
    fn candidates_stay_inside_configured_bounds() {
        let mut range = ten_244();
        range.third_octets = 0..40;
        let outside = Ipv4Addr::new(10, 244, 45, 10);
        assert!(range.candidates().all(|ip| ip != outside));
    }

    #[test]
    fn worst_case_is_wave_count_times_timeout() {
        let mut range = ten_244();
        range.third_octets = 0..1;
        range.fourth_octets = 1..251; // 250 candidates
        range.max_inflight = 100;
        range.probe_timeout = Duration::from_millis(100);
        // 250 candidates / 100 in flight -> 3 waves
        assert_eq!(range.worst_case_duration(), Duration::from_millis(300));
    }

    #[test]
    fn invalid_tuning_is_rejected() {
        let mut range = ten_244();
        range.max_inflight = 0;
        assert!(matches!(
            range.validate(),
            Err(DiscoveryError::Configuration(_))
        ));

        let mut range = ten_244();
        range.probe_timeout = Duration::ZERO;
        assert!(range.validate().is_err());

        let mut range = ten_244();
        range.port = 0;
        assert!(range.validate().is_err());

        let mut range = ten_244();
        range.third_octets = 10..10;
        assert!(range.validate().is_err());
    }
}
