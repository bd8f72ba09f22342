//! # Subnet Discovery Engine
//!
//! Finds sibling replicas the hard way: enumerate every candidate address
//! in the configured octet block and try to connect to each one on the
//! service port. Live addresses become peers, everything else is silently
//! dropped. One invocation owns its entire state; nothing is cached
//! across calls and nothing is shared between concurrent callers.
//!
//! Precision caveat, inherent and deliberate: the engine knows only that
//! *something* accepted a connection on the port. An unrelated process
//! sharing the network and port is indistinguishable from a replica.
//! Callers needing real membership must layer a registry on top.

use std::collections::BTreeSet;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use flock_common::error::DiscoveryError;
use flock_common::net::{PeerAddr, ScanRange};

use crate::probe::{Probe, TcpProbe};

/// Output of one discovery invocation. Constructed fresh per call and
/// meaningless outside it.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// The caller's own address on the target port. Never in `peers`.
    pub local: PeerAddr,
    /// Deduplicated live addresses, self excluded.
    pub peers: BTreeSet<PeerAddr>,
    pub elapsed: Duration,
}

impl ScanReport {
    pub fn found_count(&self) -> usize {
        self.peers.len()
    }
}

/// Scans `range` for peers of `self_ip` using real TCP connect probes.
///
/// An empty peer set is a valid outcome (single-replica deployment), not
/// an error; only identity resolution upstream or an unusable `range`
/// fail the call.
pub async fn discover_peers(
    self_ip: Ipv4Addr,
    range: &ScanRange,
) -> Result<ScanReport, DiscoveryError> {
    let probe = Arc::new(TcpProbe::new(range.probe_timeout));
    discover_peers_with(self_ip, range, probe).await
}

/// Same scan with a caller-supplied probe. The seam the tests use to
/// verify the concurrency ceiling and timing bound without a network.
pub async fn discover_peers_with(
    self_ip: Ipv4Addr,
    range: &ScanRange,
    probe: Arc<dyn Probe>,
) -> Result<ScanReport, DiscoveryError> {
    range.validate()?;

    debug!(
        candidates = range.candidate_count(),
        max_inflight = range.max_inflight,
        port = range.port,
        "starting subnet sweep"
    );
    let started = Instant::now();

    // All candidate tasks spawn up front; the semaphore is what bounds
    // actual fan-out. A permit is only held while a socket is in flight,
    // so a hung candidate blocks one slot, never the sweep.
    let gate = Arc::new(Semaphore::new(range.max_inflight));
    let mut probes: JoinSet<Option<Ipv4Addr>> = JoinSet::new();

    for candidate in range.candidates() {
        let addr = SocketAddrV4::new(candidate, range.port);
        let gate = Arc::clone(&gate);
        let probe = Arc::clone(&probe);

        probes.spawn(async move {
            let Ok(_permit) = gate.acquire_owned().await else {
                return None;
            };
            probe.check(addr).await.then_some(candidate)
        });
    }

    let mut peers: BTreeSet<PeerAddr> = BTreeSet::new();
    while let Some(joined) = probes.join_next().await {
        // A panicked probe task forfeits its candidate, same as a
        // transport failure.
        let Ok(Some(ip)) = joined else { continue };
        if ip == self_ip {
            continue;
        }
        if peers.insert(PeerAddr::new(ip, range.port)) {
            debug!(peer = %ip, "candidate answered on service port");
        }
    }

    let elapsed = started.elapsed();
    info!(
        found = peers.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "subnet sweep complete"
    );

    Ok(ScanReport {
        local: PeerAddr::new(self_ip, range.port),
        peers,
        elapsed,
    })
}
