//! End-to-end discovery tests against real sockets.
//!
//! Linux treats all of 127.0.0.0/8 as local, so listeners bound to
//! scattered `127.0.x.y` addresses stand in for replicas spread across
//! node subnets; the engine sweeps them exactly as it would a pod
//! network. The multi-address tests are Linux-only for that reason.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use flock_common::net::ScanRange;
use flock_core::discovery::{discover_peers, discover_peers_with};
use flock_core::probe::Probe;
use tokio::net::TcpListener;

/// Self address for loopback scenarios; mirrors a pod at 10.244.6.12.
const SELF_IP: Ipv4Addr = Ipv4Addr::new(127, 0, 6, 12);

/// Binds the first address on an OS-assigned port, then the rest on the
/// same port. The listeners are never accepted from; a pending backlog
/// entry is enough for a connect-only probe.
async fn bind_replicas(ips: &[Ipv4Addr]) -> anyhow::Result<(u16, Vec<TcpListener>)> {
    let first = TcpListener::bind((ips[0], 0)).await?;
    let port = first.local_addr()?.port();

    let mut listeners = vec![first];
    for ip in &ips[1..] {
        listeners.push(TcpListener::bind((*ip, port)).await?);
    }
    Ok((port, listeners))
}

fn loopback_range(port: u16) -> ScanRange {
    let mut range = ScanRange::anchored_to(SELF_IP, port);
    // Closed loopback ports refuse instantly, but leave headroom for
    // slow CI schedulers.
    range.probe_timeout = Duration::from_millis(250);
    range.max_inflight = 256;
    range
}

#[tokio::test]
#[cfg(target_os = "linux")]
async fn finds_replicas_scattered_across_subnets() {
    let replicas = [
        Ipv4Addr::new(127, 0, 0, 45),
        Ipv4Addr::new(127, 0, 33, 201),
        SELF_IP,
    ];
    let (port, _listeners) = bind_replicas(&replicas).await.unwrap();

    let report = discover_peers(SELF_IP, &loopback_range(port)).await.unwrap();

    let found: Vec<Ipv4Addr> = report.peers.iter().map(|p| p.ip).collect();
    assert_eq!(found, vec![replicas[0], replicas[1]]);
    assert!(
        !report.peers.contains(&report.local),
        "own address leaked into the peer set"
    );
}

#[tokio::test]
#[cfg(target_os = "linux")]
async fn listener_beyond_subnet_block_is_ignored() {
    let inside = Ipv4Addr::new(127, 0, 2, 2);
    let outside = Ipv4Addr::new(127, 0, 45, 10);
    let (port, _listeners) = bind_replicas(&[inside, outside]).await.unwrap();

    let mut range = loopback_range(port);
    range.third_octets = 0..40;

    let report = discover_peers(SELF_IP, &range).await.unwrap();

    let found: Vec<Ipv4Addr> = report.peers.iter().map(|p| p.ip).collect();
    assert_eq!(found, vec![inside], "scan escaped its configured bounds");
}

#[tokio::test]
#[cfg(target_os = "linux")]
async fn unchanged_listeners_give_identical_scans() {
    let replicas = [Ipv4Addr::new(127, 0, 7, 7), Ipv4Addr::new(127, 0, 49, 9)];
    let (port, _listeners) = bind_replicas(&replicas).await.unwrap();
    let range = loopback_range(port);

    let first = discover_peers(SELF_IP, &range).await.unwrap();
    let second = discover_peers(SELF_IP, &range).await.unwrap();

    assert_eq!(first.peers, second.peers);
    assert_eq!(first.found_count(), 2);
}

#[tokio::test]
#[cfg(target_os = "linux")]
async fn empty_subnet_block_yields_empty_report_quickly() {
    // Reserve a port so nothing can be listening on it in-range.
    let placeholder = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = placeholder.local_addr().unwrap().port();

    let mut range = loopback_range(port);
    range.third_octets = 5..7;

    let started = std::time::Instant::now();
    let report = discover_peers(SELF_IP, &range).await.unwrap();

    assert_eq!(report.found_count(), 0);
    assert!(
        started.elapsed() <= range.worst_case_duration() + Duration::from_millis(500),
        "empty scan overran its time bound"
    );
}

/// Every candidate behaves black-holed: the probe burns its full timeout
/// and reports nothing.
struct BlackHoleProbe {
    probe_timeout: Duration,
}

#[async_trait::async_trait]
impl Probe for BlackHoleProbe {
    async fn check(&self, _addr: std::net::SocketAddrV4) -> bool {
        tokio::time::sleep(self.probe_timeout).await;
        false
    }
}

#[tokio::test]
async fn black_holed_candidates_finish_in_waves_not_in_sequence() {
    let mut range = ScanRange::anchored_to(SELF_IP, 8080);
    range.third_octets = 0..1; // 254 candidates
    range.probe_timeout = Duration::from_millis(50);
    range.max_inflight = 64; // 4 waves, ~200ms total

    let probe = Arc::new(BlackHoleProbe {
        probe_timeout: range.probe_timeout,
    });

    let started = std::time::Instant::now();
    let report = discover_peers_with(SELF_IP, &range, probe).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(report.found_count(), 0);
    // Sequential probing would take 254 x 50ms = 12.7s.
    assert!(
        elapsed < Duration::from_secs(2),
        "hung candidates stalled the sweep: {elapsed:?}"
    );
    assert!(
        elapsed >= range.probe_timeout,
        "probes cannot finish faster than one timeout"
    );
}
