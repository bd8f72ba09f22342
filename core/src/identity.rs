//! # Self-Identity Resolver
//!
//! Answers one question at startup: who am I on the network?
//!
//! The private IP anchors every scan (it picks the subnet block to sweep)
//! and is excluded from every result (a replica is not its own peer), so
//! resolution failure is fatal to discovery. Resolve once during
//! initialization and hand the value to the engine explicitly; the engine
//! never looks it up on its own.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;
use tracing::debug;

use flock_common::error::DiscoveryError;

/// This process's view of itself. Read-only local lookup; no network I/O
/// beyond local resolution.
#[derive(Debug, Clone)]
pub struct Identity {
    pub hostname: String,
    pub ip: Ipv4Addr,
}

/// Resolves the process hostname and its primary non-loopback IPv4.
pub fn resolve_self() -> Result<Identity, DiscoveryError> {
    let hostname = sys_info::hostname()
        .map_err(|e| DiscoveryError::Resolution(format!("hostname lookup failed: {e}")))?;

    let ip = primary_private_ipv4().ok_or_else(|| {
        DiscoveryError::Resolution("no non-loopback IPv4 address on any interface".into())
    })?;

    debug!(%hostname, %ip, "resolved local identity");
    Ok(Identity { hostname, ip })
}

/// First viable interface address, preferring private ranges.
///
/// Interface enumeration covers the common container case (one veth pair
/// with the pod address). The UDP fallback handles hosts where the
/// address only shows up on the default route, not on an enumerable
/// interface; the socket is never actually sent on.
fn primary_private_ipv4() -> Option<Ipv4Addr> {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces()
        .into_iter()
        .filter(|i| i.is_up() && !i.is_loopback() && !i.ips.is_empty())
        .collect();

    let addresses = interfaces.iter().flat_map(|i| &i.ips).filter_map(|net| {
        match net {
            IpNetwork::V4(v4) if !v4.ip().is_loopback() => Some(v4.ip()),
            _ => None,
        }
    });

    let mut fallback: Option<Ipv4Addr> = None;
    for addr in addresses {
        if addr.is_private() {
            return Some(addr);
        }
        fallback.get_or_insert(addr);
    }

    fallback.or_else(routed_ipv4)
}

fn routed_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect(("10.254.254.254", 1)).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(v4) if !v4.is_loopback() && !v4.is_unspecified() => Some(v4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Depends on the host having a configured interface; meaningless in
    /// a network-less sandbox.
    #[test]
    #[ignore]
    fn resolve_self_yields_non_loopback_ipv4() {
        let identity = resolve_self().unwrap();
        assert!(!identity.hostname.is_empty());
        assert!(!identity.ip.is_loopback());
    }
}
