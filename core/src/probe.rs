use std::net::SocketAddrV4;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Reachability check for one candidate address.
///
/// The engine depends on this abstraction rather than on sockets so tests
/// can substitute instrumented probes (counting in-flight checks, faking
/// black-holed addresses) without real subnets.
#[async_trait]
pub trait Probe: Send + Sync {
    /// `true` iff something accepted a connection at `addr` within the
    /// probe's time budget. Must never block past that budget.
    async fn check(&self, addr: SocketAddrV4) -> bool;
}

/// Plain TCP connect-then-drop probe. No protocol handshake: anything
/// accepting on the port counts, which is exactly as much as the engine
/// promises to know.
pub struct TcpProbe {
    probe_timeout: Duration,
}

impl TcpProbe {
    pub fn new(probe_timeout: Duration) -> Self {
        Self { probe_timeout }
    }
}

#[async_trait]
impl Probe for TcpProbe {
    async fn check(&self, addr: SocketAddrV4) -> bool {
        // Refusals and transport errors fold into "absent" alongside
        // timeouts; none of them are worth reporting per-candidate.
        matches!(
            timeout(self.probe_timeout, TcpStream::connect(addr)).await,
            Ok(Ok(_))
        )
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
