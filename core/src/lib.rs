pub mod discovery;
pub mod identity;
pub mod probe;

pub use discovery::{ScanReport, discover_peers, discover_peers_with};
pub use identity::{Identity, resolve_self};
pub use probe::{Probe, TcpProbe};
