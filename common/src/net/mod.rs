pub mod peer;
pub mod range;

pub use peer::PeerAddr;
pub use range::ScanRange;
