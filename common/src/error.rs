use thiserror::Error;

/// Failures that abort a discovery call before any probing happens.
///
/// Per-candidate transport failures (timeout, refused, unreachable) are
/// deliberately absent: they only decide whether that one candidate shows
/// up in the result set and are never surfaced individually.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The process could not determine its own hostname or a non-loopback
    /// private IPv4 address. Fatal: without a self IP there is no subnet to
    /// anchor the scan to and no address to exclude from the results.
    #[error("failed to resolve local identity: {0}")]
    Resolution(String),

    /// The scan range or tuning values are unusable (empty octet ranges,
    /// zero concurrency, zero timeout, port 0). Rejected before probing.
    #[error("invalid scan configuration: {0}")]
    Configuration(String),
}
