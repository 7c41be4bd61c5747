use std::time::Duration;
use thiserror::Error;

/// Errors raised by a bus transceiver.
#[derive(Debug, Error)]
pub enum TransceiverError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("transceiver closed")]
    Closed,
}

/// Blocking access to a physical or emulated KNX medium.
///
/// Implementors include [`UdpTransceiver`](crate::UdpTransceiver) for
/// KNXnet/IP multicast and [`LoopbackTransceiver`](crate::LoopbackTransceiver)
/// for in-process testing. `send` and `recv` may be called concurrently from
/// different threads.
pub trait Transceiver: Send + Sync {
    /// Puts one encoded cEMI frame on the medium.
    fn send(&self, frame: &[u8]) -> Result<(), TransceiverError>;

    /// Waits up to `timeout` for the next frame. Returns `Ok(None)` when the
    /// timeout elapses without traffic.
    fn recv(&self, timeout: Duration) -> Result<Option<Vec<u8>>, TransceiverError>;

    /// Releases medium resources. Called once when the link stops; blocked
    /// `recv` calls return shortly afterwards.
    fn cleanup(&self);
}
