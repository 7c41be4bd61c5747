//! Data-link layer: transceivers, the priority send queue, and the
//! [`DataLinkService`] that pumps frames between the bus and the upper
//! layers on dedicated threads.

pub mod link;
pub mod loopback;
pub mod queue;
pub mod transceiver;
pub mod udp;

pub use link::{DataLinkService, LinkListener};
pub use loopback::LoopbackTransceiver;
pub use queue::PriorityQueue;
pub use transceiver::{Transceiver, TransceiverError};
pub use udp::UdpTransceiver;

use thiserror::Error;

/// Errors that can occur at the data-link layer.
#[derive(Debug, Error)]
pub enum DataLinkError {
    #[error("transceiver error: {0}")]
    Transceiver(#[from] TransceiverError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("link not started")]
    NotStarted,
}
