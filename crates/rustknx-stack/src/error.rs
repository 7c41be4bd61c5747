use rustknx_core::{AddressError, FrameError};
use rustknx_datalink::DataLinkError;
use thiserror::Error;

/// Errors surfaced by the stack layers and datapoint machinery.
#[derive(Debug, Error)]
pub enum StackError {
    #[error("address error: {0}")]
    Address(#[from] AddressError),
    #[error("dpt error: {0}")]
    Dpt(#[from] rustknx_core::dpt::DptError),
    #[error("data-link error: {0}")]
    DataLink(#[from] DataLinkError),
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
    #[error("hop count {0} out of range (expected 1..=6)")]
    InvalidHopCount(u8),
    #[error("datapoint holds no value yet")]
    NoValue,
    #[error("empty payload")]
    EmptyPayload,
}
