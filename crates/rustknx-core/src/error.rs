use thiserror::Error;

/// Errors raised while parsing or validating bus addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("malformed address `{0}`")]
    Malformed(String),
    #[error("address level {value} out of range (max {max})")]
    LevelOutOfRange { value: u32, max: u32 },
    #[error("null group address is not a valid destination")]
    NullDestination,
}

/// Errors raised by the cEMI frame codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("truncated frame")]
    Truncated,
    #[error("unknown message code 0x{0:02x}")]
    UnknownMessageCode(u8),
    #[error("unsupported additional info length {0}")]
    AdditionalInfo(u8),
    #[error("reserved control bits set")]
    ReservedBits,
    #[error("NPDU length byte inconsistent with payload")]
    LengthMismatch,
    #[error("hop count {0} out of range")]
    HopCountOutOfRange(u8),
    #[error("encode buffer too small")]
    BufferTooSmall,
}

/// Errors raised while parsing a communication flags string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagsError {
    #[error("unknown flag letter `{0}`")]
    UnknownFlag(char),
    #[error("flags `{0}` not in canonical CRWTUIS order")]
    OutOfOrder(String),
}

/// Error raised while parsing a priority name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown priority `{0}`")]
pub struct PriorityError(pub String);
