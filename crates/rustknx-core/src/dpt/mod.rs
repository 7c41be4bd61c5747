//! Datapoint Type (DPT) registry and translators.
//!
//! A DPT standardizes one combination of format, encoding, range, and unit.
//! DPTs are identified by a `main.sub` pair; all DPTs sharing a main number
//! share the same wire format and encoding, and differ only in range and
//! unit. The generic id `main.xxx` carries the loosest limits of its format.
//!
//! One [`DptXlator`] implementation exists per wire format (per main
//! number); [`DptXlatorFactory`] resolves a [`DptId`] to the right
//! implementation, bound to either the exact sub-DPT's limits or the
//! generic profile.

mod boolean;
mod factory;
mod float16;
mod float32;
mod id;
mod signed16;
mod signed32;
mod signed8;
mod types;
mod unsigned16;
mod unsigned32;
mod unsigned8;
mod xlator;

pub use boolean::DptXlatorBoolean;
pub use factory::DptXlatorFactory;
pub use float16::DptXlatorFloat16;
pub use float32::DptXlatorFloat32;
pub use id::DptId;
pub use signed16::DptXlatorSigned16;
pub use signed32::DptXlatorSigned32;
pub use signed8::DptXlatorSigned8;
pub use types::{Dpt, DptLimits, DptValue};
pub use unsigned16::DptXlatorUnsigned16;
pub use unsigned32::DptXlatorUnsigned32;
pub use unsigned8::DptXlatorUnsigned8;
pub use xlator::DptXlator;

use thiserror::Error;

/// Errors raised by DPT id parsing, translator resolution, and the
/// value/data/frame conversions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DptError {
    #[error("malformed DPT id `{0}`")]
    InvalidId(String),
    #[error("no translator registered for main type {0}")]
    UnknownMainType(u16),
    #[error("unknown DPT `{0}`")]
    UnknownSubType(DptId),
    #[error("value {value} out of range for DPT {id}")]
    ValueOutOfRange { id: DptId, value: DptValue },
    #[error("value kind not supported by DPT {0}")]
    InvalidValueKind(DptId),
    #[error("data 0x{data:x} out of range for DPT {id}")]
    DataOutOfRange { id: DptId, data: u32 },
    #[error("frame length {got} invalid for DPT {id} (expected {expected})")]
    FrameLength {
        id: DptId,
        expected: usize,
        got: usize,
    },
}

/// Looks `id` up in a format's DPT table.
fn find_dpt(table: &'static [Dpt], id: DptId) -> Result<&'static Dpt, DptError> {
    table
        .iter()
        .find(|dpt| dpt.id == id)
        .ok_or(DptError::UnknownSubType(id))
}
