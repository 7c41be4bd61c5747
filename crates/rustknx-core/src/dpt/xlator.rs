use crate::dpt::types::{Dpt, DptValue};
use crate::dpt::{DptError, DptId};

/// The codec implementing one DPT wire format.
///
/// A translator is bound at construction to exactly one [`Dpt`] (a specific
/// sub-DPT or the generic profile of the format) and mediates between three
/// representations:
///
/// - the semantic **value** ([`DptValue`]),
/// - the fixed-width encoded **data** (a `u32` holding the raw bit pattern),
/// - the on-wire **frame** octets following the APCI octet.
///
/// `value_to_data`/`data_to_value` and `data_to_frame`/`frame_to_data` are
/// exact mutual inverses over the legal domain. Translators are immutable
/// after construction and safely shared across threads.
pub trait DptXlator: Send + Sync {
    /// The DPT this translator is bound to.
    fn dpt(&self) -> &Dpt;

    /// Number of dedicated data octets following the APCI octet. Zero means
    /// the encoded value fits in 6 bits and rides inline in the APCI octet.
    fn type_size(&self) -> usize;

    /// Validates the encoded representation's width and range.
    fn check_data(&self, data: u32) -> Result<(), DptError>;

    /// Validates `value` against the bound DPT's limits.
    fn check_value(&self, value: &DptValue) -> Result<(), DptError>;

    fn value_to_data(&self, value: &DptValue) -> Result<u32, DptError>;

    fn data_to_value(&self, data: u32) -> Result<DptValue, DptError>;

    fn data_to_frame(&self, data: u32) -> Result<Vec<u8>, DptError>;

    fn frame_to_data(&self, frame: &[u8]) -> Result<u32, DptError>;

    fn unit(&self) -> Option<&'static str> {
        self.dpt().unit
    }
}

/// Big-endian frame bytes for a fixed-width encoding. Inline (size 0)
/// formats still occupy one octet at this level; the 6-bit packing into the
/// APCI octet happens in the application layer.
pub(super) fn frame_from_data(data: u32, type_size: usize) -> Vec<u8> {
    let width = type_size.max(1);
    data.to_be_bytes()[4 - width..].to_vec()
}

/// Inverse of [`frame_from_data`], with a strict length check.
pub(super) fn data_from_frame(
    frame: &[u8],
    type_size: usize,
    id: DptId,
) -> Result<u32, DptError> {
    let width = type_size.max(1);
    if frame.len() != width {
        return Err(DptError::FrameLength {
            id,
            expected: width,
            got: frame.len(),
        });
    }
    Ok(frame.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b)))
}

#[cfg(test)]
mod tests {
    use super::{data_from_frame, frame_from_data};
    use crate::dpt::{DptError, DptId};

    #[test]
    fn frame_widths() {
        assert_eq!(frame_from_data(0x01, 0), vec![0x01]);
        assert_eq!(frame_from_data(0xAB, 1), vec![0xAB]);
        assert_eq!(frame_from_data(0x07D0, 2), vec![0x07, 0xD0]);
        assert_eq!(
            frame_from_data(0xDEAD_BEEF, 4),
            vec![0xDE, 0xAD, 0xBE, 0xEF]
        );
    }

    #[test]
    fn frame_data_roundtrip() {
        let id = DptId::generic(9);
        for data in [0u32, 0x07D0, 0xFFFE] {
            let frame = frame_from_data(data, 2);
            assert_eq!(data_from_frame(&frame, 2, id).unwrap(), data);
        }
    }

    #[test]
    fn wrong_length_rejected() {
        let id = DptId::generic(9);
        assert_eq!(
            data_from_frame(&[0x01], 2, id).unwrap_err(),
            DptError::FrameLength {
                id,
                expected: 2,
                got: 1
            }
        );
    }
}
