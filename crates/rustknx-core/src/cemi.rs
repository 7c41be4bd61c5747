use crate::addr::{GroupAddress, IndividualAddress};
use crate::encoding::{Reader, Writer};
use crate::error::FrameError;
use crate::priority::Priority;
use core::fmt;

/// cEMI message code of an L_Data frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCode {
    /// L_Data.req (0x11).
    LDataReq,
    /// L_Data.ind (0x29).
    LDataInd,
    /// L_Data.con (0x2E).
    LDataCon,
}

impl MessageCode {
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::LDataReq => 0x11,
            Self::LDataInd => 0x29,
            Self::LDataCon => 0x2E,
        }
    }

    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0x11 => Some(Self::LDataReq),
            0x29 => Some(Self::LDataInd),
            0x2E => Some(Self::LDataCon),
            _ => None,
        }
    }
}

/// Destination of an L_Data frame, discriminated by the address-type bit of
/// control field 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationAddress {
    Group(GroupAddress),
    Individual(IndividualAddress),
}

impl fmt::Display for DestinationAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group(gad) => write!(f, "group {gad}"),
            Self::Individual(ia) => write!(f, "individual {ia}"),
        }
    }
}

/// Maximum encoded size of an L_Data frame: the 9 fixed octets plus a
/// maximal NPDU body.
pub const MAX_FRAME_LEN: usize = 9 + 255;

/// A cEMI L_Data frame, the sole payload exchanged between the data-link
/// layer and the transceiver.
///
/// Wire layout:
///
/// ```text
/// +0  message code
/// +1  additional-info length (always 0)
/// +2  control 1: frame type, repeat, broadcast, priority code (bits 3-2)
/// +3  control 2: address type (bit 7), hop count (bits 6-4), EFF (bits 3-0)
/// +4  source individual address, big-endian u16
/// +6  destination address, big-endian u16
/// +8  NPDU length byte
/// +9  NPDU body (length byte + 1 octets)
/// ```
///
/// The stored `npdu` includes the leading length byte; the invariant
/// `npdu[0] == npdu.len() - 2` (transport payload length minus one) is
/// enforced at construction and decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CemiFrame {
    message_code: MessageCode,
    priority: Priority,
    hop_count: u8,
    source: IndividualAddress,
    destination: DestinationAddress,
    npdu: Vec<u8>,
}

impl CemiFrame {
    pub fn new(
        message_code: MessageCode,
        priority: Priority,
        hop_count: u8,
        source: IndividualAddress,
        destination: DestinationAddress,
        npdu: Vec<u8>,
    ) -> Result<Self, FrameError> {
        if hop_count > 7 {
            return Err(FrameError::HopCountOutOfRange(hop_count));
        }
        if npdu.len() < 2 || npdu.len() > 257 || npdu[0] as usize != npdu.len() - 2 {
            return Err(FrameError::LengthMismatch);
        }
        Ok(Self {
            message_code,
            priority,
            hop_count,
            source,
            destination,
            npdu,
        })
    }

    pub fn message_code(&self) -> MessageCode {
        self.message_code
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn hop_count(&self) -> u8 {
        self.hop_count
    }

    pub fn source(&self) -> IndividualAddress {
        self.source
    }

    /// Stamps the source address; used by the data-link layer to fill in its
    /// own identity on outbound frames.
    pub fn set_source(&mut self, source: IndividualAddress) {
        self.source = source;
    }

    pub fn destination(&self) -> DestinationAddress {
        self.destination
    }

    /// The NPDU including its leading length byte.
    pub fn npdu(&self) -> &[u8] {
        &self.npdu
    }

    /// The transport payload (NPDU body without the length byte).
    pub fn tpdu(&self) -> &[u8] {
        &self.npdu[1..]
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), FrameError> {
        w.write_u8(self.message_code.to_u8())?;
        w.write_u8(0)?;
        // Standard frame, no repeat, normal (non-system) broadcast.
        w.write_u8(0xB0 | (self.priority.code() << 2))?;
        let address_type = match self.destination {
            DestinationAddress::Group(_) => 0x80,
            DestinationAddress::Individual(_) => 0x00,
        };
        w.write_u8(address_type | (self.hop_count << 4))?;
        w.write_be_u16(self.source.raw())?;
        let dest = match self.destination {
            DestinationAddress::Group(gad) => gad.raw(),
            DestinationAddress::Individual(ia) => ia.raw(),
        };
        w.write_be_u16(dest)?;
        w.write_all(&self.npdu)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, FrameError> {
        let raw_code = r.read_u8()?;
        let message_code =
            MessageCode::from_u8(raw_code).ok_or(FrameError::UnknownMessageCode(raw_code))?;
        let additional_info = r.read_u8()?;
        if additional_info != 0 {
            return Err(FrameError::AdditionalInfo(additional_info));
        }
        let ctrl1 = r.read_u8()?;
        let ctrl2 = r.read_u8()?;
        if ctrl2 & 0x0F != 0 {
            // Extended frame format nibble is reserved here.
            return Err(FrameError::ReservedBits);
        }
        let priority = Priority::from_code(ctrl1 >> 2);
        let hop_count = (ctrl2 >> 4) & 0x07;
        let source = IndividualAddress::new(r.read_be_u16()?);
        let dest_raw = r.read_be_u16()?;
        let destination = if ctrl2 & 0x80 != 0 {
            DestinationAddress::Group(GroupAddress::new(dest_raw))
        } else {
            DestinationAddress::Individual(IndividualAddress::new(dest_raw))
        };
        let length = r.read_u8()?;
        let body = r.read_exact(length as usize + 1)?;
        let mut npdu = Vec::with_capacity(body.len() + 1);
        npdu.push(length);
        npdu.extend_from_slice(body);
        Self::new(
            message_code,
            priority,
            hop_count,
            source,
            destination,
            npdu,
        )
    }
}
