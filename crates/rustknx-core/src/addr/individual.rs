use crate::error::AddressError;
use core::fmt;
use core::str::FromStr;

/// A KNX individual (physical) address, `area.line.device` packed into 16
/// bits (4/4/8).
///
/// `0.0.0` is the unset/this-device sentinel used by the data-link layer to
/// stamp outbound frames with its own identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndividualAddress(u16);

impl IndividualAddress {
    pub const NULL: Self = Self(0);

    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Area, bits 15-12.
    pub const fn area(self) -> u16 {
        self.0 >> 12
    }

    /// Line, bits 11-8.
    pub const fn line(self) -> u16 {
        (self.0 >> 8) & 0x0F
    }

    /// Device, bits 7-0.
    pub const fn device(self) -> u16 {
        self.0 & 0xFF
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl From<u16> for IndividualAddress {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl FromStr for IndividualAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || AddressError::Malformed(s.to_string());
        let levels = s
            .split('.')
            .map(|part| part.parse::<u32>().map_err(|_| malformed()))
            .collect::<Result<Vec<_>, _>>()?;
        let [area, line, device] = levels.as_slice() else {
            return Err(malformed());
        };
        check_level(*area, 15)?;
        check_level(*line, 15)?;
        check_level(*device, 255)?;
        Ok(Self(((area << 12) | (line << 8) | device) as u16))
    }
}

fn check_level(value: u32, max: u32) -> Result<(), AddressError> {
    if value > max {
        return Err(AddressError::LevelOutOfRange { value, max });
    }
    Ok(())
}

impl fmt::Display for IndividualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.area(), self.line(), self.device())
    }
}

#[cfg(test)]
mod tests {
    use super::IndividualAddress;
    use crate::error::AddressError;

    #[test]
    fn parses_and_displays() {
        let ia: IndividualAddress = "1.1.23".parse().unwrap();
        assert_eq!(ia.area(), 1);
        assert_eq!(ia.line(), 1);
        assert_eq!(ia.device(), 23);
        assert_eq!(ia.to_string(), "1.1.23");
    }

    #[test]
    fn null_sentinel() {
        let ia: IndividualAddress = "0.0.0".parse().unwrap();
        assert!(ia.is_null());
        assert_eq!(ia, IndividualAddress::NULL);
    }

    #[test]
    fn orders_by_raw_value() {
        let low: IndividualAddress = "1.1.1".parse().unwrap();
        let high: IndividualAddress = "1.2.0".parse().unwrap();
        assert!(low < high);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            "1.1".parse::<IndividualAddress>(),
            Err(AddressError::Malformed(_))
        ));
        assert!(matches!(
            "1/1/1".parse::<IndividualAddress>(),
            Err(AddressError::Malformed(_))
        ));
        assert_eq!(
            "16.0.0".parse::<IndividualAddress>(),
            Err(AddressError::LevelOutOfRange { value: 16, max: 15 })
        );
    }
}
