use crate::error::AddressError;
use core::fmt;
use core::str::FromStr;

/// A KNX group address, normalized to its 16-bit bus representation.
///
/// Group addresses identify a shared data point rather than a single device.
/// Textual forms are the 3-level `main/middle/sub` notation (5/3/8 bits) and
/// the 2-level `main/sub` notation (5/11 bits); both normalize to the same
/// raw value. Address `0/0/0` is the null address, which is never a valid
/// send destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupAddress(u16);

impl GroupAddress {
    pub const NULL: Self = Self(0);

    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Main group, bits 15-11.
    pub const fn main(self) -> u16 {
        self.0 >> 11
    }

    /// Middle group, bits 10-8.
    pub const fn middle(self) -> u16 {
        (self.0 >> 8) & 0x07
    }

    /// Sub group of the 3-level notation, bits 7-0.
    pub const fn sub(self) -> u16 {
        self.0 & 0xFF
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl From<u16> for GroupAddress {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl FromStr for GroupAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || AddressError::Malformed(s.to_string());
        let levels = s
            .split('/')
            .map(|part| part.parse::<u32>().map_err(|_| malformed()))
            .collect::<Result<Vec<_>, _>>()?;
        let raw = match levels.as_slice() {
            [main, middle, sub] => {
                check_level(*main, 31)?;
                check_level(*middle, 7)?;
                check_level(*sub, 255)?;
                (main << 11) | (middle << 8) | sub
            }
            [main, sub] => {
                check_level(*main, 31)?;
                check_level(*sub, 2047)?;
                (main << 11) | sub
            }
            _ => return Err(malformed()),
        };
        Ok(Self(raw as u16))
    }
}

fn check_level(value: u32, max: u32) -> Result<(), AddressError> {
    if value > max {
        return Err(AddressError::LevelOutOfRange { value, max });
    }
    Ok(())
}

impl fmt::Display for GroupAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.main(), self.middle(), self.sub())
    }
}

#[cfg(test)]
mod tests {
    use super::GroupAddress;
    use crate::error::AddressError;

    #[test]
    fn parses_three_level_notation() {
        let gad: GroupAddress = "1/2/3".parse().unwrap();
        assert_eq!(gad.main(), 1);
        assert_eq!(gad.middle(), 2);
        assert_eq!(gad.sub(), 3);
        assert_eq!(gad.raw(), (1 << 11) | (2 << 8) | 3);
        assert_eq!(gad.to_string(), "1/2/3");
    }

    #[test]
    fn parses_two_level_notation() {
        let gad: GroupAddress = "1/515".parse().unwrap();
        assert_eq!(gad.raw(), (1 << 11) | 515);
        assert_eq!(gad, "1/2/3".parse().unwrap());
    }

    #[test]
    fn null_address() {
        let gad: GroupAddress = "0/0/0".parse().unwrap();
        assert!(gad.is_null());
        assert_eq!(gad, GroupAddress::NULL);
        assert!(!GroupAddress::new(1).is_null());
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            "1-2-3".parse::<GroupAddress>(),
            Err(AddressError::Malformed(_))
        ));
        assert!(matches!(
            "1/2/3/4".parse::<GroupAddress>(),
            Err(AddressError::Malformed(_))
        ));
        assert!(matches!(
            "1/a/3".parse::<GroupAddress>(),
            Err(AddressError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_levels() {
        assert_eq!(
            "32/0/0".parse::<GroupAddress>(),
            Err(AddressError::LevelOutOfRange { value: 32, max: 31 })
        );
        assert_eq!(
            "0/8/0".parse::<GroupAddress>(),
            Err(AddressError::LevelOutOfRange { value: 8, max: 7 })
        );
        assert_eq!(
            "0/0/256".parse::<GroupAddress>(),
            Err(AddressError::LevelOutOfRange {
                value: 256,
                max: 255
            })
        );
        assert_eq!(
            "0/2048".parse::<GroupAddress>(),
            Err(AddressError::LevelOutOfRange {
                value: 2048,
                max: 2047
            })
        );
    }
}
