use crate::error::FlagsError;
use core::fmt;
use core::str::FromStr;

const ALPHABET: &str = "CRWTUIS";

/// Communication flags of a group object, drawn from the fixed alphabet
/// `CRWTUIS` (communicate, read, write, transmit, update, init, stateless).
///
/// A flags string must be an in-order subsequence of the canonical
/// `"CRWTUIS"`; unknown letters, duplicates, and out-of-order input are all
/// rejected at parse time. Display always uses the canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags(u8);

impl Flags {
    pub const fn communicate(self) -> bool {
        self.bit(0)
    }

    pub const fn read(self) -> bool {
        self.bit(1)
    }

    pub const fn write(self) -> bool {
        self.bit(2)
    }

    pub const fn transmit(self) -> bool {
        self.bit(3)
    }

    pub const fn update(self) -> bool {
        self.bit(4)
    }

    pub const fn init(self) -> bool {
        self.bit(5)
    }

    pub const fn stateless(self) -> bool {
        self.bit(6)
    }

    /// Returns true when every letter of `subset` is set. Letters outside
    /// the alphabet make the query false, not an error.
    pub fn has(self, subset: &str) -> bool {
        subset.chars().all(|c| match position(c) {
            Some(i) => self.bit(i),
            None => false,
        })
    }

    const fn bit(self, index: usize) -> bool {
        self.0 & (1 << index) != 0
    }
}

impl Default for Flags {
    /// The conventional group-object profile `CWU`.
    fn default() -> Self {
        Self(0b0010101)
    }
}

fn position(c: char) -> Option<usize> {
    ALPHABET.find(c)
}

impl FromStr for Flags {
    type Err = FlagsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mask = 0u8;
        let mut next = 0;
        for c in s.chars() {
            let index = position(c).ok_or(FlagsError::UnknownFlag(c))?;
            if index < next {
                return Err(FlagsError::OutOfOrder(s.to_string()));
            }
            mask |= 1 << index;
            next = index + 1;
        }
        Ok(Self(mask))
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, c) in ALPHABET.chars().enumerate() {
            if self.bit(index) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Flags;
    use crate::error::FlagsError;

    #[test]
    fn full_set_roundtrips_canonically() {
        let flags: Flags = "CRWTUIS".parse().unwrap();
        assert_eq!(flags.to_string(), "CRWTUIS");
        assert!(flags.communicate());
        assert!(flags.read());
        assert!(flags.write());
        assert!(flags.transmit());
        assert!(flags.update());
        assert!(flags.init());
        assert!(flags.stateless());
    }

    #[test]
    fn partial_set_accessors() {
        let flags: Flags = "CWT".parse().unwrap();
        assert!(flags.communicate());
        assert!(!flags.read());
        assert!(flags.write());
        assert!(flags.transmit());
        assert!(!flags.init());
        assert_eq!(flags.to_string(), "CWT");
    }

    #[test]
    fn rejects_unknown_letter() {
        assert_eq!("A".parse::<Flags>(), Err(FlagsError::UnknownFlag('A')));
        assert_eq!(
            "CRWTUISA".parse::<Flags>(),
            Err(FlagsError::UnknownFlag('A'))
        );
    }

    #[test]
    fn rejects_out_of_order_and_duplicates() {
        assert_eq!(
            "CWUT".parse::<Flags>(),
            Err(FlagsError::OutOfOrder("CWUT".into()))
        );
        assert_eq!(
            "CCWUT".parse::<Flags>(),
            Err(FlagsError::OutOfOrder("CCWUT".into()))
        );
    }

    #[test]
    fn superset_query() {
        let flags: Flags = "CRWTUIS".parse().unwrap();
        assert!(flags.has("C"));
        assert!(flags.has("CRT"));
        assert!(flags.has("CRTWIUS"));
        assert!(!flags.has("A"));
        assert!(!flags.has("ABD"));

        let partial: Flags = "CRT".parse().unwrap();
        assert!(partial.has("CT"));
        assert!(!partial.has("CW"));
    }
}
