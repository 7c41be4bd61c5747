use crate::dpt::DptError;
use core::fmt;
use core::str::FromStr;

/// A Datapoint Type identifier, `"main.sub"` in text form.
///
/// The main number selects the wire format and encoding; the sub number
/// selects range and unit within it. The generic form `"main.xxx"` has no
/// sub number and stands for the loosest limits of the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DptId {
    main: u16,
    sub: Option<u16>,
}

impl DptId {
    pub const fn new(main: u16, sub: u16) -> Self {
        Self {
            main,
            sub: Some(sub),
        }
    }

    pub const fn generic(main: u16) -> Self {
        Self { main, sub: None }
    }

    pub const fn main(self) -> u16 {
        self.main
    }

    pub const fn sub(self) -> Option<u16> {
        self.sub
    }

    pub const fn is_generic(self) -> bool {
        self.sub.is_none()
    }

    /// The generic id of the same wire format.
    pub const fn to_generic(self) -> Self {
        Self::generic(self.main)
    }
}

impl FromStr for DptId {
    type Err = DptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DptError::InvalidId(s.to_string());
        let (main, sub) = s.split_once('.').ok_or_else(invalid)?;
        let main = main.parse::<u16>().map_err(|_| invalid())?;
        if sub == "xxx" {
            return Ok(Self::generic(main));
        }
        let sub = sub.parse::<u16>().map_err(|_| invalid())?;
        Ok(Self::new(main, sub))
    }
}

impl fmt::Display for DptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sub {
            Some(sub) => write!(f, "{}.{:03}", self.main, sub),
            None => write!(f, "{}.xxx", self.main),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DptId;
    use crate::dpt::DptError;

    #[test]
    fn parses_specific_and_generic() {
        assert_eq!("1.001".parse::<DptId>().unwrap(), DptId::new(1, 1));
        assert_eq!("9.007".parse::<DptId>().unwrap(), DptId::new(9, 7));
        assert_eq!("14.xxx".parse::<DptId>().unwrap(), DptId::generic(14));
    }

    #[test]
    fn displays_zero_padded() {
        assert_eq!(DptId::new(1, 1).to_string(), "1.001");
        assert_eq!(DptId::new(14, 56).to_string(), "14.056");
        assert_eq!(DptId::generic(9).to_string(), "9.xxx");
    }

    #[test]
    fn generic_form_shares_main() {
        let id = DptId::new(9, 1);
        assert_eq!(id.to_generic(), DptId::generic(9));
        assert!(!id.is_generic());
        assert!(id.to_generic().is_generic());
    }

    #[test]
    fn rejects_malformed_ids() {
        for s in ["", "1", "1-001", "a.001", "1.yyy", "1.001.2"] {
            assert_eq!(s.parse::<DptId>(), Err(DptError::InvalidId(s.into())));
        }
    }
}
