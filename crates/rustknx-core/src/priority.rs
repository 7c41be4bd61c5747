use crate::error::PriorityError;
use core::fmt;
use core::str::FromStr;

/// Frame priority, ordered from most to least urgent.
///
/// The declaration order is the send-scheduling rank ([`rank`](Self::rank),
/// system highest). The 2-bit on-wire encoding in control field 1 uses a
/// different numbering, exposed by [`code`](Self::code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Priority {
    System,
    Urgent,
    Normal,
    Low,
}

impl Priority {
    /// Scheduling rank, 0 (system) to 3 (low). Used as the send-queue index.
    pub const fn rank(self) -> usize {
        self as usize
    }

    /// The 2-bit priority code carried in control field 1.
    pub const fn code(self) -> u8 {
        match self {
            Self::System => 0b00,
            Self::Normal => 0b01,
            Self::Urgent => 0b10,
            Self::Low => 0b11,
        }
    }

    /// Decodes the 2-bit control-field code (only the low 2 bits are read).
    pub const fn from_code(code: u8) -> Self {
        match code & 0b11 {
            0b00 => Self::System,
            0b01 => Self::Normal,
            0b10 => Self::Urgent,
            _ => Self::Low,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Urgent => "urgent",
            Self::Normal => "normal",
            Self::Low => "low",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Low
    }
}

impl FromStr for Priority {
    type Err = PriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Self::System),
            "urgent" => Ok(Self::Urgent),
            "normal" => Ok(Self::Normal),
            "low" => Ok(Self::Low),
            other => Err(PriorityError(other.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::Priority;

    #[test]
    fn parses_names() {
        assert_eq!("system".parse::<Priority>().unwrap(), Priority::System);
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
        assert!("express".parse::<Priority>().is_err());
    }

    #[test]
    fn rank_orders_system_first() {
        assert!(Priority::System < Priority::Urgent);
        assert!(Priority::Urgent < Priority::Normal);
        assert!(Priority::Normal < Priority::Low);
        assert_eq!(Priority::System.rank(), 0);
        assert_eq!(Priority::Low.rank(), 3);
    }

    #[test]
    fn wire_code_roundtrip() {
        for p in [
            Priority::System,
            Priority::Urgent,
            Priority::Normal,
            Priority::Low,
        ] {
            assert_eq!(Priority::from_code(p.code()), p);
        }
        assert_eq!(Priority::Normal.code(), 0b01);
        assert_eq!(Priority::Urgent.code(), 0b10);
    }
}
