use crate::dpt::id::DptId;
use core::fmt;

/// A typed application value handled by the DPT translators.
#[derive(Debug, Clone, PartialEq)]
pub enum DptValue {
    Bool(bool),
    Unsigned(u32),
    Signed(i32),
    Float(f64),
}

impl fmt::Display for DptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Signed(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// The legal value domain of a DPT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DptLimits {
    Bool,
    Unsigned { min: u32, max: u32 },
    Signed { min: i32, max: i32 },
    Float { min: f64, max: f64 },
}

impl DptLimits {
    /// Whether `value` is of the domain's kind at all.
    pub fn accepts_kind(&self, value: &DptValue) -> bool {
        matches!(
            (self, value),
            (Self::Bool, DptValue::Bool(_))
                | (Self::Unsigned { .. }, DptValue::Unsigned(_))
                | (Self::Signed { .. }, DptValue::Signed(_))
                | (Self::Float { .. }, DptValue::Float(_))
        )
    }

    /// Whether `value` lies inside the domain. Kind mismatches are outside.
    pub fn contains(&self, value: &DptValue) -> bool {
        match (self, value) {
            (Self::Bool, DptValue::Bool(_)) => true,
            (Self::Unsigned { min, max }, DptValue::Unsigned(v)) => (min..=max).contains(&v),
            (Self::Signed { min, max }, DptValue::Signed(v)) => (min..=max).contains(&v),
            (Self::Float { min, max }, DptValue::Float(v)) => *min <= *v && *v <= *max,
            _ => false,
        }
    }
}

/// An immutable Datapoint Type: id, description, legal value limits, and an
/// optional unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dpt {
    pub id: DptId,
    pub description: &'static str,
    pub limits: DptLimits,
    pub unit: Option<&'static str>,
}
