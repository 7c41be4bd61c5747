use crate::dpt::types::{Dpt, DptLimits, DptValue};
use crate::dpt::xlator::{data_from_frame, frame_from_data, DptXlator};
use crate::dpt::{find_dpt, DptError, DptId};

/// DPT main type 5: 8-bit unsigned, optionally linearly scaled onto the raw
/// 0..=255 range (e.g. percentages).
pub struct DptXlatorUnsigned8 {
    dpt: &'static Dpt,
    /// Value per raw count; 1.0 for unscaled sub-DPTs.
    scale: f64,
}

const DPTS: &[Dpt] = &[
    Dpt {
        id: DptId::generic(5),
        description: "Generic 8-bit unsigned value",
        limits: DptLimits::Unsigned { min: 0, max: 255 },
        unit: None,
    },
    Dpt {
        id: DptId::new(5, 1),
        description: "Scaling",
        limits: DptLimits::Float {
            min: 0.0,
            max: 100.0,
        },
        unit: Some("%"),
    },
    Dpt {
        id: DptId::new(5, 3),
        description: "Angle",
        limits: DptLimits::Float {
            min: 0.0,
            max: 360.0,
        },
        unit: Some("\u{b0}"),
    },
    Dpt {
        id: DptId::new(5, 4),
        description: "Percent (8 bit)",
        limits: DptLimits::Unsigned { min: 0, max: 255 },
        unit: Some("%"),
    },
    Dpt {
        id: DptId::new(5, 10),
        description: "Counter pulses",
        limits: DptLimits::Unsigned { min: 0, max: 255 },
        unit: Some("pulses"),
    },
];

impl DptXlatorUnsigned8 {
    pub fn new(id: DptId) -> Result<Self, DptError> {
        let dpt = find_dpt(DPTS, id)?;
        let scale = match dpt.limits {
            DptLimits::Float { max, .. } => max / 255.0,
            _ => 1.0,
        };
        Ok(Self { dpt, scale })
    }
}

impl DptXlator for DptXlatorUnsigned8 {
    fn dpt(&self) -> &Dpt {
        self.dpt
    }

    fn type_size(&self) -> usize {
        1
    }

    fn check_data(&self, data: u32) -> Result<(), DptError> {
        if data > 0xFF {
            return Err(DptError::DataOutOfRange {
                id: self.dpt.id,
                data,
            });
        }
        Ok(())
    }

    fn check_value(&self, value: &DptValue) -> Result<(), DptError> {
        if !self.dpt.limits.accepts_kind(value) {
            return Err(DptError::InvalidValueKind(self.dpt.id));
        }
        if !self.dpt.limits.contains(value) {
            return Err(DptError::ValueOutOfRange {
                id: self.dpt.id,
                value: value.clone(),
            });
        }
        Ok(())
    }

    fn value_to_data(&self, value: &DptValue) -> Result<u32, DptError> {
        self.check_value(value)?;
        match value {
            DptValue::Unsigned(v) => Ok(*v),
            DptValue::Float(v) => Ok((v / self.scale).round() as u32),
            _ => Err(DptError::InvalidValueKind(self.dpt.id)),
        }
    }

    fn data_to_value(&self, data: u32) -> Result<DptValue, DptError> {
        self.check_data(data)?;
        match self.dpt.limits {
            DptLimits::Float { .. } => Ok(DptValue::Float(f64::from(data) * self.scale)),
            _ => Ok(DptValue::Unsigned(data)),
        }
    }

    fn data_to_frame(&self, data: u32) -> Result<Vec<u8>, DptError> {
        self.check_data(data)?;
        Ok(frame_from_data(data, self.type_size()))
    }

    fn frame_to_data(&self, frame: &[u8]) -> Result<u32, DptError> {
        data_from_frame(frame, self.type_size(), self.dpt.id)
    }
}

#[cfg(test)]
mod tests {
    use super::DptXlatorUnsigned8;
    use crate::dpt::{DptError, DptId, DptValue, DptXlator};

    #[test]
    fn generic_is_unscaled() {
        let x = DptXlatorUnsigned8::new(DptId::generic(5)).unwrap();
        assert_eq!(x.type_size(), 1);
        const TABLE: &[(u32, u32, &[u8])] =
            &[(0, 0x00, &[0x00]), (128, 0x80, &[0x80]), (255, 0xFF, &[0xFF])];
        for (value, data, frame) in TABLE {
            assert_eq!(x.data_to_value(*data).unwrap(), DptValue::Unsigned(*value));
            assert_eq!(x.value_to_data(&DptValue::Unsigned(*value)).unwrap(), *data);
            assert_eq!(x.data_to_frame(*data).unwrap(), *frame);
            assert_eq!(x.frame_to_data(frame).unwrap(), *data);
        }
    }

    #[test]
    fn scaling_percent() {
        let x = DptXlatorUnsigned8::new(DptId::new(5, 1)).unwrap();
        assert_eq!(x.unit(), Some("%"));
        assert_eq!(x.value_to_data(&DptValue::Float(0.0)).unwrap(), 0x00);
        assert_eq!(x.value_to_data(&DptValue::Float(100.0)).unwrap(), 0xFF);
        assert_eq!(x.data_to_value(0xFF).unwrap(), DptValue::Float(100.0));
        // Data-side round trip is exact for every raw count.
        for data in 0..=255 {
            let value = x.data_to_value(data).unwrap();
            assert_eq!(x.value_to_data(&value).unwrap(), data);
        }
    }

    #[test]
    fn limits_are_inclusive() {
        let x = DptXlatorUnsigned8::new(DptId::new(5, 1)).unwrap();
        assert!(x.check_value(&DptValue::Float(100.0)).is_ok());
        assert!(matches!(
            x.check_value(&DptValue::Float(100.1)),
            Err(DptError::ValueOutOfRange { .. })
        ));
        let x = DptXlatorUnsigned8::new(DptId::generic(5)).unwrap();
        assert!(x.check_value(&DptValue::Unsigned(255)).is_ok());
        assert!(matches!(
            x.check_value(&DptValue::Unsigned(256)),
            Err(DptError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            x.check_data(0x100),
            Err(DptError::DataOutOfRange { .. })
        ));
    }
}
