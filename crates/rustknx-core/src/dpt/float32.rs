use crate::dpt::types::{Dpt, DptLimits, DptValue};
use crate::dpt::xlator::{data_from_frame, frame_from_data, DptXlator};
use crate::dpt::{find_dpt, DptError, DptId};

/// DPT main type 14: IEEE-754 binary32, big-endian on the wire.
pub struct DptXlatorFloat32 {
    dpt: &'static Dpt,
}

const LIMITS: DptLimits = DptLimits::Float {
    min: f32::MIN as f64,
    max: f32::MAX as f64,
};

const DPTS: &[Dpt] = &[
    Dpt {
        id: DptId::generic(14),
        description: "Generic 4-byte float",
        limits: LIMITS,
        unit: None,
    },
    Dpt {
        id: DptId::new(14, 19),
        description: "Electric current",
        limits: LIMITS,
        unit: Some("A"),
    },
    Dpt {
        id: DptId::new(14, 27),
        description: "Electric potential",
        limits: LIMITS,
        unit: Some("V"),
    },
    Dpt {
        id: DptId::new(14, 56),
        description: "Power",
        limits: LIMITS,
        unit: Some("W"),
    },
    Dpt {
        id: DptId::new(14, 68),
        description: "Temperature",
        limits: LIMITS,
        unit: Some("\u{b0}C"),
    },
];

impl DptXlatorFloat32 {
    pub fn new(id: DptId) -> Result<Self, DptError> {
        Ok(Self {
            dpt: find_dpt(DPTS, id)?,
        })
    }
}

impl DptXlator for DptXlatorFloat32 {
    fn dpt(&self) -> &Dpt {
        self.dpt
    }

    fn type_size(&self) -> usize {
        4
    }

    fn check_data(&self, _data: u32) -> Result<(), DptError> {
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
            DptValue::Float(v) => Ok((*v as f32).to_bits()),
            _ => Err(DptError::InvalidValueKind(self.dpt.id)),
        }
    }

    fn data_to_value(&self, data: u32) -> Result<DptValue, DptError> {
        Ok(DptValue::Float(f64::from(f32::from_bits(data))))
    }

    fn data_to_frame(&self, data: u32) -> Result<Vec<u8>, DptError> {
        Ok(frame_from_data(data, self.type_size()))
    }

    fn frame_to_data(&self, frame: &[u8]) -> Result<u32, DptError> {
        data_from_frame(frame, self.type_size(), self.dpt.id)
    }
}

#[cfg(test)]
mod tests {
    use super::DptXlatorFloat32;
    use crate::dpt::{DptError, DptId, DptValue, DptXlator};

    #[test]
    fn conversion_table() {
        let x = DptXlatorFloat32::new(DptId::new(14, 56)).unwrap();
        assert_eq!(x.unit(), Some("W"));
        const TABLE: &[(f64, u32, &[u8])] = &[
            (0.0, 0x0000_0000, &[0x00, 0x00, 0x00, 0x00]),
            (1.0, 0x3F80_0000, &[0x3F, 0x80, 0x00, 0x00]),
            (-2.5, 0xC020_0000, &[0xC0, 0x20, 0x00, 0x00]),
            (230.0, 0x4366_0000, &[0x43, 0x66, 0x00, 0x00]),
        ];
        for (value, data, frame) in TABLE {
            assert_eq!(x.value_to_data(&DptValue::Float(*value)).unwrap(), *data);
            assert_eq!(x.data_to_value(*data).unwrap(), DptValue::Float(*value));
            assert_eq!(x.data_to_frame(*data).unwrap(), *frame);
            assert_eq!(x.frame_to_data(frame).unwrap(), *data);
        }
    }

    #[test]
    fn rejects_kind_mismatch() {
        let x = DptXlatorFloat32::new(DptId::generic(14)).unwrap();
        assert!(matches!(
            x.check_value(&DptValue::Bool(true)),
            Err(DptError::InvalidValueKind(_))
        ));
    }
}
