use crate::dpt::types::{Dpt, DptLimits, DptValue};
use crate::dpt::xlator::{data_from_frame, frame_from_data, DptXlator};
use crate::dpt::{find_dpt, DptError, DptId};

/// DPT main type 12: 32-bit unsigned value.
pub struct DptXlatorUnsigned32 {
    dpt: &'static Dpt,
}

const LIMITS: DptLimits = DptLimits::Unsigned {
    min: 0,
    max: u32::MAX,
};

const DPTS: &[Dpt] = &[
    Dpt {
        id: DptId::generic(12),
        description: "Generic 32-bit unsigned value",
        limits: LIMITS,
        unit: None,
    },
    Dpt {
        id: DptId::new(12, 1),
        description: "Counter pulses",
        limits: LIMITS,
        unit: Some("pulses"),
    },
];

impl DptXlatorUnsigned32 {
    pub fn new(id: DptId) -> Result<Self, DptError> {
        Ok(Self {
            dpt: find_dpt(DPTS, id)?,
        })
    }
}

impl DptXlator for DptXlatorUnsigned32 {
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
        if !self.dpt.limits.contains(value) {
            return Err(DptError::InvalidValueKind(self.dpt.id));
        }
        Ok(())
    }

    fn value_to_data(&self, value: &DptValue) -> Result<u32, DptError> {
        self.check_value(value)?;
        match value {
            DptValue::Unsigned(v) => Ok(*v),
            _ => Err(DptError::InvalidValueKind(self.dpt.id)),
        }
    }

    fn data_to_value(&self, data: u32) -> Result<DptValue, DptError> {
        Ok(DptValue::Unsigned(data))
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
    use super::DptXlatorUnsigned32;
    use crate::dpt::{DptId, DptValue, DptXlator};

    #[test]
    fn conversion_table() {
        let x = DptXlatorUnsigned32::new(DptId::new(12, 1)).unwrap();
        assert_eq!(x.type_size(), 4);
        const TABLE: &[(u32, &[u8])] = &[
            (0, &[0x00, 0x00, 0x00, 0x00]),
            (0x1234_5678, &[0x12, 0x34, 0x56, 0x78]),
            (u32::MAX, &[0xFF, 0xFF, 0xFF, 0xFF]),
        ];
        for (value, frame) in TABLE {
            assert_eq!(x.value_to_data(&DptValue::Unsigned(*value)).unwrap(), *value);
            assert_eq!(x.data_to_value(*value).unwrap(), DptValue::Unsigned(*value));
            assert_eq!(x.data_to_frame(*value).unwrap(), *frame);
            assert_eq!(x.frame_to_data(frame).unwrap(), *value);
        }
    }
}
