use crate::dpt::types::{Dpt, DptLimits, DptValue};
use crate::dpt::xlator::{data_from_frame, frame_from_data, DptXlator};
use crate::dpt::{find_dpt, DptError, DptId};

/// DPT main type 13: 32-bit two's-complement signed value.
pub struct DptXlatorSigned32 {
    dpt: &'static Dpt,
}

const LIMITS: DptLimits = DptLimits::Signed {
    min: i32::MIN,
    max: i32::MAX,
};

const DPTS: &[Dpt] = &[
    Dpt {
        id: DptId::generic(13),
        description: "Generic 32-bit signed value",
        limits: LIMITS,
        unit: None,
    },
    Dpt {
        id: DptId::new(13, 1),
        description: "Counter pulses",
        limits: LIMITS,
        unit: Some("pulses"),
    },
    Dpt {
        id: DptId::new(13, 2),
        description: "Flow rate",
        limits: LIMITS,
        unit: Some("l/h"),
    },
];

impl DptXlatorSigned32 {
    pub fn new(id: DptId) -> Result<Self, DptError> {
        Ok(Self {
            dpt: find_dpt(DPTS, id)?,
        })
    }
}

impl DptXlator for DptXlatorSigned32 {
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
            DptValue::Signed(v) => Ok(*v as u32),
            _ => Err(DptError::InvalidValueKind(self.dpt.id)),
        }
    }

    fn data_to_value(&self, data: u32) -> Result<DptValue, DptError> {
        Ok(DptValue::Signed(data as i32))
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
    use super::DptXlatorSigned32;
    use crate::dpt::{DptId, DptValue, DptXlator};

    #[test]
    fn conversion_table() {
        let x = DptXlatorSigned32::new(DptId::new(13, 1)).unwrap();
        const TABLE: &[(i32, u32, &[u8])] = &[
            (i32::MIN, 0x8000_0000, &[0x80, 0x00, 0x00, 0x00]),
            (-1, 0xFFFF_FFFF, &[0xFF, 0xFF, 0xFF, 0xFF]),
            (0, 0x0000_0000, &[0x00, 0x00, 0x00, 0x00]),
            (i32::MAX, 0x7FFF_FFFF, &[0x7F, 0xFF, 0xFF, 0xFF]),
        ];
        for (value, data, frame) in TABLE {
            assert_eq!(x.value_to_data(&DptValue::Signed(*value)).unwrap(), *data);
            assert_eq!(x.data_to_value(*data).unwrap(), DptValue::Signed(*value));
            assert_eq!(x.data_to_frame(*data).unwrap(), *frame);
            assert_eq!(x.frame_to_data(frame).unwrap(), *data);
        }
    }
}
