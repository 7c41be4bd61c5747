use crate::dpt::types::{Dpt, DptLimits, DptValue};
use crate::dpt::xlator::{data_from_frame, frame_from_data, DptXlator};
use crate::dpt::{find_dpt, DptError, DptId};

/// DPT main type 8: 16-bit two's-complement signed value.
pub struct DptXlatorSigned16 {
    dpt: &'static Dpt,
}

const LIMITS: DptLimits = DptLimits::Signed {
    min: -32768,
    max: 32767,
};

const DPTS: &[Dpt] = &[
    Dpt {
        id: DptId::generic(8),
        description: "Generic 16-bit signed value",
        limits: LIMITS,
        unit: None,
    },
    Dpt {
        id: DptId::new(8, 1),
        description: "Pulses difference",
        limits: LIMITS,
        unit: Some("pulses"),
    },
    Dpt {
        id: DptId::new(8, 2),
        description: "Time lag",
        limits: LIMITS,
        unit: Some("ms"),
    },
    Dpt {
        id: DptId::new(8, 11),
        description: "Rotation angle",
        limits: LIMITS,
        unit: Some("\u{b0}"),
    },
];

impl DptXlatorSigned16 {
    pub fn new(id: DptId) -> Result<Self, DptError> {
        Ok(Self {
            dpt: find_dpt(DPTS, id)?,
        })
    }
}

impl DptXlator for DptXlatorSigned16 {
    fn dpt(&self) -> &Dpt {
        self.dpt
    }

    fn type_size(&self) -> usize {
        2
    }

    fn check_data(&self, data: u32) -> Result<(), DptError> {
        if data > 0xFFFF {
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
            DptValue::Signed(v) => Ok(u32::from(*v as i16 as u16)),
            _ => Err(DptError::InvalidValueKind(self.dpt.id)),
        }
    }

    fn data_to_value(&self, data: u32) -> Result<DptValue, DptError> {
        self.check_data(data)?;
        Ok(DptValue::Signed(i32::from(data as u16 as i16)))
    }

    fn data_to_frame(&self, data: u32) -> Result<Vec<u8>, DptError> {
        self.check_data(data)?;
        Ok(frame_from_data(data, self.type_size()))
    }

    fn frame_to_data(&self, frame: &[u8]) -> Result<u32, DptError> {
        data_from_frame(frame, self.type_size(), self.dpt.id)
    }
}
