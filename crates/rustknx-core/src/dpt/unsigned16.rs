use crate::dpt::types::{Dpt, DptLimits, DptValue};
use crate::dpt::xlator::{data_from_frame, frame_from_data, DptXlator};
use crate::dpt::{find_dpt, DptError, DptId};

/// DPT main type 7: 16-bit unsigned value.
pub struct DptXlatorUnsigned16 {
    dpt: &'static Dpt,
}

const LIMITS: DptLimits = DptLimits::Unsigned { min: 0, max: 65535 };

const DPTS: &[Dpt] = &[
    Dpt {
        id: DptId::generic(7),
        description: "Generic 16-bit unsigned value",
        limits: LIMITS,
        unit: None,
    },
    Dpt {
        id: DptId::new(7, 1),
        description: "Pulses",
        limits: LIMITS,
        unit: Some("pulses"),
    },
    Dpt {
        id: DptId::new(7, 2),
        description: "Time period",
        limits: LIMITS,
        unit: Some("ms"),
    },
    Dpt {
        id: DptId::new(7, 11),
        description: "Length",
        limits: LIMITS,
        unit: Some("mm"),
    },
    Dpt {
        id: DptId::new(7, 12),
        description: "Electrical current",
        limits: LIMITS,
        unit: Some("mA"),
    },
];

impl DptXlatorUnsigned16 {
    pub fn new(id: DptId) -> Result<Self, DptError> {
        Ok(Self {
            dpt: find_dpt(DPTS, id)?,
        })
    }
}

impl DptXlator for DptXlatorUnsigned16 {
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
            DptValue::Unsigned(v) => Ok(*v),
            _ => Err(DptError::InvalidValueKind(self.dpt.id)),
        }
    }

    fn data_to_value(&self, data: u32) -> Result<DptValue, DptError> {
        self.check_data(data)?;
        Ok(DptValue::Unsigned(data))
    }

    fn data_to_frame(&self, data: u32) -> Result<Vec<u8>, DptError> {
        self.check_data(data)?;
        Ok(frame_from_data(data, self.type_size()))
    }

    fn frame_to_data(&self, frame: &[u8]) -> Result<u32, DptError> {
        data_from_frame(frame, self.type_size(), self.dpt.id)
    }
}
