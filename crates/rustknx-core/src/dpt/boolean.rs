use crate::dpt::types::{Dpt, DptLimits, DptValue};
use crate::dpt::xlator::{data_from_frame, frame_from_data, DptXlator};
use crate::dpt::{find_dpt, DptError, DptId};

/// DPT main type 1: boolean (1 bit, carried inline in the APCI octet).
pub struct DptXlatorBoolean {
    dpt: &'static Dpt,
}

const DPTS: &[Dpt] = &[
    Dpt {
        id: DptId::generic(1),
        description: "Generic boolean",
        limits: DptLimits::Bool,
        unit: None,
    },
    Dpt {
        id: DptId::new(1, 1),
        description: "Switch",
        limits: DptLimits::Bool,
        unit: None,
    },
    Dpt {
        id: DptId::new(1, 2),
        description: "Boolean",
        limits: DptLimits::Bool,
        unit: None,
    },
    Dpt {
        id: DptId::new(1, 3),
        description: "Enable",
        limits: DptLimits::Bool,
        unit: None,
    },
    Dpt {
        id: DptId::new(1, 5),
        description: "Alarm",
        limits: DptLimits::Bool,
        unit: None,
    },
    Dpt {
        id: DptId::new(1, 8),
        description: "Up/Down",
        limits: DptLimits::Bool,
        unit: None,
    },
    Dpt {
        id: DptId::new(1, 9),
        description: "Open/Close",
        limits: DptLimits::Bool,
        unit: None,
    },
];

impl DptXlatorBoolean {
    pub fn new(id: DptId) -> Result<Self, DptError> {
        Ok(Self {
            dpt: find_dpt(DPTS, id)?,
        })
    }
}

impl DptXlator for DptXlatorBoolean {
    fn dpt(&self) -> &Dpt {
        self.dpt
    }

    fn type_size(&self) -> usize {
        0
    }

    fn check_data(&self, data: u32) -> Result<(), DptError> {
        if data > 1 {
            return Err(DptError::DataOutOfRange {
                id: self.dpt.id,
                data,
            });
        }
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
            DptValue::Bool(b) => Ok(u32::from(*b)),
            _ => Err(DptError::InvalidValueKind(self.dpt.id)),
        }
    }

    fn data_to_value(&self, data: u32) -> Result<DptValue, DptError> {
        self.check_data(data)?;
        Ok(DptValue::Bool(data == 1))
    }

    fn data_to_frame(&self, data: u32) -> Result<Vec<u8>, DptError> {
        self.check_data(data)?;
        Ok(frame_from_data(data, self.type_size()))
    }

    fn frame_to_data(&self, frame: &[u8]) -> Result<u32, DptError> {
        let data = data_from_frame(frame, self.type_size(), self.dpt.id)?;
        self.check_data(data)?;
        Ok(data)
    }
}
