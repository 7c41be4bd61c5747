use crate::dpt::types::{Dpt, DptLimits, DptValue};
use crate::dpt::xlator::{data_from_frame, frame_from_data, DptXlator};
use crate::dpt::{find_dpt, DptError, DptId};

/// DPT main type 9: KNX 16-bit float.
///
/// `value = 0.01 * M * 2^E` with M a 12-bit two's-complement mantissa whose
/// sign bit is stored in bit 15 and E a 4-bit exponent in bits 14-11.
pub struct DptXlatorFloat16 {
    dpt: &'static Dpt,
}

const MAX: f64 = 670_760.96;

const DPTS: &[Dpt] = &[
    Dpt {
        id: DptId::generic(9),
        description: "Generic 2-byte float",
        limits: DptLimits::Float {
            min: -671_088.64,
            max: MAX,
        },
        unit: None,
    },
    Dpt {
        id: DptId::new(9, 1),
        description: "Temperature",
        limits: DptLimits::Float {
            min: -273.0,
            max: MAX,
        },
        unit: Some("\u{b0}C"),
    },
    Dpt {
        id: DptId::new(9, 4),
        description: "Illuminance",
        limits: DptLimits::Float { min: 0.0, max: MAX },
        unit: Some("lx"),
    },
    Dpt {
        id: DptId::new(9, 5),
        description: "Wind speed",
        limits: DptLimits::Float { min: 0.0, max: MAX },
        unit: Some("m/s"),
    },
    Dpt {
        id: DptId::new(9, 7),
        description: "Humidity",
        limits: DptLimits::Float { min: 0.0, max: MAX },
        unit: Some("%"),
    },
];

impl DptXlatorFloat16 {
    pub fn new(id: DptId) -> Result<Self, DptError> {
        Ok(Self {
            dpt: find_dpt(DPTS, id)?,
        })
    }
}

impl DptXlator for DptXlatorFloat16 {
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
        let DptValue::Float(v) = value else {
            return Err(DptError::InvalidValueKind(self.dpt.id));
        };
        let mut mantissa = (v * 100.0).round() as i64;
        let mut exponent = 0u32;
        while !(-2048..=2047).contains(&mantissa) {
            mantissa /= 2;
            exponent += 1;
        }
        let packed = (mantissa as u32) & 0x0FFF;
        Ok(((packed & 0x800) << 4) | (exponent << 11) | (packed & 0x7FF))
    }

    fn data_to_value(&self, data: u32) -> Result<DptValue, DptError> {
        self.check_data(data)?;
        let exponent = (data >> 11) & 0x0F;
        let packed = ((data >> 4) & 0x800) | (data & 0x7FF);
        let mantissa = if packed & 0x800 != 0 {
            packed as i64 - 4096
        } else {
            packed as i64
        };
        Ok(DptValue::Float(
            0.01 * mantissa as f64 * f64::from(1u32 << exponent),
        ))
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

#[cfg(test)]
mod tests {
    use super::DptXlatorFloat16;
    use crate::dpt::{DptError, DptId, DptValue, DptXlator};
    use proptest::prelude::*;

    fn xlator() -> DptXlatorFloat16 {
        DptXlatorFloat16::new(DptId::new(9, 1)).unwrap()
    }

    const TABLE: &[(f64, u32, &[u8])] = &[
        (0.0, 0x0000, &[0x00, 0x00]),
        (0.01, 0x0001, &[0x00, 0x01]),
        (-0.01, 0x87FF, &[0x87, 0xFF]),
        (20.0, 0x07D0, &[0x07, 0xD0]),
        (-20.0, 0x8030, &[0x80, 0x30]),
        (20.48, 0x0C00, &[0x0C, 0x00]),
        (670_760.96, 0x7FFF, &[0x7F, 0xFF]),
    ];

    #[test]
    fn conversion_table() {
        let x = xlator();
        for (value, data, frame) in TABLE {
            assert_eq!(
                x.value_to_data(&DptValue::Float(*value)).unwrap(),
                *data,
                "encoding {value}"
            );
            assert_eq!(
                x.data_to_value(*data).unwrap(),
                DptValue::Float(*value),
                "decoding 0x{data:04x}"
            );
            assert_eq!(x.data_to_frame(*data).unwrap(), *frame);
            assert_eq!(x.frame_to_data(frame).unwrap(), *data);
        }
    }

    #[test]
    fn temperature_floor() {
        let x = xlator();
        assert!(x.check_value(&DptValue::Float(-273.0)).is_ok());
        assert!(matches!(
            x.check_value(&DptValue::Float(-273.01)),
            Err(DptError::ValueOutOfRange { .. })
        ));
    }

    proptest! {
        // Every decodable bit pattern encodes back to itself once decoded,
        // as long as it is the canonical (smallest-exponent) encoding.
        #[test]
        fn canonical_data_roundtrip(mantissa in -2048i64..=2047, exponent in 0u32..15) {
            let generic = DptXlatorFloat16::new(DptId::generic(9)).unwrap();
            let packed = (mantissa as u32) & 0x0FFF;
            let data = ((packed & 0x800) << 4) | (exponent << 11) | (packed & 0x7FF);
            // Skip non-canonical encodings: an even mantissa with a non-zero
            // exponent could use a smaller exponent.
            prop_assume!(exponent == 0 || mantissa % 2 != 0);
            let value = generic.data_to_value(data).unwrap();
            prop_assert_eq!(generic.value_to_data(&value).unwrap(), data);
        }
    }
}
