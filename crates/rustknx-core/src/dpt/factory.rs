use crate::dpt::{
    DptError, DptId, DptXlator, DptXlatorBoolean, DptXlatorFloat16, DptXlatorFloat32,
    DptXlatorSigned16, DptXlatorSigned32, DptXlatorSigned8, DptXlatorUnsigned16,
    DptXlatorUnsigned32, DptXlatorUnsigned8,
};

/// Resolves a [`DptId`] to the translator implementing its wire format.
///
/// The main number keys the registry; the resulting translator is bound to
/// the exact sub-DPT's limits, or to the generic profile when the id is a
/// `main.xxx` form.
pub struct DptXlatorFactory;

impl DptXlatorFactory {
    pub fn create(id: DptId) -> Result<Box<dyn DptXlator>, DptError> {
        match id.main() {
            1 => Ok(Box::new(DptXlatorBoolean::new(id)?)),
            5 => Ok(Box::new(DptXlatorUnsigned8::new(id)?)),
            6 => Ok(Box::new(DptXlatorSigned8::new(id)?)),
            7 => Ok(Box::new(DptXlatorUnsigned16::new(id)?)),
            8 => Ok(Box::new(DptXlatorSigned16::new(id)?)),
            9 => Ok(Box::new(DptXlatorFloat16::new(id)?)),
            12 => Ok(Box::new(DptXlatorUnsigned32::new(id)?)),
            13 => Ok(Box::new(DptXlatorSigned32::new(id)?)),
            14 => Ok(Box::new(DptXlatorFloat32::new(id)?)),
            main => Err(DptError::UnknownMainType(main)),
        }
    }

    /// Convenience for callers holding the textual id.
    pub fn create_from_str(id: &str) -> Result<Box<dyn DptXlator>, DptError> {
        Self::create(id.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::DptXlatorFactory;
    use crate::dpt::{DptError, DptId, DptValue, DptXlator};

    #[test]
    fn resolves_every_registered_main() {
        for main in [1, 5, 6, 7, 8, 9, 12, 13, 14] {
            let x = DptXlatorFactory::create(DptId::generic(main)).unwrap();
            assert_eq!(x.dpt().id, DptId::generic(main));
        }
    }

    #[test]
    fn specific_and_generic_share_format() {
        let specific = DptXlatorFactory::create(DptId::new(9, 1)).unwrap();
        let generic = DptXlatorFactory::create(DptId::generic(9)).unwrap();
        assert_eq!(specific.type_size(), generic.type_size());
        // The generic profile is looser than the specific one.
        let below_zero = DptValue::Float(-300.0);
        assert!(specific.check_value(&below_zero).is_err());
        assert!(generic.check_value(&below_zero).is_ok());
    }

    #[test]
    fn unknown_main_type_fails() {
        assert_eq!(
            DptXlatorFactory::create(DptId::new(240, 1)).err(),
            Some(DptError::UnknownMainType(240))
        );
    }

    #[test]
    fn parses_textual_ids() {
        let x = DptXlatorFactory::create_from_str("1.001").unwrap();
        assert_eq!(x.dpt().description, "Switch");
        assert_eq!(
            DptXlatorFactory::create_from_str("one.001").err(),
            Some(DptError::InvalidId("one.001".into()))
        );
    }

    #[test]
    fn value_data_roundtrip_across_formats() {
        let cases: &[(&str, DptValue)] = &[
            ("1.001", DptValue::Bool(true)),
            ("5.010", DptValue::Unsigned(200)),
            ("6.010", DptValue::Signed(-100)),
            ("7.012", DptValue::Unsigned(1500)),
            ("8.011", DptValue::Signed(-180)),
            ("9.001", DptValue::Float(21.5)),
            ("12.001", DptValue::Unsigned(3_000_000)),
            ("13.002", DptValue::Signed(-42_000)),
            ("14.068", DptValue::Float(21.5)),
        ];
        for (id, value) in cases {
            let x = DptXlatorFactory::create_from_str(id).unwrap();
            let data = x.value_to_data(value).unwrap();
            assert_eq!(&x.data_to_value(data).unwrap(), value, "DPT {id}");
            let frame = x.data_to_frame(data).unwrap();
            assert_eq!(x.frame_to_data(&frame).unwrap(), data, "DPT {id}");
        }
    }
}
