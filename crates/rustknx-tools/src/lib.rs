use rustknx_core::dpt::{DptLimits, DptValue, DptXlator};
use rustknx_core::IndividualAddress;
use rustknx_stack::{GroupListener, StackError};

/// Parses a textual value into the kind `xlator` expects.
///
/// Booleans accept `on`/`off`, `true`/`false`, and `1`/`0`; numeric kinds
/// parse as decimal.
pub fn parse_value(xlator: &dyn DptXlator, text: &str) -> Result<DptValue, String> {
    match xlator.dpt().limits {
        DptLimits::Bool => match text {
            "on" | "true" | "1" => Ok(DptValue::Bool(true)),
            "off" | "false" | "0" => Ok(DptValue::Bool(false)),
            other => Err(format!("expected a boolean, got `{other}`")),
        },
        DptLimits::Unsigned { .. } => text
            .parse::<u32>()
            .map(DptValue::Unsigned)
            .map_err(|e| format!("expected an unsigned integer: {e}")),
        DptLimits::Signed { .. } => text
            .parse::<i32>()
            .map(DptValue::Signed)
            .map_err(|e| format!("expected an integer: {e}")),
        DptLimits::Float { .. } => text
            .parse::<f64>()
            .map(DptValue::Float)
            .map_err(|e| format!("expected a number: {e}")),
    }
}

/// Group listener that ignores every indication. Used by tools that only
/// need a group for sending.
pub struct SilentListener;

impl GroupListener for SilentListener {
    fn on_write(&self, _source: IndividualAddress, _data: &[u8]) -> Result<(), StackError> {
        Ok(())
    }
    fn on_read(&self, _source: IndividualAddress) -> Result<(), StackError> {
        Ok(())
    }
    fn on_response(&self, _source: IndividualAddress, _data: &[u8]) -> Result<(), StackError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::parse_value;
    use rustknx_core::dpt::{DptValue, DptXlatorFactory};

    #[test]
    fn parses_per_value_kind() {
        let boolean = DptXlatorFactory::create_from_str("1.001").unwrap();
        assert_eq!(parse_value(&*boolean, "on").unwrap(), DptValue::Bool(true));
        assert_eq!(parse_value(&*boolean, "0").unwrap(), DptValue::Bool(false));
        assert!(parse_value(&*boolean, "21.5").is_err());

        let float = DptXlatorFactory::create_from_str("9.001").unwrap();
        assert_eq!(
            parse_value(&*float, "21.5").unwrap(),
            DptValue::Float(21.5)
        );

        let signed = DptXlatorFactory::create_from_str("13.001").unwrap();
        assert_eq!(
            parse_value(&*signed, "-42").unwrap(),
            DptValue::Signed(-42)
        );

        let unsigned = DptXlatorFactory::create_from_str("5.010").unwrap();
        assert!(parse_value(&*unsigned, "-1").is_err());
    }
}
