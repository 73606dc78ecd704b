use std::str::FromStr;

use crate::{
    ABIError, ABIValue, HexValue,
    types::{ByteWidth, Decimal, Decimals, value_mismatch},
};

use super::integer::{check_range, integer_word, word_to_integer};

/// A fixed-point number, stored on the wire as its unscaled integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixed {
    value: Decimal,
    width: ByteWidth,
    decimals: Decimals,
    unsigned: bool,
}

impl Fixed {
    /// The value's scale must equal `decimals` exactly; `1.5` is not a `fixed128x2`.
    pub fn new(
        value: Decimal,
        width: ByteWidth,
        decimals: Decimals,
        unsigned: bool,
    ) -> Result<Self, ABIError> {
        if value.scale() != u32::from(decimals.value()) {
            return Err(ABIError::ScaleMismatchError {
                message: format!(
                    "Value {} has {} decimals, expected {}",
                    value,
                    value.scale(),
                    decimals.value()
                ),
            });
        }
        check_range(value.unscaled(), width, unsigned)?;

        Ok(Self {
            value,
            width,
            decimals,
            unsigned,
        })
    }

    pub fn value(&self) -> &Decimal {
        &self.value
    }

    pub fn width(&self) -> ByteWidth {
        self.width
    }

    pub fn decimals(&self) -> Decimals {
        self.decimals
    }

    pub fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    pub(crate) fn from_value(
        value: &ABIValue,
        width: ByteWidth,
        decimals: Decimals,
        unsigned: bool,
    ) -> Result<Self, ABIError> {
        let decimal = match value {
            ABIValue::Decimal(d) => d.clone(),
            ABIValue::String(text) => Decimal::from_str(text)?,
            ABIValue::Int(n) => Decimal::from(n.clone()),
            _ => return Err(value_mismatch("a decimal number", value)),
        };
        Self::new(decimal, width, decimals, unsigned)
    }

    pub fn encode(&self) -> HexValue {
        integer_word(self.value.unscaled())
    }

    pub fn decode(
        encoded: &HexValue,
        width: ByteWidth,
        decimals: Decimals,
        unsigned: bool,
    ) -> Result<Self, ABIError> {
        let unscaled = word_to_integer(encoded, unsigned)?;
        let value = Decimal::new(unscaled, u32::from(decimals.value()));
        Self::new(value, width, decimals, unsigned).map_err(|e| ABIError::DecodingError {
            message: format!("Word '{}' is not a valid fixed-point value: {}", encoded, e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn fixed_type(bytes: u8, decimals: u8) -> (ByteWidth, Decimals) {
        (
            ByteWidth::new(bytes).unwrap(),
            Decimals::new(decimals).unwrap(),
        )
    }

    #[test]
    fn test_encode_unscaled() {
        let (width, decimals) = fixed_type(16, 2);
        let fixed = Fixed::new(Decimal::from_str("1.50").unwrap(), width, decimals, false).unwrap();
        assert_eq!(fixed.encode().digits(), format!("{:0>64}", "96"));

        let decoded = Fixed::decode(&fixed.encode(), width, decimals, false).unwrap();
        assert_eq!(decoded.value().to_string(), "1.50");
    }

    #[test]
    fn test_negative_round_trip() {
        let (width, decimals) = fixed_type(16, 3);
        let fixed =
            Fixed::new(Decimal::from_str("-0.005").unwrap(), width, decimals, false).unwrap();
        assert_eq!(fixed.encode().digits(), format!("{:f>64}", "b"));
        assert_eq!(
            Fixed::decode(&fixed.encode(), width, decimals, false).unwrap(),
            fixed
        );
    }

    #[test]
    fn test_scale_mismatch() {
        let (width, decimals) = fixed_type(16, 18);
        let result = Fixed::new(Decimal::from_str("1.5").unwrap(), width, decimals, false);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Scale mismatch: Value 1.5 has 1 decimals, expected 18"
        );
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        let (width, decimals) = fixed_type(16, 1);
        let result = Fixed::new(Decimal::from_str("-1.0").unwrap(), width, decimals, true);
        assert!(matches!(result, Err(ABIError::SignMismatchError { .. })));
    }

    #[test]
    fn test_range_uses_unscaled_value() {
        let (width, decimals) = fixed_type(1, 1);
        assert!(Fixed::new(Decimal::new(BigInt::from(127), 1), width, decimals, false).is_ok());
        assert!(matches!(
            Fixed::new(Decimal::new(BigInt::from(128), 1), width, decimals, false),
            Err(ABIError::OutOfRangeError { .. })
        ));
    }
}
