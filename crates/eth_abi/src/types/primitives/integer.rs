use num_bigint::{BigInt, BigUint, Sign};

use crate::{
    ABIError, ABIValue, HexValue,
    constants::WORD_SIZE,
    types::{ByteWidth, value_mismatch, word_bytes},
    utils::integer_bounds,
};

/// A signed or unsigned integer checked against its declared width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Integer {
    value: BigInt,
    width: ByteWidth,
    unsigned: bool,
}

impl Integer {
    /// Validates `value` for an integer of `width` bytes.
    ///
    /// Negative values for unsigned types fail with [`ABIError::SignMismatchError`];
    /// values outside the width fail with [`ABIError::OutOfRangeError`].
    pub fn new(value: BigInt, width: ByteWidth, unsigned: bool) -> Result<Self, ABIError> {
        check_range(&value, width, unsigned)?;
        Ok(Self {
            value,
            width,
            unsigned,
        })
    }

    pub fn with_bytes(
        value: impl Into<BigInt>,
        bytes: u8,
        unsigned: bool,
    ) -> Result<Self, ABIError> {
        Self::new(value.into(), ByteWidth::new(bytes)?, unsigned)
    }

    pub fn value(&self) -> &BigInt {
        &self.value
    }

    pub fn width(&self) -> ByteWidth {
        self.width
    }

    pub fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    pub(crate) fn from_value(
        value: &ABIValue,
        width: ByteWidth,
        unsigned: bool,
    ) -> Result<Self, ABIError> {
        Self::new(coerce_integer(value)?, width, unsigned)
    }

    /// The value sign-extended to one word.
    pub fn encode(&self) -> HexValue {
        integer_word(&self.value)
    }

    /// Reads a word as two's complement for signed types and as a magnitude otherwise.
    pub fn decode(encoded: &HexValue, width: ByteWidth, unsigned: bool) -> Result<Self, ABIError> {
        let value = word_to_integer(encoded, unsigned)?;
        Self::new(value, width, unsigned).map_err(|e| ABIError::DecodingError {
            message: format!("Word '{}' is not a valid integer: {}", encoded, e),
        })
    }
}

pub(crate) fn check_range(value: &BigInt, width: ByteWidth, unsigned: bool) -> Result<(), ABIError> {
    if unsigned && value.sign() == Sign::Minus {
        return Err(ABIError::SignMismatchError {
            message: format!("Unsigned type cannot hold negative value {}", value),
        });
    }

    let (min, max) = integer_bounds(width.value(), unsigned);
    if *value < min || *value > max {
        return Err(ABIError::OutOfRangeError {
            message: format!(
                "{} does not fit in {} bytes, expected a value between {} and {}",
                value,
                width.value(),
                min,
                max
            ),
        });
    }

    Ok(())
}

/// Big-endian two's complement of `value` in one word. Non-negative values are
/// zero-extended, negative ones are extended with `0xff`.
pub(crate) fn integer_word(value: &BigInt) -> HexValue {
    let (bytes, fill) = match value.sign() {
        Sign::Minus => (value.to_signed_bytes_be(), 0xff),
        _ => (value.magnitude().to_bytes_be(), 0x00),
    };

    let mut word = vec![fill; WORD_SIZE.saturating_sub(bytes.len())];
    word.extend_from_slice(&bytes);
    HexValue::from_bytes(&word)
}

pub(crate) fn word_to_integer(encoded: &HexValue, unsigned: bool) -> Result<BigInt, ABIError> {
    let word = word_bytes(encoded)?;
    if unsigned {
        Ok(BigInt::from(BigUint::from_bytes_be(&word)))
    } else {
        Ok(BigInt::from_signed_bytes_be(&word))
    }
}

/// Reads an integer from native values, decimal text or `0x` hex text.
pub(crate) fn coerce_integer(value: &ABIValue) -> Result<BigInt, ABIError> {
    match value {
        ABIValue::Int(n) => Ok(n.clone()),
        ABIValue::Bool(b) => Ok(BigInt::from(u8::from(*b))),
        ABIValue::Bytes(hex) => Ok(hex.to_integer()),
        ABIValue::String(text) if HexValue::is_valid(text, true) => {
            Ok(HexValue::parse_strict(text)?.to_integer())
        }
        ABIValue::String(text) => Ok(HexValue::from_integer_str(text, false)?.to_integer()),
        ABIValue::Decimal(d) if d.scale() == 0 => Ok(d.unscaled().clone()),
        _ => Err(value_mismatch("an integer", value)),
    }
}
