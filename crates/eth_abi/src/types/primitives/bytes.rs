use crate::{
    ABIError, ABIValue, HexValue,
    constants::WORD_SIZE,
    types::{ByteWidth, pad_to_words, value_mismatch, word_bytes},
};

/// A byte string, either sized (`bytesN`) or dynamic (`bytes`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bytes {
    value: HexValue,
    width: Option<ByteWidth>,
}

impl Bytes {
    /// Wraps `value`, which must be non-negative and fit in `width` bytes when sized.
    ///
    /// An odd leading nibble is zero-extended to a whole byte. Sized values are
    /// right-padded with zeros to exactly `width` bytes, the form they decode to.
    pub fn new(value: HexValue, width: Option<ByteWidth>) -> Result<Self, ABIError> {
        if value.is_negative() {
            return Err(ABIError::ValidationError {
                message: format!("Bytes value '{}' cannot be negative", value),
            });
        }
        let value = HexValue::from_bytes(&value.to_bytes());

        let value = match width {
            Some(width) if value.len() > usize::from(width.value()) => {
                return Err(ABIError::ValidationError {
                    message: format!(
                        "Value '{}' is {} bytes long and does not fit in bytes{}",
                        value.prefixed(),
                        value.len(),
                        width.value()
                    ),
                });
            }
            Some(width) => value.pad_right(usize::from(width.value())),
            None => value,
        };

        Ok(Self { value, width })
    }

    pub fn dynamic(value: HexValue) -> Result<Self, ABIError> {
        Self::new(value, None)
    }

    pub fn sized(value: HexValue, bytes: u8) -> Result<Self, ABIError> {
        Self::new(value, Some(ByteWidth::new(bytes)?))
    }

    pub fn value(&self) -> &HexValue {
        &self.value
    }

    pub fn width(&self) -> Option<ByteWidth> {
        self.width
    }

    pub(crate) fn from_value(value: &ABIValue, width: Option<ByteWidth>) -> Result<Self, ABIError> {
        let hex = match value {
            ABIValue::Bytes(hex) => hex.clone(),
            ABIValue::String(text) => HexValue::parse(text)?,
            ABIValue::Address(address) => HexValue::from_bytes(address.as_bytes()),
            _ => return Err(value_mismatch("hex bytes", value)),
        };
        Self::new(hex, width)
    }

    /// Sized values fill one word; dynamic values fill as many as needed.
    pub fn encode(&self) -> HexValue {
        match self.width {
            Some(_) => self.value.pad_right(WORD_SIZE),
            None => pad_to_words(&self.value),
        }
    }

    /// Sized values come from the first `N` bytes of a word; dynamic values are the
    /// payload itself.
    pub fn decode(encoded: &HexValue, width: Option<ByteWidth>) -> Result<Self, ABIError> {
        let value = match width {
            Some(width) => {
                let word = word_bytes(encoded)?;
                HexValue::from_bytes(&word[..usize::from(width.value())])
            }
            None if encoded.is_negative() => {
                return Err(ABIError::DecodingError {
                    message: "Byte payload cannot be negative".to_string(),
                });
            }
            None => HexValue::from_bytes(&encoded.to_bytes()),
        };

        Self::new(value, width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_sized_encode() {
        let bytes = Bytes::sized(HexValue::from_utf8("1234567890"), 10).unwrap();
        assert_eq!(
            bytes.encode().digits(),
            "3132333435363738393000000000000000000000000000000000000000000000"
        );
        assert_eq!(
            Bytes::decode(&bytes.encode(), bytes.width()).unwrap(),
            bytes
        );
    }

    #[rstest]
    #[case("0x01", 1, "01")]
    #[case("0x01", 2, "0100")]
    #[case("0xabc", 3, "0abc00")]
    #[case("0x", 4, "00000000")]
    #[case("0xdeadbeef", 32, "deadbeef00000000000000000000000000000000000000000000000000000000")]
    fn test_sized_round_trip(#[case] input: &str, #[case] bytes: u8, #[case] stored: &str) {
        let value = Bytes::sized(HexValue::parse(input).unwrap(), bytes).unwrap();
        assert_eq!(value.value().digits(), stored);
        assert_eq!(Bytes::decode(&value.encode(), value.width()).unwrap(), value);
    }

    #[test]
    fn test_sized_keeps_trailing_zero_bytes() {
        let bytes = Bytes::sized(HexValue::parse("0x0100").unwrap(), 2).unwrap();
        let decoded = Bytes::decode(&bytes.encode(), bytes.width()).unwrap();
        assert_eq!(decoded.value().digits(), "0100");
    }

    #[test]
    fn test_dynamic_encode_pads_to_words() {
        let bytes = Bytes::dynamic(HexValue::from_bytes(&[0xab; 33])).unwrap();
        assert_eq!(bytes.encode().len(), 64);

        let empty = Bytes::dynamic(HexValue::from_bytes(&[])).unwrap();
        assert!(empty.encode().is_empty());
    }

    #[test]
    fn test_too_long_for_width() {
        let result = Bytes::sized(HexValue::parse("0x010203").unwrap(), 2);
        assert_eq!(
            result.unwrap_err().to_string(),
            "ABI validation failed: Value '0x010203' is 3 bytes long and does not fit in bytes2"
        );
    }

    #[test]
    fn test_odd_nibble_is_zero_extended() {
        let bytes = Bytes::dynamic(HexValue::parse("0xabc").unwrap()).unwrap();
        assert_eq!(bytes.value().digits(), "0abc");
    }

    #[test]
    fn test_negative_rejected() {
        assert!(Bytes::dynamic(HexValue::parse("-0x01").unwrap()).is_err());
    }
}
