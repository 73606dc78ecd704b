use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    ABIError, ABIValue, HexValue, checksum,
    constants::{ADDRESS_BYTE_LENGTH, WORD_SIZE},
    types::{value_mismatch, word_bytes},
};

/// A 20-byte Ethereum account address.
///
/// Rendered lower-case with a `0x` prefix; use [`Address::to_checksum`] for the
/// EIP-55 mixed-case form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_BYTE_LENGTH]);

impl Address {
    pub fn from_bytes(bytes: [u8; ADDRESS_BYTE_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ABIError> {
        let bytes: [u8; ADDRESS_BYTE_LENGTH] =
            bytes.try_into().map_err(|_| ABIError::ValidationError {
                message: format!(
                    "Address must be exactly {} bytes, got {}",
                    ADDRESS_BYTE_LENGTH,
                    bytes.len()
                ),
            })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTE_LENGTH] {
        &self.0
    }

    /// The EIP-55 checksummed form, `0x`-prefixed.
    pub fn to_checksum(&self) -> String {
        format!("0x{}", checksum::checksum_digits(&hex::encode(self.0)))
    }

    pub(crate) fn from_value(value: &ABIValue) -> Result<Self, ABIError> {
        match value {
            ABIValue::Address(address) => Ok(*address),
            ABIValue::String(text) => Self::from_str(text),
            ABIValue::Bytes(hex) if !hex.is_negative() => Self::from_slice(&hex.to_bytes()),
            _ => Err(value_mismatch("an address", value)),
        }
    }

    /// The address left-padded with zeros to one word.
    pub fn encode(&self) -> HexValue {
        HexValue::from_bytes(&self.0).pad_left(WORD_SIZE)
    }

    /// Reads the low 20 bytes of a word; the high 12 bytes must be zero.
    pub fn decode(encoded: &HexValue) -> Result<Self, ABIError> {
        let word = word_bytes(encoded)?;
        let (high, low) = word.split_at(WORD_SIZE - ADDRESS_BYTE_LENGTH);
        if high.iter().any(|b| *b != 0) {
            return Err(ABIError::DecodingError {
                message: format!("Word '{}' does not hold a 20-byte address", encoded),
            });
        }

        Self::from_slice(low)
    }
}

impl FromStr for Address {
    type Err = ABIError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !checksum::is_valid(s) {
            return Err(ABIError::ValidationError {
                message: format!(
                    "Given address '{}' is not a valid Ethereum address or has a bad checksum",
                    s
                ),
            });
        }

        let hex = HexValue::parse(s)?;
        Self::from_slice(&hex.to_bytes())
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Address::from_str(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ADDRESS: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[rstest]
    #[case(ADDRESS)]
    #[case("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed")]
    #[case("5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED")]
    fn test_parse_normalizes_to_lower_case(#[case] input: &str) {
        let address = Address::from_str(input).unwrap();
        assert_eq!(
            address.to_string(),
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
        );
        assert_eq!(address.to_checksum(), ADDRESS);
    }

    #[rstest]
    #[case("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD")]
    #[case("0x1234")]
    #[case("-0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed")]
    #[case("")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(matches!(
            Address::from_str(input),
            Err(ABIError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_encode_decode_word() {
        let address = Address::from_str(ADDRESS).unwrap();
        let encoded = address.encode();
        assert_eq!(
            encoded.digits(),
            "0000000000000000000000005aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
        );
        assert_eq!(Address::decode(&encoded).unwrap(), address);
    }

    #[test]
    fn test_decode_rejects_dirty_high_bytes() {
        let word = HexValue::parse(
            "0x0000000000000000000000015aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
        )
        .unwrap();
        assert!(matches!(
            Address::decode(&word),
            Err(ABIError::DecodingError { .. })
        ));
    }

    #[test]
    fn test_serde_uses_checksum() {
        let address = Address::from_str(ADDRESS).unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", ADDRESS));
        assert_eq!(serde_json::from_str::<Address>(&json).unwrap(), address);
    }
}
