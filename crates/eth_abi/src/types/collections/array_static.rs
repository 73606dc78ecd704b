use crate::{
    ABIError, ABIType, ABIValue,
    types::collections::tuple::{decode_abi_types_at, encode_abi_types_at},
};

impl ABIType {
    pub(crate) fn encode_static_array(
        &self,
        value: &ABIValue,
        depth: usize,
    ) -> Result<Vec<u8>, ABIError> {
        let (child_type, size) = match self {
            ABIType::StaticArray(child_type, size) => (child_type.as_ref(), *size),
            _ => {
                return Err(ABIError::StructureError {
                    message: "ABI type mismatch, expected static array".to_string(),
                });
            }
        };

        let values = match value {
            ABIValue::Array(n) => n,
            _ => {
                return Err(ABIError::StructureError {
                    message: format!(
                        "ABI value mismatch, expected an array of values for {}",
                        self
                    ),
                });
            }
        };

        if values.len() != size {
            return Err(ABIError::StructureError {
                message: format!(
                    "Expected {} elements for {}, got {}",
                    size,
                    self,
                    values.len()
                ),
            });
        }

        let child_types = vec![child_type; size];
        encode_abi_types_at(&child_types, values, depth + 1)
    }

    pub(crate) fn decode_static_array(
        &self,
        bytes: &[u8],
        depth: usize,
    ) -> Result<ABIValue, ABIError> {
        let child_types = match self {
            ABIType::StaticArray(child_type, size) => vec![child_type.as_ref(); *size],
            _ => {
                return Err(ABIError::DecodingError {
                    message: "ABI type mismatch, expected static array".to_string(),
                });
            }
        };

        decode_abi_types_at(&child_types, bytes, depth + 1).map(ABIValue::Array)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::{ABIError, ABIType, ABIValue, utils::word_to_usize};

    #[test]
    fn test_wrong_element_count() {
        let abi_type = ABIType::from_str("uint8[3]").unwrap();
        let value = ABIValue::Array(vec![ABIValue::from(1u8), ABIValue::from(2u8)]);

        assert_eq!(
            abi_type.encode(&value).unwrap_err().to_string(),
            "Invalid structure: Expected 3 elements for uint8[3], got 2"
        );
    }

    #[test]
    fn test_dynamic_elements_use_offsets() {
        let abi_type = ABIType::from_str("string[2]").unwrap();
        let value = ABIValue::Array(vec![ABIValue::from("a"), ABIValue::from("bb")]);

        let encoded = abi_type.encode(&value).unwrap();
        assert_eq!(encoded.len(), 2 * 32 + 2 * 64);
        assert_eq!(word_to_usize(&encoded[0..32]), Some(0x40));
        assert_eq!(word_to_usize(&encoded[32..64]), Some(0x80));
        assert_eq!(abi_type.decode(&encoded).unwrap(), value);
    }

    #[test]
    fn test_static_elements_are_inline() {
        let abi_type = ABIType::from_str("(uint8,bool)[2]").unwrap();
        let value = ABIValue::Array(vec![
            ABIValue::Array(vec![ABIValue::from(1u8), ABIValue::Bool(true)]),
            ABIValue::Array(vec![ABIValue::from(2u8), ABIValue::Bool(false)]),
        ]);

        let encoded = abi_type.encode(&value).unwrap();
        assert_eq!(encoded.len(), 4 * 32);
        assert_eq!(abi_type.decode(&encoded).unwrap(), value);
    }

    #[test]
    fn test_decode_short_input() {
        let abi_type = ABIType::from_str("uint8[2]").unwrap();
        assert!(matches!(
            abi_type.decode(&[0u8; 32]),
            Err(ABIError::DecodingError { .. })
        ));
    }
}
