use crate::{
    ABIError, ABIType, ABIValue,
    constants::WORD_SIZE,
    types::collections::tuple::{decode_abi_types_at, encode_abi_types_at},
    utils::{usize_to_word, word_to_usize},
};

impl ABIType {
    pub(crate) fn encode_dynamic_array(
        &self,
        value: &ABIValue,
        depth: usize,
    ) -> Result<Vec<u8>, ABIError> {
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

        let child_type = match self {
            ABIType::DynamicArray(child_type) => child_type,
            _ => {
                return Err(ABIError::StructureError {
                    message: "ABI type mismatch, expected dynamic array".to_string(),
                });
            }
        };

        let child_types = vec![child_type.as_ref(); values.len()];
        let encoded_value = encode_abi_types_at(&child_types, values, depth + 1)?;

        let mut merged_bytes = usize_to_word(values.len());
        merged_bytes.extend(encoded_value);

        Ok(merged_bytes)
    }

    pub(crate) fn decode_dynamic_array(
        &self,
        bytes: &[u8],
        depth: usize,
    ) -> Result<ABIValue, ABIError> {
        if bytes.len() < WORD_SIZE {
            return Err(ABIError::DecodingError {
                message: "Byte array is too short to be decoded as dynamic array".to_string(),
            });
        }

        let child_type = match self {
            ABIType::DynamicArray(child_type) => child_type,
            _ => {
                return Err(ABIError::DecodingError {
                    message: "ABI type mismatch, expected dynamic array".to_string(),
                });
            }
        };

        // The first word holds the element count
        let (count_word, content) = bytes.split_at(WORD_SIZE);
        let element_size = child_type.head_size().max(1);
        let values_count = word_to_usize(count_word)
            .filter(|count| {
                count
                    .checked_mul(element_size)
                    .is_some_and(|size| size <= content.len())
            })
            .ok_or_else(|| ABIError::DecodingError {
                message: format!(
                    "Element count of {} exceeds the {} bytes available",
                    self,
                    content.len()
                ),
            })?;

        let child_types = vec![child_type.as_ref(); values_count];
        decode_abi_types_at(&child_types, content, depth + 1).map(ABIValue::Array)
    }
}
