//! Encoding and decoding of parameter lists given as type signatures.

use std::str::FromStr;

use log::debug;

use crate::{
    ABIError, ABIType, ABIValue, HexValue,
    types::collections::tuple::{decode_abi_types, encode_abi_types},
};

fn parse_types<S: AsRef<str>>(types: &[S]) -> Result<Vec<ABIType>, ABIError> {
    if types.is_empty() {
        return Err(ABIError::InvalidInputError {
            message: "At least one type signature is required".to_string(),
        });
    }

    types
        .iter()
        .map(|signature| {
            let signature = signature.as_ref();
            if signature.trim().is_empty() {
                return Err(ABIError::InvalidInputError {
                    message: "Type signatures cannot be blank".to_string(),
                });
            }
            ABIType::from_str(signature)
        })
        .collect()
}

/// Encodes `values` against the type signatures in `types`.
///
/// Both lists must be non-empty and of equal length.
pub fn encode_parameters<S: AsRef<str>>(
    types: &[S],
    values: &[ABIValue],
) -> Result<HexValue, ABIError> {
    if types.len() != values.len() {
        return Err(ABIError::InvalidInputError {
            message: format!(
                "Expected one value per type, got {} types and {} values",
                types.len(),
                values.len()
            ),
        });
    }

    let abi_types = parse_types(types)?;
    let refs: Vec<&ABIType> = abi_types.iter().collect();

    debug!("Encoding {} ABI parameters", refs.len());
    let encoded = encode_abi_types(&refs, values)?;
    debug!("Encoded ABI parameters into {} bytes", encoded.len());

    Ok(HexValue::from_bytes(&encoded))
}

pub fn encode_parameter(signature: &str, value: &ABIValue) -> Result<HexValue, ABIError> {
    encode_parameters(&[signature], std::slice::from_ref(value))
}

/// Decodes `data` produced for the type signatures in `types`.
pub fn decode_parameters<S: AsRef<str>>(
    types: &[S],
    data: &HexValue,
) -> Result<Vec<ABIValue>, ABIError> {
    if data.is_negative() {
        return Err(ABIError::DecodingError {
            message: "Encoded data cannot be negative".to_string(),
        });
    }

    decode_parameters_from_bytes(types, &data.to_bytes())
}

pub fn decode_parameters_from_bytes<S: AsRef<str>>(
    types: &[S],
    bytes: &[u8],
) -> Result<Vec<ABIValue>, ABIError> {
    let abi_types = parse_types(types)?;
    let refs: Vec<&ABIType> = abi_types.iter().collect();

    debug!(
        "Decoding {} ABI parameters from {} bytes",
        refs.len(),
        bytes.len()
    );
    decode_abi_types(&refs, bytes)
}

pub fn decode_parameter(signature: &str, data: &HexValue) -> Result<ABIValue, ABIError> {
    let mut values = decode_parameters(&[signature], data)?;
    values.pop().ok_or_else(|| ABIError::DecodingError {
        message: format!("No value decoded for {}", signature),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn test_empty_types() {
        let types: [&str; 0] = [];
        assert!(matches!(
            encode_parameters(&types, &[]),
            Err(ABIError::InvalidInputError { .. })
        ));
        assert!(matches!(
            decode_parameters(&types, &HexValue::from_bytes(&[])),
            Err(ABIError::InvalidInputError { .. })
        ));
    }

    #[test]
    fn test_count_mismatch() {
        let result = encode_parameters(&["uint256", "bool"], &[ABIValue::from(1u8)]);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid input: Expected one value per type, got 2 types and 1 values"
        );
    }

    #[test]
    fn test_blank_signature() {
        assert!(matches!(
            encode_parameter(" ", &ABIValue::from(1u8)),
            Err(ABIError::InvalidInputError { .. })
        ));
    }

    #[test]
    fn test_single_parameter() {
        let encoded = encode_parameter("int256", &ABIValue::from(-1)).unwrap();
        assert_eq!(encoded.prefixed(), format!("0x{}", "f".repeat(64)));
        assert_eq!(
            decode_parameter("int256", &encoded).unwrap(),
            ABIValue::Int(BigInt::from(-1))
        );
    }

    #[test]
    fn test_accepts_owned_signatures() {
        let types = vec!["bool".to_string(), "string".to_string()];
        let values = vec![ABIValue::Bool(true), ABIValue::from("x")];
        let encoded = encode_parameters(&types, &values).unwrap();
        assert_eq!(decode_parameters(&types, &encoded).unwrap(), values);
    }
}
