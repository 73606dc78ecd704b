//! Conversion between scalar values and plain JSON, for storage columns and
//! request payloads.
//!
//! Addresses, byte strings, integers and fixed-point numbers are stored as strings so
//! that values wider than 64 bits survive a round trip.

use std::str::FromStr;

use serde_json::Value;

use crate::{
    ABIError, ABIValue,
    types::{Decimal, EthValue},
};

fn json_to_abi_value(value: &Value) -> Result<ABIValue, ABIError> {
    match value {
        Value::Bool(b) => Ok(ABIValue::Bool(*b)),
        Value::Number(number) if number.is_i64() || number.is_u64() => {
            Ok(ABIValue::Int(num_bigint::BigInt::from_str(&number.to_string()).map_err(
                |_| ABIError::InvalidInputError {
                    message: format!("'{}' is not an integer", number),
                },
            )?))
        }
        Value::Number(number) => Ok(ABIValue::Decimal(Decimal::from_str(&number.to_string())?)),
        Value::String(text) => Ok(ABIValue::String(text.clone())),
        Value::Array(values) => values
            .iter()
            .map(json_to_abi_value)
            .collect::<Result<Vec<_>, _>>()
            .map(ABIValue::Array),
        Value::Null | Value::Object(_) => Err(ABIError::InvalidInputError {
            message: format!("JSON value {} cannot be used as an ABI value", value),
        }),
    }
}

/// Builds a typed value of `signature` from its JSON form.
pub fn from_canonical(signature: &str, value: &Value) -> Result<EthValue, ABIError> {
    EthValue::resolve(signature, &json_to_abi_value(value)?)
}

/// The JSON form of a typed value.
pub fn to_canonical(value: &EthValue) -> Value {
    match value {
        EthValue::Address(address) => Value::String(address.to_string()),
        EthValue::Boolean(b) => Value::Bool(*b),
        EthValue::Bytes(bytes) => Value::String(bytes.value().prefixed()),
        EthValue::Integer(integer) => Value::String(integer.value().to_string()),
        EthValue::Fixed(fixed) => Value::String(fixed.value().to_string()),
        EthValue::Str(text) => Value::String(text.clone()),
    }
}

/// True iff `value` builds a valid value of `signature`.
pub fn is_valid_canonical(signature: &str, value: &Value) -> bool {
    from_canonical(signature, value).is_ok()
}
