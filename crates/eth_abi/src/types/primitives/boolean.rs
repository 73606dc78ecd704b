use crate::{ABIError, ABIValue, HexValue, constants::WORD_SIZE, types::word_bytes};

/// Reads any value as a boolean.
///
/// Zero numbers, empty or `"0"` strings, all-zero hex and empty arrays are false;
/// everything else is true.
pub(crate) fn coerce_bool(value: &ABIValue) -> bool {
    match value {
        ABIValue::Bool(b) => *b,
        ABIValue::Int(n) => n.sign() != num_bigint::Sign::NoSign,
        ABIValue::Decimal(d) => !d.is_zero(),
        ABIValue::String(s) => !(s.is_empty() || s == "0"),
        ABIValue::Bytes(hex) => hex.to_boolean(),
        ABIValue::Address(_) => true,
        ABIValue::Array(values) => !values.is_empty(),
    }
}

pub(crate) fn encode_bool(value: bool) -> HexValue {
    HexValue::from_boolean(value).pad_left(WORD_SIZE)
}

/// Any non-zero word decodes as true.
pub(crate) fn decode_bool(encoded: &HexValue) -> Result<bool, ABIError> {
    let word = word_bytes(encoded)?;
    Ok(word.iter().any(|b| *b != 0))
}
