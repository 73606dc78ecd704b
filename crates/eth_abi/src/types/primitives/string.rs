use crate::{
    ABIError, ABIValue, HexValue,
    types::{pad_to_words, value_mismatch},
};

pub(crate) fn coerce_string(value: &ABIValue) -> Result<String, ABIError> {
    match value {
        ABIValue::String(text) => Ok(text.clone()),
        ABIValue::Int(n) => Ok(n.to_string()),
        ABIValue::Decimal(d) => Ok(d.to_string()),
        _ => Err(value_mismatch("a string", value)),
    }
}

/// UTF-8 bytes right-padded to whole words.
pub(crate) fn encode_string(text: &str) -> HexValue {
    pad_to_words(&HexValue::from_utf8(text))
}

/// Decodes an exact UTF-8 payload; no padding is trimmed.
pub(crate) fn decode_string(payload: &HexValue) -> Result<String, ABIError> {
    payload.to_utf8()
}
