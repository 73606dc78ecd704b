use crate::{
    ABIError, ABIValue, HexValue,
    constants::{MAX_NESTING_DEPTH, STATIC_ARRAY_REGEX, WORD_SIZE},
    types::{EthValue, ScalarType},
    utils::{padded_word_len, usize_to_word, word_to_usize},
};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Represents an Ethereum ABI type for encoding and decoding values.
///
/// Parsed from Solidity type signatures such as `uint256`, `bytes32[]`,
/// `(address,string)[2]` or `tuple(uint8,bool)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ABIType {
    /// A non-composite type.
    Scalar(ScalarType),
    /// A tuple of other ABI types.
    Tuple(Vec<ABIType>),
    /// A static-length array of another ABI type.
    StaticArray(Box<ABIType>, usize),
    /// A dynamic-length array of another ABI type.
    DynamicArray(Box<ABIType>),
}

impl From<ScalarType> for ABIType {
    fn from(value: ScalarType) -> Self {
        ABIType::Scalar(value)
    }
}

pub(crate) fn check_depth(depth: usize) -> Result<(), ABIError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(ABIError::StructureError {
            message: format!(
                "Nesting deeper than {} levels is not supported",
                MAX_NESTING_DEPTH
            ),
        });
    }
    Ok(())
}

impl ABIType {
    /// Encodes an [`ABIValue`] according to this ABI type.
    ///
    /// Static types produce their inline words. Dynamic types produce the block that
    /// an enclosing head/tail layout places in its tail, including any length prefix.
    pub fn encode(&self, value: &ABIValue) -> Result<Vec<u8>, ABIError> {
        self.encode_at(value, 0)
    }

    /// Decodes bytes produced by [`ABIType::encode`].
    pub fn decode(&self, bytes: &[u8]) -> Result<ABIValue, ABIError> {
        self.decode_at(bytes, 0)
    }

    pub(crate) fn encode_at(&self, value: &ABIValue, depth: usize) -> Result<Vec<u8>, ABIError> {
        check_depth(depth)?;
        match self {
            ABIType::Scalar(scalar_type) => encode_scalar(scalar_type, value),
            ABIType::Tuple(_) => self.encode_tuple(value, depth),
            ABIType::StaticArray(_, _) => self.encode_static_array(value, depth),
            ABIType::DynamicArray(_) => self.encode_dynamic_array(value, depth),
        }
    }

    pub(crate) fn decode_at(&self, bytes: &[u8], depth: usize) -> Result<ABIValue, ABIError> {
        check_depth(depth)?;
        match self {
            ABIType::Scalar(scalar_type) => decode_scalar(scalar_type, bytes),
            ABIType::Tuple(_) => self.decode_tuple(bytes, depth),
            ABIType::StaticArray(_, _) => self.decode_static_array(bytes, depth),
            ABIType::DynamicArray(_) => self.decode_dynamic_array(bytes, depth),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        match self {
            ABIType::Scalar(scalar_type) => scalar_type.is_dynamic(),
            ABIType::StaticArray(child_type, _) => child_type.is_dynamic(),
            ABIType::Tuple(child_types) => child_types.iter().any(|t| t.is_dynamic()),
            ABIType::DynamicArray(_) => true,
        }
    }

    /// Bytes this type occupies in the head of an enclosing tuple: one offset word when
    /// dynamic, otherwise its full inline size.
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            return WORD_SIZE;
        }

        match self {
            ABIType::StaticArray(child_type, length) => child_type.head_size().saturating_mul(*length),
            ABIType::Tuple(child_types) => child_types
                .iter()
                .fold(0usize, |size, t| size.saturating_add(t.head_size())),
            _ => WORD_SIZE,
        }
    }
}

fn encode_scalar(scalar_type: &ScalarType, value: &ABIValue) -> Result<Vec<u8>, ABIError> {
    let eth_value = EthValue::from_value(scalar_type, value)?;
    let payload = eth_value.encode().to_bytes();

    match eth_value.length() {
        Some(length) => {
            let mut encoded = usize_to_word(length);
            encoded.extend(payload);
            Ok(encoded)
        }
        None => Ok(payload),
    }
}

fn decode_scalar(scalar_type: &ScalarType, bytes: &[u8]) -> Result<ABIValue, ABIError> {
    if !scalar_type.is_dynamic() {
        if bytes.len() != WORD_SIZE {
            return Err(ABIError::DecodingError {
                message: format!(
                    "Expected {} bytes for {}, got {}",
                    WORD_SIZE,
                    scalar_type,
                    bytes.len()
                ),
            });
        }
        let value = EthValue::decode(scalar_type, &HexValue::from_bytes(bytes))?;
        return Ok(value.into());
    }

    if bytes.len() < WORD_SIZE {
        return Err(ABIError::DecodingError {
            message: format!("Byte array is too short to hold the length of {}", scalar_type),
        });
    }

    let (length_word, content) = bytes.split_at(WORD_SIZE);
    let length = word_to_usize(length_word)
        .filter(|length| {
            padded_word_len(*length).is_some_and(|padded| padded <= content.len())
        })
        .ok_or_else(|| ABIError::DecodingError {
            message: format!(
                "Declared {} length exceeds the {} bytes available",
                scalar_type,
                content.len()
            ),
        })?;

    let value = EthValue::decode(scalar_type, &HexValue::from_bytes(&content[..length]))?;
    Ok(value.into())
}

impl Display for ABIType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ABIType::Scalar(scalar_type) => write!(f, "{}", scalar_type),
            ABIType::Tuple(child_types) => {
                let type_strings: Vec<String> = child_types.iter().map(|t| t.to_string()).collect();
                write!(f, "({})", type_strings.join(","))
            }
            ABIType::StaticArray(child_type, length) => {
                write!(f, "{}[{}]", child_type, length)
            }
            ABIType::DynamicArray(child_type) => {
                write!(f, "{}[]", child_type)
            }
        }
    }
}

impl FromStr for ABIType {
    type Err = ABIError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type(s, 0)
    }
}

fn parse_type(s: &str, depth: usize) -> Result<ABIType, ABIError> {
    check_depth(depth)?;

    // Dynamic array
    if let Some(element_type_str) = s.strip_suffix("[]") {
        let element_type = parse_type(element_type_str, depth + 1)?;
        return Ok(ABIType::DynamicArray(Box::new(element_type)));
    }

    // Static array
    if s.ends_with(']') {
        let captures = STATIC_ARRAY_REGEX
            .captures(s)
            .ok_or_else(|| ABIError::UnsupportedTypeError {
                message: format!("Malformed static array type '{}'", s),
            })?;
        let length_str = &captures[2];
        let length = length_str
            .parse::<usize>()
            .map_err(|_| ABIError::UnsupportedTypeError {
                message: format!("Invalid array length: {}", length_str),
            })?;
        if length == 0 {
            return Err(ABIError::UnsupportedTypeError {
                message: format!("Static array '{}' must have at least one element", s),
            });
        }

        let element_type = parse_type(&captures[1], depth + 1)?;
        return Ok(ABIType::StaticArray(Box::new(element_type), length));
    }

    // Tuple, written either `(...)` or `tuple(...)`
    let tuple_body = s.strip_prefix("tuple").unwrap_or(s);
    if tuple_body.len() >= 2 && tuple_body.starts_with('(') && tuple_body.ends_with(')') {
        let child_types = parse_tuple_content(&tuple_body[1..tuple_body.len() - 1])?
            .iter()
            .map(|child| parse_type(child, depth + 1))
            .collect::<Result<Vec<_>, _>>()?;
        if child_types.is_empty() {
            return Err(ABIError::UnsupportedTypeError {
                message: format!("Tuple '{}' must have at least one component", s),
            });
        }

        return Ok(ABIType::Tuple(child_types));
    }

    Ok(ABIType::Scalar(ScalarType::from_str(s)?))
}

/// Splits the inside of a tuple on top-level commas.
pub(crate) fn parse_tuple_content(content: &str) -> Result<Vec<String>, ABIError> {
    if content.is_empty() {
        return Ok(Vec::new());
    }

    let malformed = |reason: &str| ABIError::UnsupportedTypeError {
        message: format!("Malformed tuple '({})': {}", content, reason),
    };

    if content.starts_with(',') || content.ends_with(',') {
        return Err(malformed("leading or trailing comma"));
    }
    if content.contains(",,") {
        return Err(malformed("consecutive commas"));
    }

    let mut tuple_strings: Vec<String> = Vec::new();
    let mut depth: i32 = 0;
    let mut word: String = String::new();

    for ch in content.chars() {
        word.push(ch);
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(malformed("mismatched parentheses"));
                }
            }
            ',' if depth == 0 => {
                word.pop();
                tuple_strings.push(word);
                word = String::new();
            }
            _ => {}
        }
    }
    if !word.is_empty() {
        tuple_strings.push(word);
    }
    if depth != 0 {
        return Err(malformed("mismatched parentheses"));
    }

    Ok(tuple_strings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use rstest::rstest;

    fn word(value: u64) -> String {
        format!("{:064x}", value)
    }

    #[rstest]
    #[case("uint256", ABIValue::from(0x123u32), word(0x123))]
    #[case("int8", ABIValue::from(-1i8), "f".repeat(64))]
    #[case("bool", ABIValue::Bool(true), word(1))]
    #[case(
        "address",
        ABIValue::from("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"),
        "0000000000000000000000005aaeb6053f3e94c9b9a09f33669435e7ef1beaed".to_string()
    )]
    #[case(
        "string",
        ABIValue::from("Hello, world!"),
        format!("{}{}", word(13), "48656c6c6f2c20776f726c642100000000000000000000000000000000000000")
    )]
    #[case("bytes", ABIValue::from(&[0u8; 0][..]), word(0))]
    #[case(
        "uint32[]",
        ABIValue::Array(vec![ABIValue::from(0x456u32), ABIValue::from(0x789u32)]),
        format!("{}{}{}", word(2), word(0x456), word(0x789))
    )]
    #[case("uint8[2]", ABIValue::Array(vec![ABIValue::from(1u8), ABIValue::from(2u8)]), format!("{}{}", word(1), word(2)))]
    #[case("uint8[]", ABIValue::Array(vec![]), word(0))]
    #[case(
        "(uint8,bool)",
        ABIValue::Array(vec![ABIValue::from(7u8), ABIValue::Bool(false)]),
        format!("{}{}", word(7), word(0))
    )]
    fn test_encode_decode(#[case] signature: &str, #[case] value: ABIValue, #[case] expected: String) {
        let abi_type = ABIType::from_str(signature).unwrap();
        let encoded = abi_type.encode(&value).unwrap();
        assert_eq!(hex::encode(&encoded), expected);

        let decoded = abi_type.decode(&encoded).unwrap();
        assert_eq!(abi_type.encode(&decoded).unwrap(), encoded);
    }

    #[rstest]
    #[case("uint256[]")]
    #[case("uint256[3]")]
    #[case("uint256[2][]")]
    #[case("(uint256,bool)")]
    #[case("(uint256,(bool,string)[])[2]")]
    #[case("bytes32")]
    #[case("fixed128x18")]
    fn test_display_round_trip(#[case] signature: &str) {
        assert_eq!(ABIType::from_str(signature).unwrap().to_string(), signature);
    }

    #[test]
    fn test_tuple_keyword() {
        assert_eq!(
            ABIType::from_str("tuple(uint256,bool)").unwrap(),
            ABIType::from_str("(uint256,bool)").unwrap()
        );
    }

    #[test]
    fn test_nested_static_array() {
        let abi_type = ABIType::from_str("uint8[2][3]").unwrap();
        let ABIType::StaticArray(inner, 3) = &abi_type else {
            panic!("expected static array of length 3, got {:?}", abi_type);
        };
        assert_eq!(inner.to_string(), "uint8[2]");
        assert_eq!(abi_type.head_size(), 6 * WORD_SIZE);
    }

    #[rstest]
    #[case("uint256", false)]
    #[case("string", true)]
    #[case("bytes", true)]
    #[case("bytes32", false)]
    #[case("uint256[]", true)]
    #[case("uint256[2]", false)]
    #[case("string[2]", true)]
    #[case("(uint256,bool)", false)]
    #[case("(uint256,bytes)", true)]
    fn test_is_dynamic(#[case] signature: &str, #[case] expected: bool) {
        assert_eq!(ABIType::from_str(signature).unwrap().is_dynamic(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("function")]
    #[case("uint256[")]
    #[case("uint256[01]")]
    #[case("(uint256,)")]
    #[case("(,uint256)")]
    #[case("(uint256,,bool)")]
    #[case("((uint256)")]
    #[case("(uint256))(")]
    #[case("mapping")]
    #[case("()")]
    #[case("tuple()")]
    #[case("uint8[0]")]
    #[case("(uint8,())")]
    #[case("string[0][]")]
    fn test_invalid_types(#[case] signature: &str) {
        assert!(matches!(
            ABIType::from_str(signature),
            Err(ABIError::UnsupportedTypeError { .. })
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let too_deep = format!("uint8{}", "[]".repeat(MAX_NESTING_DEPTH + 1));
        assert!(matches!(
            ABIType::from_str(&too_deep),
            Err(ABIError::StructureError { .. })
        ));

        let deepest = format!("uint8{}", "[]".repeat(MAX_NESTING_DEPTH));
        assert!(ABIType::from_str(&deepest).is_ok());
    }

    #[test]
    fn test_dynamic_length_beyond_buffer() {
        let abi_type = ABIType::from_str("string").unwrap();
        let mut bytes = usize_to_word(64);
        bytes.extend([0u8; 32]);
        assert!(matches!(
            abi_type.decode(&bytes),
            Err(ABIError::DecodingError { .. })
        ));
    }

    #[rstest]
    #[case("string", u64::MAX)]
    #[case("bytes", u64::MAX)]
    #[case("string", u64::MAX - 30)]
    fn test_overflowing_length_word(#[case] signature: &str, #[case] length: u64) {
        let abi_type = ABIType::from_str(signature).unwrap();
        let mut bytes = vec![0u8; 24];
        bytes.extend(length.to_be_bytes());
        bytes.extend([0u8; 32]);

        assert_eq!(
            abi_type.decode(&bytes).unwrap_err(),
            ABIError::DecodingError {
                message: format!("Declared {} length exceeds the 32 bytes available", signature)
            }
        );
    }

    #[test]
    fn test_value_errors_propagate() {
        let abi_type = ABIType::from_str("uint8").unwrap();
        assert!(matches!(
            abi_type.encode(&ABIValue::Int(BigInt::from(256))),
            Err(ABIError::OutOfRangeError { .. })
        ));
    }
}
