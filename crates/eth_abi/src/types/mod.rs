//! Scalar Ethereum ABI types and their values.
//!
//! Each scalar type validates its value on construction and knows how to turn it into
//! 32-byte-aligned hex and back. Composite types (tuples and arrays) live in
//! [`collections`] and are driven by [`crate::ABIType`].

pub mod collections;
pub mod decimal;
pub mod primitives;

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use crate::{
    ABIError, ABIValue, HexValue,
    constants::{
        BITS_PER_BYTE, DEFAULT_DECIMALS, DEFAULT_FIXED_BYTES, DEFAULT_INTEGER_BYTES,
        MAX_BYTE_WIDTH, MAX_DECIMALS, MIN_BYTE_WIDTH, MIN_DECIMALS, SCALAR_TYPE_REGEX, WORD_SIZE,
    },
    utils::padded_word_len,
};

pub use decimal::Decimal;
pub use primitives::{address::Address, bytes::Bytes, fixed::Fixed, integer::Integer};

/// A validated width in whole bytes (1-32) for integer, fixed and `bytesN` types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteWidth(u8);

impl ByteWidth {
    /// Creates a new [`ByteWidth`], failing with [`ABIError::ValidationError`] outside 1-32.
    pub fn new(bytes: u8) -> Result<Self, ABIError> {
        if !(MIN_BYTE_WIDTH..=MAX_BYTE_WIDTH).contains(&bytes) {
            return Err(ABIError::ValidationError {
                message: format!(
                    "Byte width must be between {} and {}, got {}",
                    MIN_BYTE_WIDTH, MAX_BYTE_WIDTH, bytes
                ),
            });
        }
        Ok(ByteWidth(bytes))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn bits(&self) -> u16 {
        u16::from(self.0) * BITS_PER_BYTE
    }
}

/// A validated number of fractional digits (1-80) for fixed-point types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimals(u8);

impl Decimals {
    pub fn new(decimals: u8) -> Result<Self, ABIError> {
        if !(MIN_DECIMALS..=MAX_DECIMALS).contains(&decimals) {
            return Err(ABIError::ValidationError {
                message: format!(
                    "Decimals must be between {} and {}, got {}",
                    MIN_DECIMALS, MAX_DECIMALS, decimals
                ),
            });
        }
        Ok(Decimals(decimals))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// A non-composite ABI type, as named in a type signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// A 20-byte account address.
    Address,
    /// A boolean.
    Bool,
    /// `bytesN` when a width is given, otherwise dynamic `bytes`.
    Bytes(Option<ByteWidth>),
    /// `intN` or `uintN`.
    Int { width: ByteWidth, unsigned: bool },
    /// `fixedNxD` or `ufixedNxD`.
    Fixed {
        width: ByteWidth,
        decimals: Decimals,
        unsigned: bool,
    },
    /// A UTF-8 string.
    String,
}

impl ScalarType {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ScalarType::Bytes(None) | ScalarType::String)
    }
}

fn unsupported(signature: &str, reason: &str) -> ABIError {
    ABIError::UnsupportedTypeError {
        message: format!("'{}' {}", signature, reason),
    }
}

/// Converts a bit count from a type name into a byte width.
fn width_from_bits(bits: u32, signature: &str) -> Result<ByteWidth, ABIError> {
    let bits_per_byte = u32::from(BITS_PER_BYTE);
    if bits == 0 || bits % bits_per_byte != 0 {
        return Err(unsupported(signature, "must use a multiple of 8 bits"));
    }

    u8::try_from(bits / bits_per_byte)
        .ok()
        .and_then(|bytes| ByteWidth::new(bytes).ok())
        .ok_or_else(|| unsupported(signature, "must use between 8 and 256 bits"))
}

fn parse_number(text: &str, signature: &str) -> Result<u32, ABIError> {
    text.parse::<u32>()
        .map_err(|_| unsupported(signature, "has an invalid size"))
}

impl FromStr for ScalarType {
    type Err = ABIError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = SCALAR_TYPE_REGEX
            .captures(s)
            .ok_or_else(|| unsupported(s, "is not a known ABI type"))?;

        if let Some(simple) = captures.name("simple") {
            return match simple.as_str() {
                "address" => Ok(ScalarType::Address),
                "bool" => Ok(ScalarType::Bool),
                "string" => Ok(ScalarType::String),
                _ => Err(unsupported(s, "has no encoder")),
            };
        }

        let family = captures
            .name("family")
            .map(|m| m.as_str())
            .ok_or_else(|| unsupported(s, "is not a known ABI type"))?;
        let size = captures
            .name("size")
            .map(|m| parse_number(m.as_str(), s))
            .transpose()?;
        let decimals = captures
            .name("decimals")
            .map(|m| parse_number(m.as_str(), s))
            .transpose()?;
        let unsigned = family.starts_with('u');

        match family {
            "bytes" => {
                if decimals.is_some() {
                    return Err(unsupported(s, "cannot carry decimals"));
                }
                let width = size
                    .map(|n| {
                        u8::try_from(n)
                            .ok()
                            .and_then(|n| ByteWidth::new(n).ok())
                            .ok_or_else(|| unsupported(s, "must be between 1 and 32 bytes"))
                    })
                    .transpose()?;
                Ok(ScalarType::Bytes(width))
            }
            "int" | "uint" => {
                // A decimals suffix is tolerated and ignored for integers.
                let width = match size {
                    Some(bits) => width_from_bits(bits, s)?,
                    None => ByteWidth(DEFAULT_INTEGER_BYTES),
                };
                Ok(ScalarType::Int { width, unsigned })
            }
            _ => {
                let width = match size {
                    Some(bits) => width_from_bits(bits, s)?,
                    None => ByteWidth(DEFAULT_FIXED_BYTES),
                };
                let decimals = match decimals {
                    Some(d) => u8::try_from(d)
                        .ok()
                        .and_then(|d| Decimals::new(d).ok())
                        .ok_or_else(|| unsupported(s, "must use between 1 and 80 decimals"))?,
                    None => Decimals(DEFAULT_DECIMALS),
                };
                Ok(ScalarType::Fixed {
                    width,
                    decimals,
                    unsigned,
                })
            }
        }
    }
}

impl Display for ScalarType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let sign = |unsigned: bool| if unsigned { "u" } else { "" };
        match self {
            ScalarType::Address => write!(f, "address"),
            ScalarType::Bool => write!(f, "bool"),
            ScalarType::Bytes(None) => write!(f, "bytes"),
            ScalarType::Bytes(Some(width)) => write!(f, "bytes{}", width.value()),
            ScalarType::Int { width, unsigned } => {
                write!(f, "{}int{}", sign(*unsigned), width.bits())
            }
            ScalarType::Fixed {
                width,
                decimals,
                unsigned,
            } => write!(
                f,
                "{}fixed{}x{}",
                sign(*unsigned),
                width.bits(),
                decimals.value()
            ),
            ScalarType::String => write!(f, "string"),
        }
    }
}

/// A validated scalar value, ready to be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EthValue {
    Address(Address),
    Boolean(bool),
    Bytes(Bytes),
    Integer(Integer),
    Fixed(Fixed),
    Str(String),
}

impl EthValue {
    /// Parses `signature` and builds the matching typed value from `value`.
    pub fn resolve(signature: &str, value: &ABIValue) -> Result<Self, ABIError> {
        let scalar_type = ScalarType::from_str(signature)?;
        Self::from_value(&scalar_type, value)
    }

    /// Builds and validates a value of `scalar_type`.
    pub fn from_value(scalar_type: &ScalarType, value: &ABIValue) -> Result<Self, ABIError> {
        match scalar_type {
            ScalarType::Address => Ok(EthValue::Address(Address::from_value(value)?)),
            ScalarType::Bool => Ok(EthValue::Boolean(primitives::boolean::coerce_bool(value))),
            ScalarType::Bytes(width) => Ok(EthValue::Bytes(Bytes::from_value(value, *width)?)),
            ScalarType::Int { width, unsigned } => Ok(EthValue::Integer(Integer::from_value(
                value, *width, *unsigned,
            )?)),
            ScalarType::Fixed {
                width,
                decimals,
                unsigned,
            } => Ok(EthValue::Fixed(Fixed::from_value(
                value, *width, *decimals, *unsigned,
            )?)),
            ScalarType::String => Ok(EthValue::Str(primitives::string::coerce_string(value)?)),
        }
    }

    pub fn scalar_type(&self) -> ScalarType {
        match self {
            EthValue::Address(_) => ScalarType::Address,
            EthValue::Boolean(_) => ScalarType::Bool,
            EthValue::Bytes(bytes) => ScalarType::Bytes(bytes.width()),
            EthValue::Integer(integer) => ScalarType::Int {
                width: integer.width(),
                unsigned: integer.is_unsigned(),
            },
            EthValue::Fixed(fixed) => ScalarType::Fixed {
                width: fixed.width(),
                decimals: fixed.decimals(),
                unsigned: fixed.is_unsigned(),
            },
            EthValue::Str(_) => ScalarType::String,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.scalar_type().is_dynamic()
    }

    /// Payload length in bytes for dynamic values; `None` for static ones.
    pub fn length(&self) -> Option<usize> {
        match self {
            EthValue::Bytes(bytes) if bytes.width().is_none() => Some(bytes.value().len()),
            EthValue::Str(text) => Some(text.len()),
            _ => None,
        }
    }

    /// Encodes the value into whole 32-byte words.
    ///
    /// Static values produce exactly one word. Dynamic values produce their payload
    /// right-padded to a word boundary, without the length prefix.
    pub fn encode(&self) -> HexValue {
        match self {
            EthValue::Address(address) => address.encode(),
            EthValue::Boolean(value) => primitives::boolean::encode_bool(*value),
            EthValue::Bytes(bytes) => bytes.encode(),
            EthValue::Integer(integer) => integer.encode(),
            EthValue::Fixed(fixed) => fixed.encode(),
            EthValue::Str(text) => primitives::string::encode_string(text),
        }
    }

    /// Decodes a value of `scalar_type`.
    ///
    /// Static types expect exactly one word; dynamic types expect the exact payload,
    /// already cut to its declared length.
    pub fn decode(scalar_type: &ScalarType, encoded: &HexValue) -> Result<Self, ABIError> {
        match scalar_type {
            ScalarType::Address => Ok(EthValue::Address(Address::decode(encoded)?)),
            ScalarType::Bool => Ok(EthValue::Boolean(primitives::boolean::decode_bool(
                encoded,
            )?)),
            ScalarType::Bytes(width) => Ok(EthValue::Bytes(Bytes::decode(encoded, *width)?)),
            ScalarType::Int { width, unsigned } => {
                Ok(EthValue::Integer(Integer::decode(encoded, *width, *unsigned)?))
            }
            ScalarType::Fixed {
                width,
                decimals,
                unsigned,
            } => Ok(EthValue::Fixed(Fixed::decode(
                encoded, *width, *decimals, *unsigned,
            )?)),
            ScalarType::String => Ok(EthValue::Str(primitives::string::decode_string(encoded)?)),
        }
    }
}

impl From<EthValue> for ABIValue {
    fn from(value: EthValue) -> Self {
        match value {
            EthValue::Address(address) => ABIValue::Address(address),
            EthValue::Boolean(value) => ABIValue::Bool(value),
            EthValue::Bytes(bytes) => ABIValue::Bytes(bytes.value().clone()),
            EthValue::Integer(integer) => ABIValue::Int(integer.value().clone()),
            EthValue::Fixed(fixed) => ABIValue::Decimal(fixed.value().clone()),
            EthValue::Str(text) => ABIValue::String(text),
        }
    }
}

/// Returns the bytes of a single encoded word.
pub(crate) fn word_bytes(encoded: &HexValue) -> Result<Vec<u8>, ABIError> {
    let bytes = encoded.to_bytes();
    if encoded.is_negative() || bytes.len() != WORD_SIZE {
        return Err(ABIError::DecodingError {
            message: format!(
                "Expected a single {}-byte word, got '{}'",
                WORD_SIZE, encoded
            ),
        });
    }
    Ok(bytes)
}

/// Right-pads a payload with zeros to the next word boundary. Empty stays empty.
pub(crate) fn pad_to_words(payload: &HexValue) -> HexValue {
    let len = payload.len();
    payload.pad_right(padded_word_len(len).unwrap_or(len))
}

pub(crate) fn value_mismatch(expected: &str, value: &ABIValue) -> ABIError {
    ABIError::ValidationError {
        message: format!("ABI value mismatch, expected {}, got {:?}", expected, value),
    }
}
