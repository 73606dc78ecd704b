//! Immutable arbitrary-length hex values with an explicit sign.
//!
//! A [`HexValue`] keeps its digits lower-case and without prefix or sign. The sign is
//! stored separately and the `is_twos_complement` flag records whether the digits are a
//! signed two's-complement byte string (in which case the sign is implied by the high bit
//! and never rendered). Every transformation returns a new value.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use num_bigint::{BigInt, BigUint, Sign};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    ABIError,
    constants::{LOOSE_HEX_REGEX, STRICT_HEX_REGEX},
};

/// Side on which [`HexValue::pad`] adds digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct HexValue {
    digits: String,
    is_negative: bool,
    is_twos_complement: bool,
}

impl HexValue {
    fn new(digits: String, is_negative: bool, is_twos_complement: bool) -> Self {
        Self {
            digits,
            is_negative,
            is_twos_complement,
        }
    }

    /// Returns a value with the same sign and mode but different digits.
    fn with_digits(&self, digits: String) -> Self {
        Self::new(digits, self.is_negative, self.is_twos_complement)
    }

    /// Checks whether `text` is hex, optionally signed and `0x` prefixed.
    ///
    /// In `strict` mode the `0x` prefix is mandatory.
    pub fn is_valid(text: &str, strict: bool) -> bool {
        if text.is_empty() || text == "-" {
            return false;
        }

        if strict {
            STRICT_HEX_REGEX.is_match(text)
        } else {
            LOOSE_HEX_REGEX.is_match(text)
        }
    }

    /// Parses `[-][0x]<hex digits>`.
    pub fn parse(text: &str) -> Result<Self, ABIError> {
        Self::parse_with(text, false)
    }

    /// Parses `[-]0x<hex digits>`, rejecting text without the `0x` prefix.
    pub fn parse_strict(text: &str) -> Result<Self, ABIError> {
        Self::parse_with(text, true)
    }

    fn parse_with(text: &str, strict: bool) -> Result<Self, ABIError> {
        if text.is_empty() {
            return Err(ABIError::FormatError {
                message: "Hex text cannot be empty".to_string(),
            });
        }

        if !Self::is_valid(text, strict) {
            let expectation = if strict {
                "a 0x-prefixed hex string"
            } else {
                "a valid hex string"
            };
            return Err(ABIError::FormatError {
                message: format!("The given value '{}' is not {}", text, expectation),
            });
        }

        let (is_negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let digits = strip_hex_prefix(unsigned);

        Ok(Self::new(digits.to_ascii_lowercase(), is_negative, false))
    }

    /// Parses hex digits as a two's-complement byte string; the sign comes from the high bit.
    pub fn twos_complement(text: &str) -> Result<Self, ABIError> {
        let parsed = Self::parse(text)?;
        if parsed.is_negative {
            return Err(ABIError::FormatError {
                message: format!(
                    "Two's complement hex '{}' cannot carry an explicit sign",
                    text
                ),
            });
        }

        Ok(Self::from_signed_bytes(&parsed.to_bytes()))
    }

    /// Wraps raw bytes as a non-negative value.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(hex::encode(bytes), false, false)
    }

    /// Wraps big-endian two's-complement bytes.
    pub fn from_signed_bytes(bytes: &[u8]) -> Self {
        let is_negative = bytes.first().is_some_and(|b| b & 0x80 != 0);
        Self::new(hex::encode(bytes), is_negative, true)
    }

    /// Converts an integer to hex.
    ///
    /// Without `twos_complement` the digits are the minimal magnitude and the sign is kept
    /// aside (`-123` becomes `-7b`). With it, the digits are the shortest sign-extended
    /// byte string (`-1` becomes `ff`, `256` becomes `0100`).
    pub fn from_integer(number: &BigInt, twos_complement: bool) -> Self {
        let is_negative = number.sign() == Sign::Minus;
        let digits = if twos_complement {
            hex::encode(number.to_signed_bytes_be())
        } else {
            number.magnitude().to_str_radix(16)
        };

        Self::new(digits, is_negative, twos_complement)
    }

    /// Converts a decimal integer literal to hex; see [`HexValue::from_integer`].
    pub fn from_integer_str(text: &str, twos_complement: bool) -> Result<Self, ABIError> {
        if text.contains('.') {
            return Err(ABIError::FormatError {
                message: format!(
                    "Float number '{}' is not supported, pass large integers as integer text",
                    text
                ),
            });
        }

        let number = BigInt::from_str(text.trim()).map_err(|_| ABIError::FormatError {
            message: format!("'{}' is not a valid integer", text),
        })?;

        Ok(Self::from_integer(&number, twos_complement))
    }

    pub fn from_boolean(value: bool) -> Self {
        Self::new(if value { "1" } else { "0" }.to_string(), false, false)
    }

    /// Hex of the UTF-8 bytes of `text`, byte for byte.
    pub fn from_utf8(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Joins values into one. All values must share the same sign.
    pub fn concat(values: &[HexValue]) -> Result<Self, ABIError> {
        let first = values.first().ok_or_else(|| ABIError::InvalidInputError {
            message: "At least one hex value is required to concat".to_string(),
        })?;

        Self::check_same_sign(first.is_negative, values)?;
        let digits: String = values.iter().map(|v| v.even_digits()).collect();

        Ok(Self::new(digits, first.is_negative, false))
    }

    /// Appends `values` after this value, keeping its sign and mode.
    pub fn append(&self, values: &[HexValue]) -> Result<Self, ABIError> {
        Self::check_same_sign(self.is_negative, values)?;
        let mut digits = self.even_digits();
        digits.extend(values.iter().map(|v| v.even_digits()));

        Ok(self.with_digits(digits))
    }

    /// Prepends `values` before this value, keeping its sign and mode.
    pub fn prepend(&self, values: &[HexValue]) -> Result<Self, ABIError> {
        Self::check_same_sign(self.is_negative, values)?;
        let mut digits: String = values.iter().map(|v| v.even_digits()).collect();
        digits.push_str(&self.even_digits());

        Ok(self.with_digits(digits))
    }

    fn check_same_sign(is_negative: bool, values: &[HexValue]) -> Result<(), ABIError> {
        if values.iter().any(|v| v.is_negative != is_negative) {
            return Err(ABIError::MixedSignError {
                message: "All hex values must have the same sign".to_string(),
            });
        }
        Ok(())
    }

    /// The digits without sign or prefix.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn is_negative(&self) -> bool {
        self.is_negative
    }

    pub fn is_twos_complement(&self) -> bool {
        self.is_twos_complement
    }

    /// Length in bytes. A trailing odd nibble counts as a whole byte.
    pub fn len(&self) -> usize {
        self.digits.len().div_ceil(2)
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_zero(&self) -> bool {
        self.digits.bytes().all(|c| c == b'0')
    }

    /// `[-]0x<digits>`.
    pub fn prefixed(&self) -> String {
        format!("{}0x{}", self.sign(), self.digits)
    }

    fn sign(&self) -> &'static str {
        if self.is_negative && !self.is_twos_complement {
            "-"
        } else {
            ""
        }
    }

    /// Digits left-padded to a whole number of bytes.
    fn even_digits(&self) -> String {
        if self.digits.len() % 2 == 1 {
            format!("0{}", self.digits)
        } else {
            self.digits.clone()
        }
    }

    fn default_pad_char(&self) -> char {
        if self.is_twos_complement && self.is_negative {
            'f'
        } else {
            '0'
        }
    }

    /// Pads to `target_bytes` on `side`.
    ///
    /// Without an explicit `pad_char` negative two's-complement values are sign-extended
    /// with `f`, everything else with `0`. Values already at least `target_bytes` long
    /// are returned unchanged.
    pub fn pad(
        &self,
        target_bytes: usize,
        pad_char: Option<char>,
        side: PadSide,
    ) -> Result<Self, ABIError> {
        let pad_char = match pad_char {
            Some(c) if c.is_ascii_hexdigit() => c.to_ascii_lowercase(),
            Some(c) => {
                return Err(ABIError::FormatError {
                    message: format!("Pad character '{}' is not a hex digit", c),
                });
            }
            None => self.default_pad_char(),
        };

        Ok(self.pad_digits(target_bytes, pad_char, side))
    }

    pub fn pad_left(&self, target_bytes: usize) -> Self {
        self.pad_digits(target_bytes, self.default_pad_char(), PadSide::Left)
    }

    pub fn pad_right(&self, target_bytes: usize) -> Self {
        self.pad_digits(target_bytes, self.default_pad_char(), PadSide::Right)
    }

    fn pad_digits(&self, target_bytes: usize, pad_char: char, side: PadSide) -> Self {
        let target_digits = target_bytes.saturating_mul(2);
        if self.digits.len() >= target_digits {
            return self.clone();
        }

        let padding: String =
            std::iter::repeat_n(pad_char, target_digits - self.digits.len()).collect();
        let digits = match side {
            PadSide::Left => padding + &self.digits,
            PadSide::Right => self.digits.clone() + &padding,
        };

        self.with_digits(digits)
    }

    /// Bytes `start..start + length` (or to the end), clamped to the value.
    pub fn slice(&self, start_byte: usize, length_bytes: Option<usize>) -> Self {
        let digits = self.even_digits();
        let start = start_byte.saturating_mul(2).min(digits.len());
        let end = match length_bytes {
            Some(length) => start.saturating_add(length.saturating_mul(2)).min(digits.len()),
            None => digits.len(),
        };

        self.with_digits(digits[start..end].to_string())
    }

    /// Splits into chunks of `chunk_bytes`; the final chunk may be shorter.
    ///
    /// # Panics
    /// Panics if `chunk_bytes` is zero.
    pub fn split(&self, chunk_bytes: usize) -> Vec<HexValue> {
        assert!(chunk_bytes > 0, "chunk size must be non-zero");

        let digits = self.even_digits();
        digits
            .as_bytes()
            .chunks(chunk_bytes * 2)
            .map(|chunk| self.with_digits(String::from_utf8_lossy(chunk).into_owned()))
            .collect()
    }

    /// Removes `00` bytes from both ends. An all-zero value collapses to a single `00`.
    pub fn strip_zeros(&self) -> Self {
        let digits = self.even_digits();
        let mut bytes: &[u8] = digits.as_bytes();

        while bytes.starts_with(b"00") {
            bytes = &bytes[2..];
        }
        while bytes.ends_with(b"00") {
            bytes = &bytes[..bytes.len() - 2];
        }

        let stripped = if bytes.is_empty() {
            "00".to_string()
        } else {
            String::from_utf8_lossy(bytes).into_owned()
        };

        self.with_digits(stripped)
    }

    /// The raw bytes; an odd leading nibble is zero-extended.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.even_digits()
            .as_bytes()
            .chunks(2)
            .map(|pair| (nibble(pair[0]) << 4) | nibble(pair[1]))
            .collect()
    }

    /// Decodes the integer, as two's complement or as a magnitude with the stored sign.
    pub fn to_integer(&self) -> BigInt {
        if self.is_twos_complement {
            return BigInt::from_signed_bytes_be(&self.to_bytes());
        }

        let magnitude = BigUint::from_bytes_be(&self.to_bytes());
        let sign = if self.is_negative {
            Sign::Minus
        } else {
            Sign::Plus
        };

        BigInt::from_biguint(sign, magnitude)
    }

    pub fn to_boolean(&self) -> bool {
        !self.is_zero()
    }

    pub fn to_utf8(&self) -> Result<String, ABIError> {
        if self.is_negative {
            return Err(ABIError::DecodingError {
                message: "Unable to decode negative hex to string".to_string(),
            });
        }

        String::from_utf8(self.to_bytes()).map_err(|_| ABIError::DecodingError {
            message: format!("Hex '{}' is not valid UTF-8", self.prefixed()),
        })
    }

    /// Converts a signed-magnitude value to its minimal two's-complement form.
    pub fn to_twos_complement(&self) -> Self {
        if self.is_twos_complement {
            return self.clone();
        }

        Self::from_integer(&self.to_integer(), true)
    }
}

fn strip_hex_prefix(text: &str) -> &str {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
}

fn nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

impl Display for HexValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}", self.sign(), self.digits)
    }
}

impl FromStr for HexValue {
    type Err = ABIError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HexValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.prefixed())
    }
}

impl<'de> Deserialize<'de> for HexValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
