use regex::Regex;
use std::sync::LazyLock;

/// Size of one ABI slot in bytes.
pub const WORD_SIZE: usize = 32;
pub const HASH_BYTES_LENGTH: usize = 32;
pub const SELECTOR_BYTE_LENGTH: usize = 4;
pub const ADDRESS_BYTE_LENGTH: usize = 20;
pub const ADDRESS_HEX_LENGTH: usize = ADDRESS_BYTE_LENGTH * 2;
pub const SIGNATURE_BYTE_LENGTH: usize = 65;

// Bit manipulation
pub const BITS_PER_BYTE: u16 = 8;

// Type widths, all in whole bytes
pub const MIN_BYTE_WIDTH: u8 = 1;
pub const MAX_BYTE_WIDTH: u8 = 32;
pub const DEFAULT_INTEGER_BYTES: u8 = 32;
pub const DEFAULT_FIXED_BYTES: u8 = 16;

// Fixed point scale
pub const MIN_DECIMALS: u8 = 1;
pub const MAX_DECIMALS: u8 = 80;
pub const DEFAULT_DECIMALS: u8 = 18;

/// Deepest tuple/array nesting accepted by the parser and the codec.
pub const MAX_NESTING_DEPTH: usize = 32;

pub const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

// Regex patterns for type parsing
pub static SCALAR_TYPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<simple>address|bool|function|string)|(?P<family>bytes|u?int|u?fixed)(?P<size>[0-9]+)?(?:x(?P<decimals>[0-9]+))?)$",
    )
    .expect("Invalid scalar type regex")
});

pub static STATIC_ARRAY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+)\[(0|[1-9][0-9]*)]$").expect("Invalid static array regex")
});

pub static STRICT_HEX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?0[xX][0-9a-fA-F]*$").expect("Invalid strict hex regex"));

pub static LOOSE_HEX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:-0[xX]|0[xX]|-)?[0-9a-fA-F]*$").expect("Invalid hex regex")
});
