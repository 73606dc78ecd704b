use num_bigint::{BigInt, BigUint};

use crate::constants::{BITS_PER_BYTE, WORD_SIZE};

/// Rounds `len` up to the next multiple of the ABI word size, or `None` on overflow.
pub fn padded_word_len(len: usize) -> Option<usize> {
    len.div_ceil(WORD_SIZE).checked_mul(WORD_SIZE)
}

pub fn big_uint_to_bytes(value: &BigUint, len: usize) -> Vec<u8> {
    let bytes = &value.to_bytes_be();
    let mut result = vec![0u8; len.saturating_sub(bytes.len())];
    result.extend_from_slice(bytes);
    result
}

/// Inclusive `[min, max]` bounds of an integer stored in `bytes` bytes.
pub fn integer_bounds(bytes: u8, unsigned: bool) -> (BigInt, BigInt) {
    let bits = u32::from(bytes) * u32::from(BITS_PER_BYTE);
    if unsigned {
        (BigInt::from(0u8), (BigInt::from(1u8) << bits) - 1)
    } else {
        let half = BigInt::from(1u8) << (bits - 1);
        (-half.clone(), half - 1)
    }
}

/// Reads a big-endian word as an offset or length, rejecting values that cannot index memory.
pub fn word_to_usize(word: &[u8]) -> Option<usize> {
    let value = BigUint::from_bytes_be(word);
    usize::try_from(value).ok()
}

pub fn usize_to_word(value: usize) -> Vec<u8> {
    big_uint_to_bytes(&BigUint::from(value), WORD_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0)]
    #[case(1, 32)]
    #[case(32, 32)]
    #[case(33, 64)]
    fn test_padded_word_len(#[case] len: usize, #[case] expected: usize) {
        assert_eq!(padded_word_len(len), Some(expected));
    }

    #[test]
    fn test_padded_word_len_overflow() {
        assert_eq!(padded_word_len(usize::MAX), None);
    }

    #[test]
    fn test_integer_bounds() {
        assert_eq!(
            integer_bounds(1, true),
            (BigInt::from(0), BigInt::from(255))
        );
        assert_eq!(
            integer_bounds(1, false),
            (BigInt::from(-128), BigInt::from(127))
        );
        assert_eq!(
            integer_bounds(2, false),
            (BigInt::from(-32768), BigInt::from(32767))
        );
    }

    #[test]
    fn test_word_offsets() {
        let word = usize_to_word(0xe0);
        assert_eq!(word.len(), 32);
        assert_eq!(word[31], 0xe0);
        assert_eq!(word_to_usize(&word), Some(0xe0));
        assert_eq!(word_to_usize(&[0xff; 32]), None);
    }
}
