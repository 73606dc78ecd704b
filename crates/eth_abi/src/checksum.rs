//! EIP-55 mixed-case address checksums.

use crate::{
    ABIError, HexValue,
    constants::{ADDRESS_BYTE_LENGTH, ADDRESS_HEX_LENGTH},
    keccak::keccak256,
};

/// Returns the 40 address digits of `address`, without sign or prefix.
fn address_digits(address: &str) -> Result<&str, ABIError> {
    if !is_valid_hex_address(address) {
        return Err(ABIError::ValidationError {
            message: format!("Given address '{}' is not a valid Ethereum address", address),
        });
    }

    Ok(&address[address.len() - ADDRESS_HEX_LENGTH..])
}

/// Hex digit `index` of the Keccak-256 hash of the lower-cased address digits.
fn hash_nibbles(digits: &str) -> Vec<u8> {
    keccak256(digits.to_ascii_lowercase().as_bytes())
        .iter()
        .flat_map(|byte| [byte >> 4, byte & 0x0f])
        .collect()
}

/// True iff `address` is hex encoding exactly 20 bytes.
pub fn is_valid_hex_address(address: &str) -> bool {
    match HexValue::parse(address) {
        Ok(hex) => {
            !hex.is_negative()
                && hex.digits().len() == ADDRESS_HEX_LENGTH
                && hex.len() == ADDRESS_BYTE_LENGTH
        }
        Err(_) => false,
    }
}

/// Checks the EIP-55 casing of every alphabetic digit.
///
/// A letter must be upper-case exactly when the matching nibble of the hash exceeds 7.
pub fn is_valid_checksum(address: &str) -> Result<bool, ABIError> {
    let digits = address_digits(address)?;
    let nibbles = hash_nibbles(digits);

    let valid = digits.chars().zip(nibbles).all(|(c, nibble)| {
        if !c.is_ascii_alphabetic() {
            return true;
        }
        c.is_ascii_uppercase() == (nibble > 7)
    });

    Ok(valid)
}

/// Valid hex address that is either single-cased or correctly checksummed.
pub fn is_valid(address: &str) -> bool {
    let Ok(digits) = address_digits(address) else {
        return false;
    };

    if is_all_same_case(digits) {
        return true;
    }

    is_valid_checksum(address).unwrap_or(false)
}

/// Re-cases `address` per EIP-55 and returns it `0x`-prefixed.
pub fn to_checksum(address: &str) -> Result<String, ABIError> {
    let digits = address_digits(address)?;
    Ok(format!("0x{}", checksum_digits(digits)))
}

/// Applies EIP-55 casing to 40 address digits, without prefix.
pub(crate) fn checksum_digits(digits: &str) -> String {
    let digits = digits.to_ascii_lowercase();
    let nibbles = hash_nibbles(&digits);

    digits
        .chars()
        .zip(nibbles)
        .map(|(c, nibble)| {
            if nibble > 7 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

fn is_all_same_case(digits: &str) -> bool {
    digits == digits.to_ascii_lowercase() || digits == digits.to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0x52908400098527886E0F7030069857D2E4169EE7", true)]
    #[case("0x8617E340B3D01FA5F11F306F4090FD50E238070D", true)]
    #[case("0xde709f2102306220921060314715629080e2fb77", true)]
    #[case("0x27b1fdb04752bbc536007a920d24acb045561c26", true)]
    #[case("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed", true)]
    #[case("0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359", true)]
    #[case("0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB", true)]
    #[case("0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb", true)]
    #[case("0XD1220A0CF47C7B9BE7A2E6BA89F429762E7B9ADB", false)]
    #[case("0xd1220a0cf47c7b9be7a2e6ba89f429762e7b9adb", false)]
    fn test_is_valid_checksum(#[case] address: &str, #[case] expected: bool) {
        assert_eq!(is_valid_checksum(address).unwrap(), expected);
    }

    #[rstest]
    #[case("1", false)]
    #[case("0x1", false)]
    #[case("0xc6d9d2cd449a754c494264e1809c50e34d64562b", true)]
    #[case("c6d9d2cd449a754c494264e1809c50e34d64562b", true)]
    #[case("0xE247A45c287191d435A8a5D72A7C8dc030451E9F", true)]
    #[case("0xE247a45c287191d435A8a5D72A7C8dc030451E9F", false)]
    #[case("0xe247a45c287191d435a8a5d72a7c8dc030451e9f", true)]
    #[case("0xE247A45C287191D435A8A5D72A7C8DC030451E9F", true)]
    #[case("0XE247A45C287191D435A8A5D72A7C8DC030451E9F", true)]
    #[case("0xd1220a0cf47c7b9be7a2e6ba89f429762e7b9adb", true)]
    #[case("-0xe247a45c287191d435a8a5d72a7c8dc030451e9f", false)]
    fn test_is_valid(#[case] address: &str, #[case] expected: bool) {
        assert_eq!(is_valid(address), expected);
    }

    #[rstest]
    #[case("0x52908400098527886e0f7030069857d2e4169ee7")]
    #[case("0x8617e340b3d01fa5f11f306f4090fd50e238070d")]
    #[case("0xDE709F2102306220921060314715629080E2FB77")]
    #[case("0x27B1FDB04752BBC536007A920D24ACB045561C26")]
    #[case("0XD1220A0CF47C7B9BE7A2E6BA89F429762E7B9ADB")]
    #[case("0xd1220a0cf47c7b9be7a2e6ba89f429762e7b9adb")]
    fn test_to_checksum_round_trip(#[case] address: &str) {
        let checksummed = to_checksum(address).unwrap();
        assert!(is_valid_checksum(&checksummed).unwrap());
    }

    #[test]
    fn test_to_checksum_known_vector() {
        assert_eq!(
            to_checksum("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap(),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn test_malformed_address() {
        assert!(!is_valid_hex_address("0x1234"));
        assert_eq!(
            is_valid_checksum("0x1234").unwrap_err().to_string(),
            "ABI validation failed: Given address '0x1234' is not a valid Ethereum address"
        );
        assert!(to_checksum("0x1234").is_err());
    }
}
