use sha3::{Digest, Keccak256};

use crate::{HexValue, constants::HASH_BYTES_LENGTH};

/// Compute the Keccak-256 hash of the input data.
pub fn keccak256(data: &[u8]) -> [u8; HASH_BYTES_LENGTH] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hashes `text` the way web3 tooling does: `0x`-prefixed hex is hashed as the bytes it
/// encodes, anything else as its UTF-8 bytes.
pub fn sha3(text: &str) -> HexValue {
    let hash = match HexValue::parse_strict(text) {
        Ok(hex) if !hex.is_negative() => keccak256(&hex.to_bytes()),
        _ => keccak256(text.as_bytes()),
    };

    HexValue::from_bytes(&hash)
}
