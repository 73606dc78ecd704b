//! Recovery of the signer of `personal_sign` messages.

use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey};
use log::debug;

use crate::{
    ABIError, HexValue,
    constants::{
        ADDRESS_BYTE_LENGTH, HASH_BYTES_LENGTH, PERSONAL_MESSAGE_PREFIX, SIGNATURE_BYTE_LENGTH,
        WORD_SIZE,
    },
    keccak::keccak256,
    types::Address,
};

/// Offset added to the recovery id in the `v` byte of Ethereum signatures.
const RECOVERY_ID_OFFSET: u8 = 27;

/// The digest a wallet signs for `personal_sign`.
///
/// `0x`-prefixed hex is taken to already be a 32-byte digest. Anything else is
/// hashed as `keccak256("\x19Ethereum Signed Message:\n" + len(message) + message)`.
pub fn personal_message_digest(message: &str) -> Result<[u8; HASH_BYTES_LENGTH], ABIError> {
    if HexValue::is_valid(message, true) {
        let digest = HexValue::parse_strict(message)?;
        return <[u8; HASH_BYTES_LENGTH]>::try_from(digest.to_bytes().as_slice())
            .ok()
            .filter(|_| !digest.is_negative())
            .ok_or_else(|| ABIError::ValidationError {
                message: format!(
                    "Message digest '{}' must be {} bytes",
                    message, HASH_BYTES_LENGTH
                ),
            });
    }

    Ok(hash_personal_message(message.as_bytes()))
}

pub fn hash_personal_message(message: &[u8]) -> [u8; HASH_BYTES_LENGTH] {
    let mut prefixed = format!("{}{}", PERSONAL_MESSAGE_PREFIX, message.len()).into_bytes();
    prefixed.extend_from_slice(message);
    keccak256(&prefixed)
}

/// Recovers the public key that produced the signature `(r, s)` over `digest`.
pub fn recover_public_key(
    digest: &[u8; HASH_BYTES_LENGTH],
    r: &[u8; WORD_SIZE],
    s: &[u8; WORD_SIZE],
    recovery_id: u8,
) -> Result<VerifyingKey, ABIError> {
    let r: k256::FieldBytes = (*r).into();
    let s: k256::FieldBytes = (*s).into();
    let signature = K256Signature::from_scalars(r, s).map_err(|e| ABIError::ValidationError {
        message: format!("Invalid signature: {}", e),
    })?;

    let recovery_id =
        RecoveryId::try_from(recovery_id).map_err(|_| ABIError::ValidationError {
            message: format!("Invalid recovery id {}", recovery_id),
        })?;

    VerifyingKey::recover_from_prehash(digest, &signature, recovery_id).map_err(|e| {
        ABIError::ValidationError {
            message: format!("Public key recovery failed: {}", e),
        }
    })
}

/// The address of a public key: the last 20 bytes of the Keccak-256 hash of its
/// uncompressed point, without the `0x04` tag.
pub fn public_key_to_address(public_key: &VerifyingKey) -> Result<Address, ABIError> {
    let encoded = public_key.to_encoded_point(false);
    let hash = keccak256(&encoded.as_bytes()[1..]);
    Address::from_slice(&hash[HASH_BYTES_LENGTH - ADDRESS_BYTE_LENGTH..])
}

/// Recovers the address that signed `message` with `personal_sign`.
///
/// `signature` is the 65-byte `r || s || v`, where `v` is 27/28 or 0/1.
pub fn ec_recover(message: &str, signature: &HexValue) -> Result<Address, ABIError> {
    let bytes = signature.to_bytes();
    if signature.is_negative() || bytes.len() != SIGNATURE_BYTE_LENGTH {
        return Err(ABIError::ValidationError {
            message: format!(
                "Signature must be {} bytes, got {}",
                SIGNATURE_BYTE_LENGTH,
                bytes.len()
            ),
        });
    }

    let mut r = [0u8; WORD_SIZE];
    let mut s = [0u8; WORD_SIZE];
    r.copy_from_slice(&bytes[..WORD_SIZE]);
    s.copy_from_slice(&bytes[WORD_SIZE..2 * WORD_SIZE]);

    let v = bytes[2 * WORD_SIZE];
    let recovery_id = match v {
        0 | 1 => v,
        27 | 28 => v - RECOVERY_ID_OFFSET,
        _ => {
            return Err(ABIError::ValidationError {
                message: format!("Invalid signature v value {}", v),
            });
        }
    };

    let digest = personal_message_digest(message)?;
    let public_key = recover_public_key(&digest, &r, &s, recovery_id)?;
    let address = public_key_to_address(&public_key)?;

    debug!("Recovered signer {}", address);
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;

    const PRIVATE_KEY: [u8; 32] = [0x11; 32];

    fn sign(message: &str, v_offset: u8) -> (HexValue, Address) {
        let signing_key = SigningKey::from_slice(&PRIVATE_KEY).unwrap();
        let digest = personal_message_digest(message).unwrap();
        let (signature, recovery_id) = signing_key.sign_prehash_recoverable(&digest).unwrap();

        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte() + v_offset);

        let address = public_key_to_address(signing_key.verifying_key()).unwrap();
        (HexValue::from_bytes(&bytes), address)
    }

    #[test]
    fn test_recover_signer() {
        let (signature, address) = sign("Some data", RECOVERY_ID_OFFSET);
        assert_eq!(ec_recover("Some data", &signature).unwrap(), address);
    }

    #[test]
    fn test_recover_accepts_raw_recovery_id() {
        let (signature, address) = sign("hello", 0);
        assert_eq!(ec_recover("hello", &signature).unwrap(), address);
    }

    #[test]
    fn test_recover_from_digest() {
        let digest = hash_personal_message(b"Some data");
        let digest_hex = HexValue::from_bytes(&digest).prefixed();
        let (signature, address) = sign("Some data", RECOVERY_ID_OFFSET);
        assert_eq!(ec_recover(&digest_hex, &signature).unwrap(), address);
    }

    #[test]
    fn test_other_message_recovers_other_address() {
        let (signature, address) = sign("Some data", RECOVERY_ID_OFFSET);
        let recovered = ec_recover("Other data", &signature);
        assert!(recovered.map_or(true, |other| other != address));
    }

    #[test]
    fn test_invalid_signature_length() {
        let result = ec_recover("hello", &HexValue::from_bytes(&[0u8; 64]));
        assert_eq!(
            result.unwrap_err().to_string(),
            "ABI validation failed: Signature must be 65 bytes, got 64"
        );
    }

    #[test]
    fn test_invalid_v() {
        let (signature, _) = sign("hello", RECOVERY_ID_OFFSET);
        let mut bytes = signature.to_bytes();
        bytes[64] = 35;
        assert!(ec_recover("hello", &HexValue::from_bytes(&bytes)).is_err());
    }

    #[test]
    fn test_digest_must_be_32_bytes() {
        assert!(matches!(
            personal_message_digest("0x1234"),
            Err(ABIError::ValidationError { .. })
        ));
    }
}
