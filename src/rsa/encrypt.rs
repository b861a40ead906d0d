// RSA Encryption Implementation
// Textbook single-block encryption: c = m^e mod n, no padding

use tracing::debug;

use super::bigint::{mod_pow, RsaBigInt};
use super::codec;
use super::keystore::KeyStore;
use crate::error::{Result, RsaError};

/// Encrypt a message integer using the stored public key.
///
/// Messages at or above the modulus are refused: reducing them mod n first
/// would alias distinct plaintexts onto one ciphertext.
pub fn encrypt(message: &RsaBigInt, keys: &KeyStore) -> Result<RsaBigInt> {
    let n = keys.modulus_value()?;
    let e = keys.public_exponent_value()?;

    if message >= n {
        return Err(RsaError::MessageTooLarge {
            message_bits: message.bits(),
            modulus_bits: n.bits(),
        });
    }

    // Compute c = m^e mod n
    Ok(mod_pow(message, e, n))
}

/// Pack a string and encrypt it as one block
pub fn encrypt_text(plaintext: &str, keys: &KeyStore) -> Result<RsaBigInt> {
    let packed = codec::encode(plaintext)?;
    debug!(
        chars = plaintext.chars().count(),
        packed_bits = packed.bits(),
        "packed plaintext"
    );
    encrypt(&packed, keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::bigint::from_u64;

    fn toy_store() -> KeyStore {
        let mut store = KeyStore::new();
        store.set_modulus("3233").unwrap();
        store.set_public_key("17").unwrap();
        store.set_private_key("2753").unwrap();
        store
    }

    #[test]
    fn test_encrypt_known_vector() {
        // 65^17 mod 3233 = 2790
        let ciphertext = encrypt(&from_u64(65), &toy_store()).unwrap();
        assert_eq!(ciphertext, from_u64(2790));
    }

    #[test]
    fn test_encrypt_without_keys() {
        let result = encrypt(&from_u64(65), &KeyStore::new());
        assert_eq!(result, Err(RsaError::KeyNotInitialized("modulus")));

        let mut store = KeyStore::new();
        store.set_modulus("3233").unwrap();
        let result = encrypt(&from_u64(65), &store);
        assert_eq!(result, Err(RsaError::KeyNotInitialized("public exponent")));
    }

    #[test]
    fn test_encrypt_message_too_large() {
        let store = toy_store();
        for m in [3233u64, 3234, 1_000_000] {
            assert!(matches!(
                encrypt(&from_u64(m), &store),
                Err(RsaError::MessageTooLarge { modulus_bits: 12, .. })
            ));
        }
        assert!(encrypt(&from_u64(3232), &store).is_ok());
    }

    #[test]
    fn test_encrypt_text_too_large_for_toy_key() {
        // "999065" is far above 3233
        let result = encrypt_text("A", &toy_store());
        assert!(matches!(result, Err(RsaError::MessageTooLarge { .. })));
    }
}
