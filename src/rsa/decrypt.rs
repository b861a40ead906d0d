// RSA Decryption Implementation
// Textbook single-block decryption: m = c^d mod n

use super::bigint::{mod_pow, RsaBigInt};
use super::codec;
use super::keystore::KeyStore;
use crate::error::{Result, RsaError};

/// Decrypt a ciphertext integer using the stored private key
pub fn decrypt(ciphertext: &RsaBigInt, keys: &KeyStore) -> Result<RsaBigInt> {
    let n = keys.modulus_value()?;
    let d = keys.private_exponent_value()?;

    // Every ciphertext is a residue mod n
    if ciphertext >= n {
        return Err(RsaError::MalformedCiphertext(format!(
            "{}-bit ciphertext is not below the {}-bit modulus",
            ciphertext.bits(),
            n.bits()
        )));
    }

    // Compute m = c^d mod n
    Ok(mod_pow(ciphertext, d, n))
}

/// Decrypt a ciphertext and unpack it back to a string
pub fn decrypt_to_text(ciphertext: &RsaBigInt, keys: &KeyStore) -> Result<String> {
    let packed = decrypt(ciphertext, keys)?;
    codec::decode_integer(&packed)
}
