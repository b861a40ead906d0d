// RSA Error Types
// Typed failures for every stage of the key / cipher / codec pipeline

use thiserror::Error;

/// Errors produced by the RSA core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RsaError {
    /// No prime of the requested width could be produced
    #[error("prime generation failed for {bit_width}-bit width: {reason}")]
    PrimeGenerationFailure { bit_width: u64, reason: String },

    /// The exponent pair could not be derived from the chosen primes
    #[error("key derivation failed: {0}")]
    KeyDerivationError(String),

    /// A key field was read before it was set
    #[error("key not initialized: {0} is unset")]
    KeyNotInitialized(&'static str),

    /// A key field was given a value that is not a base-10 integer
    #[error("invalid key encoding for {field}: {value:?} is not a base-10 integer")]
    InvalidKeyEncoding { field: &'static str, value: String },

    /// The message integer does not fit below the modulus
    #[error("message too large: {message_bits}-bit message does not fit a {modulus_bits}-bit modulus")]
    MessageTooLarge { message_bits: u64, modulus_bits: u64 },

    /// Ciphertext or packed digits do not have the expected shape
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// A character whose code point does not fit a 3-digit field
    #[error("unsupported character {ch:?} (U+{code:04X}) at position {position}")]
    UnsupportedCharacter { ch: char, code: u32, position: usize },
}

/// Result type for RSA operations
pub type Result<T> = std::result::Result<T, RsaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RsaError::KeyNotInitialized("modulus");
        assert_eq!(err.to_string(), "key not initialized: modulus is unset");

        let err = RsaError::MessageTooLarge {
            message_bits: 2050,
            modulus_bits: 2048,
        };
        assert!(err.to_string().contains("2050-bit"));

        let err = RsaError::UnsupportedCharacter {
            ch: '€',
            code: 0x20AC,
            position: 3,
        };
        assert!(err.to_string().contains("U+20AC"));
    }
}
