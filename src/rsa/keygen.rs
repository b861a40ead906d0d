// RSA Key Generation
// Derives modulus, totient and the exponent pair from two generated primes

use std::fmt;

use tracing::{debug, info, warn};

use super::bigint::{mod_inverse, prev_prime, to_decimal, RsaBigInt};
use super::keystore::KeyStore;
use super::prime::PrimeSource;
use crate::config::RsaConfig;
use crate::error::{Result, RsaError};

/// Derived RSA key material
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    pub modulus: RsaBigInt,          // n = p * q
    pub public_exponent: RsaBigInt,  // e
    pub private_exponent: RsaBigInt, // d = e^(-1) mod φ(n)
}

impl KeyMaterial {
    /// Get the bit length of the modulus
    pub fn modulus_bits(&self) -> u64 {
        self.modulus.bits()
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("modulus", &to_decimal(&self.modulus))
            .field("public_exponent", &to_decimal(&self.public_exponent))
            // Don't log the private key!
            .finish_non_exhaustive()
    }
}

/// φ(n) = (p-1)(q-1)
pub fn totient(p: &RsaBigInt, q: &RsaBigInt) -> Result<RsaBigInt> {
    let one = RsaBigInt::from(1u8);
    if p <= &one || q <= &one {
        return Err(RsaError::KeyDerivationError(
            "totient needs both factors greater than 1".to_string(),
        ));
    }

    Ok((p - 1u8) * (q - 1u8))
}

/// Turn two primes into key material.
///
/// The public exponent is the largest prime below φ(n) rather than a small
/// fixed constant, and the private exponent is its inverse mod φ(n).
pub fn derive_key_material(p: &RsaBigInt, q: &RsaBigInt, rounds: usize) -> Result<KeyMaterial> {
    // Step 1: Compute n = p * q
    let modulus = p * q;

    // Step 2: Compute φ(n) = (p-1)(q-1)
    let phi_n = totient(p, q)?;

    // Step 3: e = largest prime strictly below φ(n)
    let public_exponent = prev_prime(&phi_n, rounds).ok_or_else(|| {
        RsaError::KeyDerivationError(format!("no prime below φ(n) = {}", phi_n))
    })?;

    // 1 < e < φ(n) is required for d to land in the same range
    if public_exponent <= RsaBigInt::from(1u8) {
        return Err(RsaError::KeyDerivationError(
            "public exponent must be greater than 1".to_string(),
        ));
    }

    // Step 4: Compute d = e^(-1) mod φ(n)
    let private_exponent = mod_inverse(&public_exponent, &phi_n).ok_or_else(|| {
        RsaError::KeyDerivationError("public exponent has no inverse mod φ(n)".to_string())
    })?;

    if private_exponent <= RsaBigInt::from(1u8) {
        return Err(RsaError::KeyDerivationError(
            "private exponent must be greater than 1".to_string(),
        ));
    }

    Ok(KeyMaterial {
        modulus,
        public_exponent,
        private_exponent,
    })
}

/// Generates key pairs from a prime source, retrying with fresh primes
/// when a pair cannot produce a usable exponent.
pub struct KeyDeriver<S: PrimeSource> {
    source: S,
    config: RsaConfig,
}

impl<S: PrimeSource> KeyDeriver<S> {
    pub fn new(source: S, config: RsaConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &RsaConfig {
        &self.config
    }

    /// Generate a key pair and install it into `store`.
    ///
    /// Prime generation failures are returned immediately. Derivation
    /// failures draw a fresh pair of primes, up to `max_key_attempts`.
    pub fn generate_keys(&mut self, store: &mut KeyStore) -> Result<KeyMaterial> {
        let bits = self.config.prime_bits;
        let mut last_error = None;

        for attempt in 1..=self.config.max_key_attempts {
            // p == q is astronomically unlikely at real widths and not checked
            let p = self.source.generate_prime(bits)?;
            let q = self.source.generate_prime(bits)?;
            debug!(attempt, prime_bits = bits, "generated prime pair");

            match derive_key_material(&p, &q, self.config.primality_rounds) {
                Ok(keys) => {
                    store.store(&keys);
                    info!(
                        modulus_bits = keys.modulus_bits(),
                        attempt, "generated RSA key pair"
                    );
                    return Ok(keys);
                }
                Err(err) => {
                    warn!(attempt, error = %err, "key derivation failed, retrying with new primes");
                    last_error = Some(err);
                }
            }
        }

        let reason = last_error
            .map(|err| err.to_string())
            .unwrap_or_else(|| "no attempts made".to_string());
        Err(RsaError::KeyDerivationError(format!(
            "gave up after {} attempts: {}",
            self.config.max_key_attempts, reason
        )))
    }
}
