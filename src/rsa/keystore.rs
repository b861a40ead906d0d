// RSA Key Store
// Holds the current modulus and exponent pair behind validated accessors

use std::fmt;

use super::bigint::{parse_decimal, to_decimal, RsaBigInt};
use super::keygen::KeyMaterial;
use crate::error::{Result, RsaError};

const MODULUS: &str = "modulus";
const PUBLIC_EXPONENT: &str = "public exponent";
const PRIVATE_EXPONENT: &str = "private exponent";

/// Current key material of one key pair.
///
/// Fields are exchanged as decimal strings but held as parsed integers, so
/// a value is validated once on the way in and never re-parsed on read.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct KeyStore {
    modulus: Option<RsaBigInt>,
    public_exponent: Option<RsaBigInt>,
    private_exponent: Option<RsaBigInt>,
}

fn parse_field(field: &'static str, value: &str) -> Result<RsaBigInt> {
    parse_decimal(value).ok_or_else(|| RsaError::InvalidKeyEncoding {
        field,
        value: value.to_string(),
    })
}

fn get_field<'a>(field: &'static str, value: &'a Option<RsaBigInt>) -> Result<&'a RsaBigInt> {
    value.as_ref().ok_or(RsaError::KeyNotInitialized(field))
}

impl KeyStore {
    /// Empty store, every field unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the public exponent from a decimal string
    pub fn set_public_key(&mut self, e: &str) -> Result<()> {
        self.public_exponent = Some(parse_field(PUBLIC_EXPONENT, e)?);
        Ok(())
    }

    /// Public exponent as a decimal string
    pub fn public_key(&self) -> Result<String> {
        self.public_exponent_value().map(to_decimal)
    }

    /// Set the private exponent from a decimal string
    pub fn set_private_key(&mut self, d: &str) -> Result<()> {
        self.private_exponent = Some(parse_field(PRIVATE_EXPONENT, d)?);
        Ok(())
    }

    /// Private exponent as a decimal string
    pub fn private_key(&self) -> Result<String> {
        self.private_exponent_value().map(to_decimal)
    }

    /// Set the modulus from a decimal string
    pub fn set_modulus(&mut self, n: &str) -> Result<()> {
        self.modulus = Some(parse_field(MODULUS, n)?);
        Ok(())
    }

    /// Modulus as a decimal string
    pub fn modulus(&self) -> Result<String> {
        self.modulus_value().map(to_decimal)
    }

    pub fn modulus_value(&self) -> Result<&RsaBigInt> {
        get_field(MODULUS, &self.modulus)
    }

    pub fn public_exponent_value(&self) -> Result<&RsaBigInt> {
        get_field(PUBLIC_EXPONENT, &self.public_exponent)
    }

    pub fn private_exponent_value(&self) -> Result<&RsaBigInt> {
        get_field(PRIVATE_EXPONENT, &self.private_exponent)
    }

    /// Replace all three fields at once
    pub fn store(&mut self, keys: &KeyMaterial) {
        self.modulus = Some(keys.modulus.clone());
        self.public_exponent = Some(keys.public_exponent.clone());
        self.private_exponent = Some(keys.private_exponent.clone());
    }

    /// Full key set, or the first missing field
    pub fn key_material(&self) -> Result<KeyMaterial> {
        Ok(KeyMaterial {
            modulus: self.modulus_value()?.clone(),
            public_exponent: self.public_exponent_value()?.clone(),
            private_exponent: self.private_exponent_value()?.clone(),
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.modulus.is_some() && self.public_exponent.is_some() && self.private_exponent.is_some()
    }

    /// Get the bit length of the modulus
    pub fn modulus_bits(&self) -> Result<u64> {
        Ok(self.modulus_value()?.bits())
    }

    /// Encrypt a message integer with the stored public key
    pub fn encrypt(&self, message: &RsaBigInt) -> Result<RsaBigInt> {
        super::encrypt::encrypt(message, self)
    }

    /// Decrypt a ciphertext integer with the stored private key
    pub fn decrypt(&self, ciphertext: &RsaBigInt) -> Result<RsaBigInt> {
        super::decrypt::decrypt(ciphertext, self)
    }
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStore")
            .field("modulus_bits", &self.modulus.as_ref().map(|n| n.bits()))
            .field("public_exponent_set", &self.public_exponent.is_some())
            .field("private_exponent_set", &self.private_exponent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::bigint::from_u64;

    #[test]
    fn test_set_and_get() {
        let mut store = KeyStore::new();
        assert!(!store.is_initialized());

        store.set_modulus("3233").unwrap();
        store.set_public_key("17").unwrap();
        store.set_private_key("2753").unwrap();

        assert!(store.is_initialized());
        assert_eq!(store.modulus().unwrap(), "3233");
        assert_eq!(store.public_key().unwrap(), "17");
        assert_eq!(store.private_key().unwrap(), "2753");
        assert_eq!(store.modulus_bits().unwrap(), 12);
    }

    #[test]
    fn test_canonical_decimal_on_read() {
        let mut store = KeyStore::new();
        store.set_modulus("0003233").unwrap();
        assert_eq!(store.modulus().unwrap(), "3233");
    }

    #[test]
    fn test_invalid_encoding_rejected() {
        let mut store = KeyStore::new();
        for bad in ["", "abc", "-17", "0x11", "17 ", "1.5"] {
            let err = store.set_public_key(bad).unwrap_err();
            assert_eq!(
                err,
                RsaError::InvalidKeyEncoding {
                    field: "public exponent",
                    value: bad.to_string(),
                }
            );
        }
        // A rejected value leaves the field unset
        assert_eq!(store.public_key(), Err(RsaError::KeyNotInitialized("public exponent")));
    }

    #[test]
    fn test_rejected_value_keeps_previous() {
        let mut store = KeyStore::new();
        store.set_modulus("3233").unwrap();
        assert!(store.set_modulus("n/a").is_err());
        assert_eq!(store.modulus().unwrap(), "3233");
    }

    #[test]
    fn test_key_material_roundtrip() {
        let keys = KeyMaterial {
            modulus: from_u64(3233),
            public_exponent: from_u64(17),
            private_exponent: from_u64(2753),
        };
        let mut store = KeyStore::new();
        assert_eq!(store.key_material(), Err(RsaError::KeyNotInitialized("modulus")));

        store.store(&keys);
        assert_eq!(store.key_material().unwrap(), keys);
    }

    #[test]
    fn test_debug_hides_private_exponent() {
        let mut store = KeyStore::new();
        store.set_private_key("987654321").unwrap();
        let rendered = format!("{:?}", store);
        assert!(!rendered.contains("987654321"));
    }
}
