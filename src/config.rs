//! Key generation configuration
//!
//! Tunables for prime width, primality certainty and retry bounds. Loaded
//! from a TOML file by the binary; library callers usually start from
//! `RsaConfig::default()`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Default prime width (two primes give a 2048-bit modulus)
pub const DEFAULT_PRIME_BITS: u64 = 1024;

/// RSA key generation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaConfig {
    /// Width of each prime in bits
    #[serde(default = "default_prime_bits")]
    pub prime_bits: u64,

    /// Miller-Rabin rounds per candidate
    #[serde(default = "default_primality_rounds")]
    pub primality_rounds: usize,

    /// Redraws allowed when a prime search overflows its bit width
    #[serde(default = "default_max_prime_attempts")]
    pub max_prime_attempts: u32,

    /// Fresh prime pairs tried before key derivation gives up
    #[serde(default = "default_max_key_attempts")]
    pub max_key_attempts: u32,
}

fn default_prime_bits() -> u64 {
    DEFAULT_PRIME_BITS
}

fn default_primality_rounds() -> usize {
    25
}

fn default_max_prime_attempts() -> u32 {
    16
}

fn default_max_key_attempts() -> u32 {
    8
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            prime_bits: default_prime_bits(),
            primality_rounds: default_primality_rounds(),
            max_prime_attempts: default_max_prime_attempts(),
            max_key_attempts: default_max_key_attempts(),
        }
    }
}

impl RsaConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Same settings with a different prime width
    pub fn with_prime_bits(mut self, bits: u64) -> Self {
        self.prime_bits = bits;
        self
    }

    /// Reject settings the generator cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.prime_bits < 2 {
            bail!("prime_bits must be at least 2, got {}", self.prime_bits);
        }
        if self.primality_rounds == 0 {
            bail!("primality_rounds must be at least 1");
        }
        if self.max_prime_attempts == 0 {
            bail!("max_prime_attempts must be at least 1");
        }
        if self.max_key_attempts == 0 {
            bail!("max_key_attempts must be at least 1");
        }
        Ok(())
    }

    /// Modulus width produced by two primes of `prime_bits`
    pub fn modulus_bits(&self) -> u64 {
        self.prime_bits * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RsaConfig::default();
        assert_eq!(config.prime_bits, 1024);
        assert_eq!(config.modulus_bits(), 2048);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = RsaConfig::from_toml("prime_bits = 256\n").unwrap();
        assert_eq!(config.prime_bits, 256);
        assert_eq!(config.primality_rounds, 25);
        assert_eq!(config.max_key_attempts, 8);

        let config = RsaConfig::from_toml("").unwrap();
        assert_eq!(config, RsaConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(RsaConfig::from_toml("prime_bits = 1").is_err());
        assert!(RsaConfig::from_toml("primality_rounds = 0").is_err());
        assert!(RsaConfig::from_toml("max_key_attempts = 0").is_err());
        assert!(RsaConfig::from_toml("prime_bits = \"big\"").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = RsaConfig::load(Path::new("/nonexistent/textbook-rsa.toml"));
        assert!(result.is_err());
    }
}
