// RSA Prime Generation
// Produces probable primes of a fixed bit width from an injected random source

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, warn};

use super::bigint::{is_probable_prime, next_prime, random_bits, RsaBigInt};
use crate::config::RsaConfig;
use crate::error::{Result, RsaError};

/// Anything that can hand out primes of a requested bit width
pub trait PrimeSource {
    fn generate_prime(&mut self, bit_width: u64) -> Result<RsaBigInt>;
}

/// Random generator seeded once from the wall clock
pub fn clock_seeded_rng() -> StdRng {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default();
    StdRng::seed_from_u64(seed)
}

/// Random-start, search-forward prime generator.
///
/// A random integer of exactly `bit_width` bits is drawn and the next
/// probable prime above it is returned. Primes that follow long gaps are
/// favoured, so the output is not uniform over primes of that width.
pub struct PrimeGenerator<R: RngCore> {
    rng: R,
    rounds: usize,
    max_attempts: u32,
}

impl<R: RngCore> PrimeGenerator<R> {
    pub fn new(rng: R, config: &RsaConfig) -> Self {
        Self {
            rng,
            rounds: config.primality_rounds,
            max_attempts: config.max_prime_attempts,
        }
    }

    /// Miller-Rabin rounds applied to every candidate
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

impl<R: RngCore> PrimeSource for PrimeGenerator<R> {
    fn generate_prime(&mut self, bit_width: u64) -> Result<RsaBigInt> {
        if bit_width < 2 {
            return Err(RsaError::PrimeGenerationFailure {
                bit_width,
                reason: "bit width must be at least 2".to_string(),
            });
        }

        for attempt in 1..=self.max_attempts {
            let start = random_bits(&mut self.rng, bit_width);
            let prime = next_prime(&start, self.rounds);

            // The forward search can step past 2^bit_width
            if prime.bits() == bit_width {
                debug!(bit_width, attempt, "generated probable prime");
                return Ok(prime);
            }

            warn!(
                bit_width,
                attempt,
                "prime search overflowed the requested width, redrawing"
            );
        }

        Err(RsaError::PrimeGenerationFailure {
            bit_width,
            reason: format!("no prime found in {} attempts", self.max_attempts),
        })
    }
}

/// Fixed list of primes handed out in order, cycling when exhausted.
/// Ignores the requested bit width.
#[derive(Debug, Clone)]
pub struct FixedPrimes {
    primes: Vec<RsaBigInt>,
    next: usize,
}

impl FixedPrimes {
    pub fn new<I>(primes: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        Self {
            primes: primes.into_iter().map(RsaBigInt::from).collect(),
            next: 0,
        }
    }
}

impl PrimeSource for FixedPrimes {
    fn generate_prime(&mut self, bit_width: u64) -> Result<RsaBigInt> {
        if self.primes.is_empty() {
            return Err(RsaError::PrimeGenerationFailure {
                bit_width,
                reason: "fixed prime list is empty".to_string(),
            });
        }

        let prime = self.primes[self.next % self.primes.len()].clone();
        self.next += 1;
        Ok(prime)
    }
}

/// Check a value with the same test the generator uses
pub fn verify_prime(candidate: &RsaBigInt, rounds: usize) -> bool {
    is_probable_prime(candidate, rounds)
}
