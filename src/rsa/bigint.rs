// RSA Big Integer Operations
// Wrapper around num-bigint for RSA-specific operations

use std::mem;

use num_bigint::{BigInt, BigUint, RandBigInt, ToBigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use rand::Rng;

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Primes below 1000, used for trial division and as Miller-Rabin bases
static SMALL_PRIMES: Lazy<Vec<u32>> = Lazy::new(|| {
    let limit = 1000usize;
    let mut composite = vec![false; limit];
    let mut primes = Vec::new();
    for i in 2..limit {
        if composite[i] {
            continue;
        }
        primes.push(i as u32);
        let mut j = i * i;
        while j < limit {
            composite[j] = true;
            j += i;
        }
    }
    primes
});

/// Below 1009^2 trial division by every prime under 1000 is a proof
const TRIAL_DIVISION_BOUND: u32 = 1_018_081;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Parse a base-10 string.
///
/// Only ASCII digits are accepted: no sign, no whitespace, no `_`
/// separators, and the string must not be empty.
pub fn parse_decimal(s: &str) -> Option<RsaBigInt> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    RsaBigInt::parse_bytes(s.as_bytes(), 10)
}

/// Format as a base-10 string
pub fn to_decimal(n: &RsaBigInt) -> String {
    n.to_str_radix(10)
}

/// Modular exponentiation: base^exp mod modulus
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    base.modpow(exp, modulus)
}

/// Compute modular inverse: a^(-1) mod m
/// Returns None if inverse doesn't exist
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }

    let modulus = BigInt::from(m.clone());

    // Iterative extended Euclid; only the Bezout coefficient of `a` is tracked
    let mut old_r = BigInt::from(a % m);
    let mut r = modulus.clone();
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        // gcd(a, m) != 1
        return None;
    }

    old_s.mod_floor(&modulus).to_biguint()
}

/// Miller-Rabin primality test
/// Returns true if n is probably prime
///
/// Candidates are first trial-divided by every prime below 1000. Survivors
/// are checked against the first `rounds` primes as Miller-Rabin bases
/// (at most 168). For a random odd candidate the chance of a composite
/// passing is below 4^-rounds.
pub fn is_probable_prime(n: &RsaBigInt, rounds: usize) -> bool {
    if n < &RsaBigInt::from(2u8) {
        return false;
    }

    for &p in SMALL_PRIMES.iter() {
        if *n == RsaBigInt::from(p) {
            return true;
        }
        if (n % p).is_zero() {
            return false;
        }
    }

    if n < &RsaBigInt::from(TRIAL_DIVISION_BOUND) {
        return true;
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for &base in SMALL_PRIMES.iter().take(rounds) {
        let mut x = RsaBigInt::from(base).modpow(&d, n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }

        // Composite
        return false;
    }

    // Probably prime
    true
}

/// Smallest probable prime strictly greater than n
pub fn next_prime(n: &RsaBigInt, rounds: usize) -> RsaBigInt {
    let two = from_u64(2);
    if n < &two {
        return two;
    }

    let mut candidate = n + 1u8;
    if candidate.is_even() {
        if candidate == two {
            return candidate;
        }
        candidate += 1u8;
    }

    while !is_probable_prime(&candidate, rounds) {
        candidate += 2u8;
    }

    candidate
}

/// Largest probable prime strictly less than n.
/// Returns None when n <= 2.
pub fn prev_prime(n: &RsaBigInt, rounds: usize) -> Option<RsaBigInt> {
    let two = from_u64(2);
    if n <= &two {
        return None;
    }

    let mut candidate = n - 1u8;
    if candidate == two {
        return Some(two);
    }
    if candidate.is_even() {
        candidate -= 1u8;
    }

    // candidate stays odd and >= 3 inside the loop
    while candidate > two {
        if is_probable_prime(&candidate, rounds) {
            return Some(candidate);
        }
        candidate -= 2u8;
    }

    Some(two)
}

/// Random integer of exactly `bits` bits (top bit set), `bits >= 1`
pub fn random_bits<R: Rng + ?Sized>(rng: &mut R, bits: u64) -> RsaBigInt {
    let top = RsaBigInt::one() << (bits - 1);
    rng.gen_biguint(bits) | top
}
