// Prime Generation
// Small-prime sieve, trial division and Miller-Rabin

use std::sync::OnceLock;

use log::debug;

use crate::bigint::BigInt;
use crate::random::{fill_random, random_u64};

/// Trial division uses every prime below this bound
pub const SIEVE_LIMIT: u32 = 20000;

static SMALL_PRIMES: OnceLock<Vec<u32>> = OnceLock::new();

/// Primes below [`SIEVE_LIMIT`], built once on first use
pub fn small_primes() -> &'static [u32] {
    SMALL_PRIMES.get_or_init(|| sieve(SIEVE_LIMIT))
}

fn sieve(limit: u32) -> Vec<u32> {
    let limit = limit as usize;
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
}

/// Miller-Rabin round count for a given modulus size
pub fn rounds_for_modulus(modulus_bits: usize) -> u32 {
    match modulus_bits {
        b if b >= 2048 => 32,
        b if b >= 1536 => 20,
        b if b >= 1024 => 16,
        _ => 12,
    }
}

/// Primality test with the default round count for `n`'s size
pub fn is_prime(n: &BigInt) -> bool {
    is_probable_prime(n, rounds_for_modulus(n.bit_length() * 2))
}

/// Sieve lookup for small `n`, otherwise trial division followed by
/// `rounds` Miller-Rabin rounds
pub fn is_probable_prime(n: &BigInt, rounds: u32) -> bool {
    if n.is_negative() {
        return false;
    }
    let primes = small_primes();
    if *n < BigInt::from(SIEVE_LIMIT) {
        let value = n.limbs()[0];
        return primes.binary_search(&value).is_ok();
    }
    for &p in primes {
        if n.rem_u32(p) == Ok(0) {
            return false;
        }
    }
    miller_rabin(n, rounds)
}

/// Miller-Rabin probabilistic test.
///
/// Witnesses are random 64-bit values reduced into `[2, n - 2]`. Values
/// below 5 are answered directly since that range is empty or degenerate.
pub fn miller_rabin(n: &BigInt, rounds: u32) -> bool {
    if n.is_negative() {
        return false;
    }
    if *n < BigInt::from(5u32) {
        return *n == BigInt::from(2u32) || *n == BigInt::from(3u32);
    }
    if n.is_even() {
        return false;
    }

    let one = BigInt::one();
    let n_minus_one = n - &one;
    let n_minus_three = n - &BigInt::from(3u32);

    // n - 1 = d * 2^s with d odd
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d = &d >> 1;
        s += 1;
    }

    'witness: for _ in 0..rounds {
        let Ok(offset) = BigInt::from(random_u64()).modulo(&n_minus_three) else {
            return false;
        };
        let a = &offset + &BigInt::from(2u32);

        let Ok(mut x) = a.mod_pow(&d, n) else {
            return false;
        };
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = match (&x * &x).modulo(n) {
                Ok(x) => x,
                Err(_) => return false,
            };
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Random odd number of exactly `bits` bits (top and bottom bits forced)
pub fn create_odd_num(bits: usize) -> BigInt {
    let len = bits.div_ceil(8);
    let mut bytes = vec![0u8; len];
    fill_random(&mut bytes);

    let excess = len * 8 - bits;
    bytes[0] &= 0xFF >> excess;
    bytes[0] |= 0x80 >> excess;
    bytes[len - 1] |= 1;
    BigInt::from_bytes_be(&bytes)
}

/// Draw odd candidates until one passes the primality test.
/// `bits` must be at least 2.
pub fn generate_prime(bits: usize, rounds: u32) -> BigInt {
    let mut candidates = 0u64;
    loop {
        candidates += 1;
        let candidate = create_odd_num(bits);
        if is_probable_prime(&candidate, rounds) {
            debug!("found {}-bit prime after {} candidates", bits, candidates);
            return candidate;
        }
    }
}
