// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use log::{debug, warn};

use super::prime::{generate_prime, rounds_for_modulus};
use crate::bigint::BigInt;
use crate::error::{CryptoError, CryptoResult};

/// Fixed public exponent
pub const PUBLIC_EXPONENT: u32 = 65537;

/// Requested modulus sizes below this are clamped up
pub const MIN_MODULUS_BITS: usize = 1024;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: BigInt, // Modulus
    pub e: BigInt, // Public exponent
}

/// RSA Private Key
///
/// The CRT values are derived from `p`, `q` and `d` on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: BigInt, // Modulus (same as public)
    pub e: BigInt, // Public exponent
    pub d: BigInt, // Private exponent
    pub p: BigInt, // First prime factor
    pub q: BigInt, // Second prime factor
}

/// RSA Key Pair (both public and private keys)
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
}

/// Settings for key generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGenConfig {
    /// Bit length of each prime; the modulus is about twice this
    pub prime_bits: usize,
    /// Overrides the round count derived from the modulus size
    pub miller_rabin_rounds: Option<u32>,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            prime_bits: 1024,
            miller_rabin_rounds: None,
        }
    }
}

impl KeyGenConfig {
    pub fn with_prime_bits(mut self, prime_bits: usize) -> Self {
        self.prime_bits = prime_bits;
        self
    }

    pub fn with_miller_rabin_rounds(mut self, rounds: u32) -> Self {
        self.miller_rabin_rounds = Some(rounds);
        self
    }
}

/// Modulus length in bytes
fn byte_size(n: &BigInt) -> usize {
    n.bit_length().div_ceil(8)
}

impl RsaPublicKey {
    pub fn new(n: BigInt, e: BigInt) -> Self {
        Self { n, e }
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> usize {
        self.n.bit_length()
    }

    /// Modulus length `k` in bytes
    pub fn size(&self) -> usize {
        byte_size(&self.n)
    }

    /// Encrypt a message using this public key
    pub fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        super::encrypt::encrypt_bytes(plaintext, self)
    }

    /// Verify a SHA-256 PKCS#1 v1.5 signature
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        super::sign::verify_bytes(message, signature, self)
    }
}

impl RsaPrivateKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> usize {
        self.n.bit_length()
    }

    /// Modulus length `k` in bytes
    pub fn size(&self) -> usize {
        byte_size(&self.n)
    }

    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey::new(self.n.clone(), self.e.clone())
    }

    /// d mod (p-1)
    pub fn dp(&self) -> CryptoResult<BigInt> {
        self.d.modulo(&(&self.p - &BigInt::one()))
    }

    /// d mod (q-1)
    pub fn dq(&self) -> CryptoResult<BigInt> {
        self.d.modulo(&(&self.q - &BigInt::one()))
    }

    /// q^(-1) mod p
    pub fn qi(&self) -> CryptoResult<BigInt> {
        self.q.mod_inverse(&self.p)
    }

    /// Decrypt a ciphertext using this private key
    pub fn decrypt(&self, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
        super::decrypt::decrypt_bytes(ciphertext, self)
    }

    /// Produce a SHA-256 PKCS#1 v1.5 signature
    pub fn sign(&self, message: &[u8]) -> CryptoResult<Vec<u8>> {
        super::sign::sign_bytes(message, self)
    }
}

impl RsaKeyPair {
    /// Get the bit length of the key
    pub fn bit_length(&self) -> usize {
        self.public_key.bit_length()
    }
}

/// Generate an RSA key pair from two primes of `prime_bits` bits each.
///
/// Modulus sizes below 1024 bits are clamped up. Runs until suitable
/// primes are found; there is no cancellation.
pub fn generate_keypair(prime_bits: usize) -> CryptoResult<RsaKeyPair> {
    generate_keypair_with(&KeyGenConfig::default().with_prime_bits(prime_bits))
}

pub fn generate_keypair_with(config: &KeyGenConfig) -> CryptoResult<RsaKeyPair> {
    let mut prime_bits = config.prime_bits;
    if prime_bits * 2 < MIN_MODULUS_BITS {
        warn!(
            "requested {}-bit modulus is below the minimum, using {} bits",
            prime_bits * 2,
            MIN_MODULUS_BITS
        );
        prime_bits = MIN_MODULUS_BITS / 2;
    }
    let rounds = config
        .miller_rabin_rounds
        .unwrap_or_else(|| rounds_for_modulus(prime_bits * 2));
    let e = BigInt::from(PUBLIC_EXPONENT);
    let one = BigInt::one();

    debug!(
        "generating RSA key: {}-bit primes, {} Miller-Rabin rounds",
        prime_bits, rounds
    );

    loop {
        // Step 1: Generate two distinct random primes p and q
        let p = generate_prime(prime_bits, rounds);
        let mut q = generate_prime(prime_bits, rounds);
        while q == p {
            q = generate_prime(prime_bits, rounds);
        }

        // Ensure p > q
        let (p, q) = if p < q { (q, p) } else { (p, q) };

        // Step 2: Compute n = p * q and φ(n) = (p-1)(q-1)
        let n = &p * &q;
        let phi_n = &(&p - &one) * &(&q - &one);

        // Step 3: Compute d = e^(-1) mod φ(n)
        let d = match e.mod_inverse(&phi_n) {
            Ok(d) => d,
            Err(CryptoError::NotInvertible) => {
                debug!("e shares a factor with φ(n), drawing new primes");
                continue;
            }
            Err(err) => return Err(err),
        };

        let private_key = RsaPrivateKey {
            n: n.clone(),
            e: e.clone(),
            d,
            p,
            q,
        };
        let public_key = private_key.public_key();
        debug!("generated {}-bit RSA modulus", n.bit_length());

        return Ok(RsaKeyPair {
            public_key,
            private_key,
        });
    }
}
