// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod decrypt;
pub mod der;
pub mod encrypt;
pub mod keygen;
pub mod padding;
pub mod prime;
pub mod sign;

pub use decrypt::{decrypt_bytes, rsa_decrypt};
pub use encrypt::{encrypt_bytes, rsa_encrypt};
pub use keygen::{
    generate_keypair, generate_keypair_with, KeyGenConfig, RsaKeyPair, RsaPrivateKey, RsaPublicKey,
    MIN_MODULUS_BITS, PUBLIC_EXPONENT,
};
pub use padding::{pad_for_signature, pad_pkcs1_v15, unpad_for_signature, unpad_pkcs1_v15};
pub use prime::{generate_prime, is_prime, miller_rabin};
pub use sign::{rsa_sign, rsa_verify, sign_bytes, verify_bytes};
