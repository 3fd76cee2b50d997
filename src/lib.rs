// Cipher Core - Library root
// Cryptographic primitives implemented without an external crypto library

pub mod aes;
pub mod base64;
pub mod bigint;
pub mod error;
pub mod hash;
pub mod random;
pub mod rsa;

pub use aes::{aes_cbc_decrypt, aes_cbc_encrypt, Aes256, AesCbcConfig};
pub use base64::Base64Config;
pub use bigint::BigInt;
pub use error::{CryptoError, CryptoResult};
pub use hash::{md5, md5_hex, sha256, sha256_hex, sha512, sha512_hex};
pub use random::fill_random;
pub use rsa::{
    generate_keypair, generate_keypair_with, is_prime, rsa_decrypt, rsa_encrypt, rsa_sign,
    rsa_verify, KeyGenConfig, RsaKeyPair, RsaPrivateKey, RsaPublicKey,
};
