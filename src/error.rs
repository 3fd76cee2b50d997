// Error types shared by every primitive in the crate

use thiserror::Error;

/// Errors that can occur in the cryptographic core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("division by zero")]
    DivideByZero,

    #[error("value has no inverse for the given modulus")]
    NotInvertible,

    #[error("negative exponent")]
    NegativeExponent,

    #[error("invalid hex string")]
    InvalidHex,

    #[error("invalid base64 input")]
    InvalidBase64,

    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid IV length: expected {expected}, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    #[error("invalid ciphertext length")]
    InvalidCiphertextLength,

    #[error("invalid padding")]
    InvalidPadding,

    #[error("malformed DER: {0}")]
    InvalidDer(&'static str),

    #[error("message too long: max {max} bytes, got {actual}")]
    MessageTooLong { max: usize, actual: usize },

    #[error("RSA modulus too small")]
    ModulusTooSmall,
}

/// Result type for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;
