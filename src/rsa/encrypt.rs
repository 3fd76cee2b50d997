// RSA Encryption Implementation
// Implements chunked RSA encryption with PKCS#1 v1.5 padding

use log::debug;

use super::keygen::RsaPublicKey;
use super::padding::{max_message_len, pad_pkcs1_v15};
use crate::base64;
use crate::bigint::BigInt;
use crate::error::{CryptoError, CryptoResult};

/// Raw RSA public operation on one `k`-byte block, returned as exactly `k` bytes
pub(crate) fn public_op(block: &[u8], public_key: &RsaPublicKey) -> CryptoResult<Vec<u8>> {
    let k = public_key.size();
    let m = BigInt::from_bytes_be(block);
    if m >= public_key.n {
        return Err(CryptoError::MessageTooLong {
            max: k,
            actual: block.len(),
        });
    }

    // Compute c = m^e mod n
    let c = m.mod_pow(&public_key.e, &public_key.n)?;
    c.to_bytes_be_padded(k).ok_or(CryptoError::ModulusTooSmall)
}

/// Encrypt bytes using RSA public key.
///
/// The plaintext is split into chunks of at most `k - 11` bytes and each
/// chunk becomes one `k`-byte ciphertext block. An empty plaintext still
/// produces a single block.
pub fn encrypt_bytes(plaintext: &[u8], public_key: &RsaPublicKey) -> CryptoResult<Vec<u8>> {
    let k = public_key.size();
    let chunk_len = max_message_len(k)?;
    if chunk_len == 0 {
        return Err(CryptoError::ModulusTooSmall);
    }

    let block_count = plaintext.len().div_ceil(chunk_len).max(1);
    let mut result = Vec::with_capacity(block_count * k);

    if plaintext.is_empty() {
        let padded = pad_pkcs1_v15(plaintext, k)?;
        result.extend_from_slice(&public_op(&padded, public_key)?);
    }
    for chunk in plaintext.chunks(chunk_len) {
        let padded = pad_pkcs1_v15(chunk, k)?;
        result.extend_from_slice(&public_op(&padded, public_key)?);
    }

    debug!(
        "RSA encrypted {} bytes into {} blocks of {} bytes",
        plaintext.len(),
        block_count,
        k
    );
    Ok(result)
}

/// Encrypt with a Base64 DER public key and return the Base64 ciphertext
pub fn rsa_encrypt(plaintext: &[u8], public_key_base64: &str) -> CryptoResult<String> {
    let public_key = RsaPublicKey::from_base64(public_key_base64)?;
    let ciphertext = encrypt_bytes(plaintext, &public_key)?;
    Ok(base64::encode(&ciphertext))
}
