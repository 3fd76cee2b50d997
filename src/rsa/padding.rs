// PKCS#1 v1.5 Padding
// Implements RSA PKCS#1 v1.5 padding for encryption and signatures

use crate::error::{CryptoError, CryptoResult};
use crate::random::random_nonzero_bytes;

/// 0x00 0x02 (or 0x01), at least 8 padding bytes, and the 0x00 separator
pub const PKCS1_OVERHEAD: usize = 11;

const MIN_PS_LEN: usize = 8;

/// DER prefix of `DigestInfo { sha256, NULL }` ahead of the 32-byte digest
pub const SHA256_DIGEST_INFO_PREFIX: [u8; 19] = [
    0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01, 0x05,
    0x00, 0x04, 0x20,
];

/// Largest message that fits one block of a `k`-byte modulus
pub fn max_message_len(k: usize) -> CryptoResult<usize> {
    k.checked_sub(PKCS1_OVERHEAD)
        .ok_or(CryptoError::ModulusTooSmall)
}

/// PKCS#1 v1.5 encryption block
/// Format: 0x00 || 0x02 || PS || 0x00 || data
/// PS = random non-zero bytes filling the block (at least 8)
pub fn pad_pkcs1_v15(data: &[u8], k: usize) -> CryptoResult<Vec<u8>> {
    let max = max_message_len(k)?;
    if data.len() > max {
        return Err(CryptoError::MessageTooLong {
            max,
            actual: data.len(),
        });
    }

    let ps_len = k - data.len() - 3;
    let mut result = Vec::with_capacity(k);
    result.push(0x00);
    result.push(0x02);
    result.extend_from_slice(&random_nonzero_bytes(ps_len));
    result.push(0x00);
    result.extend_from_slice(data);
    Ok(result)
}

/// Validate a decrypted encryption block and return the message
pub fn unpad_pkcs1_v15(em: &[u8]) -> CryptoResult<&[u8]> {
    if em.len() < PKCS1_OVERHEAD || em[0] != 0x00 || em[1] != 0x02 {
        return Err(CryptoError::InvalidPadding);
    }

    // The first zero after the header terminates PS
    let separator = em[2..]
        .iter()
        .position(|&b| b == 0x00)
        .map(|pos| pos + 2)
        .ok_or(CryptoError::InvalidPadding)?;

    if separator - 2 < MIN_PS_LEN {
        return Err(CryptoError::InvalidPadding);
    }
    Ok(&em[separator + 1..])
}

/// EMSA-PKCS1-v1_5 signature block
/// Format: 0x00 || 0x01 || PS (0xFF) || 0x00 || T
pub fn pad_for_signature(t: &[u8], k: usize) -> CryptoResult<Vec<u8>> {
    let max = max_message_len(k)?;
    if t.len() > max {
        return Err(CryptoError::MessageTooLong {
            max,
            actual: t.len(),
        });
    }

    let mut result = Vec::with_capacity(k);
    result.push(0x00);
    result.push(0x01);
    result.resize(k - t.len() - 1, 0xFF);
    result.push(0x00);
    result.extend_from_slice(t);
    Ok(result)
}

/// Validate a signature block and return `T`
pub fn unpad_for_signature(em: &[u8]) -> CryptoResult<&[u8]> {
    if em.len() < PKCS1_OVERHEAD || em[0] != 0x00 || em[1] != 0x01 {
        return Err(CryptoError::InvalidPadding);
    }

    let ps_len = em[2..].iter().take_while(|&&b| b == 0xFF).count();
    let separator = 2 + ps_len;
    if ps_len < MIN_PS_LEN || em.get(separator) != Some(&0x00) {
        return Err(CryptoError::InvalidPadding);
    }
    Ok(&em[separator + 1..])
}
