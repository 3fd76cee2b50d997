// RSA Signatures
// RSASSA-PKCS1-v1_5 with SHA-256

use log::debug;

use super::encrypt::public_op;
use super::keygen::{RsaPrivateKey, RsaPublicKey};
use super::padding::{pad_for_signature, unpad_for_signature, SHA256_DIGEST_INFO_PREFIX};
use crate::base64;
use crate::bigint::BigInt;
use crate::error::{CryptoError, CryptoResult};
use crate::hash::sha256;

/// DER `DigestInfo` for the SHA-256 digest of `message`
fn digest_info(message: &[u8]) -> Vec<u8> {
    let mut t = SHA256_DIGEST_INFO_PREFIX.to_vec();
    t.extend_from_slice(&sha256(message));
    t
}

/// Sign `message`, returning a `k`-byte signature
pub fn sign_bytes(message: &[u8], private_key: &RsaPrivateKey) -> CryptoResult<Vec<u8>> {
    let k = private_key.size();
    let em = pad_for_signature(&digest_info(message), k)?;

    // s = em^d mod n
    let s = BigInt::from_bytes_be(&em).mod_pow(&private_key.d, &private_key.n)?;
    s.to_bytes_be_padded(k).ok_or(CryptoError::ModulusTooSmall)
}

/// Check a signature produced by [`sign_bytes`]
pub fn verify_bytes(message: &[u8], signature: &[u8], public_key: &RsaPublicKey) -> bool {
    if signature.len() != public_key.size() {
        return false;
    }
    let em = match public_op(signature, public_key) {
        Ok(em) => em,
        Err(e) => {
            debug!("signature rejected: {}", e);
            return false;
        }
    };
    match unpad_for_signature(&em) {
        Ok(t) => t == digest_info(message).as_slice(),
        Err(_) => false,
    }
}

/// Sign with a Base64 DER private key and return the Base64 signature
pub fn rsa_sign(message: &[u8], private_key_base64: &str) -> CryptoResult<String> {
    let private_key = RsaPrivateKey::from_base64(private_key_base64)?;
    Ok(base64::encode(&sign_bytes(message, &private_key)?))
}

/// Verify a Base64 signature against a Base64 DER public key.
/// Any decoding failure counts as an invalid signature.
pub fn rsa_verify(message: &[u8], signature_base64: &str, public_key_base64: &str) -> bool {
    let Ok(public_key) = RsaPublicKey::from_base64(public_key_base64) else {
        return false;
    };
    let Ok(signature) = base64::decode(signature_base64) else {
        return false;
    };
    verify_bytes(message, &signature, &public_key)
}
