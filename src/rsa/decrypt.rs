// RSA Decryption Implementation
// Implements RSA decryption with Chinese Remainder Theorem (CRT) optimization

use log::debug;

use super::keygen::RsaPrivateKey;
use super::padding::unpad_pkcs1_v15;
use crate::base64;
use crate::bigint::BigInt;
use crate::error::{CryptoError, CryptoResult};

/// Precomputed CRT exponents for a private key
struct CrtParams {
    dp: BigInt,
    dq: BigInt,
    qi: BigInt,
}

impl CrtParams {
    /// `None` when the key's factors don't match its modulus
    fn derive(key: &RsaPrivateKey) -> Option<Self> {
        if key.p.is_zero() || key.q.is_zero() || &key.p * &key.q != key.n {
            return None;
        }
        Some(Self {
            dp: key.dp().ok()?,
            dq: key.dq().ok()?,
            qi: key.qi().ok()?,
        })
    }
}

/// Raw RSA private operation on one `k`-byte block, returned as exactly `k` bytes
fn private_op(block: &[u8], key: &RsaPrivateKey, crt: Option<&CrtParams>) -> CryptoResult<Vec<u8>> {
    let c = BigInt::from_bytes_be(block);
    if c >= key.n {
        return Err(CryptoError::InvalidCiphertextLength);
    }
    let m = match crt {
        Some(crt) => decrypt_crt(&c, key, crt)?,
        None => c.mod_pow(&key.d, &key.n)?,
    };
    m.to_bytes_be_padded(key.size())
        .ok_or(CryptoError::InvalidPadding)
}

/// Decrypt using Chinese Remainder Theorem (CRT)
/// This is faster than regular decryption because we work with smaller numbers
fn decrypt_crt(c: &BigInt, key: &RsaPrivateKey, crt: &CrtParams) -> CryptoResult<BigInt> {
    // m1 = c^d_p mod p
    let m1 = c.mod_pow(&crt.dp, &key.p)?;

    // m2 = c^d_q mod q
    let m2 = c.mod_pow(&crt.dq, &key.q)?;

    // h = (m1 - m2) * q_inv mod p
    let h = (&(&m1 - &m2) * &crt.qi).modulo(&key.p)?;

    // m = m2 + q * h
    Ok(&m2 + &(&key.q * &h))
}

/// Decrypt ciphertext bytes using RSA private key.
///
/// The input must be a non-empty sequence of `k`-byte blocks; any block that
/// fails to unpad fails the whole call.
pub fn decrypt_bytes(ciphertext: &[u8], private_key: &RsaPrivateKey) -> CryptoResult<Vec<u8>> {
    let k = private_key.size();
    if k == 0 || ciphertext.is_empty() || ciphertext.len() % k != 0 {
        debug!(
            "RSA ciphertext of {} bytes is not a whole number of {}-byte blocks",
            ciphertext.len(),
            k
        );
        return Err(CryptoError::InvalidCiphertextLength);
    }

    let crt = CrtParams::derive(private_key);
    if crt.is_none() {
        debug!("private key factors inconsistent, skipping CRT");
    }

    let mut plaintext = Vec::with_capacity(ciphertext.len());
    for block in ciphertext.chunks_exact(k) {
        let em = private_op(block, private_key, crt.as_ref())?;
        plaintext.extend_from_slice(unpad_pkcs1_v15(&em)?);
    }
    Ok(plaintext)
}

/// Decrypt a Base64 ciphertext with a Base64 DER private key
pub fn rsa_decrypt(ciphertext_base64: &str, private_key_base64: &str) -> CryptoResult<Vec<u8>> {
    let private_key = RsaPrivateKey::from_base64(private_key_base64)?;
    let ciphertext = base64::decode(ciphertext_base64)?;
    decrypt_bytes(&ciphertext, &private_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::keygen::{generate_keypair, RsaKeyPair};

    fn test_roundtrip(keypair: &RsaKeyPair, message: &[u8]) {
        let ciphertext = keypair.public_key.encrypt(message).unwrap();
        let decrypted = keypair.private_key.decrypt(&ciphertext).unwrap();
        assert_eq!(message, decrypted.as_slice());
    }

    #[test]
    fn test_decrypt_bytes() {
        let keypair = generate_keypair(512).unwrap();
        let message = b"Hello, RSA!";

        let ciphertext = keypair.public_key.encrypt(message).unwrap();
        let decrypted = decrypt_bytes(&ciphertext, &keypair.private_key).unwrap();

        assert_eq!(message.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_crt_matches_plain_exponentiation() {
        let keypair = generate_keypair(512).unwrap();
        let key = &keypair.private_key;
        let crt = CrtParams::derive(key).unwrap();

        let c = BigInt::from_bytes_be(&[0x3C; 100]);
        assert_eq!(
            decrypt_crt(&c, key, &crt).unwrap(),
            c.mod_pow(&key.d, &key.n).unwrap()
        );
    }

    #[test]
    fn test_decrypt_invalid_size() {
        let keypair = generate_keypair(512).unwrap();
        let k = keypair.private_key.size();
        for len in [0usize, 10, k - 1, k + 1] {
            assert_eq!(
                decrypt_bytes(&vec![0u8; len], &keypair.private_key),
                Err(CryptoError::InvalidCiphertextLength),
                "len = {len}"
            );
        }
    }

    #[test]
    fn test_decrypt_block_above_modulus() {
        let keypair = generate_keypair(512).unwrap();
        let k = keypair.private_key.size();
        assert!(decrypt_bytes(&vec![0xFF; k], &keypair.private_key).is_err());
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let keypair1 = generate_keypair(512).unwrap();
        let keypair2 = generate_keypair(512).unwrap();

        let message = b"Test";
        let ciphertext = keypair1.public_key.encrypt(message).unwrap();

        let result = keypair2.private_key.decrypt(&ciphertext);
        assert!(result.is_err()); // Should fail - wrong key
    }

    #[test]
    fn test_corrupted_block_fails_whole_message() {
        let keypair = generate_keypair(512).unwrap();
        let k = keypair.private_key.size();
        let message = vec![0x11u8; 3 * (k - 11)];
        let mut ciphertext = keypair.public_key.encrypt(&message).unwrap();
        ciphertext[k + 5] ^= 0x01;
        assert!(keypair.private_key.decrypt(&ciphertext).is_err());
    }

    #[test]
    fn test_roundtrip_various_sizes() {
        let keypair = generate_keypair(512).unwrap();
        let k = keypair.public_key.size();

        // Test various message sizes
        let test_cases: Vec<Vec<u8>> = vec![
            Vec::new(),
            b"A".to_vec(),
            b"Hello, World!".to_vec(),
            vec![0u8; 100],
            vec![255u8; k - 11],
            vec![7u8; k - 10],
            vec![42u8; 5 * (k - 11) + 3],
        ];

        for message in test_cases {
            test_roundtrip(&keypair, &message);
        }
    }

    #[test]
    fn test_rsa_decrypt_text_api() {
        let keypair = generate_keypair(512).unwrap();
        let public_b64 = keypair.public_key.to_base64();
        let private_b64 = keypair.private_key.to_base64().unwrap();

        let ciphertext = super::super::encrypt::rsa_encrypt(b"over the wire", &public_b64).unwrap();
        assert_eq!(rsa_decrypt(&ciphertext, &private_b64).unwrap(), b"over the wire");
        assert!(rsa_decrypt(&ciphertext, "bogus").is_err());
        assert!(rsa_decrypt("", &private_b64).is_err());
    }
}
