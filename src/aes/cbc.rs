// AES-256-CBC with PKCS#7 padding
// Output framing: Base64(IV || ciphertext)

use log::debug;

use crate::base64;
use crate::error::{CryptoError, CryptoResult};
use crate::random::fill_random;

use super::block::{Aes256, BLOCK_SIZE, KEY_SIZE};
use super::pkcs7::{pkcs7_pad, pkcs7_unpad};

pub const IV_SIZE: usize = 16;

/// Key/IV length handling for CBC mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AesCbcConfig {
    /// Truncate or zero-pad key and IV material to 32 / 16 bytes instead of
    /// rejecting other lengths
    pub flexible: bool,
}

impl AesCbcConfig {
    pub fn with_flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }
}

fn fit_key(key: &[u8], config: &AesCbcConfig) -> CryptoResult<Vec<u8>> {
    if key.len() == KEY_SIZE || config.flexible {
        let mut out = key.to_vec();
        out.resize(KEY_SIZE, 0);
        return Ok(out);
    }
    Err(CryptoError::InvalidKeyLength {
        expected: KEY_SIZE,
        actual: key.len(),
    })
}

fn fit_iv(iv: &[u8], config: &AesCbcConfig) -> CryptoResult<[u8; IV_SIZE]> {
    if iv.len() != IV_SIZE && !config.flexible {
        return Err(CryptoError::InvalidIvLength {
            expected: IV_SIZE,
            actual: iv.len(),
        });
    }
    let mut out = [0u8; IV_SIZE];
    let n = iv.len().min(IV_SIZE);
    out[..n].copy_from_slice(&iv[..n]);
    Ok(out)
}

/// Encrypt `plaintext` with AES-256-CBC.
///
/// When `iv` is `None` a fresh random IV is drawn. The IV is prepended to
/// the ciphertext and the whole is returned Base64 encoded.
pub fn aes_cbc_encrypt(
    plaintext: &[u8],
    key: &[u8],
    iv: Option<&[u8]>,
    config: &AesCbcConfig,
) -> CryptoResult<String> {
    let cipher = Aes256::new(&fit_key(key, config)?)?;
    let iv = match iv {
        Some(iv) => fit_iv(iv, config)?,
        None => {
            let mut iv = [0u8; IV_SIZE];
            fill_random(&mut iv);
            iv
        }
    };

    let padded = pkcs7_pad(plaintext);
    let mut out = Vec::with_capacity(IV_SIZE + padded.len());
    out.extend_from_slice(&iv);

    let mut prev = iv;
    for chunk in padded.chunks_exact(BLOCK_SIZE) {
        let mut block = [0u8; BLOCK_SIZE];
        for (b, (p, c)) in block.iter_mut().zip(chunk.iter().zip(prev.iter())) {
            *b = p ^ c;
        }
        prev = cipher.encrypt_block(&block);
        out.extend_from_slice(&prev);
    }

    Ok(base64::encode(&out))
}

/// Decrypt the output of [`aes_cbc_encrypt`]
pub fn aes_cbc_decrypt(ciphertext: &str, key: &[u8], config: &AesCbcConfig) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256::new(&fit_key(key, config)?)?;
    let data = base64::decode(ciphertext)?;

    if data.len() < IV_SIZE {
        return Err(CryptoError::InvalidCiphertextLength);
    }
    let (iv, body) = data.split_at(IV_SIZE);
    if body.is_empty() || body.len() % BLOCK_SIZE != 0 {
        debug!("AES-CBC body of {} bytes is not block aligned", body.len());
        return Err(CryptoError::InvalidCiphertextLength);
    }

    let mut plain = Vec::with_capacity(body.len());
    let mut prev = [0u8; BLOCK_SIZE];
    prev.copy_from_slice(iv);
    for chunk in body.chunks_exact(BLOCK_SIZE) {
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(chunk);
        let decrypted = cipher.decrypt_block(&block);
        plain.extend(decrypted.iter().zip(prev.iter()).map(|(d, p)| d ^ p));
        prev = block;
    }

    let content_len = match pkcs7_unpad(&plain) {
        Ok(content) => content.len(),
        Err(e) => {
            debug!("AES-CBC padding check failed");
            return Err(e);
        }
    };
    plain.truncate(content_len);
    Ok(plain)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x42; 32];

    #[test]
    fn test_sp800_38a_cbc_vector() {
        // NIST SP 800-38A F.2.5, first block, plus our PKCS#7 block
        let key = hex::decode("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4")
            .unwrap();
        let iv = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let plaintext = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();

        let encoded =
            aes_cbc_encrypt(&plaintext, &key, Some(iv.as_slice()), &AesCbcConfig::default()).unwrap();
        let raw = base64::decode(&encoded).unwrap();
        assert_eq!(raw.len(), 16 + 32);
        assert_eq!(&raw[..16], &iv[..]);
        assert_eq!(hex::encode(&raw[16..32]), "f58c4c04d6e5f1ba779eabfb5f7bfbd6");

        let decrypted = aes_cbc_decrypt(&encoded, &key, &AesCbcConfig::default()).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_roundtrip_random_iv() {
        let config = AesCbcConfig::default();
        for len in [0usize, 1, 15, 16, 17, 100, 1000] {
            let plaintext: Vec<u8> = (0..len).map(|i| (i * 7) as u8).collect();
            let a = aes_cbc_encrypt(&plaintext, &KEY, None, &config).unwrap();
            let b = aes_cbc_encrypt(&plaintext, &KEY, None, &config).unwrap();
            assert_ne!(a, b, "IVs should differ");
            assert_eq!(aes_cbc_decrypt(&a, &KEY, &config).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_exact_lengths_required() {
        let config = AesCbcConfig::default();
        assert_eq!(
            aes_cbc_encrypt(b"x", &[1u8; 16], None, &config),
            Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual: 16
            })
        );
        assert_eq!(
            aes_cbc_encrypt(b"x", &KEY, Some(&[0u8; 8][..]), &config),
            Err(CryptoError::InvalidIvLength {
                expected: 16,
                actual: 8
            })
        );
    }

    #[test]
    fn test_flexible_lengths() {
        let config = AesCbcConfig::default().with_flexible(true);

        // short key is zero padded, long key truncated
        let short = b"secret";
        let mut padded_key = short.to_vec();
        padded_key.resize(32, 0);
        let ct = aes_cbc_encrypt(b"hello", short, Some(&b"iv"[..]), &config).unwrap();
        assert_eq!(
            aes_cbc_decrypt(&ct, &padded_key, &AesCbcConfig::default()).unwrap(),
            b"hello"
        );

        let long_key = [7u8; 40];
        let long_iv = [9u8; 20];
        let ct = aes_cbc_encrypt(b"hello", &long_key, Some(&long_iv[..]), &config).unwrap();
        let raw = base64::decode(&ct).unwrap();
        assert_eq!(&raw[..16], &[9u8; 16]);
        assert_eq!(
            aes_cbc_decrypt(&ct, &[7u8; 32], &AesCbcConfig::default()).unwrap(),
            b"hello"
        );
    }

    #[test]
    fn test_rejects_misaligned_ciphertext() {
        let config = AesCbcConfig::default();
        let mut raw = vec![0u8; 16 + 20];
        assert_eq!(
            aes_cbc_decrypt(&base64::encode(&raw), &KEY, &config),
            Err(CryptoError::InvalidCiphertextLength)
        );
        raw.truncate(16);
        assert_eq!(
            aes_cbc_decrypt(&base64::encode(&raw), &KEY, &config),
            Err(CryptoError::InvalidCiphertextLength)
        );
        assert!(aes_cbc_decrypt("not base64!", &KEY, &config).is_err());
    }

    #[test]
    fn test_wrong_key_fails_padding() {
        let config = AesCbcConfig::default();
        let ct = aes_cbc_encrypt(b"attack at dawn", &KEY, None, &config).unwrap();
        // A random final block decrypts to valid padding about 1 in 256 times
        // for these inputs, so try several keys
        let failures = (0u8..8)
            .filter(|&k| aes_cbc_decrypt(&ct, &[k; 32], &config).is_err())
            .count();
        assert!(failures >= 6);
    }
}
