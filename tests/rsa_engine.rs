//! RSA engine tests through the text-level API.
//!
//! Covers key export/import as Base64 DER, chunked encryption at 1024 and
//! 2048 bits, block boundary lengths, signatures, and rejection of damaged
//! input.

use anyhow::Result;
use cipher_core::rsa::{decrypt_bytes, encrypt_bytes};
use cipher_core::{
    base64, generate_keypair, generate_keypair_with, is_prime, rsa_decrypt, rsa_encrypt,
    rsa_sign, rsa_verify, BigInt, KeyGenConfig, RsaKeyPair, RsaPrivateKey, RsaPublicKey,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn message(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 + 7) as u8).collect()
}

fn check_roundtrips(keypair: &RsaKeyPair) -> Result<()> {
    let public_b64 = keypair.public_key.to_base64();
    let private_b64 = keypair.private_key.to_base64()?;
    let k = keypair.public_key.size();
    let chunk = k - 11;

    for len in [0, 1, chunk - 1, chunk, chunk + 1, 2 * chunk, 3 * chunk + 5] {
        let plaintext = message(len);
        let ciphertext = rsa_encrypt(&plaintext, &public_b64)?;

        let raw = base64::decode(&ciphertext)?;
        let blocks = len.div_ceil(chunk).max(1);
        assert_eq!(raw.len(), blocks * k, "len = {len}");

        assert_eq!(rsa_decrypt(&ciphertext, &private_b64)?, plaintext, "len = {len}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Key generation and round trips
// ---------------------------------------------------------------------------

#[test]
fn roundtrip_1024_bit_modulus() -> Result<()> {
    let keypair = generate_keypair(512)?;
    assert!(keypair.bit_length() >= 1023);
    check_roundtrips(&keypair)
}

#[test]
fn roundtrip_2048_bit_modulus() -> Result<()> {
    let keypair = generate_keypair(1024)?;
    assert!(keypair.bit_length() >= 2047);
    assert!(is_prime(&keypair.private_key.p));
    assert!(is_prime(&keypair.private_key.q));
    check_roundtrips(&keypair)
}

#[test]
fn keys_survive_base64_der() -> Result<()> {
    let keypair = generate_keypair_with(&KeyGenConfig::default().with_prime_bits(512))?;

    let public = RsaPublicKey::from_base64(&keypair.public_key.to_base64())?;
    assert_eq!(public, keypair.public_key);

    let private = RsaPrivateKey::from_base64(&keypair.private_key.to_base64()?)?;
    assert_eq!(private, keypair.private_key);
    assert_eq!(private.public_key(), public);

    // The exported text is bare Base64 with no PEM framing
    let text = keypair.public_key.to_base64();
    assert!(!text.contains("-----"));
    assert!(!text.contains('\n'));
    Ok(())
}

#[test]
fn public_key_der_layout() -> Result<()> {
    let keypair = generate_keypair(512)?;
    let der = keypair.public_key.to_der();

    // SEQUENCE with a one-byte long-form length, then the modulus INTEGER
    assert_eq!(der[0], 0x30);
    assert_eq!(der[1], 0x81);
    assert_eq!(der[3], 0x02);
    // public exponent 65537 closes the sequence
    assert_eq!(&der[der.len() - 5..], &[0x02, 0x03, 0x01, 0x00, 0x01]);
    Ok(())
}

// ---------------------------------------------------------------------------
// Failure cases
// ---------------------------------------------------------------------------

#[test]
fn damaged_ciphertext_is_rejected() -> Result<()> {
    let keypair = generate_keypair(512)?;
    let k = keypair.public_key.size();
    let ciphertext = encrypt_bytes(b"integrity matters", &keypair.public_key)?;

    // Truncated by one byte
    assert!(decrypt_bytes(&ciphertext[..k - 1], &keypair.private_key).is_err());

    // Zero block decrypts to zero, which has no valid padding
    assert!(decrypt_bytes(&vec![0u8; k], &keypair.private_key).is_err());

    // Garbage text
    let private_b64 = keypair.private_key.to_base64()?;
    assert!(rsa_decrypt("????", &private_b64).is_err());
    Ok(())
}

#[test]
fn unusable_keys_are_rejected() {
    assert!(rsa_encrypt(b"x", "").is_err());
    assert!(rsa_encrypt(b"x", "MAA=").is_err());

    // Modulus of 10 bytes cannot hold the 11-byte PKCS#1 overhead
    let tiny = RsaPublicKey::new(BigInt::from_bytes_be(&[0xAB; 10]), BigInt::from(3u32));
    assert!(rsa_encrypt(b"", &tiny.to_base64()).is_err());
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

#[test]
fn sign_and_verify_text_api() -> Result<()> {
    let keypair = generate_keypair(512)?;
    let private_b64 = keypair.private_key.to_base64()?;
    let public_b64 = keypair.public_key.to_base64();

    let signature = rsa_sign(b"release-1.0.tar.gz", &private_b64)?;
    assert!(rsa_verify(b"release-1.0.tar.gz", &signature, &public_b64));
    assert!(!rsa_verify(b"release-1.1.tar.gz", &signature, &public_b64));
    Ok(())
}
