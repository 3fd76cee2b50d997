//! PKCS#7 padding for the 16-byte AES block.

use crate::error::{CryptoError, CryptoResult};

use super::block::BLOCK_SIZE;

/// Pad `data` to a multiple of the AES block size.
///
/// Block-aligned input gets a full extra block of `0x10` bytes, so there is
/// always between 1 and 16 bytes of padding.
#[must_use]
pub fn pkcs7_pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - (data.len() % BLOCK_SIZE);
    let mut out = Vec::with_capacity(data.len() + pad_len);
    out.extend_from_slice(data);
    out.resize(data.len() + pad_len, pad_len as u8);
    out
}

/// Strip PKCS#7 padding, rejecting a pad byte of 0 or above 16 and any
/// claimed pad byte with the wrong value.
pub fn pkcs7_unpad(data: &[u8]) -> CryptoResult<&[u8]> {
    let pad_byte = *data.last().ok_or(CryptoError::InvalidPadding)?;
    let pad_len = pad_byte as usize;

    if pad_len == 0 || pad_len > BLOCK_SIZE || pad_len > data.len() {
        return Err(CryptoError::InvalidPadding);
    }

    let content_len = data.len() - pad_len;
    if data[content_len..].iter().any(|&b| b != pad_byte) {
        return Err(CryptoError::InvalidPadding);
    }
    Ok(&data[..content_len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_block_padding() {
        let data = [0xAAu8; 16];
        let padded = pkcs7_pad(&data);
        assert_eq!(padded.len(), 32);
        assert_eq!(&padded[16..], &[0x10u8; 16]);
        assert_eq!(pkcs7_unpad(&padded).unwrap(), &data);
    }

    #[test]
    fn test_empty_input_pads_to_one_block() {
        let padded = pkcs7_pad(&[]);
        assert_eq!(padded, vec![0x10u8; 16]);
        assert_eq!(pkcs7_unpad(&padded).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_unpad_invalid() {
        assert_eq!(pkcs7_unpad(&[]), Err(CryptoError::InvalidPadding));
        // pad byte zero
        assert_eq!(pkcs7_unpad(&[0u8; 16]), Err(CryptoError::InvalidPadding));
        // pad byte above the block size
        let mut data = [0x11u8; 32];
        assert_eq!(pkcs7_unpad(&data), Err(CryptoError::InvalidPadding));
        // one claimed pad byte is wrong
        data = [0x04u8; 32];
        data[29] = 0x03;
        assert_eq!(pkcs7_unpad(&data), Err(CryptoError::InvalidPadding));
        // claims more padding than there is data
        assert_eq!(pkcs7_unpad(&[0x02]), Err(CryptoError::InvalidPadding));
    }

    #[test]
    fn test_pad_unpad_sizes() {
        for size in [0, 1, 7, 15, 16, 17, 31, 32, 33, 100, 255, 256] {
            let data: Vec<u8> = (0..size).map(|i| (i & 0xFF) as u8).collect();
            let padded = pkcs7_pad(&data);
            assert_eq!(padded.len() % BLOCK_SIZE, 0, "size {size}");
            assert!(padded.len() > data.len());
            assert!(padded.len() <= data.len() + BLOCK_SIZE);
            assert_eq!(pkcs7_unpad(&padded).unwrap(), &data[..]);
        }
    }
}
