// Hash Module - Merkle-Damgard digests
// One-shot MD5 (RFC 1321), SHA-256 and SHA-512 (FIPS 180-4)

pub mod md5;
pub mod sha256;
pub mod sha512;

pub use self::md5::{md5, md5_hex};
pub use self::sha256::{sha256, sha256_hex};
pub use self::sha512::{sha512, sha512_hex};

/// Byte order of the trailing message-length field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LengthOrder {
    Little,
    Big,
}

/// Merkle-Damgard strengthening: `0x80`, zero fill, then the bit length
/// in a `length_size`-byte field so the result is a whole number of blocks.
pub(crate) fn md_pad(
    data: &[u8],
    block_size: usize,
    length_size: usize,
    order: LengthOrder,
) -> Vec<u8> {
    let bit_len = (data.len() as u128).wrapping_mul(8);
    let mut padded = Vec::with_capacity(data.len() + block_size + length_size);
    padded.extend_from_slice(data);
    padded.push(0x80);
    while padded.len() % block_size != block_size - length_size {
        padded.push(0);
    }

    let field = match order {
        LengthOrder::Little => bit_len.to_le_bytes(),
        LengthOrder::Big => bit_len.to_be_bytes(),
    };
    match order {
        LengthOrder::Little => padded.extend_from_slice(&field[..length_size]),
        LengthOrder::Big => padded.extend_from_slice(&field[16 - length_size..]),
    }
    padded
}
