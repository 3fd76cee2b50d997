// AES Module - Main module file
// Exports the AES-256 block cipher and its CBC mode

pub mod block;
pub mod cbc;
pub mod pkcs7;

pub use block::{Aes256, BLOCK_SIZE, KEY_SIZE};
pub use cbc::{aes_cbc_decrypt, aes_cbc_encrypt, AesCbcConfig, IV_SIZE};
pub use pkcs7::{pkcs7_pad, pkcs7_unpad};
