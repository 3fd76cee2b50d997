// Base64 Codec (RFC 4648)
// Standard and URL-safe alphabets, optional padding, lenient or strict decoding

use log::debug;

use crate::error::{CryptoError, CryptoResult};

const STANDARD: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const URL_SAFE: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
const PAD: u8 = b'=';

/// Options for encoding and decoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Base64Config {
    /// Use `-` and `_` instead of `+` and `/`
    pub url_safe: bool,
    /// Omit `=` padding when encoding; forbid it in strict decoding
    pub no_padding: bool,
    /// Reject whitespace, the other alphabet, bad length and non-zero unused bits
    pub strict: bool,
}

impl Base64Config {
    pub fn with_url_safe(mut self, url_safe: bool) -> Self {
        self.url_safe = url_safe;
        self
    }

    pub fn with_no_padding(mut self, no_padding: bool) -> Self {
        self.no_padding = no_padding;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[derive(Clone, Copy)]
enum Accept {
    Standard,
    UrlSafe,
    Either,
}

fn sextet(c: u8, accept: Accept) -> Option<u8> {
    match c {
        b'A'..=b'Z' => Some(c - b'A'),
        b'a'..=b'z' => Some(c - b'a' + 26),
        b'0'..=b'9' => Some(c - b'0' + 52),
        b'+' if !matches!(accept, Accept::UrlSafe) => Some(62),
        b'/' if !matches!(accept, Accept::UrlSafe) => Some(63),
        b'-' if !matches!(accept, Accept::Standard) => Some(62),
        b'_' if !matches!(accept, Accept::Standard) => Some(63),
        _ => None,
    }
}

/// Encode with the standard alphabet and padding
pub fn encode(data: &[u8]) -> String {
    encode_with(data, &Base64Config::default())
}

pub fn encode_with(data: &[u8], config: &Base64Config) -> String {
    let alphabet = if config.url_safe { URL_SAFE } else { STANDARD };
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);

    for chunk in data.chunks(3) {
        let b0 = chunk[0] as u32;
        let b1 = chunk.get(1).copied().unwrap_or(0) as u32;
        let b2 = chunk.get(2).copied().unwrap_or(0) as u32;
        let triple = (b0 << 16) | (b1 << 8) | b2;

        let emitted = chunk.len() + 1;
        for i in 0..emitted {
            let index = (triple >> (18 - 6 * i)) & 0x3F;
            out.push(alphabet[index as usize] as char);
        }
        if !config.no_padding {
            for _ in emitted..4 {
                out.push(PAD as char);
            }
        }
    }
    out
}

/// Lenient decode accepting either alphabet, whitespace and missing padding
pub fn decode(text: &str) -> CryptoResult<Vec<u8>> {
    decode_with(text, &Base64Config::default())
}

pub fn decode_with(text: &str, config: &Base64Config) -> CryptoResult<Vec<u8>> {
    let result = if config.strict {
        decode_strict(text.as_bytes(), config)
    } else {
        decode_lenient(text.as_bytes())
    };
    if result.is_err() {
        debug!("rejected base64 input of {} bytes", text.len());
    }
    result
}

fn decode_lenient(text: &[u8]) -> CryptoResult<Vec<u8>> {
    let mut chars: Vec<u8> = text
        .iter()
        .copied()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    match chars.len() % 4 {
        0 => {}
        2 => chars.extend_from_slice(b"=="),
        3 => chars.push(PAD),
        _ => return Err(CryptoError::InvalidBase64),
    }
    decode_padded(&chars, Accept::Either, false)
}

fn decode_strict(text: &[u8], config: &Base64Config) -> CryptoResult<Vec<u8>> {
    let accept = if config.url_safe {
        Accept::UrlSafe
    } else {
        Accept::Standard
    };
    if config.no_padding {
        if text.contains(&PAD) {
            return Err(CryptoError::InvalidBase64);
        }
        decode_sextets(text, accept, true)
    } else {
        if text.len() % 4 != 0 {
            return Err(CryptoError::InvalidBase64);
        }
        decode_padded(text, accept, true)
    }
}

/// Decode input whose length is a multiple of four, with at most two
/// trailing `=` and none elsewhere
fn decode_padded(chars: &[u8], accept: Accept, check_bits: bool) -> CryptoResult<Vec<u8>> {
    let pad = chars.iter().rev().take_while(|&&c| c == PAD).count();
    if pad > 2 {
        return Err(CryptoError::InvalidBase64);
    }
    let body = &chars[..chars.len() - pad];
    if body.contains(&PAD) {
        return Err(CryptoError::InvalidBase64);
    }
    decode_sextets(body, accept, check_bits)
}

/// Decode unpadded symbols. A trailing group of two or three symbols
/// yields one or two bytes; a lone trailing symbol is unrecoverable.
fn decode_sextets(body: &[u8], accept: Accept, check_bits: bool) -> CryptoResult<Vec<u8>> {
    if body.len() % 4 == 1 {
        return Err(CryptoError::InvalidBase64);
    }
    let mut out = Vec::with_capacity(body.len() / 4 * 3 + 2);

    for group in body.chunks(4) {
        let mut acc = 0u32;
        for &c in group {
            let v = sextet(c, accept).ok_or(CryptoError::InvalidBase64)?;
            acc = (acc << 6) | v as u32;
        }
        match group.len() {
            4 => out.extend_from_slice(&[(acc >> 16) as u8, (acc >> 8) as u8, acc as u8]),
            3 => {
                if check_bits && acc & 0x3 != 0 {
                    return Err(CryptoError::InvalidBase64);
                }
                out.extend_from_slice(&[(acc >> 10) as u8, (acc >> 2) as u8]);
            }
            _ => {
                if check_bits && acc & 0xF != 0 {
                    return Err(CryptoError::InvalidBase64);
                }
                out.push((acc >> 4) as u8);
            }
        }
    }
    Ok(out)
}
