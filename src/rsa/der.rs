// PKCS#1 DER Key Codec
// RSAPublicKey / RSAPrivateKey as ASN.1 DER, exported as bare Base64 (no PEM framing)

use log::debug;

use super::keygen::{RsaPrivateKey, RsaPublicKey};
use crate::base64;
use crate::bigint::BigInt;
use crate::error::{CryptoError, CryptoResult};

const TAG_INTEGER: u8 = 0x02;
const TAG_SEQUENCE: u8 = 0x30;

fn encode_length(len: usize, out: &mut Vec<u8>) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}

/// DER INTEGER for a non-negative value: minimal big-endian bytes with a
/// `0x00` guard when the top bit would otherwise read as a sign
fn encode_integer(value: &BigInt, out: &mut Vec<u8>) {
    let mut bytes = value.to_bytes_be();
    if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0x00);
    }
    out.push(TAG_INTEGER);
    encode_length(bytes.len(), out);
    out.extend_from_slice(&bytes);
}

fn encode_sequence(fields: &[&BigInt]) -> Vec<u8> {
    let mut content = Vec::new();
    for field in fields {
        encode_integer(field, &mut content);
    }
    let mut out = Vec::with_capacity(content.len() + 6);
    out.push(TAG_SEQUENCE);
    encode_length(content.len(), &mut out);
    out.extend_from_slice(&content);
    out
}

/// Cursor over DER bytes
struct DerReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DerReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn read_byte(&mut self) -> CryptoResult<u8> {
        let b = *self
            .data
            .get(self.pos)
            .ok_or(CryptoError::InvalidDer("unexpected end of input"))?;
        self.pos += 1;
        Ok(b)
    }

    fn read_length(&mut self) -> CryptoResult<usize> {
        let first = self.read_byte()?;
        if first < 0x80 {
            return Ok(first as usize);
        }
        let count = (first & 0x7F) as usize;
        if count == 0 || count > std::mem::size_of::<usize>() {
            return Err(CryptoError::InvalidDer("unsupported length encoding"));
        }
        let mut len = 0usize;
        for _ in 0..count {
            len = (len << 8) | self.read_byte()? as usize;
        }
        Ok(len)
    }

    /// Read one TLV with the expected tag and return its contents
    fn read_tlv(&mut self, tag: u8) -> CryptoResult<&'a [u8]> {
        if self.read_byte()? != tag {
            return Err(CryptoError::InvalidDer("unexpected tag"));
        }
        let len = self.read_length()?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(CryptoError::InvalidDer("truncated value"))?;
        let content = &self.data[self.pos..end];
        self.pos = end;
        Ok(content)
    }

    fn read_integer(&mut self) -> CryptoResult<BigInt> {
        let content = self.read_tlv(TAG_INTEGER)?;
        let first = *content
            .first()
            .ok_or(CryptoError::InvalidDer("empty integer"))?;
        if first & 0x80 != 0 {
            return Err(CryptoError::InvalidDer("negative integer"));
        }
        Ok(BigInt::from_bytes_be(content))
    }
}

/// Parse a SEQUENCE of INTEGERs spanning the whole input
fn decode_integer_sequence(der: &[u8]) -> CryptoResult<Vec<BigInt>> {
    let mut outer = DerReader::new(der);
    let content = outer.read_tlv(TAG_SEQUENCE)?;
    if !outer.is_empty() {
        return Err(CryptoError::InvalidDer("trailing data"));
    }

    let mut reader = DerReader::new(content);
    let mut fields = Vec::new();
    while !reader.is_empty() {
        fields.push(reader.read_integer()?);
    }
    Ok(fields)
}

impl RsaPublicKey {
    /// PKCS#1 `RSAPublicKey ::= SEQUENCE { modulus, publicExponent }`
    pub fn to_der(&self) -> Vec<u8> {
        encode_sequence(&[&self.n, &self.e])
    }

    pub fn from_der(der: &[u8]) -> CryptoResult<Self> {
        let fields = decode_integer_sequence(der)?;
        match <[BigInt; 2]>::try_from(fields) {
            Ok([n, e]) => Ok(Self::new(n, e)),
            Err(_) => Err(CryptoError::InvalidDer("expected 2 integers")),
        }
    }

    pub fn to_base64(&self) -> String {
        base64::encode(&self.to_der())
    }

    pub fn from_base64(text: &str) -> CryptoResult<Self> {
        let der = base64::decode(text)?;
        Self::from_der(&der).map_err(|e| {
            debug!("public key rejected: {}", e);
            e
        })
    }
}

impl RsaPrivateKey {
    /// PKCS#1 `RSAPrivateKey` (two-prime, version 0)
    pub fn to_der(&self) -> CryptoResult<Vec<u8>> {
        let version = BigInt::zero();
        let dp = self.dp()?;
        let dq = self.dq()?;
        let qi = self.qi()?;
        Ok(encode_sequence(&[
            &version, &self.n, &self.e, &self.d, &self.p, &self.q, &dp, &dq, &qi,
        ]))
    }

    /// Parse a two-prime key. The stored CRT values are skipped since they
    /// are always rederived from `p`, `q` and `d`.
    pub fn from_der(der: &[u8]) -> CryptoResult<Self> {
        let fields = decode_integer_sequence(der)?;
        let Ok([version, n, e, d, p, q, _dp, _dq, _qi]) = <[BigInt; 9]>::try_from(fields) else {
            return Err(CryptoError::InvalidDer("expected 9 integers"));
        };
        if !version.is_zero() {
            return Err(CryptoError::InvalidDer("unsupported version"));
        }
        Ok(Self { n, e, d, p, q })
    }

    pub fn to_base64(&self) -> CryptoResult<String> {
        Ok(base64::encode(&self.to_der()?))
    }

    pub fn from_base64(text: &str) -> CryptoResult<Self> {
        let der = base64::decode(text)?;
        Self::from_der(&der).map_err(|e| {
            debug!("private key rejected: {}", e);
            e
        })
    }
}
