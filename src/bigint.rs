// Arbitrary-precision integer
// Sign-magnitude representation over little-endian base 2^32 limbs

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Shl, Shr, Sub};
use std::str::FromStr;

use crate::error::{CryptoError, CryptoResult};

/// Signed big integer.
///
/// The magnitude never carries superfluous high zero limbs, and zero is
/// always `[0]` with a non-negative sign, so derived equality is exact.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BigInt {
    negative: bool,
    magnitude: Vec<u32>,
}

// ----------------------------------------------------------------------------
// Magnitude helpers (unsigned, little-endian limbs, trimmed inputs)
// ----------------------------------------------------------------------------

fn trim(mag: &mut Vec<u32>) {
    while mag.len() > 1 && mag.last() == Some(&0) {
        mag.pop();
    }
    if mag.is_empty() {
        mag.push(0);
    }
}

fn is_zero_mag(a: &[u32]) -> bool {
    a.iter().all(|&l| l == 0)
}

fn cmp_mag(a: &[u32], b: &[u32]) -> Ordering {
    if a.len() != b.len() {
        return a.len().cmp(&b.len());
    }
    for (x, y) in a.iter().rev().zip(b.iter().rev()) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

fn add_mag(a: &[u32], b: &[u32]) -> Vec<u32> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = Vec::with_capacity(long.len() + 1);
    let mut carry = 0u64;
    for (i, &limb) in long.iter().enumerate() {
        let sum = limb as u64 + short.get(i).copied().unwrap_or(0) as u64 + carry;
        out.push(sum as u32);
        carry = sum >> 32;
    }
    if carry != 0 {
        out.push(carry as u32);
    }
    trim(&mut out);
    out
}

/// `a - b`, requires `a >= b`
fn sub_mag(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len());
    let mut borrow = 0i64;
    for (i, &limb) in a.iter().enumerate() {
        let mut diff = limb as i64 - b.get(i).copied().unwrap_or(0) as i64 - borrow;
        if diff < 0 {
            diff += 1 << 32;
            borrow = 1;
        } else {
            borrow = 0;
        }
        out.push(diff as u32);
    }
    trim(&mut out);
    out
}

/// Schoolbook multiplication, cost proportional to limbs(a) * limbs(b)
fn mul_mag(a: &[u32], b: &[u32]) -> Vec<u32> {
    if is_zero_mag(a) || is_zero_mag(b) {
        return vec![0];
    }
    let mut out = vec![0u32; a.len() + b.len()];
    for (i, &x) in a.iter().enumerate() {
        if x == 0 {
            continue;
        }
        let mut carry = 0u64;
        for (j, &y) in b.iter().enumerate() {
            let t = x as u64 * y as u64 + out[i + j] as u64 + carry;
            out[i + j] = t as u32;
            carry = t >> 32;
        }
        let mut k = i + b.len();
        while carry != 0 {
            let t = out[k] as u64 + carry;
            out[k] = t as u32;
            carry = t >> 32;
            k += 1;
        }
    }
    trim(&mut out);
    out
}

fn shl_mag(a: &[u32], bits: usize) -> Vec<u32> {
    if is_zero_mag(a) {
        return vec![0];
    }
    let limb_shift = bits / 32;
    let bit_shift = (bits % 32) as u32;
    let mut out = vec![0u32; limb_shift];
    out.reserve(a.len() + 1);
    if bit_shift == 0 {
        out.extend_from_slice(a);
    } else {
        let mut carry = 0u32;
        for &limb in a {
            out.push((limb << bit_shift) | carry);
            carry = limb >> (32 - bit_shift);
        }
        if carry != 0 {
            out.push(carry);
        }
    }
    trim(&mut out);
    out
}

fn shr_mag(a: &[u32], bits: usize) -> Vec<u32> {
    let limb_shift = bits / 32;
    if limb_shift >= a.len() {
        return vec![0];
    }
    let bit_shift = (bits % 32) as u32;
    let src = &a[limb_shift..];
    let mut out = Vec::with_capacity(src.len());
    for i in 0..src.len() {
        if bit_shift == 0 {
            out.push(src[i]);
        } else {
            let high = src.get(i + 1).copied().unwrap_or(0);
            out.push((src[i] >> bit_shift) | (high << (32 - bit_shift)));
        }
    }
    trim(&mut out);
    out
}

fn divrem_small(u: &[u32], d: u32) -> (Vec<u32>, u32) {
    let mut q = vec![0u32; u.len()];
    let mut rem = 0u64;
    for i in (0..u.len()).rev() {
        let cur = (rem << 32) | u[i] as u64;
        q[i] = (cur / d as u64) as u32;
        rem = cur % d as u64;
    }
    trim(&mut q);
    (q, rem as u32)
}

/// Long division on limbs (Knuth, TAOCP vol. 2, 4.3.1 Algorithm D).
/// Requires `v` trimmed with at least two limbs and `u >= v`.
fn divrem_knuth(u: &[u32], v: &[u32]) -> (Vec<u32>, Vec<u32>) {
    const BASE: u64 = 1 << 32;
    let n = v.len();
    let m = u.len() - n;
    let s = v[n - 1].leading_zeros();

    // Normalize so the divisor's top bit is set
    let mut vn = vec![0u32; n];
    let mut un = vec![0u32; u.len() + 1];
    if s == 0 {
        vn.copy_from_slice(v);
        un[..u.len()].copy_from_slice(u);
    } else {
        for i in (1..n).rev() {
            vn[i] = (v[i] << s) | (v[i - 1] >> (32 - s));
        }
        vn[0] = v[0] << s;
        un[u.len()] = u[u.len() - 1] >> (32 - s);
        for i in (1..u.len()).rev() {
            un[i] = (u[i] << s) | (u[i - 1] >> (32 - s));
        }
        un[0] = u[0] << s;
    }

    let mut q = vec![0u32; m + 1];
    let v_top = vn[n - 1] as u64;
    let v_next = vn[n - 2] as u64;

    for j in (0..=m).rev() {
        let num = ((un[j + n] as u64) << 32) | un[j + n - 1] as u64;
        let mut qhat = num / v_top;
        let mut rhat = num % v_top;
        loop {
            if qhat >= BASE || qhat * v_next > ((rhat << 32) | un[j + n - 2] as u64) {
                qhat -= 1;
                rhat += v_top;
                if rhat < BASE {
                    continue;
                }
            }
            break;
        }

        // Multiply and subtract
        let mut k: i64 = 0;
        for i in 0..n {
            let p = qhat * vn[i] as u64;
            let t = un[i + j] as i64 - k - (p & 0xFFFF_FFFF) as i64;
            un[i + j] = t as u32;
            k = (p >> 32) as i64 - (t >> 32);
        }
        let t = un[j + n] as i64 - k;
        un[j + n] = t as u32;

        if t < 0 {
            // Estimate was one too large, add the divisor back
            q[j] = (qhat - 1) as u32;
            let mut carry = 0u64;
            for i in 0..n {
                let t = un[i + j] as u64 + vn[i] as u64 + carry;
                un[i + j] = t as u32;
                carry = t >> 32;
            }
            un[j + n] = un[j + n].wrapping_add(carry as u32);
        } else {
            q[j] = qhat as u32;
        }
    }

    let mut r = vec![0u32; n];
    for i in 0..n {
        r[i] = if s == 0 {
            un[i]
        } else {
            (un[i] >> s) | (un[i + 1] << (32 - s))
        };
    }
    trim(&mut q);
    trim(&mut r);
    (q, r)
}

/// Quotient and remainder of magnitudes, `b` must be non-zero
fn divrem_mag(a: &[u32], b: &[u32]) -> (Vec<u32>, Vec<u32>) {
    if cmp_mag(a, b) == Ordering::Less {
        return (vec![0], a.to_vec());
    }
    if b.len() == 1 {
        let (q, r) = divrem_small(a, b[0]);
        return (q, vec![r]);
    }
    divrem_knuth(a, b)
}

fn rem_mag(a: &[u32], m: &[u32]) -> Vec<u32> {
    divrem_mag(a, m).1
}

// ----------------------------------------------------------------------------
// BigInt
// ----------------------------------------------------------------------------

impl BigInt {
    fn from_parts(negative: bool, mut magnitude: Vec<u32>) -> Self {
        trim(&mut magnitude);
        let negative = negative && !is_zero_mag(&magnitude);
        Self { negative, magnitude }
    }

    pub fn zero() -> Self {
        Self {
            negative: false,
            magnitude: vec![0],
        }
    }

    pub fn one() -> Self {
        Self {
            negative: false,
            magnitude: vec![1],
        }
    }

    /// Create a non-negative value from little-endian limbs
    pub fn from_limbs(limbs: Vec<u32>) -> Self {
        Self::from_parts(false, limbs)
    }

    /// Little-endian limbs of the magnitude
    pub fn limbs(&self) -> &[u32] {
        &self.magnitude
    }

    /// Create a non-negative value from big-endian bytes
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        let mut limbs = Vec::with_capacity(bytes.len() / 4 + 1);
        for chunk in bytes.rchunks(4) {
            let mut limb = 0u32;
            for &b in chunk {
                limb = (limb << 8) | b as u32;
            }
            limbs.push(limb);
        }
        Self::from_parts(false, limbs)
    }

    /// Minimal big-endian bytes of the magnitude (`[0]` for zero)
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self
            .magnitude
            .iter()
            .rev()
            .flat_map(|limb| limb.to_be_bytes())
            .collect();
        let first = bytes
            .iter()
            .position(|&b| b != 0)
            .unwrap_or(bytes.len() - 1);
        bytes.drain(..first);
        bytes
    }

    /// Big-endian bytes left-padded with zeros to exactly `len` bytes.
    /// Returns `None` if the magnitude does not fit.
    pub fn to_bytes_be_padded(&self, len: usize) -> Option<Vec<u8>> {
        if self.is_zero() {
            return Some(vec![0u8; len]);
        }
        let bytes = self.to_bytes_be();
        if bytes.len() > len {
            return None;
        }
        let mut out = vec![0u8; len - bytes.len()];
        out.extend_from_slice(&bytes);
        Some(out)
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.len() == 1 && self.magnitude[0] == 0
    }

    pub fn is_one(&self) -> bool {
        !self.negative && self.magnitude.len() == 1 && self.magnitude[0] == 1
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_odd(&self) -> bool {
        self.magnitude[0] & 1 == 1
    }

    pub fn is_even(&self) -> bool {
        !self.is_odd()
    }

    /// Number of significant bits in the magnitude (0 for zero)
    pub fn bit_length(&self) -> usize {
        let top = self.magnitude[self.magnitude.len() - 1];
        if top == 0 {
            return 0;
        }
        (self.magnitude.len() - 1) * 32 + (32 - top.leading_zeros() as usize)
    }

    /// Bit `i` of the magnitude
    pub fn bit(&self, i: usize) -> bool {
        self.magnitude
            .get(i / 32)
            .map_or(false, |limb| (limb >> (i % 32)) & 1 == 1)
    }

    pub fn abs(&self) -> Self {
        Self {
            negative: false,
            magnitude: self.magnitude.clone(),
        }
    }

    /// Truncating division: the quotient rounds toward zero and the
    /// remainder takes the sign of the dividend, so
    /// `self == q * divisor + r` always holds.
    pub fn div_rem(&self, divisor: &BigInt) -> CryptoResult<(BigInt, BigInt)> {
        if divisor.is_zero() {
            return Err(CryptoError::DivideByZero);
        }
        let (q, r) = divrem_mag(&self.magnitude, &divisor.magnitude);
        Ok((
            Self::from_parts(self.negative != divisor.negative, q),
            Self::from_parts(self.negative, r),
        ))
    }

    pub fn checked_div(&self, divisor: &BigInt) -> CryptoResult<BigInt> {
        self.div_rem(divisor).map(|(q, _)| q)
    }

    pub fn checked_rem(&self, divisor: &BigInt) -> CryptoResult<BigInt> {
        self.div_rem(divisor).map(|(_, r)| r)
    }

    /// Remainder normalized into `[0, |modulus|)`
    pub fn modulo(&self, modulus: &BigInt) -> CryptoResult<BigInt> {
        if modulus.is_zero() {
            return Err(CryptoError::DivideByZero);
        }
        let r = rem_mag(&self.magnitude, &modulus.magnitude);
        if self.negative && !is_zero_mag(&r) {
            Ok(Self::from_parts(false, sub_mag(&modulus.magnitude, &r)))
        } else {
            Ok(Self::from_parts(false, r))
        }
    }

    /// Remainder of the magnitude by a single limb
    pub fn rem_u32(&self, divisor: u32) -> CryptoResult<u32> {
        if divisor == 0 {
            return Err(CryptoError::DivideByZero);
        }
        let mut rem = 0u64;
        for &limb in self.magnitude.iter().rev() {
            rem = ((rem << 32) | limb as u64) % divisor as u64;
        }
        Ok(rem as u32)
    }

    /// `self^exp mod modulus` by left-to-right square-and-multiply.
    ///
    /// The result lies in `[0, |modulus|)`. A zero modulus is rejected with
    /// `DivideByZero` and a negative exponent with `NegativeExponent`.
    pub fn mod_pow(&self, exp: &BigInt, modulus: &BigInt) -> CryptoResult<BigInt> {
        if modulus.is_zero() {
            return Err(CryptoError::DivideByZero);
        }
        if exp.negative {
            return Err(CryptoError::NegativeExponent);
        }
        let m = &modulus.magnitude;
        if m.len() == 1 && m[0] == 1 {
            return Ok(Self::zero());
        }

        let base = self.modulo(modulus)?.magnitude;
        let mut result = vec![1u32];
        for i in (0..exp.bit_length()).rev() {
            result = rem_mag(&mul_mag(&result, &result), m);
            if exp.bit(i) {
                result = rem_mag(&mul_mag(&result, &base), m);
            }
        }
        Ok(Self::from_parts(false, result))
    }

    /// Multiplicative inverse modulo `modulus` via the extended Euclidean
    /// algorithm, normalized into `[0, |modulus|)`.
    pub fn mod_inverse(&self, modulus: &BigInt) -> CryptoResult<BigInt> {
        if modulus.is_zero() {
            return Err(CryptoError::DivideByZero);
        }
        let m = modulus.abs();
        let mut old_r = self.modulo(&m)?;
        let mut r = m.clone();
        let mut old_s = Self::one();
        let mut s = Self::zero();

        while !r.is_zero() {
            let (q, rem) = old_r.div_rem(&r)?;
            old_r = std::mem::replace(&mut r, rem);
            let next_s = &old_s - &(&q * &s);
            old_s = std::mem::replace(&mut s, next_s);
        }

        if !old_r.is_one() {
            return Err(CryptoError::NotInvertible);
        }
        old_s.modulo(&m)
    }

    /// Greatest common divisor of the magnitudes
    pub fn gcd(&self, other: &BigInt) -> BigInt {
        let mut a = self.magnitude.clone();
        let mut b = other.magnitude.clone();
        while !is_zero_mag(&b) {
            let r = rem_mag(&a, &b);
            a = std::mem::replace(&mut b, r);
        }
        Self::from_parts(false, a)
    }

    /// Lowercase hex digits, `-` prefixed when negative, no `0x`
    pub fn to_hex_string(&self) -> String {
        let mut out = String::with_capacity(self.magnitude.len() * 8 + 1);
        if self.negative {
            out.push('-');
        }
        let mut limbs = self.magnitude.iter().rev();
        if let Some(top) = limbs.next() {
            out.push_str(&format!("{:x}", top));
        }
        for limb in limbs {
            out.push_str(&format!("{:08x}", limb));
        }
        out
    }

    /// Parse hex digits with an optional leading `-` and no `0x` prefix
    pub fn from_hex_string(text: &str) -> CryptoResult<BigInt> {
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CryptoError::InvalidHex);
        }
        let mut limbs = Vec::with_capacity(digits.len() / 8 + 1);
        let bytes = digits.as_bytes();
        for chunk in bytes.rchunks(8) {
            let mut limb = 0u32;
            for &b in chunk {
                let nibble = (b as char).to_digit(16).ok_or(CryptoError::InvalidHex)?;
                limb = (limb << 4) | nibble;
            }
            limbs.push(limb);
        }
        Ok(Self::from_parts(negative, limbs))
    }
}

impl Default for BigInt {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<u32> for BigInt {
    fn from(n: u32) -> Self {
        Self::from_parts(false, vec![n])
    }
}

impl From<u64> for BigInt {
    fn from(n: u64) -> Self {
        Self::from_parts(false, vec![n as u32, (n >> 32) as u32])
    }
}

impl From<i64> for BigInt {
    fn from(n: i64) -> Self {
        let mag = n.unsigned_abs();
        Self::from_parts(n < 0, vec![mag as u32, (mag >> 32) as u32])
    }
}

impl FromStr for BigInt {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex_string(s)
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

impl fmt::LowerHex for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigInt({})", self.to_hex_string())
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => cmp_mag(&self.magnitude, &other.magnitude),
            (true, true) => cmp_mag(&other.magnitude, &self.magnitude),
        }
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a> Add<&'a BigInt> for &'a BigInt {
    type Output = BigInt;

    fn add(self, rhs: &'a BigInt) -> BigInt {
        if self.negative == rhs.negative {
            return BigInt::from_parts(self.negative, add_mag(&self.magnitude, &rhs.magnitude));
        }
        match cmp_mag(&self.magnitude, &rhs.magnitude) {
            Ordering::Equal => BigInt::zero(),
            Ordering::Greater => {
                BigInt::from_parts(self.negative, sub_mag(&self.magnitude, &rhs.magnitude))
            }
            Ordering::Less => {
                BigInt::from_parts(rhs.negative, sub_mag(&rhs.magnitude, &self.magnitude))
            }
        }
    }
}

impl<'a> Sub<&'a BigInt> for &'a BigInt {
    type Output = BigInt;

    fn sub(self, rhs: &'a BigInt) -> BigInt {
        self + &(-rhs)
    }
}

impl<'a> Mul<&'a BigInt> for &'a BigInt {
    type Output = BigInt;

    fn mul(self, rhs: &'a BigInt) -> BigInt {
        BigInt::from_parts(
            self.negative != rhs.negative,
            mul_mag(&self.magnitude, &rhs.magnitude),
        )
    }
}

macro_rules! forward_owned_binop {
    ($($imp:ident :: $method:ident),*) => {
        $(
            impl $imp<BigInt> for BigInt {
                type Output = BigInt;

                fn $method(self, rhs: BigInt) -> BigInt {
                    (&self).$method(&rhs)
                }
            }

            impl<'a> $imp<&'a BigInt> for BigInt {
                type Output = BigInt;

                fn $method(self, rhs: &'a BigInt) -> BigInt {
                    (&self).$method(rhs)
                }
            }
        )*
    };
}

forward_owned_binop!(Add::add, Sub::sub, Mul::mul);

impl Neg for &BigInt {
    type Output = BigInt;

    fn neg(self) -> BigInt {
        BigInt::from_parts(!self.negative, self.magnitude.clone())
    }
}

impl Neg for BigInt {
    type Output = BigInt;

    fn neg(self) -> BigInt {
        BigInt::from_parts(!self.negative, self.magnitude)
    }
}

impl Shl<usize> for &BigInt {
    type Output = BigInt;

    fn shl(self, bits: usize) -> BigInt {
        BigInt::from_parts(self.negative, shl_mag(&self.magnitude, bits))
    }
}

impl Shl<usize> for BigInt {
    type Output = BigInt;

    fn shl(self, bits: usize) -> BigInt {
        &self << bits
    }
}

/// Shifts the magnitude, so negative values round toward zero
impl Shr<usize> for &BigInt {
    type Output = BigInt;

    fn shr(self, bits: usize) -> BigInt {
        BigInt::from_parts(self.negative, shr_mag(&self.magnitude, bits))
    }
}

impl Shr<usize> for BigInt {
    type Output = BigInt;

    fn shr(self, bits: usize) -> BigInt {
        &self >> bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> BigInt {
        BigInt::from_hex_string(s).unwrap()
    }

    #[test]
    fn test_zero_is_canonical() {
        let zero = BigInt::zero();
        assert_eq!(zero.limbs(), &[0]);
        assert!(!zero.is_negative());

        let x = BigInt::from(5i64);
        let diff = &x - &x;
        assert_eq!(diff, zero);
        assert!(!diff.is_negative());

        assert_eq!(hex("-0"), zero);
        assert_eq!(BigInt::from_limbs(vec![0, 0, 0]).limbs(), &[0]);
        assert_eq!(-BigInt::zero(), zero);
    }

    #[test]
    fn test_trim_after_arithmetic() {
        let a = hex("100000000");
        let b = hex("1");
        let diff = &a - &b;
        assert_eq!(diff.limbs(), &[0xFFFF_FFFF]);
        assert_eq!((&a >> 32).limbs(), &[1]);
    }

    #[test]
    fn test_hex_roundtrip() {
        for s in ["0", "1", "ff", "-ff", "100000000", "deadbeefcafebabe0123456789"] {
            assert_eq!(hex(s).to_hex_string(), s);
        }
        assert_eq!(hex("000ff").to_hex_string(), "ff");
        assert_eq!(hex("ABCDEF").to_hex_string(), "abcdef");
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert_eq!(BigInt::from_hex_string(""), Err(CryptoError::InvalidHex));
        assert_eq!(BigInt::from_hex_string("-"), Err(CryptoError::InvalidHex));
        assert_eq!(BigInt::from_hex_string("0x10"), Err(CryptoError::InvalidHex));
        assert_eq!(BigInt::from_hex_string("12g4"), Err(CryptoError::InvalidHex));
    }

    #[test]
    fn test_signed_add_sub() {
        let a = BigInt::from(-7i64);
        let b = BigInt::from(10i64);
        assert_eq!(&a + &b, BigInt::from(3i64));
        assert_eq!(&a - &b, BigInt::from(-17i64));
        assert_eq!(&b - &a, BigInt::from(17i64));
        assert_eq!(&a + &a, BigInt::from(-14i64));
    }

    #[test]
    fn test_carry_across_limbs() {
        let a = hex("ffffffffffffffff");
        let sum = &a + &BigInt::one();
        assert_eq!(sum.to_hex_string(), "10000000000000000");
        assert_eq!(&sum - &BigInt::one(), a);
    }

    #[test]
    fn test_mul() {
        let a = hex("ffffffffffffffff");
        assert_eq!((&a * &a).to_hex_string(), "fffffffffffffffe0000000000000001");
        assert_eq!(BigInt::from(-3i64) * BigInt::from(4i64), BigInt::from(-12i64));
        assert_eq!(BigInt::from(-3i64) * BigInt::zero(), BigInt::zero());
    }

    #[test]
    fn test_div_rem_truncates() {
        let (q, r) = BigInt::from(-7i64).div_rem(&BigInt::from(2i64)).unwrap();
        assert_eq!(q, BigInt::from(-3i64));
        assert_eq!(r, BigInt::from(-1i64));

        let (q, r) = BigInt::from(7i64).div_rem(&BigInt::from(-2i64)).unwrap();
        assert_eq!(q, BigInt::from(-3i64));
        assert_eq!(r, BigInt::from(1i64));
    }

    #[test]
    fn test_multi_limb_division() {
        let a = hex("fffffffffffffffe0000000000000001");
        let b = hex("ffffffffffffffff");
        let (q, r) = a.div_rem(&b).unwrap();
        assert_eq!(q, b);
        assert!(r.is_zero());

        let n = hex("123456789abcdef0123456789abcdef0123456789");
        let d = hex("fedcba9876543210f");
        let (q, r) = n.div_rem(&d).unwrap();
        assert_eq!(&(&q * &d) + &r, n);
        assert!(r < d);
    }

    #[test]
    fn test_division_by_zero() {
        let a = BigInt::from(42i64);
        assert_eq!(a.div_rem(&BigInt::zero()), Err(CryptoError::DivideByZero));
        assert_eq!(a.modulo(&BigInt::zero()), Err(CryptoError::DivideByZero));
        assert_eq!(a.rem_u32(0), Err(CryptoError::DivideByZero));
        assert_eq!(
            a.mod_pow(&BigInt::one(), &BigInt::zero()),
            Err(CryptoError::DivideByZero)
        );
        assert_eq!(a.mod_inverse(&BigInt::zero()), Err(CryptoError::DivideByZero));
    }

    #[test]
    fn test_modulo_is_non_negative() {
        let m = BigInt::from(7i64);
        assert_eq!(BigInt::from(-1i64).modulo(&m).unwrap(), BigInt::from(6i64));
        assert_eq!(BigInt::from(-14i64).modulo(&m).unwrap(), BigInt::zero());
        assert_eq!(BigInt::from(15i64).modulo(&m).unwrap(), BigInt::one());
    }

    #[test]
    fn test_shifts() {
        let one = BigInt::one();
        let big = &one << 100;
        assert_eq!(big.bit_length(), 101);
        assert!(big.bit(100));
        assert!(!big.bit(99));
        assert_eq!(&big >> 100, one);
        assert_eq!(&big >> 101, BigInt::zero());
        assert_eq!(BigInt::from(-8i64) >> 1, BigInt::from(-4i64));
    }

    #[test]
    fn test_ordering() {
        let values: Vec<BigInt> = [-300i64, -2, 0, 1, 5, 1 << 40]
            .iter()
            .map(|&v| BigInt::from(v))
            .collect();
        for pair in values.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0] <= pair[1]);
        }
        assert!(BigInt::from(3i64) <= BigInt::from(3i64));
    }

    #[test]
    fn test_mod_pow() {
        // 3^5 mod 7 = 243 mod 7 = 5
        let r = BigInt::from(3i64)
            .mod_pow(&BigInt::from(5i64), &BigInt::from(7i64))
            .unwrap();
        assert_eq!(r, BigInt::from(5i64));

        // Fermat: 2^(p-1) mod p = 1 for p = 2^61 - 1
        let p = hex("1fffffffffffffff");
        let r = BigInt::from(2i64).mod_pow(&(&p - &BigInt::one()), &p).unwrap();
        assert!(r.is_one());

        let r = BigInt::from(-2i64)
            .mod_pow(&BigInt::from(3i64), &BigInt::from(5i64))
            .unwrap();
        assert_eq!(r, BigInt::from(2i64));

        assert_eq!(
            BigInt::from(9i64)
                .mod_pow(&BigInt::zero(), &BigInt::from(5i64))
                .unwrap(),
            BigInt::one()
        );
        assert_eq!(
            BigInt::from(9i64)
                .mod_pow(&BigInt::from(-1i64), &BigInt::from(5i64)),
            Err(CryptoError::NegativeExponent)
        );
    }

    #[test]
    fn test_mod_inverse() {
        // 3 * 5 = 15 ≡ 1 mod 7, so inverse of 3 mod 7 is 5
        let inv = BigInt::from(3i64).mod_inverse(&BigInt::from(7i64)).unwrap();
        assert_eq!(inv, BigInt::from(5i64));

        let e = BigInt::from(65537i64);
        let phi = &BigInt::one() << 128;
        let d = e.mod_inverse(&phi).unwrap();
        assert!((&e * &d).modulo(&phi).unwrap().is_one());
        assert!(!d.is_negative());

        assert_eq!(
            BigInt::from(4i64).mod_inverse(&BigInt::from(8i64)),
            Err(CryptoError::NotInvertible)
        );
    }

    #[test]
    fn test_bytes_roundtrip() {
        let bytes = [0x00, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05];
        let n = BigInt::from_bytes_be(&bytes);
        assert_eq!(n.to_hex_string(), "102030405");
        assert_eq!(n.to_bytes_be(), vec![1, 2, 3, 4, 5]);
        assert_eq!(n.to_bytes_be_padded(8).unwrap(), vec![0, 0, 0, 1, 2, 3, 4, 5]);
        assert!(n.to_bytes_be_padded(4).is_none());
        assert_eq!(BigInt::zero().to_bytes_be(), vec![0]);
        assert_eq!(BigInt::from_bytes_be(&[]), BigInt::zero());
    }

    #[test]
    fn test_rem_u32_and_gcd() {
        let n = hex("123456789abcdef0123456789");
        let r = n.rem_u32(97).unwrap();
        assert_eq!(BigInt::from(r), n.modulo(&BigInt::from(97u32)).unwrap());

        let g = BigInt::from(48i64).gcd(&BigInt::from(-36i64));
        assert_eq!(g, BigInt::from(12i64));
    }
}
