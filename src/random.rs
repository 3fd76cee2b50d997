// Random byte source
// Prefers OS entropy and degrades to a time-seeded generator when it is unavailable

use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use log::warn;
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

/// Fallback generator, created only after the OS source has failed once.
/// Seeded from the clock, so it is NOT cryptographically secure.
static FALLBACK: OnceLock<Mutex<StdRng>> = OnceLock::new();

fn fallback_rng() -> &'static Mutex<StdRng> {
    FALLBACK.get_or_init(|| {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let seed = nanos ^ (std::process::id() as u64).rotate_left(32);
        Mutex::new(StdRng::seed_from_u64(seed))
    })
}

/// Fill `buf` with random bytes.
///
/// Reads from the operating system's CSPRNG. If that fails the buffer is
/// filled from a clock-seeded fallback generator and a warning is logged;
/// the function itself never fails.
pub fn fill_random(buf: &mut [u8]) {
    if buf.is_empty() {
        return;
    }
    if let Err(e) = OsRng.try_fill_bytes(buf) {
        warn!("OS entropy source unavailable ({}), using non-cryptographic fallback", e);
        let mut rng = match fallback_rng().lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.fill_bytes(buf);
    }
}

/// Random bytes of the given length
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    fill_random(&mut buf);
    buf
}

/// Random bytes that are all non-zero (PKCS#1 v1.5 padding string)
pub fn random_nonzero_bytes(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut chunk = [0u8; 64];
    while out.len() < len {
        fill_random(&mut chunk);
        for &b in chunk.iter().filter(|&&b| b != 0) {
            if out.len() == len {
                break;
            }
            out.push(b);
        }
    }
    out
}

/// A random 64-bit value
pub fn random_u64() -> u64 {
    let mut buf = [0u8; 8];
    fill_random(&mut buf);
    u64::from_le_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_random_changes_buffer() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        fill_random(&mut a);
        fill_random(&mut b);
        // 2^-256 chance of a false failure
        assert_ne!(a, b);
    }

    #[test]
    fn test_random_nonzero_bytes() {
        for len in [0, 1, 8, 100, 1000] {
            let bytes = random_nonzero_bytes(len);
            assert_eq!(bytes.len(), len);
            assert!(bytes.iter().all(|&b| b != 0));
        }
    }

    #[test]
    fn test_fill_random_from_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| random_bytes(16)))
            .collect();
        let results: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for r in &results {
            assert_eq!(r.len(), 16);
        }
        assert_ne!(results[0], results[1]);
    }

    #[test]
    fn test_fallback_rng_is_usable() {
        let mut buf = [0u8; 16];
        fallback_rng().lock().unwrap().fill_bytes(&mut buf);
        assert!(buf.iter().any(|&b| b != 0));
    }
}
