//! Password hashing for signup credentials.
//!
//! PBKDF2-HMAC-SHA256 with a fresh random salt per password. The stored
//! form is base64(salt || digest), so verification needs no separate salt
//! column.

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 32;
const DIGEST_LEN: usize = 32;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);

    let digest = pbkdf2_sha256(password.as_bytes(), &salt, ITERATIONS);

    let mut combined = Vec::with_capacity(SALT_LEN + DIGEST_LEN);
    combined.extend_from_slice(&salt);
    combined.extend_from_slice(&digest);
    general_purpose::STANDARD.encode(combined)
}

/// Verify a password against a stored hash. Any malformed stored value
/// verifies as false rather than erroring.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(combined) = general_purpose::STANDARD.decode(stored_hash) else {
        return false;
    };
    if combined.len() != SALT_LEN + DIGEST_LEN {
        return false;
    }

    let (salt, expected) = combined.split_at(SALT_LEN);
    let digest = pbkdf2_sha256(password.as_bytes(), salt, ITERATIONS);
    constant_time_eq(&digest, expected)
}

/// PBKDF2 with a single SHA-256-sized output block.
fn pbkdf2_sha256(password: &[u8], salt: &[u8], iterations: u32) -> [u8; DIGEST_LEN] {
    let mut mac =
        HmacSha256::new_from_slice(password).expect("HMAC can take key of any size");
    mac.update(salt);
    mac.update(&1u32.to_be_bytes());
    let mut block = mac.finalize().into_bytes();

    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&block);

    for _ in 1..iterations {
        let mut mac =
            HmacSha256::new_from_slice(password).expect("HMAC can take key of any size");
        mac.update(&block);
        block = mac.finalize().into_bytes();
        for (acc, byte) in out.iter_mut().zip(block.iter()) {
            *acc ^= byte;
        }
    }
    out
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_the_password_it_hashed() {
        let stored = hash_password("correct horse battery staple");
        assert!(verify_password("correct horse battery staple", &stored));
    }

    #[test]
    fn rejects_a_wrong_password() {
        let stored = hash_password("correct horse battery staple");
        assert!(!verify_password("incorrect horse", &stored));
    }

    #[test]
    fn salts_are_unique_per_hash() {
        let a = hash_password("same password");
        let b = hash_password("same password");
        assert_ne!(a, b);
        assert!(verify_password("same password", &a));
        assert!(verify_password("same password", &b));
    }

    #[test]
    fn malformed_stored_values_verify_false() {
        assert!(!verify_password("anything", "not base64!!"));
        assert!(!verify_password("anything", ""));
        // Valid base64 but the wrong length.
        assert!(!verify_password(
            "anything",
            &general_purpose::STANDARD.encode([0u8; 7])
        ));
    }
}
