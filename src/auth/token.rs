// src/auth/token.rs
use base64::Engine;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};

pub const SESSION_TOKEN_BYTES: usize = 32;
pub const PRINCIPAL_ID_LEN: usize = 28;
pub const SALT_BYTES: usize = 16;
pub const PASSWORD_ITERATIONS: u32 = 100_000;

/// Opaque session / reset token from the OS RNG.
pub fn generate_token_default() -> String {
    generate_token(&mut OsRng, SESSION_TOKEN_BYTES)
}

/// URL-safe base64 (no padding) of `nbytes` random bytes.
pub fn generate_token<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&buf)
}

/// Alphanumeric principal id, same shape as hosted auth uids.
pub fn generate_principal_id<R: Rng>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(PRINCIPAL_ID_LEN)
        .map(char::from)
        .collect()
}

/// SHA-256 of a raw token; only this is stored.
pub fn hash_token(token: &str) -> [u8; 32] {
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&Sha256::digest(token.as_bytes()));
    arr
}

pub fn generate_salt<R: RngCore>(rng: &mut R) -> [u8; SALT_BYTES] {
    let mut salt = [0u8; SALT_BYTES];
    rng.fill_bytes(&mut salt);
    salt
}

/// PBKDF2-HMAC-SHA256 password hash.
pub fn hash_password(password: &str, salt: &[u8], iterations: u32) -> [u8; 32] {
    pbkdf2::pbkdf2_hmac_array::<Sha256, 32>(password.as_bytes(), salt, iterations)
}

/// Constant-time-ish compare for hashes.
pub fn hashes_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}
