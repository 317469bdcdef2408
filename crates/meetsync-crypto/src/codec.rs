// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM secret codec for credential records at rest.
//!
//! Every call to [`encrypt`] generates a fresh random 96-bit nonce via the
//! system CSPRNG. Nonce reuse would be catastrophic for GCM security. The
//! nonce is prepended to the ciphertext+tag and the whole blob is
//! base64-encoded so it can live in a JSON string field.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};

use meetsync_core::MeetsyncError;

/// Required encryption key length in bytes.
pub const KEY_LEN: usize = 32;

const NONCE_LEN: usize = 12;

/// Encrypt `plaintext` under `key`, returning base64(nonce || ciphertext || tag).
///
/// The key must be exactly [`KEY_LEN`] bytes; any other length is a
/// configuration error, never silently truncated or padded.
pub fn encrypt(key: &str, plaintext: &str) -> Result<String, MeetsyncError> {
    let less_safe = build_key(key)?;

    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| MeetsyncError::Crypto("failed to generate random nonce".to_string()))?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    // Seal in place: plaintext buffer is extended with the authentication tag.
    let mut in_out = plaintext.as_bytes().to_vec();
    less_safe
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| MeetsyncError::Crypto("AES-256-GCM encryption failed".to_string()))?;

    let mut combined = nonce_bytes.to_vec();
    combined.extend_from_slice(&in_out);
    Ok(BASE64.encode(combined))
}

/// Decrypt a blob produced by [`encrypt`].
///
/// Truncated, corrupt, or wrong-key input is a crypto error, never a panic
/// and never silently wrong data (the GCM tag authenticates the ciphertext).
pub fn decrypt(key: &str, ciphertext_b64: &str) -> Result<String, MeetsyncError> {
    let less_safe = build_key(key)?;

    let combined = BASE64
        .decode(ciphertext_b64)
        .map_err(|_| MeetsyncError::Crypto("ciphertext is not valid base64".to_string()))?;
    if combined.len() < NONCE_LEN {
        return Err(MeetsyncError::Crypto(
            "ciphertext too short to contain a nonce".to_string(),
        ));
    }

    let (nonce_bytes, sealed) = combined.split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
        .map_err(|_| MeetsyncError::Crypto("invalid nonce".to_string()))?;

    let mut in_out = sealed.to_vec();
    let plaintext = less_safe
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| {
            MeetsyncError::Crypto(
                "AES-256-GCM decryption failed -- wrong key or corrupted data".to_string(),
            )
        })?;

    String::from_utf8(plaintext.to_vec())
        .map_err(|_| MeetsyncError::Crypto("decrypted data is not valid UTF-8".to_string()))
}

fn build_key(key: &str) -> Result<LessSafeKey, MeetsyncError> {
    let key_bytes = key.as_bytes();
    if key_bytes.len() != KEY_LEN {
        return Err(MeetsyncError::Config(format!(
            "encryption key must be exactly {KEY_LEN} bytes, got {}",
            key_bytes.len()
        )));
    }
    let unbound = UnboundKey::new(&AES_256_GCM, key_bytes)
        .map_err(|_| MeetsyncError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}
