//! SSN field encryption
//!
//! Social security numbers are encrypted with AES-256-GCM before they are
//! written to the users table. The 256-bit key is derived by hashing the
//! configured secret; each encryption uses a fresh random 12-byte nonce and
//! the payload is packaged as `nonce || tag || ciphertext`, base64-encoded.
//! Decryption fails closed when the authentication tag does not verify.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

const NONCE_LENGTH: usize = 12;
const AUTH_TAG_LENGTH: usize = 16;

/// Errors raised by SSN encryption and decryption
#[derive(Error, Debug, PartialEq)]
pub enum CryptoError {
    /// The payload is not valid base64 or is too short to contain a nonce
    /// and authentication tag
    #[error("Encrypted payload is malformed")]
    MalformedPayload,

    /// Encryption itself failed
    #[error("Encryption failed")]
    Encryption,

    /// The authentication tag did not verify, or the plaintext was not
    /// valid UTF-8
    #[error("Decryption failed")]
    Decryption,
}

/// Authenticated symmetric cipher for the SSN column
#[derive(Clone)]
pub struct SsnCipher {
    cipher: Aes256Gcm,
}

impl SsnCipher {
    /// Derive the cipher from the configured secret
    pub fn new(secret: &str) -> Self {
        let key_bytes = Sha256::digest(secret.as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(&key_bytes);

        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Encrypt an SSN for storage
    pub fn encrypt(&self, ssn: &str) -> Result<String, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        // The aead API appends the tag to the ciphertext; split it back out
        // so the stored layout is nonce || tag || ciphertext.
        let mut sealed = self
            .cipher
            .encrypt(nonce, ssn.as_bytes())
            .map_err(|_| CryptoError::Encryption)?;
        let tag = sealed.split_off(sealed.len() - AUTH_TAG_LENGTH);

        let mut payload = Vec::with_capacity(NONCE_LENGTH + AUTH_TAG_LENGTH + sealed.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&tag);
        payload.extend_from_slice(&sealed);

        Ok(BASE64.encode(payload))
    }

    /// Decrypt a stored SSN payload
    pub fn decrypt(&self, payload: &str) -> Result<String, CryptoError> {
        let buffer = BASE64
            .decode(payload)
            .map_err(|_| CryptoError::MalformedPayload)?;

        if buffer.len() < NONCE_LENGTH + AUTH_TAG_LENGTH {
            return Err(CryptoError::MalformedPayload);
        }

        let (nonce_bytes, rest) = buffer.split_at(NONCE_LENGTH);
        let (tag, ciphertext) = rest.split_at(AUTH_TAG_LENGTH);

        let mut sealed = Vec::with_capacity(ciphertext.len() + AUTH_TAG_LENGTH);
        sealed.extend_from_slice(ciphertext);
        sealed.extend_from_slice(tag);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), sealed.as_ref())
            .map_err(|_| CryptoError::Decryption)?;

        String::from_utf8(plaintext).map_err(|_| CryptoError::Decryption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> SsnCipher {
        SsnCipher::new("unit-test-ssn-secret")
    }

    #[test]
    fn round_trips_nine_digit_ssns() {
        let cipher = cipher();
        for ssn in ["123456789", "000000000", "999999999", "078051120"] {
            let sealed = cipher.encrypt(ssn).unwrap();
            assert_eq!(cipher.decrypt(&sealed).unwrap(), ssn);
        }
    }

    #[test]
    fn encryption_is_randomized() {
        let cipher = cipher();
        let first = cipher.encrypt("123456789").unwrap();
        let second = cipher.encrypt("123456789").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn tampered_tag_fails_closed() {
        let cipher = cipher();
        let sealed = cipher.encrypt("123456789").unwrap();

        let mut bytes = BASE64.decode(&sealed).unwrap();
        // Flip a byte inside the authentication tag.
        bytes[NONCE_LENGTH] ^= 0x01;
        let tampered = BASE64.encode(bytes);

        assert_eq!(cipher.decrypt(&tampered), Err(CryptoError::Decryption));
    }

    #[test]
    fn tampered_ciphertext_fails_closed() {
        let cipher = cipher();
        let sealed = cipher.encrypt("123456789").unwrap();

        let mut bytes = BASE64.decode(&sealed).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x80;
        let tampered = BASE64.encode(bytes);

        assert_eq!(cipher.decrypt(&tampered), Err(CryptoError::Decryption));
    }

    #[test]
    fn wrong_key_fails_closed() {
        let sealed = cipher().encrypt("123456789").unwrap();
        let other = SsnCipher::new("a-different-secret");
        assert_eq!(other.decrypt(&sealed), Err(CryptoError::Decryption));
    }

    #[test]
    fn rejects_malformed_payloads() {
        let cipher = cipher();
        assert_eq!(
            cipher.decrypt("not-base64!!!"),
            Err(CryptoError::MalformedPayload)
        );
        assert_eq!(
            cipher.decrypt(&BASE64.encode([0u8; 8])),
            Err(CryptoError::MalformedPayload)
        );
    }
}
