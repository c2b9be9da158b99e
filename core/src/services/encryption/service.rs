//! At-rest encryption service using AES-256-GCM

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

use sf_shared::config::SecurityConfig;

use crate::errors::{ConfigError, DomainError, DomainResult};

/// Required key length for AES-256.
const KEY_LENGTH: usize = 32;

/// Nonce length for AES-GCM.
const NONCE_LENGTH: usize = 12;

/// Service for encrypting sensitive values before they reach storage.
///
/// Each `encrypt` call draws a fresh random nonce, so encrypting the same
/// plaintext twice yields different envelopes. The envelope is the base64
/// encoding of `nonce || ciphertext`; the GCM tag authenticates the data,
/// so any tampering makes `decrypt` fail.
pub struct EncryptionService {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionService").finish_non_exhaustive()
    }
}

impl EncryptionService {
    /// Creates an encryption service from a raw key.
    ///
    /// Fails with `ConfigError::InvalidAesKeyLength` unless the key is
    /// exactly 32 bytes.
    pub fn new(key: &[u8]) -> DomainResult<Self> {
        if key.len() != KEY_LENGTH {
            return Err(DomainError::Config(ConfigError::InvalidAesKeyLength {
                expected: KEY_LENGTH,
                actual: key.len(),
            }));
        }

        let key = Key::<Aes256Gcm>::from_slice(key);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    /// Creates an encryption service from the application security
    /// configuration.
    pub fn from_config(config: &SecurityConfig) -> DomainResult<Self> {
        Self::new(config.aes_secret_key.as_bytes())
    }

    /// Generate a random nonce for AES-GCM
    fn generate_nonce() -> [u8; NONCE_LENGTH] {
        let mut nonce = [0u8; NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce);
        nonce
    }

    /// Encrypts a plaintext into a base64 `nonce || ciphertext` envelope.
    pub fn encrypt(&self, plaintext: &str) -> DomainResult<String> {
        let nonce_bytes = Self::generate_nonce();
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| DomainError::Internal {
                message: format!("Encryption failed: {}", e),
            })?;

        let mut envelope = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(envelope))
    }

    /// Decrypts a base64 envelope produced by [`encrypt`](Self::encrypt).
    ///
    /// Fails when the envelope is malformed, when it was produced under a
    /// different key, or when the ciphertext was tampered with.
    pub fn decrypt(&self, envelope: &str) -> DomainResult<String> {
        let bytes = BASE64.decode(envelope).map_err(|e| DomainError::Internal {
            message: format!("Failed to decode envelope: {}", e),
        })?;

        if bytes.len() <= NONCE_LENGTH {
            return Err(DomainError::Internal {
                message: "Envelope too short to contain a nonce".to_string(),
            });
        }

        let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LENGTH);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext =
            self.cipher
                .decrypt(nonce, ciphertext)
                .map_err(|e| DomainError::Internal {
                    message: format!("Decryption failed: {}", e),
                })?;

        String::from_utf8(plaintext).map_err(|e| DomainError::Internal {
            message: format!("Decrypted data is not valid UTF-8: {}", e),
        })
    }

    /// Computes the hex-encoded SHA-256 digest of a value, for lookups over
    /// data that never needs to be recovered.
    pub fn hash_data(data: &str) -> String {
        let digest = Sha256::digest(data.as_bytes());
        hex::encode(digest)
    }

    /// Checks a value against a stored digest using constant-time
    /// comparison.
    pub fn verify_hash(data: &str, expected: &str) -> bool {
        let digest = Self::hash_data(data);
        constant_time_eq(digest.as_bytes(), expected.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> EncryptionService {
        EncryptionService::new(&[7u8; KEY_LENGTH]).unwrap()
    }

    #[test]
    fn rejects_keys_of_the_wrong_length() {
        for len in [0, 16, 31, 33] {
            let err = EncryptionService::new(&vec![0u8; len]).unwrap_err();
            assert!(matches!(
                err,
                DomainError::Config(ConfigError::InvalidAesKeyLength { expected: 32, actual })
                    if actual == len
            ));
        }
    }

    #[test]
    fn builds_from_security_config() {
        let config = SecurityConfig {
            aes_secret_key: "0123456789abcdef0123456789abcdef".to_string(),
        };
        assert!(EncryptionService::from_config(&config).is_ok());

        let bad = SecurityConfig {
            aes_secret_key: "too-short".to_string(),
        };
        assert!(EncryptionService::from_config(&bad).is_err());
    }

    #[test]
    fn round_trips_plaintext() {
        let service = service();
        let envelope = service.encrypt("4111-1111-1111-1111").unwrap();
        assert_ne!(envelope, "4111-1111-1111-1111");
        assert_eq!(service.decrypt(&envelope).unwrap(), "4111-1111-1111-1111");
    }

    #[test]
    fn fresh_nonce_per_encryption() {
        let service = service();
        let first = service.encrypt("same-value").unwrap();
        let second = service.encrypt("same-value").unwrap();
        assert_ne!(first, second);
        assert_eq!(service.decrypt(&first).unwrap(), "same-value");
        assert_eq!(service.decrypt(&second).unwrap(), "same-value");
    }

    #[test]
    fn tampered_envelope_fails_to_decrypt() {
        let service = service();
        let envelope = service.encrypt("secret").unwrap();

        let mut bytes = BASE64.decode(&envelope).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = BASE64.encode(bytes);

        assert!(service.decrypt(&tampered).is_err());
    }

    #[test]
    fn wrong_key_fails_to_decrypt() {
        let envelope = service().encrypt("secret").unwrap();
        let other = EncryptionService::new(&[9u8; KEY_LENGTH]).unwrap();
        assert!(other.decrypt(&envelope).is_err());
    }

    #[test]
    fn rejects_malformed_envelopes() {
        let service = service();
        assert!(service.decrypt("not-base64!!").is_err());
        assert!(service.decrypt(&BASE64.encode([0u8; 4])).is_err());
    }

    #[test]
    fn hashes_verify_in_constant_time() {
        let digest = EncryptionService::hash_data("lookup-value");
        assert_eq!(digest.len(), 64);
        assert!(EncryptionService::verify_hash("lookup-value", &digest));
        assert!(!EncryptionService::verify_hash("other-value", &digest));
        assert!(!EncryptionService::verify_hash("lookup-value", "deadbeef"));
    }
}
