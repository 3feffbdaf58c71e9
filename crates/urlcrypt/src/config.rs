//! Codec configuration: the shared secret plus the parameters both ends of a token must agree on.

use std::num::NonZeroU32;

use crate::error::ConfigError;
use crate::secret::Secret;

/// Shortest accepted secret, in bytes. 43 base64 characters carry 256 bits.
pub const MIN_SECRET_LEN: usize = 43;

/// Salt bytes prepended to every payload when not configured otherwise.
pub const DEFAULT_SALT_LEN: usize = 32;

/// Largest accepted salt length.
pub const MAX_SALT_LEN: usize = 1024;

/// PBKDF2 iterations used to turn the secret into an encryption key.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Largest decompressed payload `decode` will produce.
pub const DEFAULT_MAX_PAYLOAD_LEN: usize = 1024 * 1024;

/// Validated, immutable codec configuration.
///
/// Encoder and decoder must use the same secret, salt length and iteration count; tokens made
/// under any other combination are rejected.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    secret: Secret,
    salt_len: usize,
    iterations: NonZeroU32,
    max_payload_len: usize,
}

impl CodecConfig {
    /// Configuration with default parameters for `secret`.
    pub fn new(secret: impl Into<Secret>) -> Result<CodecConfig, ConfigError> {
        CodecConfig::builder(secret).build()
    }

    pub fn builder(secret: impl Into<Secret>) -> CodecConfigBuilder {
        CodecConfigBuilder {
            secret: secret.into(),
            salt_len: DEFAULT_SALT_LEN,
            iterations: DEFAULT_ITERATIONS,
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
        }
    }

    pub fn secret(&self) -> &Secret {
        &self.secret
    }

    pub fn salt_len(&self) -> usize {
        self.salt_len
    }

    pub fn iterations(&self) -> NonZeroU32 {
        self.iterations
    }

    pub fn max_payload_len(&self) -> usize {
        self.max_payload_len
    }
}

#[derive(Debug)]
pub struct CodecConfigBuilder {
    secret: Secret,
    salt_len: usize,
    iterations: u32,
    max_payload_len: usize,
}

impl CodecConfigBuilder {
    /// Number of random salt bytes prepended to each payload before encryption.
    pub fn salt_len(mut self, salt_len: usize) -> Self {
        self.salt_len = salt_len;
        self
    }

    /// PBKDF2 iteration count for deriving the encryption key from the secret.
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Upper bound on the decompressed size of a decoded payload.
    pub fn max_payload_len(mut self, max_payload_len: usize) -> Self {
        self.max_payload_len = max_payload_len;
        self
    }

    pub fn build(self) -> Result<CodecConfig, ConfigError> {
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret {
                len: self.secret.len(),
                min: MIN_SECRET_LEN,
            });
        }

        if !(1..=MAX_SALT_LEN).contains(&self.salt_len) {
            return Err(ConfigError::InvalidSaltLength(self.salt_len));
        }

        let iterations = NonZeroU32::new(self.iterations).ok_or(ConfigError::InvalidIterations)?;

        if self.max_payload_len == 0 {
            return Err(ConfigError::InvalidPayloadLimit);
        }

        Ok(CodecConfig {
            secret: self.secret,
            salt_len: self.salt_len,
            iterations,
            max_payload_len: self.max_payload_len,
        })
    }
}
