use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use aws_lc_rs::aead::LessSafeKey;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::compress::{compress, decompress};
use crate::config::CodecConfig;
use crate::envelope;
use crate::error::{ConfigError, EncodeError, InvalidToken};
use crate::kdf::derive_key;
use crate::secret::Secret;
use crate::token::{Token, decode_text};

/// Turns serializable values into [`Token`]s and back.
///
/// ```text
/// encode: value -> json -> gzip -> salt || gzip -> AES-256-GCM -> base64url
/// decode: base64url -> AES-256-GCM -> strip salt -> gunzip -> json -> value
/// ```
///
/// Cheap to clone and safe to share between threads; every clone uses the same derived key.
#[derive(Clone)]
pub struct Codec {
    inner: Arc<Inner>,
}

struct Inner {
    key: LessSafeKey,
    salt_len: usize,
    max_payload_len: usize,
}

impl Codec {
    /// Codec for `secret` with the default salt length and key derivation cost.
    pub fn new(secret: impl Into<Secret>) -> Result<Codec, ConfigError> {
        Ok(Codec::from_config(CodecConfig::new(secret)?))
    }

    /// Codec for `secret` that prepends `salt_len` random bytes to every payload.
    pub fn with_salt_len(
        secret: impl Into<Secret>,
        salt_len: usize,
    ) -> Result<Codec, ConfigError> {
        let config = CodecConfig::builder(secret).salt_len(salt_len).build()?;
        Ok(Codec::from_config(config))
    }

    /// Derives the encryption key from the configured secret. Key derivation is slow; build one
    /// codec per secret and reuse it.
    pub fn from_config(config: CodecConfig) -> Codec {
        let key = derive_key(config.secret(), config.iterations());

        debug!(
            salt_len = config.salt_len(),
            iterations = config.iterations().get(),
            max_payload_len = config.max_payload_len(),
            "codec ready"
        );

        Codec {
            inner: Arc::new(Inner {
                key,
                salt_len: config.salt_len(),
                max_payload_len: config.max_payload_len(),
            }),
        }
    }

    pub fn salt_len(&self) -> usize {
        self.inner.salt_len
    }

    /// Serialize, compress, salt and encrypt `value`.
    ///
    /// Each call draws a fresh salt and nonce, so encoding the same value twice yields two
    /// different tokens. Values whose JSON form exceeds the configured payload limit fail with
    /// [`EncodeError::PayloadTooLarge`].
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Token, EncodeError> {
        let json = serde_json::to_vec(value)?;
        if json.len() > self.inner.max_payload_len {
            return Err(EncodeError::PayloadTooLarge {
                len: json.len(),
                max: self.inner.max_payload_len,
            });
        }

        let compressed = compress(&json)?;
        let sealed = envelope::seal(&self.inner.key, self.inner.salt_len, &compressed)
            .map_err(|_| EncodeError::Crypto)?;

        trace!(
            json_len = json.len(),
            compressed_len = compressed.len(),
            sealed_len = sealed.len(),
            "encoded value"
        );

        Ok(Token::from_bytes(&sealed))
    }

    /// Same as [`Codec::encode`], returning the token text directly.
    pub fn encode_to_string<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<String, EncodeError> {
        self.encode(value).map(Token::into_string)
    }

    /// Recover a value from a token produced by a codec with the same secret and parameters.
    ///
    /// Every kind of failure, from malformed text to a wrong secret to a payload of the wrong
    /// shape for `T`, is reported as the same [`InvalidToken`].
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, InvalidToken> {
        let mut sealed = decode_text(token).map_err(|e| reject("text", &e))?;

        let compressed = envelope::open(&self.inner.key, self.inner.salt_len, &mut sealed)
            .map_err(|e| reject("envelope", &e))?;

        let json = decompress(compressed, self.inner.max_payload_len)
            .map_err(|e| reject("payload", &e))?;

        serde_json::from_slice(&json).map_err(|e| reject("json", &e))
    }

    /// Decode into an untyped JSON value.
    pub fn decode_value(&self, token: &str) -> Result<serde_json::Value, InvalidToken> {
        self.decode(token)
    }
}

fn reject(stage: &'static str, cause: &dyn std::fmt::Display) -> InvalidToken {
    trace!(stage, %cause, "token rejected");
    InvalidToken
}

impl Debug for Codec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("salt_len", &self.inner.salt_len)
            .field("max_payload_len", &self.inner.max_payload_len)
            .finish_non_exhaustive()
    }
}
