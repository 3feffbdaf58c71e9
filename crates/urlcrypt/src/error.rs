use thiserror::Error;

/// Rejected codec configuration. Returned only while building a [`CodecConfig`].
///
/// [`CodecConfig`]: crate::config::CodecConfig
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("secret is too weak: {len} bytes, at least {min} bytes required")]
    WeakSecret { len: usize, min: usize },

    #[error("salt length must be between 1 and {max} bytes: got {0}", max = crate::config::MAX_SALT_LEN)]
    InvalidSaltLength(usize),

    #[error("key derivation iteration count must be non-zero")]
    InvalidIterations,

    #[error("maximum payload length must be non-zero")]
    InvalidPayloadLimit,
}

/// A token could not be decoded.
///
/// Carries no detail. A wrong secret, truncation, tampering and plain garbage all produce the
/// same value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[error("invalid token")]
pub struct InvalidToken;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("value could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("serialized value is {len} bytes, larger than the {max} byte payload limit")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("payload compression failed: {0}")]
    Compress(#[from] std::io::Error),

    #[error("payload encryption failed")]
    Crypto,
}

/// Any error produced by this crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    InvalidToken(#[from] InvalidToken),
}
