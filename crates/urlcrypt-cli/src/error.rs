use urlcrypt::{ConfigError, EncodeError, InvalidToken};

use crate::claim::ClaimError;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("no secret given: use --secret or set URLCRYPT_SECRET")]
    MissingSecret,

    #[error(transparent)]
    Codec(#[from] urlcrypt::Error),

    #[error("verification failed: {0}")]
    Claim(#[from] ClaimError),

    #[error("input is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not generate random secret")]
    Random,
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Codec(err.into())
    }
}

impl From<EncodeError> for CliError {
    fn from(err: EncodeError) -> Self {
        CliError::Codec(err.into())
    }
}

impl From<InvalidToken> for CliError {
    fn from(err: InvalidToken) -> Self {
        CliError::Codec(err.into())
    }
}
