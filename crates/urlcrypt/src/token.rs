//! The URL-safe text form of a sealed envelope.

use std::fmt::{Display, Formatter};

use data_encoding::{BASE64URL_NOPAD, DecodeError};
use serde::{Deserialize, Serialize};

/// An encoded value: unpadded base64url text, safe to use as a URL path segment or query value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub(crate) fn from_bytes(bytes: &[u8]) -> Token {
        Token(BASE64URL_NOPAD.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Strict base64url decoding: rejects padding, characters outside `[A-Za-z0-9_-]` and
/// non-canonical trailing bits.
pub(crate) fn decode_text(token: &str) -> Result<Vec<u8>, DecodeError> {
    BASE64URL_NOPAD.decode(token.as_bytes())
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}
