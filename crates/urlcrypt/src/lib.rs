//! Encrypt any serializable value into an opaque, tamper-evident, URL-safe token that only
//! holders of a shared secret can decode.
//!
//! Useful for carrying state through a URL, such as an email verification claim, without
//! storing anything server side.
//!
//! ```
//! use serde_json::json;
//! use urlcrypt::Codec;
//!
//! let codec = Codec::new("~{ry*I)==yU/]9<7DPk!Hj\"R#:-/Z7(hTBnlRS=4CXF").unwrap();
//!
//! let token = codec.encode(&json!({"email": "someone@example.com"})).unwrap();
//! let claim = codec.decode_value(token.as_str()).unwrap();
//!
//! assert_eq!(claim["email"], "someone@example.com");
//! ```

#![forbid(unsafe_code)]

pub mod codec;
mod compress;
pub mod config;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod secret;
pub mod token;

pub use crate::codec::Codec;
pub use crate::config::{CodecConfig, CodecConfigBuilder};
pub use crate::error::{ConfigError, EncodeError, Error, InvalidToken};
pub use crate::secret::Secret;
pub use crate::token::Token;
