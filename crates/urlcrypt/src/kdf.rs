//! Derives the token encryption key from the shared secret.
//!
//! `key = PBKDF2-HMAC-SHA256(secret, KDF_SALT, iterations)[0:32]`
//!
//! The derivation salt is a fixed domain separator, so the key depends only on the secret and the
//! iteration count.

use std::num::NonZeroU32;

use aws_lc_rs::aead::{AES_256_GCM, LessSafeKey, UnboundKey};
use aws_lc_rs::pbkdf2::{self, PBKDF2_HMAC_SHA256};
use zeroize::Zeroizing;

use crate::secret::Secret;

/// Domain separation value mixed into key derivation.
pub const KDF_SALT: &[u8] = b"urlcrypt/v1/aes-256-gcm";

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

pub(crate) fn derive_key_bytes(
    secret: &Secret,
    iterations: NonZeroU32,
) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        PBKDF2_HMAC_SHA256,
        iterations,
        KDF_SALT,
        secret.expose(),
        &mut key[..],
    );
    key
}

pub(crate) fn derive_key(secret: &Secret, iterations: NonZeroU32) -> LessSafeKey {
    let key_bytes = derive_key_bytes(secret, iterations);
    let unbound = UnboundKey::new(&AES_256_GCM, &key_bytes[..]).expect("should be infallible");
    LessSafeKey::new(unbound)
}
