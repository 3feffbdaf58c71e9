//! AEAD sealing of the salted payload.
//!
//! A sealed envelope is laid out as
//!
//! ```text
//! version (1) || nonce (12) || AES-256-GCM(salt || body) || tag (16)
//! ```
//!
//! The associated data binds the format version and the salt length, so an envelope only opens
//! under the exact configuration that sealed it.

use aws_lc_rs::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce};
use aws_lc_rs::error::Unspecified;

/// Current envelope format.
pub const FORMAT_VERSION: u8 = 1;

/// Bytes preceding the ciphertext: version and nonce.
pub const HEADER_LEN: usize = 1 + NONCE_LEN;

const AAD_PREFIX: &[u8; 8] = b"urlcrypt";
const AAD_LEN: usize = AAD_PREFIX.len() + 1 + 4;

fn make_aad(salt_len: usize) -> [u8; AAD_LEN] {
    let mut aad = [0u8; AAD_LEN];
    aad[..AAD_PREFIX.len()].copy_from_slice(AAD_PREFIX);
    aad[AAD_PREFIX.len()] = FORMAT_VERSION;
    // salt_len is bounded by MAX_SALT_LEN
    aad[AAD_PREFIX.len() + 1..].copy_from_slice(&(salt_len as u32).to_be_bytes());
    aad
}

/// Smallest possible sealed envelope for `salt_len` bytes of salt and an empty body.
pub fn min_sealed_len(salt_len: usize) -> usize {
    HEADER_LEN + salt_len + AES_256_GCM.tag_len()
}

/// Prepend `salt_len` fresh random bytes to `body` and seal the result under `key` with a fresh
/// random nonce.
pub(crate) fn seal(
    key: &LessSafeKey,
    salt_len: usize,
    body: &[u8],
) -> Result<Vec<u8>, Unspecified> {
    let mut nonce = [0u8; NONCE_LEN];
    aws_lc_rs::rand::fill(&mut nonce)?;

    let mut sealed = Vec::with_capacity(min_sealed_len(salt_len) + body.len());
    sealed.push(FORMAT_VERSION);
    sealed.extend_from_slice(&nonce);

    sealed.resize(HEADER_LEN + salt_len, 0);
    aws_lc_rs::rand::fill(&mut sealed[HEADER_LEN..])?;
    sealed.extend_from_slice(body);

    let tag = key.seal_in_place_separate_tag(
        Nonce::assume_unique_for_key(nonce),
        Aad::from(make_aad(salt_len)),
        &mut sealed[HEADER_LEN..],
    )?;
    sealed.extend_from_slice(tag.as_ref());

    Ok(sealed)
}

/// Authenticate and decrypt `sealed` in place, returning the body with the salt removed.
pub(crate) fn open<'a>(
    key: &LessSafeKey,
    salt_len: usize,
    sealed: &'a mut [u8],
) -> Result<&'a [u8], Unspecified> {
    if sealed.len() < min_sealed_len(salt_len) || sealed[0] != FORMAT_VERSION {
        return Err(Unspecified);
    }

    let (header, in_out) = sealed.split_at_mut(HEADER_LEN);
    let nonce = Nonce::try_assume_unique_for_key(&header[1..])?;
    let plaintext: &'a [u8] = key.open_in_place(nonce, Aad::from(make_aad(salt_len)), in_out)?;

    plaintext.get(salt_len..).ok_or(Unspecified)
}
