use std::fmt::{Debug, Formatter};

use zeroize::ZeroizeOnDrop;

/// Shared secret a [`Codec`](crate::Codec) derives its encryption key from.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Secret {
    value: Vec<u8>,
}

#[allow(clippy::len_without_is_empty)]
impl Secret {
    pub fn new(value: &[u8]) -> Self {
        Self {
            value: Vec::from(value),
        }
    }

    pub fn expose(&self) -> &[u8] {
        &self.value
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }
}

impl Debug for Secret {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret(len={})", self.len())
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Secret::new(value.as_bytes())
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Secret {
            value: value.into_bytes(),
        }
    }
}

impl From<&String> for Secret {
    fn from(value: &String) -> Self {
        Secret::new(value.as_bytes())
    }
}

impl From<&[u8]> for Secret {
    fn from(value: &[u8]) -> Self {
        Secret::new(value)
    }
}

impl From<Vec<u8>> for Secret {
    fn from(value: Vec<u8>) -> Self {
        Secret { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_does_not_reveal_value() {
        let secret = Secret::from("hunter2-hunter2-hunter2-hunter2-hunter2-hunt");
        let printed = format!("{secret:?}");

        assert_eq!(printed, "Secret(len=44)");
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn conversions_keep_bytes() {
        let from_str = Secret::from("abc");
        let from_string = Secret::from(String::from("abc"));
        let from_vec = Secret::from(b"abc".to_vec());

        assert_eq!(from_str.expose(), b"abc");
        assert_eq!(from_string.expose(), b"abc");
        assert_eq!(from_vec.expose(), b"abc");
        assert_eq!(from_vec.len(), 3);
    }
}
