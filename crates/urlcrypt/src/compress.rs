//! gzip compression of the serialized payload.

use std::io::{self, ErrorKind, Read, Write};

use flate2::Compression;
use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;

pub(crate) fn compress(data: &[u8]) -> io::Result<Vec<u8>> {
    let buf = Vec::with_capacity(data.len() / 2 + 32);
    let mut encoder = GzEncoder::new(buf, Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Decompress a single gzip member. Fails if the output would exceed `limit` bytes or if any
/// bytes follow the member.
pub(crate) fn decompress(data: &[u8], limit: usize) -> io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();

    (&mut decoder).take((limit as u64).saturating_add(1)).read_to_end(&mut out)?;

    if out.len() > limit {
        return Err(io::Error::new(
            ErrorKind::InvalidData,
            format!("decompressed payload exceeds {limit} bytes"),
        ));
    }

    if !decoder.into_inner().is_empty() {
        return Err(io::Error::new(
            ErrorKind::InvalidData,
            "trailing bytes after compressed payload",
        ));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_decompress_roundtrip() {
        let data = br#"{"hello":"world","this":"is a test","of":"urlcrypt"}"#;

        let compressed = compress(data).unwrap();
        let decompressed = decompress(&compressed, 1024).unwrap();

        assert_eq!(decompressed, data);
    }

    #[test]
    fn output_is_gzip() {
        let compressed = compress(b"42").unwrap();
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn repetitive_input_shrinks() {
        let data = vec![b'a'; 10_000];
        let compressed = compress(&data).unwrap();

        assert!(compressed.len() < 200, "got {} bytes", compressed.len());
    }

    #[test]
    fn limit_is_enforced() {
        let data = vec![b'a'; 4096];
        let compressed = compress(&data).unwrap();

        assert!(decompress(&compressed, 4096).is_ok());

        let err = decompress(&compressed, 4095).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn unbounded_limit_does_not_overflow() {
        let data = b"{\"a\":1}";
        let compressed = compress(data).unwrap();

        assert_eq!(decompress(&compressed, usize::MAX).unwrap(), data);
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut compressed = compress(b"[1,2,3]").unwrap();
        compressed.push(0);

        assert!(decompress(&compressed, 1024).is_err());
    }

    #[test]
    fn not_gzip_is_rejected() {
        assert!(decompress(b"definitely not gzip", 1024).is_err());
    }

    #[test]
    fn truncated_stream_is_rejected() {
        let compressed = compress(b"a reasonably long payload for truncation").unwrap();
        let truncated = &compressed[..compressed.len() / 2];

        assert!(decompress(truncated, 1024).is_err());
    }
}
