//! Compressed playlist detection
//!
//! Some providers serve `.m3u.gz` (or mislabelled gzip) bodies without a
//! `Content-Encoding` header. Bodies are sniffed by magic bytes and unpacked
//! before format detection.

use bytes::Bytes;

use crate::errors::{SourceError, SourceResult};

/// Supported compression formats detected by magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    Gzip,
    Bzip2,
    Xz,
    Uncompressed,
}

/// Magic byte detection and decompression utility
pub struct DecompressionService;

impl DecompressionService {
    /// Detect compression format using magic bytes
    pub fn detect_compression_format(data: &[u8]) -> CompressionFormat {
        match infer::get(data).map(|kind| kind.mime_type()) {
            Some("application/gzip") => CompressionFormat::Gzip,
            Some("application/x-bzip2") => CompressionFormat::Bzip2,
            Some("application/x-xz") => CompressionFormat::Xz,
            _ => CompressionFormat::Uncompressed,
        }
    }

    /// Decompress data based on detected format
    ///
    /// Formats whose cargo feature is disabled are reported as decode errors.
    pub fn decompress(data: Bytes) -> SourceResult<Vec<u8>> {
        match Self::detect_compression_format(&data) {
            CompressionFormat::Gzip => Self::decompress_gzip(data),
            CompressionFormat::Bzip2 => Self::decompress_bzip2(data),
            CompressionFormat::Xz => Self::decompress_xz(data),
            CompressionFormat::Uncompressed => Ok(data.to_vec()),
        }
    }

    #[cfg(feature = "compression-gzip")]
    fn decompress_gzip(data: Bytes) -> SourceResult<Vec<u8>> {
        read_all(flate2::read::GzDecoder::new(data.as_ref()), "gzip")
    }

    #[cfg(not(feature = "compression-gzip"))]
    fn decompress_gzip(_data: Bytes) -> SourceResult<Vec<u8>> {
        Err(unsupported("gzip", "compression-gzip"))
    }

    #[cfg(feature = "compression-bzip2")]
    fn decompress_bzip2(data: Bytes) -> SourceResult<Vec<u8>> {
        read_all(bzip2::read::BzDecoder::new(data.as_ref()), "bzip2")
    }

    #[cfg(not(feature = "compression-bzip2"))]
    fn decompress_bzip2(_data: Bytes) -> SourceResult<Vec<u8>> {
        Err(unsupported("bzip2", "compression-bzip2"))
    }

    #[cfg(feature = "compression-xz")]
    fn decompress_xz(data: Bytes) -> SourceResult<Vec<u8>> {
        read_all(xz2::read::XzDecoder::new(data.as_ref()), "xz")
    }

    #[cfg(not(feature = "compression-xz"))]
    fn decompress_xz(_data: Bytes) -> SourceResult<Vec<u8>> {
        Err(unsupported("xz", "compression-xz"))
    }
}

#[cfg(any(
    feature = "compression-gzip",
    feature = "compression-bzip2",
    feature = "compression-xz"
))]
fn read_all<R: std::io::Read>(mut decoder: R, format: &str) -> SourceResult<Vec<u8>> {
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| SourceError::decode(format!("Failed to decompress {format} data: {e}")))?;
    Ok(decompressed)
}

#[cfg(not(all(
    feature = "compression-gzip",
    feature = "compression-bzip2",
    feature = "compression-xz"
)))]
fn unsupported(format: &str, feature: &str) -> SourceError {
    SourceError::decode(format!(
        "{format} compressed playlist received but the '{feature}' feature is disabled"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_uncompressed() {
        let format = DecompressionService::detect_compression_format(b"#EXTM3U\n");
        assert_eq!(format, CompressionFormat::Uncompressed);
    }

    #[test]
    fn test_decompress_uncompressed() {
        let data = b"#EXTM3U\n#EXTINF:-1,One\nhttp://example.com/1.ts\n";
        let result = DecompressionService::decompress(Bytes::from_static(data)).unwrap();
        assert_eq!(result, data);
    }

    #[cfg(not(feature = "compression-bzip2"))]
    #[test]
    fn test_disabled_format_is_a_decode_error() {
        let data = Bytes::from_static(b"BZh91AY&SY\x00\x00\x00\x00");
        assert_eq!(
            DecompressionService::detect_compression_format(&data),
            CompressionFormat::Bzip2
        );
        match DecompressionService::decompress(data) {
            Err(SourceError::Decode { message }) => {
                assert!(message.contains("'compression-bzip2' feature is disabled"))
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[cfg(feature = "compression-gzip")]
    #[test]
    fn test_detect_and_decompress_gzip() {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;

        let original = b"#EXTM3U\n#EXTINF:-1,One\nhttp://example.com/1.ts\n";
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(original).unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(
            DecompressionService::detect_compression_format(&compressed),
            CompressionFormat::Gzip
        );
        let decompressed = DecompressionService::decompress(Bytes::from(compressed)).unwrap();
        assert_eq!(decompressed, original);
    }
}
