//! Response body handling: the download cap and content decoding.

use std::io::Read;

use flate2::read::{GzDecoder, ZlibDecoder};

use crate::header::standard::CONTENT_ENCODING;
use crate::header::HeaderMap;
use crate::{Error, Result};

const CHUNK: usize = 8192;

/// Read `reader` to the end, failing with [`Error::ResponseTooLarge`] once
/// the cumulative byte count exceeds `max` (0 = unlimited).
pub fn read_capped(reader: &mut dyn Read, max: u64) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut buf = [0u8; CHUNK];
    let mut total: u64 = 0;
    loop {
        let n = reader.read(&mut buf).map_err(Error::Io)?;
        if n == 0 {
            break;
        }
        total += n as u64;
        if max > 0 && total > max {
            return Err(Error::ResponseTooLarge);
        }
        out.extend_from_slice(&buf[..n]);
    }
    Ok(out)
}

/// Inflate `raw` when the response headers carry a gzip or deflate
/// `Content-Encoding`; any other encoding passes through untouched.
pub fn decode_content(headers: &HeaderMap, raw: Vec<u8>) -> Result<Vec<u8>> {
    let encoding = headers.get(CONTENT_ENCODING).unwrap_or("");
    if encoding.eq_ignore_ascii_case("gzip") {
        let mut out = Vec::new();
        GzDecoder::new(raw.as_slice())
            .read_to_end(&mut out)
            .map_err(Error::Io)?;
        Ok(out)
    } else if encoding.eq_ignore_ascii_case("deflate") {
        let mut out = Vec::new();
        ZlibDecoder::new(raw.as_slice())
            .read_to_end(&mut out)
            .map_err(Error::Io)?;
        Ok(out)
    } else {
        Ok(raw)
    }
}

/// Read, cap and decode a response body.
///
/// The cap applies to the bytes read from the transport. A read or decode
/// failure other than the size cap yields an empty body: a valid status
/// line and headers have already been received when this runs, and that
/// response is still returned to the caller.
pub fn read_body(reader: &mut dyn Read, headers: &HeaderMap, max: u64) -> Result<Vec<u8>> {
    let raw = match read_capped(reader, max) {
        Ok(raw) => raw,
        Err(Error::ResponseTooLarge) => return Err(Error::ResponseTooLarge),
        Err(_) => return Ok(Vec::new()),
    };
    Ok(decode_content(headers, raw).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write as _};

    use flate2::write::{GzEncoder, ZlibEncoder};
    use flate2::Compression;

    use super::*;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn read_capped_allows_exactly_the_limit() {
        let data = vec![7u8; 10];
        let body = read_capped(&mut data.as_slice(), 10).unwrap();
        assert_eq!(body, data);
    }

    #[test]
    fn read_capped_rejects_one_byte_over() {
        let data = vec![7u8; 11];
        assert!(matches!(
            read_capped(&mut data.as_slice(), 10),
            Err(Error::ResponseTooLarge)
        ));
    }

    #[test]
    fn read_capped_unlimited_when_zero() {
        let data = vec![7u8; 3 * CHUNK];
        let body = read_capped(&mut data.as_slice(), 0).unwrap();
        assert_eq!(body.len(), 3 * CHUNK);
    }

    #[test]
    fn gzip_content_is_inflated() {
        let mut headers = HeaderMap::new();
        headers.append("Content-Encoding", "gzip");
        let body = decode_content(&headers, gzip(b"plain text")).unwrap();
        assert_eq!(body, b"plain text");
    }

    #[test]
    fn deflate_content_is_inflated() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"plain text").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut headers = HeaderMap::new();
        headers.append("Content-Encoding", "deflate");
        let body = decode_content(&headers, compressed).unwrap();
        assert_eq!(body, b"plain text");
    }

    #[test]
    fn unknown_encoding_passes_through() {
        let mut headers = HeaderMap::new();
        headers.append("Content-Encoding", "br");
        let body = decode_content(&headers, b"raw".to_vec()).unwrap();
        assert_eq!(body, b"raw");
    }

    #[test]
    fn failed_body_read_yields_an_empty_body() {
        struct FailingReader;
        impl io::Read for FailingReader {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }
        let body = read_body(&mut FailingReader, &HeaderMap::new(), 0).unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn corrupt_gzip_yields_an_empty_body() {
        let mut headers = HeaderMap::new();
        headers.append("Content-Encoding", "gzip");
        let body = read_body(&mut &b"not gzip"[..], &headers, 0).unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn size_cap_is_not_masked() {
        let data = vec![7u8; 20];
        assert!(matches!(
            read_body(&mut data.as_slice(), &HeaderMap::new(), 5),
            Err(Error::ResponseTooLarge)
        ));
    }
}
