//! In-house `multipart/form-data` encoder.
//!
//! Used by back ends whose transport library has no multipart builder of its
//! own. The layout matches what the library-backed encoders produce: one
//! part per form field, file parts carrying a content-type line and
//! `Content-Transfer-Encoding: binary`.

use std::time::{SystemTime, UNIX_EPOCH};

use super::{PlannedPart, PlannedPartKind};

const BOUNDARY_PREFIX: &str = "----rcurlFormBoundary";
const CRLF: &str = "\r\n";

/// A fully encoded multipart body together with the `Content-Type` value
/// carrying its boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    /// `multipart/form-data; boundary=...`.
    pub content_type: String,
    /// The encoded body bytes.
    pub content: Vec<u8>,
}

/// Encode `parts` with a boundary unique to this request.
pub fn encode_multipart(parts: &[PlannedPart]) -> MultipartBody {
    let boundary = format!("{BOUNDARY_PREFIX}{}", boundary_stamp());
    let mut out: Vec<u8> = Vec::new();
    for part in parts {
        out.extend_from_slice(format!("--{boundary}{CRLF}").as_bytes());
        match &part.kind {
            PlannedPartKind::Text(value) => {
                out.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"{CRLF}{CRLF}",
                        part.name
                    )
                    .as_bytes(),
                );
                out.extend_from_slice(value.as_bytes());
            }
            PlannedPartKind::File {
                file_name,
                content_type,
                content,
            } => {
                out.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{file_name}\"{CRLF}",
                        part.name
                    )
                    .as_bytes(),
                );
                out.extend_from_slice(format!("Content-Type: {content_type}{CRLF}").as_bytes());
                out.extend_from_slice(
                    format!("Content-Transfer-Encoding: binary{CRLF}{CRLF}").as_bytes(),
                );
                out.extend_from_slice(content);
            }
        }
        out.extend_from_slice(CRLF.as_bytes());
    }
    out.extend_from_slice(format!("--{boundary}--{CRLF}").as_bytes());
    MultipartBody {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        content: out,
    }
}

// Nanosecond clock reading; collisions would only matter if two requests
// shared one wall-clock nanosecond.
fn boundary_stamp() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default()
}
