//! Back-end-independent wire policy.
//!
//! Everything that must be observably identical across back ends lives here:
//! full-URL resolution, header flattening and synthesis, body selection,
//! multipart layout, the retry loop, and response capping/decoding. A back
//! end reduces to a thin adapter that feeds a [`RequestPlan`] into its
//! transport library and hands the response stream back to [`read_body`].

mod body;
mod multipart;
mod retry;

pub use body::{decode_content, read_body, read_capped};
pub use multipart::{encode_multipart, MultipartBody};
pub use retry::run_with_retry;

use std::fs;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::header::standard::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use crate::multimap::OrderedMultiMap;
use crate::request::{FormField, RequestDescriptor};
use crate::{Error, Result};

/// Default content type of text and binary bodies without an explicit
/// `Content-Type` header.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
/// Default content type of file parts without an explicit one.
pub const OCTET_STREAM: &str = "application/octet-stream";

// Characters kept verbatim match the application/x-www-form-urlencoded set.
const FORM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Percent-encode `value` for use in a query string or form body, with `+`
/// for spaces.
pub fn form_urlencode(value: &str) -> String {
    utf8_percent_encode(value, FORM).to_string().replace("%20", "+")
}

/// Append the serialized query parameters to `url`, starting with `?` or
/// `&` depending on whether the URL already carries a query string.
pub fn resolve_url(url: &str, params: &OrderedMultiMap<String>) -> String {
    if params.is_empty() {
        return url.to_owned();
    }
    let mut full = String::from(url);
    let mut separator = if url.contains('?') { '&' } else { '?' };
    for (key, value) in params.iter() {
        full.push(separator);
        full.push_str(&form_urlencode(key));
        full.push('=');
        full.push_str(&form_urlencode(value));
        separator = '&';
    }
    full
}

/// One resolved part of a multipart form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPart {
    /// Field name.
    pub name: String,
    /// Resolved part content.
    pub kind: PlannedPartKind,
}

/// Content of a [`PlannedPart`], with file content already read and
/// defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedPartKind {
    /// Inline text part.
    Text(String),
    /// File part.
    File {
        /// File name advertised in the part's `Content-Disposition`.
        file_name: String,
        /// Part content type; never empty.
        content_type: String,
        /// File bytes.
        content: Vec<u8>,
    },
}

/// The selected request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedBody {
    /// Raw bytes (text or binary body); the matching `Content-Type` header
    /// is already part of the plan's header list.
    Bytes {
        /// Body bytes.
        content: Vec<u8>,
    },
    /// Multipart form, encoded natively by the back end or via
    /// [`encode_multipart`].
    Multipart {
        /// Resolved parts in field order.
        parts: Vec<PlannedPart>,
    },
}

/// A request resolved to wire terms: final URL, flattened headers (with the
/// `Cookie` and `Authorization` headers synthesized and the default content
/// type applied) and the selected body. Every back end consumes the same
/// plan, so request translation differences cannot creep in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPlan {
    /// Uppercase request method.
    pub method: String,
    /// Full URL including the serialized query string.
    pub url: String,
    /// Header entries in emission order; repeated names stay repeated.
    pub headers: Vec<(String, String)>,
    /// Selected body, if any.
    pub body: Option<PlannedBody>,
}

impl RequestPlan {
    /// Resolve `request` into wire terms.
    ///
    /// File-backed form fields are read here, once per execution, so a
    /// missing file fails fast instead of being retried. Fails with
    /// [`Error::InvalidArgument`] when the URL is empty.
    pub fn prepare(request: &RequestDescriptor) -> Result<Self> {
        if request.url.is_empty() {
            return Err(Error::InvalidArgument("URL must be specified".into()));
        }

        let mut headers: Vec<(String, String)> = request
            .headers
            .iter()
            .map(|(name, value)| (name.to_owned(), value.to_owned()))
            .collect();

        if !request.cookies.is_empty() {
            let cookie = request
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            headers.push((COOKIE.to_owned(), cookie));
        }

        if let Some(username) = request.username.as_deref() {
            let credentials =
                format!("{username}:{}", request.password.as_deref().unwrap_or(""));
            headers.push((
                AUTHORIZATION.to_owned(),
                format!("Basic {}", BASE64.encode(credentials)),
            ));
        }

        let body = select_body(request)?;
        if matches!(body, Some(PlannedBody::Bytes { .. })) && !request.headers.contains(CONTENT_TYPE)
        {
            headers.push((CONTENT_TYPE.to_owned(), FORM_URLENCODED.to_owned()));
        }

        Ok(Self {
            method: request.method.clone(),
            url: resolve_url(&request.url, &request.query_params),
            headers,
            body,
        })
    }
}

// Multipart form wins over the binary body, which wins over the text body.
fn select_body(request: &RequestDescriptor) -> Result<Option<PlannedBody>> {
    if let Some(fields) = request.form_fields.as_ref().filter(|f| !f.is_empty()) {
        let mut parts = Vec::new();
        for (name, field) in fields.iter() {
            parts.push(PlannedPart {
                name: name.to_owned(),
                kind: resolve_field(field)?,
            });
        }
        return Ok(Some(PlannedBody::Multipart { parts }));
    }
    if let Some(binary) = &request.binary_body {
        return Ok(Some(PlannedBody::Bytes {
            content: binary.clone(),
        }));
    }
    if let Some(text) = &request.body {
        return Ok(Some(PlannedBody::Bytes {
            content: text.as_bytes().to_vec(),
        }));
    }
    Ok(None)
}

fn resolve_field(field: &FormField) -> Result<PlannedPartKind> {
    match field {
        FormField::Text(value) => Ok(PlannedPartKind::Text(value.clone())),
        FormField::File {
            path,
            file_name,
            content_type,
        } => Ok(PlannedPartKind::File {
            file_name: file_name.clone(),
            content_type: content_type
                .clone()
                .unwrap_or_else(|| OCTET_STREAM.to_owned()),
            content: fs::read(path).map_err(Error::Io)?,
        }),
    }
}
