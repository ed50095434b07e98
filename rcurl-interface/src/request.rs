//! Transport-agnostic description of an HTTP request.

use std::path::PathBuf;
use std::time::Duration;

use crate::header::HeaderMap;
use crate::multimap::OrderedMultiMap;

/// One named part of a multipart form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    /// Inline text value.
    Text(String),
    /// File-backed part, read from disk when the request is executed.
    File {
        /// Path of the file to upload.
        path: PathBuf,
        /// File name advertised in the part's `Content-Disposition`.
        file_name: String,
        /// Explicit part content type; defaulted by the back end when
        /// `None`.
        content_type: Option<String>,
    },
}

impl FormField {
    /// An inline text field.
    pub fn text(value: impl Into<String>) -> Self {
        FormField::Text(value.into())
    }

    /// A file field advertising the path's base name as its file name.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        FormField::File {
            path,
            file_name,
            content_type: None,
        }
    }

    /// A file field with an explicit file name and content type.
    pub fn file_with(
        path: impl Into<PathBuf>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        FormField::File {
            path: path.into(),
            file_name: file_name.into(),
            content_type: Some(content_type.into()),
        }
    }
}

/// The proxy protocol spoken towards the proxy server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProxyKind {
    /// Plain HTTP proxying (also used for `https://` proxy specs).
    #[default]
    Http,
    /// SOCKS proxying (`socks`, `socks4` and `socks5` specs).
    Socks,
}

/// Proxy settings; inert until a host is configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Protocol spoken towards the proxy.
    pub kind: ProxyKind,
    /// Proxy host; `None` disables proxying.
    pub host: Option<String>,
    /// Proxy port.
    pub port: u16,
    /// Username for proxy authentication.
    pub username: Option<String>,
    /// Password for proxy authentication.
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Whether a proxy host has been configured.
    pub fn is_configured(&self) -> bool {
        self.host.is_some()
    }

    /// The proxy endpoint as a `scheme://host:port` URL, without
    /// credentials, if a host is configured.
    pub fn endpoint(&self) -> Option<String> {
        let host = self.host.as_deref()?;
        let scheme = match self.kind {
            ProxyKind::Http => "http",
            ProxyKind::Socks => "socks5",
        };
        Some(format!("{scheme}://{host}:{}", self.port))
    }
}

/// Per-request execution configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    /// Time allowed for establishing the connection.
    pub connect_timeout: Duration,
    /// Time allowed for reading the response.
    pub read_timeout: Duration,
    /// Whether redirect responses are followed automatically.
    pub follow_redirects: bool,
    /// Whether the server certificate chain and hostname are verified.
    pub verify_tls: bool,
    /// Whether `--compressed` was requested.
    pub compressed: bool,
    /// Proxy settings.
    pub proxy: ProxyConfig,
    /// Number of retries after a failed attempt (total attempts =
    /// `max_retries + 1`).
    pub max_retries: u32,
    /// Constant delay between attempts.
    pub retry_delay: Duration,
    /// Response size cap in bytes; 0 means unlimited.
    pub max_download_size: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(60),
            follow_redirects: false,
            verify_tls: true,
            compressed: false,
            proxy: ProxyConfig::default(),
            max_retries: 0,
            retry_delay: Duration::from_secs(1),
            max_download_size: 0,
        }
    }
}

/// The request description produced by the parser or builder and consumed by
/// every back end.
///
/// At most one of `body`, `binary_body` and `form_fields` is normally set;
/// should several be, the wire layer picks the multipart form over the
/// binary body over the text body. `Clone` performs the deep copy used for
/// descriptor reuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// Target URL; `https://` is prepended at build time when no scheme is
    /// present.
    pub url: String,
    /// Request method, uppercase.
    pub method: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Query parameters appended to the URL at execution time.
    pub query_params: OrderedMultiMap<String>,
    /// Text body.
    pub body: Option<String>,
    /// Binary body.
    pub binary_body: Option<Vec<u8>>,
    /// Multipart form fields.
    pub form_fields: Option<OrderedMultiMap<FormField>>,
    /// Username for Basic authentication.
    pub username: Option<String>,
    /// Password for Basic authentication; an absent password with a present
    /// username is sent as empty.
    pub password: Option<String>,
    /// Cookies serialized into a single `Cookie` header at execution time.
    pub cookies: OrderedMultiMap<String>,
    /// Execution configuration.
    pub config: RequestConfig,
}

impl Default for RequestDescriptor {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: "GET".to_owned(),
            headers: HeaderMap::new(),
            query_params: OrderedMultiMap::new(),
            body: None,
            binary_body: None,
            form_fields: None,
            username: None,
            password: None,
            cookies: OrderedMultiMap::new(),
            config: RequestConfig::default(),
        }
    }
}

impl RequestDescriptor {
    /// Create a descriptor with the default `GET` method and empty URL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the method, normalized to uppercase.
    pub fn set_method(&mut self, method: impl AsRef<str>) {
        self.method = method.as_ref().to_ascii_uppercase();
    }

    /// Add a form field, keeping earlier fields of the same name.
    pub fn add_form_field(&mut self, name: impl Into<String>, field: FormField) {
        self.form_fields
            .get_or_insert_with(OrderedMultiMap::new)
            .append(name, field);
    }

    /// Whether any kind of body is present.
    pub fn has_body(&self) -> bool {
        self.body.is_some() || self.binary_body.is_some() || self.form_fields.is_some()
    }

    /// The URL with the serialized query string appended.
    pub fn full_url(&self) -> String {
        crate::wire::resolve_url(&self.url, &self.query_params)
    }
}
