//! Fluent request construction mirroring curl's option surface.

use std::fs;
use std::path::Path;
use std::time::Duration;

use rcurl_interface::header::standard::{
    ACCEPT_ENCODING, AUTHORIZATION, CONTENT_TYPE, REFERER, USER_AGENT,
};
use rcurl_interface::{
    Error, Executor, FormField, RequestDescriptor, ResponseDescriptor, Result,
};

use crate::parser;

/// Fluent builder around one [`RequestDescriptor`].
///
/// Every parser effect is available as a chained setter, next to direct
/// setters for headers, bodies, credentials and configuration. The wrapped
/// descriptor stays live across calls; [`build`](Curl::build) returns a
/// validated deep-copied snapshot, so a builder can keep being mutated and
/// re-built without aliasing earlier snapshots.
///
/// ```no_run
/// use rcurl::Curl;
///
/// let response = Curl::new()
///     .url("https://example.com/api")
///     .json_body(r#"{"name":"test"}"#)
///     .post()
///     .exec()?;
/// assert!(response.is_success());
/// # Ok::<(), rcurl::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Curl {
    request: RequestDescriptor,
}

impl Curl {
    /// Start from an empty GET request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a curl command string.
    pub fn from_command(command: &str) -> Result<Self> {
        Ok(Self {
            request: parser::parse(command)?,
        })
    }

    /// Start from a pre-tokenized curl argument array.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        Ok(Self {
            request: parser::parse_args(args)?,
        })
    }

    /// Start from an existing descriptor, deep-copying it.
    pub fn from_descriptor(request: &RequestDescriptor) -> Self {
        Self {
            request: request.clone(),
        }
    }

    /// Set the URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.request.url = url.into();
        self
    }

    /// Set the method (uppercased).
    pub fn method(mut self, method: impl AsRef<str>) -> Self {
        self.request.set_method(method);
        self
    }

    /// Use the `GET` method.
    pub fn get(self) -> Self {
        self.method("GET")
    }

    /// Use the `POST` method.
    pub fn post(self) -> Self {
        self.method("POST")
    }

    /// Use the `PUT` method.
    pub fn put(self) -> Self {
        self.method("PUT")
    }

    /// Use the `DELETE` method.
    pub fn delete(self) -> Self {
        self.method("DELETE")
    }

    /// Use the `PATCH` method.
    pub fn patch(self) -> Self {
        self.method("PATCH")
    }

    /// Use the `HEAD` method.
    pub fn head(self) -> Self {
        self.method("HEAD")
    }

    /// Add a header, keeping earlier values of the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.append(name, value);
        self
    }

    /// Set a header, replacing every earlier value of the same name.
    pub fn set_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.set(name, value);
        self
    }

    /// Add a batch of headers.
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.request.headers.append(name, value);
        }
        self
    }

    /// Add a query parameter, keeping earlier values of the same key.
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.query_params.append(key, value.into());
        self
    }

    /// Set a query parameter, replacing every earlier value of the same key.
    pub fn set_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.query_params.set(key, value.into());
        self
    }

    /// Add a batch of query parameters.
    pub fn query_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in params {
            self.request.query_params.append(key, value.into());
        }
        self
    }

    /// Set the text body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.request.body = Some(body.into());
        self
    }

    /// Set a JSON text body and the matching `Content-Type` header.
    pub fn json_body(mut self, json: impl Into<String>) -> Self {
        self.request.body = Some(json.into());
        self.request.headers.set(CONTENT_TYPE, "application/json");
        self
    }

    /// Set the binary body.
    pub fn binary_body(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.request.binary_body = Some(data.into());
        self
    }

    /// Read the binary body from a file.
    pub fn binary_body_from_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.request.binary_body = Some(fs::read(path).map_err(Error::Io)?);
        Ok(self)
    }

    /// Add a text form field.
    pub fn form_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.add_form_field(name, FormField::text(value));
        self
    }

    /// Add a file form field advertising the path's base name.
    pub fn form_file(mut self, name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        self.request
            .add_form_field(name, FormField::file(path.as_ref()));
        self
    }

    /// Add a file form field with an explicit file name and content type.
    pub fn form_file_with(
        mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        self.request.add_form_field(
            name,
            FormField::file_with(path.as_ref(), file_name, content_type),
        );
        self
    }

    /// Set Basic authentication credentials.
    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.request.username = Some(username.into());
        self.request.password = Some(password.into());
        self
    }

    /// Set an `Authorization: Bearer` header.
    pub fn bearer_token(mut self, token: impl AsRef<str>) -> Self {
        self.request
            .headers
            .set(AUTHORIZATION, format!("Bearer {}", token.as_ref()));
        self
    }

    /// Add a cookie, replacing an earlier value of the same name.
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.cookies.set(name, value.into());
        self
    }

    /// Add a batch of cookies.
    pub fn cookies<K, V>(mut self, cookies: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in cookies {
            self.request.cookies.set(name, value.into());
        }
        self
    }

    /// Set the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.request.headers.set(USER_AGENT, user_agent);
        self
    }

    /// Set the `Referer` header.
    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.request.headers.set(REFERER, referer);
        self
    }

    /// Request compressed transfer: sets the flag and the
    /// `Accept-Encoding: gzip, deflate` header.
    pub fn compressed(mut self) -> Self {
        self.request.config.compressed = true;
        self.request
            .headers
            .set(ACCEPT_ENCODING, "gzip, deflate");
        self
    }

    /// Follow redirect responses automatically.
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.request.config.follow_redirects = follow;
        self
    }

    /// Disable TLS certificate and hostname verification.
    pub fn insecure(mut self) -> Self {
        self.request.config.verify_tls = false;
        self
    }

    /// Enable or disable TLS verification.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.request.config.verify_tls = verify;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.request.config.connect_timeout = timeout;
        self
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.request.config.read_timeout = timeout;
        self
    }

    /// Set the proxy from a `scheme://host:port` spec; scheme and port are
    /// optional and default to HTTP and 8080 (1080 for SOCKS).
    pub fn proxy(mut self, spec: &str) -> Result<Self> {
        parser::apply_value_flag(&mut self.request, "--proxy", spec)?;
        Ok(self)
    }

    /// Set proxy authentication credentials.
    pub fn proxy_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.request.config.proxy.username = Some(username.into());
        self.request.config.proxy.password = Some(password.into());
        self
    }

    /// Set the number of retries after a failed attempt.
    pub fn retry(mut self, max_retries: u32) -> Self {
        self.request.config.max_retries = max_retries;
        self
    }

    /// Set the constant delay between attempts.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.request.config.retry_delay = delay;
        self
    }

    /// Cap the response body size in bytes (0 = unlimited).
    pub fn max_download_size(mut self, bytes: u64) -> Self {
        self.request.config.max_download_size = bytes;
        self
    }

    /// Apply a curl option that takes a value, e.g.
    /// `opt("-H", "Content-Type: application/json")`. The switch options
    /// `-G`, `-L`, `-k` and `--compressed` are accepted here too with the
    /// value ignored; `-I` is only accepted by [`flag`](Curl::flag).
    pub fn opt(mut self, option: &str, value: &str) -> Result<Self> {
        if parser::is_value_flag(option) {
            parser::apply_value_flag(&mut self.request, option, value)?;
            return Ok(self);
        }
        match option {
            "-G" | "--get" | "-L" | "--location" | "-k" | "--insecure" | "--compressed" => {
                parser::apply_switch(&mut self.request, option);
                Ok(self)
            }
            _ => Err(Error::InvalidArgument(format!("unknown option: {option}"))),
        }
    }

    /// Apply a curl switch option that takes no value, e.g. `flag("-k")`.
    pub fn flag(mut self, option: &str) -> Result<Self> {
        if parser::apply_switch(&mut self.request, option) {
            Ok(self)
        } else {
            Err(Error::InvalidArgument(format!("unknown option: {option}")))
        }
    }

    /// Validate and normalize the URL, then return a deep-copied snapshot of
    /// the descriptor. The builder remains usable afterwards.
    pub fn build(&self) -> Result<RequestDescriptor> {
        let mut request = self.request.clone();
        parser::normalize_url(&mut request)?;
        Ok(request)
    }

    /// The live descriptor being built, without validation.
    pub fn peek(&self) -> &RequestDescriptor {
        &self.request
    }

    /// Build and execute on the default back end.
    #[cfg(any(feature = "ureq", feature = "reqwest", feature = "curl"))]
    pub fn exec(&self) -> Result<ResponseDescriptor> {
        self.exec_with(&crate::DefaultExecutor::default())
    }

    /// Build and execute on the given back end.
    pub fn exec_with(&self, executor: &dyn Executor) -> Result<ResponseDescriptor> {
        executor.execute(&self.build()?)
    }
}
