//! libcurl back end for rcurl.
//!
//! Each attempt runs on a fresh `curl::easy::Easy` handle configured from
//! the descriptor's config; verification toggles and proxy settings never
//! outlive the attempt. The status line and headers are collected in the
//! header callback, the body in the write callback — which also enforces
//! the download cap by refusing further bytes. Multipart bodies use the
//! shared in-house encoder rather than libcurl's legacy form API.

use std::fmt;
use std::io;

use curl::easy::{Easy, List};
use log::debug;
use rcurl_interface::header::standard::CONTENT_TYPE;
use rcurl_interface::wire::{self, PlannedBody, RequestPlan};
use rcurl_interface::{
    Error, Executor, HeaderMap, RequestConfig, RequestDescriptor, ResponseDescriptor, Result,
};

/// Executes requests with libcurl via the [`curl`] crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlExecutor;

#[derive(Default)]
struct HeaderState {
    status_code: u16,
    status_message: String,
    lines: Vec<(String, String)>,
    complete: bool,
}

impl HeaderState {
    fn push(&mut self, raw: &[u8]) {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            self.complete = true;
        } else if let Some(status_line) = line.strip_prefix("HTTP/") {
            // A new status line means a redirect hop finished; headers
            // collected so far belong to the discarded response.
            self.lines.clear();
            self.complete = false;
            let mut fields = status_line.splitn(3, ' ');
            let _version = fields.next();
            self.status_code = fields.next().and_then(|code| code.parse().ok()).unwrap_or(0);
            self.status_message = fields.next().unwrap_or_default().to_owned();
        } else if let Some((name, value)) = line.split_once(':') {
            self.lines
                .push((name.trim().to_owned(), value.trim().to_owned()));
        }
    }
}

struct BodySink {
    data: Vec<u8>,
    received: u64,
    max: u64,
    exceeded: bool,
}

impl BodySink {
    fn new(max: u64) -> Self {
        Self {
            data: Vec::new(),
            received: 0,
            max,
            exceeded: false,
        }
    }

    fn accept(&mut self, chunk: &[u8]) -> bool {
        self.received += chunk.len() as u64;
        if self.max > 0 && self.received > self.max {
            self.exceeded = true;
            return false;
        }
        self.data.extend_from_slice(chunk);
        true
    }
}

impl CurlExecutor {
    /// Create a new executor.
    pub fn new() -> Self {
        Self
    }

    fn attempt(plan: &RequestPlan, config: &RequestConfig) -> Result<ResponseDescriptor> {
        let mut easy = Easy::new();
        easy.url(&plan.url).map_err(into_io)?;
        easy.connect_timeout(config.connect_timeout).map_err(into_io)?;
        easy.timeout(config.read_timeout).map_err(into_io)?;
        easy.follow_location(config.follow_redirects)
            .map_err(into_io)?;
        if !config.verify_tls {
            easy.ssl_verify_peer(false)
                .map_err(|err| Error::Configuration(err.to_string()))?;
            easy.ssl_verify_host(false)
                .map_err(|err| Error::Configuration(err.to_string()))?;
        }
        if let Some(endpoint) = config.proxy.endpoint() {
            easy.proxy(&endpoint).map_err(into_io)?;
            if let Some(username) = config.proxy.username.as_deref() {
                easy.proxy_username(username).map_err(into_io)?;
                easy.proxy_password(config.proxy.password.as_deref().unwrap_or(""))
                    .map_err(into_io)?;
            }
        }

        let mut list = List::new();
        for (name, value) in &plan.headers {
            list.append(&format!("{name}: {value}")).map_err(into_io)?;
        }
        let body_bytes = match &plan.body {
            None => None,
            Some(PlannedBody::Bytes { content }) => Some(content.clone()),
            Some(PlannedBody::Multipart { parts }) => {
                let encoded = wire::encode_multipart(parts);
                list.append(&format!("{CONTENT_TYPE}: {}", encoded.content_type))
                    .map_err(into_io)?;
                Some(encoded.content)
            }
        };
        easy.http_headers(list).map_err(into_io)?;

        match (plan.method.as_str(), &body_bytes) {
            ("HEAD", _) => easy.nobody(true).map_err(into_io)?,
            ("GET", None) => {}
            (method, None) => easy.custom_request(method).map_err(into_io)?,
            (method, Some(bytes)) => {
                easy.post(true).map_err(into_io)?;
                easy.post_fields_copy(bytes).map_err(into_io)?;
                easy.custom_request(method).map_err(into_io)?;
            }
        }

        let mut head = HeaderState::default();
        let mut sink = BodySink::new(config.max_download_size);
        let outcome = {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|line| {
                    head.push(line);
                    true
                })
                .map_err(into_io)?;
            transfer
                .write_function(|chunk| {
                    if sink.accept(chunk) {
                        Ok(chunk.len())
                    } else {
                        // Refusing the chunk makes libcurl abort the
                        // transfer with a write error.
                        Ok(0)
                    }
                })
                .map_err(into_io)?;
            transfer.perform()
        };

        if let Err(err) = outcome {
            if sink.exceeded {
                return Err(Error::ResponseTooLarge);
            }
            if !head.complete {
                return Err(Error::Io(io::Error::other(err)));
            }
            // Status and headers arrived before the body read failed; the
            // response is still surfaced, with empty body bytes.
            sink.data.clear();
        }

        let mut headers = HeaderMap::new();
        for (name, value) in head.lines {
            headers.append(name, value);
        }
        let body = wire::decode_content(&headers, sink.data).unwrap_or_default();
        Ok(ResponseDescriptor {
            status_code: head.status_code,
            status_message: head.status_message,
            headers,
            body,
        })
    }
}

impl Executor for CurlExecutor {
    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurlExecutor")
    }

    fn execute(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor> {
        let plan = RequestPlan::prepare(request)?;
        debug!("curl: {} {}", plan.method, plan.url);
        wire::run_with_retry(&request.config, || Self::attempt(&plan, &request.config))
    }
}

fn into_io(err: curl::Error) -> Error {
    Error::Io(io::Error::other(err))
}

#[cfg(test)]
mod tests {
    use rcurl_interface::ProxyKind;

    use super::*;

    #[test]
    fn header_state_parses_the_status_line_and_headers() {
        let mut head = HeaderState::default();
        head.push(b"HTTP/1.1 404 Not Found\r\n");
        head.push(b"Content-Type: text/plain\r\n");
        head.push(b"Set-Cookie: a=1\r\n");
        head.push(b"Set-Cookie: b=2\r\n");
        head.push(b"\r\n");
        assert_eq!(head.status_code, 404);
        assert_eq!(head.status_message, "Not Found");
        assert!(head.complete);
        assert_eq!(head.lines.len(), 3);
    }

    #[test]
    fn redirect_hops_discard_earlier_headers() {
        let mut head = HeaderState::default();
        head.push(b"HTTP/1.1 302 Found\r\n");
        head.push(b"Location: /elsewhere\r\n");
        head.push(b"\r\n");
        head.push(b"HTTP/1.1 200 OK\r\n");
        head.push(b"Content-Length: 2\r\n");
        head.push(b"\r\n");
        assert_eq!(head.status_code, 200);
        assert_eq!(head.status_message, "OK");
        assert_eq!(head.lines, [("Content-Length".to_owned(), "2".to_owned())]);
    }

    #[test]
    fn body_sink_stops_at_the_cap() {
        let mut sink = BodySink::new(10);
        assert!(sink.accept(&[0u8; 10]));
        assert!(!sink.accept(&[0u8; 1]));
        assert!(sink.exceeded);

        let mut unlimited = BodySink::new(0);
        assert!(unlimited.accept(&vec![0u8; 1 << 16]));
    }

    #[test]
    fn proxy_kind_is_reflected_in_the_endpoint_scheme() {
        let mut config = RequestConfig::default();
        config.proxy.kind = ProxyKind::Socks;
        config.proxy.host = Some("h".to_owned());
        config.proxy.port = 9;
        assert_eq!(config.proxy.endpoint().as_deref(), Some("socks5://h:9"));
    }
}
