//! ureq back end for rcurl.
//!
//! One `ureq::Agent` is built per attempt from the descriptor's config, so
//! timeouts, redirect policy, proxying and TLS verification are scoped to
//! the request at hand — disabling verification for one request cannot
//! affect any other.
//!
//! Transport quirks worth knowing: ureq 2 replaces a repeated request header
//! unless its name starts with `x-`/`X-`, so only such custom headers keep
//! multiple values on the wire, and multipart bodies are produced by the
//! shared in-house encoder since ureq has no multipart builder.

use std::fmt;
use std::io;
use std::sync::Arc;

use log::debug;
use rcurl_interface::header::standard::CONTENT_TYPE;
use rcurl_interface::wire::{self, PlannedBody, RequestPlan};
use rcurl_interface::{
    Error, Executor, HeaderMap, ProxyKind, RequestConfig, RequestDescriptor, ResponseDescriptor,
    Result,
};

/// Executes requests with [`ureq`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqExecutor;

impl UreqExecutor {
    /// Create a new executor.
    pub fn new() -> Self {
        Self
    }

    fn build_agent(config: &RequestConfig) -> Result<ureq::Agent> {
        let mut builder = ureq::AgentBuilder::new()
            .timeout_connect(config.connect_timeout)
            .timeout_read(config.read_timeout)
            .redirects(if config.follow_redirects { 10 } else { 0 });
        if let Some(url) = proxy_url(config) {
            let proxy = ureq::Proxy::new(&url)
                .map_err(|err| Error::InvalidArgument(format!("invalid proxy: {err}")))?;
            builder = builder.proxy(proxy);
        }
        if !config.verify_tls {
            let connector = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()
                .map_err(|err| Error::Configuration(err.to_string()))?;
            builder = builder.tls_connector(Arc::new(connector));
        }
        Ok(builder.build())
    }

    fn attempt(plan: &RequestPlan, config: &RequestConfig) -> Result<ResponseDescriptor> {
        let agent = Self::build_agent(config)?;
        let mut req = agent.request(&plan.method, &plan.url);
        for (name, value) in &plan.headers {
            req = req.set(name, value);
        }

        let result = match &plan.body {
            None => req.call(),
            Some(PlannedBody::Bytes { content }) => req.send_bytes(content),
            Some(PlannedBody::Multipart { parts }) => {
                let encoded = wire::encode_multipart(parts);
                req = req.set(CONTENT_TYPE, &encoded.content_type);
                req.send_bytes(&encoded.content)
            }
        };
        // A non-2xx status is still a complete response, not a transport
        // failure.
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => {
                return Err(Error::Io(io::Error::other(transport.to_string())));
            }
        };

        let status_code = response.status();
        let status_message = response.status_text().to_owned();
        let mut headers = HeaderMap::new();
        for name in response.headers_names() {
            for value in response.all(&name) {
                headers.append(name.clone(), value);
            }
        }
        let mut reader = response.into_reader();
        let body = wire::read_body(&mut reader, &headers, config.max_download_size)?;
        Ok(ResponseDescriptor {
            status_code,
            status_message,
            headers,
            body,
        })
    }
}

impl Executor for UreqExecutor {
    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UreqExecutor")
    }

    fn execute(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor> {
        let plan = RequestPlan::prepare(request)?;
        debug!("ureq: {} {}", plan.method, plan.url);
        wire::run_with_retry(&request.config, || Self::attempt(&plan, &request.config))
    }
}

fn proxy_url(config: &RequestConfig) -> Option<String> {
    let proxy = &config.proxy;
    let host = proxy.host.as_deref()?;
    let scheme = match proxy.kind {
        ProxyKind::Http => "http",
        ProxyKind::Socks => "socks5",
    };
    let credentials = match proxy.username.as_deref() {
        Some(username) => format!(
            "{username}:{}@",
            proxy.password.as_deref().unwrap_or_default()
        ),
        None => String::new(),
    };
    Some(format!("{scheme}://{credentials}{host}:{}", proxy.port))
}

#[cfg(test)]
mod tests {
    use rcurl_interface::ProxyConfig;

    use super::*;

    #[test]
    fn proxy_url_carries_kind_and_credentials() {
        let mut config = RequestConfig::default();
        assert_eq!(proxy_url(&config), None);

        config.proxy = ProxyConfig {
            kind: ProxyKind::Socks,
            host: Some("h".to_owned()),
            port: 1080,
            username: Some("bob".to_owned()),
            password: Some("pw".to_owned()),
        };
        assert_eq!(
            proxy_url(&config).as_deref(),
            Some("socks5://bob:pw@h:1080")
        );
    }
}
