//! reqwest back end for rcurl.
//!
//! A fresh blocking `reqwest::Client` is configured per attempt from the
//! descriptor's config; the `danger_accept_invalid_*` toggles therefore
//! apply to exactly one request. Multipart bodies use reqwest's native form
//! builder. Automatic decompression stays disabled so the shared wire layer
//! owns Content-Encoding handling, as it does for every back end.

use std::fmt;
use std::io;

use log::debug;
use reqwest::blocking::multipart;
use rcurl_interface::wire::{self, PlannedBody, PlannedPart, PlannedPartKind, RequestPlan};
use rcurl_interface::{
    Error, Executor, HeaderMap, RequestConfig, RequestDescriptor, ResponseDescriptor, Result,
};

/// Executes requests with [`reqwest`]'s blocking client.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestExecutor;

impl ReqwestExecutor {
    /// Create a new executor.
    pub fn new() -> Self {
        Self
    }

    fn build_client(config: &RequestConfig) -> Result<reqwest::blocking::Client> {
        let mut builder = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            });
        if !config.verify_tls {
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }
        if let Some(endpoint) = config.proxy.endpoint() {
            let mut proxy = reqwest::Proxy::all(endpoint.as_str())
                .map_err(|err| Error::InvalidArgument(format!("invalid proxy: {err}")))?;
            if let Some(username) = config.proxy.username.as_deref() {
                proxy =
                    proxy.basic_auth(username, config.proxy.password.as_deref().unwrap_or(""));
            }
            builder = builder.proxy(proxy);
        }
        builder
            .build()
            .map_err(|err| Error::Configuration(err.to_string()))
    }

    fn attempt(plan: &RequestPlan, config: &RequestConfig) -> Result<ResponseDescriptor> {
        let client = Self::build_client(config)?;
        let method = reqwest::Method::from_bytes(plan.method.as_bytes())
            .map_err(|_| Error::InvalidArgument(format!("invalid method: {}", plan.method)))?;
        let mut req = client.request(method, plan.url.as_str());
        for (name, value) in &plan.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        req = match &plan.body {
            None => req,
            Some(PlannedBody::Bytes { content }) => req.body(content.clone()),
            Some(PlannedBody::Multipart { parts }) => req.multipart(build_form(parts)?),
        };

        let mut response = req.send().map_err(into_io)?;
        let status = response.status();
        let status_code = status.as_u16();
        let status_message = status.canonical_reason().unwrap_or_default().to_owned();
        let mut headers = HeaderMap::new();
        for (name, value) in response.headers() {
            headers.append(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }
        let body = wire::read_body(&mut response, &headers, config.max_download_size)?;
        Ok(ResponseDescriptor {
            status_code,
            status_message,
            headers,
            body,
        })
    }
}

impl Executor for ReqwestExecutor {
    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReqwestExecutor")
    }

    fn execute(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor> {
        let plan = RequestPlan::prepare(request)?;
        debug!("reqwest: {} {}", plan.method, plan.url);
        wire::run_with_retry(&request.config, || Self::attempt(&plan, &request.config))
    }
}

fn build_form(parts: &[PlannedPart]) -> Result<multipart::Form> {
    let mut form = multipart::Form::new();
    for part in parts {
        let piece = match &part.kind {
            PlannedPartKind::Text(value) => multipart::Part::text(value.clone()),
            PlannedPartKind::File {
                file_name,
                content_type,
                content,
            } => multipart::Part::bytes(content.clone())
                .file_name(file_name.clone())
                .mime_str(content_type)
                .map_err(|err| {
                    Error::InvalidArgument(format!("invalid content type: {err}"))
                })?,
        };
        form = form.part(part.name.clone(), piece);
    }
    Ok(form)
}

fn into_io(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Io(io::Error::new(io::ErrorKind::TimedOut, err))
    } else {
        Error::Io(io::Error::other(err))
    }
}
