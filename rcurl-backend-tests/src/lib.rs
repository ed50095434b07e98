#![cfg(test)]

//! Cross-back-end behavior tests.
//!
//! One in-process hyper server is shared by every test; fixtures register a
//! handler under a unique path and requests are driven through each of the
//! three executors, which must behave identically for the same descriptor.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{LazyLock, Mutex};

use http_body_util::{BodyExt as _, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use rcurl::Executor;
use rcurl_backend_curl::CurlExecutor;
use rcurl_backend_reqwest::ReqwestExecutor;
use rcurl_backend_ureq::UreqExecutor;
use tokio::net::TcpListener;

mod fixtures;

/// A request as seen by the fixture server, with the body already
/// collected.
pub struct ReceivedRequest {
    pub method: String,
    pub uri: String,
    /// Header names are lowercased by hyper; values keep their order.
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

type FixtureCallback = Box<dyn Fn(&ReceivedRequest) -> Response<Full<Bytes>> + Send + Sync>;

static FIXTURES: Mutex<BTreeMap<String, FixtureCallback>> = Mutex::new(BTreeMap::new());

static TOKIO_RT: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("build fixture runtime")
});

static SERVER_PORT: LazyLock<u16> = LazyLock::new(|| {
    TOKIO_RT.block_on(async {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("bind fixture server");
        let port = listener.local_addr().expect("fixture server addr").port();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    continue;
                };
                tokio::spawn(async move {
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service_fn(handle_service))
                        .await;
                });
            }
        });
        port
    })
});

async fn handle_service(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = body
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .unwrap_or_default();
    let received = ReceivedRequest {
        method: parts.method.to_string(),
        uri: parts.uri.to_string(),
        headers: parts
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect(),
        body,
    };
    let path = parts.uri.path().to_owned();
    let response = {
        let fixtures = FIXTURES.lock().unwrap();
        match fixtures.get(&path) {
            Some(callback) => callback(&received),
            None => Response::builder()
                .status(404)
                .body(Full::new(Bytes::new()))
                .unwrap(),
        }
    };
    Ok(response)
}

/// Register a handler under `path` on the shared fixture server.
pub fn add_fixture(
    path: impl Into<String>,
    callback: impl Fn(&ReceivedRequest) -> Response<Full<Bytes>> + Send + Sync + 'static,
) {
    let mut path = path.into();
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    FIXTURES.lock().unwrap().insert(path, Box::new(callback));
}

/// Absolute URL of `path` on the fixture server.
pub fn url_for(path: &str) -> String {
    format!("http://127.0.0.1:{}/{}", *SERVER_PORT, path.trim_start_matches('/'))
}

/// The three executors under test, labeled for assertion messages.
pub fn executors() -> Vec<(&'static str, Box<dyn Executor>)> {
    vec![
        ("ureq", Box::new(UreqExecutor::new())),
        ("reqwest", Box::new(ReqwestExecutor::new())),
        ("curl", Box::new(CurlExecutor::new())),
    ]
}

/// A fixture handler echoing the request back: first line `METHOD URI`,
/// then one `name: value` line per header, a blank line, and the raw body.
/// The request method is additionally exposed as the `echo-method` response
/// header so HEAD requests can be asserted on too.
pub fn dump_handler(req: &ReceivedRequest) -> Response<Full<Bytes>> {
    let mut text = format!("{} {}\n", req.method, req.uri);
    for (name, value) in &req.headers {
        text.push_str(name);
        text.push_str(": ");
        text.push_str(value);
        text.push('\n');
    }
    text.push('\n');
    let mut bytes = text.into_bytes();
    bytes.extend_from_slice(&req.body);
    Response::builder()
        .header("echo-method", req.method.clone())
        .body(Full::new(Bytes::from(bytes)))
        .unwrap()
}
