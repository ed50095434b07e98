//! Curl-style option parsing into a [`RequestDescriptor`].

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::warn;
use rcurl_interface::header::standard::{ACCEPT_ENCODING, REFERER, USER_AGENT};
use rcurl_interface::wire;
use rcurl_interface::{Error, FormField, ProxyKind, RequestDescriptor, Result};

use crate::tokenizer::tokenize;

/// Parse a full curl command string into a request descriptor.
///
/// Equivalent to [`tokenize`] followed by [`parse_args`].
pub fn parse(command: &str) -> Result<RequestDescriptor> {
    parse_args(&tokenize(command))
}

/// Parse a pre-tokenized curl argument array into a request descriptor.
///
/// Recognizes the practical subset of curl options listed on
/// [`Curl::opt`](crate::Curl::opt); a leading literal `curl` token is
/// skipped and a bare token not starting with `-` is taken as the URL.
/// Fails with [`Error::InvalidArgument`] on an unknown flag, a flag missing
/// its value, malformed header/form syntax, an unparsable number, or a
/// missing URL. A URL without an `http://`/`https://` prefix gets
/// `https://` prepended.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<RequestDescriptor> {
    let mut request = RequestDescriptor::new();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_ref();
        if arg == "curl" {
            i += 1;
            continue;
        }
        if apply_switch(&mut request, arg) {
            i += 1;
            continue;
        }
        if is_value_flag(arg) {
            let value = args
                .get(i + 1)
                .map(AsRef::as_ref)
                .ok_or_else(|| Error::InvalidArgument(format!("argument expected after: {arg}")))?;
            apply_value_flag(&mut request, arg, value)?;
            i += 2;
            continue;
        }
        if !arg.starts_with('-') {
            request.url = arg.to_owned();
            i += 1;
            continue;
        }
        return Err(Error::InvalidArgument(format!("unknown option: {arg}")));
    }
    normalize_url(&mut request)?;
    Ok(request)
}

/// Validate that a URL is present and prepend `https://` when no scheme is
/// given. Shared between the parser and [`Curl::build`](crate::Curl::build).
pub(crate) fn normalize_url(request: &mut RequestDescriptor) -> Result<()> {
    if request.url.is_empty() {
        return Err(Error::InvalidArgument("URL must be specified".into()));
    }
    if !request.url.starts_with("http://") && !request.url.starts_with("https://") {
        request.url = format!("https://{}", request.url);
    }
    Ok(())
}

pub(crate) fn is_value_flag(flag: &str) -> bool {
    matches!(
        flag,
        "-X" | "--request"
            | "-H"
            | "--header"
            | "-d"
            | "--data"
            | "--data-ascii"
            | "--data-raw"
            | "--data-binary"
            | "--data-urlencode"
            | "-F"
            | "--form"
            | "--form-string"
            | "-u"
            | "--user"
            | "-A"
            | "--user-agent"
            | "-e"
            | "--referer"
            | "-b"
            | "--cookie"
            | "--connect-timeout"
            | "-m"
            | "--max-time"
            | "-x"
            | "--proxy"
            | "-U"
            | "--proxy-user"
            | "--retry"
            | "--retry-delay"
            | "--x-max-download"
            | "--url"
    )
}

/// Apply a flag that consumes a value. The flag must satisfy
/// [`is_value_flag`].
pub(crate) fn apply_value_flag(
    request: &mut RequestDescriptor,
    flag: &str,
    value: &str,
) -> Result<()> {
    match flag {
        "-X" | "--request" => request.set_method(value),
        "-H" | "--header" => parse_header(request, value)?,
        "-d" | "--data" | "--data-ascii" | "--data-raw" => {
            request.body = Some(value.to_owned());
            promote_to_post(request);
        }
        "--data-binary" => {
            request.binary_body = Some(match value.strip_prefix('@') {
                Some(path) => fs::read(path).map_err(|err| {
                    Error::InvalidArgument(format!("cannot read {path}: {err}"))
                })?,
                None => value.as_bytes().to_vec(),
            });
            promote_to_post(request);
        }
        "--data-urlencode" => {
            request.body = Some(wire::form_urlencode(value));
            promote_to_post(request);
        }
        "-F" | "--form" | "--form-string" => {
            parse_form_field(request, value)?;
            promote_to_post(request);
        }
        "-u" | "--user" => parse_auth(request, value),
        "-A" | "--user-agent" => request.headers.append(USER_AGENT, value),
        "-e" | "--referer" => request.headers.append(REFERER, value),
        "-b" | "--cookie" => parse_cookies(request, value),
        "--connect-timeout" => {
            request.config.connect_timeout = Duration::from_secs(parse_number(flag, value)?);
        }
        "-m" | "--max-time" => {
            request.config.read_timeout = Duration::from_secs(parse_number(flag, value)?);
        }
        "-x" | "--proxy" => parse_proxy(request, value)?,
        "-U" | "--proxy-user" => parse_proxy_auth(request, value),
        "--retry" => request.config.max_retries = parse_number(flag, value)?,
        "--retry-delay" => {
            request.config.retry_delay = Duration::from_secs(parse_number(flag, value)?);
        }
        "--x-max-download" => request.config.max_download_size = parse_number(flag, value)?,
        "--url" => request.url = value.to_owned(),
        _ => return Err(Error::InvalidArgument(format!("unknown option: {flag}"))),
    }
    Ok(())
}

/// Apply a switch that takes no value. Returns whether the flag was
/// recognized.
pub(crate) fn apply_switch(request: &mut RequestDescriptor, flag: &str) -> bool {
    match flag {
        "-G" | "--get" => {
            if let Some(body) = request.body.take() {
                parse_query_string(request, &body);
            }
            request.set_method("GET");
        }
        "-L" | "--location" => request.config.follow_redirects = true,
        "-k" | "--insecure" => request.config.verify_tls = false,
        "--compressed" => {
            request.config.compressed = true;
            request.headers.append(ACCEPT_ENCODING, "gzip, deflate");
        }
        "-I" | "--head" => request.set_method("HEAD"),
        _ => return false,
    }
    true
}

// Data and form flags force POST only while the method is still the GET
// default.
fn promote_to_post(request: &mut RequestDescriptor) {
    if request.method == "GET" {
        request.set_method("POST");
    }
}

fn parse_header(request: &mut RequestDescriptor, header: &str) -> Result<()> {
    let (name, value) = header
        .split_once(':')
        .ok_or_else(|| Error::InvalidArgument(format!("invalid header format: {header}")))?;
    request.headers.append(name.trim(), value.trim());
    Ok(())
}

fn parse_form_field(request: &mut RequestDescriptor, field: &str) -> Result<()> {
    let (name, value) = field
        .split_once('=')
        .ok_or_else(|| Error::InvalidArgument(format!("invalid form field format: {field}")))?;
    let (name, value) = (name.trim(), value.trim());
    let field = match value.strip_prefix('@') {
        Some(path) => FormField::file(path),
        None => FormField::text(value),
    };
    request.add_form_field(name, field);
    Ok(())
}

fn parse_auth(request: &mut RequestDescriptor, auth: &str) {
    match auth.split_once(':') {
        Some((username, password)) => {
            request.username = Some(username.to_owned());
            request.password = Some(password.to_owned());
        }
        None => request.username = Some(auth.to_owned()),
    }
}

// `-b` accepts either a literal cookie string or the path of a readable
// cookie file; an unreadable path falls back to the literal interpretation.
fn parse_cookies(request: &mut RequestDescriptor, value: &str) {
    let contents = if Path::new(value).exists() {
        fs::read_to_string(value)
            .map(|text| text.trim().to_owned())
            .unwrap_or_else(|_| value.to_owned())
    } else {
        value.to_owned()
    };
    for pair in contents.split(';') {
        if let Some((name, value)) = pair.trim().split_once('=') {
            request.cookies.set(name.trim(), value.trim().to_owned());
        }
    }
}

fn parse_proxy(request: &mut RequestDescriptor, spec: &str) -> Result<()> {
    let mut rest = spec;
    let mut kind = ProxyKind::Http;
    if let Some((scheme, remainder)) = spec.split_once("://") {
        rest = remainder;
        kind = match scheme.to_ascii_lowercase().as_str() {
            "http" | "https" => ProxyKind::Http,
            "socks" | "socks4" | "socks5" => ProxyKind::Socks,
            unknown => {
                warn!("unknown proxy protocol '{unknown}', using HTTP");
                ProxyKind::Http
            }
        };
    }
    let proxy = &mut request.config.proxy;
    proxy.kind = kind;
    match rest.split_once(':') {
        Some((host, port)) => {
            proxy.host = Some(host.to_owned());
            proxy.port = port
                .parse()
                .map_err(|_| Error::InvalidArgument(format!("invalid proxy port: {port}")))?;
        }
        None => {
            proxy.host = Some(rest.to_owned());
            proxy.port = match kind {
                ProxyKind::Http => 8080,
                ProxyKind::Socks => 1080,
            };
        }
    }
    Ok(())
}

fn parse_proxy_auth(request: &mut RequestDescriptor, auth: &str) {
    let proxy = &mut request.config.proxy;
    match auth.split_once(':') {
        Some((username, password)) => {
            proxy.username = Some(username.to_owned());
            proxy.password = Some(password.to_owned());
        }
        None => proxy.username = Some(auth.to_owned()),
    }
}

// `-G` reinterprets an accumulated body as an `&`-joined query string; a
// bare name without `=` maps to an empty value.
fn parse_query_string(request: &mut RequestDescriptor, query: &str) {
    for pair in query.split('&') {
        match pair.split_once('=') {
            Some((name, value)) => request.query_params.append(name, value.to_owned()),
            None => request.query_params.append(pair, String::new()),
        }
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("invalid numeric value for {flag}: {value}")))
}
