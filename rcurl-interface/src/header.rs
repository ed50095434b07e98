//! Case-insensitive, insertion-ordered HTTP header storage.

/// Names of the headers the translator reads or writes itself.
pub mod standard {
    /// `Accept-Encoding`, set by `--compressed`.
    pub const ACCEPT_ENCODING: &str = "Accept-Encoding";
    /// `Authorization`, synthesized for Basic credentials and bearer tokens.
    pub const AUTHORIZATION: &str = "Authorization";
    /// `Proxy-Authorization`, synthesized for authenticated HTTP proxies.
    pub const PROXY_AUTHORIZATION: &str = "Proxy-Authorization";
    /// `Cookie`, synthesized from the descriptor's cookie map.
    pub const COOKIE: &str = "Cookie";
    /// `Content-Type` of the request or response body.
    pub const CONTENT_TYPE: &str = "Content-Type";
    /// `Content-Encoding` of the response body.
    pub const CONTENT_ENCODING: &str = "Content-Encoding";
    /// `User-Agent`, set by `-A`.
    pub const USER_AGENT: &str = "User-Agent";
    /// `Referer`, set by `-e`.
    pub const REFERER: &str = "Referer";
}

/// A multi-valued header map.
///
/// Lookup is ASCII-case-insensitive. Iteration yields header names in
/// first-insertion order carrying the casing of the first insert, and the
/// values of a name in their own insertion order — repeated names are
/// retained, not overwritten, unless [`set`](HeaderMap::set) is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderMap {
    /// Create an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Add a value for `name`, keeping any values already present.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx].1.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// Replace every value of `name` with `value`, preserving the name's
    /// position and original casing when it already exists.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx].1 = vec![value],
            None => self.entries.push((name, vec![value])),
        }
    }

    /// First value recorded for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name)
            .and_then(|idx| self.entries[idx].1.first())
            .map(String::as_str)
    }

    /// Every value recorded for `name`, in insertion order.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.position(name)
            .map(|idx| self.entries[idx].1.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `name` has at least one value.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Header names in first-insertion order, first-seen casing.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Every `(name, value)` pair, flattened in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no headers at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_names_keep_every_value() {
        let mut headers = HeaderMap::new();
        headers.append("X-Trace", "1");
        headers.append("x-trace", "2");
        assert_eq!(headers.get_all("X-TRACE"), ["1", "2"]);
        assert_eq!(headers.get("x-Trace"), Some("1"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn first_seen_casing_is_preserved() {
        let mut headers = HeaderMap::new();
        headers.append("Content-Type", "text/plain");
        headers.append("CONTENT-TYPE", "text/html");
        assert_eq!(headers.names().collect::<Vec<_>>(), ["Content-Type"]);
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            [("Content-Type", "text/plain"), ("Content-Type", "text/html")]
        );
    }

    #[test]
    fn set_replaces_all_values() {
        let mut headers = HeaderMap::new();
        headers.append("Accept", "text/html");
        headers.append("Accept", "text/plain");
        headers.set("accept", "*/*");
        assert_eq!(headers.get_all("Accept"), ["*/*"]);
    }
}
