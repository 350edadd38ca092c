//! Request signals the gate decides on.
//!
//! The host builds one `RequestContext` per inbound request. Everything the
//! pipeline looks at (path, raw request URI, parameters, user agent, CLI
//! origin) is captured here once and never changes afterwards.

use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Request parameters, keyed by name.
///
/// Values are JSON values so that parameters decoded from a JSON body keep
/// their numeric form next to the string form of query-string parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(BTreeMap<String, Value>);

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` query string.
    ///
    /// Pairs that fail to decode are skipped. A repeated name keeps its last
    /// value.
    #[must_use]
    pub fn from_query_str(query: &str) -> Self {
        let mut params = BTreeMap::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let (Some(name), Some(value)) = (decode_component(name), decode_component(value))
            else {
                continue;
            };
            if !name.is_empty() {
                params.insert(name, Value::String(value));
            }
        }
        Self(params)
    }

    /// Adds or replaces a parameter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Returns the raw value of a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns a parameter rendered as text.
    ///
    /// Strings are returned as-is, numbers and booleans in their canonical
    /// text form. Null, arrays and objects yield `None`.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.0.get(name)? {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Returns true if the parameter is exactly `1` or `"1"`.
    #[must_use]
    pub fn is_one(&self, name: &str) -> bool {
        match self.0.get(name) {
            Some(Value::Number(n)) => n.as_i64() == Some(1) || n.as_u64() == Some(1),
            Some(Value::String(s)) => s == "1",
            _ => false,
        }
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(Cow::into_owned)
}

const USER_AGENT: &str = "user-agent";

/// Decision-relevant facts about one inbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    path: String,
    full_uri: String,
    params: Option<QueryParams>,
    headers: BTreeMap<String, String>,
    cli: bool,
}

impl RequestContext {
    /// Creates a context for a request with the given routed path and raw
    /// request URI (path plus query string, as sent by the client).
    ///
    /// Parameters start out unavailable; see [`Self::with_params`].
    #[must_use]
    pub fn new(path: impl Into<String>, full_uri: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            full_uri: full_uri.into(),
            params: None,
            headers: BTreeMap::new(),
            cli: false,
        }
    }

    /// Attaches the request's parsed parameters.
    #[must_use]
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Attaches a request header. Names are case-insensitive.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Attaches the `User-Agent` header value.
    #[must_use]
    pub fn with_user_agent(self, user_agent: impl Into<String>) -> Self {
        self.with_header(USER_AGENT, user_agent)
    }

    /// Marks the request as originating from a command-line invocation.
    #[must_use]
    pub fn from_cli(mut self, cli: bool) -> Self {
        self.cli = cli;
        self
    }

    /// Returns the routed request path (no web root, no query string).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw request URI.
    #[must_use]
    pub fn full_uri(&self) -> &str {
        &self.full_uri
    }

    /// Returns the request parameters.
    ///
    /// Requests whose parameters could not be parsed yield an empty set.
    #[must_use]
    pub fn params(&self) -> Cow<'_, QueryParams> {
        match &self.params {
            Some(params) => Cow::Borrowed(params),
            None => Cow::Owned(QueryParams::new()),
        }
    }

    /// Returns a request header value, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the `User-Agent` header value, if any.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.header(USER_AGENT)
    }

    /// Returns true for command-line invocations.
    #[must_use]
    pub fn is_cli(&self) -> bool {
        self.cli
    }

    /// Returns the request URI without its query string and with the web
    /// root removed.
    #[must_use]
    pub fn normalized_path(&self, web_root: &str) -> &str {
        let without_query = self
            .full_uri
            .split_once('?')
            .map_or(self.full_uri.as_str(), |(path, _)| path);
        strip_path_prefix(without_query, web_root)
    }
}

/// Removes a leading path prefix, but only at a segment boundary: with the
/// prefix `/cloud`, `/cloud/login` becomes `/login` while `/cloudy/login` is
/// left alone.
#[must_use]
pub fn strip_path_prefix<'a>(path: &'a str, prefix: &str) -> &'a str {
    match path.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}
