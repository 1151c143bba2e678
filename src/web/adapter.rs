//! Owned request representation for framework integrations.

use std::borrow::Cow;
use std::net::SocketAddr;

use http::header::{HeaderName, HeaderValue, COOKIE};
use http::{HeaderMap, Method};

use crate::error::Error;

use super::{Cookie, HeaderValues, HttpRequest, ParameterMap};

/// An inbound request exactly as the client sent it.
///
/// `RawRequest` holds simple owned data so that it does not couple to any
/// particular server framework. Integrations either build one by hand or
/// convert an [`http::Request`] with [`RawRequest::from_http`].
///
/// Nothing in a `RawRequest` is sanitized; wrap it in an
/// [`XssRequest`](super::XssRequest) before handing it to application code.
///
/// # Examples
///
/// ```
/// use xss_sanitizer::web::{HttpRequest, RawRequest};
///
/// let request = http::Request::builder()
///     .method("GET")
///     .uri("/search?q=rust&tag=a&tag=b")
///     .header("User-Agent", "curl/8.0")
///     .header("Cookie", "theme=dark; lang=en")
///     .body(())
///     .unwrap();
///
/// let raw = RawRequest::from_http(&request);
///
/// assert_eq!(raw.path(), "/search");
/// assert_eq!(raw.parameter("q").as_deref(), Some("rust"));
/// assert_eq!(raw.parameter_values("tag").unwrap().len(), 2);
/// assert_eq!(raw.header("user-agent").as_deref(), Some("curl/8.0"));
/// assert_eq!(raw.cookies().len(), 2);
/// assert_eq!(raw.query_string().as_deref(), Some("q=rust&tag=a&tag=b"));
/// ```
#[derive(Debug, Clone)]
pub struct RawRequest {
    method: Method,
    path: String,
    remote_addr: Option<SocketAddr>,
    headers: HeaderMap,
    parameters: ParameterMap,
    cookies: Vec<Cookie>,
    query_string: Option<String>,
}

impl RawRequest {
    /// Creates an empty request for the given method and path.
    ///
    /// # Examples
    ///
    /// ```
    /// use xss_sanitizer::web::{HttpRequest, RawRequest};
    ///
    /// let raw = RawRequest::new(http::Method::POST, "/comments");
    /// assert!(raw.query_string().is_none());
    /// assert!(raw.cookies().is_empty());
    /// ```
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            remote_addr: None,
            headers: HeaderMap::new(),
            parameters: ParameterMap::new(),
            cookies: Vec::new(),
            query_string: None,
        }
    }

    /// Converts an [`http::Request`], reading its query string and cookies.
    ///
    /// The body is not read. Use [`add_form_body`](Self::add_form_body) for
    /// `application/x-www-form-urlencoded` submissions.
    pub fn from_http<B>(request: &http::Request<B>) -> Self {
        let mut raw = Self::new(request.method().clone(), request.uri().path());
        raw.headers = request.headers().clone();

        if let Some(query) = request.uri().query() {
            raw.set_query_string(query);
        }

        for header in request.headers().get_all(COOKIE) {
            raw.cookies.extend(parse_cookie_header(header.as_bytes()));
        }

        raw
    }

    /// Records the address of the connected peer.
    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    /// Appends a header value. Existing values for the same name are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if `name` is not a valid header name
    /// or `value` contains bytes not allowed in a header value.
    pub fn add_header(&mut self, name: &str, value: &str) -> Result<(), Error> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::InvalidHeader(name.to_string()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| Error::InvalidHeader(name.to_string()))?;

        self.headers.append(header_name, header_value);
        Ok(())
    }

    /// Appends a value to the named parameter.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// Appends a cookie.
    pub fn add_cookie(&mut self, cookie: Cookie) {
        self.cookies.push(cookie);
    }

    /// Sets the raw query string and merges its decoded pairs into the
    /// parameters.
    pub fn set_query_string(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.merge_urlencoded(query.as_bytes());
        self.query_string = Some(query);
    }

    /// Merges an `application/x-www-form-urlencoded` body into the
    /// parameters. Values are appended after any query-string values.
    pub fn add_form_body(&mut self, body: &[u8]) {
        self.merge_urlencoded(body);
    }

    fn merge_urlencoded(&mut self, input: &[u8]) {
        for (name, value) in url::form_urlencoded::parse(input) {
            self.add_parameter(name, value);
        }
    }
}

/// Splits a `Cookie` header into name/value pairs.
///
/// Pairs without `=` or with an empty name are skipped. A value wrapped in
/// double quotes is unwrapped.
fn parse_cookie_header(header: &[u8]) -> Vec<Cookie> {
    String::from_utf8_lossy(header)
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Some(Cookie::new(name, value))
        })
        .collect()
}

fn header_str(value: &HeaderValue) -> Cow<'_, str> {
    String::from_utf8_lossy(value.as_bytes())
}

impl HttpRequest for RawRequest {
    fn method(&self) -> &Method {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    fn parameter(&self, name: &str) -> Option<Cow<'_, str>> {
        self.parameters
            .get(name)
            .and_then(|values| values.first())
            .map(|value| Cow::Borrowed(value.as_str()))
    }

    fn parameter_values(&self, name: &str) -> Option<Vec<Cow<'_, str>>> {
        self.parameters.get(name).map(|values| {
            values
                .iter()
                .map(|value| Cow::Borrowed(value.as_str()))
                .collect()
        })
    }

    fn parameter_names(&self) -> Vec<&str> {
        self.parameters.keys().map(String::as_str).collect()
    }

    fn parameter_map(&self) -> ParameterMap {
        self.parameters.clone()
    }

    fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        self.headers.get(name).map(header_str)
    }

    fn headers<'a>(&'a self, name: &str) -> HeaderValues<'a> {
        HeaderValues::new(self.headers.get_all(name).into_iter().map(header_str))
    }

    fn header_names(&self) -> Vec<&str> {
        self.headers.keys().map(HeaderName::as_str).collect()
    }

    fn cookies(&self) -> Vec<Cookie> {
        self.cookies.clone()
    }

    fn query_string(&self) -> Option<Cow<'_, str>> {
        self.query_string.as_deref().map(Cow::Borrowed)
    }
}
