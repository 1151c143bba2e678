//! The read-only request accessor interface.
//!
//! [`HttpRequest`] is the shape application code reads an inbound request
//! through. The raw transport-level request ([`RawRequest`](super::RawRequest))
//! implements it, and so does the sanitizing decorator
//! ([`XssRequest`](super::XssRequest)), which makes the decorator a drop-in
//! replacement wherever a `&dyn HttpRequest` is expected.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;

use http::Method;

/// Request parameters: each name maps to its values in submission order.
pub type ParameterMap = BTreeMap<String, Vec<String>>;

/// A cookie sent by the client.
///
/// Request cookies only carry a name and a value; attributes such as `Path`
/// or `Max-Age` exist only on response cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
}

impl Cookie {
    /// Creates a cookie.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cookie value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns a cookie with the same name and a replaced value.
    pub fn with_value(self, value: impl Into<String>) -> Self {
        Self {
            name: self.name,
            value: value.into(),
        }
    }
}

/// The values of a repeated header, in the order they were received.
///
/// The sequence is finite and single-pass. Obtain a fresh pass by calling
/// [`HttpRequest::headers`] again.
pub struct HeaderValues<'a> {
    inner: Box<dyn Iterator<Item = Cow<'a, str>> + 'a>,
}

impl<'a> HeaderValues<'a> {
    /// Wraps any iterator of header values.
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = Cow<'a, str>> + 'a,
    {
        Self {
            inner: Box::new(iter),
        }
    }

    /// An empty sequence, for headers the request does not carry.
    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }
}

impl<'a> Iterator for HeaderValues<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl fmt::Debug for HeaderValues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderValues").finish_non_exhaustive()
    }
}

/// Read access to an inbound HTTP request.
///
/// Absent fields are reported as `None`, which is distinct from an empty
/// string. The trait is object safe.
///
/// # Examples
///
/// ```
/// use xss_sanitizer::web::{HttpRequest, RawRequest};
/// use http::Method;
///
/// fn greeting(request: &dyn HttpRequest) -> String {
///     let name = request.parameter("name").unwrap_or("stranger".into());
///     format!("hello, {}", name)
/// }
///
/// let mut raw = RawRequest::new(Method::GET, "/greet");
/// raw.add_parameter("name", "ferris");
/// assert_eq!(greeting(&raw), "hello, ferris");
/// ```
pub trait HttpRequest {
    /// The request method.
    fn method(&self) -> &Method;

    /// The request path, without the query string.
    fn path(&self) -> &str;

    /// The address of the connected peer, if known.
    fn remote_addr(&self) -> Option<SocketAddr>;

    /// The first value of the named parameter.
    fn parameter(&self, name: &str) -> Option<Cow<'_, str>> {
        self.parameter_values(name)
            .and_then(|values| values.into_iter().next())
    }

    /// Every value of the named parameter, in submission order.
    fn parameter_values(&self, name: &str) -> Option<Vec<Cow<'_, str>>>;

    /// The names of all parameters.
    fn parameter_names(&self) -> Vec<&str>;

    /// All parameters with all their values.
    fn parameter_map(&self) -> ParameterMap;

    /// The first value of the named header. Names are case-insensitive.
    fn header(&self, name: &str) -> Option<Cow<'_, str>>;

    /// Every value of the named header. Names are case-insensitive.
    fn headers<'a>(&'a self, name: &str) -> HeaderValues<'a>;

    /// The names of all headers present, each listed once.
    fn header_names(&self) -> Vec<&str>;

    /// The cookies sent with the request, in the order received.
    fn cookies(&self) -> Vec<Cookie>;

    /// The undecoded query string, without the leading `?`.
    fn query_string(&self) -> Option<Cow<'_, str>>;
}
