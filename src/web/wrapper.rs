//! The sanitizing request decorator.

use std::borrow::Cow;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use http::Method;

use crate::header::HeaderAllowList;
use crate::sanitizer::SanitizationPolicy;

use super::{Cookie, HeaderValues, HttpRequest, ParameterMap};

/// Which part of the request a sanitized value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// A query or form parameter
    Parameter,
    /// An allow-listed header
    Header,
    /// A cookie value
    Cookie,
    /// The raw query string
    QueryString,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Parameter => write!(f, "parameter"),
            Field::Header => write!(f, "header"),
            Field::Cookie => write!(f, "cookie"),
            Field::QueryString => write!(f, "query_string"),
        }
    }
}

/// Runs one value through the policy. Every intercepted accessor ends here.
fn clean(policy: &dyn SanitizationPolicy, field: Field, name: &str, tainted: &str) -> String {
    let clean = policy.sanitize(tainted);
    tracing::debug!(%field, name, tainted, clean = %clean, "sanitized request value");
    clean
}

/// A view of a request in which every attacker-controllable value has been
/// passed through a [`SanitizationPolicy`].
///
/// `XssRequest` implements [`HttpRequest`] over another `HttpRequest` and can
/// be handed to application code in its place. It intercepts:
///
/// - parameters: [`parameter`](HttpRequest::parameter),
///   [`parameter_values`](HttpRequest::parameter_values),
///   [`parameter_map`](HttpRequest::parameter_map)
/// - headers named in the [`HeaderAllowList`]: [`header`](HttpRequest::header),
///   [`headers`](HttpRequest::headers)
/// - [`cookies`](HttpRequest::cookies) values
/// - the [`query_string`](HttpRequest::query_string)
///
/// Everything else (method, path, remote address, parameter and header
/// names) is forwarded untouched.
///
/// Sanitization happens on every call. Nothing is cached, and absent values
/// (`None`) are returned without consulting the policy. The wrapped request
/// is borrowed, never modified.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use xss_sanitizer::web::{HttpRequest, RawRequest, XssRequest};
/// use xss_sanitizer::{HeaderAllowList, HtmlPolicy};
///
/// let mut raw = RawRequest::new(http::Method::GET, "/profile");
/// raw.add_parameter("bio", "<b>hi</b><script>steal()</script>");
/// raw.add_header("User-Agent", "<img src=x onerror=alert(1)>").unwrap();
/// raw.add_header("X-Custom", "<i>raw</i>").unwrap();
///
/// let request = XssRequest::new(
///     Arc::new(HtmlPolicy::new()),
///     HeaderAllowList::new(["User-Agent"]),
///     &raw,
/// );
///
/// assert_eq!(request.parameter("bio").as_deref(), Some("<b>hi</b>"));
/// assert!(!request.header("user-agent").unwrap().contains("onerror"));
/// assert_eq!(request.header("X-Custom").as_deref(), Some("<i>raw</i>"));
/// ```
pub struct XssRequest<'r, R: ?Sized> {
    policy: Arc<dyn SanitizationPolicy>,
    allow_list: HeaderAllowList,
    raw: &'r R,
}

impl<'r, R: HttpRequest + ?Sized> XssRequest<'r, R> {
    /// Wraps `raw`, sanitizing with `policy` and treating the headers named in
    /// `allow_list` as sanitization targets.
    ///
    /// An empty allow-list is legal and leaves every header untouched.
    pub fn new(
        policy: Arc<dyn SanitizationPolicy>,
        allow_list: HeaderAllowList,
        raw: &'r R,
    ) -> Self {
        Self {
            policy,
            allow_list,
            raw,
        }
    }

    /// Returns the wrapped, unsanitized request.
    pub fn raw(&self) -> &'r R {
        self.raw
    }

    fn clean(&self, field: Field, name: &str, tainted: &str) -> String {
        clean(self.policy.as_ref(), field, name, tainted)
    }
}

impl<R: ?Sized> fmt::Debug for XssRequest<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XssRequest")
            .field("allow_list", &self.allow_list)
            .finish_non_exhaustive()
    }
}

impl<R: HttpRequest + ?Sized> HttpRequest for XssRequest<'_, R> {
    fn method(&self) -> &Method {
        self.raw.method()
    }

    fn path(&self) -> &str {
        self.raw.path()
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        self.raw.remote_addr()
    }

    fn parameter(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = self.raw.parameter(name)?;
        Some(Cow::Owned(self.clean(Field::Parameter, name, &value)))
    }

    fn parameter_values(&self, name: &str) -> Option<Vec<Cow<'_, str>>> {
        let values = self.raw.parameter_values(name)?;
        Some(
            values
                .iter()
                .map(|value| Cow::Owned(self.clean(Field::Parameter, name, value)))
                .collect(),
        )
    }

    fn parameter_names(&self) -> Vec<&str> {
        self.raw.parameter_names()
    }

    fn parameter_map(&self) -> ParameterMap {
        let mut map = self.raw.parameter_map();
        for (name, values) in map.iter_mut() {
            for value in values.iter_mut() {
                *value = self.clean(Field::Parameter, name, value);
            }
        }
        map
    }

    fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = self.raw.header(name)?;
        if self.allow_list.matches(name) {
            Some(Cow::Owned(self.clean(Field::Header, name, &value)))
        } else {
            Some(value)
        }
    }

    fn headers<'a>(&'a self, name: &str) -> HeaderValues<'a> {
        let values = self.raw.headers(name);
        if self.allow_list.matches(name) {
            HeaderValues::new(SanitizedValues::new(
                values,
                self.policy.as_ref(),
                Field::Header,
                name,
            ))
        } else {
            values
        }
    }

    fn header_names(&self) -> Vec<&str> {
        self.raw.header_names()
    }

    fn cookies(&self) -> Vec<Cookie> {
        let cookies = self.raw.cookies();
        if cookies.is_empty() {
            return cookies;
        }
        cookies
            .into_iter()
            .map(|cookie| {
                let value = self.clean(Field::Cookie, cookie.name(), cookie.value());
                cookie.with_value(value)
            })
            .collect()
    }

    fn query_string(&self) -> Option<Cow<'_, str>> {
        let query = self.raw.query_string()?;
        Some(Cow::Owned(self.clean(Field::QueryString, "", &query)))
    }
}

/// Lazily sanitizes a sequence of values.
///
/// Each element is passed through the policy when it is pulled from the
/// iterator, never ahead of time. The adapter is as long as the underlying
/// sequence, and can be cloned to restart only if the underlying iterator
/// can.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
/// use xss_sanitizer::web::{Field, SanitizedValues};
/// use xss_sanitizer::HtmlPolicy;
///
/// let policy = HtmlPolicy::new();
/// let raw = vec![Cow::Borrowed("<b>ok</b>"), Cow::Borrowed("<script>x</script>")];
/// let mut values = SanitizedValues::new(raw.into_iter(), &policy, Field::Header, "Referer");
///
/// assert_eq!(values.next().as_deref(), Some("<b>ok</b>"));
/// assert_eq!(values.next().as_deref(), Some(""));
/// assert!(values.next().is_none());
/// ```
#[derive(Clone)]
pub struct SanitizedValues<'a, I> {
    inner: I,
    policy: &'a dyn SanitizationPolicy,
    field: Field,
    name: String,
}

impl<'a, I> SanitizedValues<'a, I>
where
    I: Iterator<Item = Cow<'a, str>>,
{
    /// Wraps `inner`, sanitizing each value with `policy` as it is consumed.
    pub fn new(
        inner: I,
        policy: &'a dyn SanitizationPolicy,
        field: Field,
        name: impl Into<String>,
    ) -> Self {
        Self {
            inner,
            policy,
            field,
            name: name.into(),
        }
    }
}

impl<'a, I> Iterator for SanitizedValues<'a, I>
where
    I: Iterator<Item = Cow<'a, str>>,
{
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        let tainted = self.inner.next()?;
        Some(Cow::Owned(clean(
            self.policy,
            self.field,
            &self.name,
            &tainted,
        )))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<I> fmt::Debug for SanitizedValues<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SanitizedValues")
            .field("field", &self.field)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
