//! The per-process filter that puts the sanitizing view in front of handlers.
//!
//! An [`XssFilter`] is built once at startup (usually from
//! [`XssConfig`](crate::XssConfig)) and shared by every request handler.
//! For each inbound request it produces an [`XssRequest`] borrowing the raw
//! request, so the shared state stays immutable and no sanitized value
//! outlives the request it came from.
//!
//! # Integration Flow
//!
//! ```text
//! Inbound request
//!   ↓
//! Framework-specific code builds RawRequest
//!   ↓
//! XssFilter::handle(&raw, handler)
//!   ↓
//! handler(&dyn HttpRequest) reads sanitized values
//! ```

use std::sync::Arc;

use crate::header::HeaderAllowList;
use crate::sanitizer::{HtmlPolicy, SanitizationPolicy};

use super::{HttpRequest, XssRequest};

/// Shared sanitization settings applied to every inbound request.
///
/// Cloning is cheap; clones share the same policy and allow-list.
///
/// # Examples
///
/// ```
/// use xss_sanitizer::web::{HttpRequest, RawRequest, XssFilter};
/// use xss_sanitizer::HeaderAllowList;
///
/// let filter = XssFilter::with_html_policy(HeaderAllowList::new(["Referer"]));
///
/// let mut raw = RawRequest::new(http::Method::GET, "/search");
/// raw.add_parameter("q", "<script>alert(1)</script>rust");
///
/// let query = filter.handle(&raw, |request| {
///     request.parameter("q").map(|q| q.into_owned())
/// });
///
/// assert_eq!(query.as_deref(), Some("rust"));
/// ```
#[derive(Clone)]
pub struct XssFilter {
    policy: Arc<dyn SanitizationPolicy>,
    allow_list: HeaderAllowList,
    enabled: bool,
}

impl XssFilter {
    /// Creates an enabled filter.
    pub fn new(policy: Arc<dyn SanitizationPolicy>, allow_list: HeaderAllowList) -> Self {
        Self {
            policy,
            allow_list,
            enabled: true,
        }
    }

    /// Creates an enabled filter using [`HtmlPolicy::new`].
    pub fn with_html_policy(allow_list: HeaderAllowList) -> Self {
        Self::new(Arc::new(HtmlPolicy::new()), allow_list)
    }

    /// Turns sanitization on or off for [`handle`](Self::handle).
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns `true` if [`handle`](Self::handle) sanitizes requests.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the shared policy.
    pub fn policy(&self) -> &Arc<dyn SanitizationPolicy> {
        &self.policy
    }

    /// Returns the header allow-list.
    pub fn allow_list(&self) -> &HeaderAllowList {
        &self.allow_list
    }

    /// Wraps `raw` in a sanitizing view, regardless of whether the filter is
    /// enabled.
    pub fn wrap<'r, R: HttpRequest + ?Sized>(&self, raw: &'r R) -> XssRequest<'r, R> {
        XssRequest::new(self.policy.clone(), self.allow_list.clone(), raw)
    }

    /// Runs `handler` against the request as application code should see it.
    ///
    /// When the filter is enabled the handler receives the sanitizing view;
    /// when disabled it receives `raw` directly.
    pub fn handle<R, F, T>(&self, raw: &R, handler: F) -> T
    where
        R: HttpRequest,
        F: FnOnce(&dyn HttpRequest) -> T,
    {
        let span = tracing::debug_span!(
            "xss_filter",
            method = %raw.method(),
            path = raw.path(),
            enabled = self.enabled,
        );
        let _guard = span.enter();

        if self.enabled {
            handler(&self.wrap(raw))
        } else {
            tracing::debug!("sanitization disabled, passing request through");
            handler(raw)
        }
    }
}

impl std::fmt::Debug for XssFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XssFilter")
            .field("allow_list", &self.allow_list)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
