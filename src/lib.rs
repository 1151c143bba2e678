//! Inbound request sanitization against cross-site scripting.
//!
//! This crate sits between the transport layer and application code and
//! rewrites every attacker-controllable field of a request through a
//! pluggable sanitization policy before the application reads it:
//! - **Parameters**: query and form values, single or repeated
//! - **Headers**: only those named in a [`HeaderAllowList`]
//! - **Cookies**: values, returned as fresh copies
//! - **Query string**: the raw, undecoded string
//!
//! # Core Types
//!
//! - [`SanitizationPolicy`]: The `sanitize(&str) -> String` capability
//! - [`HtmlPolicy`], [`EscapePolicy`]: Policies backed by `ammonia`
//! - [`HeaderAllowList`]: Which headers are sanitized
//! - [`web::XssRequest`]: The sanitizing decorator over a request
//! - [`web::XssFilter`]: Shared settings that wrap each inbound request
//! - [`XssConfig`]: TOML configuration that builds an `XssFilter`
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use xss_sanitizer::web::{Cookie, HttpRequest, RawRequest, XssRequest};
//! use xss_sanitizer::{HeaderAllowList, HtmlPolicy};
//!
//! let mut raw = RawRequest::new(http::Method::GET, "/");
//! raw.add_parameter("tag", "<b>x</b>");
//! raw.add_parameter("tag", "clean");
//! raw.add_cookie(Cookie::new("a", "<script>x</script>"));
//!
//! let request = XssRequest::new(Arc::new(HtmlPolicy::new()), HeaderAllowList::empty(), &raw);
//!
//! assert_eq!(request.parameter_values("tag").unwrap(), vec!["<b>x</b>", "clean"]);
//! assert_eq!(request.cookies()[0].name(), "a");
//! assert!(!request.cookies()[0].value().contains("<script"));
//! assert!(request.parameter("missing").is_none());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod header;
mod sanitizer;
pub mod web;

#[cfg(test)]
mod test_utils;

pub use config::{ConfigError, PolicyKind, ValidationError, XssConfig};
pub use error::Error;
pub use header::HeaderAllowList;
pub use sanitizer::{
    BoundedPolicy, EscapePolicy, FalliblePolicy, Fallback, HtmlPolicy, OnFailure,
    SanitizationError, SanitizationErrorKind, SanitizationPolicy,
};
