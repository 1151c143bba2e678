//! Web framework integration surface.
//!
//! This module provides the boundary between HTTP frameworks and the
//! sanitization layer. It handles:
//! - The request accessor interface application code reads through
//!   ([`HttpRequest`])
//! - Mapping framework requests to an owned, unsanitized form ([`RawRequest`])
//! - The sanitizing decorator over any request ([`XssRequest`])
//! - The shared filter that applies the decorator per request ([`XssFilter`])
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: Only the `http` crate's vocabulary types
//!    are used. Framework-specific code converts into [`RawRequest`] or
//!    implements [`HttpRequest`] directly.
//!
//! 2. **Sanitize at the Boundary**: Parameters, allow-listed headers, cookies
//!    and the query string are rewritten before application code sees them.
//!    Method, path and addresses are forwarded untouched.
//!
//! 3. **Per Request, Per Call**: A decorator borrows exactly one request and
//!    sanitizes on every accessor call. Nothing is cached between calls or
//!    shared between requests.
//!
//! # Example Flow
//!
//! ```
//! use xss_sanitizer::web::{HttpRequest, RawRequest};
//! use xss_sanitizer::XssConfig;
//!
//! // 1. At startup: build the shared filter
//! let filter = XssConfig::from_toml_str(r#"policy-headers = ["User-Agent"]"#)
//!     .and_then(|config| config.build_filter())
//!     .expect("valid configuration");
//!
//! // 2. Per request: convert from the framework's request type
//! let request = http::Request::builder()
//!     .uri("/comments?text=%3Cscript%3Ealert(1)%3C%2Fscript%3Enice")
//!     .header("User-Agent", "<img src=x onerror=alert(1)>")
//!     .body(())
//!     .unwrap();
//! let raw = RawRequest::from_http(&request);
//!
//! // 3. Hand the sanitized view to application code
//! filter.handle(&raw, |request| {
//!     assert_eq!(request.parameter("text").as_deref(), Some("nice"));
//!     assert!(!request.header("User-Agent").unwrap().contains("onerror"));
//! });
//! ```

mod adapter;
mod middleware;
mod request;
mod wrapper;

pub use adapter::RawRequest;
pub use middleware::XssFilter;
pub use request::{Cookie, HeaderValues, HttpRequest, ParameterMap};
pub use wrapper::{Field, SanitizedValues, XssRequest};
