use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

/// Error returned when a fallible policy refuses to sanitize a value.
///
/// The message describes the violated constraint and never contains the
/// rejected input.
///
/// # Examples
///
/// ```
/// use xss_sanitizer::{SanitizationError, SanitizationErrorKind};
///
/// let error = SanitizationError::new(SanitizationErrorKind::TooLong, "value exceeds 16 bytes");
/// assert_eq!(error.kind(), SanitizationErrorKind::TooLong);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationError {
    kind: SanitizationErrorKind,
    message: String,
}

impl SanitizationError {
    /// Creates a new sanitization error.
    pub fn new(kind: SanitizationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> SanitizationErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SanitizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sanitization failed ({}): {}", self.kind, self.message)
    }
}

impl std::error::Error for SanitizationError {}

/// Kind of sanitization error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizationErrorKind {
    /// Input exceeds maximum allowed length.
    TooLong,
    /// Input contains control or non-printable characters.
    ContainsControlChars,
}

impl fmt::Display for SanitizationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong => write!(f, "input too long"),
            Self::ContainsControlChars => write!(f, "contains control characters"),
        }
    }
}

/// A total string sanitization capability.
///
/// Implementations map a possibly hostile string to an equivalent string with
/// unsafe markup removed or neutralized. They must be deterministic, free of
/// side effects that influence the result, and total: every input produces an
/// output. Idempotence is not required.
///
/// Policies are shared by every in-flight request, hence `Send + Sync`.
///
/// # Examples
///
/// ```
/// use xss_sanitizer::{HtmlPolicy, SanitizationPolicy};
///
/// let policy = HtmlPolicy::new();
/// let clean = policy.sanitize("<b>hi</b><script>alert(1)</script>");
/// assert_eq!(clean, "<b>hi</b>");
/// ```
pub trait SanitizationPolicy: Send + Sync {
    /// Returns the sanitized form of `input`.
    fn sanitize(&self, input: &str) -> String;
}

impl<P: SanitizationPolicy + ?Sized> SanitizationPolicy for &P {
    fn sanitize(&self, input: &str) -> String {
        (**self).sanitize(input)
    }
}

impl<P: SanitizationPolicy + ?Sized> SanitizationPolicy for Box<P> {
    fn sanitize(&self, input: &str) -> String {
        (**self).sanitize(input)
    }
}

impl<P: SanitizationPolicy + ?Sized> SanitizationPolicy for Arc<P> {
    fn sanitize(&self, input: &str) -> String {
        (**self).sanitize(input)
    }
}

/// HTML sanitization backed by [`ammonia`].
///
/// The default configuration keeps ammonia's allow-list of harmless
/// formatting tags and drops everything else: `<script>` and `<style>`
/// elements with their content, event-handler attributes, `javascript:` URLs.
pub struct HtmlPolicy {
    builder: ammonia::Builder<'static>,
}

impl HtmlPolicy {
    /// Creates a policy using ammonia's default allow-list.
    pub fn new() -> Self {
        Self::from_builder(ammonia::Builder::default())
    }

    /// Creates a policy that allows no tags at all, keeping only text.
    ///
    /// ```
    /// use xss_sanitizer::{HtmlPolicy, SanitizationPolicy};
    ///
    /// let policy = HtmlPolicy::strip_all();
    /// assert_eq!(policy.sanitize("<b>bold</b> text"), "bold text");
    /// ```
    pub fn strip_all() -> Self {
        Self::from_builder(ammonia::Builder::empty())
    }

    /// Wraps a custom ammonia builder.
    pub fn from_builder(builder: ammonia::Builder<'static>) -> Self {
        Self { builder }
    }
}

impl Default for HtmlPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HtmlPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlPolicy").finish_non_exhaustive()
    }
}

impl SanitizationPolicy for HtmlPolicy {
    fn sanitize(&self, input: &str) -> String {
        self.builder.clean(input).to_string()
    }
}

/// Entity-encodes every markup-significant character.
///
/// Nothing is removed; `<script>` becomes `&lt;script&gt;`. Use this when
/// values are echoed as text and no markup is ever expected.
///
/// ```
/// use xss_sanitizer::{EscapePolicy, SanitizationPolicy};
///
/// let escaped = EscapePolicy.sanitize("<script>");
/// assert!(escaped.starts_with("&lt;script"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapePolicy;

impl SanitizationPolicy for EscapePolicy {
    fn sanitize(&self, input: &str) -> String {
        ammonia::clean_text(input)
    }
}

/// A sanitization capability that may refuse an input.
///
/// Fallible policies cannot be installed on a request directly; wrap them in
/// [`Fallback`] to decide what a refused value turns into.
pub trait FalliblePolicy: Send + Sync {
    /// Sanitizes `input`, or explains why it cannot be sanitized.
    ///
    /// # Errors
    ///
    /// Returns `SanitizationError` if the input violates the policy's constraints.
    fn try_sanitize(&self, input: &str) -> Result<String, SanitizationError>;
}

/// Enforces basic size and character constraints before delegating.
///
/// Inputs longer than `max_len` bytes are rejected with
/// [`SanitizationErrorKind::TooLong`]. Inputs containing control characters
/// other than tab, carriage return and line feed are rejected with
/// [`SanitizationErrorKind::ContainsControlChars`]. Everything else is passed
/// to the inner policy.
///
/// # Examples
///
/// ```
/// use xss_sanitizer::{BoundedPolicy, FalliblePolicy, HtmlPolicy, SanitizationErrorKind};
///
/// let policy = BoundedPolicy::new(HtmlPolicy::new(), 8);
/// assert_eq!(policy.try_sanitize("short").unwrap(), "short");
///
/// let err = policy.try_sanitize("far too long for this").unwrap_err();
/// assert_eq!(err.kind(), SanitizationErrorKind::TooLong);
/// ```
#[derive(Debug, Clone)]
pub struct BoundedPolicy<P> {
    inner: P,
    max_len: usize,
}

impl<P: SanitizationPolicy> BoundedPolicy<P> {
    /// Creates a bounded policy around `inner`.
    ///
    /// # Panics
    ///
    /// Panics if `max_len` is 0.
    pub fn new(inner: P, max_len: usize) -> Self {
        assert!(max_len > 0, "max_len must be greater than 0");
        Self { inner, max_len }
    }

    /// Returns the configured maximum input length in bytes.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    fn is_forbidden_char(c: char) -> bool {
        c.is_control() && !matches!(c, '\t' | '\r' | '\n')
    }
}

impl<P: SanitizationPolicy> FalliblePolicy for BoundedPolicy<P> {
    fn try_sanitize(&self, input: &str) -> Result<String, SanitizationError> {
        if input.len() > self.max_len {
            return Err(SanitizationError::new(
                SanitizationErrorKind::TooLong,
                format!("input exceeds maximum length of {}", self.max_len),
            ));
        }

        if input.chars().any(Self::is_forbidden_char) {
            return Err(SanitizationError::new(
                SanitizationErrorKind::ContainsControlChars,
                "input contains control or non-printable characters",
            ));
        }

        Ok(self.inner.sanitize(input))
    }
}

/// What a refused value is replaced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnFailure {
    /// Replace the value with an empty string.
    Empty,
    /// Replace the value with its entity-encoded form.
    #[default]
    Escape,
}

/// Turns a [`FalliblePolicy`] into a total [`SanitizationPolicy`].
///
/// A refused value is never passed through unsanitized: it is replaced
/// according to [`OnFailure`], and a warning carrying only the error kind is
/// emitted.
///
/// ```
/// use xss_sanitizer::{BoundedPolicy, Fallback, HtmlPolicy, OnFailure, SanitizationPolicy};
///
/// let policy = Fallback::new(BoundedPolicy::new(HtmlPolicy::new(), 4), OnFailure::Empty);
/// assert_eq!(policy.sanitize("ok"), "ok");
/// assert_eq!(policy.sanitize("<script>x</script>"), "");
/// ```
#[derive(Debug, Clone)]
pub struct Fallback<F> {
    policy: F,
    on_failure: OnFailure,
}

impl<F: FalliblePolicy> Fallback<F> {
    /// Wraps `policy`, substituting refused values as `on_failure` dictates.
    pub fn new(policy: F, on_failure: OnFailure) -> Self {
        Self { policy, on_failure }
    }

    /// Returns the configured failure behavior.
    pub fn on_failure(&self) -> OnFailure {
        self.on_failure
    }
}

impl<F: FalliblePolicy> SanitizationPolicy for Fallback<F> {
    fn sanitize(&self, input: &str) -> String {
        match self.policy.try_sanitize(input) {
            Ok(clean) => clean,
            Err(err) => {
                tracing::warn!(kind = %err.kind(), "sanitization refused value, substituting safe default");
                match self.on_failure {
                    OnFailure::Empty => String::new(),
                    OnFailure::Escape => ammonia::clean_text(input),
                }
            }
        }
    }
}
