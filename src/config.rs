//! Startup configuration for the request filter.
//!
//! Configuration is read once, validated as a whole, and turned into an
//! [`XssFilter`]. A misconfigured filter is never built: every problem is
//! reported before any request is served.
//!
//! ```toml
//! enabled = true
//! policy-headers = ["User-Agent", "Referer"]
//! policy = "html"            # "html" | "strip-all" | "escape"
//! max-value-length = 4096    # optional
//! on-failure = "escape"      # "empty" | "escape"
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use http::HeaderName;
use serde::Deserialize;

use crate::header::HeaderAllowList;
use crate::sanitizer::{
    BoundedPolicy, EscapePolicy, Fallback, HtmlPolicy, OnFailure, SanitizationPolicy,
};
use crate::web::XssFilter;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    Io(std::io::Error),
    /// The configuration is not valid TOML or has unknown/mistyped keys
    Parse(toml::de::Error),
    /// The configuration parsed but its values are unusable
    Validation(Vec<ValidationError>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An entry of `policy-headers` is not a valid HTTP header name
    InvalidHeaderName(String),
    /// `max-value-length` is zero
    ZeroMaxValueLength,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidHeaderName(name) => {
                write!(f, "policy-headers: '{}' is not a valid header name", name)
            }
            ValidationError::ZeroMaxValueLength => {
                write!(f, "max-value-length must be greater than 0")
            }
        }
    }
}

/// Which sanitization policy the filter installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// [`HtmlPolicy::new`]: keep harmless markup, drop scripts and handlers
    #[default]
    Html,
    /// [`HtmlPolicy::strip_all`]: drop every tag, keep text
    StripAll,
    /// [`EscapePolicy`]: entity-encode all markup
    Escape,
}

/// Filter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct XssConfig {
    /// Whether requests are sanitized at all
    pub enabled: bool,
    /// Header names whose values are sanitized
    pub policy_headers: Vec<String>,
    /// Sanitization policy
    pub policy: PolicyKind,
    /// Longest value, in bytes, handed to the policy; longer values are
    /// replaced according to `on_failure`
    pub max_value_length: Option<usize>,
    /// Replacement for values refused by `max_value_length`
    pub on_failure: OnFailure,
}

impl Default for XssConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            policy_headers: Vec::new(),
            policy: PolicyKind::default(),
            max_value_length: None,
            on_failure: OnFailure::default(),
        }
    }
}

impl XssConfig {
    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Validation`] for unusable values.
    ///
    /// # Examples
    ///
    /// ```
    /// use xss_sanitizer::XssConfig;
    ///
    /// let config = XssConfig::from_toml_str(r#"policy-headers = ["User-Agent"]"#).unwrap();
    /// assert!(config.enabled);
    /// assert_eq!(config.policy_headers, vec!["User-Agent"]);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: XssConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate().map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            headers = config.policy_headers.len(),
            enabled = config.enabled,
            "loaded xss filter configuration"
        );
        Ok(config)
    }

    /// Checks every value, collecting all problems.
    ///
    /// # Errors
    ///
    /// Returns the full list of problems found.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors: Vec<ValidationError> = self
            .policy_headers
            .iter()
            .filter(|name| HeaderName::from_bytes(name.as_bytes()).is_err())
            .map(|name| ValidationError::InvalidHeaderName(name.clone()))
            .collect();

        if self.max_value_length == Some(0) {
            errors.push(ValidationError::ZeroMaxValueLength);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validates the configuration and builds the filter it describes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the configuration is unusable.
    ///
    /// # Examples
    ///
    /// ```
    /// use xss_sanitizer::XssConfig;
    ///
    /// let filter = XssConfig::default().build_filter().unwrap();
    /// assert!(filter.is_enabled());
    /// assert!(filter.allow_list().is_empty());
    /// ```
    pub fn build_filter(&self) -> Result<XssFilter, ConfigError> {
        self.validate().map_err(ConfigError::Validation)?;

        let mut filter = XssFilter::new(
            self.build_policy(),
            HeaderAllowList::new(self.policy_headers.iter().cloned()),
        );
        filter.set_enabled(self.enabled);
        Ok(filter)
    }

    fn build_policy(&self) -> Arc<dyn SanitizationPolicy> {
        match (self.policy, self.max_value_length) {
            (PolicyKind::Html, None) => Arc::new(HtmlPolicy::new()),
            (PolicyKind::StripAll, None) => Arc::new(HtmlPolicy::strip_all()),
            (PolicyKind::Escape, None) => Arc::new(EscapePolicy),
            (PolicyKind::Html, Some(max)) => bounded(HtmlPolicy::new(), max, self.on_failure),
            (PolicyKind::StripAll, Some(max)) => {
                bounded(HtmlPolicy::strip_all(), max, self.on_failure)
            }
            (PolicyKind::Escape, Some(max)) => bounded(EscapePolicy, max, self.on_failure),
        }
    }
}

fn bounded<P>(policy: P, max_len: usize, on_failure: OnFailure) -> Arc<dyn SanitizationPolicy>
where
    P: SanitizationPolicy + 'static,
{
    Arc::new(Fallback::new(BoundedPolicy::new(policy, max_len), on_failure))
}
