use std::fmt;
use std::sync::Arc;

/// The set of header names whose values are routed through the sanitization
/// policy.
///
/// Matching is exact and ASCII case-insensitive, since HTTP header names are
/// case-insensitive. Patterns are literal names; there is no wildcard or
/// substring matching. An empty list matches nothing, so header sanitization
/// is skipped rather than treated as an error.
///
/// Cloning is cheap: the names are shared behind an `Arc`.
///
/// # Examples
///
/// ```
/// use xss_sanitizer::HeaderAllowList;
///
/// let allow_list = HeaderAllowList::new(["User-Agent", "Referer"]);
///
/// assert!(allow_list.matches("user-agent"));
/// assert!(allow_list.matches("REFERER"));
/// assert!(!allow_list.matches("X-Custom"));
/// assert!(!allow_list.matches("User"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct HeaderAllowList {
    names: Arc<[String]>,
}

impl HeaderAllowList {
    /// Creates an allow-list from the given header names, keeping their order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an allow-list that matches no header.
    pub fn empty() -> Self {
        Self {
            names: Arc::from(Vec::new()),
        }
    }

    /// Returns `true` if `name` is subject to sanitization.
    pub fn matches(&self, name: &str) -> bool {
        self.names
            .iter()
            .any(|pattern| pattern.eq_ignore_ascii_case(name))
    }

    /// Returns `true` if no header is subject to sanitization.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the number of configured names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Iterates over the configured names in their original order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for HeaderAllowList {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for HeaderAllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names.iter()).finish()
    }
}

impl<S: Into<String>> FromIterator<S> for HeaderAllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<String>> for HeaderAllowList {
    fn from(names: Vec<String>) -> Self {
        Self {
            names: names.into(),
        }
    }
}
