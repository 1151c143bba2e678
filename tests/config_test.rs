//! Integration tests for loading filter configuration from disk.

use std::fs;
use std::path::PathBuf;

use http::Method;
use xss_sanitizer::web::{HttpRequest, RawRequest};
use xss_sanitizer::{ConfigError, Error, ValidationError, XssConfig};

/// A config file in the system temp directory, removed on drop.
struct TempConfig {
    path: PathBuf,
}

impl TempConfig {
    fn new(name: &str, content: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "xss-sanitizer-{}-{}.toml",
            std::process::id(),
            name
        ));
        fs::write(&path, content).expect("temp dir is writable");
        Self { path }
    }
}

impl Drop for TempConfig {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[test]
fn load_builds_working_filter() {
    let file = TempConfig::new(
        "working",
        r#"
        enabled = true
        policy-headers = ["User-Agent", "Referer"]
        policy = "strip-all"
        "#,
    );

    let filter = XssConfig::load(&file.path)
        .and_then(|config| config.build_filter())
        .expect("valid configuration");

    let mut raw = RawRequest::new(Method::GET, "/");
    raw.add_header("Referer", "<a href=\"javascript:alert(1)\">x</a>")
        .unwrap();
    raw.add_parameter("p", "<em>text</em>");

    filter.handle(&raw, |request| {
        assert_eq!(request.header("referer").as_deref(), Some("x"));
        assert_eq!(request.parameter("p").as_deref(), Some("text"));
    });
}

#[test]
fn load_rejects_invalid_header_names() {
    let file = TempConfig::new("invalid", r#"policy-headers = ["User Agent"]"#);

    let result = XssConfig::load(&file.path);

    match result {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(
                errors,
                vec![ValidationError::InvalidHeaderName("User Agent".to_string())]
            );
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn load_rejects_malformed_toml() {
    let file = TempConfig::new("malformed", "policy-headers = [\"User-Agent\"");

    assert!(matches!(
        XssConfig::load(&file.path),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn config_errors_convert_into_crate_error() {
    fn build(content: &str) -> Result<(), Error> {
        let config = XssConfig::from_toml_str(content)?;
        config.build_filter()?;
        Ok(())
    }

    assert!(build("max-value-length = 64").is_ok());

    let error = build("max-value-length = 0").unwrap_err();
    assert!(matches!(error, Error::Config(ConfigError::Validation(_))));
    assert!(error.to_string().contains("max-value-length must be greater than 0"));
}

#[test]
fn length_limit_substitutes_escaped_value() {
    let filter = XssConfig::from_toml_str("max-value-length = 16")
        .and_then(|config| config.build_filter())
        .expect("valid configuration");

    let mut raw = RawRequest::new(Method::GET, "/");
    raw.add_parameter("short", "<b>ok</b>");
    raw.add_parameter("long", "<script>alert(document.cookie)</script>");

    filter.handle(&raw, |request| {
        assert_eq!(request.parameter("short").as_deref(), Some("<b>ok</b>"));

        let long = request.parameter("long").unwrap();
        assert!(!long.contains('<'));
        assert!(long.contains("&lt;script&gt;"));
    });
}
