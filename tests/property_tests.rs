//! Integration property tests for xss-sanitizer.
//!
//! These tests validate cross-module invariants of the sanitizing request
//! view using property-based testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http::Method;
use proptest::prelude::*;
use xss_sanitizer::web::{Cookie, HttpRequest, RawRequest, XssRequest};
use xss_sanitizer::{EscapePolicy, HeaderAllowList, HtmlPolicy, SanitizationPolicy};

#[derive(Default)]
struct CountingPolicy {
    calls: AtomicUsize,
}

impl SanitizationPolicy for CountingPolicy {
    fn sanitize(&self, input: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        input.to_string()
    }
}

// Strategy: generate script-bearing payloads
fn arb_payload() -> impl Strategy<Value = String> {
    (
        "[a-z0-9 ]{0,12}",
        prop_oneof![
            Just("<script>alert(1)</script>"),
            Just("<script type=\"text/javascript\">x()</script>"),
            Just("<SCRIPT SRC=//evil.example/a.js></SCRIPT>"),
            Just("<svg><script>alert(1)</script></svg>"),
        ],
        "[a-z0-9 ]{0,12}",
    )
        .prop_map(|(a, s, b)| format!("{}{}{}", a, s, b))
}

// Strategy: generate parameter names
fn arb_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,8}").unwrap()
}

// Strategy: generate header names
fn arb_header_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("X-[A-Za-z]{1,10}").unwrap()
}

fn arb_value() -> impl Strategy<Value = String> {
    prop_oneof![arb_payload(), "[a-zA-Z0-9 <>/=\"]{0,24}"]
}

proptest! {
    /// Property: no executable script tag reaches application code through any
    /// intercepted accessor
    #[test]
    fn proptest_no_script_tag_survives(
        name in arb_name(),
        payload in arb_payload(),
    ) {
        let mut raw = RawRequest::new(Method::GET, "/");
        raw.add_parameter(name.clone(), payload.clone());
        raw.add_cookie(Cookie::new("c", payload.clone()));
        raw.set_query_string(payload.clone());
        raw.add_header("User-Agent", &payload).unwrap();

        let request = XssRequest::new(
            Arc::new(HtmlPolicy::new()),
            HeaderAllowList::new(["User-Agent"]),
            &raw,
        );

        let mut observed = vec![
            request.parameter(&name).unwrap().into_owned(),
            request.cookies()[0].value().to_string(),
            request.query_string().unwrap().into_owned(),
            request.header("user-agent").unwrap().into_owned(),
        ];
        observed.extend(request.parameter_values(&name).unwrap().into_iter().map(|v| v.into_owned()));
        observed.extend(request.headers("User-Agent").map(|v| v.into_owned()));

        for value in observed {
            prop_assert!(!value.to_ascii_lowercase().contains("<script"), "leaked: {}", value);
        }
    }

    /// Property: absent parameters never invoke the policy
    #[test]
    fn proptest_absent_parameters_skip_policy(
        present in arb_name(),
        absent in arb_name(),
        value in arb_value(),
    ) {
        prop_assume!(present != absent);

        let mut raw = RawRequest::new(Method::GET, "/");
        raw.add_parameter(present, value);
        let policy = Arc::new(CountingPolicy::default());
        let request = XssRequest::new(policy.clone(), HeaderAllowList::empty(), &raw);

        prop_assert!(request.parameter(&absent).is_none());
        prop_assert!(request.parameter_values(&absent).is_none());
        prop_assert_eq!(policy.calls.load(Ordering::SeqCst), 0);
    }

    /// Property: the parameter map keeps its key set and per-key value counts,
    /// and repeated calls agree
    #[test]
    fn proptest_parameter_map_shape_and_stability(
        entries in prop::collection::vec((arb_name(), arb_value()), 0..12)
    ) {
        let mut raw = RawRequest::new(Method::POST, "/form");
        for (name, value) in &entries {
            raw.add_parameter(name.clone(), value.clone());
        }
        let request = XssRequest::new(Arc::new(HtmlPolicy::new()), HeaderAllowList::empty(), &raw);

        let raw_map = raw.parameter_map();
        let first = request.parameter_map();
        let second = request.parameter_map();

        prop_assert_eq!(first.keys().collect::<Vec<_>>(), raw_map.keys().collect::<Vec<_>>());
        for (name, values) in &raw_map {
            prop_assert_eq!(first[name].len(), values.len());
        }
        prop_assert_eq!(first, second);
    }

    /// Property: headers outside the allow-list come back byte-for-byte
    #[test]
    fn proptest_unlisted_headers_are_untouched(
        listed in arb_header_name(),
        unlisted in arb_header_name(),
        value in "[a-zA-Z0-9 <>/=\"]{0,24}",
    ) {
        prop_assume!(!listed.eq_ignore_ascii_case(&unlisted));

        let mut raw = RawRequest::new(Method::GET, "/");
        raw.add_header(&unlisted, &value).unwrap();
        let request = XssRequest::new(Arc::new(EscapePolicy), HeaderAllowList::new([listed]), &raw);

        prop_assert_eq!(request.header(&unlisted).map(|v| v.into_owned()), raw.header(&unlisted).map(|v| v.into_owned()));
        prop_assert_eq!(
            request.headers(&unlisted).map(|v| v.into_owned()).collect::<Vec<_>>(),
            raw.headers(&unlisted).map(|v| v.into_owned()).collect::<Vec<_>>()
        );
    }

    /// Property: cookie names and order are preserved while values are sanitized
    #[test]
    fn proptest_cookie_names_preserved(
        cookies in prop::collection::vec((arb_name(), arb_value()), 1..6)
    ) {
        let mut raw = RawRequest::new(Method::GET, "/");
        for (name, value) in &cookies {
            raw.add_cookie(Cookie::new(name.clone(), value.clone()));
        }
        let request = XssRequest::new(Arc::new(EscapePolicy), HeaderAllowList::empty(), &raw);

        let sanitized = request.cookies();

        prop_assert_eq!(sanitized.len(), cookies.len());
        for (cookie, (name, _)) in sanitized.iter().zip(&cookies) {
            prop_assert_eq!(cookie.name(), name.as_str());
            prop_assert!(!cookie.value().contains('<'));
        }
        prop_assert_eq!(raw.cookies().len(), cookies.len());
    }
}
