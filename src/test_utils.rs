//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;

use crate::SanitizationPolicy;

/// Returns its input unchanged and counts how often it was asked to.
#[derive(Debug, Default)]
pub(crate) struct CountingPolicy {
    calls: AtomicUsize,
}

impl CountingPolicy {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SanitizationPolicy for CountingPolicy {
    fn sanitize(&self, input: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        input.to_string()
    }
}

/// Wraps its input in brackets so tests can see exactly which values were
/// sanitized, and how many times.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkingPolicy;

impl SanitizationPolicy for MarkingPolicy {
    fn sanitize(&self, input: &str) -> String {
        format!("[{}]", input)
    }
}

/// Strategy: text with a script element spliced into it.
pub(crate) fn arb_script_payload() -> impl Strategy<Value = String> {
    (
        "[a-zA-Z0-9 ]{0,20}",
        prop_oneof![
            Just("<script>alert(1)</script>"),
            Just("<SCRIPT>alert(1)</SCRIPT>"),
            Just("<script src=\"https://evil.example/x.js\"></script>"),
            Just("<ScRiPt>document.cookie</sCrIpT>"),
            Just("<scr<script>ipt>alert(1)</script>"),
        ],
        "[a-zA-Z0-9 ]{0,20}",
    )
        .prop_map(|(before, script, after)| format!("{}{}{}", before, script, after))
}

/// Strategy: a short list of parameter values, markup included.
pub(crate) fn arb_parameter_values() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z<>/ =\"]{0,16}", 0..8)
}
