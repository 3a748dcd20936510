//! Cross-checks a handful of match spans against the `regex` crate as an
//! independent oracle.
//!
//! `regex`'s public API matches leftmost-first rather than leftmost-longest,
//! so only patterns without an internal alternation-length ambiguity are
//! used here (plain literals and single quantified classes), for which the
//! two disciplines agree.

use std::sync::{Arc, Mutex};

use multimatch::{Action, Matcher, PatternFlags};
use regex::Regex;

fn collect(pattern: &str, text: &str) -> Vec<(String, usize, usize)> {
    let hits = Arc::new(Mutex::new(Vec::new()));
    let hits2 = Arc::clone(&hits);
    let matcher = Matcher::new();
    matcher
        .add(
            pattern,
            Action::new(move |m: &str, s, e| hits2.lock().unwrap().push((m.to_string(), s, e))),
            PatternFlags::new(),
        )
        .unwrap();
    matcher.find(text).unwrap();
    Arc::try_unwrap(hits).unwrap().into_inner().unwrap()
}

fn oracle(pattern: &str, text: &str) -> Vec<(String, usize, usize)> {
    let rx = Regex::new(pattern).unwrap();
    rx.find_iter(text)
        .map(|m| (m.as_str().to_string(), m.start(), m.end() - 1))
        .collect()
}

#[test]
fn literal_spans_agree_with_the_regex_crate() {
    let text = "ab ac ab";
    assert_eq!(collect("ab", text), oracle("ab", text));
}

#[test]
fn digit_run_spans_agree_with_the_regex_crate() {
    let text = "room 204, floor 2, suite 19";
    assert_eq!(collect(r"\d+", text), oracle(r"\d+", text));
}

#[test]
fn word_class_spans_agree_with_the_regex_crate() {
    let text = "alpha beta gamma";
    assert_eq!(collect(r"[a-z]+", text), oracle(r"[a-z]+", text));
}
