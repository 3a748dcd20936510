//! End-to-end scenarios over the public `Matcher` facade.

use std::sync::{Arc, Mutex};

use std::time::Duration;

use multimatch::{Action, Config, ConfigValue, Deadline, Matcher, PatternFlags, PrefilterMode};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn recording_action() -> (Action, Arc<Mutex<Vec<(String, usize, usize)>>>) {
    let hits = Arc::new(Mutex::new(Vec::new()));
    let hits2 = Arc::clone(&hits);
    let action = Action::new(move |matched: &str, start, end| {
        hits2.lock().unwrap().push((matched.to_string(), start, end));
    });
    (action, hits)
}

#[test]
fn s1_two_disjoint_literals() {
    init();
    let matcher = Matcher::new();
    let (ab_action, ab_hits) = recording_action();
    let (ac_action, ac_hits) = recording_action();
    matcher.add("ab", ab_action, PatternFlags::new()).unwrap();
    matcher.add("ac", ac_action, PatternFlags::new()).unwrap();

    matcher.find("ab ac").unwrap();

    assert_eq!(*ab_hits.lock().unwrap(), vec![("ab".to_string(), 0, 1)]);
    assert_eq!(*ac_hits.lock().unwrap(), vec![("ac".to_string(), 3, 4)]);
}

#[test]
fn s2_overlapping_patterns_both_report() {
    init();
    let matcher = Matcher::new();
    let (abc_action, abc_hits) = recording_action();
    let (bcd_action, bcd_hits) = recording_action();
    matcher.add("abc", abc_action, PatternFlags::new()).unwrap();
    matcher.add("bcd", bcd_action, PatternFlags::new()).unwrap();

    matcher.find("abcd").unwrap();

    assert_eq!(*abc_hits.lock().unwrap(), vec![("abc".to_string(), 0, 2)]);
    assert_eq!(*bcd_hits.lock().unwrap(), vec![("bcd".to_string(), 1, 3)]);
}

#[test]
fn s3_greedy_dot_star_runs_to_end_of_buffer() {
    init();
    let matcher = Matcher::new();
    let (alpha_action, alpha_hits) = recording_action();
    let (beta_action, beta_hits) = recording_action();
    matcher
        .add("alpha.*", alpha_action, PatternFlags::new())
        .unwrap();
    matcher
        .add("beta.*", beta_action, PatternFlags::new())
        .unwrap();

    matcher.find("alpha1 beta2").unwrap();

    assert_eq!(
        *alpha_hits.lock().unwrap(),
        vec![("alpha1 beta2".to_string(), 0, 11)]
    );
    assert_eq!(*beta_hits.lock().unwrap(), vec![("beta2".to_string(), 7, 11)]);
}

#[test]
fn s4_aho_corasick_prefilter_finds_both_literals() {
    init();
    let mut config = Config::default();
    config
        .set("prefilter", ConfigValue::Prefilter(PrefilterMode::Aho))
        .unwrap();
    let matcher = Matcher::with_config(config);
    let (hello_action, hello_hits) = recording_action();
    let (world_action, world_hits) = recording_action();
    matcher
        .add("hello", hello_action, PatternFlags::new())
        .unwrap();
    matcher
        .add("world", world_action, PatternFlags::new())
        .unwrap();

    matcher.find("xxx hello yyy world zzz").unwrap();

    assert_eq!(*hello_hits.lock().unwrap(), vec![("hello".to_string(), 4, 8)]);
    assert_eq!(*world_hits.lock().unwrap(), vec![("world".to_string(), 14, 18)]);
}

#[test]
fn s5_case_insensitive_pattern_matches_both_cases() {
    init();
    let matcher = Matcher::new();
    let (action, hits) = recording_action();
    matcher
        .add("FOO", action, PatternFlags::new().case_insensitive(true))
        .unwrap();

    matcher.find("Foo fOO").unwrap();

    assert_eq!(
        *hits.lock().unwrap(),
        vec![("Foo".to_string(), 0, 2), ("fOO".to_string(), 4, 6)]
    );
}

#[test]
fn s6_alternation_does_not_false_match_a_partial_branch() {
    init();
    let matcher = Matcher::new();
    let (action, hits) = recording_action();
    matcher
        .add("a(b|cd)e", action, PatternFlags::new())
        .unwrap();

    matcher.find("abe ace acde").unwrap();

    assert_eq!(
        *hits.lock().unwrap(),
        vec![("abe".to_string(), 0, 2), ("acde".to_string(), 8, 11)]
    );
}

#[test]
fn b1_empty_input_invokes_no_action() {
    init();
    let matcher = Matcher::new();
    let (action, hits) = recording_action();
    matcher.add("a+", action, PatternFlags::new()).unwrap();

    matcher.find("").unwrap();

    assert!(hits.lock().unwrap().is_empty());
}

#[test]
fn b2_star_pattern_never_reports_a_zero_length_match() {
    init();
    let matcher = Matcher::new();
    let (action, hits) = recording_action();
    matcher.add("a*", action, PatternFlags::new()).unwrap();

    matcher.find("bbb").unwrap();

    assert!(hits.lock().unwrap().is_empty());
}

#[test]
fn p5_disabling_prefilters_reports_the_same_matches() {
    init();
    let text = "xxx hello yyy world zzz hello";
    let run_with = |mode: PrefilterMode| {
        let mut config = Config::default();
        config.set("prefilter", ConfigValue::Prefilter(mode)).unwrap();
        let matcher = Matcher::with_config(config);
        let (hello_action, hello_hits) = recording_action();
        let (world_action, world_hits) = recording_action();
        matcher.add("hello", hello_action, PatternFlags::new()).unwrap();
        matcher.add("world", world_action, PatternFlags::new()).unwrap();
        matcher.find(text).unwrap();
        (
            hello_hits.lock().unwrap().clone(),
            world_hits.lock().unwrap().clone(),
        )
    };

    let none = run_with(PrefilterMode::None);
    let first_char = run_with(PrefilterMode::FirstChar);
    let aho = run_with(PrefilterMode::Aho);
    let both = run_with(PrefilterMode::Both);

    assert_eq!(none, first_char);
    assert_eq!(none, aho);
    assert_eq!(none, both);
}

#[test]
fn an_already_expired_deadline_cancels_the_match_but_keeps_what_already_committed() {
    init();
    let matcher = Matcher::new();
    let (action, hits) = recording_action();
    matcher.add("a+", action, PatternFlags::new()).unwrap();

    let deadline = Deadline::after(Duration::from_secs(0));
    let result = matcher.find_cancellable("aaa", deadline.as_cancel_fn());

    assert!(result.is_err());
    assert_eq!(*hits.lock().unwrap(), vec![("a".to_string(), 0, 0)]);
}

#[test]
fn r2_matching_the_same_buffer_twice_is_deterministic() {
    init();
    let matcher = Matcher::new();
    let (action, hits) = recording_action();
    matcher.add("a(b|cd)e", action, PatternFlags::new()).unwrap();

    matcher.find("abe ace acde").unwrap();
    let first = hits.lock().unwrap().clone();
    matcher.find("abe ace acde").unwrap();
    let second = hits.lock().unwrap()[first.len()..].to_vec();

    assert_eq!(first, second);
}
