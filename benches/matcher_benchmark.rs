use std::sync::atomic::{AtomicUsize, Ordering};

use criterion::{criterion_group, criterion_main, Criterion};
use multimatch::{Action, Matcher, PatternFlags};

const INPUT: &str = include_str!("./input_1.txt");

fn matcher_benchmark(c: &mut Criterion) {
    let matcher = Matcher::new();
    let count = Box::leak(Box::new(AtomicUsize::new(0)));
    for source in ["fn\\s+\\w+", "\\d+", "//.*", "\"[^\"]*\""] {
        matcher
            .add(
                source,
                Action::new(move |_m, _s, _e| {
                    count.fetch_add(1, Ordering::Relaxed);
                }),
                PatternFlags::new(),
            )
            .unwrap();
    }

    c.bench_function("matcher_benchmark", |b| {
        b.iter(|| {
            matcher.find(INPUT).unwrap();
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(50);
    targets = matcher_benchmark
}

criterion_main!(benches);
