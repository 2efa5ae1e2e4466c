//! Benchmarks for preference extraction.
//!
//! Benchmark targets:
//! - Single utterance: <50us
//! - Ten-turn conversation: <500us

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use uniguide::extraction::{detect_preferences, extract_grades};
use uniguide::{PreferenceState, extract};

const SHORT_UTTERANCE: &str = "medicine in london";
const MEDIUM_UTTERANCE: &str = "I want to study medicine in london with great nightlife";
const LONG_UTTERANCE: &str = "I'm predicted AAB and I've been thinking about engineering, \
    ideally somewhere historic in the north of England. Good sports facilities matter to me \
    and I'd like a friendly campus where it's easy to meet people outside lectures.";

const CONVERSATION: [&str; 10] = [
    "hi there",
    "I'm not sure where to go",
    "maybe scotland",
    "I like computing",
    "actually computer science specifically",
    "predicted AAB",
    "a friendly place",
    "good gym would be nice",
    "and a party scene",
    "thanks",
];

fn bench_single_utterance(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_utterance");
    group.measurement_time(Duration::from_secs(5));

    for (name, utterance) in [
        ("short", SHORT_UTTERANCE),
        ("medium", MEDIUM_UTTERANCE),
        ("long", LONG_UTTERANCE),
    ] {
        group.bench_with_input(BenchmarkId::new("detect", name), &utterance, |b, u| {
            b.iter(|| detect_preferences(black_box(u)));
        });
    }

    group.throughput(Throughput::Elements(1));
    group.bench_function("grades", |b| {
        b.iter(|| extract_grades(black_box(LONG_UTTERANCE)));
    });

    group.finish();
}

fn bench_conversation(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_conversation");

    group.throughput(Throughput::Elements(CONVERSATION.len() as u64));
    group.bench_function("ten_turns", |b| {
        b.iter(|| {
            CONVERSATION
                .iter()
                .fold(PreferenceState::new(), |state, turn| {
                    extract(black_box(turn), &state)
                })
        });
    });

    group.finish();
}

criterion_group!(benches, bench_single_utterance, bench_conversation);

criterion_main!(benches);
