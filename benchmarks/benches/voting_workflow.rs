//! Benchmarks for the core voting workflow

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use teamvote::ledger::VoteLedger;

fn bench_cast_vote(c: &mut Criterion) {
    c.bench_function("cast_vote_unique_voters", |b| {
        let ledger = VoteLedger::for_testing();
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            let outcome = ledger
                .cast_vote(black_box(3), &format!("S{i}"), "Bench Voter")
                .unwrap();
            black_box(outcome)
        })
    });

    c.bench_function("cast_vote_duplicate_rejection", |b| {
        let ledger = VoteLedger::for_testing();
        ledger.cast_vote(3, "S1", "Alice").unwrap();
        b.iter(|| {
            let outcome = ledger
                .cast_vote(black_box(3), black_box("S1"), black_box("Alice"))
                .unwrap();
            black_box(outcome)
        })
    });
}

fn bench_results(c: &mut Criterion) {
    let ledger = VoteLedger::for_testing();
    for i in 0u32..500 {
        ledger
            .cast_vote((i % 11) + 1, &format!("S{i}"), "Bench Voter")
            .unwrap();
    }

    c.bench_function("results_ranked", |b| {
        b.iter(|| black_box(ledger.results().unwrap()))
    });

    c.bench_function("check_eligibility", |b| {
        let fp = teamvote::identity::fingerprint("S42", "Bench Voter");
        b.iter(|| black_box(ledger.check_eligibility(&fp).unwrap()))
    });
}

criterion_group!(benches, bench_cast_vote, bench_results);
criterion_main!(benches);
