use composer::PhraseSequence;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const NOTES: [&str; 7] = ["C", "D", "E", "F", "G", "A", "B"];

fn build(len: usize) -> PhraseSequence {
    (0..len).map(|i| NOTES[i % NOTES.len()]).collect()
}

fn bench_append(c: &mut Criterion) {
    c.bench_function("add_at_end_1000", |b| {
        b.iter(|| {
            let mut seq = PhraseSequence::new();
            for i in 0..1000 {
                seq.add_at_end(NOTES[i % NOTES.len()]);
            }
            black_box(seq.len())
        })
    });
}

fn bench_indexed_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_at_middle");
    for len in [100usize, 1000, 10000] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let seq = build(len);
            b.iter(|| {
                let mut seq = seq.clone();
                seq.add_at("X", black_box(len / 2)).unwrap();
                black_box(seq.len())
            })
        });
    }
    group.finish();
}

fn bench_relocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_phrase");
    for len in [100usize, 1000, 10000] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let mut seq = build(len);
            b.iter(|| {
                seq.move_phrase(black_box(0), black_box(len - 1)).unwrap();
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_append, bench_indexed_insert, bench_relocation);
criterion_main!(benches);
