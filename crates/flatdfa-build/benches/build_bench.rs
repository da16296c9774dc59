// Criterion benchmarks for flatdfa-build.
//
// Sample sets are generated from fixed seeds, so runs are comparable.
//
// Run:
//   cargo bench -p flatdfa-build

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use flatdfa_build::{BuildOptions, build};
use flatdfa_core::{Sample, Shape, Symbol};

// ---------------------------------------------------------------------------
// Sample generation
// ---------------------------------------------------------------------------

/// Every word of `shape`, classified by `classify`.
fn exhaustive(shape: Shape, classify: impl Fn(&[Symbol]) -> i32) -> Vec<Sample> {
    let alphabet_size = shape.alphabet_size() as u64;
    let total = alphabet_size.pow(shape.word_length() as u32);
    (0..total)
        .map(|mut n| {
            let mut word = vec![0; shape.word_length()];
            for slot in word.iter_mut().rev() {
                *slot = (n % alphabet_size) as Symbol;
                n /= alphabet_size;
            }
            let value = classify(&word);
            Sample::new(word, value)
        })
        .collect()
}

/// `count` random words with a handful of distinct values.
fn random(shape: Shape, count: usize, seed: u64) -> Vec<Sample> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut samples: Vec<Sample> = (0..count)
        .map(|_| {
            let word: Vec<Symbol> = (0..shape.word_length())
                .map(|_| rng.u32(0..shape.alphabet_size() as u32))
                .collect();
            Sample::new(word, rng.i32(0..4))
        })
        .collect();
    samples.sort_by(|a, b| a.word.cmp(&b.word));
    samples.dedup_by(|a, b| a.word == b.word);
    rng.shuffle(&mut samples);
    samples
}

fn options(shape: Shape) -> BuildOptions {
    BuildOptions::default()
        .with_alphabet_size(shape.alphabet_size())
        .with_word_length(shape.word_length())
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Full enumerations whose minimal automata are small (symbol-sum classes).
fn bench_exhaustive(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_exhaustive");
    for (alphabet_size, word_length) in [(4, 6), (6, 5), (10, 4)] {
        let shape = Shape::new(alphabet_size, word_length).unwrap();
        let samples = exhaustive(shape, |w| (w.iter().sum::<Symbol>() % 7) as i32);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{alphabet_size}x{word_length}")),
            &samples,
            |b, samples| b.iter(|| build(samples, options(shape)).unwrap()),
        );
    }
    group.finish();
}

/// Sparse random sets whose automata stay close to a trie.
fn bench_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_random");
    let shape = Shape::new(16, 8).unwrap();
    for count in [1_000, 10_000] {
        let samples = random(shape, count, 42);
        group.bench_with_input(BenchmarkId::from_parameter(count), &samples, |b, samples| {
            b.iter(|| build(samples, options(shape)).unwrap())
        });
    }
    group.finish();
}

/// Lookup of every word in a built table.
fn bench_lookup(c: &mut Criterion) {
    let shape = Shape::new(6, 5).unwrap();
    let samples = exhaustive(shape, |w| (w.iter().sum::<Symbol>() % 7) as i32);
    let table = build(&samples, options(shape)).unwrap();

    c.bench_function("lookup_exhaustive_6x5", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for sample in &samples {
                if table.lookup(&sample.word).unwrap().is_some() {
                    hits += 1;
                }
            }
            std::hint::black_box(hits)
        })
    });

    c.bench_function("walk_exhaustive_6x5", |b| {
        b.iter(|| {
            let mut acc = 0i64;
            for sample in &samples {
                acc += i64::from(table.walk(&sample.word));
            }
            std::hint::black_box(acc)
        })
    });
}

criterion_group!(benches, bench_exhaustive, bench_random, bench_lookup);
criterion_main!(benches);
