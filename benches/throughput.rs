use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use runes_rs::{FixedThreshold, Graph, Never, PoissonSignificance, Reader, Scoring};

/// A single sentence repeated: every digram recurs at a fixed period.
fn periodic_text(size: usize) -> String {
    let sentence = "the quick brown fox jumps over the lazy dog ";
    sentence.repeat(size / sentence.len())
}

/// Random words in which a few fixed phrases recur.
///
/// Filler words are drawn independently, so only the digrams inside the
/// phrases occur more often than their letters' frequencies predict.
fn collocations(size: usize) -> String {
    let phrases = ["new york ", "ice cream ", "of the ", "as well as "];
    let letters: Vec<char> = "abcdefghijklmnopqrstuvwxyz".chars().collect();
    let mut text = String::with_capacity(size + 16);
    let mut seed = 0x2545_f491u64;

    while text.len() < size {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        let roll = (seed >> 33) as usize;
        if roll % 4 == 0 {
            text.push_str(phrases[(roll / 4) % phrases.len()]);
        } else {
            for k in 0..3 + roll % 5 {
                text.push(letters[(roll >> (k * 4)) % letters.len()]);
            }
            text.push(' ');
        }
    }
    text.truncate(size);
    text
}

/// Uniform noise over a 64-symbol alphabet; nothing is worth learning.
fn noise(size: usize) -> String {
    let alphabet: Vec<char> = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/"
        .chars()
        .collect();
    let mut seed = 12345u64;

    (0..size)
        .map(|_| {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            alphabet[((seed >> 16) % alphabet.len() as u64) as usize]
        })
        .collect()
}

fn bench_learners(c: &mut Criterion, group_name: &str, generate: fn(usize) -> String) {
    let sizes = [1_000, 10_000, 50_000];
    let mut group = c.benchmark_group(group_name);

    for size in sizes.iter() {
        let data = generate(*size);

        group.bench_with_input(BenchmarkId::new("Never", size), &data, |b, data| {
            b.iter(|| {
                let mut graph = Graph::new();
                Reader::new(&mut graph, Never).extend(black_box(data.chars()));
                black_box(graph)
            });
        });

        group.bench_with_input(BenchmarkId::new("FixedThreshold", size), &data, |b, data| {
            b.iter(|| {
                let mut graph = Graph::new();
                Reader::new(&mut graph, FixedThreshold(10)).extend(black_box(data.chars()));
                black_box(graph)
            });
        });

        group.bench_with_input(BenchmarkId::new("Poisson", size), &data, |b, data| {
            b.iter(|| {
                let mut graph = Graph::new();
                Reader::new(&mut graph, PoissonSignificance::default())
                    .extend(black_box(data.chars()));
                black_box(graph)
            });
        });
    }

    group.finish();
}

fn bench_periodic(c: &mut Criterion) {
    bench_learners(c, "periodic_text", periodic_text);
}

fn bench_collocations(c: &mut Criterion) {
    bench_learners(c, "collocations", collocations);
}

fn bench_noise(c: &mut Criterion) {
    bench_learners(c, "noise", noise);
}

fn bench_guess(c: &mut Criterion) {
    let sizes = [1_000, 10_000];
    let mut group = c.benchmark_group("guess_and_advance");

    for size in sizes.iter() {
        let data = collocations(*size);

        group.bench_with_input(BenchmarkId::new("LengthWeighted", size), &data, |b, data| {
            b.iter(|| {
                let mut graph = Graph::new();
                let mut reader = Reader::new(&mut graph, FixedThreshold(10));
                let mut guessed = 0usize;
                for c in data.chars() {
                    guessed += reader.guess_with(Scoring::LengthWeighted).map_or(0, str::len);
                    reader.advance(c);
                }
                black_box(guessed)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_periodic,
    bench_collocations,
    bench_noise,
    bench_guess
);
criterion_main!(benches);
