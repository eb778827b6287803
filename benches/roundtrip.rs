use brine::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_pickle(c: &mut Criterion) {
    let p = tuple3(int64(), string(), prefixed(float64()));
    let v = (
        -99_999_999i64,
        "a reasonably sized payload string".to_owned(),
        (0..64).map(|n| n as f64 / 3.0).collect::<Vec<f64>>(),
    );

    c.bench_function("pickle tuple3", |b| {
        b.iter(|| pickle(&p, black_box(&v)).unwrap())
    });

    let bytes = pickle(&p, &v).unwrap();
    c.bench_function("unpickle tuple3", |b| {
        b.iter(|| unpickle(&p, black_box(&bytes)).unwrap())
    });
}

criterion_group!(benches, bench_pickle);
criterion_main!(benches);
