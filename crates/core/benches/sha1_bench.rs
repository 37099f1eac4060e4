//! Benchmarks for the SHA-1 engine and DUCO-S1 search

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use duco_sha1::{Sha1, ducos1, hmac_sha1};

fn bench_hash(c: &mut Criterion) {
    let mut hasher = Sha1::new();
    let input = b"ba29a15896fd2d792d5c4b60668bf2b9feebc51d123456";

    c.bench_function("sha1_job_string", |b| {
        b.iter(|| {
            hasher.init();
            hasher.write_bytes(black_box(input));
            *hasher.result()
        })
    });
}

fn bench_hmac(c: &mut Criterion) {
    c.bench_function("hmac_sha1_short", |b| {
        b.iter(|| hmac_sha1(black_box(b"key"), black_box(b"The quick brown fox")))
    });
}

fn bench_ducos1(c: &mut Criterion) {
    let last_hash = b"ba29a15896fd2d792d5c4b60668bf2b9feebc51d";
    let expected = ducos1::job_digest(last_hash, 577);

    c.bench_function("ducos1_diff6", |b| {
        b.iter(|| ducos1::search(black_box(last_hash), black_box(&expected), 6))
    });
}

criterion_group!(benches, bench_hash, bench_hmac, bench_ducos1);
criterion_main!(benches);
