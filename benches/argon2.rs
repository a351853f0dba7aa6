use cryptal_argon2::derivation::{Algorithm, Params, hash};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

pub fn bench_argon2(c: &mut Criterion) {
    let mut group = c.benchmark_group("argon2id 4 MiB t=1");
    group.sample_size(10);

    for (lanes, threads) in [(1u32, 1u32), (4, 1), (4, 4)] {
        let params = Params {
            mem_kib: 4096,
            time: 1,
            lanes,
            threads,
            ..Params::default()
        };
        group.bench_with_input(
            BenchmarkId::new(format!("p={lanes}"), threads),
            &params,
            |b, params| {
                b.iter(|| {
                    hash(
                        Algorithm::Argon2id,
                        black_box(b"password"),
                        black_box(b"somesalt"),
                        params,
                    )
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_argon2);
criterion_main!(benches);
