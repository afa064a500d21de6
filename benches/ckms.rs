use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use biased_quantiles::ckms::{Bias, CKMS};
use biased_quantiles::util::Xorshift;

const BIASES: [(&str, Bias); 3] = [
    ("low", Bias::Low),
    ("high", Bias::High),
    ("uniform", Bias::Uniform),
];

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for (name, bias) in BIASES {
        for size in [100_u64, 1_000, 10_000, 65_535] {
            group.throughput(Throughput::Elements(size));
            group.bench_function(format!("{}/u16/{}", name, size), |b| {
                b.iter(|| {
                    let mut xshft = Xorshift::new(1972);
                    let mut ckms = CKMS::<u16>::new(bias, 0.001).unwrap();
                    for _ in 0..size {
                        ckms.insert(black_box(xshft.next_val() as u16));
                    }
                    ckms.count()
                })
            });
            group.bench_function(format!("{}/f64/{}", name, size), |b| {
                b.iter(|| {
                    let mut xshft = Xorshift::new(1972);
                    let mut ckms = CKMS::<f64>::new(bias, 0.001).unwrap();
                    for _ in 0..size {
                        ckms.insert(black_box(xshft.next_f64()));
                    }
                    ckms.count()
                })
            });
        }
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    for (name, bias) in BIASES {
        let mut xshft = Xorshift::new(1972);
        let mut ckms = CKMS::<f64>::new(bias, 0.001).unwrap();
        for _ in 0..100_000 {
            ckms.insert(xshft.next_f64());
        }

        group.bench_function(format!("{}/sweep", name), |b| {
            b.iter(|| {
                for phi in [0.01, 0.1, 0.5, 0.9, 0.99] {
                    black_box(ckms.quantile(black_box(phi)));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert, bench_query);
criterion_main!(benches);
