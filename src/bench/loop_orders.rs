use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use looporder::{FillPolicy, LoopOrder, MatrixFactory, multiply};

const INPUT_SIZES: &[usize] = &[64, 128, 256];

fn bench_loop_orders(c: &mut Criterion) {
    let mut factory = MatrixFactory::new(FillPolicy::Uniform {
        seed: Some(0xC0FF_EE42),
    });

    for &n in INPUT_SIZES {
        let mut group = c.benchmark_group(format!("matmul_{n}"));
        group.throughput(Throughput::Elements(2 * (n as u64).pow(3)));

        let mut ops = factory.operands(n).expect("benchmark operands");
        for order in LoopOrder::ALL {
            group.bench_with_input(BenchmarkId::new("order", order), &order, |bench, &order| {
                bench.iter(|| {
                    multiply(order, black_box(&ops.a), black_box(&ops.b), &mut ops.c);
                    black_box(ops.c.get(n / 2, n / 2));
                });
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_loop_orders);
criterion_main!(benches);
