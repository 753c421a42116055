use criterion::{black_box, criterion_group, criterion_main, Criterion};
use weavemaze::twister::MersenneTwister;

fn bench_next_u32(c: &mut Criterion) {
    let mut rng = MersenneTwister::from_seed(12345);
    c.bench_function("twister_next_u32", move |b| {
        b.iter(|| black_box(rng.next_u32()))
    });
}

fn bench_refill(c: &mut Criterion) {
    c.bench_function("twister_seed_and_refill", |b| {
        b.iter(|| {
            let mut rng = MersenneTwister::from_seed(black_box(12345));
            rng.next_u32()
        })
    });
}

fn bench_randomize_list(c: &mut Criterion) {
    let mut rng = MersenneTwister::from_seed(12345);
    let mut items: Vec<u32> = (0..1024).collect();
    c.bench_function("twister_randomize_list_1024", move |b| {
        b.iter(|| rng.randomize_list(&mut items))
    });
}

criterion_group!(benches, bench_next_u32, bench_refill, bench_randomize_list);
criterion_main!(benches);
