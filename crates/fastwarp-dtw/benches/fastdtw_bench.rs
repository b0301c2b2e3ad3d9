//! Criterion benchmarks for fastwarp-dtw: exact vs FastDTW, pairwise matrix, template matching.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use fastwarp_dtw::{
    Dtw, Euclidean, FastDtw, MatchMode, Paa, TemplateMatcher, TemplateSet, TimeSeries,
};

fn make_random_walk(rng: &mut ChaCha8Rng, n: usize) -> TimeSeries<f64> {
    let mut value = 0.0_f64;
    let values: Vec<f64> = (0..n)
        .map(|_| {
            value += rng.gen_range(-1.0..1.0);
            value
        })
        .collect();
    TimeSeries::from_values(values).unwrap()
}

fn bench_exact_vs_fast(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let lengths = [128usize, 512, 2048];
    let radii = [1isize, 10, 30];

    let mut group = c.benchmark_group("warp_distance");

    for &len in &lengths {
        let a = make_random_walk(&mut rng, len);
        let b = make_random_walk(&mut rng, len);

        if len <= 512 {
            let dtw = Dtw::new(Euclidean);
            group.bench_function(BenchmarkId::new(format!("len{len}"), "exact"), |bencher| {
                bencher.iter(|| dtw.warp_distance(&a, &b));
            });
        }

        for &radius in &radii {
            let fast = FastDtw::new(Euclidean).with_radius(radius);
            let id = BenchmarkId::new(format!("len{len}"), format!("fast_r{radius}"));
            group.bench_function(id, |bencher| {
                bencher.iter(|| fast.warp_distance(&a, &b));
            });
        }
    }

    group.finish();
}

fn bench_paa_halving(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut group = c.benchmark_group("paa_halving");

    // time per length should grow linearly
    for len in [20_000usize, 40_000, 80_000] {
        let series = make_random_walk(&mut rng, len);
        group.bench_function(BenchmarkId::from_parameter(len), |bencher| {
            bencher.iter(|| Paa::new(&series, len / 2).unwrap());
        });
    }

    group.finish();
}

fn bench_fast_warp_info(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let a = make_random_walk(&mut rng, 4096);
    let b = make_random_walk(&mut rng, 3000);
    let fast = FastDtw::new(Euclidean).with_radius(10);

    c.bench_function("fast_warp_info_4096x3000_r10", |bencher| {
        bencher.iter(|| fast.warp_info(&a, &b).unwrap());
    });
}

fn bench_pairwise(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let series: Vec<TimeSeries<f64>> = (0..50).map(|_| make_random_walk(&mut rng, 256)).collect();
    let fast = FastDtw::new(Euclidean).with_radius(5);

    c.bench_function("fast_pairwise_50x256_r5", |bencher| {
        bencher.iter(|| fast.pairwise(&series).unwrap());
    });
}

fn bench_template_matching(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut set = TemplateSet::new();
    for k in 0..40 {
        set.insert(format!("class{}", k % 4), make_random_walk(&mut rng, 200))
            .unwrap();
    }
    let query = make_random_walk(&mut rng, 220);
    let matcher = TemplateMatcher::new(FastDtw::new(Euclidean).with_radius(5))
        .with_mode(MatchMode::BestClass);

    c.bench_function("match_query_40x200_r5", |bencher| {
        bencher.iter(|| matcher.match_query(&set, &query).unwrap());
    });
}

criterion_group!(
    benches,
    bench_exact_vs_fast,
    bench_paa_halving,
    bench_fast_warp_info,
    bench_pairwise,
    bench_template_matching
);
criterion_main!(benches);
