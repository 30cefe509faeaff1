use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;
use uiconfig::{Color, ConfigStore, HsvDelta, Palette, RelativeHsv, UiConfiguration};

// A theme with `size` base colors, a lightened variant of each and an alias to every variant
fn build_config(size: usize) -> UiConfiguration {
    let mut rng = StdRng::seed_from_u64(7);
    let mut config = UiConfiguration::new(ConfigStore::new(std::env::temp_dir(), Vec::new()));

    for i in 0..size {
        let base = format!("base-{}", i);
        config.set_base(base.clone(), Color::rgb(rng.gen(), rng.gen(), rng.gen()));
        config.set_relative(
            format!("rel-{}", i),
            RelativeHsv::new(base, HsvDelta::new(rng.gen_range(-30.0..30.0), 0.0, 0.1)),
        );
        config.set_alias(format!("alias-{}", i), format!("rel-{}", i));
    }
    config
}

fn palette_of(size: usize) -> Palette {
    (*build_config(size).snapshot()).clone()
}

pub fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [10, 100, 1000].iter() {
        let palette = palette_of(*size);
        let last = size - 1;

        group.bench_with_input(BenchmarkId::new("base", size), size, |b, _| {
            let name = format!("base-{}", last);
            b.iter(|| black_box(&palette).color(black_box(&name)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("alias_to_relative", size), size, |b, _| {
            let name = format!("alias-{}", last);
            b.iter(|| black_box(&palette).color(black_box(&name)).unwrap());
        });
    }
    group.finish();
}

pub fn bench_reverse_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("reverse_mapping");
    let mut rng = StdRng::seed_from_u64(11);

    for size in [10, 100, 1000].iter() {
        let palette = palette_of(*size);
        let probes: Vec<Color> = (0..64)
            .map(|_| Color::rgb(rng.gen(), rng.gen(), rng.gen()))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("color_as_relative_hsv", size),
            size,
            |b, _| {
                b.iter(|| {
                    for probe in &probes {
                        black_box(palette.color_as_relative_hsv(*probe));
                    }
                });
            },
        );
    }
    group.finish();
}

pub fn bench_snapshots(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshots");

    for size in [100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::new("copy_on_write_set", size),
            size,
            |b, &size| {
                let mut config = build_config(size);
                b.iter(|| {
                    let held = config.snapshot();
                    config.set_base("base-0", Color::rgb(1, 2, 3));
                    black_box(held);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .sample_size(100)
        .measurement_time(Duration::from_secs(10));
    targets = bench_lookup, bench_reverse_mapping, bench_snapshots
);
criterion_main!(benches);
