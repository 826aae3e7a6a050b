//! Benchmarks for drape cloth simulation.

use criterion::{criterion_group, criterion_main, Criterion};
use drape::*;

fn bench_topology_build(c: &mut Criterion) {
    c.bench_function("topology_build_32x32", |b| {
        b.iter(|| {
            let t: Topology<f32> = Topology::build(32, 32, ClothPrefab::Banner, &ClothConfig::new()).unwrap();
            t.springs.len()
        });
    });
}

fn bench_banner_calm(c: &mut Criterion) {
    c.bench_function("banner_20x20_60_updates", |b| {
        b.iter(|| {
            let mut cloth = ClothSimulation::new(20, 20, ClothPrefab::Banner, ClothConfig::<f32>::new()).unwrap();
            for _ in 0..60 {
                cloth.update(&Mat4::identity(), 1.0 / 60.0, |_| {}).unwrap();
            }
            cloth.vertices()[0]
        });
    });
}

fn bench_flag_fancy_wind(c: &mut Criterion) {
    c.bench_function("flag_20x12_fancy_wind_60_updates", |b| {
        b.iter(|| {
            let mut cloth = ClothSimulation::new(20, 12, ClothPrefab::Flag, ClothConfig::<f32>::new()).unwrap();
            cloth.set_wind(Vec3::new(1.0, 0.0, 0.5), 6.0, true);
            for frame in 0..60 {
                let pole = Mat4::from_rotation_y(frame as f32 * 0.02);
                cloth.update(&pole, 1.0 / 60.0, |_| {}).unwrap();
            }
            cloth.vertices()[0]
        });
    });
}

criterion_group!(benches, bench_topology_build, bench_banner_calm, bench_flag_fancy_wind);
criterion_main!(benches);
