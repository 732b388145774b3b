use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lottie_core::animatable::Animator;
use lottie_data::model::{Keyframe, Property};

fn bench_animator_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("Animator::components_at");

    // Create 10,000 keyframes
    let count = 10_000;
    let mut keyframes = Vec::with_capacity(count);
    for i in 0..count {
        keyframes.push(Keyframe::linear(i as f64, vec![i as f64, -(i as f64)]));
    }
    let property = Property::track(keyframes);

    // Test early, middle, late frames
    for &frame in &[100.5, 5000.5, 9990.5] {
        group.bench_with_input(BenchmarkId::new("resolve_frame", frame), &frame, |b, &f| {
            b.iter(|| Animator::components_at(&property, f))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_animator_resolve);
criterion_main!(benches);
