use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flyght_animation::{Easing, Timeline, Tween};
use flyght_core::{Element, Property, TargetStore};

fn easing(c: &mut Criterion) {
    let curves = [
        Easing::EaseInOutQuart,
        Easing::EaseOutSine,
        Easing::ELASTIC_OUT,
        Easing::CubicBezier(0.25, 0.1, 0.25, 1.0),
    ];
    c.bench_function("easing_apply", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for curve in &curves {
                for i in 0..=100 {
                    sum += curve.apply(black_box(i as f32 / 100.0));
                }
            }
            sum
        })
    });
}

fn staggered_timeline(store: &mut TargetStore) -> Timeline {
    let letters: Vec<_> = (0..32)
        .map(|i| store.insert(Element::new().id(format!("letter{i}"))))
        .collect();

    let mut timeline = Timeline::new().with_default_easing(Easing::EaseInOutQuart);
    timeline
        .push(
            Tween::from(letters.clone(), 1.2)
                .prop(Property::Y, 40.0)
                .prop(Property::Opacity, 0.0)
                .stagger(0.05),
        )
        .unwrap();
    timeline
        .add(Tween::to(letters, 0.6).prop(Property::Scale, 1.1), "-=0.4")
        .unwrap();
    timeline
}

fn timeline_tick(c: &mut Criterion) {
    c.bench_function("timeline_tick_32_targets", |b| {
        b.iter(|| {
            let mut store = TargetStore::new();
            let mut timeline = staggered_timeline(&mut store);
            let done = timeline.play();
            while !done.is_complete() {
                black_box(timeline.tick(1.0 / 120.0, &mut store));
            }
        })
    });
}

criterion_group!(benches, easing, timeline_tick);
criterion_main!(benches);
