//! Hero page intro
//!
//! Counter, flare, letterbox bars, atmosphere, then the hero copy in a
//! cascade. Ambient loops keep the page breathing once it settles.

use flyght_animation::{AnimationPreset, Easing, Timeline, Tween, TweenEvent, TweenEventKind};
use flyght_core::{ElementLookup, Property, TargetId, TargetStore};

use crate::config::IntroConfig;
use crate::context::MotionContext;
use crate::error::Result;

/// Label carried by the counter tween
pub const COUNTER_LABEL: &str = "counter";

/// Custom property the counter tween drives
pub const COUNTER_PROPERTY: &str = "--counter";

/// Build the intro timeline for a hero page
pub fn intro_timeline(store: &TargetStore, config: &IntroConfig) -> Result<Timeline> {
    let default_ease: Easing = config.default_ease.parse()?;
    let sel = |selector: &str| store.select(selector);
    let mut tl = Timeline::new().with_default_easing(default_ease);

    // Counter
    tl.push(Tween::set(sel("#introCounter")).prop(Property::Opacity, 1.0))?;
    tl.push(
        Tween::to(sel(".intro-counter-num"), config.counter_duration)
            .prop(Property::custom(COUNTER_PROPERTY), 100.0)
            .ease(Easing::EaseInCubic)
            .label(COUNTER_LABEL),
    )?;

    // Flare ignites as the counter fades
    tl.add(
        Tween::to(sel("#introFlare"), 0.8)
            .prop(Property::Opacity, 1.0)
            .prop(Property::Width, 70.0)
            .ease(Easing::EaseOutQuint),
        "-=0.5",
    )?;
    tl.add(AnimationPreset::fade_out(sel("#introCounter"), 0.3), "-=0.3")?;

    // Flare stretches out and the letterbox opens
    tl.push(
        Tween::to(sel("#introFlare"), 1.2)
            .prop(Property::Width, 150.0)
            .prop(Property::Height, 6.0)
            .prop(Property::Opacity, 0.0)
            .ease(Easing::EaseInQuart),
    )?;
    tl.add(
        Tween::to(sel(".intro-bar"), 1.4)
            .prop(Property::ScaleY, 0.0)
            .ease(Easing::EaseInOutQuint),
        "-=0.8",
    )?;

    // Atmosphere
    tl.add(
        Tween::to(sel(".grain"), 1.5).prop(Property::Opacity, 0.035),
        "-=0.8",
    )?;
    tl.add(AnimationPreset::fade_in(sel(".vignette"), 1.5), "<")?;
    tl.add(AnimationPreset::fade_in(sel("#atmosphere"), 2.0), "<")?;
    tl.add(AnimationPreset::fade_in(sel("#mouseGlow"), 1.0), "<+0.5")?;

    // Fragments and flares
    tl.add(AnimationPreset::fade_in(sel(".frag"), 2.0).stagger(0.08), "<")?;
    tl.add(AnimationPreset::fade_in(sel(".flare"), 2.0).stagger(0.2), "<+0.3")?;

    // Hero copy
    tl.add(AnimationPreset::fade_in(sel("#heroEyebrow"), 1.0), "-=1.2")?;
    tl.add(
        AnimationPreset::reveal_up(sel(".title-letter"), 1.2)
            .stagger(config.letter_stagger)
            .ease(Easing::EaseOutQuint),
        "-=0.8",
    )?;
    tl.add(
        AnimationPreset::fade_in(sel("#heroTagline"), 1.0).ease(Easing::EaseOutQuart),
        "-=0.5",
    )?;
    tl.add(
        Tween::from(sel("#heroTagline"), 1.0)
            .prop(Property::Y, 20.0)
            .ease(Easing::EaseOutQuart),
        "<",
    )?;
    tl.add(AnimationPreset::fade_in(sel("#heroFilms"), 0.8), "-=0.4")?;
    tl.add(
        Tween::from(sel(".hero-film"), 0.6)
            .prop(Property::Y, 12.0)
            .prop(Property::Opacity, 0.0)
            .stagger(0.05)
            .ease(Easing::EaseOutCubic),
        "<",
    )?;
    tl.add(AnimationPreset::fade_in(sel("#heroCta"), 0.8), "-=0.2")?;
    tl.add(
        Tween::from(sel("#heroCta"), 0.8)
            .prop(Property::Y, 15.0)
            .ease(Easing::EaseOutCubic),
        "<",
    )?;

    // Frame
    tl.add(
        AnimationPreset::fade_in(sel(".side-marker"), 1.0).stagger(0.1),
        "-=0.6",
    )?;
    tl.add(AnimationPreset::fade_in(sel("#heroBottom"), 1.0), "<")?;

    // Title shimmer settles halfway
    tl.add(
        Tween::to(sel(".title-letter"), 3.0)
            .prop(Property::BackgroundPositionY, 50.0)
            .stagger(0.1)
            .ease(Easing::EaseInOutQuad),
        "-=1",
    )?;

    Ok(tl)
}

/// Deterministic value in `[0, 1)` for an element index
fn jitter(index: usize, salt: u32) -> f32 {
    let mut h = (index as u32)
        .wrapping_mul(0x9E37_79B9)
        ^ salt.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7FEB_352D);
    h ^= h >> 15;
    (h >> 8) as f32 / (1u32 << 24) as f32
}

/// Endless loops started alongside the intro: flare pulses and
/// fragment drift
pub fn ambient_loops(store: &TargetStore) -> Vec<Tween> {
    let mut loops = Vec::new();

    if let Some(flare) = store.select_one(".flare--1") {
        loops.push(
            AnimationPreset::pulse(flare, 8.0, 0.6)
                .prop(Property::X, 30.0)
                .delay(6.0),
        );
    }
    if let Some(flare) = store.select_one(".flare--2") {
        loops.push(
            AnimationPreset::pulse(flare, 10.0, 0.5)
                .prop(Property::X, -20.0)
                .delay(7.0),
        );
    }
    if let Some(flare) = store.select_one(".flare--3") {
        loops.push(
            AnimationPreset::pulse(flare, 6.0, 0.8)
                .prop(Property::Scale, 1.5)
                .delay(5.0),
        );
    }

    for (i, frag) in store.select(".frag").into_iter().enumerate() {
        let period = 15.0 + jitter(i, 1) * 10.0;
        // Offsets are percent of the fragment's own size
        let dx = (jitter(i, 2) - 0.5) * 15.0;
        let dy = 10.0 + jitter(i, 3) * 20.0;
        loops.push(AnimationPreset::drift(frag, period, dx, dy).delay(i as f32 * 0.5));
    }

    loops
}

/// Mirror the counter property into the counter's text as two digits
pub fn counter_readout(counter: TargetId) -> impl FnMut(&TweenEvent, &mut MotionContext) {
    let property = Property::custom(COUNTER_PROPERTY);
    move |event, ctx| {
        if !event.is_labeled(COUNTER_LABEL) {
            return;
        }
        if !matches!(
            event.kind,
            TweenEventKind::Update { .. } | TweenEventKind::Complete
        ) {
            return;
        }
        if let Some(value) = ctx.store().get(counter, &property) {
            let text = format!("{:02}", value.round() as i32);
            ctx.store_mut().set_text(counter, text);
        }
    }
}
