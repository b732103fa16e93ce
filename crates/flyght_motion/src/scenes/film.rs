//! Film page entrance and scroll reveals

use flyght_animation::{AnimationPreset, Easing, Timeline, Tween};
use flyght_core::{ElementLookup, Property, TargetStore};

use crate::context::{MotionContext, Viewport};
use crate::error::Result;
use crate::scroll::{ScrollReactor, TriggerOptions};

/// Class marking blocks revealed on scroll
pub const REVEAL_SELECTOR: &str = ".reveal";

/// Giant plane sweeps across, then the film copy cascades in
pub fn entrance_timeline(store: &TargetStore, viewport: &Viewport) -> Result<Timeline> {
    let (vw, vh) = (viewport.width, viewport.height);
    let plane = store.select("#flyingPlane");
    let sel = |selector: &str| store.select(selector);

    let mut tl = Timeline::new().with_default_easing(Easing::EaseOutQuart);

    tl.push(
        Tween::set(plane.clone())
            .prop(Property::Left, vw + 200.0)
            .prop(Property::Top, vh / 2.0)
            .prop(Property::XPercent, -50.0)
            .prop(Property::YPercent, -50.0)
            .prop(Property::Scale, 45.0)
            .prop(Property::Rotation, -90.0)
            .prop(Property::Opacity, 1.0),
    )?;
    tl.push(
        Tween::to(plane.clone(), 1.0)
            .prop(Property::Left, -vw * 0.5)
            .ease(Easing::EaseInOutQuad),
    )?;
    tl.push(Tween::set(plane).prop(Property::Opacity, 0.0))?;

    tl.add(AnimationPreset::reveal_up(sel("#filmNumber"), 0.6), "-=0.3")?;
    tl.add(
        AnimationPreset::reveal_up(sel("#filmTitle"), 0.9).ease(Easing::EaseOutQuint),
        "-=0.35",
    )?;
    tl.add(AnimationPreset::reveal_up(sel("#filmMeta"), 0.6), "-=0.5")?;
    tl.add(
        Tween::to(sel("#filmQuote"), 0.8).prop(Property::Opacity, 1.0),
        "-=0.3",
    )?;
    tl.add(AnimationPreset::reveal_up(sel("#manifest"), 0.7), "-=0.5")?;

    Ok(tl)
}

/// Stage every `.reveal` block below its resting place and register a
/// trigger that slides it in. Returns the number of registrations.
pub fn register_reveals(ctx: &mut MotionContext, scroll: &mut ScrollReactor) -> Result<usize> {
    let config = ctx.config().scroll.clone();
    let easing: Easing = config.reveal_ease.parse()?;
    let options = TriggerOptions {
        direction: config.direction,
        once: config.once,
    };

    let blocks = ctx.store().select(REVEAL_SELECTOR);
    for &block in &blocks {
        let store = ctx.store_mut();
        store.set(block, Property::Y, config.reveal_offset);
        store.set(block, Property::Opacity, 0.0);

        let tween = AnimationPreset::reveal_up(block, config.reveal_duration).ease(easing);
        scroll.trigger(block, tween, options)?;
    }

    tracing::debug!(count = blocks.len(), "scroll reveals registered");
    Ok(blocks.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flyght_core::Element;

    #[test]
    fn test_entrance_layout() {
        let mut store = TargetStore::new();
        store.insert(Element::new().id("flyingPlane"));
        store.insert(Element::new().id("filmNumber"));

        let tl = entrance_timeline(&store, &Viewport::new(1440.0, 900.0)).unwrap();
        assert_eq!(tl.len(), 8);
        // Copy chains off the previous entry's end, starting at the sweep
        let end = 1.0 - 0.3 + 0.6 - 0.35 + 0.9 - 0.5 + 0.6 - 0.3 + 0.8 - 0.5 + 0.7;
        assert!((tl.duration() - end).abs() < 1e-4);
    }
}
