//! Tween presets for common reveal and idle patterns
//!
//! Pre-built tweens for the page's recurring moves: fades, reveals and
//! exits, plus the endless pulse/drift loops used while a page is idle.

use flyght_core::Property;

use crate::easing::Easing;
use crate::tween::{IntoTargets, Tween};

/// Pre-built tweens
pub struct AnimationPreset;

impl AnimationPreset {
    // ========================================================================
    // Fades
    // ========================================================================

    /// Fade to fully opaque
    pub fn fade_in(targets: impl IntoTargets, duration: f32) -> Tween {
        Tween::to(targets, duration).prop(Property::Opacity, 1.0)
    }

    /// Fade to transparent
    pub fn fade_out(targets: impl IntoTargets, duration: f32) -> Tween {
        Tween::to(targets, duration).prop(Property::Opacity, 0.0)
    }

    // ========================================================================
    // Reveals and exits
    // ========================================================================

    /// Slide back to the resting position while fading in. The element is
    /// expected to be staged below its resting place and transparent.
    pub fn reveal_up(targets: impl IntoTargets, duration: f32) -> Tween {
        Tween::to(targets, duration)
            .prop(Property::Y, 0.0)
            .prop(Property::Opacity, 1.0)
    }

    /// Slide `distance` to the right while fading out
    pub fn exit_right(targets: impl IntoTargets, duration: f32, distance: f32) -> Tween {
        Tween::to(targets, duration)
            .prop(Property::X, distance)
            .prop(Property::Opacity, 0.0)
    }

    // ========================================================================
    // Idle loops
    // ========================================================================

    /// Endless breathing between the live opacity and `low`
    pub fn pulse(targets: impl IntoTargets, period: f32, low: f32) -> Tween {
        Tween::to(targets, period)
            .prop(Property::Opacity, low)
            .repeat(-1)
            .yoyo(true)
            .ease(Easing::EaseInOutSine)
    }

    /// Endless back-and-forth drift by a relative offset, in percent of the
    /// element's own size
    pub fn drift(targets: impl IntoTargets, period: f32, dx: f32, dy: f32) -> Tween {
        Tween::to(targets, period)
            .by(Property::XPercent, dx)
            .by(Property::YPercent, dy)
            .repeat(-1)
            .yoyo(true)
            .ease(Easing::EaseInOutSine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TweenEngine;
    use flyght_core::{Element, TargetStore};

    #[test]
    fn test_reveal_up_lands_in_place() {
        let mut store = TargetStore::new();
        let id = store.insert(
            Element::new()
                .prop(Property::Y, 40.0)
                .prop(Property::Opacity, 0.0),
        );
        let mut engine = TweenEngine::new();
        engine
            .add(AnimationPreset::reveal_up(id, 0.9), &mut store)
            .unwrap();

        engine.tick(0.45, &mut store);
        let y = store.get(id, &Property::Y).unwrap();
        assert!(y > 0.0 && y < 40.0);

        engine.tick(1.0, &mut store);
        assert_eq!(store.get(id, &Property::Y), Some(0.0));
        assert_eq!(store.get(id, &Property::Opacity), Some(1.0));
    }

    #[test]
    fn test_pulse_is_endless() {
        let mut store = TargetStore::new();
        let id = store.insert(Element::new());
        let pulse = AnimationPreset::pulse(id, 2.0, 0.4);
        assert!(pulse.total_duration().is_infinite());

        let mut engine = TweenEngine::new();
        engine.add(pulse, &mut store).unwrap();
        engine.tick(3.0, &mut store);
        assert_eq!(engine.len(), 1);

        // Halfway back up in the second iteration
        let opacity = store.get(id, &Property::Opacity).unwrap();
        assert!((opacity - 0.7).abs() < 1e-4);
    }

    #[test]
    fn test_drift_is_relative() {
        let mut store = TargetStore::new();
        let id = store.insert(Element::new().prop(Property::XPercent, -50.0));
        let mut engine = TweenEngine::new();
        engine
            .add(AnimationPreset::drift(id, 4.0, 10.0, -6.0), &mut store)
            .unwrap();
        engine.tick(4.0, &mut store);
        assert!((store.get(id, &Property::XPercent).unwrap() + 40.0).abs() < 1e-4);
        assert!((store.get(id, &Property::YPercent).unwrap() + 6.0).abs() < 1e-4);
    }
}
