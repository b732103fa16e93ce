//! Standalone tweens
//!
//! Tweens fired outside any timeline: pointer parallax, hover states,
//! scroll reveals, idle loops. Each tween starts at the engine's current
//! time and is dropped once it completes or once later tweens have taken
//! over every property it drives.

use flyght_core::TargetStore;

use crate::error::Result;
use crate::tween::{RenderMode, Tween, TweenEvent, TweenId};

#[derive(Debug)]
struct ActiveTween {
    /// Engine time the tween was added at
    start: f32,
    tween: Tween,
}

/// Runs standalone tweens against a target store
#[derive(Debug, Default)]
pub struct TweenEngine {
    active: Vec<ActiveTween>,
    time: f32,
    /// Events raised while adding, delivered with the next tick
    pending: Vec<TweenEvent>,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a tween now.
    ///
    /// The tween renders its first frame immediately, so it owns its
    /// properties from this call on. Zero-duration tweens complete here.
    pub fn add(&mut self, mut tween: Tween, store: &mut TargetStore) -> Result<TweenId> {
        tween.validate()?;
        let id = tween.id();
        tween.render(0.0, self.time, store, &mut self.pending, RenderMode::Play);
        self.active.push(ActiveTween {
            start: self.time,
            tween,
        });
        Ok(id)
    }

    /// Drop a tween without completing it
    pub fn kill(&mut self, id: TweenId) -> bool {
        let before = self.active.len();
        self.active.retain(|a| a.tween.id() != id);
        self.active.len() != before
    }

    pub fn is_active(&self, id: TweenId) -> bool {
        self.active.iter().any(|a| a.tween.id() == id)
    }

    /// Number of live tweens
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance every live tween by `dt` seconds
    pub fn tick(&mut self, dt: f32, store: &mut TargetStore) -> Vec<TweenEvent> {
        self.time += dt.max(0.0);
        let mut events = std::mem::take(&mut self.pending);

        for active in &mut self.active {
            active.tween.render(
                self.time - active.start,
                active.start,
                store,
                &mut events,
                RenderMode::Play,
            );
        }

        let store = &*store;
        self.active.retain(|active| {
            if active.tween.is_complete() {
                return false;
            }
            if active.tween.is_overwritten(store) {
                tracing::trace!(tween = ?active.tween.id(), "tween overwritten");
                return false;
            }
            true
        });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::tween::TweenEventKind;
    use flyght_core::{Element, Property};

    #[test]
    fn test_tweens_are_pruned_on_completion() {
        let mut store = TargetStore::new();
        let id = store.insert(Element::new());
        let mut engine = TweenEngine::new();

        let tween = engine
            .add(Tween::to(id, 0.5).prop(Property::Opacity, 0.0), &mut store)
            .unwrap();
        assert!(engine.is_active(tween));

        let mut events = Vec::new();
        for _ in 0..40 {
            events.extend(engine.tick(1.0 / 60.0, &mut store));
        }
        assert!(engine.is_empty());
        assert_eq!(store.get(id, &Property::Opacity), Some(0.0));
        assert_eq!(events.first().map(|e| &e.kind), Some(&TweenEventKind::Start));
        assert_eq!(
            events
                .iter()
                .filter(|e| e.kind == TweenEventKind::Complete)
                .count(),
            1
        );
    }

    #[test]
    fn test_later_tween_takes_over() {
        let mut store = TargetStore::new();
        let id = store.insert(Element::new());
        let mut engine = TweenEngine::new();

        let first = engine
            .add(
                Tween::to(id, 1.0).prop(Property::X, 100.0).ease(Easing::Linear),
                &mut store,
            )
            .unwrap();
        engine.tick(0.5, &mut store);
        assert_eq!(store.get(id, &Property::X), Some(50.0));

        let second = engine
            .add(
                Tween::to(id, 1.0).prop(Property::X, 0.0).ease(Easing::Linear),
                &mut store,
            )
            .unwrap();
        engine.tick(0.25, &mut store);

        // Picked up from 50 and owns x from now on
        assert_eq!(store.get(id, &Property::X), Some(37.5));
        assert!(!engine.is_active(first));
        assert!(engine.is_active(second));
    }

    #[test]
    fn test_invalid_tween_is_rejected() {
        let mut store = TargetStore::new();
        let id = store.insert(Element::new());
        let mut engine = TweenEngine::new();
        assert!(engine
            .add(Tween::to(id, 1.0).ease_named("bouncy"), &mut store)
            .is_err());
        assert!(engine.is_empty());
    }

    #[test]
    fn test_kill() {
        let mut store = TargetStore::new();
        let id = store.insert(Element::new());
        let mut engine = TweenEngine::new();
        let tween = engine
            .add(Tween::to(id, 1.0).prop(Property::X, 1.0).repeat(-1), &mut store)
            .unwrap();
        assert!(engine.kill(tween));
        assert!(!engine.kill(tween));
    }
}
