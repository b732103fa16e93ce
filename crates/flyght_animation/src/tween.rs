//! Tweens
//!
//! A tween interpolates numeric properties on one or more targets over a
//! fixed duration. Start values are read from the live element state when
//! each target's track actually starts, so a tween scheduled behind another
//! one on the same property picks up wherever the earlier one left it.
//!
//! # Example
//!
//! ```ignore
//! let reveal = Tween::to(store.select(".title-letter"), 1.2)
//!     .prop(Property::Y, 0.0)
//!     .prop(Property::Opacity, 1.0)
//!     .stagger(0.07)
//!     .ease(Easing::EaseOutQuint);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use flyght_core::{OwnerId, Property, TargetId, TargetStore};
use smallvec::SmallVec;

use crate::easing::{Easing, FALLBACK_EASING};
use crate::error::{AnimationError, Result};

static NEXT_TWEEN_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique tween identifier, carried by every event the tween emits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(u64);

impl TweenId {
    fn next() -> Self {
        TweenId(NEXT_TWEEN_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A property value, either absolute or relative to the live value at start
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenValue {
    Absolute(f32),
    /// `+=delta` / `-=delta`
    Relative(f32),
}

impl TweenValue {
    fn resolve(self, live: f32) -> f32 {
        match self {
            TweenValue::Absolute(v) => v,
            TweenValue::Relative(delta) => live + delta,
        }
    }
}

impl From<f32> for TweenValue {
    fn from(value: f32) -> Self {
        TweenValue::Absolute(value)
    }
}

/// How property values relate to the live value when a track starts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenKind {
    /// Animate from the live value to the given value
    To,
    /// Animate from the given value to the live value
    From,
    /// Write the given value immediately, no interpolation
    Set,
}

/// Something a tween can report while it plays
#[derive(Clone, Debug, PartialEq)]
pub enum TweenEventKind {
    Start,
    /// Sampled this frame. `progress` covers the whole tween including
    /// staggers, and is 0 for endlessly repeating tweens.
    Update {
        progress: f32,
    },
    /// One staggered target reached its end
    TargetComplete {
        index: usize,
        target: TargetId,
    },
    Complete,
}

/// Observer event emitted by a tween
#[derive(Clone, Debug, PartialEq)]
pub struct TweenEvent {
    pub tween: TweenId,
    pub label: Option<Arc<str>>,
    pub kind: TweenEventKind,
    /// When the event happened on the root timeline. Boundary events carry
    /// the exact boundary time rather than the frame time.
    pub time: f32,
}

impl TweenEvent {
    /// Whether this event carries the given label
    pub fn is_labeled(&self, label: &str) -> bool {
        self.label.as_deref() == Some(label)
    }
}

/// Whether a render pass reports events
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RenderMode {
    /// Monotonic playback: boundary crossings emit events
    Play,
    /// Jump to a time: re-derive values, stay silent
    Seek,
}

/// Anything that names a set of targets
pub trait IntoTargets {
    fn into_targets(self) -> SmallVec<[TargetId; 8]>;
}

impl IntoTargets for TargetId {
    fn into_targets(self) -> SmallVec<[TargetId; 8]> {
        smallvec::smallvec![self]
    }
}

impl IntoTargets for Option<TargetId> {
    fn into_targets(self) -> SmallVec<[TargetId; 8]> {
        self.into_iter().collect()
    }
}

impl IntoTargets for SmallVec<[TargetId; 8]> {
    fn into_targets(self) -> SmallVec<[TargetId; 8]> {
        self
    }
}

impl IntoTargets for Vec<TargetId> {
    fn into_targets(self) -> SmallVec<[TargetId; 8]> {
        SmallVec::from_vec(self)
    }
}

impl IntoTargets for &[TargetId] {
    fn into_targets(self) -> SmallVec<[TargetId; 8]> {
        SmallVec::from_slice(self)
    }
}

impl<const N: usize> IntoTargets for [TargetId; N] {
    fn into_targets(self) -> SmallVec<[TargetId; 8]> {
        self.into_iter().collect()
    }
}

#[derive(Clone, Debug)]
struct PropertySpec {
    property: Property,
    from: Option<TweenValue>,
    to: Option<TweenValue>,
}

#[derive(Clone, Debug)]
struct PropertyTrack {
    property: Property,
    start: f32,
    end: f32,
}

/// Per-target playback state
#[derive(Clone, Debug)]
struct TargetTrack {
    target: TargetId,
    /// Stagger offset from the tween's start
    offset: f32,
    owner: Option<OwnerId>,
    props: SmallVec<[PropertyTrack; 4]>,
    initialized: bool,
    started: bool,
    completed: bool,
}

impl TargetTrack {
    fn new(target: TargetId, offset: f32) -> Self {
        Self {
            target,
            offset,
            owner: None,
            props: SmallVec::new(),
            initialized: false,
            started: false,
            completed: false,
        }
    }

    /// Resolve start and end values from the live element state
    fn initialize(&mut self, specs: &[PropertySpec], store: &mut TargetStore) {
        self.initialized = true;
        self.owner = Some(store.allocate_owner());

        for spec in specs {
            let Some(live) = store.get(self.target, &spec.property) else {
                tracing::debug!(property = %spec.property, "tween target missing, skipping");
                continue;
            };
            self.props.push(PropertyTrack {
                property: spec.property.clone(),
                start: spec.from.map_or(live, |v| v.resolve(live)),
                end: spec.to.map_or(live, |v| v.resolve(live)),
            });
        }
    }

    fn claim(&self, store: &mut TargetStore) {
        if let Some(owner) = self.owner {
            for prop in &self.props {
                store.claim(self.target, &prop.property, owner);
            }
        }
    }

    fn write(&self, store: &mut TargetStore, eased: f32) {
        let Some(owner) = self.owner else { return };
        for prop in &self.props {
            let value = prop.start + eased * (prop.end - prop.start);
            store.write_owned(self.target, &prop.property, owner, value);
        }
    }

    /// Restore start values after a seek to before this track began
    fn rewind(&mut self, store: &mut TargetStore) {
        if self.initialized {
            self.claim(store);
            self.write(store, 0.0);
        }
        self.started = false;
        self.completed = false;
    }

    fn is_overwritten(&self, store: &TargetStore) -> bool {
        let Some(owner) = self.owner else {
            return false;
        };
        self.props
            .iter()
            .all(|p| store.owner_of(self.target, &p.property) != Some(owner))
    }
}

fn span(duration: f32, repeat: i32) -> f32 {
    if duration <= 0.0 {
        0.0
    } else if repeat < 0 {
        f32::INFINITY
    } else {
        duration * (repeat as f32 + 1.0)
    }
}

/// Un-eased progress of one target `local` seconds after it started
fn progress_at(local: f32, duration: f32, repeat: i32, yoyo: bool) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    if local >= span(duration, repeat) {
        let iterations = repeat as i64 + 1;
        return if yoyo && iterations % 2 == 0 { 0.0 } else { 1.0 };
    }
    let iteration = (local / duration).floor();
    let p = ((local - iteration * duration) / duration).clamp(0.0, 1.0);
    if yoyo && (iteration as i64) % 2 == 1 {
        1.0 - p
    } else {
        p
    }
}

fn check_timing(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AnimationError::InvalidTiming { field, value })
    }
}

/// An interpolation of numeric properties over a fixed duration
#[derive(Clone, Debug)]
pub struct Tween {
    id: TweenId,
    label: Option<Arc<str>>,
    kind: TweenKind,
    targets: SmallVec<[TargetId; 8]>,
    properties: SmallVec<[PropertySpec; 4]>,
    duration: f32,
    delay: f32,
    stagger: f32,
    easing: Option<Easing>,
    /// Extra iterations after the first, -1 for endless
    repeat: i32,
    yoyo: bool,
    /// First configuration error, reported when the tween is scheduled
    error: Option<AnimationError>,

    tracks: Vec<TargetTrack>,
    started: bool,
    completed: bool,
}

impl Tween {
    fn new(kind: TweenKind, targets: impl IntoTargets, duration: f32) -> Self {
        Self {
            id: TweenId::next(),
            label: None,
            kind,
            targets: targets.into_targets(),
            properties: SmallVec::new(),
            duration,
            delay: 0.0,
            stagger: 0.0,
            easing: None,
            repeat: 0,
            yoyo: false,
            error: None,
            tracks: Vec::new(),
            started: false,
            completed: false,
        }
    }

    /// Animate targets from their live values to the given values
    pub fn to(targets: impl IntoTargets, duration: f32) -> Self {
        Self::new(TweenKind::To, targets, duration)
    }

    /// Animate targets from the given values back to their live values
    pub fn from(targets: impl IntoTargets, duration: f32) -> Self {
        Self::new(TweenKind::From, targets, duration)
    }

    /// Write values immediately when reached, skipping interpolation
    pub fn set(targets: impl IntoTargets) -> Self {
        Self::new(TweenKind::Set, targets, 0.0)
    }

    /// Empty tween that only occupies time. Useful as a timed barrier
    /// whose completion event triggers a side effect.
    pub fn barrier(duration: f32) -> Self {
        Self::new(TweenKind::To, SmallVec::<[TargetId; 8]>::new(), duration)
    }

    /// Builder: animate a property. For `to` and `set` tweens the value is
    /// the end value; for `from` tweens it is the start value.
    pub fn prop(mut self, property: Property, value: impl Into<TweenValue>) -> Self {
        let value = Some(value.into());
        let (from, to) = match self.kind {
            TweenKind::From => (value, None),
            TweenKind::To | TweenKind::Set => (None, value),
        };
        self.properties.push(PropertySpec { property, from, to });
        self
    }

    /// Builder: animate a property by a delta relative to its live value
    pub fn by(self, property: Property, delta: f32) -> Self {
        self.prop(property, TweenValue::Relative(delta))
    }

    /// Builder: animate a property between two explicit values
    pub fn from_to(
        mut self,
        property: Property,
        from: impl Into<TweenValue>,
        to: impl Into<TweenValue>,
    ) -> Self {
        self.properties.push(PropertySpec {
            property,
            from: Some(from.into()),
            to: Some(to.into()),
        });
        self
    }

    /// Builder: set the easing curve
    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Builder: set the easing curve by name.
    ///
    /// An unknown name is reported when the tween is scheduled.
    pub fn ease_named(mut self, name: &str) -> Self {
        match name.parse::<Easing>() {
            Ok(easing) => self.easing = Some(easing),
            Err(err) => {
                self.error.get_or_insert(err);
            }
        }
        self
    }

    /// Builder: wait before starting
    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = seconds;
        self
    }

    /// Builder: start target `i` `i * seconds` after the first
    pub fn stagger(mut self, seconds: f32) -> Self {
        self.stagger = seconds;
        self
    }

    /// Builder: extra iterations after the first, -1 for endless
    pub fn repeat(mut self, count: i32) -> Self {
        self.repeat = count;
        self
    }

    /// Builder: alternate direction on every other iteration
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Builder: label carried by every event this tween emits
    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(Arc::from(label));
        self
    }

    pub fn id(&self) -> TweenId {
        self.id
    }

    pub fn label_str(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn kind(&self) -> TweenKind {
        self.kind
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn easing(&self) -> Option<Easing> {
        self.easing
    }

    pub fn targets(&self) -> &[TargetId] {
        &self.targets
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Seconds from the tween's position until its last target finishes
    pub fn total_duration(&self) -> f32 {
        let staggered = self.targets.len().saturating_sub(1) as f32 * self.stagger;
        self.delay + staggered + span(self.duration, self.repeat)
    }

    /// Check the configuration, reporting the first problem found
    pub fn validate(&self) -> Result<()> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        check_timing("duration", self.duration)?;
        check_timing("delay", self.delay)?;
        check_timing("stagger", self.stagger)?;
        if self.repeat < -1 {
            return Err(AnimationError::InvalidTiming {
                field: "repeat",
                value: self.repeat as f32,
            });
        }
        if self.kind == TweenKind::Set && self.duration != 0.0 {
            return Err(AnimationError::SetWithDuration(self.duration));
        }
        Ok(())
    }

    pub(crate) fn apply_default_easing(&mut self, easing: Easing) {
        self.easing.get_or_insert(easing);
    }

    /// Same configuration with a new id and no playback state
    pub fn fresh(&self) -> Tween {
        Tween {
            id: TweenId::next(),
            tracks: Vec::new(),
            started: false,
            completed: false,
            ..self.clone()
        }
    }

    /// Whether every property this tween drives has been taken over by a
    /// later tween
    pub(crate) fn is_overwritten(&self, store: &TargetStore) -> bool {
        let mut driven = self.tracks.iter().filter(|t| !t.props.is_empty()).peekable();
        if driven.peek().is_none() || self.tracks.iter().any(|t| !t.initialized) {
            return false;
        }
        driven.all(|t| t.is_overwritten(store))
    }

    fn event(&self, kind: TweenEventKind, time: f32) -> TweenEvent {
        TweenEvent {
            tween: self.id,
            label: self.label.clone(),
            kind,
            time,
        }
    }

    /// Render the tween at `time` seconds after its position.
    ///
    /// `origin` is the root-timeline time of this tween's position and is
    /// only used to stamp events.
    pub(crate) fn render(
        &mut self,
        time: f32,
        origin: f32,
        store: &mut TargetStore,
        events: &mut Vec<TweenEvent>,
        mode: RenderMode,
    ) {
        let emit = mode == RenderMode::Play;
        let total = self.total_duration();

        if time < self.delay {
            if self.started {
                for track in self.tracks.iter_mut().rev() {
                    track.rewind(store);
                }
                self.started = false;
                self.completed = false;
            }
            return;
        }

        if emit && self.completed && time >= total {
            return;
        }

        if self.tracks.len() != self.targets.len() {
            self.tracks = self
                .targets
                .iter()
                .enumerate()
                .map(|(i, &target)| TargetTrack::new(target, i as f32 * self.stagger))
                .collect();
        }

        if !self.started {
            self.started = true;
            if emit {
                events.push(self.event(TweenEventKind::Start, origin + self.delay));
            }
        }

        let easing = self.easing.unwrap_or(FALLBACK_EASING);
        let span = span(self.duration, self.repeat);
        let mut completions = SmallVec::<[(usize, TargetId, f32); 4]>::new();

        for (index, track) in self.tracks.iter_mut().enumerate() {
            let local = time - self.delay - track.offset;
            if local < 0.0 {
                if track.started {
                    track.rewind(store);
                }
                continue;
            }

            if !track.initialized {
                track.initialize(&self.properties, store);
            }
            if !track.started || mode == RenderMode::Seek {
                track.claim(store);
            }
            track.started = true;

            let eased = match self.kind {
                TweenKind::Set => 1.0,
                _ => easing.apply(progress_at(local, self.duration, self.repeat, self.yoyo)),
            };
            track.write(store, eased);

            if local >= span {
                if !track.completed {
                    track.completed = true;
                    completions.push((index, track.target, self.delay + track.offset + span));
                }
            } else {
                track.completed = false;
            }
        }

        if emit {
            let progress = if !total.is_finite() {
                0.0
            } else if total > self.delay {
                ((time - self.delay) / (total - self.delay)).clamp(0.0, 1.0)
            } else {
                1.0
            };
            events.push(self.event(TweenEventKind::Update { progress }, origin + time));
            for (index, target, at) in completions {
                events.push(self.event(TweenEventKind::TargetComplete { index, target }, origin + at));
            }
        }

        if time >= total {
            if !self.completed {
                self.completed = true;
                if emit {
                    events.push(self.event(TweenEventKind::Complete, origin + total));
                }
            }
        } else {
            self.completed = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flyght_core::Element;

    const EPS: f32 = 1e-4;

    fn store_with(n: usize) -> (TargetStore, Vec<TargetId>) {
        let mut store = TargetStore::new();
        let ids = (0..n)
            .map(|i| store.insert(Element::new().id(format!("t{i}"))))
            .collect();
        (store, ids)
    }

    fn play(tween: &mut Tween, time: f32, store: &mut TargetStore) -> Vec<TweenEvent> {
        let mut events = Vec::new();
        tween.render(time, 0.0, store, &mut events, RenderMode::Play);
        events
    }

    fn kinds(events: &[TweenEvent]) -> Vec<&TweenEventKind> {
        events.iter().map(|e| &e.kind).collect()
    }

    #[test]
    fn test_sampling_start_middle_end() {
        let (mut store, ids) = store_with(1);
        let easing = Easing::EaseInOutCubic;
        let mut tween = Tween::to(ids[0], 2.0).prop(Property::X, 100.0).ease(easing);
        store.set(ids[0], Property::X, 20.0);

        play(&mut tween, 0.0, &mut store);
        assert!((store.get(ids[0], &Property::X).unwrap() - 20.0).abs() < EPS);

        play(&mut tween, 1.0, &mut store);
        let expected = 20.0 + easing.apply(0.5) * 80.0;
        assert!((store.get(ids[0], &Property::X).unwrap() - expected).abs() < EPS);

        play(&mut tween, 2.0, &mut store);
        assert!((store.get(ids[0], &Property::X).unwrap() - 100.0).abs() < EPS);
        assert!(tween.is_complete());
    }

    #[test]
    fn test_events_fire_once() {
        let (mut store, ids) = store_with(1);
        let mut tween = Tween::to(ids[0], 1.0).prop(Property::Opacity, 0.0);

        let first = play(&mut tween, 0.5, &mut store);
        assert_eq!(
            kinds(&first),
            vec![&TweenEventKind::Start, &TweenEventKind::Update { progress: 0.5 }]
        );

        let last = play(&mut tween, 1.2, &mut store);
        assert!(last.iter().any(|e| e.kind == TweenEventKind::Complete));
        assert!((last.last().unwrap().time - 1.0).abs() < EPS);

        assert!(play(&mut tween, 1.5, &mut store).is_empty());
    }

    #[test]
    fn test_set_is_immediate_and_synchronous() {
        let (mut store, ids) = store_with(1);
        let mut set = Tween::set(ids[0]).prop(Property::Opacity, 0.0);

        let events = play(&mut set, 0.0, &mut store);
        assert_eq!(store.get(ids[0], &Property::Opacity), Some(0.0));
        assert_eq!(events.first().unwrap().kind, TweenEventKind::Start);
        assert_eq!(events.last().unwrap().kind, TweenEventKind::Complete);
    }

    #[test]
    fn test_from_and_relative_values() {
        let (mut store, ids) = store_with(2);
        store.set(ids[0], Property::Y, 0.0);
        store.set(ids[1], Property::X, 10.0);

        let mut from = Tween::from(ids[0], 1.0)
            .prop(Property::Y, 20.0)
            .ease(Easing::Linear);
        let mut by = Tween::to(ids[1], 1.0).by(Property::X, -15.0).ease(Easing::Linear);

        play(&mut from, 0.0, &mut store);
        play(&mut by, 0.0, &mut store);
        assert_eq!(store.get(ids[0], &Property::Y), Some(20.0));

        play(&mut from, 1.0, &mut store);
        play(&mut by, 1.0, &mut store);
        assert_eq!(store.get(ids[0], &Property::Y), Some(0.0));
        assert_eq!(store.get(ids[1], &Property::X), Some(-5.0));
    }

    #[test]
    fn test_stagger_completion_times() {
        let (mut store, ids) = store_with(5);
        let mut tween = Tween::to(ids.clone(), 0.5)
            .prop(Property::Opacity, 0.0)
            .stagger(0.1);
        assert!((tween.total_duration() - 0.9).abs() < EPS);

        let mut events = Vec::new();
        let mut t = 0.0;
        while !tween.is_complete() {
            t += 1.0 / 120.0;
            events.extend(play(&mut tween, t, &mut store));
        }

        let third = events
            .iter()
            .find(|e| matches!(e.kind, TweenEventKind::TargetComplete { index: 3, .. }))
            .unwrap();
        assert!((third.time - 0.8).abs() < EPS);

        let complete = events
            .iter()
            .find(|e| e.kind == TweenEventKind::Complete)
            .unwrap();
        assert!((complete.time - 0.9).abs() < EPS);
    }

    #[test]
    fn test_repeat_with_yoyo_returns_to_start() {
        let (mut store, ids) = store_with(1);
        let mut tween = Tween::to(ids[0], 1.0)
            .prop(Property::X, 30.0)
            .ease(Easing::Linear)
            .repeat(1)
            .yoyo(true);
        assert_eq!(tween.total_duration(), 2.0);

        play(&mut tween, 1.5, &mut store);
        assert!((store.get(ids[0], &Property::X).unwrap() - 15.0).abs() < EPS);

        play(&mut tween, 2.5, &mut store);
        assert_eq!(store.get(ids[0], &Property::X), Some(0.0));
        assert!(tween.is_complete());
    }

    #[test]
    fn test_endless_repeat_never_completes() {
        let (mut store, ids) = store_with(1);
        let mut tween = Tween::to(ids[0], 1.0).prop(Property::X, 1.0).repeat(-1);
        assert!(tween.total_duration().is_infinite());
        play(&mut tween, 1_000.25, &mut store);
        assert!(!tween.is_complete());
    }

    #[test]
    fn test_validation() {
        let (_, ids) = store_with(1);
        assert!(Tween::to(ids[0], 1.0).validate().is_ok());
        assert_eq!(
            Tween::to(ids[0], -1.0).validate(),
            Err(AnimationError::InvalidTiming {
                field: "duration",
                value: -1.0
            })
        );
        assert!(Tween::to(ids[0], 1.0).stagger(f32::NAN).validate().is_err());
        assert_eq!(
            Tween::to(ids[0], 1.0).ease_named("wobble").validate(),
            Err(AnimationError::UnknownEasing("wobble".into()))
        );
    }

    #[test]
    fn test_repeat_below_endless_is_rejected() {
        let (_, ids) = store_with(1);
        assert!(Tween::to(ids[0], 1.0).repeat(-1).validate().is_ok());
        assert_eq!(
            Tween::to(ids[0], 1.0).repeat(-3).validate(),
            Err(AnimationError::InvalidTiming {
                field: "repeat",
                value: -3.0
            })
        );
    }

    #[test]
    fn test_missing_targets_are_skipped() {
        let (mut store, ids) = store_with(2);
        store.detach(ids[0]);
        let mut tween = Tween::to(ids.clone(), 1.0).prop(Property::X, 5.0);

        let events = play(&mut tween, 1.0, &mut store);
        assert_eq!(store.get(ids[1], &Property::X), Some(5.0));
        assert!(events.iter().any(|e| e.kind == TweenEventKind::Complete));
    }

    #[test]
    fn test_barrier_only_marks_time() {
        let (mut store, _) = store_with(0);
        let mut barrier = Tween::barrier(0.3).label("navigate");
        assert!(play(&mut barrier, 0.1, &mut store)
            .iter()
            .all(|e| e.kind != TweenEventKind::Complete));
        let events = play(&mut barrier, 0.3, &mut store);
        assert!(events
            .iter()
            .any(|e| e.kind == TweenEventKind::Complete && e.is_labeled("navigate")));
    }
}
