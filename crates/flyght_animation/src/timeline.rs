//! Timeline orchestration for multiple tweens
//!
//! Entries are placed once, when they are added, by resolving a
//! [`Position`] against what the timeline already holds. Later additions
//! never move earlier entries.

use std::cell::Cell;
use std::rc::Rc;

use flyght_core::TargetStore;
use slotmap::{new_key_type, SlotMap};

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::position::{IntoPosition, Position};
use crate::tween::{RenderMode, Tween, TweenEvent, TweenEventKind};

new_key_type! {
    pub struct TimelineEntryId;
}

/// Something a timeline can schedule
#[derive(Clone, Debug)]
pub enum TimelineItem {
    Tween(Tween),
    Timeline(Timeline),
}

impl From<Tween> for TimelineItem {
    fn from(tween: Tween) -> Self {
        TimelineItem::Tween(tween)
    }
}

impl From<Timeline> for TimelineItem {
    fn from(timeline: Timeline) -> Self {
        TimelineItem::Timeline(timeline)
    }
}

impl TimelineItem {
    fn total_duration(&self) -> f32 {
        match self {
            TimelineItem::Tween(tween) => tween.total_duration(),
            TimelineItem::Timeline(timeline) => timeline.duration(),
        }
    }

    fn apply_default_easing(&mut self, easing: Easing) {
        match self {
            TimelineItem::Tween(tween) => tween.apply_default_easing(easing),
            TimelineItem::Timeline(timeline) => timeline.apply_default_easing(easing),
        }
    }

    fn render(
        &mut self,
        time: f32,
        origin: f32,
        store: &mut TargetStore,
        events: &mut Vec<TweenEvent>,
        mode: RenderMode,
    ) {
        match self {
            TimelineItem::Tween(tween) => tween.render(time, origin, store, events, mode),
            TimelineItem::Timeline(timeline) => timeline.render(time, origin, store, events, mode),
        }
    }
}

/// An entry in a timeline
#[derive(Clone, Debug)]
struct TimelineEntry {
    /// Resolved start in seconds from timeline start
    start: f32,
    item: TimelineItem,
}

/// Shared flag set once a timeline finishes a forward run
#[derive(Clone, Debug, Default)]
pub struct CompletionHandle(Rc<Cell<bool>>);

impl CompletionHandle {
    pub fn is_complete(&self) -> bool {
        self.0.get()
    }

    fn mark(&self) {
        self.0.set(true);
    }
}

/// Everything that happened during one timeline frame
#[derive(Clone, Debug, Default)]
pub struct FrameReport {
    /// Tween events in entry registration order
    pub events: Vec<TweenEvent>,
    /// The timeline reached its end this frame
    pub completed: bool,
}

impl FrameReport {
    /// Events carrying the given label
    pub fn labeled<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a TweenEvent> + 'a {
        self.events.iter().filter(move |e| e.is_labeled(label))
    }

    /// Whether a tween with this label completed this frame
    pub fn finished(&self, label: &str) -> bool {
        self.labeled(label)
            .any(|e| e.kind == TweenEventKind::Complete)
    }
}

/// A timeline that orchestrates multiple tweens
#[derive(Clone, Debug)]
pub struct Timeline {
    entries: SlotMap<TimelineEntryId, TimelineEntry>,
    /// Registration order
    order: Vec<TimelineEntryId>,
    default_easing: Option<Easing>,
    /// Start and end of the most recently added entry
    previous: Option<(f32, f32)>,
    duration: f32,
    time: f32,
    playing: bool,
    completed: bool,
    completion: CompletionHandle,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            order: Vec::new(),
            default_easing: None,
            previous: None,
            duration: 0.0,
            time: 0.0,
            playing: false,
            completed: false,
            completion: CompletionHandle::default(),
        }
    }

    /// Builder: easing for entries that don't name their own
    pub fn with_default_easing(mut self, easing: Easing) -> Self {
        self.default_easing = Some(easing);
        self
    }

    /// Set the default easing. Only affects entries added afterwards.
    pub fn set_default_easing(&mut self, easing: Easing) {
        self.default_easing = Some(easing);
    }

    /// Give every entry added so far that names no easing `easing`
    pub fn with_fallback_easing(mut self, easing: Easing) -> Self {
        self.apply_default_easing(easing);
        self
    }

    fn apply_default_easing(&mut self, easing: Easing) {
        for entry in self.entries.values_mut() {
            entry.item.apply_default_easing(easing);
        }
    }

    /// Add a tween, set or nested timeline at a position.
    ///
    /// The position is resolved against the entries added so far. A
    /// position resolving before 0 is clamped to 0.
    pub fn add(
        &mut self,
        item: impl Into<TimelineItem>,
        position: impl IntoPosition,
    ) -> Result<TimelineEntryId> {
        let position = position.into_position()?;
        let mut item = item.into();
        if let TimelineItem::Tween(tween) = &item {
            tween.validate()?;
        }
        if let Some(easing) = self.default_easing {
            item.apply_default_easing(easing);
        }

        let mut start = position.resolve(self.previous, self.duration);
        if !start.is_finite() {
            return Err(AnimationError::InvalidTiming {
                field: "position",
                value: start,
            });
        }
        if start < 0.0 {
            tracing::debug!(?position, resolved = start, "timeline position clamped to 0");
            start = 0.0;
        }

        let end = start + item.total_duration();
        self.previous = Some((start, end));
        self.duration = self.duration.max(end);

        let id = self.entries.insert(TimelineEntry { start, item });
        self.order.push(id);
        Ok(id)
    }

    /// Add an entry after everything added so far
    pub fn push(&mut self, item: impl Into<TimelineItem>) -> Result<TimelineEntryId> {
        self.add(item, Position::default())
    }

    /// Resolved start of an entry
    pub fn start_of(&self, id: TimelineEntryId) -> Option<f32> {
        self.entries.get(id).map(|e| e.start)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Latest end of any entry
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Current cursor in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Cursor as a fraction of the duration
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 && self.duration.is_finite() {
            (self.time / self.duration).clamp(0.0, 1.0)
        } else if self.completed {
            1.0
        } else {
            0.0
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Start or resume frame-driven playback
    pub fn play(&mut self) -> CompletionHandle {
        self.playing = true;
        self.completion.clone()
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Rewind to 0 and play again with a fresh completion handle
    pub fn restart(&mut self, store: &mut TargetStore) -> CompletionHandle {
        self.seek(0.0, store);
        self.completion = CompletionHandle::default();
        self.play()
    }

    /// Jump the cursor to `time` without emitting events.
    ///
    /// Every entry re-derives its value for the new time. Jumping backwards
    /// restores start values in reverse registration order.
    pub fn seek(&mut self, time: f32, store: &mut TargetStore) {
        let time = time.clamp(0.0, self.duration);
        let mut silent = Vec::new();
        self.render(time, 0.0, store, &mut silent, RenderMode::Seek);
        self.completed = time >= self.duration;
    }

    /// Seek to a fraction of the duration
    pub fn seek_progress(&mut self, fraction: f32, store: &mut TargetStore) {
        if !self.duration.is_finite() {
            tracing::debug!("cannot seek an endless timeline by progress");
            return;
        }
        self.seek(fraction.clamp(0.0, 1.0) * self.duration, store);
    }

    /// Advance the cursor by `dt` seconds and render
    pub fn tick(&mut self, dt: f32, store: &mut TargetStore) -> FrameReport {
        let mut report = FrameReport::default();
        if !self.playing {
            return report;
        }

        let time = (self.time + dt.max(0.0)).min(self.duration);
        self.render(time, 0.0, store, &mut report.events, RenderMode::Play);

        if time >= self.duration && !self.completed {
            self.completed = true;
            self.playing = false;
            self.completion.mark();
            report.completed = true;
            tracing::debug!(duration = self.duration, "timeline complete");
        }
        report
    }

    pub(crate) fn render(
        &mut self,
        time: f32,
        origin: f32,
        store: &mut TargetStore,
        events: &mut Vec<TweenEvent>,
        mode: RenderMode,
    ) {
        let backward = time < self.time;
        self.time = time;

        let mut render_entry = |id: TimelineEntryId| {
            if let Some(entry) = self.entries.get_mut(id) {
                entry
                    .item
                    .render(time - entry.start, origin + entry.start, store, events, mode);
            }
        };

        if backward {
            self.order.iter().rev().copied().for_each(&mut render_entry);
        } else {
            self.order.iter().copied().for_each(&mut render_entry);
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flyght_core::{Element, Property, TargetId};

    const EPS: f32 = 1e-4;

    fn setup() -> (TargetStore, TargetId) {
        let mut store = TargetStore::new();
        let id = store.insert(Element::new().id("plane"));
        (store, id)
    }

    #[test]
    fn test_relative_positions() {
        let (_, id) = setup();
        let mut tl = Timeline::new();
        let first = tl.add(Tween::to(id, 1.0).prop(Property::X, 1.0), 0.0).unwrap();
        let overlap = tl.add(Tween::to(id, 0.5).prop(Property::Y, 1.0), "-=0.3").unwrap();
        let alongside = tl.add(Tween::to(id, 0.2).prop(Property::Opacity, 0.0), "<").unwrap();

        assert_eq!(tl.start_of(first), Some(0.0));
        assert!((tl.start_of(overlap).unwrap() - 0.7).abs() < EPS);
        assert!((tl.start_of(alongside).unwrap() - 0.7).abs() < EPS);
        assert!((tl.duration() - 1.2).abs() < EPS);
    }

    #[test]
    fn test_negative_positions_clamp_to_zero() {
        let (_, id) = setup();
        let mut tl = Timeline::new();
        let entry = tl.add(Tween::to(id, 0.2).prop(Property::X, 1.0), "-=1").unwrap();
        assert_eq!(tl.start_of(entry), Some(0.0));
    }

    #[test]
    fn test_malformed_position_is_rejected() {
        let (_, id) = setup();
        let mut tl = Timeline::new();
        assert_eq!(
            tl.add(Tween::to(id, 1.0), "soon"),
            Err(AnimationError::MalformedPosition("soon".into()))
        );
        assert!(tl.is_empty());
    }

    #[test]
    fn test_default_easing_applies_to_unnamed_entries() {
        let (_, id) = setup();
        let mut tl = Timeline::new().with_default_easing(Easing::EaseInOutQuart);
        tl.push(Tween::to(id, 1.0)).unwrap();
        tl.push(Tween::to(id, 1.0).ease(Easing::Linear)).unwrap();

        let easings: Vec<_> = tl
            .order
            .iter()
            .map(|&e| match &tl.entries[e].item {
                TimelineItem::Tween(t) => t.easing(),
                TimelineItem::Timeline(_) => None,
            })
            .collect();
        assert_eq!(easings, vec![Some(Easing::EaseInOutQuart), Some(Easing::Linear)]);
    }

    #[test]
    fn test_complete_fires_once_per_run() {
        let (mut store, id) = setup();
        let mut tl = Timeline::new();
        tl.push(Tween::to(id, 0.5).prop(Property::X, 10.0)).unwrap();
        let handle = tl.play();

        let mut completions = 0;
        for _ in 0..60 {
            if tl.tick(1.0 / 60.0, &mut store).completed {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert!(handle.is_complete());
        assert_eq!(store.get(id, &Property::X), Some(10.0));

        let again = tl.restart(&mut store);
        assert!(!again.is_complete());
        assert_eq!(store.get(id, &Property::X), Some(0.0));
    }

    #[test]
    fn test_identical_starts_share_a_frame() {
        let (mut store, id) = setup();
        let other = store.insert(Element::new());
        let mut tl = Timeline::new();
        tl.add(Tween::to(id, 1.0).prop(Property::X, 1.0), 0.5).unwrap();
        tl.add(Tween::to(other, 1.0).prop(Property::X, 1.0), "<").unwrap();
        tl.play();

        tl.tick(0.45, &mut store);
        let report = tl.tick(0.1, &mut store);
        let starts = report
            .events
            .iter()
            .filter(|e| e.kind == TweenEventKind::Start)
            .count();
        assert_eq!(starts, 2);
    }

    #[test]
    fn test_nested_timeline() {
        let (mut store, id) = setup();
        let mut inner = Timeline::new();
        inner.push(Tween::to(id, 0.5).prop(Property::Y, 5.0).label("inner")).unwrap();

        let mut outer = Timeline::new();
        outer.push(Tween::to(id, 1.0).prop(Property::X, 1.0)).unwrap();
        outer.push(inner).unwrap();
        assert!((outer.duration() - 1.5).abs() < EPS);

        outer.play();
        let mut finished_at = None;
        for _ in 0..100 {
            let report = outer.tick(0.02, &mut store);
            if let Some(event) = report
                .labeled("inner")
                .find(|e| e.kind == TweenEventKind::Complete)
            {
                finished_at = Some(event.time);
            };
        }
        assert!((finished_at.unwrap() - 1.5).abs() < EPS);
    }
}
