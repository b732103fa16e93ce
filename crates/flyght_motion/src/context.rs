//! Motion context
//!
//! Everything a reactor may read or mutate during a frame: the element
//! store, viewport metrics, pointer state, the standalone tween engine and
//! the navigation hook. Reactors receive it by `&mut` so all mutation is
//! serialized by the frame loop.

use std::cell::RefCell;
use std::rc::Rc;

use flyght_animation::{Tween, TweenEngine, TweenEvent, TweenId};
use flyght_core::TargetStore;

use crate::config::MotionConfig;
use crate::error::Result;
use crate::pointer::PointerState;

/// Visible page area and scroll offset
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Fire-and-forget navigation requests
pub trait Navigator {
    fn navigate(&mut self, path: &str);
}

/// Navigator that records requests instead of leaving the page.
///
/// Clones share the same log, so a clone can be handed to the context while
/// the original is kept for inspection.
#[derive(Clone, Debug, Default)]
pub struct RecordingNavigator {
    requests: Rc<RefCell<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, path: &str) {
        self.requests.borrow_mut().push(path.to_string());
    }
}

/// Shared state for one page
pub struct MotionContext {
    store: TargetStore,
    viewport: Viewport,
    pointer: PointerState,
    engine: TweenEngine,
    navigator: Box<dyn Navigator>,
    config: MotionConfig,
    /// Tween events raised during the current frame
    events: Vec<TweenEvent>,
}

impl MotionContext {
    pub fn new(store: TargetStore, viewport: Viewport, config: MotionConfig) -> Self {
        let (cx, cy) = viewport.center();
        Self {
            store,
            viewport,
            pointer: PointerState::new(cx, cy),
            engine: TweenEngine::new(),
            navigator: Box::new(RecordingNavigator::new()),
            config,
            events: Vec::new(),
        }
    }

    /// Builder: route navigation requests to `navigator`
    pub fn with_navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Box::new(navigator);
        self
    }

    pub fn store(&self) -> &TargetStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TargetStore {
        &mut self.store
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    pub fn scroll_to(&mut self, offset_y: f32) {
        self.viewport.scroll_y = offset_y;
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut PointerState {
        &mut self.pointer
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn engine(&self) -> &TweenEngine {
        &self.engine
    }

    /// Start a standalone tween now
    pub fn animate(&mut self, tween: Tween) -> Result<TweenId> {
        Ok(self.engine.add(tween, &mut self.store)?)
    }

    /// Advance standalone tweens and collect their events
    pub(crate) fn tick_tweens(&mut self, dt: f32) {
        let events = self.engine.tick(dt, &mut self.store);
        self.events.extend(events);
    }

    /// Add timeline events to this frame's log
    pub fn record(&mut self, events: impl IntoIterator<Item = TweenEvent>) {
        self.events.extend(events);
    }

    /// Tween events raised during the current frame
    pub fn frame_events(&self) -> &[TweenEvent] {
        &self.events
    }

    pub(crate) fn begin_frame(&mut self) {
        self.events.clear();
    }

    /// Ask the surrounding page to navigate
    pub fn navigate(&mut self, path: &str) {
        tracing::info!(path, "navigation requested");
        self.navigator.navigate(path);
    }
}
