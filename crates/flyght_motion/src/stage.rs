//! Stage
//!
//! Hosts a page's reactors on a frame scheduler. Each frame:
//!
//! 1. pointer followers are smoothed once
//! 2. mounted reactors run in mount order
//! 3. standalone tweens advance
//!
//! Input events update the context first and are then offered to every
//! reactor in mount order.

use std::cell::RefCell;
use std::rc::Rc;

use flyght_animation::{FrameControl, FrameInfo, FrameScheduler, FrameSubscription};
use flyght_core::{event_types, Event, EventData};

use crate::context::MotionContext;

/// A per-page behavior driven by frames and input events
pub trait Reactor {
    /// Run once per frame. Returning `Stop` unsubscribes from frames but
    /// keeps receiving input events.
    fn frame(&mut self, _frame: &FrameInfo, _ctx: &mut MotionContext) -> FrameControl {
        FrameControl::Continue
    }

    fn event(&mut self, _event: &Event, _ctx: &mut MotionContext) {}
}

/// Frame loop for one page
pub struct Stage {
    ctx: MotionContext,
    scheduler: FrameScheduler<MotionContext>,
    reactors: Vec<Rc<RefCell<dyn Reactor>>>,
}

impl Stage {
    pub fn new(ctx: MotionContext) -> Self {
        Self {
            ctx,
            scheduler: FrameScheduler::new(),
            reactors: Vec::new(),
        }
    }

    pub fn ctx(&self) -> &MotionContext {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut MotionContext {
        &mut self.ctx
    }

    pub fn scheduler(&self) -> &FrameScheduler<MotionContext> {
        &self.scheduler
    }

    /// Mount a reactor. The returned handle stays usable for inspection.
    pub fn mount<R: Reactor + 'static>(&mut self, reactor: R) -> Rc<RefCell<R>> {
        let shared = Rc::new(RefCell::new(reactor));
        let frame_ref = Rc::clone(&shared);
        self.scheduler
            .on_frame(move |info, ctx| frame_ref.borrow_mut().frame(info, ctx));
        self.reactors.push(shared.clone());
        shared
    }

    /// Run a plain callback every frame
    pub fn on_frame<F>(&mut self, callback: F) -> FrameSubscription
    where
        F: FnMut(&FrameInfo, &mut MotionContext) -> FrameControl + 'static,
    {
        self.scheduler.on_frame(callback)
    }

    pub fn cancel(&mut self, subscription: FrameSubscription) -> bool {
        self.scheduler.cancel(subscription)
    }

    /// Deliver an input event
    pub fn dispatch(&mut self, event: &Event) {
        match (event.event_type, event.data) {
            (event_types::POINTER_MOVE, EventData::Pointer { x, y }) => {
                self.ctx.pointer_mut().move_to(x, y);
            }
            (event_types::SCROLL, EventData::Scroll { offset_y }) => {
                self.ctx.scroll_to(offset_y);
            }
            (event_types::RESIZE, EventData::Resize { width, height }) => {
                self.ctx.set_viewport_size(width, height);
            }
            _ => {}
        }

        for reactor in &self.reactors {
            reactor.borrow_mut().event(event, &mut self.ctx);
        }
    }

    /// Run one frame of `dt` seconds
    pub fn advance(&mut self, dt: f32) -> FrameInfo {
        self.ctx.begin_frame();
        self.ctx.pointer_mut().step();
        let info = self.scheduler.advance(dt, &mut self.ctx);
        self.ctx.tick_tweens(dt);
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotionConfig;
    use crate::context::Viewport;
    use flyght_core::TargetStore;

    #[derive(Default)]
    struct Counter {
        frames: u32,
        clicks: u32,
        stop_after: u32,
    }

    impl Reactor for Counter {
        fn frame(&mut self, _frame: &FrameInfo, _ctx: &mut MotionContext) -> FrameControl {
            self.frames += 1;
            if self.frames >= self.stop_after {
                FrameControl::Stop
            } else {
                FrameControl::Continue
            }
        }

        fn event(&mut self, event: &Event, _ctx: &mut MotionContext) {
            if event.is(event_types::CLICK) {
                self.clicks += 1;
            }
        }
    }

    fn stage() -> Stage {
        Stage::new(MotionContext::new(
            TargetStore::new(),
            Viewport::new(1000.0, 800.0),
            MotionConfig::default(),
        ))
    }

    #[test]
    fn test_reactor_receives_frames_and_events() {
        let mut stage = stage();
        let counter = stage.mount(Counter {
            stop_after: 3,
            ..Default::default()
        });

        for _ in 0..5 {
            stage.advance(0.016);
        }
        stage.dispatch(&Event::click(10.0, 10.0));

        assert_eq!(counter.borrow().frames, 3);
        assert_eq!(counter.borrow().clicks, 1);
        assert!(stage.scheduler().is_empty());
    }

    #[test]
    fn test_dispatch_updates_context() {
        let mut stage = stage();
        stage.dispatch(&Event::pointer_move(100.0, 50.0));
        stage.dispatch(&Event::scroll(420.0));
        stage.dispatch(&Event::resize(1280.0, 720.0));

        assert_eq!(stage.ctx().pointer().position(), (100.0, 50.0));
        assert_eq!(stage.ctx().viewport().scroll_y, 420.0);
        assert_eq!(stage.ctx().viewport().width, 1280.0);
    }
}
