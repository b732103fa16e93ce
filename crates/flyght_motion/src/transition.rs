//! Page-exit transition
//!
//! A click launches a small plane across the page, follows it with a giant
//! sweep that wipes the content away, and finally asks the page to
//! navigate. The sequence runs at most once per page:
//!
//! ```text
//! Idle --click--> Launching --lift-off done--> Transitioning --barrier done--> Done
//! ```

use std::cell::Cell;
use std::rc::Rc;

use flyght_animation::{AnimationPreset, Easing, FrameControl, FrameInfo, Position, Timeline, Tween};
use flyght_core::{event_types, ElementLookup, Event, Property, StateMachine, TargetStore, Transition};

use crate::config::TransitionConfig;
use crate::context::{MotionContext, Viewport};
use crate::error::{MotionError, Result};
use crate::stage::Reactor;

/// Label of the lift-off tween
pub const LIFTOFF_LABEL: &str = "liftoff";
/// Label of the final barrier
pub const NAVIGATE_LABEL: &str = "navigate";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionState {
    Idle,
    Launching,
    Transitioning,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionSignal {
    Click,
    LiftoffComplete,
    SequenceComplete,
}

/// Build the exit timeline for the current viewport
pub fn transition_timeline(
    store: &TargetStore,
    viewport: &Viewport,
    config: &TransitionConfig,
) -> Result<Timeline> {
    let (vw, vh) = (viewport.width, viewport.height);
    let plane = store.select("#flyingPlane");

    let mut tl = Timeline::new();

    // Small plane enters at the right edge, nose pointing left
    tl.push(
        Tween::set(plane.clone())
            .prop(Property::Left, vw + 100.0)
            .prop(Property::Top, vh * 0.45)
            .prop(Property::XPercent, -50.0)
            .prop(Property::YPercent, -50.0)
            .prop(Property::Scale, 1.5)
            .prop(Property::Rotation, -90.0)
            .prop(Property::Opacity, 1.0),
    )?;
    tl.push(
        Tween::to(plane.clone(), config.liftoff_duration)
            .prop(Property::Left, -200.0)
            .prop(Property::Top, vh * 0.5)
            .prop(Property::Scale, 6.0)
            .ease(Easing::EaseInCubic)
            .label(LIFTOFF_LABEL),
    )?;
    tl.push(Tween::set(plane.clone()).prop(Property::Opacity, 0.0))?;
    tl.push(Tween::barrier(config.pause))?;

    // Giant sweep
    tl.push(
        Tween::set(plane.clone())
            .prop(Property::Left, vw * 1.5)
            .prop(Property::Top, vh / 2.0)
            .prop(Property::Scale, 45.0)
            .prop(Property::Opacity, 1.0),
    )?;
    tl.push(
        Tween::to(plane.clone(), config.sweep_duration)
            .prop(Property::Left, -vw * 0.5)
            .ease(Easing::EaseInOutQuad),
    )?;

    // Content wipes out under the sweep
    tl.add(
        AnimationPreset::exit_right(store.select("#heroCenter"), 0.5, 80.0)
            .ease(Easing::EaseInCubic),
        "-=0.9",
    )?;
    tl.add(
        AnimationPreset::exit_right(store.select("#manifest"), 0.4, 60.0),
        "<",
    )?;
    tl.add(AnimationPreset::fade_out(store.select(".hero-bg"), 0.4), "<+0.1")?;

    tl.add(
        Tween::set(plane).prop(Property::Opacity, 0.0),
        Position::AtEnd(0.0),
    )?;
    tl.push(Tween::barrier(config.exit_delay).label(NAVIGATE_LABEL))?;

    Ok(tl)
}

/// Click-to-leave controller
pub struct TransitionController {
    fsm: StateMachine<TransitionState, TransitionSignal>,
    latch: Rc<Cell<bool>>,
    config: TransitionConfig,
    timeline: Option<Timeline>,
    /// Set when the machine enters `Done`, taken by the next frame
    arrived: Rc<Cell<bool>>,
}

impl TransitionController {
    pub fn new(config: TransitionConfig) -> Result<Self> {
        for (field, value) in [
            ("liftoff_duration", config.liftoff_duration),
            ("pause", config.pause),
            ("sweep_duration", config.sweep_duration),
            ("exit_delay", config.exit_delay),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MotionError::Config(format!(
                    "transition.{field} must be a non-negative number of seconds, got {value}"
                )));
            }
        }

        let latch = Rc::new(Cell::new(false));
        let (guard, set) = (Rc::clone(&latch), Rc::clone(&latch));
        let arrived = Rc::new(Cell::new(false));
        let arrive = Rc::clone(&arrived);

        let fsm = StateMachine::builder(TransitionState::Idle)
            .transition(
                Transition::new(
                    TransitionState::Idle,
                    TransitionSignal::Click,
                    TransitionState::Launching,
                )
                .with_guard(move || !guard.get())
                .with_action(move || set.set(true)),
            )
            .on(
                TransitionState::Launching,
                TransitionSignal::LiftoffComplete,
                TransitionState::Transitioning,
            )
            .on(
                TransitionState::Transitioning,
                TransitionSignal::SequenceComplete,
                TransitionState::Done,
            )
            .on_enter(TransitionState::Done, move || arrive.set(true))
            .build();

        Ok(Self {
            fsm,
            latch,
            config,
            timeline: None,
            arrived,
        })
    }

    /// Controller configured from the context
    pub fn from_config(ctx: &MotionContext) -> Result<Self> {
        Self::new(ctx.config().transition.clone())
    }

    pub fn state(&self) -> TransitionState {
        self.fsm.current_state()
    }

    /// Transitions taken so far
    pub fn history(&self) -> &[(TransitionState, TransitionSignal, TransitionState)] {
        self.fsm.history()
    }

    pub fn is_latched(&self) -> bool {
        self.latch.get()
    }

    /// Handle the triggering gesture. Returns false if ignored.
    pub fn click(&mut self, ctx: &mut MotionContext) -> bool {
        if !self.fsm.can_send(TransitionSignal::Click) {
            tracing::trace!(state = ?self.state(), "transition click ignored");
            return false;
        }

        let mut timeline = match transition_timeline(ctx.store(), ctx.viewport(), &self.config) {
            Ok(timeline) => timeline,
            Err(err) => {
                tracing::warn!(%err, "transition timeline could not be built");
                return false;
            }
        };
        timeline.play();
        self.timeline = Some(timeline);
        self.fsm.send(TransitionSignal::Click);
        true
    }
}

impl Reactor for TransitionController {
    fn frame(&mut self, frame: &FrameInfo, ctx: &mut MotionContext) -> FrameControl {
        let Some(timeline) = self.timeline.as_mut() else {
            return FrameControl::Continue;
        };

        let report = timeline.tick(frame.dt, ctx.store_mut());
        if report.finished(LIFTOFF_LABEL) {
            self.fsm.send(TransitionSignal::LiftoffComplete);
        }
        if report.finished(NAVIGATE_LABEL) {
            self.fsm.send(TransitionSignal::SequenceComplete);
        }
        ctx.record(report.events);

        if self.arrived.replace(false) {
            ctx.navigate(&self.config.destination);
            return FrameControl::Stop;
        }
        FrameControl::Continue
    }

    fn event(&mut self, event: &Event, ctx: &mut MotionContext) {
        if event.is(event_types::CLICK) {
            self.click(ctx);
        }
    }
}
