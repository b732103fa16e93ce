//! Scroll reactor
//!
//! Two kinds of registration:
//!
//! - **Triggers** watch an element's top edge against a band at
//!   `trigger_band * viewport height` and fire a tween when it crosses in a
//!   configured direction. By default a trigger fires once and never again.
//! - **Scrubs** map the scroll offset inside `[start, end]` linearly onto a
//!   timeline's progress.
//!
//! A registration whose element leaves the page goes permanently inert.

use flyght_animation::{Easing, FrameControl, FrameInfo, Timeline, Tween};
use flyght_core::TargetId;

use crate::config::TriggerDirection;
use crate::context::MotionContext;
use crate::error::{MotionError, Result};
use crate::stage::Reactor;

/// Where an element's top edge sits relative to the trigger band
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Below,
    /// At or above the band line
    Above,
}

/// Lifecycle of a trigger
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerState {
    Armed,
    /// Fired with play-once semantics
    Spent,
    /// Element is gone
    Inert,
}

/// Options for a scroll trigger
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerOptions {
    pub direction: TriggerDirection,
    pub once: bool,
}

impl Default for TriggerOptions {
    fn default() -> Self {
        Self {
            direction: TriggerDirection::Forward,
            once: true,
        }
    }
}

#[derive(Debug)]
struct ScrollTrigger {
    target: TargetId,
    /// Template; each firing starts a fresh copy
    tween: Tween,
    options: TriggerOptions,
    state: TriggerState,
    side: Option<Side>,
    fired: u32,
}

#[derive(Debug)]
struct ScrubBinding {
    start: f32,
    end: f32,
    timeline: Timeline,
    /// Element whose removal disables the scrub
    anchor: Option<TargetId>,
    progress: Option<f32>,
    inert: bool,
}

/// Handle to a trigger registration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TriggerId(usize);

/// Handle to a scrub registration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScrubId(usize);

/// Watches scroll position and drives triggers and scrubs
#[derive(Debug)]
pub struct ScrollReactor {
    /// Band position as a fraction of viewport height
    band: f32,
    triggers: Vec<ScrollTrigger>,
    scrubs: Vec<ScrubBinding>,
}

impl ScrollReactor {
    pub fn new(band: f32) -> Self {
        Self {
            band,
            triggers: Vec::new(),
            scrubs: Vec::new(),
        }
    }

    /// Band taken from the scroll config
    pub fn from_config(ctx: &MotionContext) -> Self {
        Self::new(ctx.config().scroll.trigger_band)
    }

    /// Fire `tween` when `target` crosses the band
    pub fn trigger(
        &mut self,
        target: TargetId,
        tween: Tween,
        options: TriggerOptions,
    ) -> Result<TriggerId> {
        tween.validate()?;
        self.triggers.push(ScrollTrigger {
            target,
            tween,
            options,
            state: TriggerState::Armed,
            side: None,
            fired: 0,
        });
        Ok(TriggerId(self.triggers.len() - 1))
    }

    /// Map scroll offsets in `[start, end]` onto `timeline` progress.
    ///
    /// Entries that name no easing are scrubbed linearly.
    pub fn scrub(
        &mut self,
        timeline: Timeline,
        start: f32,
        end: f32,
        anchor: Option<TargetId>,
    ) -> Result<ScrubId> {
        if !(start.is_finite() && end.is_finite() && end > start) {
            return Err(MotionError::Config(format!(
                "scrub range must be increasing, got {start}..{end}"
            )));
        }
        self.scrubs.push(ScrubBinding {
            start,
            end,
            timeline: timeline.with_fallback_easing(Easing::Linear),
            anchor,
            progress: None,
            inert: false,
        });
        Ok(ScrubId(self.scrubs.len() - 1))
    }

    pub fn trigger_state(&self, id: TriggerId) -> Option<TriggerState> {
        self.triggers.get(id.0).map(|t| t.state)
    }

    /// How many times a trigger has fired
    pub fn fire_count(&self, id: TriggerId) -> u32 {
        self.triggers.get(id.0).map_or(0, |t| t.fired)
    }

    pub fn scrub_timeline(&self, id: ScrubId) -> Option<&Timeline> {
        self.scrubs.get(id.0).map(|s| &s.timeline)
    }

    fn update_triggers(&mut self, ctx: &mut MotionContext) {
        let line = self.band * ctx.viewport().height;
        let scroll_y = ctx.viewport().scroll_y;

        for trigger in &mut self.triggers {
            if trigger.state == TriggerState::Inert {
                continue;
            }
            if !ctx.store().is_attached(trigger.target) {
                trigger.state = TriggerState::Inert;
                tracing::debug!(element = ?trigger.target, "scroll trigger inert");
                continue;
            }
            let Some(bounds) = ctx.store().bounds(trigger.target) else {
                continue;
            };

            let side = if bounds.top() - scroll_y <= line {
                Side::Above
            } else {
                Side::Below
            };
            let crossing = match (trigger.side, side) {
                // Already past the band when first seen
                (None, Side::Above) | (Some(Side::Below), Side::Above) => {
                    Some(TriggerDirection::Forward)
                }
                (Some(Side::Above), Side::Below) => Some(TriggerDirection::Backward),
                _ => None,
            };
            trigger.side = Some(side);

            let Some(crossing) = crossing else { continue };
            if trigger.state != TriggerState::Armed || !trigger.options.direction.accepts(crossing)
            {
                continue;
            }

            match ctx.animate(trigger.tween.fresh()) {
                Ok(_) => {
                    trigger.fired += 1;
                    tracing::debug!(element = ?trigger.target, ?crossing, "scroll trigger fired");
                    if trigger.options.once {
                        trigger.state = TriggerState::Spent;
                    }
                }
                Err(err) => tracing::warn!(%err, "scroll trigger tween rejected"),
            }
        }
    }

    fn update_scrubs(&mut self, ctx: &mut MotionContext) {
        let scroll_y = ctx.viewport().scroll_y;

        for scrub in &mut self.scrubs {
            if scrub.inert {
                continue;
            }
            if scrub.anchor.is_some_and(|a| !ctx.store().is_attached(a)) {
                scrub.inert = true;
                tracing::debug!("scroll scrub inert");
                continue;
            }

            let progress = ((scroll_y - scrub.start) / (scrub.end - scrub.start)).clamp(0.0, 1.0);
            if scrub.progress != Some(progress) {
                scrub.progress = Some(progress);
                scrub.timeline.seek_progress(progress, ctx.store_mut());
            }
        }
    }
}

impl Reactor for ScrollReactor {
    fn frame(&mut self, _frame: &FrameInfo, ctx: &mut MotionContext) -> FrameControl {
        self.update_triggers(ctx);
        self.update_scrubs(ctx);
        FrameControl::Continue
    }
}
