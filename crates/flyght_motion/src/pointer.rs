//! Pointer reactors
//!
//! Continuous effects driven by the pointer, independent of any timeline:
//! a smoothed cursor, fragment parallax and the title hover shimmer.

use flyght_animation::{Easing, FrameControl, FrameInfo, Tween};
use flyght_core::{event_types, ElementLookup, Event, Property, TargetId};
use smallvec::SmallVec;

use crate::context::MotionContext;
use crate::error::Result;
use crate::stage::Reactor;

/// Speed used for fragments without a usable `--s`
const DEFAULT_PARALLAX_SPEED: f32 = 0.5;

/// An exponentially smoothed copy of the pointer position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Follower {
    pub x: f32,
    pub y: f32,
    /// Fraction of the remaining distance covered per frame
    pub smoothing: f32,
}

/// Raw pointer position plus smoothed followers
#[derive(Clone, Debug)]
pub struct PointerState {
    x: f32,
    y: f32,
    followers: SmallVec<[Follower; 2]>,
}

impl PointerState {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            followers: SmallVec::new(),
        }
    }

    /// Add a follower starting at the current position
    pub fn add_follower(&mut self, smoothing: f32) -> usize {
        self.followers.push(Follower {
            x: self.x,
            y: self.y,
            smoothing,
        });
        self.followers.len() - 1
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn follower(&self, index: usize) -> Option<(f32, f32)> {
        self.followers.get(index).map(|f| (f.x, f.y))
    }

    /// Move every follower toward the pointer. Called once per frame, so
    /// the follow speed depends on the frame rate.
    pub fn step(&mut self) {
        for f in &mut self.followers {
            f.x += (self.x - f.x) * f.smoothing;
            f.y += (self.y - f.y) * f.smoothing;
        }
    }
}

/// Cursor dot, trailing ring and glow
pub struct CursorFollow {
    dot: Option<TargetId>,
    ring: Option<TargetId>,
    glow: Option<TargetId>,
    follower: usize,
}

impl CursorFollow {
    /// Resolve `#cursor`, `.cursor-ring` and `#mouseGlow` and register a
    /// follower with the configured smoothing
    pub fn new(ctx: &mut MotionContext) -> Self {
        let smoothing = ctx.config().pointer.smoothing;
        let store = ctx.store();
        let (dot, ring, glow) = (
            store.select_one("#cursor"),
            store.select_one(".cursor-ring"),
            store.select_one("#mouseGlow"),
        );
        Self {
            dot,
            ring,
            glow,
            follower: ctx.pointer_mut().add_follower(smoothing),
        }
    }
}

impl Reactor for CursorFollow {
    fn frame(&mut self, _frame: &FrameInfo, ctx: &mut MotionContext) -> FrameControl {
        let (x, y) = ctx.pointer().position();
        let Some((sx, sy)) = ctx.pointer().follower(self.follower) else {
            return FrameControl::Stop;
        };

        let store = ctx.store_mut();
        let mut write = |target: Option<TargetId>, px: f32, py: f32| {
            if let Some(id) = target {
                store.set(id, Property::X, px);
                store.set(id, Property::Y, py);
            }
        };
        write(self.dot, x, y);
        // Ring sits inside the dot, so it is offset rather than placed
        write(self.ring, sx - x, sy - y);
        write(self.glow, sx, sy);

        FrameControl::Continue
    }
}

/// Fragments drifting against the pointer.
///
/// Every frame each fragment gets a fresh tween toward its offset. The
/// newest tween takes over x/y, so the motion redirects smoothly instead
/// of stacking.
pub struct Parallax {
    fragments: SmallVec<[TargetId; 8]>,
    factor: f32,
    duration: f32,
    easing: Easing,
}

impl Parallax {
    pub fn new(ctx: &MotionContext, selector: &str) -> Result<Self> {
        let pointer = &ctx.config().pointer;
        Ok(Self {
            fragments: ctx.store().select(selector),
            factor: pointer.parallax_factor,
            duration: pointer.parallax_duration,
            easing: pointer.parallax_ease.parse()?,
        })
    }

    /// Offset a fragment with the given speed heads toward
    pub fn offset(&self, ctx: &MotionContext, speed: f32) -> (f32, f32) {
        let (x, y) = ctx.pointer().position();
        let (cx, cy) = ctx.viewport().center();
        (
            (x - cx) * speed * self.factor,
            (y - cy) * speed * self.factor,
        )
    }
}

impl Reactor for Parallax {
    fn frame(&mut self, _frame: &FrameInfo, ctx: &mut MotionContext) -> FrameControl {
        let speed_prop = Property::custom("s");
        for &frag in &self.fragments {
            let Some(speed) = ctx.store().get(frag, &speed_prop) else {
                continue;
            };
            let speed = if speed == 0.0 { DEFAULT_PARALLAX_SPEED } else { speed };
            let (dx, dy) = self.offset(ctx, speed);

            let tween = Tween::to(frag, self.duration)
                .prop(Property::X, dx)
                .prop(Property::Y, dy)
                .ease(self.easing);
            if let Err(err) = ctx.animate(tween) {
                tracing::warn!(%err, "parallax tween rejected");
                return FrameControl::Stop;
            }
        }
        FrameControl::Continue
    }
}

/// Title letters lift on hover and spring back on leave
pub struct HoverShimmer {
    letters: SmallVec<[TargetId; 8]>,
}

impl HoverShimmer {
    pub fn new(ctx: &MotionContext, selector: &str) -> Self {
        Self {
            letters: ctx.store().select(selector),
        }
    }

    fn enter(letter: TargetId) -> [Tween; 2] {
        [
            Tween::to(letter, 0.6)
                .prop(Property::BackgroundPositionY, 100.0)
                .ease(Easing::EaseInOutCubic),
            Tween::to(letter, 0.4)
                .prop(Property::Y, -8.0)
                .ease(Easing::EaseOutQuart),
        ]
    }

    fn leave(letter: TargetId) -> [Tween; 2] {
        [
            Tween::to(letter, 0.8)
                .prop(Property::BackgroundPositionY, 0.0)
                .ease(Easing::EaseInOutCubic),
            Tween::to(letter, 0.6)
                .prop(Property::Y, 0.0)
                .ease(Easing::ElasticOut {
                    amplitude: 1.0,
                    period: 0.5,
                }),
        ]
    }
}

impl Reactor for HoverShimmer {
    fn event(&mut self, event: &Event, ctx: &mut MotionContext) {
        let Some(letter) = event.target.filter(|t| self.letters.contains(t)) else {
            return;
        };
        let tweens = match event.event_type {
            event_types::POINTER_ENTER => Self::enter(letter),
            event_types::POINTER_LEAVE => Self::leave(letter),
            _ => return,
        };
        for tween in tweens {
            if let Err(err) = ctx.animate(tween) {
                tracing::warn!(%err, "hover tween rejected");
            }
        }
    }
}
