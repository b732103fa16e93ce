//! Frame scheduler
//!
//! Runs per-frame callbacks against a shared context. Callbacks run in
//! registration order and unsubscribe by returning [`FrameControl::Stop`]
//! or through [`FrameScheduler::cancel`].

use slotmap::{new_key_type, SlotMap};
use std::time::Instant;

new_key_type! {
    pub struct FrameSubscription;
}

/// Timing of the frame being run
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInfo {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Seconds since the previous frame
    pub dt: f32,
    /// Seconds since the scheduler started
    pub elapsed: f32,
}

/// What a callback wants after running
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Stop,
}

pub type FrameCallback<C> = Box<dyn FnMut(&FrameInfo, &mut C) -> FrameControl>;

/// The scheduler that runs every frame callback
pub struct FrameScheduler<C> {
    callbacks: SlotMap<FrameSubscription, FrameCallback<C>>,
    order: Vec<FrameSubscription>,
    frame: u64,
    elapsed: f32,
    last_frame: Option<Instant>,
    target_fps: u32,
}

impl<C> FrameScheduler<C> {
    pub fn new() -> Self {
        Self {
            callbacks: SlotMap::with_key(),
            order: Vec::new(),
            frame: 0,
            elapsed: 0.0,
            last_frame: None,
            target_fps: 60,
        }
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps.max(1);
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Seconds per frame at the target rate
    pub fn frame_interval(&self) -> f32 {
        1.0 / self.target_fps as f32
    }

    /// Run `callback` every frame until it returns `Stop` or is cancelled
    pub fn on_frame<F>(&mut self, callback: F) -> FrameSubscription
    where
        F: FnMut(&FrameInfo, &mut C) -> FrameControl + 'static,
    {
        let id = self.callbacks.insert(Box::new(callback));
        self.order.push(id);
        id
    }

    /// Remove a callback. Returns false if it was already gone.
    pub fn cancel(&mut self, subscription: FrameSubscription) -> bool {
        self.order.retain(|&id| id != subscription);
        self.callbacks.remove(subscription).is_some()
    }

    pub fn is_active(&self, subscription: FrameSubscription) -> bool {
        self.callbacks.contains_key(subscription)
    }

    /// Number of subscribed callbacks
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Frames run so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Run one frame of `dt` seconds
    pub fn advance(&mut self, dt: f32, ctx: &mut C) -> FrameInfo {
        self.frame += 1;
        self.elapsed += dt;
        let info = FrameInfo {
            frame: self.frame,
            dt,
            elapsed: self.elapsed,
        };

        let mut stopped = Vec::new();
        for &id in &self.order {
            let Some(callback) = self.callbacks.get_mut(id) else {
                continue;
            };
            if callback(&info, &mut *ctx) == FrameControl::Stop {
                stopped.push(id);
            }
        }
        for id in stopped {
            self.cancel(id);
        }

        info
    }

    /// Run one frame timed by the wall clock
    pub fn tick(&mut self, ctx: &mut C) -> FrameInfo {
        let now = Instant::now();
        let dt = match self.last_frame {
            Some(last) => (now - last).as_secs_f32(),
            None => self.frame_interval(),
        };
        self.last_frame = Some(now);
        self.advance(dt, ctx)
    }
}

impl<C> Default for FrameScheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callbacks_run_in_registration_order() {
        let mut scheduler = FrameScheduler::<Vec<&'static str>>::new();
        scheduler.on_frame(|_, log| {
            log.push("first");
            FrameControl::Continue
        });
        scheduler.on_frame(|_, log| {
            log.push("second");
            FrameControl::Continue
        });

        let mut log = Vec::new();
        scheduler.advance(0.016, &mut log);
        scheduler.advance(0.016, &mut log);
        assert_eq!(log, vec!["first", "second", "first", "second"]);
        assert_eq!(scheduler.frame(), 2);
    }

    #[test]
    fn test_cancel_and_stop() {
        let mut scheduler = FrameScheduler::<u32>::new();
        let counting = scheduler.on_frame(|_, n| {
            *n += 1;
            FrameControl::Continue
        });
        let once = scheduler.on_frame(|_, n| {
            *n += 100;
            FrameControl::Stop
        });

        let mut n = 0;
        scheduler.advance(0.1, &mut n);
        assert_eq!(n, 101);
        assert!(!scheduler.is_active(once));

        assert!(scheduler.cancel(counting));
        assert!(!scheduler.cancel(counting));
        scheduler.advance(0.1, &mut n);
        assert_eq!(n, 101);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_frame_info() {
        let mut scheduler = FrameScheduler::<Vec<FrameInfo>>::new();
        scheduler.on_frame(|info, seen| {
            seen.push(*info);
            FrameControl::Continue
        });

        let mut seen = Vec::new();
        scheduler.advance(0.25, &mut seen);
        scheduler.advance(0.5, &mut seen);
        assert_eq!(seen[1].frame, 2);
        assert_eq!(seen[1].dt, 0.5);
        assert_eq!(seen[1].elapsed, 0.75);
    }
}
