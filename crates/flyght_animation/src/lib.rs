//! Flyght Animation System
//!
//! Eased tweens, relative-position timelines and frame scheduling.
//!
//! # Features
//!
//! - **Easing**: power, sine, elastic, back and cubic-bezier curves, parsed from site-style names
//! - **Tweens**: `to`/`from`/`fromTo`/`set` with staggers, repeats and yoyo
//! - **Timelines**: entries placed with relative position tokens (`-=0.3`, `<`, `<+=0.1`)
//! - **Conflicts**: the latest tween on a property owns it and earlier writes are dropped
//! - **Scheduling**: ordered per-frame callbacks driven manually or by the wall clock
//!
//! # Example
//!
//! ```rust
//! use flyght_animation::{Easing, Timeline, Tween};
//! use flyght_core::{Element, Property, TargetStore};
//!
//! let mut store = TargetStore::new();
//! let title = store.insert(Element::new().id("heroTitle"));
//!
//! let mut timeline = Timeline::new().with_default_easing(Easing::EaseInOutQuart);
//! timeline.push(Tween::to(title, 1.0).prop(Property::Opacity, 0.0)).unwrap();
//! timeline.add(Tween::to(title, 0.5).prop(Property::Y, -20.0), "-=0.3").unwrap();
//!
//! let done = timeline.play();
//! while !done.is_complete() {
//!     timeline.tick(1.0 / 60.0, &mut store);
//! }
//! assert_eq!(store.get(title, &Property::Y), Some(-20.0));
//! ```

pub mod easing;
pub mod engine;
pub mod error;
pub mod position;
pub mod presets;
pub mod scheduler;
pub mod timeline;
pub mod tween;

pub use easing::{Easing, FALLBACK_EASING};
pub use engine::TweenEngine;
pub use error::{AnimationError, Result};
pub use position::{IntoPosition, Position};
pub use presets::AnimationPreset;
pub use scheduler::{FrameCallback, FrameControl, FrameInfo, FrameScheduler, FrameSubscription};
pub use timeline::{CompletionHandle, FrameReport, Timeline, TimelineEntryId, TimelineItem};
pub use tween::{IntoTargets, Tween, TweenEvent, TweenEventKind, TweenId, TweenKind, TweenValue};
