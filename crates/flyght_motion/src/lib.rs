//! FLYGHT Motion
//!
//! Page-level choreography on top of the animation crate:
//!
//! - **Stage**: a frame loop hosting per-page reactors
//! - **Pointer**: smoothed cursor, fragment parallax and hover shimmer
//! - **Scroll**: band-crossing triggers and scroll-scrubbed timelines
//! - **Transition**: the click-to-leave sequence, guarded by a state machine
//! - **Scenes**: the bundled hero intro and film page entrance
//!
//! # Example
//!
//! ```rust
//! use flyght_motion::{load_stage, MotionConfig, Scene};
//!
//! let mut stage = load_stage(Scene::Intro.page(), MotionConfig::default()).unwrap();
//! let scene = Scene::Intro.mount(&mut stage).unwrap();
//!
//! while !scene.completion.is_complete() {
//!     stage.advance(1.0 / 60.0);
//! }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod pointer;
pub mod scenes;
pub mod scroll;
pub mod stage;
pub mod transition;

pub use config::{
    IntroConfig, MotionConfig, PointerConfig, ScrollConfig, TransitionConfig, TriggerDirection,
};
pub use context::{MotionContext, Navigator, RecordingNavigator, Viewport};
pub use error::{MotionError, Result};
pub use pointer::{CursorFollow, Follower, HoverShimmer, Parallax, PointerState};
pub use scenes::{load_stage, pages, MountedScene, Scene, ScenePlayer};
pub use scroll::{ScrollReactor, ScrubId, TriggerId, TriggerOptions, TriggerState};
pub use stage::{Reactor, Stage};
pub use transition::{
    transition_timeline, TransitionController, TransitionSignal, TransitionState,
};
