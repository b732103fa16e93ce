//! Scenes
//!
//! Ready-made page choreography. A scene mounts its timeline and reactors
//! on a [`Stage`] built from one of the bundled page documents.

pub mod film;
pub mod intro;

use std::cell::RefCell;
use std::rc::Rc;

use flyght_animation::{CompletionHandle, FrameControl, FrameInfo, Timeline, TweenEvent};
use flyght_core::{ElementLookup, PageDocument};

use crate::config::MotionConfig;
use crate::context::{MotionContext, Viewport};
use crate::error::Result;
use crate::pointer::{CursorFollow, HoverShimmer, Parallax};
use crate::scroll::ScrollReactor;
use crate::stage::{Reactor, Stage};
use crate::transition::TransitionController;

pub use film::{entrance_timeline, register_reveals};
pub use intro::{ambient_loops, counter_readout, intro_timeline};

/// Bundled page documents
pub mod pages {
    /// Landing page with the intro sequence
    pub const HERO: &str = include_str!("../../pages/hero.toml");
    /// Film detail page
    pub const FILM: &str = include_str!("../../pages/film.toml");
}

/// The bundled scenes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scene {
    Intro,
    Film,
}

impl Scene {
    pub fn name(self) -> &'static str {
        match self {
            Scene::Intro => "intro",
            Scene::Film => "film",
        }
    }

    /// Page document the scene was written against
    pub fn page(self) -> &'static str {
        match self {
            Scene::Intro => pages::HERO,
            Scene::Film => pages::FILM,
        }
    }

    /// Mount this scene on `stage`
    pub fn mount(self, stage: &mut Stage) -> Result<MountedScene> {
        match self {
            Scene::Intro => mount_intro(stage),
            Scene::Film => mount_film(stage),
        }
    }
}

/// Parse a page document and build a stage for it
pub fn load_stage(page: &str, config: MotionConfig) -> Result<Stage> {
    let doc = PageDocument::from_toml(page)?;
    let store = doc.build_store()?;
    let viewport = Viewport::new(doc.viewport.width, doc.viewport.height);
    Ok(Stage::new(MotionContext::new(store, viewport, config)))
}

/// Callback offered every event a scene timeline raises
pub type EventObserver = Box<dyn FnMut(&TweenEvent, &mut MotionContext)>;

/// Plays one timeline to completion, one frame at a time
pub struct ScenePlayer {
    timeline: Timeline,
    completion: CompletionHandle,
    observers: Vec<EventObserver>,
}

impl ScenePlayer {
    pub fn new(mut timeline: Timeline) -> Self {
        let completion = timeline.play();
        Self {
            timeline,
            completion,
            observers: Vec::new(),
        }
    }

    /// Builder: observe timeline events
    pub fn observe(mut self, observer: impl FnMut(&TweenEvent, &mut MotionContext) + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn completion(&self) -> CompletionHandle {
        self.completion.clone()
    }
}

impl Reactor for ScenePlayer {
    fn frame(&mut self, frame: &FrameInfo, ctx: &mut MotionContext) -> FrameControl {
        let report = self.timeline.tick(frame.dt, ctx.store_mut());
        for event in &report.events {
            for observer in &mut self.observers {
                observer(event, ctx);
            }
        }
        let completed = report.completed;
        ctx.record(report.events);

        if completed {
            FrameControl::Stop
        } else {
            FrameControl::Continue
        }
    }
}

/// Handles to a mounted scene
pub struct MountedScene {
    /// Set once the scene timeline has played through
    pub completion: CompletionHandle,
    /// Length of the scene timeline in seconds
    pub duration: f32,
    /// Present for scenes that can leave the page
    pub transition: Option<Rc<RefCell<TransitionController>>>,
    pub scroll: Option<Rc<RefCell<ScrollReactor>>>,
}

/// Hero intro plus cursor, parallax, shimmer and ambient loops
pub fn mount_intro(stage: &mut Stage) -> Result<MountedScene> {
    let timeline = intro_timeline(stage.ctx().store(), &stage.ctx().config().intro)?;
    let duration = timeline.duration();

    let mut player = ScenePlayer::new(timeline);
    if let Some(counter) = stage.ctx().store().select_one(".intro-counter-num") {
        player = player.observe(counter_readout(counter));
    }
    let completion = player.completion();

    let cursor = CursorFollow::new(stage.ctx_mut());
    let parallax = Parallax::new(stage.ctx(), ".frag")?;
    let shimmer = HoverShimmer::new(stage.ctx(), ".title-letter");

    stage.mount(player);
    stage.mount(cursor);
    stage.mount(parallax);
    stage.mount(shimmer);

    for tween in ambient_loops(stage.ctx().store()) {
        stage.ctx_mut().animate(tween)?;
    }

    tracing::info!(scene = "intro", duration, "scene mounted");
    Ok(MountedScene {
        completion,
        duration,
        transition: None,
        scroll: None,
    })
}

/// Film entrance, scroll reveals and the click-to-leave transition
pub fn mount_film(stage: &mut Stage) -> Result<MountedScene> {
    let timeline = entrance_timeline(stage.ctx().store(), stage.ctx().viewport())?;
    let duration = timeline.duration();
    let player = ScenePlayer::new(timeline);
    let completion = player.completion();

    let mut scroll = ScrollReactor::from_config(stage.ctx());
    register_reveals(stage.ctx_mut(), &mut scroll)?;
    let transition = TransitionController::from_config(stage.ctx())?;

    stage.mount(player);
    let scroll = stage.mount(scroll);
    let transition = stage.mount(transition);

    tracing::info!(scene = "film", duration, "scene mounted");
    Ok(MountedScene {
        completion,
        duration,
        transition: Some(transition),
        scroll: Some(scroll),
    })
}
