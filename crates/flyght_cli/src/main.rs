//! FLYGHT CLI
//!
//! Runs page choreography headless at a fixed frame rate:
//!
//! - `flyght simulate <intro|film>` plays a scene to completion
//! - `flyght transition` clicks the film page and follows the exit sequence
//! - `flyght check-config <FILE>` validates a `flyght.toml`

mod config;
mod report;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use flyght_core::{Event, PageDocument};
use flyght_motion::{
    MotionConfig, MotionContext, RecordingNavigator, Scene, Stage, TransitionState, Viewport,
};
use tracing_subscriber::EnvFilter;

use crate::report::{FrameTrace, RunSummary};

/// Headless runner for FLYGHT page motion
#[derive(Parser, Debug)]
#[command(name = "flyght")]
#[command(about = "Run FLYGHT page choreography headless")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a scene's timeline to completion
    Simulate {
        #[arg(value_enum)]
        scene: SceneArg,

        #[command(flatten)]
        run: RunArgs,

        /// Write a JSON trace of per-frame property values
        #[arg(long)]
        trace: Option<PathBuf>,
    },

    /// Click the film page and run the exit transition
    Transition {
        /// Clicks delivered in the same frame
        #[arg(long, default_value = "1")]
        clicks: u32,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Load and validate a motion config file
    CheckConfig {
        /// Path to a flyght.toml
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Page document (defaults to the bundled page)
    #[arg(long)]
    page: Option<PathBuf>,

    /// Motion config (flyght.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frames per second
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..=1000))]
    fps: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SceneArg {
    Intro,
    Film,
}

impl From<SceneArg> for Scene {
    fn from(arg: SceneArg) -> Self {
        match arg {
            SceneArg::Intro => Scene::Intro,
            SceneArg::Film => Scene::Film,
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Simulate { scene, run, trace } => cmd_simulate(scene.into(), &run, trace),
        Command::Transition { clicks, run } => cmd_transition(clicks, &run),
        Command::CheckConfig { file } => cmd_check_config(file),
    }
}

fn build_stage(
    scene: Scene,
    run: &RunArgs,
    navigator: &RecordingNavigator,
) -> Result<(Stage, MotionConfig)> {
    let motion_config = config::load_config(run.config.as_deref())?;
    let page = config::load_page(run.page.as_deref(), scene)?;
    let doc = PageDocument::from_toml(&page).context("Invalid page document")?;
    let store = doc.build_store().context("Invalid page document")?;
    let viewport = Viewport::new(doc.viewport.width, doc.viewport.height);

    let ctx = MotionContext::new(store, viewport, motion_config.clone())
        .with_navigator(navigator.clone());
    Ok((Stage::new(ctx), motion_config))
}

fn cmd_simulate(scene: Scene, run: &RunArgs, trace_path: Option<PathBuf>) -> Result<()> {
    let navigator = RecordingNavigator::new();
    let (mut stage, _) = build_stage(scene, run, &navigator)?;
    let mounted = scene
        .mount(&mut stage)
        .with_context(|| format!("Failed to mount the {} scene", scene.name()))?;

    let dt = config::frame_interval(run.fps);
    // One spare second for rounding
    let frame_limit = ((mounted.duration + 1.0) / dt).ceil() as u64;

    let mut summary = RunSummary::default();
    let mut trace = trace_path
        .as_ref()
        .map(|_| FrameTrace::new(scene.name(), run.fps));

    while !mounted.completion.is_complete() {
        if summary.frames >= frame_limit {
            bail!(
                "{} scene did not complete within {frame_limit} frames",
                scene.name()
            );
        }
        let info = stage.advance(dt);
        let events = stage.ctx().frame_events();
        summary.observe(&info, events);
        if let Some(trace) = trace.as_mut() {
            trace.capture(&info, events, stage.ctx().store());
        }
    }

    println!("scene:       {}", scene.name());
    println!("duration:    {:.3}s", mounted.duration);
    println!("frames:      {} at {} fps", summary.frames, run.fps);
    println!("elapsed:     {:.3}s", summary.elapsed);
    println!("starts:      {}", summary.starts);
    println!("completions: {}", summary.completions);

    if let (Some(path), Some(trace)) = (trace_path, trace) {
        trace.write(&path)?;
    }
    Ok(())
}

fn cmd_transition(clicks: u32, run: &RunArgs) -> Result<()> {
    let navigator = RecordingNavigator::new();
    let (mut stage, motion_config) = build_stage(Scene::Film, run, &navigator)?;
    let mounted = Scene::Film
        .mount(&mut stage)
        .context("Failed to mount the film scene")?;
    let Some(controller) = mounted.transition else {
        bail!("film scene has no transition controller");
    };

    for _ in 0..clicks {
        stage.dispatch(&Event::click(0.0, 0.0));
    }

    let t = &motion_config.transition;
    let sequence = t.liftoff_duration + t.pause + t.sweep_duration + t.exit_delay;
    let dt = config::frame_interval(run.fps);
    let frame_limit = ((sequence + 1.0) / dt).ceil() as u64;

    let mut frames = 0;
    while controller.borrow().state() != TransitionState::Done && frames < frame_limit {
        stage.advance(dt);
        frames += 1;
    }

    let controller = controller.borrow();
    println!("clicks:      {clicks}");
    println!("frames:      {frames} at {} fps", run.fps);
    println!("state:       {:?}", controller.state());
    for (from, signal, to) in controller.history() {
        println!("  {from:?} --{signal:?}--> {to:?}");
    }
    let requests = navigator.requests();
    println!("navigations: {}", requests.len());
    for path in &requests {
        println!("  {path}");
    }

    if clicks > 0 && controller.state() != TransitionState::Done {
        bail!("transition did not finish within {frame_limit} frames");
    }
    Ok(())
}

fn cmd_check_config(file: PathBuf) -> Result<()> {
    let motion_config = config::load_config(Some(&file))?;
    println!("{} is valid", file.display());
    print!("{}", motion_config.to_toml()?);
    Ok(())
}
