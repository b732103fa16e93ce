//! Run summaries and JSON frame traces

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use flyght_animation::{FrameInfo, TweenEvent, TweenEventKind};
use flyght_core::{TargetSnapshot, TargetStore};
use serde::Serialize;

/// Counts gathered while a scene runs
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub elapsed: f32,
    pub starts: usize,
    pub completions: usize,
}

impl RunSummary {
    pub fn observe(&mut self, info: &FrameInfo, events: &[TweenEvent]) {
        self.frames = info.frame;
        self.elapsed = info.elapsed;
        for event in events {
            match event.kind {
                TweenEventKind::Start => self.starts += 1,
                TweenEventKind::Complete => self.completions += 1,
                _ => {}
            }
        }
    }
}

/// One frame of a trace
#[derive(Clone, Debug, Serialize)]
pub struct FrameSample {
    pub frame: u64,
    pub elapsed: f32,
    pub events: usize,
    pub targets: Vec<TargetSnapshot>,
}

/// Per-frame property snapshots of a whole run
#[derive(Clone, Debug, Serialize)]
pub struct FrameTrace {
    pub scene: String,
    pub fps: u32,
    pub frames: Vec<FrameSample>,
}

impl FrameTrace {
    pub fn new(scene: &str, fps: u32) -> Self {
        Self {
            scene: scene.to_string(),
            fps,
            frames: Vec::new(),
        }
    }

    pub fn capture(&mut self, info: &FrameInfo, events: &[TweenEvent], store: &TargetStore) {
        self.frames.push(FrameSample {
            frame: info.frame,
            elapsed: info.elapsed,
            events: events.len(),
            targets: store.snapshot(),
        });
    }

    /// Write the trace as pretty JSON
    pub fn write(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create trace file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("Failed to write trace {}", path.display()))?;
        tracing::info!(path = %path.display(), frames = self.frames.len(), "trace written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flyght_animation::{Tween, TweenEngine};
    use flyght_core::{Element, Property};

    #[test]
    fn test_summary_counts_boundaries() {
        let mut store = TargetStore::new();
        let a = store.insert(Element::new());
        let b = store.insert(Element::new());

        let mut engine = TweenEngine::new();
        engine
            .add(Tween::to(a, 0.1).prop(Property::Opacity, 0.0), &mut store)
            .unwrap();
        engine
            .add(Tween::to(b, 1.0).prop(Property::Opacity, 0.0), &mut store)
            .unwrap();
        let events = engine.tick(0.3, &mut store);

        let mut summary = RunSummary::default();
        let info = FrameInfo {
            frame: 3,
            dt: 0.1,
            elapsed: 0.3,
        };
        summary.observe(&info, &events);
        assert_eq!(summary.starts, 2);
        assert_eq!(summary.completions, 1);
        assert_eq!(summary.frames, 3);
    }

    #[test]
    fn test_trace_serializes_snapshots() {
        let mut store = TargetStore::new();
        store.insert(Element::new().id("heroTitle").prop(Property::Opacity, 0.5));

        let mut trace = FrameTrace::new("intro", 60);
        trace.capture(&FrameInfo::default(), &[], &store);

        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["scene"], "intro");
        assert_eq!(json["frames"][0]["targets"][0]["element_id"], "heroTitle");
        assert_eq!(json["frames"][0]["targets"][0]["properties"]["opacity"], 0.5);
    }
}
