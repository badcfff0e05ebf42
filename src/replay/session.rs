use std::rc::Rc;

use crate::container::StickyContainer;
use crate::events::EventKind;
use crate::events::viewport::Viewport;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::StickyResult;
use crate::frame::scheduler::FrameLoop;
use crate::host::scene::{BODY, Scene};
use crate::replay::scenario::{Scenario, Step};
use crate::replay::sink::{FrameRecord, FrameSink, SinkConfig};
use crate::sticky::element::{Sticky, StickyNodes};
use crate::sticky::state::StickyState;

/// Options controlling what a [`ReplaySession`] records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayOpts {
    /// Only record a sticky element when its state differs from the last recorded one
    /// (the default state counts as recorded before the first tick).
    pub changes_only: bool,
}

/// Replay statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Ticks executed.
    pub frames: u64,
    /// Records pushed into the sink.
    pub records: u64,
    /// Frame callbacks that ran (container broadcasts).
    pub broadcasts: u64,
}

struct MountedSticky {
    name: String,
    element: Sticky,
    last_recorded: StickyState,
}

/// Drives one [`Scenario`] against an in-memory scene.
pub struct ReplaySession {
    fps: Fps,
    scene: Scene,
    viewport: Viewport,
    frames: FrameLoop,
    stickies: Vec<MountedSticky>,
    container: StickyContainer,
    steps: Vec<Step>,
    opts: ReplayOpts,
}

impl std::fmt::Debug for ReplaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplaySession")
            .field("fps", &self.fps)
            .field("frame", &self.frames.frame())
            .field("container", &self.container)
            .field("stickies", &self.stickies.len())
            .field("steps", &self.steps.len())
            .finish()
    }
}

impl ReplaySession {
    /// Validate `scenario` and mount its container and sticky elements.
    #[tracing::instrument(skip_all, fields(stickies = scenario.stickies.len(), steps = scenario.steps.len()))]
    pub fn new(scenario: Scenario, opts: ReplayOpts) -> StickyResult<Self> {
        scenario.validate()?;
        let Scenario {
            fps,
            scene,
            container,
            stickies,
            steps,
        } = scenario;

        let viewport = Viewport::new();
        let frames = FrameLoop::new();
        let container = StickyContainer::mount(container, &viewport, Rc::new(frames.clone()));
        let stickies = stickies
            .into_iter()
            .map(|def| {
                let nodes = StickyNodes {
                    placeholder: def.placeholder,
                    content: def.content,
                };
                let element = Sticky::mount(Some(container.handle()), nodes, def.config)?;
                Ok(MountedSticky {
                    name: def.name,
                    element,
                    last_recorded: StickyState::default(),
                })
            })
            .collect::<StickyResult<Vec<_>>>()?;

        Ok(Self {
            fps,
            scene,
            viewport,
            frames,
            stickies,
            container,
            steps,
            opts,
        })
    }

    /// The current scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Index of the next tick.
    pub fn frame(&self) -> FrameIndex {
        self.frames.frame()
    }

    /// Latest state of the sticky element called `name`.
    pub fn state(&self, name: &str) -> Option<StickyState> {
        self.stickies
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.element.state())
    }

    /// Apply every scenario step, streaming records into `sink`.
    #[tracing::instrument(skip_all, fields(steps = self.steps.len()))]
    pub fn run(mut self, sink: &mut dyn FrameSink) -> StickyResult<ReplayStats> {
        sink.begin(SinkConfig {
            fps: self.fps,
            stickies: self.stickies.iter().map(|s| s.name.clone()).collect(),
        })?;

        let mut stats = ReplayStats::default();
        let steps = std::mem::take(&mut self.steps);
        for step in &steps {
            self.apply(step, sink, &mut stats)?;
        }
        sink.end()?;

        tracing::debug!(
            frames = stats.frames,
            records = stats.records,
            broadcasts = stats.broadcasts,
            "replay finished"
        );
        Ok(stats)
    }

    fn apply(
        &mut self,
        step: &Step,
        sink: &mut dyn FrameSink,
        stats: &mut ReplayStats,
    ) -> StickyResult<()> {
        tracing::trace!(?step, "apply step");
        match step {
            Step::ScrollWindow { y } => {
                self.scene.set_window_scroll(*y);
                self.viewport.dispatch(EventKind::Scroll);
            }
            Step::ScrollNode { node, y } => {
                self.scene.set_scroll_top(*node, *y)?;
                if *node == self.container.node() {
                    self.container.dispatch(EventKind::Scroll);
                } else if *node == BODY {
                    self.viewport.dispatch(EventKind::Scroll);
                }
            }
            Step::Event { kind } => {
                self.viewport.dispatch(*kind);
            }
            Step::ContainerEvent { kind } => self.container.dispatch(*kind),
            Step::SetHidden { node, hidden } => self.scene.set_hidden(*node, *hidden)?,
            Step::ResizeNode { node, rect } => self.scene.set_rect(*node, *rect)?,
            Step::AdvanceFrames { count } => {
                for _ in 0..*count {
                    self.tick(sink, stats)?;
                }
            }
        }
        Ok(())
    }

    fn tick(&mut self, sink: &mut dyn FrameSink, stats: &mut ReplayStats) -> StickyResult<()> {
        let frame = self.frames.frame();
        stats.broadcasts += self.frames.run_frame(&self.scene) as u64;
        stats.frames += 1;

        let time_secs = self.fps.frame_to_secs(frame);
        for mounted in &mut self.stickies {
            let state = mounted.element.state();
            if self.opts.changes_only && state == mounted.last_recorded {
                continue;
            }
            let record = FrameRecord {
                frame,
                time_secs,
                sticky: mounted.name.clone(),
                placeholder: mounted.element.placeholder_style(),
                css: state.style.to_css(),
                state: state.clone(),
            };
            sink.push_frame(&record)?;
            mounted.last_recorded = state;
            stats.records += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/replay/session.rs"]
mod tests;
