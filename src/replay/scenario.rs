use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::events::EventKind;
use crate::foundation::core::{Fps, NodeId, Rect};
use crate::foundation::error::{StickyError, StickyResult};
use crate::host::scene::Scene;
use crate::sticky::config::StickyConfig;

/// A replayable description of one container and its sticky elements.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Tick rate; only affects the timestamps of emitted records.
    #[serde(default)]
    pub fps: Fps,
    /// Initial document.
    pub scene: Scene,
    /// Node the container is mounted on.
    pub container: NodeId,
    /// Sticky elements, mounted in order.
    #[serde(default)]
    pub stickies: Vec<StickyDef>,
    /// Steps applied in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One named sticky element of a [`Scenario`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StickyDef {
    /// Unique name, copied into every record.
    pub name: String,
    /// Placeholder node.
    pub placeholder: NodeId,
    /// Content node.
    pub content: NodeId,
    /// Element options.
    #[serde(default)]
    pub config: StickyConfig,
}

/// One scenario step.
///
/// Scrolling steps dispatch the matching scroll event; layout steps (`set_hidden`,
/// `resize_node`) change the scene silently, like a host re-layout without motion.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    /// Scroll the window and dispatch a viewport `scroll`.
    ScrollWindow {
        /// Target scroll position.
        y: f64,
    },
    /// Scroll a node's content. Dispatches `scroll` on the container when `node` is the
    /// container, on the viewport when it is the body, and nothing otherwise.
    ScrollNode {
        /// Scrolled node.
        node: NodeId,
        /// Target scroll position.
        y: f64,
    },
    /// Dispatch a viewport event.
    Event {
        /// Event kind.
        kind: EventKind,
    },
    /// Dispatch an event on the container node.
    ContainerEvent {
        /// Event kind.
        kind: EventKind,
    },
    /// Show or hide a node.
    SetHidden {
        /// Target node.
        node: NodeId,
        /// New visibility.
        hidden: bool,
    },
    /// Replace a node's layout box.
    ResizeNode {
        /// Target node.
        node: NodeId,
        /// New box in document coordinates.
        rect: Rect,
    },
    /// Run `count` ticks, recording after each.
    AdvanceFrames {
        /// Number of ticks.
        count: u64,
    },
}

impl Scenario {
    /// Parse a scenario from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> StickyResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| StickyError::serde(format!("parse scenario JSON: {e}")))
    }

    /// Parse a scenario from a JSON string.
    pub fn from_json_str(s: &str) -> StickyResult<Self> {
        serde_json::from_str(s).map_err(|e| StickyError::serde(format!("parse scenario JSON: {e}")))
    }

    /// Parse a scenario from a JSON file on disk.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> StickyResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StickyError::validation(format!("open scenario JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check cross references and numeric ranges that serde cannot express.
    pub fn validate(&self) -> StickyResult<()> {
        self.fps.validate()?;
        if !self.scene.contains(self.container) {
            return Err(StickyError::validation(format!(
                "container {} is not a scene node",
                self.container
            )));
        }

        let mut names = BTreeSet::new();
        for sticky in &self.stickies {
            if sticky.name.trim().is_empty() {
                return Err(StickyError::validation("sticky name must be non-empty"));
            }
            if !names.insert(sticky.name.as_str()) {
                return Err(StickyError::validation(format!(
                    "duplicate sticky name '{}'",
                    sticky.name
                )));
            }
            for node in [sticky.placeholder, sticky.content] {
                if !self.scene.contains(node) {
                    return Err(StickyError::validation(format!(
                        "sticky '{}' references unknown node {node}",
                        sticky.name
                    )));
                }
            }
            sticky.config.validate().map_err(|e| {
                StickyError::validation(format!("sticky '{}': {e}", sticky.name))
            })?;
        }

        for (i, step) in self.steps.iter().enumerate() {
            self.validate_step(step)
                .map_err(|e| StickyError::validation(format!("step {i}: {e}")))?;
        }
        Ok(())
    }

    fn validate_step(&self, step: &Step) -> Result<(), String> {
        let known = |node: NodeId| {
            if self.scene.contains(node) {
                Ok(())
            } else {
                Err(format!("unknown node {node}"))
            }
        };
        let finite = |v: f64| {
            if v.is_finite() {
                Ok(())
            } else {
                Err("scroll position must be finite".to_string())
            }
        };
        match step {
            Step::ScrollWindow { y } => finite(*y),
            Step::ScrollNode { node, y } => {
                known(*node)?;
                finite(*y)
            }
            Step::SetHidden { node, .. } => known(*node),
            Step::ResizeNode { node, rect } => {
                known(*node)?;
                if [rect.x0, rect.y0, rect.x1, rect.y1]
                    .iter()
                    .all(|v| v.is_finite())
                {
                    Ok(())
                } else {
                    Err("rect must be finite".to_string())
                }
            }
            Step::Event { .. } | Step::ContainerEvent { .. } | Step::AdvanceFrames { .. } => {
                Ok(())
            }
        }
    }

    /// Total number of ticks the steps run.
    pub fn total_frames(&self) -> u64 {
        self.steps
            .iter()
            .map(|s| match s {
                Step::AdvanceFrames { count } => *count,
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/replay/scenario.rs"]
mod tests;
