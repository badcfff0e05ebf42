use std::collections::BTreeMap;

use kurbo::Size;

use crate::foundation::core::{NodeId, Rect};
use crate::foundation::error::{StickyError, StickyResult};
use crate::host::{LayoutHost, NodeMetrics};

/// Reserved id of the document body in a [`Scene`].
pub const BODY: NodeId = NodeId(0);

/// One element of a [`Scene`], laid out in document coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneNode {
    /// Node id, must not be the body id.
    pub id: NodeId,
    /// Parent node; `None` attaches the node to the body.
    #[serde(default)]
    pub parent: Option<NodeId>,
    /// Layout box in document coordinates (unaffected by any scrolling).
    pub rect: Rect,
    /// Height of the scrollable content; defaults to the box height.
    #[serde(default)]
    pub scroll_height: Option<f64>,
    /// Current scroll position of the node's own content.
    #[serde(default)]
    pub scroll_top: f64,
    /// Whether the node establishes an offset parent for its descendants.
    #[serde(default)]
    pub positioned: bool,
    /// Hidden nodes (and their descendants) measure with zero height.
    #[serde(default)]
    pub hidden: bool,
}

impl SceneNode {
    fn content_height(&self) -> f64 {
        self.scroll_height.unwrap_or_else(|| self.rect.height())
    }

    fn max_scroll(&self) -> f64 {
        (self.content_height() - self.rect.height()).max(0.0)
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneDef {
    viewport: Size,
    #[serde(default)]
    window_scroll_y: f64,
    #[serde(default)]
    nodes: Vec<SceneNode>,
}

/// A small in-memory document: a viewport, a body, and a tree of boxes.
///
/// Bounding rectangles are derived from document positions minus the window scroll and the
/// scroll offsets of every scrolling ancestor, which is enough to drive sticky elements
/// through both viewport and nested-scroller scenarios.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "SceneDef", into = "SceneDef")]
pub struct Scene {
    viewport: Size,
    window_scroll_y: f64,
    nodes: BTreeMap<NodeId, SceneNode>,
}

impl TryFrom<SceneDef> for Scene {
    type Error = StickyError;

    fn try_from(def: SceneDef) -> StickyResult<Self> {
        let mut scene = Self::new(def.viewport)?;
        for node in def.nodes {
            scene.insert(node)?;
        }
        scene.set_window_scroll(def.window_scroll_y);
        Ok(scene)
    }
}

impl From<Scene> for SceneDef {
    fn from(scene: Scene) -> Self {
        Self {
            viewport: scene.viewport,
            window_scroll_y: scene.window_scroll_y,
            nodes: scene.nodes.into_values().collect(),
        }
    }
}

impl Scene {
    /// Create an empty scene with the given viewport size.
    pub fn new(viewport: Size) -> StickyResult<Self> {
        if !(viewport.width.is_finite() && viewport.height.is_finite())
            || viewport.width <= 0.0
            || viewport.height <= 0.0
        {
            return Err(StickyError::validation(
                "scene viewport must have a positive finite size",
            ));
        }
        Ok(Self {
            viewport,
            window_scroll_y: 0.0,
            nodes: BTreeMap::new(),
        })
    }

    /// Add a node. Its parent (if any) must already be present.
    pub fn insert(&mut self, node: SceneNode) -> StickyResult<()> {
        if node.id == BODY {
            return Err(StickyError::validation(format!(
                "node id {BODY} is reserved for the body"
            )));
        }
        if self.nodes.contains_key(&node.id) {
            return Err(StickyError::validation(format!(
                "duplicate scene node {}",
                node.id
            )));
        }
        if let Some(parent) = node.parent
            && parent != BODY
            && !self.nodes.contains_key(&parent)
        {
            return Err(StickyError::validation(format!(
                "scene node {} references unknown parent {parent}",
                node.id
            )));
        }
        let finite = [
            node.rect.x0,
            node.rect.y0,
            node.rect.x1,
            node.rect.y1,
            node.scroll_top,
            node.scroll_height.unwrap_or(0.0),
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(StickyError::validation(format!(
                "scene node {} has non-finite geometry",
                node.id
            )));
        }
        self.nodes.insert(node.id, node);
        Ok(())
    }

    /// Whether the scene contains `id` (the body always exists).
    pub fn contains(&self, id: NodeId) -> bool {
        id == BODY || self.nodes.contains_key(&id)
    }

    /// Borrow a node definition.
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Current window scroll position.
    pub fn window_scroll_y(&self) -> f64 {
        self.window_scroll_y
    }

    /// Total document height: the viewport or the lowest node edge, whichever is larger.
    pub fn document_height(&self) -> f64 {
        self.nodes
            .values()
            .map(|n| n.rect.y1)
            .fold(self.viewport.height, f64::max)
    }

    /// Scroll the window, clamped to the scrollable range. Returns the applied position.
    pub fn set_window_scroll(&mut self, y: f64) -> f64 {
        let max = (self.document_height() - self.viewport.height).max(0.0);
        self.window_scroll_y = clamp_scroll(y, max);
        self.window_scroll_y
    }

    /// Scroll a node's content, clamped to its scrollable range. Returns the applied position.
    pub fn set_scroll_top(&mut self, id: NodeId, y: f64) -> StickyResult<f64> {
        if id == BODY {
            return Ok(self.set_window_scroll(y));
        }
        let node = self.node_mut(id)?;
        node.scroll_top = clamp_scroll(y, node.max_scroll());
        Ok(node.scroll_top)
    }

    /// Show or hide a node.
    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) -> StickyResult<()> {
        self.node_mut(id)?.hidden = hidden;
        Ok(())
    }

    /// Replace a node's layout box, keeping its scroll position within range.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) -> StickyResult<()> {
        let node = self.node_mut(id)?;
        node.rect = rect;
        node.scroll_top = clamp_scroll(node.scroll_top, node.max_scroll());
        Ok(())
    }

    fn node_mut(&mut self, id: NodeId) -> StickyResult<&mut SceneNode> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| StickyError::validation(format!("unknown scene node {id}")))
    }

    fn parent_of(&self, node: &SceneNode) -> Option<&SceneNode> {
        node.parent.and_then(|p| self.nodes.get(&p))
    }

    fn body_metrics(&self) -> NodeMetrics {
        let doc_height = self.document_height();
        NodeMetrics {
            rect: Rect::new(
                0.0,
                -self.window_scroll_y,
                self.viewport.width,
                doc_height - self.window_scroll_y,
            ),
            offset_top: 0.0,
            scroll_top: self.window_scroll_y,
            scroll_height: doc_height,
            offset_parent: None,
        }
    }

    fn node_metrics(&self, node: &SceneNode) -> NodeMetrics {
        let mut scrolled = self.window_scroll_y;
        let mut hidden = node.hidden;
        let mut offset_parent: Option<&SceneNode> = None;

        let mut ancestor = self.parent_of(node);
        while let Some(a) = ancestor {
            scrolled += a.scroll_top;
            hidden |= a.hidden;
            if a.positioned && offset_parent.is_none() {
                offset_parent = Some(a);
            }
            ancestor = self.parent_of(a);
        }

        let y0 = node.rect.y0 - scrolled;
        let height = if hidden { 0.0 } else { node.rect.height() };
        let rect = Rect::new(node.rect.x0, y0, node.rect.x1, y0 + height);

        if hidden {
            return NodeMetrics {
                rect,
                offset_top: 0.0,
                scroll_top: node.scroll_top,
                scroll_height: 0.0,
                offset_parent: None,
            };
        }

        let (offset_parent, parent_y0) = match offset_parent {
            Some(p) => (p.id, p.rect.y0),
            None => (BODY, 0.0),
        };
        NodeMetrics {
            rect,
            offset_top: node.rect.y0 - parent_y0,
            scroll_top: node.scroll_top,
            scroll_height: node.content_height(),
            offset_parent: Some(offset_parent),
        }
    }
}

impl LayoutHost for Scene {
    fn body(&self) -> NodeId {
        BODY
    }

    fn metrics(&self, node: NodeId) -> Option<NodeMetrics> {
        if node == BODY {
            return Some(self.body_metrics());
        }
        self.nodes.get(&node).map(|n| self.node_metrics(n))
    }
}

fn clamp_scroll(y: f64, max: f64) -> f64 {
    if y.is_finite() { y.clamp(0.0, max) } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/host/scene.rs"]
mod tests;
