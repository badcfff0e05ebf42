//! Measurement seam between the sticky components and the document that hosts them.
//!
//! The components never own geometry. Every frame they ask a [`LayoutHost`] for the current
//! bounding rectangles and scroll offsets of the nodes they care about.

use crate::foundation::core::{NodeId, Rect};

/// In-memory document used by tests and scenario replay.
pub mod scene;

/// Geometry of a single node as reported by the host at measurement time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct NodeMetrics {
    /// Bounding rectangle in viewport coordinates.
    pub rect: Rect,
    /// Distance from the top edge of the offset parent's box.
    pub offset_top: f64,
    /// Current vertical scroll position of the node's own content.
    pub scroll_top: f64,
    /// Total height of the node's scrollable content.
    pub scroll_height: f64,
    /// Nearest positioned ancestor, if any.
    pub offset_parent: Option<NodeId>,
}

/// Answers geometry queries about the host document.
pub trait LayoutHost {
    /// The document body. Frames triggered by viewport events report it as their source.
    fn body(&self) -> NodeId;

    /// Measure `node`, or `None` if it is not part of the document.
    fn metrics(&self, node: NodeId) -> Option<NodeMetrics>;

    /// Bounding rectangle of `node` in viewport coordinates.
    fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        self.metrics(node).map(|m| m.rect)
    }
}
