//! Sticky-frame is a headless sticky positioning engine.
//!
//! A [`StickyContainer`] coalesces viewport motion into one geometry broadcast per frame, and
//! every [`Sticky`] element mounted inside it turns each broadcast into a new [`StickyState`]:
//! pinned with an inline style patch, or static. Geometry comes from a [`LayoutHost`]; the crate
//! ships an in-memory [`Scene`] host and a scenario [`ReplaySession`] on top of it.
//!
//! - Mount a container on a [`Viewport`] with a [`FrameScheduler`] (e.g. [`FrameLoop`])
//! - Mount sticky elements with the container's [`ContainerHandle`]
//! - Tick the frame loop against the host and read back each element's state
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Identifiers, frame rate and error types.
pub mod foundation;

/// Event-to-frame aggregation.
pub mod container;
/// Motion event kinds and the viewport listener table.
pub mod events;
/// Frame scheduling.
pub mod frame;
/// Layout measurement seam and the in-memory scene.
pub mod host;
/// Scenario replay.
pub mod replay;
/// Sticky element configuration, state machine and element.
pub mod sticky;

pub use crate::foundation::core::{Fps, FrameIndex, NodeId, Point, Rect, Vec2};
pub use crate::foundation::error::{StickyError, StickyResult};

pub use crate::container::{ContainerHandle, FrameEvent, FrameHandler, StickyContainer};
pub use crate::events::viewport::{Listener, Viewport};
pub use crate::events::{EventKind, EventOrigin, MotionEvent};
pub use crate::frame::scheduler::{FrameCallback, FrameHandle, FrameLoop, FrameScheduler};
pub use crate::host::scene::{BODY, Scene, SceneNode};
pub use crate::host::{LayoutHost, NodeMetrics};
pub use crate::replay::scenario::{Scenario, StickyDef, Step};
pub use crate::replay::session::{ReplayOpts, ReplaySession, ReplayStats};
pub use crate::replay::sink::{FrameRecord, FrameSink, InMemorySink, JsonLinesSink, SinkConfig};
pub use crate::sticky::config::StickyConfig;
pub use crate::sticky::element::{
    PLACEHOLDER_CLASS, Rendered, Sticky, StickyNodes, WRAPPER_CLASS,
};
pub use crate::sticky::state::{
    FrameMeasurements, HARDWARE_ACCELERATION_HINT, PlaceholderStyle, Position, RelativeGeometry,
    StickyState, StylePatch,
};
