use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::container::{ContainerHandle, FrameEvent, FrameHandler};
use crate::foundation::core::NodeId;
use crate::foundation::error::{StickyError, StickyResult};
use crate::host::{LayoutHost, NodeMetrics};
use crate::sticky::config::StickyConfig;
use crate::sticky::state::{FrameMeasurements, PlaceholderStyle, RelativeGeometry, StickyState};

/// Class of the element wrapping placeholder and content.
pub const WRAPPER_CLASS: &str = "my-sticky";
/// Class of the in-flow placeholder.
pub const PLACEHOLDER_CLASS: &str = "my-sticky-placeholder";

/// The two host nodes a sticky element measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StickyNodes {
    /// Always-in-flow node at the element's original position.
    pub placeholder: NodeId,
    /// The rendered content that gets pinned.
    pub content: NodeId,
}

/// Output of [`Sticky::render`]: the wrapper description around the child's output.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendered<R> {
    /// Wrapper element class.
    pub wrapper_class: &'static str,
    /// Placeholder element class.
    pub placeholder_class: &'static str,
    /// Placeholder inline style.
    pub placeholder: PlaceholderStyle,
    /// Whatever the child render function produced.
    pub content: R,
}

struct StickyShared {
    nodes: StickyNodes,
    container: ContainerHandle,
    config: Cell<StickyConfig>,
    state: RefCell<StickyState>,
}

impl StickyShared {
    fn on_frame(&self, event: &FrameEvent, host: &dyn LayoutHost) {
        let cfg = self.config.get();
        let (Some(placeholder), Some(content)) = (
            host.metrics(self.nodes.placeholder),
            host.bounding_rect(self.nodes.content),
        ) else {
            tracing::trace!(content = self.nodes.content.0, "sticky nodes not measurable");
            return;
        };
        let relative = if cfg.relative {
            self.relative_geometry(event, &placeholder, host)
        } else {
            None
        };
        let measurements = FrameMeasurements {
            event: *event,
            placeholder: placeholder.rect,
            content,
            relative,
        };

        let next = self.state.borrow().next(&measurements, &cfg);
        let Some(next) = next else {
            tracing::trace!(content = self.nodes.content.0, "sticky update skipped");
            return;
        };
        if next.is_sticky != next.was_sticky {
            tracing::debug!(
                content = self.nodes.content.0,
                pinned = next.is_sticky,
                top = ?next.style.top,
                "sticky state changed"
            );
        }
        *self.state.borrow_mut() = next;
    }

    fn relative_geometry(
        &self,
        event: &FrameEvent,
        placeholder: &NodeMetrics,
        host: &dyn LayoutHost,
    ) -> Option<RelativeGeometry> {
        let parent = self.container.parent()?;
        let source = host.metrics(event.event_source)?;
        let container = host.metrics(parent)?;
        let offset_parent_scroll_top = container
            .offset_parent
            .and_then(|p| host.metrics(p))
            .map(|m| m.scroll_top);
        Some(RelativeGeometry {
            source_is_container: event.event_source == parent,
            source_scroll_top: source.scroll_top,
            source_offset_top: source.offset_top,
            placeholder_offset_top: placeholder.offset_top,
            container_scroll_height: container.scroll_height,
            container_scroll_top: container.scroll_top,
            container_offset_top: container.offset_top,
            offset_parent_scroll_top,
        })
    }
}

/// A mounted sticky element.
///
/// Subscribes to its container on mount and unsubscribes on [`Sticky::unmount`] or drop.
pub struct Sticky {
    shared: Rc<StickyShared>,
    handler: FrameHandler,
}

impl std::fmt::Debug for Sticky {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sticky")
            .field("nodes", &self.shared.nodes)
            .field("config", &self.shared.config.get())
            .field("state", &*self.shared.state.borrow())
            .finish()
    }
}

impl Sticky {
    /// Mount a sticky element inside `container`.
    ///
    /// Fails with [`StickyError::Usage`] when there is no container (or it was torn down), and
    /// with [`StickyError::Validation`] when `config` is invalid.
    pub fn mount(
        container: Option<ContainerHandle>,
        nodes: StickyNodes,
        config: StickyConfig,
    ) -> StickyResult<Self> {
        let Some(container) = container else {
            return Err(StickyError::usage(
                "Sticky must be mounted within a StickyContainer",
            ));
        };
        if !container.is_attached() {
            return Err(StickyError::usage(
                "Sticky cannot be mounted in a torn-down StickyContainer",
            ));
        }
        config.validate()?;

        let shared = Rc::new(StickyShared {
            nodes,
            container,
            config: Cell::new(config),
            state: RefCell::new(StickyState::default()),
        });
        let weak = Rc::downgrade(&shared);
        let handler: FrameHandler = Rc::new(move |event: &FrameEvent, host: &dyn LayoutHost| {
            if let Some(shared) = weak.upgrade() {
                shared.on_frame(event, host);
            }
        });
        shared.container.subscribe(&handler);

        Ok(Self { shared, handler })
    }

    /// Nodes this element measures.
    pub fn nodes(&self) -> StickyNodes {
        self.shared.nodes
    }

    /// Copy of the latest state.
    pub fn state(&self) -> StickyState {
        self.shared.state.borrow().clone()
    }

    /// Current configuration.
    pub fn config(&self) -> StickyConfig {
        self.shared.config.get()
    }

    /// Replace the configuration; takes effect on the next frame.
    pub fn set_config(&self, config: StickyConfig) -> StickyResult<()> {
        config.validate()?;
        self.shared.config.set(config);
        Ok(())
    }

    /// Placeholder style for the latest state.
    pub fn placeholder_style(&self) -> PlaceholderStyle {
        self.shared
            .state
            .borrow()
            .placeholder_style(&self.shared.config.get())
    }

    /// Render the element: hand the current state to `child` and wrap its output.
    pub fn render<R>(&self, child: impl FnOnce(&StickyState) -> R) -> Rendered<R> {
        let state = self.state();
        Rendered {
            wrapper_class: WRAPPER_CLASS,
            placeholder_class: PLACEHOLDER_CLASS,
            placeholder: state.placeholder_style(&self.shared.config.get()),
            content: child(&state),
        }
    }

    /// Unsubscribe from the container. Equivalent to dropping the element.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for Sticky {
    fn drop(&mut self) {
        self.shared.container.unsubscribe(&self.handler);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sticky/element.rs"]
mod tests;
