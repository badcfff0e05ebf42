//! The sticky container: turns bursts of viewport motion into one geometry broadcast per frame.
//!
//! # Flow
//!
//! 1. Mounting registers a single notifier on the [`Viewport`] for every [`EventKind`].
//!    Events on the container's own node enter through [`StickyContainer::dispatch`].
//! 2. The first event after a broadcast requests a frame; later events are dropped until it runs.
//! 3. The frame clears the pending flag, measures the container and calls every subscriber with
//!    a [`FrameEvent`], in subscription order, over a snapshot of the subscriber list.
//!
//! Descendants only ever see a [`ContainerHandle`], which is weak: it cannot keep a container
//! alive and goes quiet once the container is torn down.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::events::viewport::{Listener, Viewport};
use crate::events::{EventKind, EventOrigin, MotionEvent};
use crate::foundation::core::NodeId;
use crate::frame::scheduler::{FrameHandle, FrameScheduler};
use crate::host::LayoutHost;

/// Geometry broadcast to subscribers once per frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameEvent {
    /// Top edge of the container relative to the viewport top.
    pub distance_from_top: f64,
    /// Bottom edge of the container relative to the viewport top.
    pub distance_from_bottom: f64,
    /// The body for viewport-originated frames, otherwise the container node.
    pub event_source: NodeId,
}

/// Subscriber callback. Identity (`Rc::ptr_eq`) is what `unsubscribe` matches on.
pub type FrameHandler = Rc<dyn Fn(&FrameEvent, &dyn LayoutHost)>;

struct ContainerInner {
    node: NodeId,
    viewport: Viewport,
    scheduler: Rc<dyn FrameScheduler>,
    subscribers: RefCell<Vec<FrameHandler>>,
    frame_pending: Cell<bool>,
    frame_handle: Cell<Option<FrameHandle>>,
    notifier: RefCell<Option<Listener>>,
    torn_down: Cell<bool>,
}

impl ContainerInner {
    fn notify(this: &Rc<Self>, event: &MotionEvent) {
        if this.torn_down.get() {
            return;
        }
        if this.frame_pending.get() {
            tracing::trace!(node = this.node.0, kind = %event.kind, "event coalesced");
            return;
        }

        let weak = Rc::downgrade(this);
        let origin = event.origin;
        let handle = this
            .scheduler
            .request_frame(Box::new(move |host: &dyn LayoutHost| {
                if let Some(inner) = weak.upgrade() {
                    inner.broadcast(host, origin);
                }
            }));
        this.frame_handle.set(Some(handle));
        this.frame_pending.set(true);
    }

    fn broadcast(&self, host: &dyn LayoutHost, origin: EventOrigin) {
        self.frame_pending.set(false);
        self.frame_handle.set(None);

        let (top, bottom) = host
            .bounding_rect(self.node)
            .map_or((0.0, 0.0), |r| (r.y0, r.y1));
        let event = FrameEvent {
            distance_from_top: top,
            distance_from_bottom: bottom,
            event_source: match origin {
                EventOrigin::Window => host.body(),
                EventOrigin::Container => self.node,
            },
        };

        let snapshot: SmallVec<[FrameHandler; 4]> =
            self.subscribers.borrow().iter().cloned().collect();
        for handler in &snapshot {
            handler(&event, host);
        }
    }

    fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        if let Some(handle) = self.frame_handle.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.frame_pending.set(false);
        if let Some(notifier) = self.notifier.borrow_mut().take() {
            for kind in EventKind::ALL {
                self.viewport.remove_listener(kind, &notifier);
            }
        }
        tracing::debug!(node = self.node.0, "sticky container torn down");
    }
}

/// Owner side of a mounted container.
///
/// Dropping it tears the container down.
pub struct StickyContainer {
    inner: Rc<ContainerInner>,
}

impl std::fmt::Debug for StickyContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StickyContainer")
            .field("node", &self.inner.node)
            .field("subscribers", &self.subscriber_count())
            .field("frame_pending", &self.is_frame_pending())
            .field("torn_down", &self.inner.torn_down.get())
            .finish()
    }
}

impl StickyContainer {
    /// Mount a container for `node`, listening to `viewport` and pacing broadcasts with
    /// `scheduler`.
    pub fn mount(node: NodeId, viewport: &Viewport, scheduler: Rc<dyn FrameScheduler>) -> Self {
        let inner = Rc::new(ContainerInner {
            node,
            viewport: viewport.clone(),
            scheduler,
            subscribers: RefCell::new(Vec::new()),
            frame_pending: Cell::new(false),
            frame_handle: Cell::new(None),
            notifier: RefCell::new(None),
            torn_down: Cell::new(false),
        });

        let weak = Rc::downgrade(&inner);
        let notifier: Listener = Rc::new(move |event: &MotionEvent| {
            if let Some(inner) = weak.upgrade() {
                ContainerInner::notify(&inner, event);
            }
        });
        for kind in EventKind::ALL {
            viewport.add_listener(kind, &notifier);
        }
        *inner.notifier.borrow_mut() = Some(notifier);

        Self { inner }
    }

    /// The container's own node.
    pub fn node(&self) -> NodeId {
        self.inner.node
    }

    /// Capability handle for descendants.
    pub fn handle(&self) -> ContainerHandle {
        ContainerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver an event dispatched on the container's own node.
    pub fn dispatch(&self, kind: EventKind) {
        ContainerInner::notify(&self.inner, &MotionEvent::container(kind));
    }

    /// Number of subscriber entries, duplicates included.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Whether a broadcast is waiting for the next frame.
    pub fn is_frame_pending(&self) -> bool {
        self.inner.frame_pending.get()
    }

    /// Cancel any pending frame and stop listening to the viewport. Idempotent.
    pub fn teardown(&self) {
        self.inner.teardown();
    }
}

impl Drop for StickyContainer {
    fn drop(&mut self) {
        self.inner.teardown();
    }
}

/// What a container exposes to its descendants: subscription and the parent node.
#[derive(Clone)]
pub struct ContainerHandle {
    inner: Weak<ContainerInner>,
}

impl std::fmt::Debug for ContainerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerHandle")
            .field("parent", &self.parent())
            .finish()
    }
}

impl ContainerHandle {
    fn live(&self) -> Option<Rc<ContainerInner>> {
        self.inner.upgrade().filter(|inner| !inner.torn_down.get())
    }

    /// Whether the container is still mounted.
    pub fn is_attached(&self) -> bool {
        self.live().is_some()
    }

    /// Append `handler` to the subscriber list. Returns `false` if the container is gone.
    pub fn subscribe(&self, handler: &FrameHandler) -> bool {
        let Some(inner) = self.live() else {
            return false;
        };
        inner.subscribers.borrow_mut().push(Rc::clone(handler));
        true
    }

    /// Remove every entry identical to `handler`. Returns how many were removed.
    pub fn unsubscribe(&self, handler: &FrameHandler) -> usize {
        let Some(inner) = self.inner.upgrade() else {
            return 0;
        };
        let mut subscribers = inner.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|h| !Rc::ptr_eq(h, handler));
        before - subscribers.len()
    }

    /// The container node, or `None` once the container is torn down.
    pub fn parent(&self) -> Option<NodeId> {
        self.live().map(|inner| inner.node)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/container.rs"]
mod tests;
