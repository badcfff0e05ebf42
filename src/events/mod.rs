//! Viewport motion events and the listener table that delivers them.

/// Window-level listener registration and dispatch.
pub mod viewport;

/// Kinds of viewport motion that can move a sticky element relative to the screen.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Viewport resized.
    Resize,
    /// Scroll position changed.
    Scroll,
    /// Mouse wheel turned.
    Wheel,
    /// Touch started.
    TouchStart,
    /// Touch moved.
    TouchMove,
    /// Touch ended.
    TouchEnd,
    /// Page shown (including restores from the back/forward cache).
    PageShow,
    /// Document finished loading.
    Load,
}

impl EventKind {
    /// Every kind a container listens to.
    pub const ALL: [EventKind; 8] = [
        EventKind::Resize,
        EventKind::TouchStart,
        EventKind::TouchMove,
        EventKind::TouchEnd,
        EventKind::PageShow,
        EventKind::Load,
        EventKind::Wheel,
        EventKind::Scroll,
    ];

    /// Host event name, e.g. `"touchstart"`.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Resize => "resize",
            EventKind::Scroll => "scroll",
            EventKind::Wheel => "wheel",
            EventKind::TouchStart => "touchstart",
            EventKind::TouchMove => "touchmove",
            EventKind::TouchEnd => "touchend",
            EventKind::PageShow => "pageshow",
            EventKind::Load => "load",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an event was dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOrigin {
    /// The window / viewport itself.
    Window,
    /// The container's own node.
    Container,
}

/// A single raw motion event, before coalescing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionEvent {
    /// What happened.
    pub kind: EventKind,
    /// Where it was dispatched.
    pub origin: EventOrigin,
}

impl MotionEvent {
    /// Event dispatched on the window.
    pub fn window(kind: EventKind) -> Self {
        Self {
            kind,
            origin: EventOrigin::Window,
        }
    }

    /// Event dispatched on a container node.
    pub fn container(kind: EventKind) -> Self {
        Self {
            kind,
            origin: EventOrigin::Container,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/events/kind.rs"]
mod tests;
