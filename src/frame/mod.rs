//! Frame pacing.
//!
//! Stands in for the host's animation-frame primitive: work requested now runs on the next tick.

/// Frame request/cancel seam and the tick-driven [`scheduler::FrameLoop`].
pub mod scheduler;
