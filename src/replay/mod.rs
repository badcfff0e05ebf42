//! Deterministic scenario replay.
//!
//! A [`Scenario`](scenario::Scenario) describes a scene, one container, the sticky elements
//! mounted in it and an ordered list of steps. A [`ReplaySession`](session::ReplaySession)
//! mounts everything against an in-memory [`Scene`](crate::host::scene::Scene), applies the
//! steps, and streams one [`FrameRecord`](sink::FrameRecord) per sticky element per tick into a
//! [`FrameSink`](sink::FrameSink).

/// Scenario model and JSON loading.
pub mod scenario;
/// Replay driver.
pub mod session;
/// Record sinks.
pub mod sink;
