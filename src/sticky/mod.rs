//! The sticky element: a pure pin/release state machine plus the mounted component around it.

/// Per-element options.
pub mod config;
/// Mounted element: subscription, measurement, rendering.
pub mod element;
/// Sticky state, style patches and the frame transition.
pub mod state;
