use crate::foundation::error::{StickyError, StickyResult};

/// Per-element sticky options. Every field defaults to zero / `false`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StickyConfig {
    /// How far past the viewport top the container must scroll before pinning begins.
    pub top_offset: f64,
    /// How far the container's bottom edge may pass the viewport top before pinning releases.
    pub bottom_offset: f64,
    /// Pin relative to the container's own scroll position instead of the viewport.
    pub relative: bool,
    /// Skip padding the placeholder while pinned.
    pub disable_compensation: bool,
    /// Skip the `translateZ(0)` compositing hint.
    pub disable_hardware_acceleration: bool,
}

impl StickyConfig {
    /// Reject offsets that would poison every comparison (NaN, infinities).
    pub fn validate(&self) -> StickyResult<()> {
        if !self.top_offset.is_finite() {
            return Err(StickyError::validation("top_offset must be finite"));
        }
        if !self.bottom_offset.is_finite() {
            return Err(StickyError::validation("bottom_offset must be finite"));
        }
        Ok(())
    }
}
