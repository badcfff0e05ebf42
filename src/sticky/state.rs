use crate::container::FrameEvent;
use crate::foundation::core::Rect;
use crate::sticky::config::StickyConfig;

/// Compositing hint added to the style patch unless disabled.
pub const HARDWARE_ACCELERATION_HINT: &str = "translateZ(0)";

/// CSS `position` values the sticky element emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Out of flow, positioned against the viewport.
    Fixed,
}

/// Inline style applied to the sticky content. Unset fields are left to the stylesheet.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StylePatch {
    /// `position`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// `top`, in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    /// `left`, in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    /// `width`, in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// `transform`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
}

impl StylePatch {
    /// Whether the patch sets nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Render as an inline `style` attribute value.
    pub fn to_css(&self) -> String {
        let mut decls = Vec::with_capacity(5);
        if let Some(Position::Fixed) = self.position {
            decls.push("position: fixed".to_string());
        }
        if let Some(top) = self.top {
            decls.push(format!("top: {}", px(top)));
        }
        if let Some(left) = self.left {
            decls.push(format!("left: {}", px(left)));
        }
        if let Some(width) = self.width {
            decls.push(format!("width: {}", px(width)));
        }
        if let Some(transform) = &self.transform {
            decls.push(format!("transform: {transform}"));
        }
        decls.join("; ")
    }
}

/// Inline style of the in-flow placeholder.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlaceholderStyle {
    /// `padding-bottom`, in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<f64>,
}

impl PlaceholderStyle {
    /// Render as an inline `style` attribute value.
    pub fn to_css(&self) -> String {
        self.padding_bottom
            .map(|p| format!("padding-bottom: {}", px(p)))
            .unwrap_or_default()
    }
}

fn px(v: f64) -> String {
    // Adding zero folds -0.0 into 0.0.
    format!("{}px", v + 0.0)
}

/// Extra geometry needed in relative mode, measured against the scroll container.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RelativeGeometry {
    /// Whether the frame was triggered by the container itself.
    pub source_is_container: bool,
    /// `scroll_top` of the frame's event source.
    pub source_scroll_top: f64,
    /// `offset_top` of the frame's event source.
    pub source_offset_top: f64,
    /// `offset_top` of the placeholder.
    pub placeholder_offset_top: f64,
    /// `scroll_height` of the container.
    pub container_scroll_height: f64,
    /// `scroll_top` of the container.
    pub container_scroll_top: f64,
    /// `offset_top` of the container.
    pub container_offset_top: f64,
    /// `scroll_top` of the container's offset parent; `None` when it has none.
    pub offset_parent_scroll_top: Option<f64>,
}

/// Everything the transition needs from one frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameMeasurements {
    /// The container broadcast.
    pub event: FrameEvent,
    /// Placeholder bounding rectangle (viewport coordinates).
    pub placeholder: Rect,
    /// Content bounding rectangle (viewport coordinates).
    pub content: Rect,
    /// Present when the element could be measured against its container.
    pub relative: Option<RelativeGeometry>,
}

/// Sticky state of one element, replaced wholesale every frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StickyState {
    /// Pinned this frame.
    pub is_sticky: bool,
    /// Pinned the previous frame.
    pub was_sticky: bool,
    /// Distance from the reference top edge used for the pin decision.
    pub distance_from_top: f64,
    /// Remaining room below the content before the container ends.
    pub distance_from_bottom: f64,
    /// Measured content height.
    pub calculated_height: f64,
    /// Inline style for the content.
    pub style: StylePatch,
}

impl StickyState {
    /// Compute the state for the next frame.
    ///
    /// Returns `None` when the frame cannot be used: the content measures no height (hidden),
    /// or relative mode is on and the relative geometry is missing. The caller keeps the
    /// previous state in that case.
    pub fn next(&self, m: &FrameMeasurements, cfg: &StickyConfig) -> Option<StickyState> {
        let relative = if cfg.relative {
            Some(m.relative.as_ref()?)
        } else {
            None
        };

        let calculated_height = m.content.height();
        if calculated_height.is_nan() || calculated_height <= 0.0 {
            return None;
        }

        let incoming_bottom = m.event.distance_from_bottom;
        let distance_from_top = match relative {
            Some(r) => r.placeholder_offset_top - (r.source_scroll_top + r.source_offset_top),
            None => m.event.distance_from_top,
        };
        let bottom_difference = incoming_bottom - cfg.bottom_offset - calculated_height;

        let was_sticky = self.is_sticky;
        let is_sticky = match relative {
            // Only the container's own scrolling may move a relative element.
            Some(r) if !r.source_is_container => was_sticky,
            _ => distance_from_top <= -cfg.top_offset && incoming_bottom > -cfg.bottom_offset,
        };

        let bottom_reference = match relative {
            Some(r) => r.container_scroll_height - r.container_scroll_top,
            None => incoming_bottom,
        };
        let distance_from_bottom = bottom_reference - calculated_height;

        let top = if bottom_difference > 0.0 {
            match relative {
                Some(r) => {
                    r.container_offset_top
                        - r.offset_parent_scroll_top.unwrap_or(0.0)
                        - cfg.top_offset
                }
                None => 0.0 - cfg.top_offset,
            }
        } else {
            bottom_difference
        };

        let mut style = if is_sticky {
            StylePatch {
                position: Some(Position::Fixed),
                top: Some(top),
                left: Some(m.placeholder.x0),
                width: Some(m.placeholder.width()),
                transform: None,
            }
        } else {
            StylePatch::default()
        };
        if !cfg.disable_hardware_acceleration {
            style.transform = Some(HARDWARE_ACCELERATION_HINT.to_string());
        }

        Some(StickyState {
            is_sticky,
            was_sticky,
            distance_from_top,
            distance_from_bottom,
            calculated_height,
            style,
        })
    }

    /// Placeholder style for this state: padded by the content height while pinned.
    pub fn placeholder_style(&self, cfg: &StickyConfig) -> PlaceholderStyle {
        if !self.is_sticky {
            return PlaceholderStyle::default();
        }
        PlaceholderStyle {
            padding_bottom: Some(if cfg.disable_compensation {
                0.0
            } else {
                self.calculated_height
            }),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sticky/state.rs"]
mod tests;
