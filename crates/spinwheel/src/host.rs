//! Host integration seam
//!
//! The wheel never touches a real element tree. Everything it needs from the
//! page (geometry, focus) and everything it produces (frames) goes through
//! [`AnchorHost`].

use spinwheel_core::{Rect, Size};

use crate::position::WidgetMetrics;
use crate::wheel::WheelFrame;

/// The element a wheel is attached to, plus the surface it renders into
pub trait AnchorHost: Send {
    /// Bounding box of the anchor, or of the element matching `selector`
    ///
    /// Returning `None` (detached or hidden element) positions the wheel as
    /// if the anchor sat at the origin with zero size.
    fn anchor_bounds(&self, selector: Option<&str>) -> Option<Rect>;

    /// Rendered size of the wheel element
    fn widget_metrics(&self) -> WidgetMetrics;

    /// Size of the scrollable document
    fn viewport(&self) -> Size;

    /// Whether the anchor or any part of the wheel has keyboard focus
    fn has_focus(&self) -> bool;

    /// Return focus to the anchor after an interaction ends
    fn focus_anchor(&mut self) {}

    /// Draw `frame`
    fn present(&mut self, frame: &WheelFrame);

    /// Remove the wheel from screen
    fn hide(&mut self) {}
}
