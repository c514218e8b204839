//! Viewport-aware placement of the wheel next to its anchor
//!
//! The preferred side is a request, not a guarantee. Placements that would
//! overflow the viewport are downgraded, at most once per axis:
//!
//! ```text
//! right ──(too wide)──> top ──(too high)──> bottom
//!   └────(too high)──────────────────────────┘
//! ```
//!
//! The computation is pure, so re-running it on every focus event with the
//! same geometry always yields the same placement.

use serde::{Deserialize, Serialize};
use spinwheel_core::{Point, Rect, Size};

/// Horizontal gap between the anchor and a side placement (room for the arrow)
const ARROW_GAP: f32 = 30.0;

/// Minimum distance kept from the top edge of the viewport
const EDGE_MARGIN: f32 = 5.0;

/// Visual-balance correction when centering against the anchor
const CENTER_BALANCE: f32 = 8.0;

/// Upward overlap of a bottom placement, aligning the selection slot with the anchor
const SELECTION_OVERLAP: f32 = 45.0;

/// Side of the anchor the wheel appears on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Above the anchor
    Top,
    /// To the right of the anchor (default)
    #[default]
    Right,
    /// Below the anchor
    Bottom,
    /// To the left of the anchor
    Left,
}

impl Direction {
    /// CSS-facing class name, used by stylesheets to draw the arrow
    pub fn class_name(&self) -> &'static str {
        match self {
            Direction::Top => "top",
            Direction::Right => "right",
            Direction::Bottom => "bottom",
            Direction::Left => "left",
        }
    }

    /// Whether the wheel sits beside (rather than above/below) the anchor
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Rendered size of the wheel element
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WidgetMetrics {
    pub width: f32,
    pub height: f32,
    /// Height including margins
    pub outer_height: f32,
}

impl WidgetMetrics {
    pub const fn new(width: f32, height: f32, outer_height: f32) -> Self {
        Self {
            width,
            height,
            outer_height,
        }
    }

    fn sanitized(&self) -> Self {
        let fix = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self::new(fix(self.width), fix(self.height), fix(self.outer_height))
    }
}

/// Everything the positioner reads
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementInput {
    /// Anchor bounding box; `None` for detached or hidden anchors
    pub anchor: Option<Rect>,
    pub widget: WidgetMetrics,
    pub viewport: Size,
    /// Preferred side
    pub direction: Direction,
}

/// Resolved side and top-left offset for the wheel element
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Placement {
    pub direction: Direction,
    pub offset: Point,
}

/// Computes placements
#[derive(Clone, Copy, Debug, Default)]
pub struct Positioner {
    /// Downgrade `left` to `top` when the wheel would cross the left edge
    guard_left_edge: bool,
}

impl Positioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the left-edge overflow check
    ///
    /// Off by default: without it a `left` request is always honored, which
    /// matches the established behavior of side placements.
    pub fn guard_left_edge(mut self, enabled: bool) -> Self {
        self.guard_left_edge = enabled;
        self
    }

    /// Compute the placement for `input`
    pub fn place(&self, input: &PlacementInput) -> Placement {
        let anchor = input.anchor.unwrap_or(Rect::ZERO).sanitized();
        let widget = input.widget.sanitized();
        let viewport_width = if input.viewport.width.is_finite() {
            input.viewport.width
        } else {
            0.0
        };
        let overflows_top = anchor.top() - widget.height - EDGE_MARGIN < 0.0;

        let mut direction = input.direction;
        let mut offset = anchor.origin;

        if direction == Direction::Right {
            if anchor.left() + widget.width + anchor.width() + ARROW_GAP > viewport_width {
                direction = Direction::Top;
            } else if overflows_top {
                direction = Direction::Bottom;
            } else {
                offset.x = anchor.left() + anchor.width() + ARROW_GAP;
            }
        }

        if direction == Direction::Left {
            if self.guard_left_edge && anchor.left() - widget.width - ARROW_GAP < 0.0 {
                direction = Direction::Top;
            } else {
                offset.x = anchor.left() - anchor.width();
            }
        }

        if direction == Direction::Top {
            if overflows_top {
                direction = Direction::Bottom;
            } else {
                offset.y = anchor.top() - widget.outer_height - EDGE_MARGIN;
            }
        } else if direction.is_horizontal() {
            offset.y = anchor.top() - widget.outer_height / 2.0 + CENTER_BALANCE;
        }

        if direction == Direction::Bottom {
            offset.y = anchor.top() + widget.outer_height - SELECTION_OVERLAP;
        }

        if direction != input.direction {
            tracing::debug!(
                requested = input.direction.class_name(),
                resolved = direction.class_name(),
                "placement downgraded to stay inside the viewport"
            );
        }

        Placement { direction, offset }
    }
}
