//! Input event types delivered by the host
//!
//! The gesture recognizer lives outside this crate; it reports already
//! classified touch, drag and release events. Keyboard events arrive through
//! a single global hook and are fanned out by [`crate::keyboard::KeyboardHub`].

// ============================================================================
// Gesture Events
// ============================================================================

/// Vertical direction of a drag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragDirection {
    /// Finger moving towards the top of the screen (increases the value)
    Up,
    /// Finger moving towards the bottom of the screen (decreases the value)
    Down,
}

/// Raw drag input as reported by a gesture recognizer
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragInput {
    /// Cumulative vertical pixel delta since the touch started
    ///
    /// Negative values mean the finger moved up.
    Pan {
        /// Vertical distance from the touch origin in pixels
        delta_y: f32,
    },
    /// Per-event velocity with an explicit direction
    Fling {
        /// Recognizer velocity (rows per event)
        velocity: f32,
        /// Which way the finger is moving
        direction: DragDirection,
    },
}

impl DragInput {
    /// Whether this input carries no movement at all
    pub fn is_zero(&self) -> bool {
        match self {
            DragInput::Pan { delta_y } => *delta_y == 0.0,
            DragInput::Fling { velocity, .. } => *velocity == 0.0,
        }
    }
}

/// Gesture events targeted at one wheel
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// Finger touched the wheel
    Touch,
    /// Finger dragged vertically
    Drag(DragInput),
    /// Finger lifted (drag end)
    Release,
}

// ============================================================================
// Keyboard Events
// ============================================================================

/// Keys the wheel distinguishes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Printable character
    Char(char),
    Backspace,
    Enter,
    /// Anything else (arrows, Tab, Escape, modifiers)
    Other,
}

/// Keyboard event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// The key that was pressed
    pub key: Key,
}

impl KeyboardEvent {
    pub const fn new(key: Key) -> Self {
        Self { key }
    }

    /// Convenience constructor for a character key
    pub const fn char(c: char) -> Self {
        Self { key: Key::Char(c) }
    }
}
