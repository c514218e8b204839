//! Value/gesture model
//!
//! Owns the wheel's numeric value. Drags move a *live* value that is only
//! clamped; releasing (or going idle) commits it, which rounds to the nearest
//! step and publishes the result to value observers.
//!
//! ```rust
//! use spinwheel::model::WheelModel;
//! use spinwheel::range::Range;
//! use spinwheel_core::DragInput;
//!
//! let range = Range::new(0.0, 100.0, 0.5).unwrap();
//! let mut model = WheelModel::new(range, 10.0, 1.0 / 27.0);
//!
//! model.set_active();
//! model.apply_drag(DragInput::Pan { delta_y: -81.0 });
//! assert_eq!(model.live(), 13.0);
//!
//! assert_eq!(model.clear_active(), 13.0);
//! ```

use spinwheel_core::{Change, DragDirection, DragInput, Key, Observable, SubscriptionId};

use crate::range::Range;

/// Rows rendered above the first real entry
const LEADING_PAD_ROWS: f32 = 2.0;

/// Snapshot of a wheel's observable state
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WheelState {
    /// Live value: clamped during a drag, step-aligned after a commit
    pub value: f64,
    /// Whether the user is mid-gesture or typing
    pub active: bool,
}

/// Vertical pixel offset that brings the row for `value` into the selection slot
///
/// The list starts with two padding rows, so value `0` sits two rows below
/// the top of the wheel.
pub fn render_offset(value: f64, step: f64, row_height: f32) -> f32 {
    (-value * row_height as f64 / step) as f32 + LEADING_PAD_ROWS * row_height
}

/// The value/gesture model of one wheel
pub struct WheelModel {
    range: Range,
    /// Value change per dragged pixel
    speed: f64,
    /// Authoritative, committed value
    committed: Observable<f64>,
    /// Value currently rendered (uncommitted while dragging or typing)
    live: f64,
    active: Observable<bool>,
    /// Characters typed into the keyboard fallback
    entry: String,
}

impl WheelModel {
    /// Create a model; non-finite initial values become `0`
    ///
    /// The initial value is clamped and rounded right away, so observers
    /// never see an out-of-range or off-step value.
    pub fn new(range: Range, initial: f64, speed: f64) -> Self {
        let initial = if initial.is_finite() { initial } else { 0.0 };
        let value = range.quantize(initial);
        Self {
            range,
            speed,
            committed: Observable::new(value),
            live: value,
            active: Observable::new(false),
            entry: String::new(),
        }
    }

    pub fn range(&self) -> &Range {
        &self.range
    }

    /// Last committed value
    pub fn value(&self) -> f64 {
        *self.committed.get()
    }

    /// Value currently rendered
    pub fn live(&self) -> f64 {
        self.live
    }

    pub fn is_active(&self) -> bool {
        *self.active.get()
    }

    pub fn state(&self) -> WheelState {
        WheelState {
            value: self.live,
            active: self.is_active(),
        }
    }

    /// Text typed into the keyboard fallback so far
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Move the live value for a drag; returns whether anything changed
    ///
    /// Pans are measured from the committed value, so repeated updates within
    /// one gesture never accumulate error. Flings nudge the live value by
    /// `step * velocity`.
    pub fn apply_drag(&mut self, input: DragInput) -> bool {
        if input.is_zero() {
            return false;
        }

        let step = self.range.step();
        let raw = match input {
            DragInput::Pan { delta_y } => self.value() - delta_y as f64 * self.speed,
            DragInput::Fling {
                velocity,
                direction: DragDirection::Up,
            } => self.live + step * velocity as f64,
            DragInput::Fling {
                velocity,
                direction: DragDirection::Down,
            } => self.live - step * velocity as f64,
        };

        let previous = self.live;
        self.live = self.range.clamp(raw);
        tracing::trace!(raw, live = self.live, "drag update");
        self.live != previous
    }

    /// Feed one keystroke to the keyboard fallback
    ///
    /// Returns `false` for keys the entry box ignores. Text that does not
    /// parse leaves the live value untouched.
    pub fn type_key(&mut self, key: Key) -> bool {
        match key {
            Key::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => self.entry.push(c),
            Key::Backspace => {
                self.entry.pop();
            }
            _ => return false,
        }

        match self.entry.parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => {
                self.live = self.range.quantize(parsed);
            }
            _ => {
                tracing::warn!(entry = %self.entry, kept = self.live, "keyboard entry is not a number");
            }
        }
        true
    }

    /// Round the live value to the nearest step and publish it
    ///
    /// Every commit publishes, even when the value did not change.
    pub fn commit(&mut self) -> f64 {
        let value = self.range.quantize(self.live);
        self.live = value;
        self.committed.set(value);
        tracing::debug!(value, "value committed");
        value
    }

    /// Mark the user as interacting; returns whether this was a transition
    pub fn set_active(&mut self) -> bool {
        self.active.set_if_changed(true)
    }

    /// Commit, then clear the active flag and the keyboard entry
    pub fn clear_active(&mut self) -> f64 {
        let value = self.commit();
        self.entry.clear();
        self.active.set_if_changed(false);
        value
    }

    /// Pixel offset of the row list for the live value
    pub fn render_offset(&self, row_height: f32) -> f32 {
        render_offset(self.live, self.range.step(), row_height)
    }

    /// Receive the current value immediately, then every committed value
    pub fn live_value<F>(&mut self, mut callback: F) -> SubscriptionId
    where
        F: FnMut(f64) + Send + 'static,
    {
        callback(self.value());
        self.committed.subscribe(move |change| callback(change.new))
    }

    /// Observe every commit as an `(old, new)` change
    pub fn on_commit<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Change<f64>) + Send + 'static,
    {
        self.committed.subscribe(callback)
    }

    /// Observe active-flag transitions
    pub fn on_active_change<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Change<bool>) + Send + 'static,
    {
        self.active.subscribe(callback)
    }

    pub fn unsubscribe_value(&mut self, id: SubscriptionId) -> bool {
        self.committed.unsubscribe(id)
    }

    pub fn unsubscribe_active(&mut self, id: SubscriptionId) -> bool {
        self.active.unsubscribe(id)
    }

    /// Drop all value and active observers
    pub fn clear_subscribers(&mut self) {
        self.committed.clear_subscribers();
        self.active.clear_subscribers();
    }
}

impl std::fmt::Debug for WheelModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WheelModel")
            .field("range", &self.range)
            .field("value", &self.value())
            .field("live", &self.live)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const SPEED: f64 = 1.0 / 27.0;

    fn model(initial: f64) -> WheelModel {
        WheelModel::new(Range::new(0.0, 100.0, 0.5).unwrap(), initial, SPEED)
    }

    #[test]
    fn test_initial_value_is_quantized() {
        assert_eq!(model(10.0).value(), 10.0);
        assert_eq!(model(10.3).value(), 10.5);
        assert_eq!(model(250.0).value(), 100.0);
        assert_eq!(model(f64::NAN).value(), 0.0);
    }

    #[test]
    fn test_drag_then_commit() {
        let mut m = model(10.0);
        m.set_active();

        assert!(m.apply_drag(DragInput::Pan { delta_y: -81.0 }));
        assert_eq!(m.live(), 13.0);
        assert_eq!(m.value(), 10.0);

        assert_eq!(m.commit(), 13.0);
        assert_eq!(m.value(), 13.0);
    }

    #[test]
    fn test_drag_clamps_before_rounding() {
        let mut m = model(10.0);
        m.apply_drag(DragInput::Pan { delta_y: -27.0 * 95.0 });
        assert_eq!(m.live(), 100.0);

        m.apply_drag(DragInput::Pan { delta_y: 27.0 * 500.0 });
        assert_eq!(m.live(), 0.0);
    }

    #[test]
    fn test_pan_is_measured_from_committed_value() {
        let mut m = model(10.0);
        m.apply_drag(DragInput::Pan { delta_y: -27.0 });
        m.apply_drag(DragInput::Pan { delta_y: -54.0 });
        assert_eq!(m.live(), 12.0);
    }

    #[test]
    fn test_zero_drag_is_noop() {
        let mut m = model(10.0);
        assert!(!m.apply_drag(DragInput::Pan { delta_y: 0.0 }));
        assert!(!m.apply_drag(DragInput::Fling {
            velocity: 0.0,
            direction: DragDirection::Up,
        }));
        assert_eq!(m.live(), 10.0);
    }

    #[test]
    fn test_fling_scales_by_step() {
        let mut m = model(10.0);
        m.apply_drag(DragInput::Fling {
            velocity: 4.0,
            direction: DragDirection::Up,
        });
        assert_eq!(m.live(), 12.0);
        m.apply_drag(DragInput::Fling {
            velocity: 1.0,
            direction: DragDirection::Down,
        });
        assert_eq!(m.live(), 11.5);
    }

    #[test]
    fn test_commit_twice_is_stable() {
        let mut m = model(10.0);
        m.apply_drag(DragInput::Pan { delta_y: -30.0 });
        let first = m.commit();
        let second = m.commit();
        assert_eq!(first, second);
        assert_eq!(first, 11.0);
    }

    #[test]
    fn test_live_value_replays_then_follows_commits() {
        let mut m = model(10.0);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        m.live_value(move |v| seen_clone.lock().unwrap().push(v));
        assert_eq!(*seen.lock().unwrap(), vec![10.0]);

        m.apply_drag(DragInput::Pan { delta_y: -81.0 });
        assert_eq!(seen.lock().unwrap().len(), 1);

        m.clear_active();
        m.commit();
        assert_eq!(*seen.lock().unwrap(), vec![10.0, 13.0, 13.0]);
    }

    #[test]
    fn test_active_transitions_notify_once() {
        let mut m = model(10.0);
        let flips = Arc::new(Mutex::new(Vec::new()));

        let flips_clone = flips.clone();
        m.on_active_change(move |c| flips_clone.lock().unwrap().push(c.new));

        assert!(m.set_active());
        assert!(!m.set_active());
        m.clear_active();
        m.clear_active();
        assert_eq!(*flips.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_keyboard_entry() {
        let mut m = model(10.0);
        for c in ['4', '2', '.', '3'] {
            assert!(m.type_key(Key::Char(c)));
        }
        assert_eq!(m.entry(), "42.3");
        assert_eq!(m.live(), 42.5);

        assert!(m.type_key(Key::Backspace));
        assert_eq!(m.live(), 42.0);

        assert!(!m.type_key(Key::Char('x')));
        assert_eq!(m.clear_active(), 42.0);
        assert_eq!(m.entry(), "");
    }

    #[test]
    fn test_keyboard_entry_falls_back_on_garbage() {
        let mut m = model(10.0);
        m.type_key(Key::Char('-'));
        assert_eq!(m.live(), 10.0);

        m.type_key(Key::Char('5'));
        assert_eq!(m.live(), 0.0);

        m.type_key(Key::Char('-'));
        assert_eq!(m.entry(), "-5-");
        assert_eq!(m.live(), 0.0);
    }

    #[test]
    fn test_render_offset() {
        assert_eq!(render_offset(0.0, 0.5, 30.0), 60.0);
        assert_eq!(render_offset(10.0, 0.5, 30.0), -540.0);
        assert_eq!(model(13.0).render_offset(30.0), -720.0);
    }
}
