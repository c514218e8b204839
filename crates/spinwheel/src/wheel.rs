//! The spin-wheel widget
//!
//! `SpinWheel` ties the value model, the positioner and the lifecycle state
//! machine to one [`AnchorHost`]. It reacts to already-routed events; timers
//! and keyboard fan-out live in [`SpinnerRuntime`](crate::runtime::SpinnerRuntime).

use std::sync::Arc;

use smallvec::{smallvec, SmallVec};
use spinwheel_core::{Change, GestureEvent, Key, KeyboardEvent, Point, Result, SubscriptionId};

use crate::host::AnchorHost;
use crate::lifecycle::{LifecycleEvent, WheelPhase};
use crate::model::{WheelModel, WheelState};
use crate::options::SpinnerOptions;
use crate::position::{Placement, PlacementInput, Positioner};

/// Base class every wheel carries
pub const WHEEL_CLASS: &str = "pretty-spinner";

/// Class that draws the pointer arrow towards the anchor
pub const ARROW_CLASS: &str = "arrow_box";

/// Class added while the user interacts
pub const ACTIVE_CLASS: &str = "active";

/// Everything the host needs to draw one wheel
#[derive(Clone, Debug, PartialEq)]
pub struct WheelFrame {
    /// Style classes, e.g. `["pretty-spinner", "arrow_box", "right", "active"]`
    pub classes: SmallVec<[&'static str; 4]>,
    /// Row values, top to bottom
    pub rows: Arc<[f64]>,
    pub row_height: f32,
    /// Vertical offset of the row list
    pub list_offset: f32,
    /// Value currently under the selection slot
    pub value: f64,
    pub placement: Placement,
    pub visible: bool,
    pub active: bool,
    /// Contents of the keyboard entry box
    pub keyboard_entry: String,
    pub keyboard_visible: bool,
}

impl WheelFrame {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| *c == class)
    }
}

/// What a keystroke did to a wheel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Wheel not focused or detached
    Ignored,
    /// Keystroke went into the entry box; the wheel is active
    Editing,
    /// Enter committed the entry
    Committed,
}

/// A numeric picker attached to one anchor
pub struct SpinWheel {
    options: SpinnerOptions,
    model: WheelModel,
    positioner: Positioner,
    phase: WheelPhase,
    shown: bool,
    keyboard_visible: bool,
    placement: Placement,
    rows: Arc<[f64]>,
    host: Box<dyn AnchorHost>,
}

impl SpinWheel {
    /// Validate `options`, build the rows and present the initial frame
    ///
    /// The wheel starts attached but hidden; it appears on the first
    /// [`on_focus`](Self::on_focus).
    pub fn new(host: Box<dyn AnchorHost>, options: SpinnerOptions) -> Result<Self> {
        let range = options.validate()?;
        let model = WheelModel::new(range, options.initial, options.speed);
        let positioner = Positioner::new().guard_left_edge(options.guard_left_edge);
        let placement = Placement {
            direction: options.direction,
            offset: Point::ZERO,
        };

        let mut wheel = Self {
            rows: range.rows().into(),
            options,
            model,
            positioner,
            phase: WheelPhase::Detached,
            shown: false,
            keyboard_visible: false,
            placement,
            host,
        };
        wheel.transition(LifecycleEvent::Attach);
        wheel.render();
        Ok(wheel)
    }

    pub fn options(&self) -> &SpinnerOptions {
        &self.options
    }

    pub fn phase(&self) -> WheelPhase {
        self.phase
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn state(&self) -> WheelState {
        self.model.state()
    }

    /// Last committed value
    pub fn value(&self) -> f64 {
        self.model.value()
    }

    pub fn model(&self) -> &WheelModel {
        &self.model
    }

    /// Build the frame for the current state
    pub fn frame(&self) -> WheelFrame {
        let active = self.model.is_active();
        let mut classes: SmallVec<[&'static str; 4]> = smallvec![
            WHEEL_CLASS,
            ARROW_CLASS,
            self.placement.direction.class_name()
        ];
        if active {
            classes.push(ACTIVE_CLASS);
        }

        let row_height = self.options.spin_number_height;
        WheelFrame {
            classes,
            rows: Arc::clone(&self.rows),
            row_height,
            list_offset: self.model.render_offset(row_height),
            value: self.model.live(),
            placement: self.placement,
            visible: self.shown,
            active,
            keyboard_entry: self.model.entry().to_string(),
            keyboard_visible: self.keyboard_visible,
        }
    }

    /// Push the current frame to the host
    pub fn render(&mut self) {
        if !self.phase.is_attached() {
            return;
        }
        let frame = self.frame();
        self.host.present(&frame);
    }

    /// Recompute the placement from fresh host geometry
    pub fn update_position(&mut self) -> Placement {
        let input = PlacementInput {
            anchor: self.host.anchor_bounds(self.options.selector.as_deref()),
            widget: self.host.widget_metrics(),
            viewport: self.host.viewport(),
            direction: self.options.direction,
        };
        self.placement = self.positioner.place(&input);
        tracing::debug!(
            direction = self.placement.direction.class_name(),
            x = self.placement.offset.x,
            y = self.placement.offset.y,
            "wheel positioned"
        );

        if self.shown {
            self.render();
        }
        self.placement
    }

    /// Anchor gained focus: position and show
    pub fn on_focus(&mut self) {
        if !self.phase.is_attached() {
            return;
        }
        self.shown = true;
        self.update_position();
    }

    /// The blur grace period elapsed; hides unless the user is interacting
    ///
    /// Returns whether the wheel is hidden afterwards.
    pub fn on_blur_elapsed(&mut self) -> bool {
        if self.phase.is_active() {
            return false;
        }
        if self.shown {
            self.shown = false;
            self.host.hide();
            tracing::debug!("wheel hidden after blur");
        }
        true
    }

    pub fn on_gesture(&mut self, event: GestureEvent) {
        if !self.phase.is_attached() {
            return;
        }
        match event {
            GestureEvent::Touch => {
                self.activate(LifecycleEvent::TouchDown);
                self.render();
            }
            GestureEvent::Drag(input) => {
                // A drag always implies a touch
                let activated = self.activate(LifecycleEvent::TouchDown);
                if self.model.apply_drag(input) || activated {
                    self.render();
                }
            }
            GestureEvent::Release => {
                self.deactivate(LifecycleEvent::Release);
            }
        }
    }

    /// Handle a keystroke routed from the global key hook
    pub fn on_key(&mut self, event: &KeyboardEvent) -> KeyOutcome {
        if !self.phase.is_attached() || !self.host.has_focus() {
            return KeyOutcome::Ignored;
        }

        if event.key == Key::Enter && self.phase.is_active() {
            self.deactivate(LifecycleEvent::Release);
            return KeyOutcome::Committed;
        }

        self.activate(LifecycleEvent::KeyDown);
        self.keyboard_visible = true;
        self.model.type_key(event.key);
        self.render();
        KeyOutcome::Editing
    }

    /// The idle watchdog fired
    pub fn on_idle_timeout(&mut self) -> Option<f64> {
        self.deactivate(LifecycleEvent::IdleTimeout)
    }

    /// Receive the committed value now and after every commit
    pub fn live_value<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(f64) + Send + 'static,
    {
        self.model.live_value(callback)
    }

    /// Observe transitions of the active flag
    pub fn on_active_change<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Change<bool>) + Send + 'static,
    {
        self.model.on_active_change(callback)
    }

    pub fn unsubscribe_value(&mut self, id: SubscriptionId) -> bool {
        self.model.unsubscribe_value(id)
    }

    pub fn unsubscribe_active(&mut self, id: SubscriptionId) -> bool {
        self.model.unsubscribe_active(id)
    }

    /// Tear down: drop observers and hide
    pub fn detach(&mut self) {
        if !self.transition(LifecycleEvent::Remove) {
            return;
        }
        self.model.clear_subscribers();
        self.shown = false;
        self.keyboard_visible = false;
        self.host.hide();
    }

    fn activate(&mut self, event: LifecycleEvent) -> bool {
        if !self.transition(event) {
            return false;
        }
        self.model.set_active();
        true
    }

    /// Commit and leave the active phase, handing focus back to the anchor
    fn deactivate(&mut self, event: LifecycleEvent) -> Option<f64> {
        if !self.transition(event) {
            return None;
        }
        let value = self.model.clear_active();
        self.keyboard_visible = false;
        self.render();
        self.host.focus_anchor();
        Some(value)
    }

    fn transition(&mut self, event: LifecycleEvent) -> bool {
        match self.phase.on_event(event) {
            Some(next) => {
                tracing::debug!(from = ?self.phase, to = ?next, ?event, "wheel phase changed");
                self.phase = next;
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for SpinWheel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpinWheel")
            .field("phase", &self.phase)
            .field("shown", &self.shown)
            .field("placement", &self.placement)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
