//! Spinwheel
//!
//! A vertically scrolling numeric picker, in the style of native mobile
//! pickers, attached to anchor elements of a host application.
//!
//! - [`range`]: bounds, step and rounding
//! - [`model`]: live/committed value driven by drags and keystrokes
//! - [`position`]: viewport-aware placement next to the anchor
//! - [`lifecycle`]: detached/inactive/active state machine
//! - [`wheel`]: the widget tying these to an [`AnchorHost`]
//! - [`runtime`]: shared registry with timers and keyboard routing
//!
//! # Example
//!
//! ```rust,ignore
//! use spinwheel::prelude::*;
//!
//! let runtime = SpinnerRuntime::shared();
//! let handle = runtime.attach(Box::new(my_host), SpinnerOptions::default())?;
//!
//! handle.live_value(|value| println!("value: {value}"));
//!
//! // From the host's event loop
//! handle.focus();
//! handle.gesture(GestureEvent::Touch);
//! handle.gesture(GestureEvent::Drag(DragInput::Pan { delta_y: -81.0 }));
//! handle.gesture(GestureEvent::Release); // prints "value: 13"
//! runtime.advance(16);
//! ```

pub mod host;
pub mod lifecycle;
pub mod model;
pub mod options;
pub mod position;
pub mod range;
pub mod runtime;
pub mod wheel;

#[cfg(test)]
mod tests;

pub use host::AnchorHost;
pub use lifecycle::{LifecycleEvent, WheelPhase};
pub use model::{render_offset, WheelModel, WheelState};
pub use options::SpinnerOptions;
pub use position::{Direction, Placement, PlacementInput, Positioner, WidgetMetrics};
pub use range::Range;
pub use runtime::{SharedSpinnerRuntime, SpinnerRuntime, SpinnerRuntimeExt, WheelHandle, WheelId};
pub use wheel::{KeyOutcome, SpinWheel, WheelFrame};

pub use spinwheel_core::{
    DragDirection, DragInput, GestureEvent, Key, KeyboardEvent, Point, Rect, Result, Size,
    SpinError, SubscriptionId,
};

/// Prelude for hosts embedding the picker
pub mod prelude {
    pub use crate::host::AnchorHost;
    pub use crate::options::SpinnerOptions;
    pub use crate::position::{Direction, WidgetMetrics};
    pub use crate::runtime::{SharedSpinnerRuntime, SpinnerRuntime, SpinnerRuntimeExt, WheelHandle};
    pub use crate::wheel::WheelFrame;
    pub use spinwheel_core::{DragDirection, DragInput, GestureEvent, Key, KeyboardEvent, Rect, Size};
}
