//! Spinwheel Core Runtime
//!
//! Foundational primitives for the spinwheel picker:
//!
//! - **Observables**: values with synchronous subscribe/publish
//! - **Timers**: cancelable one-shot timers on a host-driven clock
//! - **Keyboard routing**: namespaced listener registrations for the global key hook
//! - **Geometry**: points, sizes and rectangles used for positioning
//! - **Input**: gesture and keyboard event types reported by the host
//!
//! # Example
//!
//! ```rust
//! use spinwheel_core::observable::Observable;
//!
//! let mut active = Observable::new(false);
//! active.subscribe(|change| println!("active: {} -> {}", change.old, change.new));
//! active.set_if_changed(true);
//! ```

pub mod error;
pub mod geometry;
pub mod input;
pub mod keyboard;
pub mod observable;
pub mod timer;

pub use error::{Result, SpinError};
pub use geometry::{Point, Rect, Size};
pub use input::{DragDirection, DragInput, GestureEvent, Key, KeyboardEvent};
pub use keyboard::{KeyboardHub, ListenerId};
pub use observable::{Change, Observable, SubscriptionId};
pub use timer::{TimerId, TimerQueue};
