//! Observable values with synchronous change delivery
//!
//! An [`Observable<T>`] owns a value and a set of subscribers. Every
//! publication runs each subscriber before the publishing call returns.
//! There is no batching and no isolation between subscribers: delivery is
//! single-threaded and synchronous.
//!
//! ```rust
//! use spinwheel_core::observable::Observable;
//! use std::sync::{Arc, Mutex};
//!
//! let mut value = Observable::new(10.0_f64);
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let seen_clone = seen.clone();
//! let sub = value.subscribe(move |change| {
//!     seen_clone.lock().unwrap().push((change.old, change.new));
//! });
//!
//! value.set(12.5);
//! value.unsubscribe(sub);
//! value.set(13.0);
//!
//! assert_eq!(*seen.lock().unwrap(), vec![(10.0, 12.5)]);
//! ```

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identifier returned by [`Observable::subscribe`]
    pub struct SubscriptionId;
}

/// A published change
#[derive(Clone, Debug, PartialEq)]
pub struct Change<T> {
    /// Value before the publication
    pub old: T,
    /// Value after the publication
    pub new: T,
    /// Version after the publication (starts at 0, +1 per publication)
    pub version: u64,
}

type Subscriber<T> = Box<dyn FnMut(&Change<T>) + Send>;

/// A value that notifies subscribers when it is published
pub struct Observable<T> {
    value: T,
    /// Version counter for change detection
    version: u64,
    /// Subscribers (slot order; freed slots are reused)
    subscribers: SlotMap<SubscriptionId, Subscriber<T>>,
}

impl<T: Clone> Observable<T> {
    /// Create an observable with an initial value and no subscribers
    pub fn new(initial: T) -> Self {
        Self {
            value: initial,
            version: 0,
            subscribers: SlotMap::with_key(),
        }
    }

    /// Current value
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and notify every subscriber, even if it is unchanged
    pub fn set(&mut self, value: T) {
        let old = std::mem::replace(&mut self.value, value);
        self.version += 1;
        let change = Change {
            old,
            new: self.value.clone(),
            version: self.version,
        };
        for callback in self.subscribers.values_mut() {
            callback(&change);
        }
    }

    /// Replace the value and notify only when it differs from the current one
    ///
    /// Returns whether a publication happened.
    pub fn set_if_changed(&mut self, value: T) -> bool
    where
        T: PartialEq,
    {
        if self.value == value {
            return false;
        }
        self.set(value);
        true
    }

    /// Subscribe to future publications
    ///
    /// The callback is not invoked for the current value; callers that need
    /// replay-on-subscribe read [`Observable::get`] first.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Change<T>) + Send + 'static,
    {
        self.subscribers.insert(Box::new(callback))
    }

    /// Remove a subscriber; returns whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    /// Drop every subscriber
    pub fn clear_subscribers(&mut self) {
        self.subscribers.clear();
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("version", &self.version)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
