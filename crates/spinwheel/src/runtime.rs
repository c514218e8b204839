//! Spinner runtime
//!
//! Owns every attached wheel together with the shared resources they use:
//! the namespaced keyboard hub and the timer queue. The host drives it from
//! its event loop:
//!
//! - anchor focus/blur and gestures are routed to a single wheel by id
//! - keystrokes arrive once through [`SpinnerRuntime::key_down`] and are
//!   fanned out to every registered wheel
//! - [`SpinnerRuntime::advance`] moves the clock and fires due timers
//!
//! Applications usually share the runtime as [`SharedSpinnerRuntime`] and
//! talk to individual wheels through [`WheelHandle`].
//!
//! Observer callbacks run while the runtime is borrowed (or locked, when
//! shared). They must not call back into the runtime.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use slotmap::{new_key_type, Key as _, SlotMap};
use spinwheel_core::{
    Change, GestureEvent, KeyboardEvent, KeyboardHub, Result, SubscriptionId, TimerId, TimerQueue,
};

use crate::host::AnchorHost;
use crate::model::WheelState;
use crate::options::SpinnerOptions;
use crate::position::Placement;
use crate::wheel::{KeyOutcome, SpinWheel, WheelFrame};

new_key_type! {
    /// Identifier of an attached wheel
    pub struct WheelId;
}

/// Namespace prefix of keyboard listener registrations
pub const KEYBOARD_NAMESPACE: &str = "keydown.spinwheel";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerKind {
    /// Hide the wheel unless it became active meanwhile
    BlurGrace(WheelId),
    /// Commit after a pause in typing
    IdleWatchdog(WheelId),
}

struct WheelSlot {
    wheel: SpinWheel,
    namespace: String,
    blur_timer: Option<TimerId>,
    idle_timer: Option<TimerId>,
}

/// Registry of attached wheels plus their timers and keyboard listeners
pub struct SpinnerRuntime {
    wheels: SlotMap<WheelId, WheelSlot>,
    keyboard: KeyboardHub<WheelId>,
    timers: TimerQueue<TimerKind>,
}

impl SpinnerRuntime {
    pub fn new() -> Self {
        Self {
            wheels: SlotMap::with_key(),
            keyboard: KeyboardHub::new(),
            timers: TimerQueue::new(),
        }
    }

    /// Wrap in `Arc<Mutex<..>>` for sharing with handles
    pub fn shared() -> SharedSpinnerRuntime {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Attach a wheel to `host`
    ///
    /// Fails only when `options` do not validate.
    pub fn attach(&mut self, host: Box<dyn AnchorHost>, options: SpinnerOptions) -> Result<WheelId> {
        let wheel = SpinWheel::new(host, options)?;

        let keyboard = &mut self.keyboard;
        let id = self.wheels.insert_with_key(|id| {
            let namespace = format!("{}.{}", KEYBOARD_NAMESPACE, id.data().as_ffi());
            keyboard.register(namespace.clone(), id);
            WheelSlot {
                wheel,
                namespace,
                blur_timer: None,
                idle_timer: None,
            }
        });

        tracing::debug!(?id, "wheel attached");
        Ok(id)
    }

    /// Detach a wheel, releasing its listener, timers and observers
    ///
    /// Returns `false` if the wheel was already gone.
    pub fn remove(&mut self, id: WheelId) -> bool {
        let Some(mut slot) = self.wheels.remove(id) else {
            return false;
        };

        self.keyboard.unregister_namespace(&slot.namespace);
        for timer in [slot.blur_timer.take(), slot.idle_timer.take()]
            .into_iter()
            .flatten()
        {
            self.timers.cancel(timer);
        }
        slot.wheel.detach();

        tracing::debug!(?id, "wheel removed");
        true
    }

    pub fn contains(&self, id: WheelId) -> bool {
        self.wheels.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.wheels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wheels.is_empty()
    }

    /// Borrow a wheel
    pub fn wheel(&self, id: WheelId) -> Option<&SpinWheel> {
        self.wheels.get(id).map(|slot| &slot.wheel)
    }

    /// Anchor gained focus: cancel a pending hide, reposition and show
    pub fn anchor_focus(&mut self, id: WheelId) {
        let Some(slot) = self.wheels.get_mut(id) else {
            return;
        };
        if let Some(timer) = slot.blur_timer.take() {
            self.timers.cancel(timer);
        }
        slot.wheel.on_focus();
    }

    /// Anchor lost focus: hide after the grace period unless refocused
    pub fn anchor_blur(&mut self, id: WheelId) {
        let Some(slot) = self.wheels.get_mut(id) else {
            return;
        };
        if let Some(timer) = slot.blur_timer.take() {
            self.timers.cancel(timer);
        }
        let delay = slot.wheel.options().blur_grace_ms;
        slot.blur_timer = Some(self.timers.schedule(delay, TimerKind::BlurGrace(id)));
    }

    /// Route a gesture to one wheel
    pub fn gesture(&mut self, id: WheelId, event: GestureEvent) {
        let Some(slot) = self.wheels.get_mut(id) else {
            return;
        };
        // Touch input supersedes a pending keyboard commit
        if let Some(timer) = slot.idle_timer.take() {
            self.timers.cancel(timer);
        }
        slot.wheel.on_gesture(event);
    }

    /// Fan a keystroke out to every registered wheel
    ///
    /// Only wheels whose anchor (or the wheel itself) has focus react.
    /// Returns whether any wheel handled the key.
    pub fn key_down(&mut self, event: &KeyboardEvent) -> bool {
        let mut handled = false;

        for id in self.keyboard.targets() {
            let Some(slot) = self.wheels.get_mut(id) else {
                continue;
            };

            match slot.wheel.on_key(event) {
                KeyOutcome::Ignored => continue,
                KeyOutcome::Editing => {
                    if let Some(timer) = slot.idle_timer.take() {
                        self.timers.cancel(timer);
                    }
                    let delay = slot.wheel.options().idle_timeout_ms;
                    slot.idle_timer = Some(self.timers.schedule(delay, TimerKind::IdleWatchdog(id)));
                }
                KeyOutcome::Committed => {
                    if let Some(timer) = slot.idle_timer.take() {
                        self.timers.cancel(timer);
                    }
                }
            }
            handled = true;
        }

        handled
    }

    /// Advance the clock by `dt_ms` and fire due timers
    ///
    /// Returns the number of timers that fired.
    pub fn advance(&mut self, dt_ms: u64) -> usize {
        let due = self.timers.advance(dt_ms);
        let fired = due.len();

        for (timer, kind) in due {
            match kind {
                TimerKind::BlurGrace(id) => {
                    if let Some(slot) = self.wheels.get_mut(id) {
                        if slot.blur_timer == Some(timer) {
                            slot.blur_timer = None;
                            slot.wheel.on_blur_elapsed();
                        }
                    }
                }
                TimerKind::IdleWatchdog(id) => {
                    if let Some(slot) = self.wheels.get_mut(id) {
                        if slot.idle_timer == Some(timer) {
                            slot.idle_timer = None;
                            if let Some(value) = slot.wheel.on_idle_timeout() {
                                tracing::debug!(?id, value, "idle timeout committed");
                            }
                        }
                    }
                }
            }
        }

        fired
    }

    /// Milliseconds on the runtime clock
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Re-run the positioner for a wheel
    pub fn update_position(&mut self, id: WheelId) -> Option<Placement> {
        self.wheels
            .get_mut(id)
            .map(|slot| slot.wheel.update_position())
    }

    /// Subscribe to committed values (called once immediately)
    pub fn live_value<F>(&mut self, id: WheelId, callback: F) -> Option<SubscriptionId>
    where
        F: FnMut(f64) + Send + 'static,
    {
        self.wheels
            .get_mut(id)
            .map(|slot| slot.wheel.live_value(callback))
    }

    /// Subscribe to active-flag transitions
    pub fn on_active_change<F>(&mut self, id: WheelId, callback: F) -> Option<SubscriptionId>
    where
        F: FnMut(&Change<bool>) + Send + 'static,
    {
        self.wheels
            .get_mut(id)
            .map(|slot| slot.wheel.on_active_change(callback))
    }

    /// Drop a [`live_value`](Self::live_value) subscription
    pub fn unsubscribe_value(&mut self, id: WheelId, subscription: SubscriptionId) -> bool {
        self.wheels
            .get_mut(id)
            .map_or(false, |slot| slot.wheel.unsubscribe_value(subscription))
    }

    /// Drop an [`on_active_change`](Self::on_active_change) subscription
    pub fn unsubscribe_active(&mut self, id: WheelId, subscription: SubscriptionId) -> bool {
        self.wheels
            .get_mut(id)
            .map_or(false, |slot| slot.wheel.unsubscribe_active(subscription))
    }

    pub fn state(&self, id: WheelId) -> Option<WheelState> {
        self.wheel(id).map(SpinWheel::state)
    }

    pub fn frame(&self, id: WheelId) -> Option<WheelFrame> {
        self.wheel(id).map(SpinWheel::frame)
    }

    /// Number of live keyboard listener registrations
    pub fn keyboard_listener_count(&self) -> usize {
        self.keyboard.len()
    }

    /// Whether a keyboard listener is registered under `namespace`
    pub fn has_keyboard_namespace(&self, namespace: &str) -> bool {
        self.keyboard.has_namespace(namespace)
    }

    /// Keyboard namespace of a wheel
    pub fn namespace(&self, id: WheelId) -> Option<&str> {
        self.wheels.get(id).map(|slot| slot.namespace.as_str())
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

impl Default for SpinnerRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SpinnerRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpinnerRuntime")
            .field("wheels", &self.wheels.len())
            .field("keyboard_listeners", &self.keyboard.len())
            .field("pending_timers", &self.timers.len())
            .finish()
    }
}

// ============================================================================
// Shared access
// ============================================================================

/// Runtime shared between the host event loop and wheel handles
pub type SharedSpinnerRuntime = Arc<Mutex<SpinnerRuntime>>;

/// Lock the runtime, recovering from a poisoned mutex
fn lock(runtime: &Mutex<SpinnerRuntime>) -> MutexGuard<'_, SpinnerRuntime> {
    runtime.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Entry points on the shared runtime
pub trait SpinnerRuntimeExt {
    /// Attach a wheel and return a handle to it
    fn attach(&self, host: Box<dyn AnchorHost>, options: SpinnerOptions) -> Result<WheelHandle>;
    /// Global keystroke hook
    fn key_down(&self, event: &KeyboardEvent) -> bool;
    /// Move the clock forward
    fn advance(&self, dt_ms: u64) -> usize;
    /// Handle for an already attached wheel
    fn handle(&self, id: WheelId) -> Option<WheelHandle>;
}

impl SpinnerRuntimeExt for SharedSpinnerRuntime {
    fn attach(&self, host: Box<dyn AnchorHost>, options: SpinnerOptions) -> Result<WheelHandle> {
        let id = lock(self).attach(host, options)?;
        Ok(WheelHandle {
            id,
            runtime: Arc::downgrade(self),
        })
    }

    fn key_down(&self, event: &KeyboardEvent) -> bool {
        lock(self).key_down(event)
    }

    fn advance(&self, dt_ms: u64) -> usize {
        lock(self).advance(dt_ms)
    }

    fn handle(&self, id: WheelId) -> Option<WheelHandle> {
        lock(self).contains(id).then(|| WheelHandle {
            id,
            runtime: Arc::downgrade(self),
        })
    }
}

/// A weak handle to one attached wheel
///
/// Does not keep the runtime alive. Once the runtime is dropped or the wheel
/// removed, every operation is a no-op.
#[derive(Clone)]
pub struct WheelHandle {
    id: WheelId,
    runtime: Weak<Mutex<SpinnerRuntime>>,
}

impl WheelHandle {
    pub fn id(&self) -> WheelId {
        self.id
    }

    fn with<R>(&self, f: impl FnOnce(&mut SpinnerRuntime) -> R) -> Option<R> {
        let runtime = self.runtime.upgrade()?;
        let mut guard = lock(&runtime);
        Some(f(&mut guard))
    }

    /// Receive the committed value now and after every commit
    pub fn live_value<F>(&self, callback: F) -> Option<SubscriptionId>
    where
        F: FnMut(f64) + Send + 'static,
    {
        self.with(|rt| rt.live_value(self.id, callback)).flatten()
    }

    /// Observe active-flag transitions
    pub fn on_active_change<F>(&self, callback: F) -> Option<SubscriptionId>
    where
        F: FnMut(&Change<bool>) + Send + 'static,
    {
        self.with(|rt| rt.on_active_change(self.id, callback))
            .flatten()
    }

    pub fn unsubscribe_value(&self, subscription: SubscriptionId) -> bool {
        self.with(|rt| rt.unsubscribe_value(self.id, subscription))
            .unwrap_or(false)
    }

    pub fn unsubscribe_active(&self, subscription: SubscriptionId) -> bool {
        self.with(|rt| rt.unsubscribe_active(self.id, subscription))
            .unwrap_or(false)
    }

    /// Re-run the positioner, e.g. after the page layout changed
    pub fn update_position(&self) -> Option<Placement> {
        self.with(|rt| rt.update_position(self.id)).flatten()
    }

    /// Detach the wheel
    pub fn remove(&self) -> bool {
        self.with(|rt| rt.remove(self.id)).unwrap_or(false)
    }

    pub fn focus(&self) {
        self.with(|rt| rt.anchor_focus(self.id));
    }

    pub fn blur(&self) {
        self.with(|rt| rt.anchor_blur(self.id));
    }

    pub fn gesture(&self, event: GestureEvent) {
        self.with(|rt| rt.gesture(self.id, event));
    }

    pub fn state(&self) -> Option<WheelState> {
        self.with(|rt| rt.state(self.id)).flatten()
    }

    pub fn frame(&self) -> Option<WheelFrame> {
        self.with(|rt| rt.frame(self.id)).flatten()
    }

    /// Whether the wheel (or the whole runtime) is gone
    pub fn is_removed(&self) -> bool {
        self.with(|rt| !rt.contains(self.id)).unwrap_or(true)
    }
}

impl std::fmt::Debug for WheelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WheelHandle").field("id", &self.id).finish()
    }
}
