//! End-to-end scenarios through the shared runtime

use std::sync::{Arc, Mutex};

use crate::prelude::*;
use crate::runtime::KEYBOARD_NAMESPACE;

#[derive(Default)]
struct HostState {
    focused: bool,
    frames: Vec<WheelFrame>,
    visible: bool,
    hides: usize,
    refocus: usize,
}

#[derive(Clone, Default)]
struct FakeHost {
    state: Arc<Mutex<HostState>>,
    anchor: Option<Rect>,
}

impl FakeHost {
    fn at(anchor: Rect) -> Self {
        Self {
            anchor: Some(anchor),
            ..Self::default()
        }
    }

    fn set_focused(&self, focused: bool) {
        self.state.lock().unwrap().focused = focused;
    }

    fn last_frame(&self) -> WheelFrame {
        self.state.lock().unwrap().frames.last().cloned().unwrap()
    }

    fn visible(&self) -> bool {
        self.state.lock().unwrap().visible
    }
}

impl AnchorHost for FakeHost {
    fn anchor_bounds(&self, _selector: Option<&str>) -> Option<Rect> {
        self.anchor
    }

    fn widget_metrics(&self) -> WidgetMetrics {
        WidgetMetrics::new(120.0, 150.0, 160.0)
    }

    fn viewport(&self) -> Size {
        Size::new(1024.0, 768.0)
    }

    fn has_focus(&self) -> bool {
        self.state.lock().unwrap().focused
    }

    fn focus_anchor(&mut self) {
        self.state.lock().unwrap().refocus += 1;
    }

    fn present(&mut self, frame: &WheelFrame) {
        let mut state = self.state.lock().unwrap();
        state.visible = frame.visible;
        state.frames.push(frame.clone());
    }

    fn hide(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.visible = false;
        state.hides += 1;
    }
}

fn recorder() -> (Arc<Mutex<Vec<f64>>>, impl FnMut(f64) + Send + 'static) {
    let values = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&values);
    (values, move |v| sink.lock().unwrap().push(v))
}

fn attach(runtime: &SharedSpinnerRuntime, host: &FakeHost) -> WheelHandle {
    runtime
        .attach(Box::new(host.clone()), SpinnerOptions::default())
        .unwrap()
}

#[test]
fn test_drag_up_three_rows_commits_thirteen() {
    let runtime = SpinnerRuntime::shared();
    let host = FakeHost::at(Rect::new(100.0, 200.0, 50.0, 20.0));
    let handle = attach(&runtime, &host);

    let (values, callback) = recorder();
    handle.live_value(callback);
    assert_eq!(*values.lock().unwrap(), vec![10.0]);

    handle.focus();
    assert!(host.visible());

    handle.gesture(GestureEvent::Touch);
    handle.gesture(GestureEvent::Drag(DragInput::Pan { delta_y: -81.0 }));
    assert_eq!(host.last_frame().value, 13.0);
    assert_eq!(values.lock().unwrap().len(), 1);

    handle.gesture(GestureEvent::Release);
    assert_eq!(*values.lock().unwrap(), vec![10.0, 13.0]);
    assert_eq!(
        handle.state(),
        Some(crate::WheelState {
            value: 13.0,
            active: false,
        })
    );
}

#[test]
fn test_overshoot_clamps_to_max() {
    let runtime = SpinnerRuntime::shared();
    let host = FakeHost::at(Rect::new(100.0, 200.0, 50.0, 20.0));
    let handle = attach(&runtime, &host);

    let (values, callback) = recorder();
    handle.live_value(callback);

    handle.gesture(GestureEvent::Touch);
    handle.gesture(GestureEvent::Drag(DragInput::Pan { delta_y: -5000.0 }));
    assert_eq!(host.last_frame().value, 100.0);
    handle.gesture(GestureEvent::Release);

    assert_eq!(*values.lock().unwrap(), vec![10.0, 100.0]);
}

#[test]
fn test_blur_hides_after_grace_period() {
    let runtime = SpinnerRuntime::shared();
    let host = FakeHost::at(Rect::new(100.0, 200.0, 50.0, 20.0));
    let handle = attach(&runtime, &host);

    handle.focus();
    handle.blur();
    assert_eq!(runtime.advance(99), 0);
    assert!(host.visible());

    assert_eq!(runtime.advance(1), 1);
    assert!(!host.visible());
}

#[test]
fn test_refocus_cancels_pending_hide() {
    let runtime = SpinnerRuntime::shared();
    let host = FakeHost::at(Rect::new(100.0, 200.0, 50.0, 20.0));
    let handle = attach(&runtime, &host);

    handle.focus();
    handle.blur();
    runtime.advance(50);
    handle.focus();

    assert_eq!(runtime.advance(500), 0);
    assert!(host.visible());
    assert_eq!(host.state.lock().unwrap().hides, 0);
}

#[test]
fn test_blur_while_active_keeps_wheel_visible() {
    let runtime = SpinnerRuntime::shared();
    let host = FakeHost::at(Rect::new(100.0, 200.0, 50.0, 20.0));
    let handle = attach(&runtime, &host);

    handle.focus();
    handle.gesture(GestureEvent::Touch);
    handle.blur();
    runtime.advance(100);
    assert!(host.visible());

    // Release hands focus back to the anchor
    handle.gesture(GestureEvent::Release);
    assert_eq!(host.state.lock().unwrap().refocus, 1);
}

#[test]
fn test_typing_commits_after_idle_timeout() {
    let runtime = SpinnerRuntime::shared();
    let host = FakeHost::at(Rect::new(100.0, 200.0, 50.0, 20.0));
    let handle = attach(&runtime, &host);
    host.set_focused(true);

    let (values, callback) = recorder();
    handle.live_value(callback);

    assert!(runtime.key_down(&KeyboardEvent::char('4')));
    runtime.advance(2000);
    assert!(runtime.key_down(&KeyboardEvent::char('2')));

    // The second keystroke restarted the watchdog
    runtime.advance(2000);
    assert_eq!(*values.lock().unwrap(), vec![10.0]);
    assert!(host.last_frame().keyboard_visible);
    assert_eq!(host.last_frame().value, 42.0);

    runtime.advance(500);
    assert_eq!(*values.lock().unwrap(), vec![10.0, 42.0]);
    assert!(!host.last_frame().keyboard_visible);
    assert_eq!(handle.state().map(|s| s.active), Some(false));
}

#[test]
fn test_enter_commits_immediately() {
    let runtime = SpinnerRuntime::shared();
    let host = FakeHost::at(Rect::new(100.0, 200.0, 50.0, 20.0));
    let handle = attach(&runtime, &host);
    host.set_focused(true);

    let (values, callback) = recorder();
    handle.live_value(callback);

    for c in "7.3".chars() {
        runtime.key_down(&KeyboardEvent::char(c));
    }
    runtime.key_down(&KeyboardEvent::new(Key::Enter));
    assert_eq!(*values.lock().unwrap(), vec![10.0, 7.5]);

    let locked = runtime.lock().unwrap();
    assert_eq!(locked.pending_timers(), 0);
}

#[test]
fn test_invalid_keyboard_input_keeps_prior_value() {
    let runtime = SpinnerRuntime::shared();
    let host = FakeHost::at(Rect::new(100.0, 200.0, 50.0, 20.0));
    let handle = attach(&runtime, &host);
    host.set_focused(true);

    runtime.key_down(&KeyboardEvent::char('.'));
    assert_eq!(host.last_frame().value, 10.0);
    runtime.key_down(&KeyboardEvent::char('x'));
    assert_eq!(host.last_frame().keyboard_entry, ".");

    runtime.advance(2500);
    assert_eq!(handle.state().map(|s| s.value), Some(10.0));
}

#[test]
fn test_keys_ignored_without_focus() {
    let runtime = SpinnerRuntime::shared();
    let host = FakeHost::at(Rect::new(100.0, 200.0, 50.0, 20.0));
    let handle = attach(&runtime, &host);

    assert!(!runtime.key_down(&KeyboardEvent::char('5')));
    assert_eq!(handle.state().map(|s| s.active), Some(false));
    assert_eq!(runtime.lock().unwrap().pending_timers(), 0);
}

#[test]
fn test_removal_leaves_other_instance_working() {
    let runtime = SpinnerRuntime::shared();
    let first_host = FakeHost::at(Rect::new(100.0, 200.0, 50.0, 20.0));
    let second_host = FakeHost::at(Rect::new(100.0, 400.0, 50.0, 20.0));
    let first = attach(&runtime, &first_host);
    let second = attach(&runtime, &second_host);
    first_host.set_focused(true);
    second_host.set_focused(true);

    let (first_values, first_cb) = recorder();
    let (second_values, second_cb) = recorder();
    first.live_value(first_cb);
    second.live_value(second_cb);

    let first_namespace = {
        let locked = runtime.lock().unwrap();
        assert_eq!(locked.keyboard_listener_count(), 2);
        locked.namespace(first.id()).map(str::to_owned).unwrap()
    };
    assert!(first_namespace.starts_with(KEYBOARD_NAMESPACE));

    first.focus();
    first.blur();
    assert!(first.remove());
    assert!(first.is_removed());
    assert!(!first.remove());

    {
        let locked = runtime.lock().unwrap();
        assert_eq!(locked.keyboard_listener_count(), 1);
        assert!(!locked.has_keyboard_namespace(&first_namespace));
        assert_eq!(locked.pending_timers(), 0);
    }
    assert_eq!(first_host.state.lock().unwrap().hides, 1);

    runtime.key_down(&KeyboardEvent::char('3'));
    runtime.key_down(&KeyboardEvent::new(Key::Enter));
    first.gesture(GestureEvent::Touch);
    first.gesture(GestureEvent::Release);

    assert_eq!(*first_values.lock().unwrap(), vec![10.0]);
    assert_eq!(*second_values.lock().unwrap(), vec![10.0, 3.0]);
}

#[test]
fn test_handle_outliving_runtime_is_inert() {
    let runtime = SpinnerRuntime::shared();
    let host = FakeHost::at(Rect::new(100.0, 200.0, 50.0, 20.0));
    let handle = attach(&runtime, &host);
    drop(runtime);

    assert!(handle.is_removed());
    assert_eq!(handle.state(), None);
    assert_eq!(handle.live_value(|_| {}), None);
    assert!(!handle.remove());
    handle.gesture(GestureEvent::Touch);
}

#[test]
fn test_update_position_follows_layout() {
    let runtime = SpinnerRuntime::shared();
    let host = FakeHost::at(Rect::new(950.0, 200.0, 50.0, 20.0));
    let handle = attach(&runtime, &host);

    handle.focus();
    let frame = host.last_frame();
    assert_eq!(frame.placement.direction, Direction::Top);
    assert!(frame.has_class("top"));
    assert!(!frame.has_class("right"));

    // Same geometry yields the same placement on every call
    assert_eq!(handle.update_position(), Some(frame.placement));
}

#[test]
fn test_invalid_options_fail_to_attach() {
    let runtime = SpinnerRuntime::shared();
    let result = runtime.attach(
        Box::new(FakeHost::default()),
        SpinnerOptions::new().range(10.0, 0.0),
    );
    assert!(matches!(result, Err(crate::SpinError::InvalidRange { .. })));

    let oversized = runtime.attach(
        Box::new(FakeHost::default()),
        SpinnerOptions::new().range(0.0, 1e12).step(0.001),
    );
    assert!(matches!(
        oversized,
        Err(crate::SpinError::InvalidOption { name: "step", .. })
    ));
    assert!(runtime.lock().unwrap().is_empty());
}

#[test]
fn test_drag_supersedes_pending_keyboard_commit() {
    let runtime = SpinnerRuntime::shared();
    let host = FakeHost::at(Rect::new(100.0, 200.0, 50.0, 20.0));
    let handle = attach(&runtime, &host);
    host.set_focused(true);

    let (values, callback) = recorder();
    handle.live_value(callback);

    runtime.key_down(&KeyboardEvent::char('4'));
    handle.gesture(GestureEvent::Touch);
    handle.gesture(GestureEvent::Drag(DragInput::Pan { delta_y: -27.0 }));

    assert_eq!(runtime.advance(2500), 0);
    assert_eq!(handle.state().map(|s| s.active), Some(true));
    assert_eq!(*values.lock().unwrap(), vec![10.0]);

    handle.gesture(GestureEvent::Release);
    assert_eq!(*values.lock().unwrap(), vec![10.0, 11.0]);
    assert_eq!(handle.state().map(|s| s.active), Some(false));
}

#[test]
fn test_repeated_blur_restarts_grace_period() {
    let runtime = SpinnerRuntime::shared();
    let host = FakeHost::at(Rect::new(100.0, 200.0, 50.0, 20.0));
    let handle = attach(&runtime, &host);

    handle.focus();
    handle.blur();
    runtime.advance(50);
    handle.blur();
    assert_eq!(runtime.lock().unwrap().pending_timers(), 1);

    assert_eq!(runtime.advance(50), 0);
    assert!(host.visible());

    assert_eq!(runtime.advance(50), 1);
    assert!(!host.visible());
    assert_eq!(host.state.lock().unwrap().hides, 1);
}
