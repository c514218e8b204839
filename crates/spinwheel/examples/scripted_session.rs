//! Scripted Session Demo
//!
//! Drives two wheels through a fixed script of host events without any real
//! window, logging every frame and committed value.
//!
//! Features demonstrated:
//! - Loading options from TOML
//! - Drag gestures with commit on release
//! - Keyboard entry with the idle watchdog
//! - Blur grace period and viewport-aware placement
//! - Tearing down one wheel while another keeps working
//!
//! Run with: cargo run -p spinwheel --example scripted_session

use anyhow::Result;
use spinwheel::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const OPTIONS: &str = r#"
min = 0
max = 100
default = 10
step = 0.5
direction = "right"
"#;

/// Host that logs frames instead of drawing them
struct LogHost {
    name: &'static str,
    anchor: Rect,
    focused: Arc<AtomicBool>,
}

impl AnchorHost for LogHost {
    fn anchor_bounds(&self, _selector: Option<&str>) -> Option<Rect> {
        Some(self.anchor)
    }

    fn widget_metrics(&self) -> WidgetMetrics {
        WidgetMetrics::new(120.0, 150.0, 160.0)
    }

    fn viewport(&self) -> Size {
        Size::new(1024.0, 768.0)
    }

    fn has_focus(&self) -> bool {
        self.focused.load(Ordering::Relaxed)
    }

    fn focus_anchor(&mut self) {
        tracing::info!(wheel = self.name, "focus returned to anchor");
    }

    fn present(&mut self, frame: &WheelFrame) {
        tracing::info!(
            wheel = self.name,
            value = frame.value,
            offset = frame.list_offset,
            classes = ?frame.classes,
            visible = frame.visible,
            "frame"
        );
    }

    fn hide(&mut self) {
        tracing::info!(wheel = self.name, "hidden");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let options = SpinnerOptions::from_toml_str(OPTIONS)?;
    let runtime = SpinnerRuntime::shared();

    let weight_focus = Arc::new(AtomicBool::new(false));
    let weight = runtime.attach(
        Box::new(LogHost {
            name: "weight",
            anchor: Rect::new(100.0, 200.0, 50.0, 20.0),
            focused: Arc::clone(&weight_focus),
        }),
        options.clone(),
    )?;

    let reps_focus = Arc::new(AtomicBool::new(false));
    let reps = runtime.attach(
        Box::new(LogHost {
            name: "reps",
            anchor: Rect::new(960.0, 60.0, 40.0, 20.0),
            focused: Arc::clone(&reps_focus),
        }),
        options.step(1.0).initial(8.0),
    )?;

    weight.live_value(|value| tracing::info!(value, "weight committed"));
    reps.live_value(|value| tracing::info!(value, "reps committed"));

    // Drag the weight wheel up by three rows
    weight.focus();
    weight.gesture(GestureEvent::Touch);
    for delta_y in [-27.0, -54.0, -81.0] {
        weight.gesture(GestureEvent::Drag(DragInput::Pan { delta_y }));
        runtime.advance(16);
    }
    weight.gesture(GestureEvent::Release);

    // Leave the anchor; the wheel hides after the grace period
    weight.blur();
    runtime.advance(100);

    // Type into the reps wheel, which sits too close to the corner for `right`
    reps_focus.store(true, Ordering::Relaxed);
    reps.focus();
    if let Some(placement) = reps.update_position() {
        tracing::info!(direction = placement.direction.class_name(), "reps placement");
    }
    runtime.key_down(&KeyboardEvent::char('1'));
    runtime.key_down(&KeyboardEvent::char('2'));
    runtime.advance(2500);

    weight.remove();
    runtime.key_down(&KeyboardEvent::char('9'));
    runtime.key_down(&KeyboardEvent::new(Key::Enter));

    tracing::info!(
        weight_removed = weight.is_removed(),
        reps = ?reps.state(),
        "session finished"
    );
    Ok(())
}
