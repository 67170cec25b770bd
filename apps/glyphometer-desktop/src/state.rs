use egui::Context as EguiContext;
use glyphometer_digits::{AutoIncrement, DigitSequence};
use glyphometer_render::{RenderView, ShapeSet};

/// Application state, owned by the event loop and passed into each step.
pub struct AppState {
    pub digits: DigitSequence,
    pub auto: AutoIncrement,
    /// Frames presented so far.
    pub frame: u64,
    pub shapes: ShapeSet,
}

impl AppState {
    pub fn new(digit_count: usize, auto_interval: u32) -> Self {
        Self {
            digits: DigitSequence::new(digit_count),
            auto: AutoIncrement::new(auto_interval),
            frame: 0,
            shapes: ShapeSet::builtin(),
        }
    }

    /// Per-frame update after the UI has run: auto tick, then the clamp pass.
    pub fn update(&mut self) {
        if self.auto.fires(self.frame) {
            self.digits.increment();
            tracing::debug!(frame = self.frame, digits = ?self.digits.as_slice(), "auto increment");
        }
        self.digits.clamp(self.shapes.max_index());
    }

    /// Start a frame once `acquire` yields a target to present into.
    ///
    /// Returns `None` without updating when no target is available, so a
    /// skipped present neither advances the frame nor fires the odometer.
    pub fn begin_frame<T>(&mut self, acquire: impl FnOnce() -> Option<T>) -> Option<T> {
        let target = acquire()?;
        self.update();
        Some(target)
    }

    pub fn view(&self) -> RenderView {
        RenderView {
            frame: self.frame,
            ..RenderView::default()
        }
    }

    pub fn end_frame(&mut self) {
        self.frame += 1;
    }

    pub fn draw_ui(&mut self, ctx: &EguiContext) {
        egui::Window::new("glyphometer")
            .default_pos([10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                for (slot, digit) in self.digits.as_mut_slice().iter_mut().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(format!("digit {slot}"));
                        if ui.small_button("-").clicked() {
                            *digit = digit.saturating_sub(1);
                        }
                        ui.add(egui::DragValue::new(digit).speed(0.1));
                        if ui.small_button("+").clicked() {
                            *digit = digit.saturating_add(1);
                        }
                    });
                }
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("increment").clicked() {
                        self.digits.increment();
                    }
                    if ui.button("reset").clicked() {
                        self.digits.reset();
                    }
                });
                ui.checkbox(&mut self.auto.enabled, "auto increment");
                ui.small(format!(
                    "frame {} | tick every {} frames",
                    self.frame,
                    self.auto.interval()
                ));
                ui.small("Esc / Q: quit");
            });
    }
}
