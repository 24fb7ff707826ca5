use imgui::Ui;

use crate::view::{ControlAction, ControlLabels};

const PANEL_POSITION: [f32; 2] = [10.0, 10.0];

/// Change, play/pause and light placement buttons.
///
/// Returns the button pressed this frame, if any.
pub fn controls(ui: &Ui, labels: ControlLabels) -> Option<ControlAction> {
    let mut action = None;

    ui.window("Controls")
        .position(PANEL_POSITION, imgui::Condition::FirstUseEver)
        .always_auto_resize(true)
        .collapsible(false)
        .build(|| {
            ui.text("Change");
            if ui.button("Model") {
                action = Some(ControlAction::CycleModel);
            }
            ui.same_line();
            if ui.button("Shading Mode") {
                action = Some(ControlAction::CycleShading);
            }

            ui.separator();
            if ui.button(labels.pause) {
                action = Some(ControlAction::TogglePause);
            }

            ui.separator();
            ui.text("Light Position");
            if ui.button(labels.light_fixed) {
                action = Some(ControlAction::ToggleLightFixed);
            }
            ui.same_line();
            if ui.button(labels.light_front) {
                action = Some(ControlAction::ToggleLightFront);
            }
        });

    action
}
