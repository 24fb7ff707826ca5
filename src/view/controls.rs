//! Control panel actions and their mapping onto controller callbacks.

use crate::interaction::{InteractionController, ViewerHost};

/// A button press on the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    CycleModel,
    CycleShading,
    TogglePause,
    ToggleLightFixed,
    ToggleLightFront,
}

/// Current button captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlLabels {
    pub pause: &'static str,
    pub light_fixed: &'static str,
    pub light_front: &'static str,
}

impl ControlLabels {
    pub fn from_controller(controller: &InteractionController) -> Self {
        Self {
            pause: controller.pause_label(),
            light_fixed: controller.light_fixed_label(),
            light_front: controller.light_front_label(),
        }
    }
}

/// Runs the controller callback bound to `action`.
pub fn dispatch<H: ViewerHost>(
    action: ControlAction,
    controller: &mut InteractionController,
    host: &mut H,
) -> bool {
    match action {
        ControlAction::CycleModel => controller.on_cycle_model(host),
        ControlAction::CycleShading => controller.on_cycle_shading(host),
        ControlAction::TogglePause => controller.on_toggle_pause(host),
        ControlAction::ToggleLightFixed => controller.on_toggle_light_fixed(host),
        ControlAction::ToggleLightFront => controller.on_toggle_light_front(host),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationControl, AnimationHandle, SpinAnimation, SpinAnimator};
    use crate::catalog::{ModelAsset, ShadingMode};
    use crate::config::ViewerConfig;
    use cgmath::{Quaternion, Vector2, Vector3};

    #[derive(Default)]
    struct QuietHost {
        animator: SpinAnimator,
        reloads: usize,
    }

    impl AnimationControl for QuietHost {
        fn play(&mut self, handle: AnimationHandle) {
            self.animator.play(handle)
        }

        fn pause(&mut self, handle: AnimationHandle) {
            self.animator.pause(handle)
        }

        fn is_playing(&self, handle: AnimationHandle) -> bool {
            self.animator.is_playing(handle)
        }
    }

    impl ViewerHost for QuietHost {
        fn set_model_orientation(&mut self, _: usize, _: Quaternion<f32>) {}
        fn set_light_position(&mut self, _: Vector3<f32>) {}
        fn set_light_proxy_position(&mut self, _: Vector2<f32>) {}
        fn set_light_proxy_visible(&mut self, _: bool) {}
        fn set_light_proxy_front(&mut self, _: bool) {}
        fn reload_models(&mut self, _: &ModelAsset, _: ShadingMode) {
            self.reloads += 1;
        }
    }

    #[test]
    fn test_buttons_drive_controller() {
        let mut host = QuietHost::default();
        let handle = host.animator.spawn(SpinAnimation::new(15.0, 1.0));
        let mut controller =
            InteractionController::new(&ViewerConfig::default(), Vector2::new(800.0, 600.0), [handle]);
        controller.initialize(&mut host);

        let labels = ControlLabels::from_controller(&controller);
        assert_eq!(labels.pause, "  ||  ");
        assert_eq!(labels.light_fixed, "FIXED");
        assert_eq!(labels.light_front, "FRONT");

        for action in [
            ControlAction::TogglePause,
            ControlAction::ToggleLightFixed,
            ControlAction::ToggleLightFront,
        ] {
            assert!(dispatch(action, &mut controller, &mut host));
        }
        let labels = ControlLabels::from_controller(&controller);
        assert_eq!(labels.pause, "  >  ");
        assert_eq!(labels.light_fixed, "MANUAL");
        assert_eq!(labels.light_front, "BACK");
        assert!(!host.is_playing(handle));

        assert!(dispatch(ControlAction::CycleModel, &mut controller, &mut host));
        assert!(dispatch(ControlAction::CycleShading, &mut controller, &mut host));
        assert_eq!(host.reloads, 3);
        assert_eq!(controller.catalog().model_index(), 2);
    }
}
