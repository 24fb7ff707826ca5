//! # Interaction Controller
//!
//! Turns tagged touch events and button presses into model orientations,
//! light placement and animation play state. The controller owns only small
//! bookkeeping; everything it changes on screen goes through [`ViewerHost`].

use cgmath::{Quaternion, Rad, Rotation3, Vector2, Vector3};
use log::{debug, info, warn};

use super::entity::EntityTag;
use super::state::{ActiveEntity, GesturePhase, InteractionState, TouchPhase};
use crate::animation::{AnimationControl, AnimationHandle};
use crate::catalog::{ModelAsset, ModelCatalog, ShadingMode};
use crate::config::ViewerConfig;
use crate::lighting::{compute_light_position, LightModel, LightPlacementMode};

pub const PAUSE_LABEL: &str = "  ||  ";
pub const PLAY_LABEL: &str = "  >  ";
pub const FIXED_LABEL: &str = "FIXED";
pub const MANUAL_LABEL: &str = "MANUAL";
pub const FRONT_LABEL: &str = "FRONT";
pub const BACK_LABEL: &str = "BACK";

/// The presentation side the controller drives.
///
/// Animation play state comes from the [`AnimationControl`] supertrait; the
/// controller only ever plays or pauses handles it was given.
pub trait ViewerHost: AnimationControl {
    /// Overwrites the orientation of the model in `slot`.
    fn set_model_orientation(&mut self, slot: usize, orientation: Quaternion<f32>);

    /// Pushes a new light position into every model.
    fn set_light_position(&mut self, position: Vector3<f32>);

    fn set_light_proxy_position(&mut self, screen_pos: Vector2<f32>);

    fn set_light_proxy_visible(&mut self, visible: bool);

    /// Selects the front or back proxy image.
    fn set_light_proxy_front(&mut self, front: bool);

    /// Replaces the mesh in every model slot.
    fn reload_models(&mut self, model: &ModelAsset, shading: ShadingMode);
}

/// Per-slot state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelEntry {
    /// Accumulated (pitch, yaw) from manual rotation
    pub rotation: Vector2<f32>,
    pub animation: AnimationHandle,
}

impl ModelEntry {
    pub fn new(animation: AnimationHandle) -> Self {
        Self {
            rotation: Vector2::new(0.0, 0.0),
            animation,
        }
    }
}

/// Orientation for an accumulated (pitch, yaw) pair.
pub fn orientation_from_rotation(rotation: Vector2<f32>) -> Quaternion<f32> {
    Quaternion::from_angle_x(Rad(rotation.x)) * Quaternion::from_angle_y(Rad(rotation.y))
}

pub struct InteractionController {
    sensitivity: Vector2<f32>,
    models: Vec<ModelEntry>,
    state: InteractionState,
    global_pause: bool,
    light: LightModel,
    stage_extent: Vector2<f32>,
    catalog: ModelCatalog,
}

impl InteractionController {
    /// One model slot per animation handle, in slot order.
    pub fn new(
        config: &ViewerConfig,
        stage_extent: Vector2<f32>,
        animations: impl IntoIterator<Item = AnimationHandle>,
    ) -> Self {
        Self {
            sensitivity: config.rotation_sensitivity,
            models: animations.into_iter().map(ModelEntry::new).collect(),
            state: InteractionState::default(),
            global_pause: false,
            light: LightModel::new(stage_extent)
                .with_fixed_depth_factor(config.fixed_light_depth_factor),
            stage_extent,
            catalog: config.catalog(),
        }
    }

    /// Loads the current model, applies the light mode and starts every spin.
    pub fn initialize<H: ViewerHost>(&mut self, host: &mut H) {
        self.reload(host);
        self.apply_light_mode(host);
        if !self.global_pause {
            for entry in &self.models {
                host.play(entry.animation);
            }
        }
    }

    /// Stage size changed; the light is recomputed for the new extent.
    pub fn resize<H: ViewerHost>(&mut self, stage_extent: Vector2<f32>, host: &mut H) {
        self.stage_extent = stage_extent;
        host.set_light_position(self.light.position(stage_extent));
    }

    /// Handles one touch event. Always reports the event as consumed.
    pub fn on_touch<H: ViewerHost>(
        &mut self,
        tag: EntityTag,
        phase: TouchPhase,
        screen_pos: Vector2<f32>,
        host: &mut H,
    ) -> bool {
        match phase {
            TouchPhase::Down => self.on_down(tag, screen_pos, host),
            TouchPhase::Motion => self.on_motion(screen_pos, host),
            TouchPhase::Up | TouchPhase::Interrupted => self.on_release(host),
            TouchPhase::Stationary => {}
        }
        true
    }

    fn on_down<H: ViewerHost>(&mut self, tag: EntityTag, screen_pos: Vector2<f32>, host: &mut H) {
        match tag {
            EntityTag::Model { slot } => {
                let entry = *self.entry(slot);
                host.pause(entry.animation);
                self.state
                    .begin(ActiveEntity::Model { slot }, screen_pos, entry.rotation);
                debug!("Selected model slot {}", slot);
            }
            EntityTag::LightProxy => {
                self.state
                    .begin(ActiveEntity::LightProxy, screen_pos, Vector2::new(0.0, 0.0));
                debug!("Grabbed light proxy");
            }
            EntityTag::Other => {}
        }
    }

    fn on_motion<H: ViewerHost>(&mut self, screen_pos: Vector2<f32>, host: &mut H) {
        match self.state.active {
            ActiveEntity::Model { slot } => {
                let displacement = screen_pos - self.state.gesture_start;
                let start = self.state.rotation_at_gesture_start;
                let rotation = Vector2::new(
                    start.x - displacement.y / self.sensitivity.y,
                    start.y + displacement.x / self.sensitivity.x,
                );

                self.entry_mut(slot).rotation = rotation;
                self.state.mark_dragging();
                host.set_model_orientation(slot, orientation_from_rotation(rotation));
            }
            ActiveEntity::LightProxy => {
                self.light.move_proxy(screen_pos);
                self.state.mark_dragging();
                host.set_light_proxy_position(screen_pos);

                let manual = LightPlacementMode {
                    fixed: false,
                    ..self.light.mode()
                };
                host.set_light_position(compute_light_position(
                    manual,
                    self.stage_extent,
                    screen_pos,
                ));
            }
            ActiveEntity::None => {}
        }
    }

    fn on_release<H: ViewerHost>(&mut self, host: &mut H) {
        if let Some(slot) = self.state.held_model() {
            if !self.global_pause {
                host.play(self.entry(slot).animation);
            }
        }
        self.state.reset();
    }

    /// Advances to the next model and reloads every slot.
    pub fn on_cycle_model<H: ViewerHost>(&mut self, host: &mut H) -> bool {
        let index = self.catalog.next_model();
        info!("Switching to model {}", index);
        self.reload(host);
        true
    }

    /// Advances to the next shading mode and reloads every slot.
    pub fn on_cycle_shading<H: ViewerHost>(&mut self, host: &mut H) -> bool {
        let shading = self.catalog.next_shading();
        info!("Switching to shading mode: {}", shading);
        self.reload(host);
        true
    }

    /// Pauses every spin, or resumes every spin not held by a gesture.
    pub fn on_toggle_pause<H: ViewerHost>(&mut self, host: &mut H) -> bool {
        self.global_pause = !self.global_pause;
        let held = self.state.held_model();

        for (slot, entry) in self.models.iter().enumerate() {
            if self.global_pause {
                host.pause(entry.animation);
            } else if held != Some(slot) {
                host.play(entry.animation);
            }
        }

        info!(
            "Animations {}",
            if self.global_pause { "paused" } else { "resumed" }
        );
        true
    }

    pub fn on_toggle_light_fixed<H: ViewerHost>(&mut self, host: &mut H) -> bool {
        self.light.toggle_fixed();
        self.apply_light_mode(host);
        true
    }

    pub fn on_toggle_light_front<H: ViewerHost>(&mut self, host: &mut H) -> bool {
        self.light.toggle_front();
        self.apply_light_mode(host);
        true
    }

    fn apply_light_mode<H: ViewerHost>(&self, host: &mut H) {
        host.set_light_proxy_visible(self.light.proxy_visible());
        host.set_light_proxy_front(self.light.is_front());
        host.set_light_proxy_position(self.light.proxy_position());
        host.set_light_position(self.light.position(self.stage_extent));
    }

    fn reload<H: ViewerHost>(&self, host: &mut H) {
        match self.catalog.current_model() {
            Some(model) => host.reload_models(model, self.catalog.shading()),
            None => warn!("Model catalog is empty, nothing to load"),
        }
    }

    /// Slot indices come from entity tags; a bad one means corrupt metadata.
    fn entry(&self, slot: usize) -> &ModelEntry {
        let count = self.models.len();
        self.models
            .get(slot)
            .unwrap_or_else(|| panic!("model slot {slot} out of range for {count} slots"))
    }

    fn entry_mut(&mut self, slot: usize) -> &mut ModelEntry {
        let count = self.models.len();
        self.models
            .get_mut(slot)
            .unwrap_or_else(|| panic!("model slot {slot} out of range for {count} slots"))
    }

    pub fn models(&self) -> &[ModelEntry] {
        &self.models
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.state.phase()
    }

    pub fn light(&self) -> &LightModel {
        &self.light
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn stage_extent(&self) -> Vector2<f32> {
        self.stage_extent
    }

    pub fn is_paused(&self) -> bool {
        self.global_pause
    }

    pub fn pause_label(&self) -> &'static str {
        if self.global_pause {
            PLAY_LABEL
        } else {
            PAUSE_LABEL
        }
    }

    pub fn light_fixed_label(&self) -> &'static str {
        if self.light.is_fixed() {
            FIXED_LABEL
        } else {
            MANUAL_LABEL
        }
    }

    pub fn light_front_label(&self) -> &'static str {
        if self.light.is_front() {
            FRONT_LABEL
        } else {
            BACK_LABEL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{SpinAnimation, SpinAnimator};
    use cgmath::InnerSpace;

    const STAGE: Vector2<f32> = Vector2::new(1000.0, 800.0);

    #[derive(Default)]
    struct RecordingHost {
        animator: SpinAnimator,
        orientations: Vec<(usize, Quaternion<f32>)>,
        light_positions: Vec<Vector3<f32>>,
        proxy_positions: Vec<Vector2<f32>>,
        proxy_visible: Option<bool>,
        proxy_front: Option<bool>,
        reloads: Vec<(String, ShadingMode)>,
    }

    impl AnimationControl for RecordingHost {
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

    impl ViewerHost for RecordingHost {
        fn set_model_orientation(&mut self, slot: usize, orientation: Quaternion<f32>) {
            self.orientations.push((slot, orientation));
        }

        fn set_light_position(&mut self, position: Vector3<f32>) {
            self.light_positions.push(position);
        }

        fn set_light_proxy_position(&mut self, screen_pos: Vector2<f32>) {
            self.proxy_positions.push(screen_pos);
        }

        fn set_light_proxy_visible(&mut self, visible: bool) {
            self.proxy_visible = Some(visible);
        }

        fn set_light_proxy_front(&mut self, front: bool) {
            self.proxy_front = Some(front);
        }

        fn reload_models(&mut self, model: &ModelAsset, shading: ShadingMode) {
            self.reloads.push((model.name.clone(), shading));
        }
    }

    fn setup() -> (InteractionController, RecordingHost) {
        let mut host = RecordingHost::default();
        let handles: Vec<_> = (0..2)
            .map(|_| host.animator.spawn(SpinAnimation::new(15.0, 1.0)))
            .collect();
        let mut controller = InteractionController::new(&ViewerConfig::default(), STAGE, handles);
        controller.initialize(&mut host);
        (controller, host)
    }

    fn playing(controller: &InteractionController, host: &RecordingHost) -> Vec<bool> {
        controller
            .models()
            .iter()
            .map(|entry| host.is_playing(entry.animation))
            .collect()
    }

    fn touch(
        controller: &mut InteractionController,
        host: &mut RecordingHost,
        tag: EntityTag,
        phase: TouchPhase,
        x: f32,
        y: f32,
    ) -> bool {
        controller.on_touch(tag, phase, Vector2::new(x, y), host)
    }

    #[test]
    fn test_initialize_loads_and_plays() {
        let (controller, host) = setup();
        assert_eq!(
            host.reloads,
            vec![(
                "ToyRobot-Metal".to_string(),
                ShadingMode::TexturedWithDetailedSpecular
            )]
        );
        assert_eq!(host.proxy_visible, Some(false));
        assert_eq!(host.proxy_front, Some(true));
        assert_eq!(
            host.light_positions.last(),
            Some(&Vector3::new(500.0, 400.0, 5000.0))
        );
        assert_eq!(playing(&controller, &host), vec![true, true]);
    }

    #[test]
    fn test_drag_down_pitches_model() {
        let (mut controller, mut host) = setup();
        let model = EntityTag::Model { slot: 0 };

        assert!(touch(&mut controller, &mut host, model, TouchPhase::Down, 100.0, 100.0));
        assert_eq!(controller.gesture_phase(), GesturePhase::Selecting);
        assert_eq!(playing(&controller, &host), vec![false, true]);

        assert!(touch(&mut controller, &mut host, model, TouchPhase::Motion, 100.0, 160.0));
        assert_eq!(controller.gesture_phase(), GesturePhase::Dragging);
        assert_eq!(controller.models()[0].rotation, Vector2::new(-1.0, 0.0));

        let (slot, orientation) = host.orientations[0];
        assert_eq!(slot, 0);
        let expected = Quaternion::from_angle_x(Rad(-1.0f32));
        assert!((orientation - expected).magnitude() < 1e-6);

        assert!(touch(&mut controller, &mut host, model, TouchPhase::Up, 100.0, 160.0));
        assert_eq!(controller.gesture_phase(), GesturePhase::Idle);
        assert_eq!(playing(&controller, &host), vec![true, true]);
    }

    #[test]
    fn test_rotation_accumulates_across_gestures() {
        let (mut controller, mut host) = setup();
        let model = EntityTag::Model { slot: 1 };

        touch(&mut controller, &mut host, model, TouchPhase::Down, 0.0, 0.0);
        touch(&mut controller, &mut host, model, TouchPhase::Motion, 30.0, 0.0);
        touch(&mut controller, &mut host, model, TouchPhase::Motion, 60.0, 0.0);
        touch(&mut controller, &mut host, model, TouchPhase::Up, 60.0, 0.0);
        assert_eq!(controller.models()[1].rotation, Vector2::new(0.0, 1.0));

        touch(&mut controller, &mut host, model, TouchPhase::Down, 500.0, 500.0);
        touch(&mut controller, &mut host, model, TouchPhase::Motion, 560.0, 440.0);
        assert_eq!(controller.models()[1].rotation, Vector2::new(1.0, 2.0));
        assert_eq!(controller.models()[0].rotation, Vector2::new(0.0, 0.0));
    }

    #[test]
    fn test_orientation_is_absolute() {
        let (mut controller, mut host) = setup();
        let model = EntityTag::Model { slot: 0 };

        touch(&mut controller, &mut host, model, TouchPhase::Down, 0.0, 0.0);
        for step in 1..=10 {
            touch(
                &mut controller,
                &mut host,
                model,
                TouchPhase::Motion,
                step as f32 * 6.0,
                0.0,
            );
        }
        let (_, last) = host.orientations[host.orientations.len() - 1];
        let expected = orientation_from_rotation(Vector2::new(0.0, 1.0));
        assert!((last - expected).magnitude() < 1e-6);
    }

    #[test]
    fn test_interrupted_behaves_like_up() {
        let (mut controller, mut host) = setup();
        let model = EntityTag::Model { slot: 0 };

        touch(&mut controller, &mut host, model, TouchPhase::Down, 10.0, 10.0);
        touch(&mut controller, &mut host, model, TouchPhase::Interrupted, 10.0, 10.0);

        assert!(controller.state().is_idle());
        assert_eq!(playing(&controller, &host), vec![true, true]);
    }

    #[test]
    fn test_release_while_paused_keeps_model_still() {
        let (mut controller, mut host) = setup();
        let model = EntityTag::Model { slot: 0 };

        controller.on_toggle_pause(&mut host);
        touch(&mut controller, &mut host, model, TouchPhase::Down, 10.0, 10.0);
        touch(&mut controller, &mut host, model, TouchPhase::Up, 10.0, 10.0);

        assert_eq!(playing(&controller, &host), vec![false, false]);
    }

    #[test]
    fn test_pause_toggle_twice_restores_state() {
        let (mut controller, mut host) = setup();
        let before = playing(&controller, &host);

        assert!(controller.on_toggle_pause(&mut host));
        assert!(controller.is_paused());
        assert_eq!(controller.pause_label(), PLAY_LABEL);
        assert_eq!(playing(&controller, &host), vec![false, false]);

        assert!(controller.on_toggle_pause(&mut host));
        assert!(!controller.is_paused());
        assert_eq!(controller.pause_label(), PAUSE_LABEL);
        assert_eq!(playing(&controller, &host), before);
    }

    #[test]
    fn test_unpause_skips_held_model() {
        let (mut controller, mut host) = setup();
        let model = EntityTag::Model { slot: 1 };

        touch(&mut controller, &mut host, model, TouchPhase::Down, 10.0, 10.0);
        let before = playing(&controller, &host);
        controller.on_toggle_pause(&mut host);
        controller.on_toggle_pause(&mut host);
        assert_eq!(playing(&controller, &host), before);

        touch(&mut controller, &mut host, model, TouchPhase::Up, 10.0, 10.0);
        assert_eq!(playing(&controller, &host), vec![true, true]);
    }

    #[test]
    fn test_touch_on_other_is_ignored() {
        let (mut controller, mut host) = setup();
        let state = *controller.state();
        let orientations = host.orientations.len();

        for phase in [TouchPhase::Down, TouchPhase::Motion, TouchPhase::Up] {
            assert!(touch(&mut controller, &mut host, EntityTag::Other, phase, 5.0, 5.0));
        }

        assert_eq!(*controller.state(), state);
        assert_eq!(host.orientations.len(), orientations);
        assert_eq!(playing(&controller, &host), vec![true, true]);
    }

    #[test]
    fn test_stationary_does_nothing() {
        let (mut controller, mut host) = setup();
        let model = EntityTag::Model { slot: 0 };
        touch(&mut controller, &mut host, model, TouchPhase::Down, 0.0, 0.0);
        touch(&mut controller, &mut host, model, TouchPhase::Stationary, 90.0, 90.0);

        assert_eq!(controller.gesture_phase(), GesturePhase::Selecting);
        assert!(host.orientations.is_empty());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_slot_is_fatal() {
        let (mut controller, mut host) = setup();
        touch(
            &mut controller,
            &mut host,
            EntityTag::Model { slot: 7 },
            TouchPhase::Down,
            0.0,
            0.0,
        );
    }

    #[test]
    fn test_light_proxy_drag() {
        let (mut controller, mut host) = setup();
        controller.on_toggle_light_fixed(&mut host);
        assert_eq!(host.proxy_visible, Some(true));
        assert_eq!(controller.light_fixed_label(), MANUAL_LABEL);

        let proxy = EntityTag::LightProxy;
        touch(&mut controller, &mut host, proxy, TouchPhase::Down, 850.0, 100.0);
        touch(&mut controller, &mut host, proxy, TouchPhase::Motion, 300.0, 200.0);

        assert_eq!(host.proxy_positions.last(), Some(&Vector2::new(300.0, 200.0)));
        assert_eq!(
            host.light_positions.last(),
            Some(&Vector3::new(300.0, 200.0, 500.0))
        );
        assert_eq!(controller.light().proxy_position(), Vector2::new(300.0, 200.0));
        assert_eq!(playing(&controller, &host), vec![true, true]);

        touch(&mut controller, &mut host, proxy, TouchPhase::Up, 300.0, 200.0);
        assert!(controller.state().is_idle());
        assert_eq!(playing(&controller, &host), vec![true, true]);
    }

    #[test]
    fn test_light_front_toggle_flips_depth() {
        let (mut controller, mut host) = setup();
        assert!(controller.on_toggle_light_front(&mut host));
        assert_eq!(host.proxy_front, Some(false));
        assert_eq!(controller.light_front_label(), BACK_LABEL);
        assert_eq!(
            host.light_positions.last(),
            Some(&Vector3::new(500.0, 400.0, -5000.0))
        );

        controller.on_toggle_light_fixed(&mut host);
        let manual = host.light_positions.last().copied();
        assert_eq!(manual.map(|p| p.z), Some(-500.0));
    }

    #[test]
    fn test_cycle_model_and_shading() {
        let (mut controller, mut host) = setup();

        assert!(controller.on_cycle_model(&mut host));
        assert_eq!(controller.catalog().model_index(), 2);
        assert!(controller.on_cycle_model(&mut host));
        assert_eq!(controller.catalog().model_index(), 0);
        assert!(controller.on_cycle_shading(&mut host));

        let names: Vec<_> = host.reloads.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["ToyRobot-Metal", "Toyrobot-Plastic", "Dino", "Dino"]);
        assert_eq!(
            host.reloads.last().map(|(_, shading)| *shading),
            Some(ShadingMode::TexturedWithSpecular)
        );
    }

    #[test]
    fn test_cycling_keeps_rotation() {
        let (mut controller, mut host) = setup();
        let model = EntityTag::Model { slot: 0 };
        touch(&mut controller, &mut host, model, TouchPhase::Down, 0.0, 0.0);
        touch(&mut controller, &mut host, model, TouchPhase::Motion, 60.0, 0.0);
        touch(&mut controller, &mut host, model, TouchPhase::Up, 60.0, 0.0);

        controller.on_cycle_model(&mut host);
        assert_eq!(controller.models()[0].rotation, Vector2::new(0.0, 1.0));
    }

    #[test]
    fn test_resize_recomputes_light() {
        let (mut controller, mut host) = setup();
        controller.resize(Vector2::new(400.0, 600.0), &mut host);
        assert_eq!(
            host.light_positions.last(),
            Some(&Vector3::new(200.0, 300.0, 3000.0))
        );
    }

    #[test]
    fn test_config_tuning_reaches_controller() {
        let mut host = RecordingHost::default();
        let handle = host.animator.spawn(SpinAnimation::new(15.0, 1.0));
        let config = ViewerConfig::default()
            .with_rotation_sensitivity(30.0, 120.0)
            .with_fixed_light_depth_factor(2.0)
            .with_initial_model(0)
            .with_initial_shading(1);
        let mut controller = InteractionController::new(&config, STAGE, [handle]);
        controller.initialize(&mut host);

        assert_eq!(
            host.reloads,
            vec![("Dino".to_string(), ShadingMode::TexturedWithSpecular)]
        );
        assert_eq!(
            host.light_positions.last(),
            Some(&Vector3::new(500.0, 400.0, 2000.0))
        );

        let model = EntityTag::Model { slot: 0 };
        touch(&mut controller, &mut host, model, TouchPhase::Down, 0.0, 0.0);
        touch(&mut controller, &mut host, model, TouchPhase::Motion, 60.0, 60.0);
        assert_eq!(controller.models()[0].rotation, Vector2::new(-0.5, 2.0));
    }
}
