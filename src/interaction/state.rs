use cgmath::Vector2;

/// Phase of a single-point touch as delivered to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Motion,
    Up,
    /// The system took the touch away (focus loss, pointer left the window).
    Interrupted,
    /// Still down, not moving. Ignored.
    Stationary,
}

/// What the current gesture is acting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveEntity {
    #[default]
    None,
    Model {
        slot: usize,
    },
    LightProxy,
}

/// Coarse gesture phase, derived from [`InteractionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    /// Pressed, not moved yet.
    Selecting,
    Dragging,
}

/// Per-gesture state. Only meaningful while `active` is not `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    pub active: ActiveEntity,
    /// Screen point of the initiating press
    pub gesture_start: Vector2<f32>,
    /// Accumulated (pitch, yaw) of the active model when the press happened
    pub rotation_at_gesture_start: Vector2<f32>,
    dragging: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            active: ActiveEntity::None,
            gesture_start: Vector2::new(0.0, 0.0),
            rotation_at_gesture_start: Vector2::new(0.0, 0.0),
            dragging: false,
        }
    }
}

impl InteractionState {
    pub fn begin(&mut self, active: ActiveEntity, start: Vector2<f32>, rotation: Vector2<f32>) {
        self.active = active;
        self.gesture_start = start;
        self.rotation_at_gesture_start = rotation;
        self.dragging = false;
    }

    pub fn mark_dragging(&mut self) {
        if self.active != ActiveEntity::None {
            self.dragging = true;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_idle(&self) -> bool {
        self.active == ActiveEntity::None
    }

    pub fn phase(&self) -> GesturePhase {
        match (self.active, self.dragging) {
            (ActiveEntity::None, _) => GesturePhase::Idle,
            (_, false) => GesturePhase::Selecting,
            (_, true) => GesturePhase::Dragging,
        }
    }

    /// Model slot held by the current gesture, if any.
    pub fn held_model(&self) -> Option<usize> {
        match self.active {
            ActiveEntity::Model { slot } => Some(slot),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        let mut state = InteractionState::default();
        assert_eq!(state.phase(), GesturePhase::Idle);

        state.mark_dragging();
        assert_eq!(state.phase(), GesturePhase::Idle);

        state.begin(
            ActiveEntity::Model { slot: 1 },
            Vector2::new(5.0, 5.0),
            Vector2::new(0.5, 0.0),
        );
        assert_eq!(state.phase(), GesturePhase::Selecting);
        assert_eq!(state.held_model(), Some(1));

        state.mark_dragging();
        assert_eq!(state.phase(), GesturePhase::Dragging);

        state.reset();
        assert!(state.is_idle());
        assert_eq!(state.held_model(), None);
    }
}
