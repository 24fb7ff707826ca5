//! Folds winit mouse and touch events into one single-point touch stream.
//!
//! The left mouse button and the first finger both drive the pointer; while
//! one of them holds it, the other is ignored.

use cgmath::Vector2;
use winit::event::{ElementState, MouseButton};

use super::state::TouchPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Holder {
    Mouse,
    Finger(u64),
}

/// A touch event ready for the controller.
pub type PointerEvent = (TouchPhase, Vector2<f32>);

#[derive(Debug)]
pub struct PointerTracker {
    cursor: Vector2<f32>,
    holder: Option<Holder>,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerTracker {
    pub fn new() -> Self {
        Self {
            cursor: Vector2::new(0.0, 0.0),
            holder: None,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.holder.is_some()
    }

    pub fn cursor_moved(&mut self, position: Vector2<f32>) -> Option<PointerEvent> {
        self.cursor = position;
        (self.holder == Some(Holder::Mouse)).then_some((TouchPhase::Motion, position))
    }

    pub fn mouse_input(&mut self, state: ElementState, button: MouseButton) -> Option<PointerEvent> {
        if button != MouseButton::Left {
            return None;
        }
        match (state, self.holder) {
            (ElementState::Pressed, None) => {
                self.holder = Some(Holder::Mouse);
                Some((TouchPhase::Down, self.cursor))
            }
            (ElementState::Released, Some(Holder::Mouse)) => {
                self.holder = None;
                Some((TouchPhase::Up, self.cursor))
            }
            _ => None,
        }
    }

    /// Pointer left the window or the window lost focus.
    pub fn interrupt(&mut self) -> Option<PointerEvent> {
        self.holder
            .take()
            .map(|_| (TouchPhase::Interrupted, self.cursor))
    }

    pub fn touch(
        &mut self,
        id: u64,
        phase: winit::event::TouchPhase,
        position: Vector2<f32>,
    ) -> Option<PointerEvent> {
        use winit::event::TouchPhase as Winit;

        match (phase, self.holder) {
            (Winit::Started, None) => {
                self.holder = Some(Holder::Finger(id));
                Some((TouchPhase::Down, position))
            }
            (Winit::Moved, Some(Holder::Finger(held))) if held == id => {
                Some((TouchPhase::Motion, position))
            }
            (Winit::Ended, Some(Holder::Finger(held))) if held == id => {
                self.holder = None;
                Some((TouchPhase::Up, position))
            }
            (Winit::Cancelled, Some(Holder::Finger(held))) if held == id => {
                self.holder = None;
                Some((TouchPhase::Interrupted, position))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::TouchPhase as Winit;

    fn at(x: f32, y: f32) -> Vector2<f32> {
        Vector2::new(x, y)
    }

    #[test]
    fn test_mouse_drag() {
        let mut pointer = PointerTracker::new();
        assert_eq!(pointer.cursor_moved(at(10.0, 10.0)), None);
        assert_eq!(
            pointer.mouse_input(ElementState::Pressed, MouseButton::Left),
            Some((TouchPhase::Down, at(10.0, 10.0)))
        );
        assert_eq!(
            pointer.cursor_moved(at(30.0, 15.0)),
            Some((TouchPhase::Motion, at(30.0, 15.0)))
        );
        assert_eq!(
            pointer.mouse_input(ElementState::Released, MouseButton::Left),
            Some((TouchPhase::Up, at(30.0, 15.0)))
        );
        assert!(!pointer.is_pressed());
    }

    #[test]
    fn test_other_buttons_ignored() {
        let mut pointer = PointerTracker::new();
        assert_eq!(pointer.mouse_input(ElementState::Pressed, MouseButton::Right), None);
        assert!(!pointer.is_pressed());
    }

    #[test]
    fn test_interrupt_only_while_pressed() {
        let mut pointer = PointerTracker::new();
        assert_eq!(pointer.interrupt(), None);

        pointer.mouse_input(ElementState::Pressed, MouseButton::Left);
        assert_eq!(pointer.interrupt(), Some((TouchPhase::Interrupted, at(0.0, 0.0))));
        // The release after an interruption is not a second gesture end.
        assert_eq!(pointer.mouse_input(ElementState::Released, MouseButton::Left), None);
    }

    #[test]
    fn test_first_finger_owns_the_pointer() {
        let mut pointer = PointerTracker::new();
        assert_eq!(
            pointer.touch(1, Winit::Started, at(5.0, 5.0)),
            Some((TouchPhase::Down, at(5.0, 5.0)))
        );
        assert_eq!(pointer.touch(2, Winit::Started, at(50.0, 50.0)), None);
        assert_eq!(pointer.touch(2, Winit::Moved, at(60.0, 60.0)), None);
        assert_eq!(
            pointer.touch(1, Winit::Moved, at(8.0, 9.0)),
            Some((TouchPhase::Motion, at(8.0, 9.0)))
        );
        assert_eq!(pointer.mouse_input(ElementState::Pressed, MouseButton::Left), None);
        assert_eq!(
            pointer.touch(1, Winit::Cancelled, at(8.0, 9.0)),
            Some((TouchPhase::Interrupted, at(8.0, 9.0)))
        );
        assert!(!pointer.is_pressed());
    }
}
