// Per-player input state management

use super::action::{Action, InputEvent};
use glam::Vec2;
use std::collections::HashSet;

/// Polled input state for a single player.
///
/// Events are applied as they arrive; `update` closes a physics frame so
/// that "just pressed" and "just released" are visible for exactly one tick.
#[derive(Debug, Default)]
pub struct PlayerInput {
    /// Actions that are currently pressed
    pressed: HashSet<Action>,

    /// Actions that were pressed since the last update
    just_pressed: HashSet<Action>,

    /// Actions that were released since the last update
    just_released: HashSet<Action>,

    /// Accumulated mouse motion since the last update
    mouse_delta: Vec2,
}

impl PlayerInput {
    /// Create a new player input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently pressed
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Feed one raw input event
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Pressed(action) => self.press(action),
            InputEvent::Released(action) => self.release(action),
            InputEvent::MouseMotion { relative } => self.mouse_delta += relative,
        }
    }

    /// Register an action press
    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Close the current physics frame
    pub fn update(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.mouse_delta = Vec2::ZERO;
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.update();
    }

    /// Mouse motion accumulated this frame
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Build a 2-axis vector from four actions, clamped to unit length
    pub fn get_vector(
        &self,
        negative_x: Action,
        positive_x: Action,
        negative_y: Action,
        positive_y: Action,
    ) -> Vec2 {
        let axis = |negative: Action, positive: Action| {
            let mut value = 0.0;
            if self.is_pressed(negative) {
                value -= 1.0;
            }
            if self.is_pressed(positive) {
                value += 1.0;
            }
            value
        };

        let vector = Vec2::new(axis(negative_x, positive_x), axis(negative_y, positive_y));
        if vector.length_squared() > 1.0 {
            vector.normalize()
        } else {
            vector
        }
    }

    /// Movement input: x is strafe (right positive), y is forward/back (back positive)
    pub fn movement(&self) -> Vec2 {
        self.get_vector(
            Action::MoveLeft,
            Action::MoveRight,
            Action::MoveForward,
            Action::MoveBack,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_press_action() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        assert!(input.is_pressed(Action::Jump));
        assert!(input.just_pressed(Action::Jump));
    }

    #[test]
    fn test_release_action() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.update();
        input.release(Action::Jump);
        assert!(!input.is_pressed(Action::Jump));
        assert!(input.just_released(Action::Jump));
    }

    #[test]
    fn test_just_pressed_cleared_on_update() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.update();
        assert!(input.is_pressed(Action::Jump));
        assert!(!input.just_pressed(Action::Jump));
    }

    #[test]
    fn test_repeat_press_is_not_just_pressed_again() {
        let mut input = PlayerInput::new();
        input.press(Action::Run);
        input.update();
        input.press(Action::Run);
        assert!(!input.just_pressed(Action::Run));
    }

    #[test]
    fn test_release_unpressed_action() {
        let mut input = PlayerInput::new();
        input.release(Action::Jump);
        assert!(!input.just_released(Action::Jump));
    }

    #[test]
    fn test_apply_events() {
        let mut input = PlayerInput::new();
        input.apply(&InputEvent::Pressed(Action::Crouch));
        input.apply(&InputEvent::MouseMotion {
            relative: Vec2::new(3.0, -1.0),
        });
        input.apply(&InputEvent::MouseMotion {
            relative: Vec2::new(1.0, 0.0),
        });

        assert!(input.is_pressed(Action::Crouch));
        assert_eq!(input.mouse_delta(), Vec2::new(4.0, -1.0));

        input.update();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_movement_neutral() {
        let input = PlayerInput::new();
        assert_eq!(input.movement(), Vec2::ZERO);
    }

    #[test]
    fn test_movement_forward_is_negative_y() {
        let mut input = PlayerInput::new();
        input.press(Action::MoveForward);
        assert_eq!(input.movement(), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_movement_diagonal_is_normalized() {
        let mut input = PlayerInput::new();
        input.press(Action::MoveForward);
        input.press(Action::MoveRight);
        assert_relative_eq!(input.movement().length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_reset() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.press(Action::Run);
        input.reset();
        assert!(!input.is_pressed(Action::Jump));
        assert!(!input.just_pressed(Action::Run));
    }
}
