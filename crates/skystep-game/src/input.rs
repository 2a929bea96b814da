//! Input system with action-based mapping
//!
//! Provides an abstraction layer between raw winit events and game actions.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move forward (W by default)
    MoveForward,
    /// Move backward (S by default)
    MoveBackward,
    /// Move left (A by default)
    MoveLeft,
    /// Move right (D by default)
    MoveRight,
    /// Jump (Space by default)
    Jump,
    /// Sprint modifier (Shift by default)
    Sprint,
    /// Super jump skill (E by default)
    SuperJump,
    /// Respawn after death (R by default)
    Respawn,
    /// Open/close the stage selection menu (Tab by default)
    StageMenu,
}

/// Current state of all inputs for a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Actions that were just pressed this frame
    pub just_pressed: HashSet<InputAction>,
    /// Actions that were just released this frame
    pub just_released: HashSet<InputAction>,
    /// Mouse movement delta for this frame
    pub mouse_delta: Vec2,
    /// Whether the cursor is captured (pointer lock)
    pub cursor_captured: bool,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn is_just_released(&self, action: InputAction) -> bool {
        self.just_released.contains(&action)
    }

    /// Clear frame-specific data (call at end of frame)
    pub fn clear_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.mouse_delta = Vec2::ZERO;
    }

    /// Clear all input state (menu open, focus loss)
    pub fn clear_all(&mut self) {
        self.held.clear();
        self.just_pressed.clear();
        self.just_released.clear();
        self.mouse_delta = Vec2::ZERO;
    }
}

/// Maps physical keys to game actions
#[derive(Debug, Clone)]
pub struct InputBindings {
    bindings: HashMap<KeyCode, InputAction>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };

        // Default WASD bindings
        bindings.bind(KeyCode::KeyW, InputAction::MoveForward);
        bindings.bind(KeyCode::KeyS, InputAction::MoveBackward);
        bindings.bind(KeyCode::KeyA, InputAction::MoveLeft);
        bindings.bind(KeyCode::KeyD, InputAction::MoveRight);

        // Arrow keys as alternative
        bindings.bind(KeyCode::ArrowUp, InputAction::MoveForward);
        bindings.bind(KeyCode::ArrowDown, InputAction::MoveBackward);
        bindings.bind(KeyCode::ArrowLeft, InputAction::MoveLeft);
        bindings.bind(KeyCode::ArrowRight, InputAction::MoveRight);

        // Actions
        bindings.bind(KeyCode::Space, InputAction::Jump);
        bindings.bind(KeyCode::ShiftLeft, InputAction::Sprint);
        bindings.bind(KeyCode::ShiftRight, InputAction::Sprint);
        bindings.bind(KeyCode::KeyE, InputAction::SuperJump);
        bindings.bind(KeyCode::KeyR, InputAction::Respawn);
        bindings.bind(KeyCode::Tab, InputAction::StageMenu);

        bindings
    }
}

impl InputBindings {
    /// Create new input bindings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key to an action
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.bindings.insert(key, action);
    }

    /// Unbind a key
    pub fn unbind(&mut self, key: KeyCode) {
        self.bindings.remove(&key);
    }

    /// Get the action for a key, if any
    pub fn get_key_action(&self, key: KeyCode) -> Option<InputAction> {
        self.bindings.get(&key).copied()
    }
}

/// Input handler that processes raw winit events and updates state
#[derive(Debug)]
pub struct InputHandler {
    /// Current input state
    pub state: InputState,
    /// Input bindings
    pub bindings: InputBindings,
    /// Mouse sensitivity multiplier
    pub mouse_sensitivity: f32,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Create a new input handler with default bindings
    pub fn new() -> Self {
        Self {
            state: InputState::new(),
            bindings: InputBindings::default(),
            mouse_sensitivity: 1.0,
        }
    }

    /// Handle a keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        if let PhysicalKey::Code(key_code) = physical_key {
            if let Some(action) = self.bindings.get_key_action(key_code) {
                match element_state {
                    ElementState::Pressed => {
                        if !self.state.held.contains(&action) {
                            self.state.just_pressed.insert(action);
                        }
                        self.state.held.insert(action);
                    }
                    ElementState::Released => {
                        self.state.held.remove(&action);
                        self.state.just_released.insert(action);
                    }
                }
            }
        }
    }

    /// Handle mouse movement (only applied while the cursor is captured)
    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        if self.state.cursor_captured {
            self.state.mouse_delta += Vec2::new(
                delta.0 as f32 * self.mouse_sensitivity,
                delta.1 as f32 * self.mouse_sensitivity,
            );
        }
    }

    /// Clear frame-specific input data
    pub fn end_frame(&mut self) {
        self.state.clear_frame();
    }

    /// Set cursor capture state
    pub fn set_cursor_captured(&mut self, captured: bool) {
        self.state.cursor_captured = captured;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = InputBindings::default();
        assert_eq!(
            bindings.get_key_action(KeyCode::KeyW),
            Some(InputAction::MoveForward)
        );
        assert_eq!(
            bindings.get_key_action(KeyCode::Space),
            Some(InputAction::Jump)
        );
        assert_eq!(
            bindings.get_key_action(KeyCode::KeyE),
            Some(InputAction::SuperJump)
        );
        assert_eq!(
            bindings.get_key_action(KeyCode::Tab),
            Some(InputAction::StageMenu)
        );
    }

    #[test]
    fn test_press_and_release() {
        let mut handler = InputHandler::new();
        handler.handle_keyboard(
            PhysicalKey::Code(KeyCode::Space),
            ElementState::Pressed,
        );

        assert!(handler.state.is_held(InputAction::Jump));
        assert!(handler.state.is_just_pressed(InputAction::Jump));

        handler.end_frame();
        assert!(handler.state.is_held(InputAction::Jump));
        assert!(!handler.state.is_just_pressed(InputAction::Jump));

        handler.handle_keyboard(
            PhysicalKey::Code(KeyCode::Space),
            ElementState::Released,
        );
        assert!(!handler.state.is_held(InputAction::Jump));
        assert!(handler.state.is_just_released(InputAction::Jump));
    }

    #[test]
    fn test_mouse_motion_requires_capture() {
        let mut handler = InputHandler::new();
        handler.handle_mouse_motion((10.0, 5.0));
        assert_eq!(handler.state.mouse_delta, Vec2::ZERO);

        handler.set_cursor_captured(true);
        handler.handle_mouse_motion((10.0, 5.0));
        assert_eq!(handler.state.mouse_delta, Vec2::new(10.0, 5.0));
    }

    #[test]
    fn test_clear_all_drops_held_keys() {
        let mut handler = InputHandler::new();
        handler.handle_keyboard(PhysicalKey::Code(KeyCode::KeyW), ElementState::Pressed);
        handler.state.clear_all();
        assert!(!handler.state.is_held(InputAction::MoveForward));
    }
}
