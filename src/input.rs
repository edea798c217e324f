//! # Input
//!
//! Keyboard and mouse state, rebuilt from [Event]s by the application runner.

use std::collections::HashSet;
use std::hash::Hash;

use glam::Vec2;
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

use crate::Event;

/// Held, pressed, and released state for one kind of button.
#[derive(Clone, Debug)]
struct ButtonState<T> {
    down: HashSet<T>,
    pressed: HashSet<T>,
    released: HashSet<T>,
}

impl<T: Copy + Eq + Hash> ButtonState<T> {
    fn press(&mut self, button: T) {
        if self.down.insert(button) {
            self.pressed.insert(button);
        }
    }

    fn release(&mut self, button: T) {
        if self.down.remove(&button) {
            self.released.insert(button);
        }
    }

    fn release_all(&mut self) {
        self.released.extend(self.down.drain());
    }

    fn end_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }
}

impl<T> Default for ButtonState<T> {
    fn default() -> Self {
        Self {
            down: HashSet::new(),
            pressed: HashSet::new(),
            released: HashSet::new(),
        }
    }
}

/// # Input
#[derive(Clone, Debug, Default)]
pub struct Input {
    keys: ButtonState<KeyCode>,
    mouse_buttons: ButtonState<MouseButton>,
    cursor_position: Option<Vec2>,
    scroll_delta: Vec2,
}

impl Input {
    /// Returns empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the state from the event.
    pub fn handle(&mut self, event: &Event) {
        match *event {
            Event::KeyPressed(key) => self.keys.press(key),
            Event::KeyReleased(key) => self.keys.release(key),
            Event::MouseButtonPressed(button) => self.mouse_buttons.press(button),
            Event::MouseButtonReleased(button) => self.mouse_buttons.release(button),
            Event::CursorMoved { x, y } => self.cursor_position = Some(Vec2::new(x, y)),
            Event::CursorLeft => self.cursor_position = None,
            Event::MouseWheel { delta_x, delta_y } => {
                self.scroll_delta += Vec2::new(delta_x, delta_y);
            }
            // Release events are lost while unfocused.
            Event::Focused(false) => {
                self.keys.release_all();
                self.mouse_buttons.release_all();
            }
            Event::Focused(true) | Event::CloseRequested | Event::Resized { .. } => {}
        }
    }

    /// Clears the pressed, released, and scroll state for the next frame.
    pub fn end_frame(&mut self) {
        self.keys.end_frame();
        self.mouse_buttons.end_frame();
        self.scroll_delta = Vec2::ZERO;
    }

    /// Returns true while the key is held down.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.down.contains(&key)
    }

    /// Returns true if the key went down this frame.
    pub fn was_key_pressed(&self, key: KeyCode) -> bool {
        self.keys.pressed.contains(&key)
    }

    /// Returns true if the key went up this frame.
    pub fn was_key_released(&self, key: KeyCode) -> bool {
        self.keys.released.contains(&key)
    }

    /// Returns true while the mouse button is held down.
    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons.down.contains(&button)
    }

    /// Returns true if the mouse button went down this frame.
    pub fn was_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.pressed.contains(&button)
    }

    /// Returns true if the mouse button went up this frame.
    pub fn was_mouse_button_released(&self, button: MouseButton) -> bool {
        self.mouse_buttons.released.contains(&button)
    }

    /// Returns the cursor position in physical pixels, or `None` if the cursor is outside the
    /// window.
    pub fn cursor_position(&self) -> Option<Vec2> {
        self.cursor_position
    }

    /// Returns the scroll distance this frame, in lines.
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_pressed_is_key_down_returns_true() {
        let mut input = Input::new();

        input.handle(&Event::KeyPressed(KeyCode::KeyW));

        assert!(input.is_key_down(KeyCode::KeyW));
        assert!(input.was_key_pressed(KeyCode::KeyW));
        assert!(!input.is_key_down(KeyCode::KeyS));
    }

    #[test]
    fn end_frame_keeps_held_keys() {
        let mut input = Input::new();
        input.handle(&Event::KeyPressed(KeyCode::KeyW));

        input.end_frame();

        assert!(input.is_key_down(KeyCode::KeyW));
        assert!(!input.was_key_pressed(KeyCode::KeyW));
    }

    #[test]
    fn key_pressed_while_held_was_key_pressed_returns_false() {
        let mut input = Input::new();
        input.handle(&Event::KeyPressed(KeyCode::Space));
        input.end_frame();

        input.handle(&Event::KeyPressed(KeyCode::Space));

        assert!(!input.was_key_pressed(KeyCode::Space));
    }

    #[test]
    fn key_released_was_key_released_returns_true() {
        let mut input = Input::new();
        input.handle(&Event::KeyPressed(KeyCode::Escape));
        input.end_frame();

        input.handle(&Event::KeyReleased(KeyCode::Escape));

        assert!(!input.is_key_down(KeyCode::Escape));
        assert!(input.was_key_released(KeyCode::Escape));
    }

    #[test]
    fn key_released_without_press_was_key_released_returns_false() {
        let mut input = Input::new();

        input.handle(&Event::KeyReleased(KeyCode::Escape));

        assert!(!input.was_key_released(KeyCode::Escape));
    }

    #[test]
    fn focus_lost_releases_everything() {
        let mut input = Input::new();
        input.handle(&Event::KeyPressed(KeyCode::KeyA));
        input.handle(&Event::MouseButtonPressed(MouseButton::Left));
        input.end_frame();

        input.handle(&Event::Focused(false));

        assert!(!input.is_key_down(KeyCode::KeyA));
        assert!(input.was_key_released(KeyCode::KeyA));
        assert!(!input.is_mouse_button_down(MouseButton::Left));
        assert!(input.was_mouse_button_released(MouseButton::Left));
    }

    #[test]
    fn mouse_button_pressed_is_mouse_button_down_returns_true() {
        let mut input = Input::new();

        input.handle(&Event::MouseButtonPressed(MouseButton::Right));

        assert!(input.is_mouse_button_down(MouseButton::Right));
        assert!(input.was_mouse_button_pressed(MouseButton::Right));
    }

    #[test]
    fn cursor_moved_cursor_position_returns_position() {
        let mut input = Input::new();

        input.handle(&Event::CursorMoved { x: 12.0, y: 34.0 });
        input.end_frame();

        assert_eq!(input.cursor_position(), Some(Vec2::new(12.0, 34.0)));
    }

    #[test]
    fn cursor_left_cursor_position_returns_none() {
        let mut input = Input::new();
        input.handle(&Event::CursorMoved { x: 12.0, y: 34.0 });

        input.handle(&Event::CursorLeft);

        assert_eq!(input.cursor_position(), None);
    }

    #[test]
    fn mouse_wheel_accumulates_until_end_frame() {
        let mut input = Input::new();

        input.handle(&Event::MouseWheel {
            delta_x: 0.0,
            delta_y: 1.0,
        });
        input.handle(&Event::MouseWheel {
            delta_x: 0.5,
            delta_y: 2.0,
        });

        assert_eq!(input.scroll_delta(), Vec2::new(0.5, 3.0));

        input.end_frame();

        assert_eq!(input.scroll_delta(), Vec2::ZERO);
    }
}
