//! Input event types shared by capture and playback.

use crate::keycode::Key;
use std::time::SystemTime;

/// The type of input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Hook has been enabled and is now listening.
    HookEnabled,
    /// Hook has been disabled and is no longer listening.
    HookDisabled,

    /// A key was pressed down.
    KeyPressed,
    /// A key was released.
    KeyReleased,

    /// A mouse button was pressed.
    MousePressed,
    /// A mouse button was released.
    MouseReleased,
    /// The mouse was moved (no buttons held).
    MouseMoved,
    /// The mouse was moved while a button was held (drag).
    MouseDragged,

    /// The mouse wheel was scrolled.
    MouseWheel,
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Middle,
    /// Extra button 1 (typically back).
    Button4,
    /// Extra button 2 (typically forward).
    Button5,
    /// Unknown or unsupported button, by raw number.
    Unknown(u8),
}

/// Scroll direction for mouse wheel events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Keyboard event data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardData {
    /// The virtual key code.
    pub key: Key,
    /// The raw platform-specific keycode.
    pub raw_code: u32,
}

/// Mouse event data.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseData {
    /// The mouse button (for press/release events).
    pub button: Option<Button>,
    /// X coordinate (screen coordinates).
    pub x: f64,
    /// Y coordinate (screen coordinates).
    pub y: f64,
}

/// Mouse wheel event data.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelData {
    pub x: f64,
    pub y: f64,
    pub direction: ScrollDirection,
    /// Number of wheel notches.
    pub delta: f64,
}

/// A complete input event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// The type of event.
    pub event_type: EventType,
    /// Wall-clock time when the event occurred.
    pub time: SystemTime,
    /// Modifier/button mask when the event occurred (see [`crate::state`]).
    pub mask: u32,
    pub keyboard: Option<KeyboardData>,
    pub mouse: Option<MouseData>,
    pub wheel: Option<WheelData>,
}

impl Event {
    /// Create a new event with the given type, the current time and an empty mask.
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            time: SystemTime::now(),
            mask: 0,
            keyboard: None,
            mouse: None,
            wheel: None,
        }
    }

    /// Attach the modifier/button mask observed with this event.
    pub fn with_mask(mut self, mask: u32) -> Self {
        self.mask = mask;
        self
    }

    pub fn hook_enabled() -> Self {
        Self::new(EventType::HookEnabled)
    }

    pub fn hook_disabled() -> Self {
        Self::new(EventType::HookDisabled)
    }

    pub fn key_pressed(key: Key, raw_code: u32) -> Self {
        Self::key(EventType::KeyPressed, key, raw_code)
    }

    pub fn key_released(key: Key, raw_code: u32) -> Self {
        Self::key(EventType::KeyReleased, key, raw_code)
    }

    pub fn mouse_pressed(button: Button, x: f64, y: f64) -> Self {
        Self::pointer(EventType::MousePressed, Some(button), x, y)
    }

    pub fn mouse_released(button: Button, x: f64, y: f64) -> Self {
        Self::pointer(EventType::MouseReleased, Some(button), x, y)
    }

    pub fn mouse_moved(x: f64, y: f64) -> Self {
        Self::pointer(EventType::MouseMoved, None, x, y)
    }

    pub fn mouse_dragged(x: f64, y: f64) -> Self {
        Self::pointer(EventType::MouseDragged, None, x, y)
    }

    pub fn mouse_wheel(x: f64, y: f64, direction: ScrollDirection, delta: f64) -> Self {
        let mut event = Self::new(EventType::MouseWheel);
        event.wheel = Some(WheelData {
            x,
            y,
            direction,
            delta,
        });
        event
    }

    fn key(event_type: EventType, key: Key, raw_code: u32) -> Self {
        let mut event = Self::new(event_type);
        event.keyboard = Some(KeyboardData { key, raw_code });
        event
    }

    fn pointer(event_type: EventType, button: Option<Button>, x: f64, y: f64) -> Self {
        let mut event = Self::new(event_type);
        event.mouse = Some(MouseData { button, x, y });
        event
    }

    /// Check if this is a keyboard event.
    pub fn is_keyboard(&self) -> bool {
        matches!(
            self.event_type,
            EventType::KeyPressed | EventType::KeyReleased
        )
    }

    /// Check if this is a mouse or wheel event.
    pub fn is_mouse(&self) -> bool {
        matches!(
            self.event_type,
            EventType::MousePressed
                | EventType::MouseReleased
                | EventType::MouseMoved
                | EventType::MouseDragged
                | EventType::MouseWheel
        )
    }

    /// Returns the key if this is a press of that key.
    pub fn pressed_key(&self) -> Option<Key> {
        match (self.event_type, &self.keyboard) {
            (EventType::KeyPressed, Some(kb)) => Some(kb.key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_classification() {
        let key = Event::key_pressed(Key::KeyA, 38);
        assert!(key.is_keyboard());
        assert!(!key.is_mouse());

        let wheel = Event::mouse_wheel(1.0, 2.0, ScrollDirection::Up, 1.0);
        assert!(wheel.is_mouse());
        assert!(!wheel.is_keyboard());

        let enabled = Event::hook_enabled();
        assert!(!enabled.is_mouse());
        assert!(!enabled.is_keyboard());
    }

    #[test]
    fn test_pressed_key_only_on_press() {
        assert_eq!(Event::key_pressed(Key::KeyP, 33).pressed_key(), Some(Key::KeyP));
        assert_eq!(Event::key_released(Key::KeyP, 33).pressed_key(), None);
        assert_eq!(Event::mouse_moved(0.0, 0.0).pressed_key(), None);
    }

    #[test]
    fn test_with_mask() {
        let event = Event::mouse_dragged(10.0, 20.0).with_mask(0b101);
        assert_eq!(event.mask, 0b101);
        assert_eq!(event.mouse.unwrap().button, None);
    }
}
