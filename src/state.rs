//! Button and modifier state tracked across events.
//!
//! The hook only sees individual press/release events, so held buttons are
//! accumulated here. A pointer motion while any button is held is reported as
//! a drag instead of a move.

use crate::event::Button;
use crate::keycode::Key;
use std::sync::atomic::{AtomicU32, Ordering};

/// Left mouse button mask.
pub const MASK_BUTTON1: u32 = 1 << 8;
/// Right mouse button mask.
pub const MASK_BUTTON2: u32 = 1 << 9;
/// Middle mouse button mask.
pub const MASK_BUTTON3: u32 = 1 << 10;
/// Extra button 1 (X1) mask.
pub const MASK_BUTTON4: u32 = 1 << 11;
/// Extra button 2 (X2) mask.
pub const MASK_BUTTON5: u32 = 1 << 12;

pub const MASK_SHIFT: u32 = 1 << 0;
pub const MASK_CTRL: u32 = 1 << 1;
pub const MASK_ALT: u32 = 1 << 2;
/// Meta/Super/Windows key mask.
pub const MASK_META: u32 = 1 << 3;

/// All button masks combined.
pub const MASK_ALL_BUTTONS: u32 =
    MASK_BUTTON1 | MASK_BUTTON2 | MASK_BUTTON3 | MASK_BUTTON4 | MASK_BUTTON5;

/// Atomic modifier/button mask, shareable between the hook callback and readers.
#[derive(Debug, Default)]
pub struct InputMask(AtomicU32);

impl InputMask {
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Set bits in the mask.
    #[inline]
    pub fn set(&self, mask: u32) {
        self.0.fetch_or(mask, Ordering::SeqCst);
    }

    /// Clear bits in the mask.
    #[inline]
    pub fn unset(&self, mask: u32) {
        self.0.fetch_and(!mask, Ordering::SeqCst);
    }

    /// Set or clear bits depending on `pressed`.
    #[inline]
    pub fn update(&self, mask: u32, pressed: bool) {
        if pressed {
            self.set(mask);
        } else {
            self.unset(mask);
        }
    }

    #[inline]
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    #[inline]
    pub fn reset(&self) {
        self.0.store(0, Ordering::SeqCst);
    }

    /// Check if any mouse button is currently held.
    #[inline]
    pub fn is_button_held(&self) -> bool {
        (self.get() & MASK_ALL_BUTTONS) != 0
    }
}

/// Mask bit for a mouse button, or 0 if the button is not tracked.
pub fn button_mask(button: Button) -> u32 {
    match button {
        Button::Left => MASK_BUTTON1,
        Button::Right => MASK_BUTTON2,
        Button::Middle => MASK_BUTTON3,
        Button::Button4 => MASK_BUTTON4,
        Button::Button5 => MASK_BUTTON5,
        Button::Unknown(_) => 0,
    }
}

/// Mask bit for a modifier key, or 0 for any other key.
pub fn modifier_mask(key: Key) -> u32 {
    match key {
        Key::ShiftLeft | Key::ShiftRight => MASK_SHIFT,
        Key::ControlLeft | Key::ControlRight => MASK_CTRL,
        Key::AltLeft | Key::AltRight => MASK_ALT,
        Key::MetaLeft | Key::MetaRight => MASK_META,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_mask_operations() {
        let mask = InputMask::new();
        assert!(!mask.is_button_held());

        mask.set(MASK_BUTTON1);
        assert!(mask.is_button_held());

        mask.set(MASK_BUTTON2);
        mask.unset(MASK_BUTTON1);
        assert_eq!(mask.get(), MASK_BUTTON2);
        assert!(mask.is_button_held());

        mask.unset(MASK_BUTTON2);
        assert!(!mask.is_button_held());
    }

    #[test]
    fn test_modifiers_do_not_count_as_buttons() {
        let mask = InputMask::new();
        mask.update(modifier_mask(Key::ShiftLeft), true);
        mask.update(modifier_mask(Key::ControlRight), true);
        assert_eq!(mask.get(), MASK_SHIFT | MASK_CTRL);
        assert!(!mask.is_button_held());

        mask.update(MASK_SHIFT, false);
        assert_eq!(mask.get(), MASK_CTRL);

        mask.reset();
        assert_eq!(mask.get(), 0);
    }

    #[test]
    fn test_button_mask_lookup() {
        assert_eq!(button_mask(Button::Left), MASK_BUTTON1);
        assert_eq!(button_mask(Button::Right), MASK_BUTTON2);
        assert_eq!(button_mask(Button::Middle), MASK_BUTTON3);
        assert_eq!(button_mask(Button::Button5), MASK_BUTTON5);
        assert_eq!(button_mask(Button::Unknown(12)), 0);
        assert_eq!(modifier_mask(Key::KeyA), 0);
    }
}
