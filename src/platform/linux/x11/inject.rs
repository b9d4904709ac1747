//! X11 event injection using XTest.

use crate::error::{Error, Result};
use crate::event::{Button, Event, EventType, ScrollDirection};
use crate::keycode::Key;
use crate::playback::EventSink;
use std::os::raw::{c_int, c_uint};
use std::ptr::null;
use x11::xlib;
use x11::xtest;

use crate::platform::linux::keycodes::key_to_keycode;

const TRUE: c_int = 1;
const FALSE: c_int = 0;

/// Replays events through XTest on a display connection it owns.
///
/// Xlib connections must not be shared between threads, so each playback
/// thread opens its own `Injector`. The connection closes on drop.
pub struct Injector {
    display: *mut xlib::Display,
}

impl Injector {
    /// Open a connection to the default display.
    pub fn open() -> Result<Self> {
        let display = unsafe { xlib::XOpenDisplay(null()) };
        if display.is_null() {
            return Err(Error::SimulateFailed(
                "failed to open X display (is DISPLAY set?)".into(),
            ));
        }

        let (mut event_base, mut error_base, mut major, mut minor) = (0, 0, 0, 0);
        let has_xtest = unsafe {
            xtest::XTestQueryExtension(
                display,
                &mut event_base,
                &mut error_base,
                &mut major,
                &mut minor,
            )
        };
        if has_xtest == FALSE {
            unsafe { xlib::XCloseDisplay(display) };
            return Err(Error::SimulateFailed("XTest extension not available".into()));
        }

        Ok(Self { display })
    }

    fn key(&mut self, key: Key, pressed: bool) -> Result<()> {
        let keycode = key_to_keycode(key)
            .ok_or_else(|| Error::SimulateFailed(format!("unsupported key: {:?}", key)))?;
        let ok = unsafe {
            xtest::XTestFakeKeyEvent(self.display, keycode, if pressed { TRUE } else { FALSE }, 0)
        };
        self.flush(ok, "XTestFakeKeyEvent")
    }

    fn button(&mut self, code: c_uint, pressed: bool) -> Result<()> {
        let ok = unsafe {
            xtest::XTestFakeButtonEvent(self.display, code, if pressed { TRUE } else { FALSE }, 0)
        };
        self.flush(ok, "XTestFakeButtonEvent")
    }

    fn motion(&mut self, x: f64, y: f64) -> Result<()> {
        let ok = unsafe {
            xtest::XTestFakeMotionEvent(self.display, -1, to_coord(x), to_coord(y), 0)
        };
        self.flush(ok, "XTestFakeMotionEvent")
    }

    fn scroll(&mut self, direction: ScrollDirection, notches: f64) -> Result<()> {
        let code = match direction {
            ScrollDirection::Up => 4,
            ScrollDirection::Down => 5,
            ScrollDirection::Left => 6,
            ScrollDirection::Right => 7,
        };
        let notches = if notches.is_finite() {
            notches.abs().round().max(1.0) as u32
        } else {
            1
        };
        for _ in 0..notches {
            self.button(code, true)?;
            self.button(code, false)?;
        }
        Ok(())
    }

    fn flush(&mut self, status: c_int, call: &str) -> Result<()> {
        unsafe {
            xlib::XFlush(self.display);
        }
        if status == FALSE {
            Err(Error::SimulateFailed(format!("{call} failed")))
        } else {
            Ok(())
        }
    }
}

impl EventSink for Injector {
    fn send(&mut self, event: &Event) -> Result<()> {
        match event.event_type {
            EventType::KeyPressed | EventType::KeyReleased => {
                if let Some(kb) = &event.keyboard {
                    self.key(kb.key, event.event_type == EventType::KeyPressed)?;
                }
            }
            EventType::MousePressed | EventType::MouseReleased => {
                if let Some(mouse) = &event.mouse
                    && let Some(button) = mouse.button
                {
                    // Press where it happened; the pointer may have moved since.
                    self.motion(mouse.x, mouse.y)?;
                    self.button(
                        button_to_code(button),
                        event.event_type == EventType::MousePressed,
                    )?;
                }
            }
            EventType::MouseMoved | EventType::MouseDragged => {
                if let Some(mouse) = &event.mouse {
                    self.motion(mouse.x, mouse.y)?;
                }
            }
            EventType::MouseWheel => {
                if let Some(wheel) = &event.wheel {
                    self.motion(wheel.x, wheel.y)?;
                    self.scroll(wheel.direction, wheel.delta)?;
                }
            }
            EventType::HookEnabled | EventType::HookDisabled => {}
        }
        Ok(())
    }
}

impl Drop for Injector {
    fn drop(&mut self) {
        unsafe {
            xlib::XSync(self.display, FALSE);
            xlib::XCloseDisplay(self.display);
        }
    }
}

/// X11 button number for a button.
fn button_to_code(button: Button) -> c_uint {
    match button {
        Button::Left => 1,
        Button::Middle => 2,
        Button::Right => 3,
        Button::Button4 => 8,
        Button::Button5 => 9,
        Button::Unknown(code) => code as c_uint,
    }
}

fn to_coord(v: f64) -> c_int {
    if v.is_finite() {
        v.clamp(c_int::MIN as f64, c_int::MAX as f64).round() as c_int
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_codes() {
        assert_eq!(button_to_code(Button::Left), 1);
        assert_eq!(button_to_code(Button::Middle), 2);
        assert_eq!(button_to_code(Button::Right), 3);
        assert_eq!(button_to_code(Button::Button4), 8);
        assert_eq!(button_to_code(Button::Unknown(11)), 11);
    }

    #[test]
    fn test_to_coord_clamps() {
        assert_eq!(to_coord(10.4), 10);
        assert_eq!(to_coord(f64::NAN), 0);
        assert_eq!(to_coord(1e20), c_int::MAX);
    }
}
