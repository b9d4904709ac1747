//! X11 input listening using XRecord.

use crate::error::{Error, Result};
use crate::event::{Button, Event, ScrollDirection};
use crate::hook::EventHandler;
use crate::state::{self, InputMask};
use std::os::raw::{c_char, c_int, c_uchar, c_ulong};
use std::ptr::null;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use x11::xlib;
use x11::xrecord;

use crate::platform::linux::keycodes::keycode_to_key;

/// Handler for the running hook. `Some` while a hook is active.
static HANDLER: Mutex<Option<Box<dyn EventHandler>>> = Mutex::new(None);

/// Running flag of the active hook; cleared to stop.
static STOP_FLAG: Mutex<Option<Arc<AtomicBool>>> = Mutex::new(None);

/// XRecord context, needed by `stop_hook` on another connection.
static CONTEXT: Mutex<Option<xrecord::XRecordContext>> = Mutex::new(None);

/// Held buttons and modifiers seen by the active hook.
static MASK: InputMask = InputMask::new();

const FALSE: c_int = 0;

/// Leading bytes of a core protocol event as delivered by XRecord.
#[repr(C)]
struct XRecordDatum {
    type_: u8,
    code: u8,
    _rest: u64,
    _1: bool,
    _2: bool,
    _3: bool,
    root_x: i16,
    root_y: i16,
    _event_x: i16,
    _event_y: i16,
    _state: u16,
}

fn poisoned() -> Error {
    Error::ThreadError("hook state mutex poisoned".into())
}

/// Map an X11 button number to a button. 4..=7 are wheel notches.
fn button_from_code(code: u8) -> Option<Button> {
    match code {
        1 => Some(Button::Left),
        2 => Some(Button::Middle),
        3 => Some(Button::Right),
        4..=7 => None,
        8 => Some(Button::Button4),
        9 => Some(Button::Button5),
        c => Some(Button::Unknown(c)),
    }
}

fn wheel_direction(code: u8) -> Option<ScrollDirection> {
    match code {
        4 => Some(ScrollDirection::Up),
        5 => Some(ScrollDirection::Down),
        6 => Some(ScrollDirection::Left),
        7 => Some(ScrollDirection::Right),
        _ => None,
    }
}

/// Convert a raw X11 event to an `Event`, updating `mask` on the way.
fn convert_event(mask: &InputMask, type_: c_int, code: u8, x: f64, y: f64) -> Option<Event> {
    let event = match type_ {
        t if t == xlib::KeyPress || t == xlib::KeyRelease => {
            let pressed = t == xlib::KeyPress;
            let code32 = code as u32;
            let key = keycode_to_key(code32);
            mask.update(state::modifier_mask(key), pressed);
            if pressed {
                Event::key_pressed(key, code32)
            } else {
                Event::key_released(key, code32)
            }
        }

        t if t == xlib::ButtonPress => match button_from_code(code) {
            Some(button) => {
                mask.set(state::button_mask(button));
                Event::mouse_pressed(button, x, y)
            }
            None => Event::mouse_wheel(x, y, wheel_direction(code)?, 1.0),
        },

        t if t == xlib::ButtonRelease => {
            // A wheel notch arrives as press + release; the press already counted.
            let button = button_from_code(code)?;
            mask.unset(state::button_mask(button));
            Event::mouse_released(button, x, y)
        }

        t if t == xlib::MotionNotify => {
            if mask.is_button_held() {
                Event::mouse_dragged(x, y)
            } else {
                Event::mouse_moved(x, y)
            }
        }

        _ => return None,
    };

    Some(event.with_mask(mask.get()))
}

fn dispatch(event: &Event) {
    if let Ok(guard) = HANDLER.lock()
        && let Some(ref handler) = *guard
    {
        handler.handle_event(event);
    }
}

fn is_stopping() -> bool {
    match STOP_FLAG.lock() {
        Ok(guard) => guard
            .as_ref()
            .is_some_and(|flag| !flag.load(Ordering::SeqCst)),
        Err(_) => true,
    }
}

/// XRecord callback
#[allow(clippy::cast_ptr_alignment)]
unsafe extern "C" fn record_callback(
    _null: *mut c_char,
    raw_data: *mut xrecord::XRecordInterceptData,
) {
    unsafe {
        let Some(data) = raw_data.as_ref() else {
            return;
        };

        if data.category == xrecord::XRecordFromServer && !is_stopping() {
            if let Some(xdatum) = (data.data as *const XRecordDatum).as_ref()
                && let Some(event) = convert_event(
                    &MASK,
                    xdatum.type_ as c_int,
                    xdatum.code,
                    xdatum.root_x as f64,
                    xdatum.root_y as f64,
                )
            {
                log::trace!("captured {:?}", event.event_type);
                dispatch(&event);
            }
        }

        xrecord::XRecordFreeData(raw_data);
    }
}

/// Clears the process-wide hook state however `run_hook` exits.
struct ActiveHook;

impl Drop for ActiveHook {
    fn drop(&mut self) {
        if let Ok(mut c) = CONTEXT.lock() {
            *c = None;
        }
        if let Ok(mut s) = STOP_FLAG.lock() {
            *s = None;
        }
        if let Ok(mut h) = HANDLER.lock() {
            *h = None;
        }
    }
}

/// Run the event hook (blocking) until `stop_hook` is called.
pub fn run_hook<H: EventHandler + 'static>(running: &Arc<AtomicBool>, handler: H) -> Result<()> {
    {
        let mut h = HANDLER.lock().map_err(|_| poisoned())?;
        if h.is_some() {
            return Err(Error::AlreadyRunning);
        }
        *h = Some(Box::new(handler));
    }
    let _active = ActiveHook;

    *STOP_FLAG.lock().map_err(|_| poisoned())? = Some(running.clone());
    MASK.reset();

    unsafe {
        let dpy_data = xlib::XOpenDisplay(null());
        if dpy_data.is_null() {
            return Err(Error::HookStartFailed(
                "failed to open X display (is DISPLAY set?)".into(),
            ));
        }

        let extension = xlib::XInitExtension(dpy_data, c"RECORD".as_ptr());
        if extension.is_null() {
            xlib::XCloseDisplay(dpy_data);
            return Err(Error::HookStartFailed(
                "XRecord extension not available".into(),
            ));
        }

        // Core device events: KeyPress..=MotionNotify.
        let range = xrecord::XRecordAllocRange();
        if range.is_null() {
            xlib::XCloseDisplay(dpy_data);
            return Err(Error::HookStartFailed("XRecordAllocRange failed".into()));
        }
        (*range).device_events.first = xlib::KeyPress as c_uchar;
        (*range).device_events.last = xlib::MotionNotify as c_uchar;

        let mut ranges = range;
        let mut all_clients: c_ulong = xrecord::XRecordAllClients;
        let context =
            xrecord::XRecordCreateContext(dpy_data, 0, &mut all_clients, 1, &mut ranges, 1);
        xlib::XFree(range.cast());

        if context == 0 {
            xlib::XCloseDisplay(dpy_data);
            return Err(Error::HookStartFailed(
                "failed to create XRecord context".into(),
            ));
        }

        xlib::XSync(dpy_data, FALSE);

        match CONTEXT.lock() {
            Ok(mut c) => *c = Some(context),
            Err(_) => {
                xrecord::XRecordFreeContext(dpy_data, context);
                xlib::XCloseDisplay(dpy_data);
                return Err(poisoned());
            }
        }

        log::debug!("XRecord context {context} created");
        dispatch(&Event::hook_enabled());

        // Blocks until another connection disables the context. A stop that
        // raced ahead of the context being stored is honoured here.
        let enabled = if running.load(Ordering::SeqCst) {
            xrecord::XRecordEnableContext(dpy_data, context, Some(record_callback), &mut 0)
        } else {
            1
        };

        dispatch(&Event::hook_disabled());

        xrecord::XRecordFreeContext(dpy_data, context);
        xlib::XCloseDisplay(dpy_data);

        if enabled == 0 {
            return Err(Error::HookStartFailed(
                "failed to enable XRecord context".into(),
            ));
        }
    }

    log::debug!("XRecord hook finished");
    Ok(())
}

/// Stop the running hook, unblocking `run_hook`.
pub fn stop_hook() -> Result<()> {
    if let Ok(guard) = STOP_FLAG.lock()
        && let Some(ref flag) = *guard
    {
        flag.store(false, Ordering::SeqCst);
    }

    let context = *CONTEXT.lock().map_err(|_| poisoned())?;
    let Some(context) = context else {
        return Ok(());
    };

    // XRecordEnableContext only returns once the context is disabled from a
    // separate control connection.
    unsafe {
        let dpy_control = xlib::XOpenDisplay(null());
        if dpy_control.is_null() {
            return Err(Error::HookStopFailed(
                "failed to open X control display".into(),
            ));
        }
        xrecord::XRecordDisableContext(dpy_control, context);
        xlib::XFlush(dpy_control);
        xlib::XCloseDisplay(dpy_control);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use crate::keycode::Key;

    #[test]
    fn test_motion_becomes_drag_while_button_held() {
        let mask = InputMask::new();
        let moved = convert_event(&mask, xlib::MotionNotify, 0, 5.0, 6.0).unwrap();
        assert_eq!(moved.event_type, EventType::MouseMoved);

        let pressed = convert_event(&mask, xlib::ButtonPress, 1, 5.0, 6.0).unwrap();
        assert_eq!(pressed.event_type, EventType::MousePressed);
        assert_eq!(pressed.mask, state::MASK_BUTTON1);

        let dragged = convert_event(&mask, xlib::MotionNotify, 0, 7.0, 8.0).unwrap();
        assert_eq!(dragged.event_type, EventType::MouseDragged);

        convert_event(&mask, xlib::ButtonRelease, 1, 7.0, 8.0).unwrap();
        let moved = convert_event(&mask, xlib::MotionNotify, 0, 9.0, 9.0).unwrap();
        assert_eq!(moved.event_type, EventType::MouseMoved);
    }

    #[test]
    fn test_wheel_press_and_release() {
        let mask = InputMask::new();
        let wheel = convert_event(&mask, xlib::ButtonPress, 5, 1.0, 1.0).unwrap();
        assert_eq!(wheel.event_type, EventType::MouseWheel);
        assert_eq!(wheel.wheel.unwrap().direction, ScrollDirection::Down);
        assert!(convert_event(&mask, xlib::ButtonRelease, 5, 1.0, 1.0).is_none());
        assert!(!mask.is_button_held());
    }

    #[test]
    fn test_key_events_track_modifiers() {
        let mask = InputMask::new();
        let shift = convert_event(&mask, xlib::KeyPress, 50, 0.0, 0.0).unwrap();
        assert_eq!(shift.pressed_key(), Some(Key::ShiftLeft));
        assert_eq!(shift.mask, state::MASK_SHIFT);

        let p = convert_event(&mask, xlib::KeyPress, 33, 0.0, 0.0).unwrap();
        assert_eq!(p.pressed_key(), Some(Key::KeyP));
        assert_eq!(p.mask, state::MASK_SHIFT);

        let released = convert_event(&mask, xlib::KeyRelease, 50, 0.0, 0.0).unwrap();
        assert_eq!(released.event_type, EventType::KeyReleased);
        assert_eq!(released.mask, 0);
    }

    #[test]
    fn test_extra_buttons() {
        let mask = InputMask::new();
        let back = convert_event(&mask, xlib::ButtonPress, 8, 0.0, 0.0).unwrap();
        assert_eq!(back.mouse.unwrap().button, Some(Button::Button4));
        assert!(convert_event(&mask, xlib::FocusIn, 0, 0.0, 0.0).is_none());
    }
}
