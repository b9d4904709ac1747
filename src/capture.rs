//! Recording input until a stop key is pressed.
//!
//! One hook observes everything; each event is routed into the mouse or the
//! keyboard track in arrival order, stamped with the time since capture began.
//!
//! # Example
//!
//! ```no_run
//! use macroloop::{Key, capture_until};
//!
//! let recording = capture_until(Key::KeyP).unwrap();
//! println!(
//!     "{} mouse / {} keyboard events",
//!     recording.mouse.len(),
//!     recording.keyboard.len()
//! );
//! ```

use crate::error::{Error, Result};
use crate::event::Event;
use crate::hook::Hook;
use crate::keycode::Key;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// How often the waiting thread checks that the hook is still alive.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// An event with its time offset from the start of capture.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    /// Time elapsed since capture started.
    pub elapsed: Duration,
    /// The event that occurred.
    pub event: Event,
}

/// Events of one kind, in the order they happened.
pub type Track = Vec<RecordedEvent>;

/// The result of one capture: a mouse track and a keyboard track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    pub mouse: Track,
    pub keyboard: Track,
}

impl Recording {
    /// Total number of events across both tracks.
    pub fn event_count(&self) -> usize {
        self.mouse.len() + self.keyboard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mouse.is_empty() && self.keyboard.is_empty()
    }

    /// Offset of the last recorded event in either track.
    pub fn duration(&self) -> Duration {
        let last = |track: &Track| track.last().map_or(Duration::ZERO, |e| e.elapsed);
        last(&self.mouse).max(last(&self.keyboard))
    }
}

#[derive(Default)]
struct BufferState {
    recording: Recording,
    stopped: bool,
}

/// Collects hook events into a [`Recording`] and watches for the stop key.
///
/// This is the part of capture that has no OS dependency.
pub struct CaptureBuffer {
    stop_key: Key,
    started: Instant,
    state: Mutex<BufferState>,
}

impl CaptureBuffer {
    pub fn new(stop_key: Key) -> Self {
        Self {
            stop_key,
            started: Instant::now(),
            state: Mutex::new(BufferState::default()),
        }
    }

    /// Route one event, timestamped now. Returns `true` exactly once, when
    /// the stop key is pressed.
    pub fn accept(&self, event: &Event) -> bool {
        self.accept_at(event, self.started.elapsed())
    }

    /// Route one event with an explicit offset.
    ///
    /// The stop key press itself is not recorded, and nothing after it is.
    pub fn accept_at(&self, event: &Event, elapsed: Duration) -> bool {
        let Ok(mut state) = self.state.lock() else {
            log::warn!("capture buffer poisoned, dropping {:?}", event.event_type);
            return false;
        };
        if state.stopped {
            return false;
        }

        if event.pressed_key() == Some(self.stop_key) {
            state.stopped = true;
            return true;
        }

        let recorded = RecordedEvent {
            elapsed,
            event: event.clone(),
        };
        if event.is_mouse() {
            state.recording.mouse.push(recorded);
        } else if event.is_keyboard() {
            state.recording.keyboard.push(recorded);
        }
        false
    }

    pub fn is_stopped(&self) -> bool {
        self.state.lock().is_ok_and(|state| state.stopped)
    }

    /// Take everything recorded so far, leaving the buffer empty.
    pub fn take_recording(&self) -> Result<Recording> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| Error::ThreadError("capture buffer poisoned".into()))?;
        Ok(std::mem::take(&mut state.recording))
    }
}

/// Record mouse and keyboard input until `stop_key` is pressed.
///
/// Blocks the calling thread. Fails if the hook cannot be started or exits
/// before the stop key arrives.
pub fn capture_until(stop_key: Key) -> Result<Recording> {
    let buffer = Arc::new(CaptureBuffer::new(stop_key));
    let (tx, rx) = mpsc::sync_channel::<()>(1);

    let sink = buffer.clone();
    let hook = Hook::spawn(move |event: &Event| {
        if sink.accept(event) {
            let _ = tx.try_send(());
        }
    })?;

    log::info!("recording input, press {stop_key} to stop");

    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(()) => break,
            Err(RecvTimeoutError::Timeout) if !hook.is_finished() => {}
            Err(_) => {
                // The hook thread ended on its own; surface its error if it has one.
                hook.stop()?;
                return Err(Error::HookStopFailed(
                    "input hook exited before the stop key was pressed".into(),
                ));
            }
        }
    }

    hook.stop()?;
    let recording = buffer.take_recording()?;
    log::debug!(
        "capture finished: {} mouse, {} keyboard events over {:?}",
        recording.mouse.len(),
        recording.keyboard.len(),
        recording.duration()
    );
    Ok(recording)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Button, EventType, ScrollDirection};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_routes_events_in_order() {
        let buffer = CaptureBuffer::new(Key::KeyP);
        assert!(!buffer.accept_at(&Event::mouse_moved(1.0, 1.0), ms(1)));
        assert!(!buffer.accept_at(&Event::key_pressed(Key::KeyA, 38), ms(2)));
        assert!(!buffer.accept_at(&Event::mouse_pressed(Button::Left, 1.0, 1.0), ms(3)));
        assert!(!buffer.accept_at(&Event::key_released(Key::KeyA, 38), ms(4)));
        let wheel = Event::mouse_wheel(1.0, 1.0, ScrollDirection::Up, 1.0);
        assert!(!buffer.accept_at(&wheel, ms(5)));

        let recording = buffer.take_recording().unwrap();
        let mouse: Vec<_> = recording.mouse.iter().map(|e| e.event.event_type).collect();
        assert_eq!(
            mouse,
            [
                EventType::MouseMoved,
                EventType::MousePressed,
                EventType::MouseWheel
            ]
        );
        let keyboard: Vec<_> = recording.keyboard.iter().map(|e| e.elapsed).collect();
        assert_eq!(keyboard, [ms(2), ms(4)]);
        assert_eq!(recording.duration(), ms(5));
    }

    #[test]
    fn test_stop_key_ends_capture_and_is_not_recorded() {
        let buffer = CaptureBuffer::new(Key::KeyP);
        buffer.accept_at(&Event::key_pressed(Key::KeyA, 38), ms(1));
        assert!(buffer.accept_at(&Event::key_pressed(Key::KeyP, 33), ms(2)));
        assert!(buffer.is_stopped());

        // Later events, including a second stop press, are ignored.
        assert!(!buffer.accept_at(&Event::key_released(Key::KeyP, 33), ms(3)));
        assert!(!buffer.accept_at(&Event::key_pressed(Key::KeyP, 33), ms(4)));
        assert!(!buffer.accept_at(&Event::mouse_moved(0.0, 0.0), ms(5)));

        let recording = buffer.take_recording().unwrap();
        assert!(recording.mouse.is_empty());
        assert_eq!(recording.keyboard.len(), 1);
        assert_eq!(recording.keyboard[0].event.pressed_key(), Some(Key::KeyA));
    }

    #[test]
    fn test_stop_key_release_does_not_stop() {
        let buffer = CaptureBuffer::new(Key::KeyP);
        assert!(!buffer.accept_at(&Event::key_released(Key::KeyP, 33), ms(1)));
        assert!(!buffer.is_stopped());
    }

    #[test]
    fn test_immediate_stop_gives_empty_recording() {
        let buffer = CaptureBuffer::new(Key::Escape);
        assert!(buffer.accept(&Event::key_pressed(Key::Escape, 9)));
        let recording = buffer.take_recording().unwrap();
        assert!(recording.is_empty());
        assert_eq!(recording.event_count(), 0);
        assert_eq!(recording.duration(), Duration::ZERO);
    }

    #[test]
    fn test_lifecycle_events_are_dropped() {
        let buffer = CaptureBuffer::new(Key::KeyP);
        buffer.accept(&Event::hook_enabled());
        buffer.accept(&Event::hook_disabled());
        assert!(buffer.take_recording().unwrap().is_empty());
    }
}
