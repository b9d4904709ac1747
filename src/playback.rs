//! Replaying a [`Recording`].
//!
//! The mouse and keyboard tracks are replayed at the same time, each on its
//! own thread with its own [`EventSink`]. Within a track the first event is
//! sent immediately and every later one keeps its original gap to the one
//! before it (scaled by the speed factor). The two threads do not share a
//! clock. Keys and buttons a track leaves pressed are released when it ends.

use crate::capture::{RecordedEvent, Recording};
use crate::error::{Error, Result};
use crate::event::{Button, Event, EventType};
use crate::keycode::Key;
use std::thread;
use std::time::{Duration, Instant};

/// Destination for replayed events.
pub trait EventSink {
    /// Inject one event.
    fn send(&mut self, event: &Event) -> Result<()>;
}

/// Check a playback speed multiplier.
pub fn validate_speed(speed: f64) -> Result<f64> {
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(Error::InvalidSpeed(speed))
    }
}

/// Keys and buttons pressed during a replay and not yet released.
#[derive(Debug, Default)]
struct HeldInputs {
    keys: Vec<(Key, u32)>,
    buttons: Vec<(Button, f64, f64)>,
}

impl HeldInputs {
    fn observe(&mut self, event: &Event) {
        match (event.event_type, &event.keyboard, &event.mouse) {
            (EventType::KeyPressed, Some(kb), _) => {
                if !self.keys.iter().any(|(key, _)| *key == kb.key) {
                    self.keys.push((kb.key, kb.raw_code));
                }
            }
            (EventType::KeyReleased, Some(kb), _) => self.keys.retain(|(key, _)| *key != kb.key),
            (EventType::MousePressed, _, Some(mouse)) => {
                if let Some(button) = mouse.button {
                    self.buttons.retain(|(b, _, _)| *b != button);
                    self.buttons.push((button, mouse.x, mouse.y));
                }
            }
            (EventType::MouseReleased, _, Some(mouse)) => {
                if let Some(button) = mouse.button {
                    self.buttons.retain(|(b, _, _)| *b != button);
                }
            }
            _ => {}
        }
    }

    /// Release events for everything still held, most recent first.
    fn releases(&self) -> Vec<Event> {
        let keys = self
            .keys
            .iter()
            .rev()
            .map(|(key, raw)| Event::key_released(*key, *raw));
        let buttons = self
            .buttons
            .iter()
            .rev()
            .map(|(button, x, y)| Event::mouse_released(*button, *x, *y));
        keys.chain(buttons).collect()
    }
}

/// Replay one track into `sink`, blocking until the last event is sent.
///
/// A track may end with keys or buttons still down (held when the stop key
/// was pressed). They are released at the end, so nothing stays stuck
/// between loops.
pub fn play_track<S: EventSink>(track: &[RecordedEvent], speed: f64, sink: &mut S) -> Result<()> {
    let speed = validate_speed(speed)?;
    let Some(first) = track.first() else {
        return Ok(());
    };

    let mut held = HeldInputs::default();
    let result = send_scheduled(track, first, speed, sink, &mut held);

    let releases = held.releases();
    if !releases.is_empty() {
        log::debug!("releasing {} input(s) left held by the track", releases.len());
    }
    for event in &releases {
        if let Err(e) = sink.send(event) {
            log::warn!("failed to release {:?}: {e}", event.event_type);
        }
    }
    result
}

fn send_scheduled<S: EventSink>(
    track: &[RecordedEvent],
    first: &RecordedEvent,
    speed: f64,
    sink: &mut S,
    held: &mut HeldInputs,
) -> Result<()> {
    // Schedule against a fixed start so sleep overshoot does not accumulate.
    let start = Instant::now();
    for recorded in track {
        let offset = recorded.elapsed.saturating_sub(first.elapsed);
        let due = Duration::try_from_secs_f64(offset.as_secs_f64() / speed)
            .map_err(|_| Error::InvalidSpeed(speed))?;
        let now = start.elapsed();
        if due > now {
            thread::sleep(due - now);
        }
        sink.send(&recorded.event)?;
        held.observe(&recorded.event);
    }
    Ok(())
}

fn play_on_thread<F, S>(
    name: &str,
    track: &[RecordedEvent],
    speed: f64,
    open_sink: &F,
) -> Result<()>
where
    F: Fn() -> Result<S>,
    S: EventSink,
{
    if track.is_empty() {
        log::debug!("{name} track is empty, nothing to replay");
        return Ok(());
    }
    let mut sink = open_sink()?;
    let started = Instant::now();
    play_track(track, speed, &mut sink)?;
    log::debug!(
        "{name} track replayed {} events in {:?}",
        track.len(),
        started.elapsed()
    );
    Ok(())
}

fn joined(name: &str, result: thread::Result<Result<()>>) -> Result<()> {
    result.map_err(|_| Error::ThreadError(format!("{name} playback thread panicked")))?
}

/// Replay both tracks of `recording` concurrently and wait for both.
///
/// `open_sink` is called once on each playback thread that has events to
/// send. If both threads fail, the keyboard error is returned.
pub fn play<F, S>(recording: &Recording, speed: f64, open_sink: F) -> Result<()>
where
    F: Fn() -> Result<S> + Sync,
    S: EventSink,
{
    let speed = validate_speed(speed)?;
    let open_sink = &open_sink;

    thread::scope(|scope| {
        let keyboard =
            scope.spawn(|| play_on_thread("keyboard", &recording.keyboard, speed, open_sink));
        let mouse = scope.spawn(|| play_on_thread("mouse", &recording.mouse, speed, open_sink));

        let keyboard = joined("keyboard", keyboard.join());
        let mouse = joined("mouse", mouse.join());
        keyboard.and(mouse)
    })
}
