//! # macroloop
//!
//! Record mouse and keyboard input once, then replay it on a timed loop.
//!
//! A run has three stages:
//!
//! 1. wait for a start delay,
//! 2. [`capture_until`] a stop key is pressed, producing a [`Recording`] with
//!    separate mouse and keyboard tracks,
//! 3. replay both tracks concurrently with [`play`], pausing between passes,
//!    until the loop duration has elapsed ([`session::run_loop`]).
//!
//! ## Example
//!
//! ```no_run
//! use macroloop::{Injector, Key, capture_until, play};
//!
//! let recording = capture_until(Key::Escape).expect("failed to record");
//! play(&recording, 1.0, Injector::open).expect("failed to replay");
//! ```
//!
//! ## Platform
//!
//! Linux under X11 only: capture uses the RECORD extension and playback uses
//! XTEST. The hook keeps process-wide state, so only one capture can run at a
//! time.

pub mod capture;
pub mod cli;
pub mod duration;
pub mod error;
pub mod event;
pub mod hook;
pub mod keycode;
pub mod playback;
pub mod session;
pub mod state;

mod platform;

// Re-exports
pub use capture::{CaptureBuffer, RecordedEvent, Recording, Track, capture_until};
pub use duration::{Unit, convert_duration};
pub use error::{Error, Result};
pub use event::{Button, Event, EventType, KeyboardData, MouseData, ScrollDirection, WheelData};
pub use hook::{EventHandler, Hook};
pub use keycode::Key;
pub use platform::Injector;
pub use playback::{EventSink, play, play_track};
pub use session::{LoopConfig, run, run_loop};
