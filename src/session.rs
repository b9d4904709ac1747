//! The delay, record and loop-playback sequence.

use crate::capture::capture_until;
use crate::error::Result;
use crate::keycode::Key;
use crate::platform::Injector;
use crate::playback;
use std::thread;
use std::time::{Duration, Instant};

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    /// Wait before capture starts.
    pub start_delay: Duration,
    /// Keep starting new replays until this much time has passed.
    pub loop_for: Duration,
    /// Pause after each replay.
    pub between_loops: Duration,
    /// Key that ends capture.
    pub stop_key: Key,
    /// Playback speed multiplier.
    pub speed: f64,
}

/// Run `iteration` repeatedly, sleeping `between` after each run, until at
/// least `loop_for` has elapsed since the first one started.
///
/// The first iteration always runs, even when `loop_for` is zero. Returns the
/// number of iterations; an iteration error ends the loop.
pub fn run_loop<F>(loop_for: Duration, between: Duration, mut iteration: F) -> Result<u64>
where
    F: FnMut(u64) -> Result<()>,
{
    let start = Instant::now();
    let mut count = 0;
    loop {
        count += 1;
        iteration(count)?;
        thread::sleep(between);
        if start.elapsed() >= loop_for {
            return Ok(count);
        }
    }
}

/// Wait, record until the stop key, then replay on a loop.
pub fn run(config: &LoopConfig) -> Result<()> {
    if !config.start_delay.is_zero() {
        log::info!("recording starts in {:?}", config.start_delay);
        thread::sleep(config.start_delay);
    }

    println!("Start Recording Input...");
    let recording = capture_until(config.stop_key)?;
    log::info!(
        "recorded {} events ({} mouse, {} keyboard)",
        recording.event_count(),
        recording.mouse.len(),
        recording.keyboard.len()
    );
    if recording.is_empty() {
        log::warn!("nothing was recorded; playback will only wait");
    }

    let iterations = run_loop(config.loop_for, config.between_loops, |n| {
        log::debug!("playback #{n}");
        playback::play(&recording, config.speed, Injector::open)
    })?;

    log::info!("done after {iterations} playback(s)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_runs_at_least_once_with_zero_duration() {
        let mut calls = 0;
        let n = run_loop(Duration::ZERO, Duration::ZERO, |_| {
            calls += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(n, 1);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_stops_once_duration_elapsed() {
        let started = Instant::now();
        let n = run_loop(Duration::from_millis(60), Duration::from_millis(25), |_| Ok(())).unwrap();
        let elapsed = started.elapsed();

        // 25ms per pass: the third pass is the first to finish at or past 60ms.
        assert!(n >= 2, "ran {n} times");
        assert!(n <= 3, "ran {n} times");
        assert!(elapsed >= Duration::from_millis(60));
    }

    #[test]
    fn test_iteration_numbers_count_up() {
        let mut seen = Vec::new();
        run_loop(Duration::from_millis(30), Duration::from_millis(10), |n| {
            seen.push(n);
            Ok(())
        })
        .unwrap();
        let expected: Vec<u64> = (1..=seen.len() as u64).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_error_stops_loop() {
        let mut calls = 0;
        let err = run_loop(Duration::from_secs(60), Duration::ZERO, |_| {
            calls += 1;
            Err(Error::SimulateFailed("gone".into()))
        })
        .unwrap_err();
        assert!(matches!(err, Error::SimulateFailed(_)));
        assert_eq!(calls, 1);
    }
}
