//! Command-line arguments.

use crate::duration::{self, Unit};
use crate::error::Result;
use crate::keycode::Key;
use crate::playback;
use crate::session::LoopConfig;
use clap::{ArgAction, Parser};

/// Record mouse and keyboard input, then replay it on a loop.
///
/// Waits DURATION_UNTIL_RECORDING, records until the stop key is pressed,
/// then replays the recording every DURATION_BETWEEN_LOOPS until
/// DURATION_WHILE_LOOP has passed. All three durations share one unit; if
/// several unit flags are given, minutes win over hours.
#[derive(Parser, Debug, Clone)]
#[command(name = "macroloop", version)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Delay before recording starts
    #[arg(allow_negative_numbers = true)]
    pub duration_until_recording: f64,

    /// How long to keep replaying the recording
    #[arg(allow_negative_numbers = true)]
    pub duration_while_loop: f64,

    /// Pause after each replay
    #[arg(allow_negative_numbers = true)]
    pub duration_between_loops: f64,

    /// Durations are in seconds (default)
    #[arg(short, long)]
    pub seconds: bool,

    /// Durations are in minutes
    #[arg(short, long)]
    pub minutes: bool,

    /// Durations are in hours
    #[arg(short = 'h', long)]
    pub hours: bool,

    /// Key that stops recording
    #[arg(short, long, default_value = "p")]
    pub key: Key,

    /// Playback speed multiplier
    #[arg(long, default_value_t = 1.0)]
    pub speed: f64,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print help (`-h` is taken by --hours)
    #[arg(long, action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,
}

impl Cli {
    pub fn unit(&self) -> Unit {
        Unit::from_flags(self.seconds, self.minutes, self.hours)
    }

    /// Default `env_logger` filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Validate the arguments and convert them into a [`LoopConfig`].
    pub fn to_config(&self) -> Result<LoopConfig> {
        let unit = self.unit();
        Ok(LoopConfig {
            start_delay: duration::to_wait(self.duration_until_recording, unit)?,
            // A negative loop length only means "one pass".
            loop_for: duration::to_wait(non_negative(self.duration_while_loop), unit)?,
            between_loops: duration::to_wait(self.duration_between_loops, unit)?,
            stop_key: self.key,
            speed: playback::validate_speed(self.speed)?,
        })
    }
}

fn non_negative(value: f64) -> f64 {
    if value < 0.0 { 0.0 } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::time::Duration;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("macroloop").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_to_config_in_minutes() {
        let config = parse(&["1", "2", "0.5", "-m"]).to_config().unwrap();
        assert_eq!(config.start_delay, Duration::from_secs(60));
        assert_eq!(config.loop_for, Duration::from_secs(120));
        assert_eq!(config.between_loops, Duration::from_secs(30));
        assert_eq!(config.stop_key, Key::KeyP);
        assert_eq!(config.speed, 1.0);
    }

    #[test]
    fn test_negative_duration_rejected_by_config() {
        let err = parse(&["-1", "2", "3"]).to_config().unwrap_err();
        assert!(matches!(err, Error::InvalidDuration { value } if value == -1.0));
    }

    #[test]
    fn test_negative_loop_length_means_single_pass() {
        let config = parse(&["0", "-5", "1"]).to_config().unwrap();
        assert_eq!(config.loop_for, Duration::ZERO);
        assert_eq!(config.between_loops, Duration::from_secs(1));

        let err = parse(&["0", "0", "-1"]).to_config().unwrap_err();
        assert!(matches!(err, Error::InvalidDuration { value } if value == -1.0));
    }

    #[test]
    fn test_several_unit_flags_prefer_minutes() {
        let cli = parse(&["1", "1", "1", "-m", "-h"]);
        assert_eq!(cli.unit(), Unit::Minutes);
        assert_eq!(cli.to_config().unwrap().loop_for, Duration::from_secs(60));
    }

    #[test]
    fn test_zero_speed_rejected_by_config() {
        let err = parse(&["0", "0", "0", "--speed", "0"]).to_config().unwrap_err();
        assert!(matches!(err, Error::InvalidSpeed(_)));
    }

    #[test]
    fn test_log_filter() {
        assert_eq!(parse(&["0", "0", "0"]).log_filter(), "info");
        assert_eq!(parse(&["0", "0", "0", "-v"]).log_filter(), "debug");
        assert_eq!(parse(&["0", "0", "0", "-vvv"]).log_filter(), "trace");
    }
}
