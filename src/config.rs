//! Configuration loading and management

use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// How the console renderer writes its output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable headline, animation frames and haptic cues
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => bail!("unknown output format '{}' (expected text or json)", other),
        }
    }
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// How long Shaking is held after the shake ends
    pub hold: Duration,

    /// Capacity of the motion source -> state machine channel
    pub signal_buffer: usize,

    /// Capacity of the state event broadcast channel
    pub event_buffer: usize,

    /// Interval between animation frames
    pub frame_interval: Duration,

    /// Renderer output format
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hold: Duration::from_secs(3),
            signal_buffer: 32,
            event_buffer: 64,
            frame_interval: Duration::from_millis(120),
            output: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let hold = match lookup("SHAKE_HOLD_MS") {
            Some(raw) => Duration::from_millis(parse_var("SHAKE_HOLD_MS", &raw)?),
            None => defaults.hold,
        };

        let signal_buffer = match lookup("SHAKE_SIGNAL_BUFFER") {
            Some(raw) => parse_var("SHAKE_SIGNAL_BUFFER", &raw)?,
            None => defaults.signal_buffer,
        };

        let event_buffer = match lookup("SHAKE_EVENT_BUFFER") {
            Some(raw) => parse_var("SHAKE_EVENT_BUFFER", &raw)?,
            None => defaults.event_buffer,
        };

        let frame_interval = match lookup("SHAKE_FRAME_MS") {
            Some(raw) => Duration::from_millis(parse_var("SHAKE_FRAME_MS", &raw)?),
            None => defaults.frame_interval,
        };

        let output = match lookup("SHAKE_OUTPUT") {
            Some(raw) => raw.parse::<OutputFormat>().context("invalid SHAKE_OUTPUT")?,
            None => defaults.output,
        };

        let config = Self {
            hold,
            signal_buffer,
            event_buffer,
            frame_interval,
            output,
        };
        config.validate()?;

        Ok(config)
    }

    /// Reject values the channels and timers cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.signal_buffer == 0 {
            bail!("SHAKE_SIGNAL_BUFFER must be greater than zero");
        }
        if self.event_buffer == 0 {
            bail!("SHAKE_EVENT_BUFFER must be greater than zero");
        }
        if self.frame_interval.is_zero() {
            bail!("SHAKE_FRAME_MS must be greater than zero");
        }
        Ok(())
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("invalid {} value '{}'", key, raw))
}
