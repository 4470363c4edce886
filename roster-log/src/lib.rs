//! Roster logging.
//!
//! Leveled logging to stderr, configured from `ROSTER_*` environment
//! variables or explicitly through [`init_with`].
//!
//! ```rust
//! use roster_log::{debug, info, warn};
//!
//! info!("Connected to {}", "http://localhost:9200");
//! debug!(target: "roster::directory", "Resetting collection {}", "staff");
//! warn!("Record skipped");
//! ```
//!
//! # Environment Variables
//!
//! - `ROSTER_DEBUG=1` - shorthand for `ROSTER_LOG_LEVEL=debug`
//! - `ROSTER_LOG_LEVEL=trace|debug|info|warn|error|off`
//! - `ROSTER_LOG_FORMAT=pretty|compact|json`
//! - `ROSTER_LOG_TIMESTAMPS=1|0`

use once_cell::sync::OnceCell;
use std::env;
use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};

// ============================================================================
// Log Levels
// ============================================================================

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    /// Trace level (most verbose)
    Trace = 0,
    /// Debug level
    Debug = 1,
    /// Info level
    Info = 2,
    /// Warning level
    Warn = 3,
    /// Error level
    Error = 4,
    /// Nothing is logged
    Off = 5,
}

impl Level {
    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    /// Upper-case level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `2024-01-01 12:00:00.000 INFO  [target] message`
    Pretty,
    /// `12:00:00 I target: message`
    Compact,
    /// One JSON object per line
    Json,
}

impl Format {
    /// Parse a format name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Current minimum level, read by the macros without touching `CONFIG`.
static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

static CONFIG: OnceCell<LogConfig> = OnceCell::new();

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Minimum level that is written
    pub level: Level,
    /// Output format
    pub format: Format,
    /// Whether lines carry a timestamp
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            format: Format::Pretty,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Read `ROSTER_*` variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| {
            lookup(key).map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        };

        let debug = flag("ROSTER_DEBUG").unwrap_or(false);

        let level = lookup("ROSTER_LOG_LEVEL")
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { Level::Info });

        let format = lookup("ROSTER_LOG_FORMAT")
            .and_then(|s| Format::parse(&s))
            .unwrap_or(Format::Pretty);

        let timestamps = flag("ROSTER_LOG_TIMESTAMPS").unwrap_or(true);

        Self {
            level,
            format,
            timestamps,
        }
    }

    /// Set the minimum level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable timestamps.
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Install an explicit configuration.
///
/// Returns `false` if logging was already initialized; the existing
/// configuration stays in place.
pub fn init_with(config: LogConfig) -> bool {
    let level = config.level;
    if CONFIG.set(config).is_err() {
        return false;
    }
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
    true
}

/// The active configuration, initializing from the environment on first use.
pub fn config() -> &'static LogConfig {
    CONFIG.get_or_init(|| {
        let config = LogConfig::from_env();
        LOG_LEVEL.store(config.level as u8, Ordering::SeqCst);
        config
    })
}

/// Check if a level would be written.
///
/// Without a prior [`init_with`], the first call reads the environment.
#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    config();
    level != Level::Off && level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

// ============================================================================
// Output
// ============================================================================

/// Write one line. Used by the macros.
#[doc(hidden)]
pub fn log(level: Level, target: &str, message: &str) {
    if !is_level_enabled(level) {
        return;
    }

    let line = render(level, target, message, config());
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "{}", line);
}

/// Format a line without writing it.
pub fn render(level: Level, target: &str, message: &str, config: &LogConfig) -> String {
    match config.format {
        Format::Pretty => render_pretty(level, target, message, config),
        Format::Compact => render_compact(level, target, message, config),
        Format::Json => render_json(level, target, message, config),
    }
}

fn render_pretty(level: Level, target: &str, message: &str, config: &LogConfig) -> String {
    let mut line = String::new();

    if config.timestamps {
        let now = chrono::Local::now();
        line.push_str(&format!("{} ", now.format("%Y-%m-%d %H:%M:%S%.3f")));
    }

    line.push_str(&format!("{:5} ", level.as_str()));

    if !target.is_empty() {
        line.push_str(&format!("[{}] ", target));
    }

    line.push_str(message);
    line
}

fn render_compact(level: Level, target: &str, message: &str, config: &LogConfig) -> String {
    let mut line = String::new();

    if config.timestamps {
        let now = chrono::Local::now();
        line.push_str(&format!("{} ", now.format("%H:%M:%S")));
    }

    line.push(level.as_str().chars().next().unwrap_or('?'));
    line.push(' ');

    if !target.is_empty() {
        line.push_str(&format!("{}: ", target));
    }

    line.push_str(message);
    line
}

#[cfg(feature = "json")]
fn render_json(level: Level, target: &str, message: &str, config: &LogConfig) -> String {
    use serde::Serialize;

    #[derive(Serialize)]
    struct LogEntry<'a> {
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<String>,
        level: &'a str,
        target: &'a str,
        message: &'a str,
    }

    let entry = LogEntry {
        timestamp: config.timestamps.then(|| chrono::Utc::now().to_rfc3339()),
        level: level.as_str(),
        target,
        message,
    };

    serde_json::to_string(&entry).unwrap_or_else(|_| message.to_string())
}

#[cfg(not(feature = "json"))]
fn render_json(level: Level, target: &str, message: &str, config: &LogConfig) -> String {
    render_compact(level, target, message, config)
}

// ============================================================================
// Macros
// ============================================================================

/// Shared body of the level macros.
#[doc(hidden)]
#[macro_export]
macro_rules! __emit {
    ($level:ident, target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::$level) {
            $crate::log($crate::Level::$level, $target, &format!($($arg)+));
        }
    };
    ($level:ident, $($arg:tt)+) => {
        $crate::__emit!($level, target: module_path!(), $($arg)+)
    };
}

/// Log at trace level. Accepts an optional leading `target: expr,`.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => { $crate::__emit!(Trace, $($arg)+) };
}

/// Log at debug level.
///
/// Written when `ROSTER_DEBUG=1` or `ROSTER_LOG_LEVEL` is `debug` or lower.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => { $crate::__emit!(Debug, $($arg)+) };
}

/// Log at info level.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => { $crate::__emit!(Info, $($arg)+) };
}

/// Log at warn level.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => { $crate::__emit!(Warn, $($arg)+) };
}

/// Log at error level.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => { $crate::__emit!(Error, $($arg)+) };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Off);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(Level::parse("debug"), Some(Level::Debug));
        assert_eq!(Level::parse(" WARNING "), Some(Level::Warn));
        assert_eq!(Level::parse("none"), Some(Level::Off));
        assert_eq!(Level::parse("loud"), None);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(Format::parse("json"), Some(Format::Json));
        assert_eq!(Format::parse("Compact"), Some(Format::Compact));
        assert_eq!(Format::parse("xml"), None);
    }

    #[test]
    fn test_config_from_lookup_defaults() {
        let config = LogConfig::from_lookup(lookup(&[]));
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn test_debug_flag_lowers_level() {
        let config = LogConfig::from_lookup(lookup(&[("ROSTER_DEBUG", "true")]));
        assert_eq!(config.level, Level::Debug);
    }

    #[test]
    fn test_explicit_level_wins_over_debug_flag() {
        let config = LogConfig::from_lookup(lookup(&[
            ("ROSTER_DEBUG", "1"),
            ("ROSTER_LOG_LEVEL", "error"),
            ("ROSTER_LOG_FORMAT", "json"),
            ("ROSTER_LOG_TIMESTAMPS", "0"),
        ]));
        assert_eq!(config.level, Level::Error);
        assert_eq!(config.format, Format::Json);
        assert!(!config.timestamps);
    }

    #[test]
    fn test_render_pretty_without_timestamp() {
        let config = LogConfig::default().with_timestamps(false);
        let line = render(Level::Warn, "roster::directory", "skipped", &config);
        assert_eq!(line, "WARN  [roster::directory] skipped");
    }

    #[test]
    fn test_render_compact() {
        let config = LogConfig::default()
            .with_format(Format::Compact)
            .with_timestamps(false);
        let line = render(Level::Info, "search", "ok", &config);
        assert_eq!(line, "I search: ok");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_render_json() {
        let config = LogConfig::default()
            .with_format(Format::Json)
            .with_timestamps(false);
        let line = render(Level::Error, "t", "say \"hi\"", &config);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["message"], "say \"hi\"");
        assert!(value.get("timestamp").is_none());
    }

    #[test]
    fn test_off_is_never_enabled() {
        assert!(!is_level_enabled(Level::Off));
    }

    #[test]
    fn test_macros_compile() {
        trace!("trace message");
        debug!("debug message");
        info!("info message");
        warn!("warn message");
        error!("error message");

        let index = "staff";
        debug!(target: "test", "index {}", index);
    }
}
