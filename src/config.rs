//! Configuration - YAML file settings and the resolved run configuration
//!
//! Two layers:
//! - [`AppConfig`]: optional YAML file (logging plus default sizes)
//! - [`RunConfig`]: command-line values resolved against those defaults,
//!   with every size clamped into range. The harness only ever sees this.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::bench::{BenchMode, IntervalPlan};
use crate::cli::CliArgs;
use crate::core_types::MAX_TEST_SIZE;
use crate::error::ConfigError;

pub const DEFAULT_WIDTH: usize = 80;
pub const DEFAULT_HEIGHT: usize = 20;
pub const DEFAULT_TEST_SIZE: usize = 1000;
pub const DEFAULT_KEEP_SIZE: usize = 20;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    Never,
    Hourly,
    Daily,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub use_json: bool,
    /// Log file directory; file logging is off unless both dir and file are set
    pub log_dir: Option<String>,
    pub log_file: Option<String>,
    pub rotation: Rotation,
    pub defaults: SizeDefaults,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            use_json: false,
            log_dir: None,
            log_file: None,
            rotation: Rotation::Never,
            defaults: SizeDefaults::default(),
        }
    }
}

/// Values used when a size is not given (or is invalid) on the command line
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct SizeDefaults {
    pub width: usize,
    pub height: usize,
    pub test_size: usize,
    pub keep_size: usize,
}

impl Default for SizeDefaults {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            test_size: DEFAULT_TEST_SIZE,
            keep_size: DEFAULT_KEEP_SIZE,
        }
    }
}

impl AppConfig {
    /// Load from a YAML file, or built-in defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Fully resolved parameters of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Snapshot width in columns
    pub width: usize,
    /// Snapshot height in lines
    pub height: usize,
    pub test_size: usize,
    /// Keys left after the removal pass, `<= test_size`
    pub keep_size: usize,
    /// Corruption attempts, `<= keep_size`
    pub break_size: usize,
    pub mode: BenchMode,
    pub interval: IntervalPlan,
    pub full_verify: bool,
    pub walkthrough: bool,
}

impl RunConfig {
    /// Resolve command-line values against `defaults`.
    ///
    /// Non-positive sizes fall back to their defaults, as does a test size
    /// with keys beyond the [`Key`](crate::core_types::Key) range. The keep
    /// size is capped at the test size, and a break size outside
    /// `[0, keep_size]` becomes 0. Of several mode flags the last one given
    /// wins. Zero sizes in `defaults` are raised to 1.
    pub fn resolve(args: &CliArgs, defaults: &SizeDefaults) -> Self {
        let positive = |value: Option<i64>, default: usize| match value {
            Some(v) if v > 0 => v as usize,
            _ => default.max(1),
        };
        let fits_key_space = |size: usize| size as u64 <= MAX_TEST_SIZE;

        let default_test_size = if fits_key_space(defaults.test_size) {
            defaults.test_size
        } else {
            DEFAULT_TEST_SIZE
        };
        let test_size = match args.test_size {
            Some(v) if v > 0 && v as u64 <= MAX_TEST_SIZE => v as usize,
            _ => default_test_size.max(1),
        };
        let keep_size = positive(args.keep_size, defaults.keep_size).min(test_size);
        let break_size = match args.break_size {
            Some(v) if v >= 0 && v as usize <= keep_size => v as usize,
            _ => 0,
        };
        let requested = args.interval.filter(|&i| i > 0).map(|i| i as usize);

        Self {
            width: positive(args.width, defaults.width),
            height: positive(args.height, defaults.height),
            test_size,
            keep_size,
            break_size,
            mode: args.modes.last().copied().unwrap_or_default(),
            interval: IntervalPlan::resolve(test_size, requested),
            full_verify: args.full_verify,
            walkthrough: args.walkthrough,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_nothing_given() {
        let config = RunConfig::resolve(&CliArgs::default(), &SizeDefaults::default());
        assert_eq!(config.width, 80);
        assert_eq!(config.height, 20);
        assert_eq!(config.test_size, 1000);
        assert_eq!(config.keep_size, 20);
        assert_eq!(config.break_size, 0);
        assert_eq!(config.mode, BenchMode::None);
        assert_eq!(config.interval.interval(), 10);
    }

    #[test]
    fn test_invalid_sizes_fall_back() {
        let args = CliArgs {
            width: Some(0),
            height: Some(-4),
            test_size: None,
            keep_size: Some(-1),
            ..Default::default()
        };
        let config = RunConfig::resolve(&args, &SizeDefaults::default());
        assert_eq!(config.width, 80);
        assert_eq!(config.height, 20);
        assert_eq!(config.test_size, 1000);
        assert_eq!(config.keep_size, 20);
    }

    #[test]
    fn test_test_size_beyond_key_space_falls_back() {
        let args = crate::cli::parse(["-n", "4294967301"]).unwrap();
        assert_eq!(args.test_size, Some(4_294_967_301));
        let config = RunConfig::resolve(&args, &SizeDefaults::default());
        assert_eq!(config.test_size, DEFAULT_TEST_SIZE);

        // Largest size still fits: keys 0..=u32::MAX
        let args = crate::cli::parse(["-n", "4294967296"]).unwrap();
        assert_eq!(
            RunConfig::resolve(&args, &SizeDefaults::default()).test_size as u64,
            MAX_TEST_SIZE
        );

        let defaults = SizeDefaults {
            test_size: usize::MAX,
            ..SizeDefaults::default()
        };
        assert_eq!(
            RunConfig::resolve(&CliArgs::default(), &defaults).test_size,
            DEFAULT_TEST_SIZE
        );
    }

    #[test]
    fn test_zero_defaults_raised() {
        let defaults = SizeDefaults {
            width: 0,
            height: 0,
            test_size: 0,
            keep_size: 0,
        };
        let config = RunConfig::resolve(&CliArgs::default(), &defaults);
        assert_eq!(config.width, 1);
        assert_eq!(config.height, 1);
        assert_eq!(config.test_size, 1);
        assert_eq!(config.keep_size, 1);
    }

    #[test]
    fn test_keep_and_break_clamped() {
        let args = CliArgs {
            test_size: Some(10),
            keep_size: Some(50),
            break_size: Some(11),
            ..Default::default()
        };
        let config = RunConfig::resolve(&args, &SizeDefaults::default());
        assert_eq!(config.keep_size, 10);
        assert_eq!(config.break_size, 0, "break size above keep size falls back to 0");

        let args = CliArgs {
            break_size: Some(5),
            ..Default::default()
        };
        assert_eq!(RunConfig::resolve(&args, &SizeDefaults::default()).break_size, 5);

        let args = CliArgs {
            break_size: Some(-3),
            ..Default::default()
        };
        assert_eq!(RunConfig::resolve(&args, &SizeDefaults::default()).break_size, 0);
    }

    #[test]
    fn test_last_mode_wins() {
        let args = CliArgs {
            modes: vec![BenchMode::Insert, BenchMode::Search, BenchMode::Remove],
            ..Default::default()
        };
        assert_eq!(
            RunConfig::resolve(&args, &SizeDefaults::default()).mode,
            BenchMode::Remove
        );
    }

    #[test]
    fn test_interval_request() {
        let args = CliArgs {
            test_size: Some(100_000),
            interval: Some(500),
            ..Default::default()
        };
        assert_eq!(
            RunConfig::resolve(&args, &SizeDefaults::default()).interval.interval(),
            500
        );

        // Non-positive request is treated as unset
        let args = CliArgs {
            test_size: Some(100_000),
            interval: Some(-7),
            ..Default::default()
        };
        assert_eq!(
            RunConfig::resolve(&args, &SizeDefaults::default()).interval.interval(),
            1000
        );
    }

    #[test]
    fn test_load_without_path() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.defaults, SizeDefaults::default());
    }

    #[test]
    fn test_load_yaml_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "log_level: debug\nrotation: daily\ndefaults:\n  test_size: 5000\n  keep_size: 100"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.rotation, Rotation::Daily);
        assert!(!config.use_json);
        assert_eq!(config.defaults.test_size, 5000);
        assert_eq!(config.defaults.keep_size, 100);
        assert_eq!(config.defaults.width, DEFAULT_WIDTH);

        let run = RunConfig::resolve(&CliArgs::default(), &config.defaults);
        assert_eq!(run.test_size, 5000);
        assert_eq!(run.keep_size, 100);
    }

    #[test]
    fn test_load_errors() {
        let missing = AppConfig::load(Some(Path::new("/nonexistent/treebench.yaml")));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level: [unterminated").unwrap();
        let bad = AppConfig::load(Some(file.path()));
        assert!(matches!(bad, Err(ConfigError::Parse { .. })));
    }
}
