//! Command-line scanning
//!
//! getopt-style short options: `-n 500`, `-n500` and clustered switches
//! (`-sf`) are all accepted. Values are kept raw here; clamping to valid
//! ranges happens in [`RunConfig::resolve`](crate::config::RunConfig::resolve).

use std::path::PathBuf;

use crate::bench::BenchMode;
use crate::config::SizeDefaults;
use crate::error::CliError;

/// Raw command-line values
///
/// Numeric fields are `None` when the flag is absent or its value does not
/// parse; either way the default applies later.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub test_size: Option<i64>,
    pub keep_size: Option<i64>,
    pub break_size: Option<i64>,
    pub interval: Option<i64>,
    /// Mode selectors in the order given
    pub modes: Vec<BenchMode>,
    pub full_verify: bool,
    pub walkthrough: bool,
    pub config_path: Option<PathBuf>,
}

/// Options that take a value
const VALUE_FLAGS: &[char] = &['w', 'H', 'n', 'r', 'b', 'i', 'c'];

pub fn parse<I, T>(args: I) -> Result<CliArgs, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter().map(Into::<String>::into);

    while let Some(arg) = args.next() {
        let Some(flags) = arg.strip_prefix('-').filter(|f| !f.is_empty()) else {
            return Err(CliError::UnknownFlag(arg.clone()));
        };

        for (pos, flag) in flags.char_indices() {
            if VALUE_FLAGS.contains(&flag) {
                let attached = &flags[pos + flag.len_utf8()..];
                let value = if attached.is_empty() {
                    args.next()
                        .ok_or_else(|| CliError::MissingValue(format!("-{}", flag)))?
                } else {
                    attached.to_string()
                };
                apply_value(&mut parsed, flag, value);
                // The rest of this argument was the value
                break;
            }

            match flag {
                'f' => parsed.full_verify = true,
                'x' => parsed.walkthrough = true,
                'h' | '?' => return Err(CliError::Help),
                other => match BenchMode::from_flag(other) {
                    Some(mode) => parsed.modes.push(mode),
                    None => return Err(CliError::UnknownFlag(format!("-{}", other))),
                },
            }
        }
    }

    Ok(parsed)
}

fn apply_value(parsed: &mut CliArgs, flag: char, value: String) {
    let number = value.trim().parse::<i64>().ok();
    match flag {
        'w' => parsed.width = number,
        'H' => parsed.height = number,
        'n' => parsed.test_size = number,
        'r' => parsed.keep_size = number,
        'b' => parsed.break_size = number,
        'i' => parsed.interval = number,
        'c' => parsed.config_path = Some(PathBuf::from(value)),
        _ => unreachable!("not a value flag: {}", flag),
    }
}

pub fn usage(defaults: &SizeDefaults) -> String {
    format!(
        "treebench {} ({}): ordered-key store benchmark and regression harness\n\n\
         usage: treebench [-w NUMBER] [-H NUMBER] [-n NUMBER] [-r NUMBER] [-b NUMBER]\n\
         \x20                [-s] [-m] [-e] [-l] [-o] [-i NUMBER] [-f] [-x] [-c FILE]\n\
         \n\
         -w NUMBER       Width of text block displaying the final store, default {}\n\
         -H NUMBER       Height of text block displaying the final store, default {}\n\
         -n NUMBER       Number of random keys to insert, default {}\n\
         -r NUMBER       Number of keys to leave in the store after removal, default {}\n\
         -b NUMBER       Number of nodes to randomly turn red to invalidate the store, default 0\n\
         -s              Test insertion only, CSV output on stdout\n\
         -m              Test removal only, CSV output on stdout\n\
         -e              Test search only, CSV output on stdout\n\
         -l              Test incremental search only (during insertion), CSV output on stdout\n\
         -o              Test decremental search only (during removal), CSV output on stdout\n\
         -i NUMBER       CSV output interval, default every 1000 keys, unless that\n\
         \x20                gives fewer than 100 samples, then 1% of the key count is used\n\
         -f              Run full (black-height) verification instead of the quick check\n\
         -x              Walk through the store API on a small fixed data set and exit\n\
         -c FILE         YAML configuration file (logging, default sizes)\n\
         \n\
         When several of -s -m -e -l -o are given, the last one wins.\n",
        env!("CARGO_PKG_VERSION"),
        env!("TREEBENCH_BUILD"),
        defaults.width,
        defaults.height,
        defaults.test_size,
        defaults.keep_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(line: &str) -> Result<CliArgs, CliError> {
        parse(line.split_whitespace())
    }

    #[test]
    fn test_empty_command_line() {
        assert_eq!(parse_str("").unwrap(), CliArgs::default());
    }

    #[test]
    fn test_separate_and_attached_values() {
        let args = parse_str("-n 5000 -r100 -w 120 -H30 -b 7 -i 50").unwrap();
        assert_eq!(args.test_size, Some(5000));
        assert_eq!(args.keep_size, Some(100));
        assert_eq!(args.width, Some(120));
        assert_eq!(args.height, Some(30));
        assert_eq!(args.break_size, Some(7));
        assert_eq!(args.interval, Some(50));
    }

    #[test]
    fn test_unparseable_number_is_unset() {
        let args = parse_str("-n lots -w 12x").unwrap();
        assert_eq!(args.test_size, None);
        assert_eq!(args.width, None);
    }

    #[test]
    fn test_modes_kept_in_order() {
        let args = parse_str("-s -e -o").unwrap();
        assert_eq!(
            args.modes,
            vec![BenchMode::Insert, BenchMode::Search, BenchMode::DecrementalSearch]
        );
    }

    #[test]
    fn test_clustered_switches() {
        let args = parse_str("-lf -n200").unwrap();
        assert_eq!(args.modes, vec![BenchMode::IncrementalSearch]);
        assert!(args.full_verify);
        assert_eq!(args.test_size, Some(200));

        // Value flag at the end of a cluster takes the next argument
        let args = parse_str("-mn 300").unwrap();
        assert_eq!(args.modes, vec![BenchMode::Remove]);
        assert_eq!(args.test_size, Some(300));
    }

    #[test]
    fn test_walkthrough_and_config() {
        let args = parse_str("-x -c conf/run.yaml").unwrap();
        assert!(args.walkthrough);
        assert_eq!(args.config_path, Some(PathBuf::from("conf/run.yaml")));
    }

    #[test]
    fn test_help_and_errors() {
        assert_eq!(parse_str("-h"), Err(CliError::Help));
        assert_eq!(parse_str("-?"), Err(CliError::Help));
        assert_eq!(parse_str("-q"), Err(CliError::UnknownFlag("-q".to_string())));
        assert_eq!(parse_str("extra"), Err(CliError::UnknownFlag("extra".to_string())));
        assert_eq!(parse_str("-"), Err(CliError::UnknownFlag("-".to_string())));
        assert_eq!(parse_str("-n"), Err(CliError::MissingValue("-n".to_string())));
    }

    #[test]
    fn test_usage_lists_defaults() {
        let text = usage(&SizeDefaults::default());
        assert!(text.contains("default 80"));
        assert!(text.contains("default 1000"));
        assert!(text.contains("-o"));
    }
}
