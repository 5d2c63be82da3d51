use crate::configuration::constants::cargo_env::CARGO_PKG_NAME;
use clap::arg_enum;
use log::LevelFilter;
use std::path::PathBuf;
use structopt::StructOpt;

arg_enum! {
    #[derive(Debug, Clone, Copy)]
    pub enum LogLevel {
        Off, Error, Warn, Info, Debug, Trace,
    }
}

/// Converts `go test -json` output into a self-contained HTML report
#[derive(StructOpt, Debug, Clone, Default)]
#[structopt(name = CARGO_PKG_NAME)]
pub struct Opt {
    /// The go test JSON input file, `-` reads standard input
    #[structopt(long, short = "i", parse(from_os_str))]
    pub input: Option<PathBuf>,

    /// The HTML output file
    #[structopt(long, short = "o", parse(from_os_str))]
    pub output: Option<PathBuf>,

    /// Env file with total, pass, fail and skip status
    #[structopt(long = "env", short = "e", parse(from_os_str))]
    pub status_env: Option<PathBuf>,

    /// The title text shown in the test report
    #[structopt(long, short = "t")]
    pub title: Option<String>,

    /// The size (in pixels) of the clickable indicator for test result groups, `N` or `WxH`
    #[structopt(long, short = "s")]
    pub size: Option<String>,

    /// The number of tests per test group indicator
    #[structopt(long = "groupSize", short = "g", allow_hyphen_values = true)]
    pub group_size: Option<i64>,

    /// The JSON package list (output of `go list -json`), skips package lookups
    #[structopt(long, short = "l", parse(from_os_str))]
    pub list: Option<PathBuf>,

    /// The server info shown in the test report, `key::value;key::value`
    #[structopt(long = "serverInfo", short = "f")]
    pub server_info: Option<String>,

    /// While processing, show the complete output from go test
    #[structopt(long, short = "v")]
    pub verbose: bool,

    /// Set a custom configuration file. Supported: YAML, JSON, TOML
    #[structopt(long, short = "c", parse(from_os_str))]
    pub config: Option<PathBuf>,

    /// Maximum amount of concurrent package lookups
    #[structopt(long, short = "j")]
    pub jobs: Option<usize>,

    /// Sets a logging level
    #[structopt(case_insensitive = true, long, short = "L", possible_values = &LogLevel::variants(), env = "LOG_LEVEL")]
    pub logging: Option<LogLevel>,

    /// File to which application will write logs
    #[structopt(long, short = "O", env = "LOG_OUTPUT_FILE", parse(from_os_str))]
    pub log_output_file: Option<PathBuf>,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camel_case_flag_names() {
        let opt = Opt::from_iter_safe(&[
            "go-test-report",
            "-i",
            "results.json",
            "--groupSize",
            "32",
            "--serverInfo",
            "env::staging",
            "--size",
            "24x16",
            "-v",
        ])
        .unwrap();

        assert_eq!(opt.input, Some(PathBuf::from("results.json")));
        assert_eq!(opt.group_size, Some(32));
        assert_eq!(opt.server_info.as_deref(), Some("env::staging"));
        assert_eq!(opt.size.as_deref(), Some("24x16"));
        assert!(opt.verbose);
        assert!(opt.title.is_none());
    }

    #[test]
    fn test_flag_without_value_is_rejected() {
        assert!(Opt::from_iter_safe(&["go-test-report", "--title"]).is_err());
        assert!(Opt::from_iter_safe(&["go-test-report", "--groupSize"]).is_err());
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let opt = Opt::from_iter_safe(&["go-test-report", "-L", "debug"]).unwrap();
        let level: LevelFilter = opt.logging.unwrap().into();
        assert_eq!(level, LevelFilter::Debug);
    }
}
