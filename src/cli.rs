//! Command-line interface for lunitefmt.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Files or directories to format
    pub inputs: Vec<PathBuf>,

    /// Number of spaces per indent level
    pub tab_size: Option<usize>,

    /// Indent with one tab per level
    pub tabs: bool,

    /// Indent with spaces (overrides a config file's `insert_spaces = false`)
    pub spaces: bool,

    /// Output to stdout instead of in-place
    pub stdout: bool,

    /// Check mode: report files that would change, modify nothing
    pub check: bool,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Recursive directory processing
    pub recursive: bool,

    /// Silent mode (no output)
    pub silent: bool,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: Option<usize>,

    /// Exclude patterns for files/directories (glob patterns)
    pub exclude: Vec<String>,

    /// Custom Lunite file extensions (in addition to defaults)
    pub lunite_extensions: Vec<String>,

    /// Enable debug output
    pub debug: bool,
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("lunitefmt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Auto-indentation formatter for Lunite source code")
        .arg(
            Arg::new("inputs")
                .help("Files or directories to format")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("tab-size")
                .short('t')
                .long("tab-size")
                .help("Number of spaces per indent level [default: 4]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("tabs")
                .long("tabs")
                .help("Indent with one tab per level instead of spaces")
                .action(ArgAction::SetTrue)
                .conflicts_with("spaces"),
        )
        .arg(
            Arg::new("spaces")
                .long("spaces")
                .help("Indent with spaces (the default; overrides config)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("stdout")
                .short('s')
                .long("stdout")
                .help("Output to stdout instead of formatting in-place")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Don't write anything; exit non-zero if any file would change")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Config file path (overrides auto-discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Process directories recursively")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Exclude files/dirs matching glob pattern (repeatable)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("lunite")
                .short('f')
                .long("lunite")
                .help("Additional Lunite file extension (repeatable)")
                .value_name("EXT")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Parallel jobs (0=auto, 1=sequential)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Silent mode (no progress output)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from the process environment
#[must_use]
pub fn parse_args() -> CliArgs {
    let matches = build_cli().get_matches();
    args_from_matches(&matches)
}

/// Parse CLI arguments from an explicit argument list (for tests)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = build_cli().get_matches_from(args);
    args_from_matches(&matches)
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        tab_size: matches.get_one::<usize>("tab-size").copied(),
        tabs: matches.get_flag("tabs"),
        spaces: matches.get_flag("spaces"),
        stdout: matches.get_flag("stdout"),
        check: matches.get_flag("check"),
        config: matches.get_one::<PathBuf>("config").cloned(),
        recursive: matches.get_flag("recursive"),
        silent: matches.get_flag("silent"),
        jobs: matches.get_one::<usize>("jobs").copied(),
        exclude: matches
            .get_many::<String>("exclude")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        lunite_extensions: matches
            .get_many::<String>("lunite")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        debug: matches.get_flag("debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = parse_args_from(["lunitefmt", "file.lun"]);
        assert_eq!(args.inputs, vec![PathBuf::from("file.lun")]);
        assert_eq!(args.tab_size, None);
        assert!(!args.tabs);
        assert!(!args.stdout);
        assert!(!args.check);
        assert!(!args.recursive);
    }

    #[test]
    fn test_parse_tab_size() {
        let args = parse_args_from(["lunitefmt", "-t", "2", "file.lun"]);
        assert_eq!(args.tab_size, Some(2));
    }

    #[test]
    fn test_parse_tabs_flag() {
        let args = parse_args_from(["lunitefmt", "--tabs", "file.lun"]);
        assert!(args.tabs);
        assert!(!args.spaces);
    }

    #[test]
    fn test_parse_recursive_with_excludes() {
        let args = parse_args_from([
            "lunitefmt",
            "-r",
            "-e",
            "vendor",
            "-e",
            "*.gen.lun",
            "src",
        ]);
        assert!(args.recursive);
        assert_eq!(args.exclude, vec!["vendor", "*.gen.lun"]);
    }

    #[test]
    fn test_parse_check_mode() {
        let args = parse_args_from(["lunitefmt", "--check", "-S", "file.lun"]);
        assert!(args.check);
        assert!(args.silent);
    }

    #[test]
    fn test_parse_custom_extensions() {
        let args = parse_args_from(["lunitefmt", "-f", "lu", "-f", ".lnt", "file.lu"]);
        assert_eq!(args.lunite_extensions, vec!["lu", ".lnt"]);
    }

    #[test]
    fn test_parse_no_inputs() {
        let args = parse_args_from(["lunitefmt"]);
        assert!(args.inputs.is_empty());
    }
}
