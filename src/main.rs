//! lunitefmt - Auto-indentation formatter for Lunite source code

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs::File;
use std::io::{self, BufReader, Cursor, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};

use glob::Pattern;
use lunitefmt::pipeline::format_file;
use lunitefmt::{find_directive, parse_args, CliArgs, Config, Result};
use rayon::prelude::*;
use walkdir::WalkDir;

/// Lunite file extensions to process
const LUNITE_EXTENSIONS: &[&str] = &["lun", "lunite"];

/// Default maximum file size in bytes (100 MB)
/// Files larger than this are skipped to prevent memory exhaustion
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

fn main() -> ExitCode {
    match run() {
        Ok(changed_in_check_mode) => {
            if changed_in_check_mode > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Run the formatter; returns the number of files a `--check` run would change
fn run() -> Result<usize> {
    let args = parse_args();

    // Check if we should read from stdin
    let use_stdin =
        args.inputs.is_empty() || (args.inputs.len() == 1 && args.inputs[0].as_os_str() == "-");

    // If no inputs and running interactively, print usage; otherwise read from stdin
    if args.inputs.is_empty() && io::stdin().is_terminal() {
        print_usage();
        return Ok(0);
    }

    if use_stdin {
        // Process stdin - use current directory for config discovery
        let config = build_config(&args, None)?;
        return process_stdin(&config, &args);
    }

    // For an explicit config file we use one config for all files; with
    // auto-discovery each file may have its own config
    let use_per_file_config = args.config.is_none();
    let base_config = if use_per_file_config {
        None
    } else {
        Some(build_config(&args, None)?)
    };

    // Configure thread pool if --jobs specified
    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                eprintln!("Warning: failed to configure thread pool: {e}");
            }
        }
    }

    let files = collect_files(&args);

    if files.is_empty() {
        if !args.silent {
            eprintln!("No Lunite files found to format.");
        }
        return Ok(0);
    }

    let use_sequential = args.stdout || args.jobs == Some(1);
    let would_change = if use_sequential {
        process_files_sequential(&files, base_config.as_ref(), &args)
    } else {
        process_files_parallel(&files, base_config.as_ref(), &args)
    };

    if args.check {
        Ok(would_change)
    } else {
        Ok(0)
    }
}

/// Build configuration from CLI args and optional config file
///
/// If `for_path` is provided and no explicit config file is specified,
/// uses auto-discovery to find config files in parent directories.
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        // Explicit config file specified
        if args.debug {
            eprintln!(
                "[DEBUG] Using explicit config file: {}",
                config_path.display()
            );
        }
        Config::from_toml_file(config_path)?
    } else if let Some(path) = for_path {
        // Auto-discover config files from parent directories
        if args.debug {
            let discovered = Config::discover_config_files(path);
            if discovered.is_empty() {
                eprintln!("[DEBUG] No config files discovered for: {}", path.display());
            } else {
                eprintln!("[DEBUG] Discovered config files for {}:", path.display());
                for f in &discovered {
                    eprintln!("[DEBUG]   - {}", f.display());
                }
            }
        }
        Config::from_discovered_files(path)
    } else {
        Config::from_discovered_files(&std::env::current_dir().unwrap_or_default())
    };

    // Override with CLI arguments
    if let Some(tab_size) = args.tab_size {
        config.tab_size = tab_size;
    }
    if args.tabs {
        config.insert_spaces = false;
    }
    if args.spaces {
        config.insert_spaces = true;
    }

    if args.debug {
        eprintln!("[DEBUG] Configuration:");
        eprintln!("[DEBUG]   tab_size: {}", config.tab_size);
        eprintln!("[DEBUG]   insert_spaces: {}", config.insert_spaces);
    }

    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Collect all files to process, handling directories and recursive flag
fn collect_files(args: &CliArgs) -> Vec<PathBuf> {
    // Compile exclude patterns
    let exclude_patterns: Vec<Pattern> = args
        .exclude
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    let custom_extensions = &args.lunite_extensions;

    let mut files = Vec::new();

    for input in &args.inputs {
        if input.is_file() {
            if !is_excluded(input, &exclude_patterns) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            if args.recursive {
                // WalkDir reports symlink loops as errors when follow_links
                // is on; those entries are skipped via filter_map(ok)
                for entry in WalkDir::new(input)
                    .follow_links(true)
                    .max_depth(256)
                    .into_iter()
                    .filter_map(std::result::Result::ok)
                {
                    let path = entry.path();
                    if path.is_file()
                        && is_lunite_file(path, custom_extensions)
                        && !is_excluded(path, &exclude_patterns)
                    {
                        files.push(path.to_path_buf());
                    }
                }
            } else {
                // Non-recursive: only direct children
                if let Ok(entries) = std::fs::read_dir(input) {
                    for entry in entries.filter_map(std::result::Result::ok) {
                        let path = entry.path();
                        if path.is_file()
                            && is_lunite_file(&path, custom_extensions)
                            && !is_excluded(&path, &exclude_patterns)
                        {
                            files.push(path);
                        }
                    }
                }
            }
        }
    }

    files
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();

    for pattern in patterns {
        // Match against full path
        if pattern.matches(&path_str) {
            return true;
        }

        // Match against file name only
        if let Some(file_name) = path.file_name() {
            if pattern.matches(&file_name.to_string_lossy()) {
                return true;
            }
        }

        // Match against each path component (for directory patterns)
        for component in path.components() {
            if let std::path::Component::Normal(c) = component {
                if pattern.matches(&c.to_string_lossy()) {
                    return true;
                }
            }
        }
    }

    false
}

/// Check if a file has a Lunite extension
/// Checks against both default extensions and any custom extensions provided
fn is_lunite_file(path: &Path, custom_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            if LUNITE_EXTENSIONS.contains(&ext) {
                return true;
            }
            // Custom extensions may be given with or without leading dot
            for custom in custom_extensions {
                let custom_ext = custom.strip_prefix('.').unwrap_or(custom);
                if ext == custom_ext {
                    return true;
                }
            }
            false
        })
}

/// Process files sequentially (for stdout output); returns files that would change
fn process_files_sequential(
    files: &[PathBuf],
    base_config: Option<&Config>,
    args: &CliArgs,
) -> usize {
    let mut would_change = 0;
    for path in files {
        // Use base config if provided, otherwise discover per-file config
        let file_result = if let Some(config) = base_config {
            process_single_file(path, config, args)
        } else {
            match build_config(args, Some(path)) {
                Ok(config) => process_single_file(path, &config, args),
                Err(e) => Err(e),
            }
        };

        match file_result {
            Ok(changed) if changed > 0 => would_change += 1,
            Ok(_) => {}
            Err(e) => eprintln!("Error formatting {}: {}", path.display(), e),
        }
    }
    would_change
}

/// Process files in parallel using Rayon; returns files that would change
fn process_files_parallel(
    files: &[PathBuf],
    base_config: Option<&Config>,
    args: &CliArgs,
) -> usize {
    let success_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);
    let changed_count = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        let file_result = if let Some(config) = base_config {
            process_single_file(path, config, args)
        } else {
            match build_config(args, Some(path)) {
                Ok(config) => process_single_file(path, &config, args),
                Err(e) => Err(e),
            }
        };

        match file_result {
            Ok(changed) => {
                success_count.fetch_add(1, Ordering::Relaxed);
                if changed > 0 {
                    changed_count.fetch_add(1, Ordering::Relaxed);
                }
            }
            Err(e) => {
                error_count.fetch_add(1, Ordering::Relaxed);
                eprintln!("Error formatting {}: {}", path.display(), e);
            }
        }
    });

    let success = success_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);

    if !args.silent {
        // Nothing is written in check mode, so don't claim it was
        let verb = if args.check { "Checked" } else { "Formatted" };
        if errors == 0 {
            eprintln!("{verb} {success} files successfully.");
        } else {
            eprintln!("{verb} {success} files, {errors} errors.");
        }
    }

    changed_count.load(Ordering::Relaxed)
}

/// Apply directive overrides from file contents to a configuration
fn apply_directive_overrides(config: &mut Config, contents: &[u8], debug: bool, source_name: &str) {
    let cursor = Cursor::new(contents);
    if let Some(overrides) = find_directive(&mut BufReader::new(cursor)) {
        if debug {
            eprintln!("[DEBUG] Found file directive in {source_name}");
        }
        if let Some(tab_size) = overrides.tab_size {
            if debug {
                eprintln!("[DEBUG]   Directive override: tab_size = {tab_size}");
            }
            config.tab_size = tab_size;
        }
        if let Some(insert_spaces) = overrides.insert_spaces {
            if debug {
                eprintln!("[DEBUG]   Directive override: insert_spaces = {insert_spaces}");
            }
            config.insert_spaces = insert_spaces;
        }
    }
}

/// Process a single file; returns the number of lines that changed
fn process_single_file(path: &PathBuf, config: &Config, args: &CliArgs) -> Result<usize> {
    // Check file size BEFORE reading to prevent memory exhaustion
    let metadata = std::fs::metadata(path)?;
    let file_size = metadata.len();
    if file_size > DEFAULT_MAX_FILE_SIZE {
        if !args.silent {
            let size_mb = file_size / (1024 * 1024);
            let limit_mb = DEFAULT_MAX_FILE_SIZE / (1024 * 1024);
            eprintln!(
                "Skipping {} ({} MB exceeds limit of {} MB)",
                path.display(),
                size_mb,
                limit_mb
            );
        }
        return Ok(0);
    }

    // Read input file into memory
    let mut file_contents = Vec::new();
    File::open(path)?.read_to_end(&mut file_contents)?;

    if !args.silent && !args.stdout && !args.check {
        eprintln!("Formatting: {}", path.display());
    }

    // Make a per-file copy of config that can be overridden by directives
    let mut file_config = config.clone();
    apply_directive_overrides(
        &mut file_config,
        &file_contents,
        args.debug,
        path.to_str().unwrap_or("unknown"),
    );

    // Format the file
    let reader = BufReader::new(Cursor::new(&file_contents));
    let mut output = Vec::new();
    let changed = format_file(reader, &mut output, &file_config)?;

    // Output results
    if args.check {
        if changed > 0 && !args.silent {
            println!("Would reformat: {}", path.display());
        }
    } else if args.stdout {
        io::stdout().write_all(&output)?;
    } else if changed > 0 {
        // Write back to file (in-place) only when something changed
        std::fs::write(path, &output)?;
    }

    Ok(changed)
}

/// Process input from stdin, output to stdout; returns check-mode change count
fn process_stdin(config: &Config, args: &CliArgs) -> Result<usize> {
    // Read all input from stdin
    let mut stdin_contents = Vec::new();
    io::stdin().read_to_end(&mut stdin_contents)?;

    // Check size after reading to prevent processing extremely large input
    #[allow(clippy::cast_possible_truncation)]
    let stdin_size = stdin_contents.len() as u64;
    if stdin_size > DEFAULT_MAX_FILE_SIZE {
        anyhow::bail!(
            "stdin input too large ({} MB exceeds limit of {} MB)",
            stdin_size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    }

    // Make a copy of config that can be overridden by directives
    let mut file_config = config.clone();
    apply_directive_overrides(&mut file_config, &stdin_contents, args.debug, "stdin");

    // Format the input
    let reader = BufReader::new(Cursor::new(&stdin_contents));
    let mut output = Vec::new();
    let changed = format_file(reader, &mut output, &file_config)?;

    if args.check {
        if changed > 0 && !args.silent {
            eprintln!("stdin would be reformatted ({changed} lines).");
        }
        return Ok(usize::from(changed > 0));
    }

    // Always output to stdout when reading from stdin
    io::stdout().write_all(&output)?;

    Ok(0)
}

fn print_usage() {
    println!(
        "lunitefmt v{} - Lunite auto-indentation formatter",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Re-indents Lunite source by bracket nesting depth.");
    println!();
    println!("Usage:");
    println!("  lunitefmt [OPTIONS] <FILE>...");
    println!("  lunitefmt [OPTIONS] -r <DIRECTORY>");
    println!("  lunitefmt [OPTIONS] -             # Read from stdin");
    println!("  cat file.lun | lunitefmt          # Pipe input");
    println!();
    println!("Examples:");
    println!("  lunitefmt file.lun              # Format single file in-place");
    println!("  lunitefmt *.lun                 # Format multiple files");
    println!("  lunitefmt -r src/               # Recursively format directory");
    println!("  lunitefmt --stdout file.lun     # Output to stdout");
    println!("  lunitefmt -t 2 file.lun         # Use 2-space indent");
    println!("  lunitefmt --check -r src/       # Report unformatted files");
    println!();
    println!("Options:");
    println!("  -t, --tab-size <NUM>            Spaces per indent level [default: 4]");
    println!("  --tabs                          Indent with one tab per level");
    println!("  --spaces                        Indent with spaces (default)");
    println!("  -r, --recursive                 Process directories recursively");
    println!("  -e, --exclude <PATTERN>         Exclude files/dirs matching pattern (repeatable)");
    println!("  -f, --lunite <EXT>              Additional Lunite extension (repeatable)");
    println!("  -j, --jobs <NUM>                Parallel jobs (0=auto, 1=sequential)");
    println!("  -s, --stdout                    Output to stdout");
    println!("  --check                         Report files that would change; exit 1 if any");
    println!("  -c, --config <FILE>             Config file path (overrides auto-discovery)");
    println!("  -S, --silent                    Silent mode");
    println!("  -D, --debug                     Enable debug output");
    println!("  -h, --help                      Print help");
    println!();
    println!("Supported extensions: .lun, .lunite");
    println!();
    println!("Config file auto-discovery:");
    println!("  Searches for lunitefmt.toml in parent directories");
    println!("  starting from the file being formatted up to the root directory.");
    println!("  Also checks lunitefmt.toml in the home directory.");
    println!("  More specific configs (closer to file) override less specific ones.");
    println!();
    println!("In-file directives:");
    println!("  ~~ lunitefmt: --tab-size 2 --tabs");
}
