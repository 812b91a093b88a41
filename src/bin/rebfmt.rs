//! Command-line interface for rebeca-fmt
//! Formats Rebeca model (`.rebeca`) and property (`.property`) files.
//!
//! Usage:
//!   rebfmt [paths...]                     - Print formatted files (stdin when no paths)
//!   rebfmt --write `<paths>`              - Rewrite files in place
//!   rebfmt --check `<paths>`              - Print diffs, exit 1 if anything would change
//!   rebfmt --range `<offset:length>` `<path>` - Format one byte span
//!   rebfmt --format `<format>` `<path>`   - Token dumps, diffs or edits (see --list-formats)
//!
//! Exit status is 0 on success, 1 when `--check` finds unformatted input and 2 on errors.

use anyhow::{bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use rebeca_fmt::config::{Loader, LOCAL_CONFIG_FILE};
use rebeca_fmt::dialect::Dialect;
use rebeca_fmt::formatter::{apply_edits, unified_diff};
use rebeca_fmt::processor::{
    available_formats, parse_indent, parse_range, process_source, read_source, ProcessingSpec,
};
use rebeca_fmt::runner::{FormatMode, Runner};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let matches = command().get_matches();
    init_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn command() -> Command {
    Command::new("rebfmt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Format Rebeca model and property files")
        .arg(
            Arg::new("paths")
                .help("Files to format; reads stdin when omitted")
                .value_parser(clap::value_parser!(PathBuf))
                .num_args(0..)
                .index(1),
        )
        .arg(
            Arg::new("dialect")
                .long("dialect")
                .short('d')
                .help("Force a dialect ('model' or 'property') instead of choosing by extension"),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .short('i')
                .help("Indent unit: 'auto', 'tab' or a number of spaces"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_parser(clap::value_parser!(PathBuf))
                .help("Configuration file (default: ./rebfmt.toml when present)"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Processing output, e.g. 'token-simple' or 'format-diff'")
                .conflicts_with_all(["write", "check", "range"]),
        )
        .arg(
            Arg::new("write")
                .long("write")
                .short('w')
                .help("Rewrite files in place")
                .action(ArgAction::SetTrue)
                .conflicts_with("check"),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Report files that would change and exit 1 if any would")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("range")
                .long("range")
                .short('r')
                .value_name("OFFSET:LENGTH")
                .help("Format only this byte span of a single input"),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available processing formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more detail to stderr (repeat for more)")
                .action(ArgAction::Count),
        )
}

fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(matches: &ArgMatches) -> anyhow::Result<ExitCode> {
    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return Ok(ExitCode::SUCCESS);
    }

    let runner = build_runner(matches)?;
    let paths: Vec<PathBuf> = matches
        .get_many::<PathBuf>("paths")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let mode = if matches.get_flag("write") {
        FormatMode::Write
    } else if matches.get_flag("check") {
        FormatMode::Check
    } else {
        FormatMode::Stdout
    };

    if let Some(range) = matches.get_one::<String>("range") {
        return handle_range_command(&runner, &paths, range, mode);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        return handle_format_command(&runner, &paths, format);
    }
    if paths.is_empty() {
        return handle_stdin_command(&runner, mode);
    }
    handle_paths_command(&runner, &paths, mode)
}

fn build_runner(matches: &ArgMatches) -> anyhow::Result<Runner> {
    let mut loader = Loader::new();
    loader = match matches.get_one::<PathBuf>("config") {
        Some(path) => loader.with_file(path),
        None => loader.with_optional_file(LOCAL_CONFIG_FILE),
    };
    if let Some(indent) = matches.get_one::<String>("indent") {
        // validate here so the message names the flag rather than the config key
        parse_indent(indent).context("invalid --indent")?;
        loader = loader.set_override("formatting.indent", indent.as_str())?;
    }
    let config = loader.build().context("failed to load configuration")?;
    debug!(?config, "configuration loaded");

    let dialect = matches
        .get_one::<String>("dialect")
        .map(|name| name.parse::<Dialect>())
        .transpose()?;
    Ok(Runner::new(config).with_dialect(dialect))
}

/// Read the single input a range or stdin operation works on
fn read_input(paths: &[PathBuf]) -> anyhow::Result<(Option<&Path>, String)> {
    match paths {
        [] => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read stdin")?;
            Ok((None, source))
        }
        [path] => {
            let source = read_source(path)?;
            Ok((Some(path.as_path()), source))
        }
        _ => bail!("this operation takes at most one input path"),
    }
}

fn display_name(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string())
}

/// Handle --range
fn handle_range_command(
    runner: &Runner,
    paths: &[PathBuf],
    range: &str,
    mode: FormatMode,
) -> anyhow::Result<ExitCode> {
    let (offset, length) = parse_range(range)?;
    let (path, source) = read_input(paths)?;
    let edit = runner.formatter_for(path).format_range(&source, offset, length);
    let changed = source[edit.start..edit.end] != edit.new_text;

    match mode {
        FormatMode::Stdout => print!("{}", edit.new_text),
        FormatMode::Check => {
            if changed {
                let formatted = apply_edits(&source, std::slice::from_ref(&edit));
                print!("{}", unified_diff(&source, &formatted, &display_name(path)));
                return Ok(ExitCode::from(1));
            }
        }
        FormatMode::Write => {
            let Some(path) = path else {
                bail!("--write needs a file path");
            };
            if changed {
                let formatted = apply_edits(&source, std::slice::from_ref(&edit));
                std::fs::write(path, formatted)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Handle --format
fn handle_format_command(
    runner: &Runner,
    paths: &[PathBuf],
    format: &str,
) -> anyhow::Result<ExitCode> {
    let spec = ProcessingSpec::from_string(format).with_context(|| {
        format!("available formats: {}", available_formats().join(", "))
    })?;
    if paths.is_empty() {
        let (_, source) = read_input(paths)?;
        let options = runner.options_for(None);
        print!("{}", process_source(&source, "<stdin>", &spec, &options)?);
        return Ok(ExitCode::SUCCESS);
    }
    for path in paths {
        let source = read_source(path)?;
        let options = runner.options_for(Some(path));
        let name = path.display().to_string();
        print!("{}", process_source(&source, &name, &spec, &options)?);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_stdin_command(runner: &Runner, mode: FormatMode) -> anyhow::Result<ExitCode> {
    let (_, source) = read_input(&[])?;
    let formatted = runner.format_source(&source, None);
    match mode {
        FormatMode::Stdout => print!("{}", formatted),
        FormatMode::Check => {
            if formatted != source {
                print!("{}", unified_diff(&source, &formatted, "<stdin>"));
                return Ok(ExitCode::from(1));
            }
        }
        FormatMode::Write => bail!("--write needs file paths"),
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_paths_command(
    runner: &Runner,
    paths: &[PathBuf],
    mode: FormatMode,
) -> anyhow::Result<ExitCode> {
    let report = runner.run_paths(paths, mode)?;
    for file in &report.files {
        if let Some(formatted) = &file.formatted {
            print!("{}", formatted);
        }
        if let Some(diff) = &file.diff {
            print!("{}", diff);
        }
    }

    let summary = report.summary;
    if summary.files_failed > 0 {
        bail!(
            "{} of {} inputs could not be read",
            summary.files_failed,
            summary.files_seen
        );
    }
    if mode == FormatMode::Check && report.has_changes() {
        eprintln!(
            "{} of {} files would be reformatted",
            summary.files_changed, summary.files_seen
        );
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

/// Handle --list-formats
fn handle_list_formats_command() {
    println!("Available formats:\n");
    for format in available_formats() {
        println!("  {}", format);
    }
}
