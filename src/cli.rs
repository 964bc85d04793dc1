// SPDX-FileCopyrightText: 2021-2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;

use clap::{command, crate_name, value_parser, Arg, ArgAction, Command, ValueHint};
use cli_utils::logging;
use const_format::formatcp;
use prtrace::constants::STDIO_PLACEHOLDER;
use prtrace::options::FormatOptions;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

pub const A_L_STRIP_EXISTING: &str = "strip-existing";
pub const A_S_STRIP_EXISTING: char = 's';
pub const A_L_NO_LINE_BUFFERING: &str = "no-line-buffering";
pub const A_L_OUTPUT: &str = "output";
pub const A_S_OUTPUT: char = 'O';
pub const A_L_QUIET: &str = "quiet";
pub const A_S_QUIET: char = 'q';
pub const A_L_VERBOSE: &str = "verbose";
pub const A_S_VERBOSE: char = 'v';
pub const A_L_VERSION: &str = "version";
pub const A_S_VERSION: char = 'V';
pub const A_L_SRC: &str = "src";

fn arg_strip_existing() -> Arg {
    Arg::new(A_L_STRIP_EXISTING)
        .help("Remove leading whitespace from each line before indenting it")
        .long_help(
            "Remove leading spaces and tabs from each line \
before looking at its first character and indenting it. \
This allows to re-indent traces that are already (partially) indented, \
including the output of this tool. \
Leading whitespace that was part of the original trace lines is lost too.",
        )
        .action(ArgAction::SetTrue)
        .short(A_S_STRIP_EXISTING)
        .long(A_L_STRIP_EXISTING)
}

fn arg_no_line_buffering() -> Arg {
    Arg::new(A_L_NO_LINE_BUFFERING)
        .help("Do not flush the output after every line")
        .long_help(
            "Do not flush the output after every line, \
but only when the buffer is full and at the end of the input. \
This is faster on large traces, \
but delays the output of a still running program.",
        )
        .action(ArgAction::SetTrue)
        .long(A_L_NO_LINE_BUFFERING)
}

fn arg_output() -> Arg {
    Arg::new(A_L_OUTPUT)
        .help(formatcp!(
            "the file to write the indented trace to; '{STDIO_PLACEHOLDER}' for stdout"
        ))
        .num_args(1)
        .short(A_S_OUTPUT)
        .long(A_L_OUTPUT)
        .action(ArgAction::Set)
        .value_hint(ValueHint::FilePath)
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .default_value(STDIO_PLACEHOLDER)
}

fn arg_quiet() -> Arg {
    Arg::new(A_L_QUIET)
        .help("Minimize or suppress log output")
        .long_help(
            "Minimize or suppress log output on stderr. \
The indented trace on stdout is not affected.",
        )
        .action(ArgAction::SetTrue)
        .short(A_S_QUIET)
        .long(A_L_QUIET)
        .conflicts_with(A_L_VERBOSE)
}

fn arg_verbose() -> Arg {
    Arg::new(A_L_VERBOSE)
        .help("more verbose output (useful for debugging)")
        .short(A_S_VERBOSE)
        .long(A_L_VERBOSE)
        .action(ArgAction::SetTrue)
}

fn arg_version() -> Arg {
    Arg::new(A_L_VERSION)
        .help(formatcp!(
            "Print version information and exit. \
May be combined with -{A_S_QUIET},--{A_L_QUIET}, \
to really only output the version string."
        ))
        .short(A_S_VERSION)
        .long(A_L_VERSION)
        .action(ArgAction::SetTrue)
}

fn arg_src() -> Arg {
    Arg::new(A_L_SRC)
        .help(formatcp!(
            "Trace file(s) to indent, read one after the other; \
'{STDIO_PLACEHOLDER}' or none for stdin"
        ))
        .num_args(0..)
        .value_name("FILE")
        .value_hint(ValueHint::FilePath)
        .value_parser(value_parser!(PathBuf))
        .action(ArgAction::Append)
}

fn args_matcher() -> Command {
    command!()
        .about("Indents trace output by its entry and exit markers")
        .long_about(
            "Reads trace output line by line, \
and writes it out again, indented by nesting level. \
A line starting with '>' opens a level, \
a line starting with '<' closes one; \
all other lines are indented by the current level, \
using one space per level. \
 \
Typical use: \
 \
./my-traced-program 2>&1 | prtrace",
        )
        .bin_name(clap::crate_name!())
        .help_expected(true)
        .disable_version_flag(true)
        .arg(arg_strip_existing())
        .arg(arg_no_line_buffering())
        .arg(arg_output())
        .arg(arg_quiet())
        .arg(arg_verbose())
        .arg(arg_version())
        .arg(arg_src())
}

#[allow(clippy::print_stdout)]
fn print_version_and_exit(quiet: bool) {
    if !quiet {
        print!("{} ", clap::crate_name!());
    }
    println!("{}", prtrace::VERSION);
    std::process::exit(0);
}

#[derive(Error, Debug)]
pub enum InitError {
    #[error("Failed to init logging system: {0}")]
    LogInit(#[from] tracing_subscriber::util::TryInitError),

    #[error("Failed to change the logging level: {0}")]
    LogChangeLevel(#[from] tracing_subscriber::reload::Error),
}

pub struct Settings {
    pub options: FormatOptions,
    pub src: Vec<PathBuf>,
    pub dst: PathBuf,
}

pub fn init() -> Result<Settings, InitError> {
    let log_reload_handle = logging::setup(crate_name!())?;
    let args = args_matcher().get_matches();

    let quiet = args.get_flag(A_L_QUIET);
    let version = args.get_flag(A_L_VERSION);
    if version {
        print_version_and_exit(quiet);
    }

    let verbose = args.get_flag(A_L_VERBOSE);
    let log_level = if verbose {
        LevelFilter::TRACE
    } else if quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };
    logging::set_log_level_tracing(&log_reload_handle, log_level)?;

    let strip_existing = args.get_flag(A_L_STRIP_EXISTING);
    let line_buffered = !args.get_flag(A_L_NO_LINE_BUFFERING);

    let src: Vec<PathBuf> = args
        .get_many::<PathBuf>(A_L_SRC)
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default();
    let dst = args
        .get_one::<PathBuf>(A_L_OUTPUT)
        .cloned()
        .unwrap_or_else(|| PathBuf::from(STDIO_PLACEHOLDER));
    tracing::debug!("Sources: {src:?}, destination: {}", dst.display());

    Ok(Settings {
        options: FormatOptions {
            strip_existing,
            line_buffered,
        },
        src,
        dst,
    })
}
