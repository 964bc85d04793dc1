// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0

pub mod constants;
pub mod context;
pub mod error;
pub mod formatter;
pub mod input;
pub mod options;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use git_version::git_version;

use crate::constants::STDIO_PLACEHOLDER;
use crate::error::{Error, FmtResult};
use crate::formatter::{FormatSummary, Indenter};
use crate::options::FormatOptions;

pub const VERSION: &str = git_version!(cargo_prefix = "", fallback = "unknown");

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO_PLACEHOLDER
}

fn create_output(destination: &Path) -> FmtResult<Box<dyn Write>> {
    if is_stdio(destination) {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    let file = File::create(destination)
        .map_err(|err| Error::FailedToCreateOutputFile(destination.to_path_buf(), err))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn indent_source(
    indenter: &mut Indenter,
    source: &Path,
    output: &mut dyn Write,
) -> FmtResult<()> {
    if is_stdio(source) {
        tracing::debug!("Indenting trace from stdin ...");
        return indenter.indent_stream(io::stdin().lock(), output);
    }
    // FIFOs and `/dev/fd/*` (process substitution) are fine, only directories are not
    if source.is_dir() {
        return Err(Error::TargetIsDirectory(source.to_path_buf()));
    }
    tracing::debug!("Indenting trace from '{}' ...", source.display());
    let file = File::open(source).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            Error::TargetFileDoesNotExist(source.to_path_buf())
        } else {
            Error::FailedToReadTargetFile(source.to_path_buf(), err)
        }
    })?;
    indenter.indent_stream(BufReader::new(file), output)
}

/// Indents the traces in `sources` as one continuous stream,
/// and writes the result to `destination`.
///
/// An empty list of sources, or a source path of `-`, means stdin;
/// a `destination` of `-` means stdout.
///
/// # Errors
///
/// If an input can not be opened or read,
/// or the output can not be created or written.
pub fn run(
    options: &Rc<FormatOptions>,
    sources: &[PathBuf],
    destination: &Path,
) -> FmtResult<FormatSummary> {
    let mut output = create_output(destination)?;
    run_into(options, sources, output.as_mut())
}

/// Like [`run`], but writes to an already opened `output`.
///
/// If whoever reads our output stops doing so
/// (e.g. `head`), we stop quietly and report success.
///
/// # Errors
///
/// If an input can not be opened or read,
/// or writing to `output` fails for any other reason than a broken pipe.
pub fn run_into(
    options: &Rc<FormatOptions>,
    sources: &[PathBuf],
    output: &mut dyn Write,
) -> FmtResult<FormatSummary> {
    let stdin_only = [PathBuf::from(STDIO_PLACEHOLDER)];
    let sources = if sources.is_empty() {
        stdin_only.as_slice()
    } else {
        sources
    };

    let mut indenter = Indenter::new(Rc::clone(options));
    for source in sources {
        match indent_source(&mut indenter, source, output) {
            Ok(()) => {}
            Err(err) if err.is_broken_pipe() => {
                tracing::debug!("Output closed by the reader; stopping early");
                return Ok(indenter.summary());
            }
            Err(err) => return Err(err),
        }
    }

    let summary = indenter.summary();
    tracing::debug!("{summary:#?}");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Accepts `capacity` bytes, then behaves like a pipe without reader.
    struct ClosingPipe {
        written: Vec<u8>,
        capacity: usize,
    }

    impl Write for ClosingPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written.len() + buf.len() > self.capacity {
                return Err(io::ErrorKind::BrokenPipe.into());
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn broken_pipe_ends_run_successfully() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("long.trace");
        fs::write(&src, ">a\n".repeat(10_000)).unwrap();

        let mut output = ClosingPipe {
            written: Vec::new(),
            capacity: 16,
        };
        let summary = run_into(
            &Rc::new(FormatOptions::default()),
            &[src.clone(), src],
            &mut output,
        )
        .unwrap();
        assert!(summary.lines < 10_000);
        assert!(output.written.starts_with(b">a\n >a\n"));
    }

    #[test]
    fn other_write_errors_are_reported() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::ErrorKind::StorageFull.into())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let dir = TempDir::new().unwrap();
        let src = dir.path().join("short.trace");
        fs::write(&src, "x\n").unwrap();
        let res = run_into(&Rc::new(FormatOptions::default()), &[src], &mut Full);
        assert!(matches!(res, Err(Error::Write(_))));
    }

    #[test]
    fn directory_source_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut output = Vec::new();
        let res = run_into(
            &Rc::new(FormatOptions::default()),
            &[dir.path().to_path_buf()],
            &mut output,
        );
        assert!(matches!(res, Err(Error::TargetIsDirectory(path)) if path == dir.path()));
    }

    #[test]
    fn missing_source_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.trace");
        let mut output = Vec::new();
        let res = run_into(
            &Rc::new(FormatOptions::default()),
            std::slice::from_ref(&missing),
            &mut output,
        );
        assert!(matches!(res, Err(Error::TargetFileDoesNotExist(path)) if path == missing));
    }
}
