// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("The trace file {} does not seem to exist", .0.display())]
    TargetFileDoesNotExist(PathBuf),

    #[error("The trace source {} is a directory, not a file", .0.display())]
    TargetIsDirectory(PathBuf),

    #[error("Error while opening {} for reading: {}", .0.display(), .1)]
    FailedToReadTargetFile(PathBuf, #[source] io::Error),

    #[error("Error while creating output file {}: {}", .0.display(), .1)]
    FailedToCreateOutputFile(PathBuf, #[source] io::Error),

    #[error("Failed to read a line of trace input: {0}")]
    Read(#[source] io::Error),

    #[error("Failed to write indented output: {0}")]
    Write(#[source] io::Error),
}

impl Error {
    /// Whether this is caused by the reading end of our output going away,
    /// as happens with `prtrace < trace.log | head`.
    #[must_use]
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Self::Write(err) if err.kind() == io::ErrorKind::BrokenPipe)
    }
}

pub type FmtResult<T> = std::result::Result<T, Error>;
