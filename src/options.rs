// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Remove leading spaces and tabs from each line
    /// before looking at its first character.
    ///
    /// This allows to re-indent already indented traces,
    /// which includes our own output.
    /// Whitespace the trace lines had of their own is lost with it,
    /// so our output is only reproduced exactly
    /// if no line of the original trace started with whitespace.
    pub strip_existing: bool,
    /// Flush the output after every line.
    ///
    /// Without this, output written to a pipe
    /// only shows up in larger chunks,
    /// which is inconvenient when watching a long running program.
    pub line_buffered: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            strip_existing: false,
            line_buffered: true,
        }
    }
}
