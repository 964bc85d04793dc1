// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0

use std::io::{self, BufRead};

use crate::constants::{ENTRY_MARKER, EXIT_MARKER};

/// What a single trace line means for the nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Starts with `>`; opens a block.
    Entry,
    /// Starts with `<`; closes a block.
    Exit,
    /// Anything else, including the empty line.
    Other,
}

impl LineKind {
    /// Classifies a line by its first byte only.
    #[must_use]
    pub const fn of(line: &[u8]) -> Self {
        match line.first() {
            Some(&ENTRY_MARKER) => Self::Entry,
            Some(&EXIT_MARKER) => Self::Exit,
            _ => Self::Other,
        }
    }
}

/// Removes leading spaces and tabs.
#[must_use]
pub fn strip_indentation(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|byte| *byte != b' ' && *byte != b'\t')
        .unwrap_or(line.len());
    line.get(start..).unwrap_or_default()
}

/// Removes a trailing `\n`, if present.
///
/// A `\r` before it stays part of the line.
fn chomp(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
}

/// Yields the lines of a trace, without their line terminators.
///
/// Unlike [`BufRead::lines`], this works on raw bytes,
/// so traces that are not valid UTF-8 pass through untouched.
/// A final line without terminator is yielded as well.
/// Iteration ends with `None` at end-of-stream.
pub struct TraceLines<R: BufRead> {
    reader: R,
}

impl<R: BufRead> TraceLines<R> {
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Iterator for TraceLines<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                chomp(&mut buf);
                Some(Ok(buf))
            }
            Err(err) => Some(Err(err)),
        }
    }
}
