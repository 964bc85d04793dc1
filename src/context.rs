// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0

use crate::input::LineKind;

/// Current state of the indenter.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Context {
    /// The level of nesting
    /// (**not** measured in spaces).
    ///
    /// Unbalanced input may drive this below zero.
    pub indent_level: isize,
    /// Number of lines seen so far.
    pub lines: usize,
    /// Deepest level reached so far.
    pub max_level: isize,
    /// 1-based number of the first line that took the level below zero.
    pub first_negative_line: Option<usize>,
}

impl Context {
    /// Accounts for one more line of the given kind,
    /// and returns how many indent units to write before it.
    ///
    /// Entry lines are indented with the level from before the increment,
    /// exit lines with the level from after the decrement.
    pub fn advance(&mut self, kind: LineKind) -> usize {
        self.lines += 1;
        let width = match kind {
            LineKind::Entry => {
                let width = self.indent_level;
                self.indent_level += 1;
                self.max_level = self.max_level.max(self.indent_level);
                width
            }
            LineKind::Exit => {
                self.indent_level -= 1;
                if self.indent_level < 0 && self.first_negative_line.is_none() {
                    tracing::debug!(
                        "Nesting level dropped below zero at line {}",
                        self.lines
                    );
                    self.first_negative_line = Some(self.lines);
                }
                self.indent_level
            }
            LineKind::Other => self.indent_level,
        };
        Self::padding_width(width)
    }

    /// Negative levels are clamped to no padding at all.
    #[must_use]
    pub fn padding_width(level: isize) -> usize {
        usize::try_from(level).unwrap_or(0)
    }
}
