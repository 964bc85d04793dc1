// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0

use std::io::{self, BufRead, Write};
use std::rc::Rc;

use crate::constants::INDENT_UNIT;
use crate::context::Context;
use crate::error::{Error, FmtResult};
use crate::input::{strip_indentation, LineKind, TraceLines};
use crate::options::FormatOptions;

/// What is known about a trace after it has been indented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSummary {
    pub lines: usize,
    /// Zero for traces with balanced entry and exit markers.
    pub final_level: isize,
    pub max_level: isize,
    /// 1-based number of the first line that took the level below zero.
    pub first_negative_line: Option<usize>,
}

impl From<&Context> for FormatSummary {
    fn from(context: &Context) -> Self {
        Self {
            lines: context.lines,
            final_level: context.indent_level,
            max_level: context.max_level,
            first_negative_line: context.first_negative_line,
        }
    }
}

/// Indents trace lines according to the entry and exit markers seen so far.
pub struct Indenter {
    options: Rc<FormatOptions>,
    context: Context,
}

impl Indenter {
    #[must_use]
    pub fn new(options: Rc<FormatOptions>) -> Self {
        Self {
            options,
            context: Context::default(),
        }
    }

    #[must_use]
    pub const fn level(&self) -> isize {
        self.context.indent_level
    }

    #[must_use]
    pub fn summary(&self) -> FormatSummary {
        FormatSummary::from(&self.context)
    }

    /// Returns the number of indent units to write before the line,
    /// and the part of the line to write after them.
    fn indent<'line>(&mut self, line: &'line [u8]) -> (usize, &'line [u8]) {
        let content = if self.options.strip_existing {
            strip_indentation(line)
        } else {
            line
        };
        let kind = LineKind::of(content);
        let width = self.context.advance(kind);
        if kind != LineKind::Other {
            tracing::trace!(
                "{kind:?} marker at line {}, level is now {}",
                self.context.lines,
                self.context.indent_level
            );
        }
        (width, content)
    }

    /// Indents a single line (given without line terminator).
    ///
    /// Returns the indented line (again without terminator),
    /// and the nesting level that applies to the next line.
    pub fn process_line(&mut self, line: &str) -> (String, isize) {
        let (width, content) = self.indent(line.as_bytes());
        // stripping only ever removes ASCII, so this stays on a char boundary
        let content = line.get(line.len() - content.len()..).unwrap_or_default();
        let unit = String::from_utf8_lossy(INDENT_UNIT);
        (format!("{}{content}", unit.repeat(width)), self.level())
    }

    /// Writes the indented line plus a `\n` to `output`.
    ///
    /// # Errors
    ///
    /// If writing to `output` fails.
    pub fn write_line<W: Write + ?Sized>(
        &mut self,
        line: &[u8],
        output: &mut W,
    ) -> io::Result<()> {
        let (width, content) = self.indent(line);
        for _ in 0..width {
            output.write_all(INDENT_UNIT)?;
        }
        output.write_all(content)?;
        output.write_all(b"\n")?;
        if self.options.line_buffered {
            output.flush()?;
        }
        Ok(())
    }

    /// Indents all lines of `input` until end-of-stream.
    ///
    /// The level is carried over from earlier calls,
    /// so multiple inputs may be fed in one after the other
    /// as if they were one.
    ///
    /// # Errors
    ///
    /// If reading from `input` or writing to `output` fails.
    pub fn indent_stream<R: BufRead, W: Write + ?Sized>(
        &mut self,
        input: R,
        output: &mut W,
    ) -> FmtResult<()> {
        for line in TraceLines::new(input) {
            let line = line.map_err(Error::Read)?;
            self.write_line(&line, output).map_err(Error::Write)?;
        }
        output.flush().map_err(Error::Write)
    }
}

/// Indents a whole trace read from `input` and writes it to `output`.
///
/// # Errors
///
/// If reading from `input` or writing to `output` fails.
pub fn format_stream<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    options: Rc<FormatOptions>,
) -> FmtResult<FormatSummary> {
    let mut indenter = Indenter::new(options);
    indenter.indent_stream(input, output)?;
    let summary = indenter.summary();
    tracing::debug!("{summary:#?}");
    Ok(summary)
}

/// Does the actual indenting of an in-memory trace.
///
/// # Errors
///
/// Fails only if an I/O error occurs while writing to an in-memory buffer.
/// This is basically only possible when the buffer is full,
/// and no more memory can be allocated.
pub fn format(input: &str, options: Rc<FormatOptions>) -> FmtResult<String> {
    let mut output = Vec::with_capacity(input.len());
    format_stream(input.as_bytes(), &mut output, options)?;
    Ok(String::from_utf8(output)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indenter() -> Indenter {
        Indenter::new(Rc::new(FormatOptions::default()))
    }

    fn indent_all(lines: &[&str]) -> Vec<String> {
        let mut indenter = indenter();
        lines
            .iter()
            .map(|line| indenter.process_line(line).0)
            .collect()
    }

    #[test]
    fn scenario_sibling_block() {
        assert_eq!(
            indent_all(&["a", ">b", "c", "<d", "e"]),
            vec!["a", ">b", " c", "<d", "e"]
        );
    }

    #[test]
    fn scenario_nested_blocks() {
        assert_eq!(
            indent_all(&[">x", ">y", "z", "<w", "<v"]),
            vec![">x", " >y", "  z", " <w", "<v"]
        );
    }

    #[test]
    fn scenario_unmatched_exit() {
        let mut indenter = indenter();
        assert_eq!(indenter.process_line("<a"), ("<a".to_string(), -1));
        assert_eq!(indenter.process_line("b"), ("b".to_string(), -1));
        assert_eq!(indenter.summary().first_negative_line, Some(1));
    }

    #[test]
    fn levels_reported() {
        let mut indenter = indenter();
        assert_eq!(indenter.process_line(">a").1, 1);
        assert_eq!(indenter.process_line("x").1, 1);
        assert_eq!(indenter.process_line(">b").1, 2);
        assert_eq!(indenter.process_line("<b").1, 1);
        assert_eq!(indenter.process_line("<a").1, 0);
        assert_eq!(
            indenter.summary(),
            FormatSummary {
                lines: 5,
                final_level: 0,
                max_level: 2,
                first_negative_line: None,
            }
        );
    }

    #[test]
    fn empty_line_is_indented() {
        assert_eq!(indent_all(&[">a", "", "<a"]), vec![">a", " ", "<a"]);
    }

    #[test]
    fn strip_existing_loses_own_leading_whitespace() {
        // leading whitespace that was part of the trace line itself
        // can not be told apart from our indentation
        let plain = Rc::new(FormatOptions::default());
        let strip = Rc::new(FormatOptions {
            strip_existing: true,
            ..FormatOptions::default()
        });
        let once = format("  x\n>a\n", Rc::clone(&plain)).unwrap();
        assert_eq!(once, "  x\n>a\n");
        assert_eq!(format(&once, strip).unwrap(), "x\n>a\n");
    }

    #[test]
    fn strip_existing() {
        let mut indenter = Indenter::new(Rc::new(FormatOptions {
            strip_existing: true,
            ..FormatOptions::default()
        }));
        assert_eq!(indenter.process_line("   >a").0, ">a");
        assert_eq!(indenter.process_line("\tmiddle").0, " middle");
        assert_eq!(indenter.process_line(" <a").0, "<a");
    }

    #[test]
    fn keeps_existing_indentation_by_default() {
        assert_eq!(
            indent_all(&[">a", "  >b", "<a"]),
            vec![">a", "   >b", "<a"]
        );
    }

    #[test]
    fn format_empty() {
        let output = format("", Rc::new(FormatOptions::default())).unwrap();
        assert_eq!(output, "");
    }

    #[test]
    fn format_terminates_last_line() {
        let output = format(">a\nb\n<a", Rc::new(FormatOptions::default())).unwrap();
        assert_eq!(output, ">a\n b\n<a\n");
    }

    #[test]
    fn format_keeps_carriage_returns() {
        let output = format(">a\r\nb\r\n<a\r\n", Rc::new(FormatOptions::default())).unwrap();
        assert_eq!(output, ">a\r\n b\r\n<a\r\n");
    }

    #[test]
    fn stream_passes_invalid_utf8() {
        let mut output = Vec::new();
        let summary = format_stream(
            &b">\xff\n\xfe\n<\n"[..],
            &mut output,
            Rc::new(FormatOptions::default()),
        )
        .unwrap();
        assert_eq!(output, b">\xff\n \xfe\n<\n");
        assert_eq!(summary.lines, 3);
    }

    #[test]
    fn stream_continues_level() {
        let mut indenter = indenter();
        let mut output = Vec::new();
        indenter.indent_stream(&b">a\n"[..], &mut output).unwrap();
        indenter.indent_stream(&b"b\n<a\n"[..], &mut output).unwrap();
        assert_eq!(output, b">a\n b\n<a\n");
        assert_eq!(indenter.level(), 0);
    }
}
