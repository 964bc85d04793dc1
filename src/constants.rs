// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0

/// First byte of a line that opens a nested trace block,
/// usually printed when a traced function is entered.
pub const ENTRY_MARKER: u8 = b'>';

/// First byte of a line that closes a nested trace block,
/// usually printed when a traced function returns.
pub const EXIT_MARKER: u8 = b'<';

/// What gets written once per level of nesting.
pub const INDENT_UNIT: &[u8] = b" ";

/// Stands for stdin when used as input file name,
/// and for stdout when used as output file name.
pub const STDIO_PLACEHOLDER: &str = "-";
