// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0

use cli::InitError;
use std::rc::Rc;
use thiserror::Error;

mod cli;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to initialize the CLI tool: {0}")]
    Init(#[from] InitError),

    #[error("Failed to indent the trace: {0}")]
    Format(#[from] prtrace::error::Error),
}

fn main() -> Result<(), CliError> {
    let settings = cli::init()?;
    let options = Rc::new(settings.options);

    let summary = prtrace::run(&options, &settings.src, &settings.dst)?;
    if summary.final_level != 0 {
        tracing::debug!(
            "Trace ended at nesting level {} instead of 0",
            summary.final_level
        );
    }
    Ok(())
}
