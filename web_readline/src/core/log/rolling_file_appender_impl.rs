// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

/// Creates a log file appender that never rotates. Note that if you wrap this up in a
/// non blocking writer, the guard has to be kept alive, so it isn't done here.
///
/// # Errors
///
/// Returns an error if:
/// - The path has no parent directory
/// - The path has no file name
pub fn try_create(
    path_str: &str,
) -> miette::Result<tracing_appender::rolling::RollingFileAppender> {
    let path = PathBuf::from(path_str);

    let parent = path.parent().ok_or_else(|| {
        miette::miette!(
            "Can't access parent folder of {}. It might not exist.",
            path.display()
        )
    })?;

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!("Can't get a file name from {}.", path.display())
    })?;

    Ok(tracing_appender::rolling::never(parent, file_name))
}
