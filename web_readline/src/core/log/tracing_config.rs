// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tracing_core::LevelFilter;

/// Where the formatted log lines should go.
///
/// In a browser the display is the devtools console (wired up by the embedder); in tests
/// and native builds it is `stdout` or `stderr`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
}

/// Fields:
/// - `writer_config`: [`WriterConfig`] - Where to write logs.
/// - `level_filter`: [`LevelFilter`] - The log level to use for tracing.
#[derive(Clone, Debug, PartialEq)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level_filter: LevelFilter,
}

#[derive(Clone, Debug, PartialEq)]
pub enum WriterConfig {
    None,
    Display(DisplayPreference),
    /// Path to the log file, eg: `/tmp/web_readline.log`.
    File(String),
    DisplayAndFile(DisplayPreference, String),
}

impl Default for TracingConfig {
    /// Warnings and errors to `stderr`. This is enough to see unrecognized escape
    /// sequences, storage failures and handler errors.
    fn default() -> Self {
        Self {
            writer_config: WriterConfig::Display(DisplayPreference::Stderr),
            level_filter: LevelFilter::WARN,
        }
    }
}

impl TracingConfig {
    #[must_use]
    pub fn new_file_and_display(
        tracing_log_file_path: impl Into<String>,
        level_filter: LevelFilter,
    ) -> Self {
        Self {
            writer_config: WriterConfig::DisplayAndFile(
                DisplayPreference::Stdout,
                tracing_log_file_path.into(),
            ),
            level_filter,
        }
    }

    #[must_use]
    pub fn get_level_filter(&self) -> LevelFilter { self.level_filter }

    #[must_use]
    pub fn get_writer_config(&self) -> WriterConfig { self.writer_config.clone() }
}
