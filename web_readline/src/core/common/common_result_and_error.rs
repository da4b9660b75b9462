// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! For more information on error types, see:
//!
//! 1. [Article](https://developerlife.com/2024/06/10/rust-miette-error-handling/)
//! 2. [Video](https://youtu.be/TmLF7vI8lKk)

/// Disambiguate the type of `StdMutex` from stdlib and tokio to avoid conflicts.
pub type StdMutex<T> = std::sync::Mutex<T>;

/// Type alias to make it easy to work with [`miette::Result`] and [`miette::Report`].
/// Works hand in hand w/ [`ReadlineWebError`] and any other type of error.
pub type CommonResult<T> = miette::Result<T>;

/// Errors that are surfaced to the embedding application. Everything else (unknown
/// escape sequences, a missing accelerated renderer, corrupt persisted history) is
/// logged and swallowed.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ReadlineWebError {
    #[error("📏 History size must be a positive integer, got {history_size}")]
    #[diagnostic(
        code(r3bl_web_readline::invalid_history_size),
        help("Omit `historySize` to use the default of 100")
    )]
    InvalidHistorySize { history_size: usize },

    #[error("🧩 Could not parse options")]
    #[diagnostic(code(r3bl_web_readline::invalid_options))]
    InvalidOptions(#[from] serde_json::Error),

    #[error("📑 Could not open history storage in folder: '{db_folder_path}'")]
    #[diagnostic(code(r3bl_web_readline::storage))]
    Storage {
        db_folder_path: String,
        #[source]
        source: kv::Error,
    },

    #[error("🖥️ Could not attach terminal emulator: {0}")]
    #[diagnostic(code(r3bl_web_readline::attach))]
    Attach(String),
}
