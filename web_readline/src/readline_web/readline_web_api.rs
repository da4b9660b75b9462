// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DEFAULT_HISTORY_SIZE, ReadlineWebError, TerminalOptions};
use serde::Deserialize;

/// Construction options for [`crate::InputController`].
///
/// These usually come straight from the embedding page as a JSON object, so the field
/// names are camel case:
///
/// ```json
/// {
///   "historySize": 50,
///   "persistentHistory": "my-app-history",
///   "fontSize": 14,
///   "cursorBlink": true
/// }
/// ```
///
/// `historySize` and `persistentHistory` are consumed here. Every other key is passed
/// through to the emulator in [`Self::terminal`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadlineWebOptions {
    /// Maximum number of history entries. Must be positive.
    #[serde(default = "default_history_size")]
    pub history_size: usize,

    /// Storage key to persist history under. [None] disables persistence.
    #[serde(default)]
    pub persistent_history: Option<String>,

    /// Emulator passthrough options.
    #[serde(flatten)]
    pub terminal: TerminalOptions,
}

fn default_history_size() -> usize { DEFAULT_HISTORY_SIZE }

impl Default for ReadlineWebOptions {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_HISTORY_SIZE,
            persistent_history: None,
            terminal: TerminalOptions::new(),
        }
    }
}

impl ReadlineWebOptions {
    /// Parse and [validate](Self::validate) options from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not an object of the expected shape, or if it fails
    /// validation.
    pub fn try_from_json(json: &str) -> Result<Self, ReadlineWebError> {
        let it: Self = serde_json::from_str(json)?;
        it.validate()?;
        Ok(it)
    }

    /// # Errors
    ///
    /// Returns an error if `history_size` is zero.
    pub fn validate(&self) -> Result<(), ReadlineWebError> {
        if self.history_size == 0 {
            return Err(ReadlineWebError::InvalidHistorySize {
                history_size: self.history_size,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn with_history_size(mut self, history_size: usize) -> Self {
        self.history_size = history_size;
        self
    }

    #[must_use]
    pub fn with_persistent_history(mut self, key: impl Into<String>) -> Self {
        self.persistent_history = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_terminal_option(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.terminal.insert(key.into(), value.into());
        self
    }
}
