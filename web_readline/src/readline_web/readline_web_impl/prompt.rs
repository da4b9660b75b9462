// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter}, sync::Arc};

/// Generates the prompt text. Called on every render, with no controller lock held, so
/// it may read the controller (eg: `phase`, `history_entries`). It must not change it.
pub type PromptFn = Arc<dyn Fn() -> String + Send + Sync>;

/// The text shown before the editable line. Either fixed, or produced on every render,
/// eg: to show the current working directory or a clock.
#[derive(Clone)]
pub enum Prompt {
    Literal(String),
    Dynamic(PromptFn),
}

impl Prompt {
    pub fn dynamic(generator: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self::Dynamic(Arc::new(generator))
    }

    #[must_use]
    pub fn render_text(&self) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Dynamic(generator) => generator(),
        }
    }
}

impl Default for Prompt {
    fn default() -> Self { Self::Literal(String::new()) }
}

impl Debug for Prompt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self { Self::Literal(text.to_string()) }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self { Self::Literal(text) }
}

impl From<PromptFn> for Prompt {
    fn from(generator: PromptFn) -> Self { Self::Dynamic(generator) }
}
