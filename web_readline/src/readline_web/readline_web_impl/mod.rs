// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod input_controller;
pub mod line_state;
pub mod prompt;
pub mod readline_history;
pub mod write_queue;

// Re-export.
pub use input_controller::*;
pub use line_state::*;
pub use prompt::*;
pub use readline_history::*;
pub use write_queue::*;
