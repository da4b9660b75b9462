// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach.
mod temp_dir;
mod terminal_emulator_mock;

// Re-export.
pub use temp_dir::*;
pub use terminal_emulator_mock::*;
