// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Line editing state for the prompt line.
//!
//! | Module             | Responsibility                                             |
//! |--------------------|------------------------------------------------------------|
//! | `line_buffer`      | [`LineBuffer`]: text + grapheme aligned cursor             |
//! | `input_classifier` | Raw emulator data to [`InputChunk`] and [`LogicalKey`]s    |
//! | `render`           | Escape sequences that (re)draw the prompt line             |

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach.
mod input_classifier;
mod line_buffer;
mod render;

// Re-export.
pub use input_classifier::*;
pub use line_buffer::*;
pub use render::*;
