// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # Line editing on top of a web terminal emulator
//!
//! # Mental model
//!
//! There are two pieces, and one depends on the other:
//!
//! 1. [`History`] (leaf) - an ordered, bounded list of accepted lines, a browse cursor,
//!    and per position scratch edits. Optionally persisted through [`HistoryStorage`].
//! 2. [`InputController`] - owns the [`LineBuffer`], the [`Prompt`], the [`WriteQueue`]
//!    for output, and the queue of lines that were completed while output was still
//!    settling. It drives the [`History`] on up / down and when a line is accepted.
//!
//! Data flows like this:
//!
//! ```text
//! emulator raw data ─► InputController::handle_data()
//!                        │ classify: escape sequence or printable run
//!                        ├─► mutate LineBuffer or History
//!                        ├─► re-render the prompt line in place
//!                        └─► Enter: hand the line to the async handler, then
//!                            re-enter the input phase when the handler is done
//! ```
//!
//! # Phases
//!
//! The prompt is only editable on screen while the controller is
//! [`ControllerPhase::Live`]. While a handler runs, or while output is being flushed
//! before the prompt is shown again, keystrokes still edit the [`LineBuffer`], but
//! nothing is rendered, and completed lines go into a FIFO of [`PendingInput`]. That
//! FIFO is drained, in order, when the input phase is entered again.
//!
//! # Concurrency
//!
//! All state changes happen synchronously inside [`InputController::handle_data`] and
//! friends, which run to completion. Suspension only happens at two await points, which
//! run in spawned tasks that lock the state again when they resume:
//!
//! 1. Waiting for the [`WriteQueue`] to flush.
//! 2. Waiting for the application handler to finish.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach sources.
pub mod readline_web_api;
pub mod readline_web_impl;
pub mod terminal_emulator;

// Re-export the public API.
pub use readline_web_api::*;
pub use readline_web_impl::*;
pub use terminal_emulator::*;
