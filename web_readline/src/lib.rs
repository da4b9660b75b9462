// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # r3bl_web_readline
//!
//! Async line editing on top of a terminal emulator widget that lives in a web page
//! (think [xterm.js](https://xtermjs.org/)). The emulator hands over a stream of raw
//! keystrokes and escape sequences. This crate turns that stream into a single line
//! editing experience: a prompt, cursor motion, backspace & delete, `Ctrl+C`, and history
//! browsing with up & down. Each completed line is handed to an async handler that your
//! application supplies.
//!
//! The emulator keeps flushing writes asynchronously the whole time. Lines that are
//! completed while output is still settling (a fast paste, typing ahead of a slow
//! handler) are queued and replayed in order once the prompt is live again.
//!
//! # Collaborators
//!
//! Two things are consumed through narrow traits, so this crate never depends on a
//! browser:
//!
//! 1. [`TerminalEmulator`] - the widget itself: buffered writes with flush notification,
//!    read access to the active screen buffer, attach, fit.
//! 2. [`HistoryStorage`] - a string key/value store used to persist history as JSON.
//!    [`InMemoryHistoryStorage`] and [`KvHistoryStorage`] are provided.
//!
//! # Example
//!
//! ```no_run
//! # use r3bl_web_readline::{InputController, ReadlineWebOptions, TerminalEmulator};
//! async fn run<E: TerminalEmulator>(emulator: E, container: &E::Container)
//!     -> miette::Result<()>
//! {
//!     let options = ReadlineWebOptions::try_from_json(r#"{ "historySize": 50 }"#)?;
//!     let controller = InputController::try_new_in_memory(emulator, &options)?;
//!     controller.connect(container)?;
//!     controller.set_prompt("$ ");
//!     let writer = controller.clone();
//!     controller.set_handler(move |line: String| {
//!         let writer = writer.clone();
//!         async move {
//!             writer.writeln(format!("you typed: {line}")).await;
//!             Ok(())
//!         }
//!     });
//!     Ok(())
//! }
//! ```

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]
// Production code must not unwrap inside functions that return `Result`. Test code is
// allowed to use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach.
pub mod core;
pub mod readline_web;

// Re-export.
pub use core::*;
pub use readline_web::*;
