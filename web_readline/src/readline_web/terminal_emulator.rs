// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::CommonResult;
use std::future::Future;

/// Options that are handed to the emulator untouched, eg: `fontSize`, `cursorBlink`,
/// `theme`. See [`crate::ReadlineWebOptions::terminal`].
pub type TerminalOptions = serde_json::Map<String, serde_json::Value>;

/// The narrow interface to the terminal emulator widget. Rendering, the buffer model,
/// and resize fitting all live behind this trait.
///
/// An implementation for xterm.js forwards [`write`](Self::write) to `term.write(data,
/// callback)` and resolves the returned future from the callback. The emulator keeps
/// its own write queue, so writes land in the order they were issued.
///
/// The buffer accessors read the *active* buffer:
/// - [`cursor_column`](Self::cursor_column) is `buffer.active.cursorX`.
/// - [`cursor_row`](Self::cursor_row) is the absolute row `baseY + cursorY`.
/// - [`is_row_wrapped`](Self::is_row_wrapped) is `getLine(row).isWrapped`, ie: the row
///   is a visual continuation of the row above it.
/// - [`is_scrolled_back`](Self::is_scrolled_back) is `viewportY != baseY`.
pub trait TerminalEmulator: Send + Sync + 'static {
    /// Whatever the emulator gets attached to, eg: a DOM element.
    type Container: ?Sized;

    /// Called once, at construction.
    fn apply_options(&self, options: &TerminalOptions);

    /// Queue `data` (text and escape sequences). The future resolves once the emulator
    /// has processed it.
    fn write(&self, data: String) -> impl Future<Output = ()> + Send;

    /// 0-based column of the cursor.
    fn cursor_column(&self) -> u16;

    /// 0-based absolute row of the cursor in the active buffer.
    fn cursor_row(&self) -> usize;

    /// `true` if `row` continues the logical line of the row above it.
    fn is_row_wrapped(&self, row: usize) -> bool;

    /// `true` if the viewport is scrolled back from the live area.
    fn is_scrolled_back(&self) -> bool;

    /// # Errors
    ///
    /// Returns an error if the emulator can't be attached to `container`.
    fn attach(&self, container: &Self::Container) -> CommonResult<()>;

    /// Try to switch to a GPU accelerated renderer.
    ///
    /// # Errors
    ///
    /// Returns an error if it is not available. Callers carry on without it.
    fn try_enable_accelerated_renderer(&self) -> CommonResult<()>;

    /// Resize the emulator to fit its container.
    fn fit(&self);
}
