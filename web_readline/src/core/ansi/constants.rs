// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! ANSI/VT100 constants used on both sides of the emulator.
//!
//! # Input side
//!
//! The emulator reports keys as raw data. Control keys arrive as single C0 bytes, and
//! the handful of special keys this crate understands arrive as CSI sequences:
//!
//! - Up: `ESC[A`
//! - Down: `ESC[B`
//! - Right: `ESC[C`
//! - Left: `ESC[D`
//! - Delete: `ESC[3~`
//!
//! # Output side
//!
//! Rendering the prompt line only needs a few sequences: erase line, cursor up, erase
//! to end of display, and save / restore cursor.

// ==================== Input: C0 control characters ====================

/// ESC (27 in decimal, 0x1B in hex). Every escape sequence starts with this.
pub const ESC_START: char = '\x1b';

/// Enter key. `\n` and `\r\n` in the input are normalized to this.
pub const CARRIAGE_RETURN: char = '\r';

/// Line feed. Only appears in input from pasted text.
pub const LINE_FEED: char = '\n';

/// `Ctrl+C` (ETX, end of text).
pub const CTRL_C: char = '\x03';

/// Backspace as sent by most emulators (DEL).
pub const DEL_BACKSPACE: char = '\x7f';

/// Backspace as sent by some emulators (BS, `Ctrl+H`).
pub const BS_BACKSPACE: char = '\x08';

/// Code points below this are C0 control characters.
pub const C0_CONTROL_END: u32 = 0x20;

// ==================== Input: sequence bodies after ESC ====================

/// `ESC [ A`.
pub const CSI_ARROW_UP: &str = "[A";
/// `ESC [ B`.
pub const CSI_ARROW_DOWN: &str = "[B";
/// `ESC [ C`.
pub const CSI_ARROW_RIGHT: &str = "[C";
/// `ESC [ D`.
pub const CSI_ARROW_LEFT: &str = "[D";
/// `ESC [ 3 ~`.
pub const CSI_DELETE: &str = "[3~";

// ==================== Output ====================

/// `CR LF`. The emulator does not convert a bare LF into a newline.
pub const CRLF: &str = "\r\n";

/// CSI 2 K (EL): Erase the entire current line. The cursor does not move.
pub const EL_ERASE_LINE: &str = "\x1b[2K";

/// CSI 1 A (CUU): Move the cursor up one row.
pub const CUU_CURSOR_UP_ONE: &str = "\x1b[1A";

/// CSI 0 J (ED): Erase from cursor to end of display.
pub const ED_ERASE_TO_END: &str = "\x1b[0J";

/// CSI s (SCP): Save the cursor position.
pub const SCP_SAVE_CURSOR: &str = "\x1b[s";

/// CSI u (RCP): Restore the cursor position saved by [`SCP_SAVE_CURSOR`].
pub const RCP_RESTORE_CURSOR: &str = "\x1b[u";
