// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::core::ansi::{BS_BACKSPACE, C0_CONTROL_END, CARRIAGE_RETURN, CRLF,
                        CSI_ARROW_DOWN, CSI_ARROW_LEFT, CSI_ARROW_RIGHT, CSI_ARROW_UP,
                        CSI_DELETE, CTRL_C, DEL_BACKSPACE, ESC_START, LINE_FEED};
use unicode_segmentation::UnicodeSegmentation;

/// The escape sequences the line editor acts on. Anything else that starts with ESC is
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum EscapeSequence {
    HistoryPrevious,
    HistoryNext,
    CursorLeft,
    CursorRight,
    DeleteForward,
}

impl EscapeSequence {
    /// `rest` is the chunk with the leading ESC removed.
    #[must_use]
    pub fn parse(rest: &str) -> Option<Self> {
        match rest {
            CSI_ARROW_UP => Some(Self::HistoryPrevious),
            CSI_ARROW_DOWN => Some(Self::HistoryNext),
            CSI_ARROW_LEFT => Some(Self::CursorLeft),
            CSI_ARROW_RIGHT => Some(Self::CursorRight),
            CSI_DELETE => Some(Self::DeleteForward),
            _ => None,
        }
    }
}

/// One chunk of data received from the emulator.
///
/// A chunk that begins with ESC is treated as a single escape sequence and is never
/// split into characters. Everything else is text to walk one grapheme cluster at a
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputChunk<'a> {
    Escape(EscapeSequence),
    UnknownEscape(&'a str),
    Text(String),
}

#[must_use]
pub fn classify_chunk(data: &str) -> InputChunk<'_> {
    match data.strip_prefix(ESC_START) {
        Some(rest) => match EscapeSequence::parse(rest) {
            Some(sequence) => InputChunk::Escape(sequence),
            None => InputChunk::UnknownEscape(rest),
        },
        None => InputChunk::Text(normalize_newlines(data)),
    }
}

/// `\r\n` becomes `\r`, then any remaining `\n` becomes `\r`. Pasted text uses any of
/// the three conventions.
#[must_use]
pub fn normalize_newlines(data: &str) -> String {
    data.replace(CRLF, "\r").replace(LINE_FEED, "\r")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalKey<'a> {
    Enter,
    Backspace,
    Interrupt,
    /// Any other C0 control code. Dropped.
    IgnoredControl(char),
    /// A grapheme cluster to insert.
    Printable(&'a str),
}

impl<'a> LogicalKey<'a> {
    #[must_use]
    pub fn from_cluster(cluster: &'a str) -> Self {
        let mut chars = cluster.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => match ch {
                CARRIAGE_RETURN => Self::Enter,
                DEL_BACKSPACE | BS_BACKSPACE => Self::Backspace,
                CTRL_C => Self::Interrupt,
                _ if is_control(ch) => Self::IgnoredControl(ch),
                _ => Self::Printable(cluster),
            },
            _ => Self::Printable(cluster),
        }
    }
}

fn is_control(ch: char) -> bool { (ch as u32) < C0_CONTROL_END || ch == DEL_BACKSPACE }

/// Split normalized text into logical keys, one per grapheme cluster.
pub fn logical_keys(text: &str) -> impl Iterator<Item = LogicalKey<'_>> {
    text.graphemes(true).map(LogicalKey::from_cluster)
}
