// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::LineBuffer;
use crate::core::ansi::{CRLF, CUU_CURSOR_UP_ONE, ED_ERASE_TO_END, EL_ERASE_LINE,
                        RCP_RESTORE_CURSOR, SCP_SAVE_CURSOR};

/// Where the render starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStart {
    /// Write at the current cursor position. Used when the prompt line is first shown.
    Fresh,
    /// Redraw over the prompt line that is already on screen. `wrapped_rows` is the
    /// number of rows above the cursor row that the current logical line soft wrapped
    /// onto.
    InPlace { wrapped_rows: usize },
}

/// What to write after the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderBody<'a> {
    /// The editable line. The emulator cursor ends up at the edit cursor.
    Editable(&'a LineBuffer),
    /// A line that is done, eg: submitted or interrupted. Written verbatim, followed by
    /// CRLF.
    Finalized(&'a str),
}

/// Compose everything one render writes into a single string, so that it goes to the
/// emulator as one write.
///
/// ```text
/// InPlace { wrapped_rows: 2 }:
///
///   \r EL  ( CUU EL ) x 2  ED  prompt  body
/// ```
///
/// For [`RenderBody::Editable`] the body is `before SCP after RCP` which leaves the
/// emulator cursor between the two halves, even when they contain wide glyphs.
#[must_use]
pub fn compose_render_output(
    start: RenderStart,
    prompt: &str,
    body: RenderBody<'_>,
) -> String {
    let mut acc = String::new();

    if let RenderStart::InPlace { wrapped_rows } = start {
        acc.push('\r');
        acc.push_str(EL_ERASE_LINE);
        for _ in 0..wrapped_rows {
            acc.push_str(CUU_CURSOR_UP_ONE);
            acc.push_str(EL_ERASE_LINE);
        }
        acc.push_str(ED_ERASE_TO_END);
    }

    acc.push_str(prompt);

    match body {
        RenderBody::Editable(line) => {
            let (before, after) = line.split_at_cursor();
            acc.push_str(before);
            if !after.is_empty() {
                acc.push_str(SCP_SAVE_CURSOR);
                acc.push_str(after);
                acc.push_str(RCP_RESTORE_CURSOR);
            }
        }
        RenderBody::Finalized(text) => {
            acc.push_str(text);
            acc.push_str(CRLF);
        }
    }

    acc
}

/// Count how many rows above `cursor_row` belong to the same logical line, by walking
/// up while the row is a soft wrap continuation.
pub fn count_wrapped_rows(
    cursor_row: usize,
    is_row_wrapped: impl Fn(usize) -> bool,
) -> usize {
    let mut row = cursor_row;
    while row > 0 && is_row_wrapped(row) {
        row -= 1;
    }
    cursor_row - row
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn line(text: &str, cursor: usize) -> LineBuffer {
        let mut it = LineBuffer::new();
        it.replace(text);
        while it.cursor() > cursor {
            it.move_left();
        }
        it
    }

    #[test]
    fn test_fresh_editable_cursor_at_end() {
        let output = compose_render_output(
            RenderStart::Fresh,
            "$ ",
            RenderBody::Editable(&line("ls", 2)),
        );
        assert_eq!(output, "$ ls");
    }

    #[test]
    fn test_in_place_editable_cursor_in_middle() {
        let output = compose_render_output(
            RenderStart::InPlace { wrapped_rows: 0 },
            "> ",
            RenderBody::Editable(&line("abcd", 2)),
        );
        assert_eq!(output, "\r\x1b[2K\x1b[0J> ab\x1b[scd\x1b[u");
    }

    #[test]
    fn test_in_place_clears_wrapped_rows() {
        let output = compose_render_output(
            RenderStart::InPlace { wrapped_rows: 2 },
            "",
            RenderBody::Finalized("x"),
        );
        assert_eq!(
            output,
            "\r\x1b[2K\x1b[1A\x1b[2K\x1b[1A\x1b[2K\x1b[0Jx\r\n"
        );
    }

    #[test]
    fn test_finalized_is_verbatim() {
        let output = compose_render_output(
            RenderStart::Fresh,
            "$ ",
            RenderBody::Finalized("foo^C"),
        );
        assert_eq!(output, "$ foo^C\r\n");
    }

    #[test_case(0, &[], 0)]
    #[test_case(3, &[], 0)]
    #[test_case(3, &[3], 1)]
    #[test_case(3, &[2, 3], 2)]
    #[test_case(3, &[1, 3], 1)]
    #[test_case(2, &[1, 2], 2)]
    fn test_count_wrapped_rows(cursor_row: usize, wrapped: &[usize], expected: usize) {
        let actual = count_wrapped_rows(cursor_row, |row| wrapped.contains(&row));
        assert_eq!(actual, expected);
    }
}
