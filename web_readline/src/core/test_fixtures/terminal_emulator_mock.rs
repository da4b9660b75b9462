// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CommonResult, StdMutex, TerminalEmulator, TerminalOptions};
use std::{collections::HashSet, future::Future, sync::Arc};
use unicode_width::UnicodeWidthChar;

/// You can safely clone this struct, the clones share the same state.
///
/// Everything written is recorded, and a tiny subset of VT100 is interpreted to keep
/// track of the cursor: printable text, `\r`, `\n`, CUU, and save / restore cursor.
/// Soft wrapping is not simulated, tests mark wrapped rows explicitly with
/// [`Self::set_row_wrapped`].
#[derive(Debug, Clone, Default)]
pub struct TerminalEmulatorMock {
    pub state: Arc<StdMutex<MockState>>,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub output: String,
    pub write_count: usize,
    pub column: u16,
    pub row: usize,
    pub saved_cursor: Option<(u16, usize)>,
    pub wrapped_rows: HashSet<usize>,
    pub scrolled_back: bool,
    pub renderer_unavailable: bool,
    pub attach_error: Option<String>,
    pub attached_to: Option<String>,
    pub fit_count: usize,
    pub applied_options: Option<TerminalOptions>,
}

impl TerminalEmulatorMock {
    pub fn get_output_as_string(&self) -> String {
        self.state.lock().unwrap().output.clone()
    }

    pub fn get_output_as_string_strip_ansi(&self) -> String {
        strip_ansi_escapes::strip_str(self.get_output_as_string())
    }

    pub fn get_write_count(&self) -> usize { self.state.lock().unwrap().write_count }

    pub fn clear_output(&self) { self.state.lock().unwrap().output.clear(); }

    pub fn set_row_wrapped(&self, row: usize) {
        self.state.lock().unwrap().wrapped_rows.insert(row);
    }

    /// Moves the cursor to `row` without producing output.
    pub fn set_cursor_row(&self, row: usize) { self.state.lock().unwrap().row = row; }

    pub fn set_scrolled_back(&self, scrolled_back: bool) {
        self.state.lock().unwrap().scrolled_back = scrolled_back;
    }

    pub fn set_renderer_unavailable(&self) {
        self.state.lock().unwrap().renderer_unavailable = true;
    }

    pub fn set_attach_error(&self, message: &str) {
        self.state.lock().unwrap().attach_error = Some(message.to_string());
    }

    fn record(&self, data: &str) {
        let mut state = self.state.lock().unwrap();
        state.output.push_str(data);
        state.write_count += 1;

        let mut chars = data.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\x1b' => {
                    // CSI: ESC [ params final.
                    if chars.next_if_eq(&'[').is_none() {
                        continue;
                    }
                    let mut params = String::new();
                    while let Some(&next) = chars.peek() {
                        if next.is_ascii_digit() || next == ';' {
                            params.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    match chars.next() {
                        Some('A') => {
                            let n = params.parse::<usize>().unwrap_or(1);
                            state.row = state.row.saturating_sub(n);
                        }
                        Some('s') => state.saved_cursor = Some((state.column, state.row)),
                        Some('u') => {
                            if let Some((column, row)) = state.saved_cursor {
                                state.column = column;
                                state.row = row;
                            }
                        }
                        _ => {}
                    }
                }
                '\r' => state.column = 0,
                '\n' => state.row += 1,
                _ => {
                    let width = u16::try_from(ch.width().unwrap_or(0)).unwrap_or(0);
                    state.column += width;
                }
            }
        }
    }
}

impl TerminalEmulator for TerminalEmulatorMock {
    type Container = str;

    fn apply_options(&self, options: &TerminalOptions) {
        self.state.lock().unwrap().applied_options = Some(options.clone());
    }

    fn write(&self, data: String) -> impl Future<Output = ()> + Send {
        self.record(&data);
        tokio::task::yield_now()
    }

    fn cursor_column(&self) -> u16 { self.state.lock().unwrap().column }

    fn cursor_row(&self) -> usize { self.state.lock().unwrap().row }

    fn is_row_wrapped(&self, row: usize) -> bool {
        self.state.lock().unwrap().wrapped_rows.contains(&row)
    }

    fn is_scrolled_back(&self) -> bool { self.state.lock().unwrap().scrolled_back }

    fn attach(&self, container: &str) -> CommonResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.attach_error {
            return Err(crate::ReadlineWebError::Attach(message.clone()).into());
        }
        state.attached_to = Some(container.to_string());
        Ok(())
    }

    fn try_enable_accelerated_renderer(&self) -> CommonResult<()> {
        if self.state.lock().unwrap().renderer_unavailable {
            miette::bail!("WebGL is not available");
        }
        Ok(())
    }

    fn fit(&self) { self.state.lock().unwrap().fit_count += 1; }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_cursor_tracking() {
        let mock = TerminalEmulatorMock::default();
        mock.write("hello".into()).await;
        assert_eq!(mock.cursor_column(), 5);

        mock.write("\r\n$ ab\x1b[scd\x1b[u".into()).await;
        assert_eq!((mock.cursor_column(), mock.cursor_row()), (4, 1));

        mock.write("\r\x1b[2K\x1b[1A\x1b[2K\x1b[0J".into()).await;
        assert_eq!((mock.cursor_column(), mock.cursor_row()), (0, 0));

        mock.write("😀".into()).await;
        assert_eq!(mock.cursor_column(), 2);
        assert_eq!(mock.get_write_count(), 4);
    }

    #[test]
    fn test_strip_ansi() {
        let mock = TerminalEmulatorMock::default();
        mock.record("\x1b[2K$ \x1b[31mred\x1b[0m");
        assert_eq!(mock.get_output_as_string_strip_ansi(), "$ red");
    }
}
