// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CommonResult, History, HistoryStorage, InMemoryHistoryStorage, InputChunk,
            LineBuffer, LogicalKey, PersistentHistory, Prompt, ReadlineWebError,
            ReadlineWebOptions, RenderBody, RenderStart, StdMutex, TerminalEmulator,
            WriteCompletion, WriteQueue, classify_chunk, compose_render_output,
            core::ansi::CRLF, count_wrapped_rows, logical_keys, ok};
use futures_util::{FutureExt, future::BoxFuture};
use std::{collections::VecDeque,
          fmt::{Debug, Formatter},
          future::Future,
          sync::{Arc, MutexGuard}};
use tokio::{spawn, sync::watch};

/// What `Ctrl+C` leaves on the abandoned line.
pub const INTERRUPT_MARKER: &str = "^C";

/// Type erased async line handler. See [`InputController::set_handler`].
pub type LineHandler =
    Arc<dyn Fn(String) -> BoxFuture<'static, CommonResult<()>> + Send + Sync>;

/// ```text
///            Enter / Ctrl+C                handler done
///   ┌──────┐ ───────────────► ┌──────┐ ─────────────────► ┌──────────┐
///   │ Live │                  │ Busy │                    │ Settling │
///   └──────┘                  └──────┘ ◄───────────────── └──────────┘
///      ▲                                pending line to         │
///      │                                execute                 │
///      └────────────────────────────────────────────────────────┘
///                        flushed, nothing left to execute
/// ```
///
/// Only in [`ControllerPhase::Live`] is the prompt line on screen and editable. In the
/// other two phases keystrokes still edit the [`LineBuffer`] but are not rendered, and
/// completed lines are queued as [`PendingInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ControllerPhase {
    Live,
    /// Waiting for the [`WriteQueue`] to flush before showing the prompt again.
    Settling,
    /// A handler is running, or the input phase has not been entered yet.
    Busy,
}

/// A line that was completed while the controller was not [`ControllerPhase::Live`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInput {
    pub text: String,
    /// `false` for an interrupted line, which is only echoed.
    pub should_execute: bool,
}

/// Answer to a mouse wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDisposition {
    /// The viewport is scrolled back. Let the emulator scroll it, and don't let the
    /// event bubble to the page.
    Suppress,
    /// Let the page handle it.
    Default,
}

struct ControllerState {
    line: LineBuffer,
    prompt: Prompt,
    handler: LineHandler,
    history: History,
    pending_input: VecDeque<PendingInput>,
    phase: ControllerPhase,
}

impl ControllerState {
    fn set_phase(&mut self, phase: ControllerPhase) {
        tracing::debug!(message = "Phase change", from = %self.phase, to = %phase);
        self.phase = phase;
    }

    /// The line is done: either run it (`should_execute`) or just leave it on screen.
    fn push_line(&mut self, effects: &mut Vec<Effect>, should_execute: bool) {
        let text = self.line.take();
        tracing::debug!(message = "Line accepted", ?text, should_execute);
        self.history.rewind(should_execute.then_some(text.as_str()));

        if self.phase != ControllerPhase::Live {
            tracing::debug!(message = "Queueing line until the prompt is live", ?text);
            self.pending_input.push_back(PendingInput {
                text,
                should_execute,
            });
            return;
        }

        effects.push(Effect::Render {
            in_place: true,
            prompt: self.prompt.clone(),
            line: RenderedLine::Finalized(text.clone()),
        });
        self.set_phase(ControllerPhase::Busy);

        if should_execute {
            effects.push(Effect::RunHandler {
                handler: self.handler.clone(),
                text,
            });
        } else {
            self.enter_input_phase(effects);
        }
    }

    /// Only acts when [`ControllerPhase::Busy`].
    fn enter_input_phase(&mut self, effects: &mut Vec<Effect>) {
        if self.phase != ControllerPhase::Busy {
            return;
        }
        self.set_phase(ControllerPhase::Settling);
        effects.push(Effect::Settle);
    }
}

impl Debug for ControllerState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerState")
            .field("line", &self.line)
            .field("prompt", &self.prompt)
            .field("history", &self.history)
            .field("pending_input", &self.pending_input)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct ControllerInner<E: TerminalEmulator> {
    emulator: Arc<E>,
    write_queue: WriteQueue,
    state: StdMutex<ControllerState>,
    /// Taken before `state`, and held until the decided output is enqueued.
    render_lock: StdMutex<()>,
    phase_sender: watch::Sender<ControllerPhase>,
}

/// Line editing on top of a [`TerminalEmulator`].
///
/// Feed it everything the emulator reports as user input with [`Self::handle_data`].
/// Each completed line is passed to the handler set with [`Self::set_handler`], and the
/// prompt comes back once that handler is done and its output has flushed.
///
/// You can safely clone this struct, clones share the same state. This is how the line
/// handler gets hold of [`Self::writeln`].
///
/// [`Self::try_new`] spawns a task, so it must be called from inside a tokio runtime.
pub struct InputController<E: TerminalEmulator> {
    inner: Arc<ControllerInner<E>>,
}

impl<E: TerminalEmulator> Clone for InputController<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E: TerminalEmulator + Debug> Debug for InputController<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputController")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<E: TerminalEmulator> InputController<E> {
    /// Apply `options.terminal` to `emulator`, load history (if persistent), and show
    /// the prompt once the emulator is ready.
    ///
    /// # Errors
    ///
    /// Returns an error if `options` fail [validation](ReadlineWebOptions::validate).
    pub fn try_new(
        /* Move */ emulator: E,
        options: &ReadlineWebOptions,
        storage: Arc<dyn HistoryStorage>,
    ) -> Result<Self, ReadlineWebError> {
        options.validate()?;

        emulator.apply_options(&options.terminal);
        let emulator = Arc::new(emulator);

        let maybe_persistent =
            options
                .persistent_history
                .as_ref()
                .map(|key| PersistentHistory {
                    key: key.clone(),
                    storage,
                });
        let history = History::new(options.history_size, maybe_persistent);

        let (write_queue, _) = WriteQueue::spawn(emulator.clone());
        let (phase_sender, _) = watch::channel(ControllerPhase::Busy);

        let state = ControllerState {
            line: LineBuffer::new(),
            prompt: Prompt::default(),
            handler: noop_line_handler(),
            history,
            pending_input: VecDeque::new(),
            phase: ControllerPhase::Busy,
        };

        let it = Self {
            inner: Arc::new(ControllerInner {
                emulator,
                write_queue,
                state: StdMutex::new(state),
                render_lock: StdMutex::new(()),
                phase_sender,
            }),
        };

        it.transition(ControllerState::enter_input_phase);

        tracing::debug!(
            message = "InputController created",
            history_size = options.history_size,
            persistent_history = ?options.persistent_history
        );

        Ok(it)
    }

    /// [`Self::try_new`] with history kept in memory only. `persistentHistory` is
    /// honored, but only lives as long as this controller.
    ///
    /// # Errors
    ///
    /// Returns an error if `options` fail [validation](ReadlineWebOptions::validate).
    pub fn try_new_in_memory(
        /* Move */ emulator: E,
        options: &ReadlineWebOptions,
    ) -> Result<Self, ReadlineWebError> {
        Self::try_new(emulator, options, Arc::new(InMemoryHistoryStorage::new()))
    }

    /// Attach the emulator to `container`, switch to the accelerated renderer if it is
    /// available, and fit to the container.
    ///
    /// # Errors
    ///
    /// Returns an error if the emulator can't be attached. A missing accelerated
    /// renderer is only logged.
    pub fn connect(&self, container: &E::Container) -> CommonResult<()> {
        let emulator = &self.inner.emulator;

        emulator.attach(container)?;

        if let Err(report) = emulator.try_enable_accelerated_renderer() {
            tracing::warn!(
                message = "Accelerated renderer unavailable, using the default one",
                error = ?report
            );
        }

        emulator.fit();

        ok!()
    }

    /// Set the prompt. If the prompt line is live it is redrawn right away, otherwise
    /// the new prompt shows up the next time the input phase is entered.
    ///
    /// # Panics
    ///
    /// This will panic if the lock is poisoned.
    pub fn set_prompt(&self, prompt: impl Into<Prompt>) {
        let prompt = prompt.into();
        self.transition(|state, effects| {
            state.prompt = prompt;
            if state.phase == ControllerPhase::Live {
                effects.push(redraw_editable(state));
            }
        });
    }

    /// Set the async function that receives each completed line. It is awaited before
    /// the prompt comes back. Errors and panics are logged and the prompt comes back
    /// anyway.
    ///
    /// # Panics
    ///
    /// This will panic if the lock is poisoned.
    pub fn set_handler<F, Fut>(&self, handler: F)
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CommonResult<()>> + Send + 'static,
    {
        self.lock_state().handler = Arc::new(move |line: String| handler(line).boxed());
    }

    /// Change the history capacity. The oldest entries are evicted if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_size` is zero.
    ///
    /// # Panics
    ///
    /// This will panic if the lock is poisoned.
    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    pub fn set_max_history(&self, max_size: usize) -> Result<(), ReadlineWebError> {
        if max_size == 0 {
            return Err(ReadlineWebError::InvalidHistorySize {
                history_size: max_size,
            });
        }
        self.lock_state().history.set_max_size(max_size);
        ok!()
    }

    /// Queue output. Await the returned [`WriteCompletion`] to wait for the emulator to
    /// process it.
    pub fn write(&self, data: impl Into<String>) -> WriteCompletion {
        self.inner.write_queue.enqueue(data)
    }

    /// [`Self::write`] followed by CRLF.
    pub fn writeln(&self, data: impl Into<String>) -> WriteCompletion {
        let mut data = data.into();
        data.push_str(CRLF);
        self.inner.write_queue.enqueue(data)
    }

    /// Resolves once everything written so far has been processed by the emulator.
    pub fn flush(&self) -> WriteCompletion { self.inner.write_queue.flush() }

    /// Feed one chunk of data that the emulator reported as user input.
    ///
    /// # Panics
    ///
    /// This will panic if the lock is poisoned.
    pub fn handle_data(&self, data: &str) {
        self.transition(|state, effects| {
            let mut line_pushed = false;

            match classify_chunk(data) {
                InputChunk::UnknownEscape(rest) => {
                    tracing::warn!(
                        message = "Ignoring unrecognized escape sequence",
                        sequence = ?rest
                    );
                    return;
                }
                InputChunk::Escape(sequence) => {
                    tracing::trace!(message = "Escape sequence", %sequence);
                    apply_escape_sequence(state, sequence);
                }
                InputChunk::Text(text) => {
                    for key in logical_keys(&text) {
                        match key {
                            LogicalKey::Enter => {
                                state.push_line(effects, true);
                                line_pushed = true;
                            }
                            LogicalKey::Interrupt => {
                                state.line.append(INTERRUPT_MARKER);
                                state.push_line(effects, false);
                                line_pushed = true;
                            }
                            LogicalKey::Backspace => {
                                state.line.backspace();
                            }
                            LogicalKey::IgnoredControl(ch) => {
                                tracing::trace!(
                                    message = "Ignoring control character",
                                    ch = ?ch
                                );
                            }
                            LogicalKey::Printable(cluster) => state.line.insert(cluster),
                        }
                    }
                }
            }

            if !line_pushed && state.phase == ControllerPhase::Live {
                effects.push(redraw_editable(state));
            }
        });
    }

    /// The emulator reflowed its buffer (eg: its column count changed). Redraws the
    /// prompt line if it is live.
    ///
    /// # Panics
    ///
    /// This will panic if the lock is poisoned.
    pub fn handle_resize(&self) {
        self.transition(|state, effects| {
            if state.phase == ControllerPhase::Live {
                effects.push(redraw_editable(state));
            }
        });
    }

    /// The page viewport changed size. Fits the emulator to its container, which
    /// reports back through [`Self::handle_resize`] if the grid changed.
    pub fn handle_viewport_resize(&self) { self.inner.emulator.fit(); }

    #[must_use]
    pub fn handle_wheel(&self) -> WheelDisposition {
        if self.inner.emulator.is_scrolled_back() {
            WheelDisposition::Suppress
        } else {
            WheelDisposition::Default
        }
    }

    /// Resolves once the prompt line is live and editable.
    pub async fn wait_until_live(&self) {
        let mut receiver = self.inner.phase_sender.subscribe();
        // The sender lives as long as `self`, so this never fails.
        receiver
            .wait_for(|phase| *phase == ControllerPhase::Live)
            .await
            .ok();
    }

    /// # Panics
    ///
    /// This will panic if the lock is poisoned.
    #[must_use]
    pub fn phase(&self) -> ControllerPhase { self.lock_state().phase }

    /// # Panics
    ///
    /// This will panic if the lock is poisoned.
    #[must_use]
    pub fn current_line(&self) -> String { self.lock_state().line.text().to_string() }

    /// Display width in columns of the line being edited, up to the cursor.
    ///
    /// # Panics
    ///
    /// This will panic if the lock is poisoned.
    #[must_use]
    pub fn line_display_width(&self) -> usize {
        self.lock_state().line.display_width_before_cursor()
    }

    /// Oldest first.
    ///
    /// # Panics
    ///
    /// This will panic if the lock is poisoned.
    #[must_use]
    pub fn history_entries(&self) -> Vec<String> {
        self.lock_state().history.entries().iter().cloned().collect()
    }

    /// # Panics
    ///
    /// This will panic if the lock is poisoned.
    #[must_use]
    pub fn pending_input(&self) -> Vec<PendingInput> {
        self.lock_state().pending_input.iter().cloned().collect()
    }
}

/// Internal state transitions.
///
/// A transition runs with the state lock held and only *decides* what to do, as a list
/// of [`Effect`]s. The effects are applied once the state lock is released, because
/// applying them calls out to code that may read the controller again: the prompt
/// generator, the emulator, and the line handler. The render lock is held across both
/// steps so that the output of two transitions never interleaves.
impl<E: TerminalEmulator> InputController<E> {
    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.inner.state.lock().unwrap()
    }

    fn transition(&self, decide: impl FnOnce(&mut ControllerState, &mut Vec<Effect>)) {
        let _render_guard = self.inner.render_lock.lock().unwrap();
        let (effects, phase) = {
            let mut state = self.lock_state();
            let mut effects = vec![];
            decide(&mut state, &mut effects);
            (effects, state.phase)
        };
        for effect in effects {
            self.apply(effect);
        }
        // Published last, so a `wait_until_live` waiter sees the prompt render queued.
        self.inner.phase_sender.send_if_modified(|published| {
            let changed = *published != phase;
            *published = phase;
            changed
        });
    }

    fn apply(&self, effect: Effect) {
        match effect {
            Effect::Write(data) => {
                self.inner.write_queue.enqueue(data);
            }
            Effect::Render {
                in_place,
                prompt,
                line,
            } => {
                let start = if in_place {
                    let emulator = &self.inner.emulator;
                    RenderStart::InPlace {
                        wrapped_rows: count_wrapped_rows(emulator.cursor_row(), |row| {
                            emulator.is_row_wrapped(row)
                        }),
                    }
                } else {
                    RenderStart::Fresh
                };
                let body = match &line {
                    RenderedLine::Editable(buffer) => RenderBody::Editable(buffer),
                    RenderedLine::Finalized(text) => RenderBody::Finalized(text),
                };
                let output = compose_render_output(start, &prompt.render_text(), body);
                self.inner.write_queue.enqueue(output);
            }
            Effect::RunHandler { handler, text } => self.spawn_handler(handler, text),
            Effect::Settle => self.spawn_settle(),
        }
    }

    /// Output has flushed: replay pending lines, or go live.
    fn finish_entering_input_phase(
        &self,
        state: &mut ControllerState,
        effects: &mut Vec<Effect>,
    ) {
        if self.inner.emulator.cursor_column() != 0 {
            effects.push(Effect::Write(CRLF.to_string()));
        }

        while let Some(PendingInput {
            text,
            should_execute,
        }) = state.pending_input.pop_front()
        {
            tracing::debug!(message = "Replaying queued line", ?text, should_execute);
            effects.push(Effect::Render {
                in_place: false,
                prompt: state.prompt.clone(),
                line: RenderedLine::Finalized(text.clone()),
            });
            if should_execute {
                state.set_phase(ControllerPhase::Busy);
                effects.push(Effect::RunHandler {
                    handler: state.handler.clone(),
                    text,
                });
                return;
            }
        }

        state.set_phase(ControllerPhase::Live);
        effects.push(Effect::Render {
            in_place: false,
            prompt: state.prompt.clone(),
            line: RenderedLine::Editable(state.line.clone()),
        });
    }

    /// Runs the handler in a spawned task, then enters the input phase again no matter
    /// how the handler finished.
    fn spawn_handler(&self, handler: LineHandler, text: String) {
        let this = self.clone();
        spawn(async move {
            tracing::debug!(message = "Running line handler", ?text);
            match spawn(async move { handler(text).await }).await {
                Ok(Ok(())) => {}
                Ok(Err(report)) => {
                    tracing::error!(
                        message = "Line handler returned an error",
                        error = ?report
                    );
                }
                Err(join_error) => {
                    tracing::error!(
                        message = "Line handler panicked",
                        error = %join_error
                    );
                }
            }
            this.transition(ControllerState::enter_input_phase);
        });
    }

    /// Waits for the output to flush in a spawned task, then finishes entering the
    /// input phase.
    fn spawn_settle(&self) {
        let flushed = self.inner.write_queue.flush();
        let this = self.clone();
        spawn(async move {
            flushed.await;
            this.transition(|state, effects| {
                this.finish_entering_input_phase(state, effects);
            });
        });
    }
}

/// What a transition decided to do, applied after the state lock is released.
enum Effect {
    Write(String),
    Render {
        /// Redraw over the prompt line on screen, or start at the cursor.
        in_place: bool,
        prompt: Prompt,
        line: RenderedLine,
    },
    RunHandler {
        handler: LineHandler,
        text: String,
    },
    /// Wait for output to flush, then finish entering the input phase.
    Settle,
}

/// Owned copy of what [`RenderBody`] borrows.
enum RenderedLine {
    Editable(LineBuffer),
    Finalized(String),
}

fn redraw_editable(state: &ControllerState) -> Effect {
    Effect::Render {
        in_place: true,
        prompt: state.prompt.clone(),
        line: RenderedLine::Editable(state.line.clone()),
    }
}

fn noop_line_handler() -> LineHandler {
    Arc::new(|_line: String| -> BoxFuture<'static, CommonResult<()>> {
        async { ok!() }.boxed()
    })
}

fn apply_escape_sequence(state: &mut ControllerState, sequence: crate::EscapeSequence) {
    use crate::EscapeSequence as Seq;
    match sequence {
        Seq::HistoryPrevious => {
            if let Some(value) = state.history.get_previous(state.line.text()) {
                state.line.replace(value);
            }
        }
        Seq::HistoryNext => {
            if let Some(value) = state.history.get_next(state.line.text()) {
                state.line.replace(value);
            }
        }
        Seq::CursorLeft => {
            state.line.move_left();
        }
        Seq::CursorRight => {
            state.line.move_right();
        }
        Seq::DeleteForward => {
            state.line.delete_forward();
        }
    }
}
