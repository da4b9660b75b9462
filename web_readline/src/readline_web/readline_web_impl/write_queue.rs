// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::TerminalEmulator;
use futures_util::{FutureExt, future::BoxFuture};
use std::{future::IntoFuture, sync::Arc};
use tokio::{spawn, sync::{mpsc, oneshot}, task::JoinHandle};

/// One queued write, and who to tell when the emulator is done with it.
#[derive(Debug)]
pub struct WriteRequest {
    pub data: String,
    pub done_sender: oneshot::Sender<()>,
}

/// FIFO of writes to the emulator.
///
/// A single spawned task owns the receiver and awaits each
/// [`TerminalEmulator::write`] before starting the next one, so writes land in the
/// order they were enqueued. Enqueueing is synchronous and never blocks, which lets the
/// controller enqueue output while it holds its state lock.
///
/// The task exits when every [`WriteQueue`] clone is dropped.
#[derive(Debug, Clone)]
pub struct WriteQueue {
    sender: mpsc::UnboundedSender<WriteRequest>,
}

/// Resolves once the write it was returned for (and so everything enqueued before it)
/// has been processed by the emulator. Await it directly, or drop it to fire and
/// forget.
#[derive(Debug)]
pub struct WriteCompletion {
    done_receiver: oneshot::Receiver<()>,
}

impl WriteCompletion {
    /// If the queue task is gone, this resolves immediately.
    pub async fn flushed(self) { self.done_receiver.await.ok(); }
}

impl IntoFuture for WriteCompletion {
    type Output = ();
    type IntoFuture = BoxFuture<'static, ()>;

    fn into_future(self) -> Self::IntoFuture { self.flushed().boxed() }
}

impl WriteQueue {
    /// Must be called from inside a tokio runtime.
    pub fn spawn<E: TerminalEmulator>(emulator: Arc<E>) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let join_handle = spawn_task_to_drain_write_queue(emulator, receiver);
        (Self { sender }, join_handle)
    }

    pub fn enqueue(&self, data: impl Into<String>) -> WriteCompletion {
        let (done_sender, done_receiver) = oneshot::channel();
        let request = WriteRequest {
            data: data.into(),
            done_sender,
        };
        if let Err(error) = self.sender.send(request) {
            // The request (and its sender) is dropped here, so the completion resolves.
            tracing::warn!(
                message = "Write queue is closed, dropping write",
                data = ?error.0.data
            );
        }
        WriteCompletion { done_receiver }
    }

    /// Resolves when everything enqueued so far has been processed.
    pub fn flush(&self) -> WriteCompletion { self.enqueue(String::new()) }
}

fn spawn_task_to_drain_write_queue<E: TerminalEmulator>(
    /* Move */ emulator: Arc<E>,
    /* Move */ mut receiver: mpsc::UnboundedReceiver<WriteRequest>,
) -> JoinHandle<()> {
    spawn(async move {
        while let Some(WriteRequest { data, done_sender }) = receiver.recv().await {
            if !data.is_empty() {
                emulator.write(data).await;
            }
            // The caller may not care about completion.
            done_sender.send(()).ok();
        }
        tracing::debug!(message = "Write queue closed");
    })
}
