// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CommonResult, StdMutex, ok};
use std::{collections::HashMap, fmt::Debug, sync::Arc};

/// A string key/value store, the shape of the browser's `localStorage`. History is
/// saved under one key as a JSON array of strings.
///
/// Both operations are synchronous. Callers treat every error as "storage is not
/// available right now" and carry on with in-memory history, so implementations should
/// report failures instead of panicking.
pub trait HistoryStorage: Debug + Send + Sync {
    /// Returns `Ok(None)` if nothing is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store can't be read.
    fn get_item(&self, key: &str) -> CommonResult<Option<String>>;

    /// # Errors
    ///
    /// Returns an error if the underlying store can't be written.
    fn set_item(&self, key: &str, value: &str) -> CommonResult<()>;
}

/// Keeps everything in a shared map. Clones point at the same map, so a test (or a
/// second controller) can observe what was persisted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryStorage {
    pub map: Arc<StdMutex<HashMap<String, String>>>,
}

impl InMemoryHistoryStorage {
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl HistoryStorage for InMemoryHistoryStorage {
    /// # Panics
    ///
    /// This will panic if the lock is poisoned.
    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    fn get_item(&self, key: &str) -> CommonResult<Option<String>> {
        ok!(self.map.lock().unwrap().get(key).cloned())
    }

    /// # Panics
    ///
    /// This will panic if the lock is poisoned.
    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    fn set_item(&self, key: &str, value: &str) -> CommonResult<()> {
        self.map
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        ok!()
    }
}
