// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`HistoryStorage`] backed by an embedded key/value store on disk, using the [kv]
//! crate. This is what a native build (or a test harness) uses in place of the
//! browser's `localStorage`.
//!
//! - One [Store] folder holds one bucket. The bucket maps the history key to the JSON
//!   encoded history, both as plain strings.
//! - Every [`HistoryStorage::set_item`] is flushed to disk before returning, since the
//!   history is only written when a line is accepted.
//!
//! The [kv] crate wraps [sled](https://github.com/spacejam/sled), which is not multi
//! process safe. Use one store folder per running controller.

use crate::{CommonResult, HistoryStorage, ReadlineWebError, ok};
use kv::{Config, Store};
use kv_error::KvErrorCouldNot;
use miette::{Context, IntoDiagnostic};
use std::fmt::{Debug, Formatter};

/// The bucket stores the following key/value pairs.
/// - Key: the history key, eg: `"history"`.
/// - Value: the JSON array of history entries, eg: `["ls","pwd"]`.
pub type HistoryBucket = kv::Bucket<'static, String, String>;

pub const DEFAULT_HISTORY_BUCKET_NAME: &str = "web_readline_history";

pub struct KvHistoryStorage {
    pub db_folder_path: String,
    pub bucket_name: String,
    store: Store,
    bucket: HistoryBucket,
}

impl Debug for KvHistoryStorage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvHistoryStorage")
            .field("db_folder_path", &self.db_folder_path)
            .field("bucket_name", &self.bucket_name)
            .field("buckets", &self.store.buckets())
            .finish_non_exhaustive()
    }
}

impl KvHistoryStorage {
    /// Create the db folder if it doesn't exist. Otherwise load it from the folder on
    /// disk. The bucket is named [`DEFAULT_HISTORY_BUCKET_NAME`] unless one is given.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database folder cannot be created
    /// - The store cannot be opened due to I/O errors or permission issues
    /// - The database is locked by another process
    #[tracing::instrument]
    pub fn try_new(
        db_folder_path: &str,
        maybe_bucket_name: Option<&str>,
    ) -> Result<Self, ReadlineWebError> {
        let bucket_name = maybe_bucket_name
            .unwrap_or(DEFAULT_HISTORY_BUCKET_NAME)
            .to_string();

        let store = Store::new(Config::new(db_folder_path)).map_err(|source| {
            ReadlineWebError::Storage {
                db_folder_path: db_folder_path.to_string(),
                source,
            }
        })?;

        let bucket: HistoryBucket =
            store
                .bucket(Some(&bucket_name))
                .map_err(|source| ReadlineWebError::Storage {
                    db_folder_path: db_folder_path.to_string(),
                    source,
                })?;

        // % is Display, ? is Debug.
        tracing::debug!(
            message = "📑 load or create history store",
            db_folder_path = %db_folder_path,
            bucket_name = %bucket_name
        );

        Ok(Self {
            db_folder_path: db_folder_path.to_string(),
            bucket_name,
            store,
            bucket,
        })
    }
}

impl HistoryStorage for KvHistoryStorage {
    #[tracing::instrument(skip(self))]
    fn get_item(&self, key: &str) -> CommonResult<Option<String>> {
        let it = self
            .bucket
            .get(&key.to_string())
            .into_diagnostic()
            .wrap_err(KvErrorCouldNot::LoadKeyValuePairFromBucket)?;

        // % is Display, ? is Debug.
        tracing::debug!(
            message = "🔼 Load key / value pair from bucket",
            key = %key,
            value = ?it
        );

        ok!(it)
    }

    #[tracing::instrument(skip(self, value))]
    fn set_item(&self, key: &str, value: &str) -> CommonResult<()> {
        self.bucket
            .set(&key.to_string(), &value.to_string())
            .into_diagnostic()
            .wrap_err(KvErrorCouldNot::SaveKeyValuePairToBucket)?;

        self.bucket
            .flush()
            .into_diagnostic()
            .wrap_err(KvErrorCouldNot::FlushBucket)?;

        // % is Display, ? is Debug.
        tracing::debug!(
            message = "🔽 Save key / value pair to bucket",
            key = %key,
            value = %value
        );

        ok!()
    }
}

pub mod kv_error {
    #[derive(thiserror::Error, Debug, miette::Diagnostic)]
    pub enum KvErrorCouldNot {
        #[error("🔽 Could not save key/value pair to bucket")]
        SaveKeyValuePairToBucket,

        #[error("🔼 Could not load key/value pair from bucket")]
        LoadKeyValuePairFromBucket,

        #[error("💾 Could not flush bucket to disk")]
        FlushBucket,
    }
}
