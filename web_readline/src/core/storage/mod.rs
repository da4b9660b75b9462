// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod history_storage;
pub mod kv_history_storage;

// Re-export.
pub use history_storage::*;
pub use kv_history_storage::*;
