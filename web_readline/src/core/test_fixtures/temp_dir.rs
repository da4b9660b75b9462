// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::IntoDiagnostic;
use rand::Rng;
use std::path::{Path, PathBuf};

/// A temporary directory that is deleted when this struct is dropped.
#[derive(Debug)]
pub struct TempDir {
    pub path: PathBuf,
}

impl TempDir {
    pub fn try_new() -> miette::Result<Self> {
        let name: String = rand::rng()
            .sample_iter(&rand::distr::Alphanumeric)
            .take(12)
            .map(char::from)
            .collect();
        let path = std::env::temp_dir().join(format!("r3bl_web_readline_{name}"));
        std::fs::create_dir(&path).into_diagnostic()?;
        Ok(Self { path })
    }

    pub fn join(&self, path: impl AsRef<Path>) -> PathBuf { self.path.join(path) }
}

impl Drop for TempDir {
    fn drop(&mut self) { std::fs::remove_dir_all(&self.path).ok(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_is_removed_on_drop() {
        let temp_dir = TempDir::try_new().unwrap();
        let copy_of_path = temp_dir.path.clone();
        assert!(copy_of_path.exists());

        drop(temp_dir);
        assert!(!copy_of_path.exists());
    }
}
