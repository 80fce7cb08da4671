// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

//! Process-wide configuration read from the environment.
//!
//! - `CVGATE_NUM_THREADS`: thread count handed to OpenCV on first use.
//! - `CVGATE_CASCADE_DIR`: directory searched for relative cascade model
//!   paths that do not exist relative to the working directory.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const NUM_THREADS_VAR: &str = "CVGATE_NUM_THREADS";
pub const CASCADE_DIR_VAR: &str = "CVGATE_CASCADE_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub num_threads: Option<i32>,
    pub cascade_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let num_threads = lookup(NUM_THREADS_VAR).and_then(|v| match v.trim().parse::<i32>() {
            Ok(n) => Some(n),
            Err(_) => {
                log::warn!("ignoring {NUM_THREADS_VAR}={v:?}: not an integer");
                None
            }
        });
        let cascade_dir = lookup(CASCADE_DIR_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            num_threads,
            cascade_dir,
        }
    }

    /// Resolves a model path. Paths that exist as given win; relative paths
    /// are then tried under the cascade directory.
    pub fn resolve_model_path(&self, path: &str) -> PathBuf {
        let given = Path::new(path);
        if given.exists() || given.is_absolute() {
            return given.to_path_buf();
        }
        match &self.cascade_dir {
            Some(dir) if dir.join(given).exists() => dir.join(given),
            _ => given.to_path_buf(),
        }
    }

    fn apply(&self) {
        if let Some(n) = self.num_threads {
            match opencv::core::set_num_threads(n) {
                Ok(()) => log::debug!("opencv thread count set to {n}"),
                Err(e) => log::warn!("failed to set opencv thread count to {n}: {e}"),
            }
        }
    }
}

/// Returns the process configuration, applying it on the first call.
pub fn global() -> &'static Config {
    static CONFIG: OnceLock<Config> = OnceLock::new();
    CONFIG.get_or_init(|| {
        let config = Config::from_env();
        config.apply();
        config
    })
}
