// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::{ConfigError, DatabaseTarget, ValidatedConfig};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RuntimePaths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    /// `None` when collections live in memory.
    pub data_dir: Option<PathBuf>,
    pub posts_file: Option<PathBuf>,
    pub users_file: Option<PathBuf>,
}

impl RuntimePaths {
    /// Canonicalizes the runtime root and makes sure the data directory
    /// exists and is writable.
    pub fn from_root(root: &Path, config: &ValidatedConfig) -> Result<Self, ConfigError> {
        let root_path = if root.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            root.to_path_buf()
        };

        let root_canonical = root_path.canonicalize().map_err(|e| {
            ConfigError::ValidationError(format!(
                "Failed to canonicalize runtime root '{}': {}",
                root_path.display(),
                e
            ))
        })?;

        let data_dir = match &config.database {
            DatabaseTarget::Memory => None,
            DatabaseTarget::Directory(dir) => {
                ensure_dir_exists(dir)?;
                Some(dir.canonicalize().map_err(|e| {
                    ConfigError::ValidationError(format!(
                        "Failed to canonicalize data directory '{}': {}",
                        dir.display(),
                        e
                    ))
                })?)
            }
        };

        Ok(Self {
            config_file: root_canonical.join("config.yaml"),
            root: root_canonical,
            posts_file: data_dir.as_ref().map(|dir| dir.join("posts.yaml")),
            users_file: data_dir.as_ref().map(|dir| dir.join("users.yaml")),
            data_dir,
        })
    }
}

fn ensure_dir_exists(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            ConfigError::ValidationError(format!(
                "Failed to create directory '{}': {}",
                path.display(),
                e
            ))
        })?;
    }
    ensure_dir_writable(path)
}

fn ensure_dir_writable(path: &Path) -> Result<(), ConfigError> {
    if !path.is_dir() {
        return Err(ConfigError::ValidationError(format!(
            "Data directory is not a directory: {}",
            path.display()
        )));
    }

    let probe_path = path.join(format!(".feedpress-write-check-{}", Uuid::new_v4()));
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&probe_path)
        .map_err(|err| {
            ConfigError::ValidationError(format!(
                "Data directory must be writable ({}): {}",
                path.display(),
                err
            ))
        })?;
    fs::remove_file(&probe_path).map_err(|err| {
        ConfigError::ValidationError(format!(
            "Unable to clean probe file {}: {}",
            probe_path.display(),
            err
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::util::test_fixtures::TestFixtureRoot;

    #[test]
    fn file_database_creates_data_dir() {
        let fixture = TestFixtureRoot::new_unique("runtime-paths").unwrap();
        fixture.write_config("").unwrap();
        let config = Config::load(fixture.path())
            .unwrap()
            .validate(fixture.path())
            .unwrap();

        let paths = RuntimePaths::from_root(fixture.path(), &config).unwrap();

        assert!(fixture.data_dir().is_dir());
        assert_eq!(
            paths.posts_file.as_deref().and_then(|p| p.file_name()),
            Some(std::ffi::OsStr::new("posts.yaml"))
        );
    }

    #[test]
    fn memory_database_has_no_data_files() {
        let fixture = TestFixtureRoot::new_unique("runtime-paths-mem").unwrap();
        fixture.write_config("").unwrap();
        let mut config = Config::load(fixture.path()).unwrap();
        config.database.uri = "memory:".to_string();
        let config = config.validate(fixture.path()).unwrap();

        let paths = RuntimePaths::from_root(fixture.path(), &config).unwrap();

        assert!(paths.data_dir.is_none());
        assert!(paths.users_file.is_none());
        assert!(!fixture.data_dir().exists());
    }
}
