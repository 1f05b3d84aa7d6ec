// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::{Config, ConfigError, ValidatedConfig};
use crate::iam::{UserServiceError, UserServices};
use crate::runtime_paths::RuntimePaths;
use std::error::Error;
use std::fmt;
use std::path::Path;

pub mod config;
pub mod users;

pub struct BootstrapResult {
    pub validated_config: ValidatedConfig,
    pub runtime_paths: RuntimePaths,
    pub user_services: UserServices,
    pub created_config: bool,
    pub created_admin: bool,
}

#[derive(Debug)]
pub enum BootstrapError {
    Config(ConfigError),
    Users(UserServiceError),
    Io(std::io::Error),
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::Config(err) => write!(f, "{}", err),
            BootstrapError::Users(err) => write!(f, "Bootstrap user error: {}", err),
            BootstrapError::Io(err) => write!(f, "Bootstrap I/O error: {}", err),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BootstrapError::Config(err) => Some(err),
            BootstrapError::Users(err) => Some(err),
            BootstrapError::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for BootstrapError {
    fn from(err: ConfigError) -> Self {
        BootstrapError::Config(err)
    }
}

impl From<UserServiceError> for BootstrapError {
    fn from(err: UserServiceError) -> Self {
        BootstrapError::Users(err)
    }
}

impl From<std::io::Error> for BootstrapError {
    fn from(err: std::io::Error) -> Self {
        BootstrapError::Io(err)
    }
}

/// Prepares a runtime root: writes a default `config.yaml` when missing,
/// loads and validates it, creates the data directory and seeds the
/// configured admin account into an empty user directory.
pub fn bootstrap_runtime(root: &Path) -> Result<BootstrapResult, BootstrapError> {
    let created_config = config::ensure_config(root)?;

    let validated_config = Config::load_and_validate(root)?;

    let runtime_paths = RuntimePaths::from_root(root, &validated_config)?;

    let user_services = UserServices::from_runtime(&runtime_paths, &validated_config.auth)?;

    let created_admin = users::ensure_admin(&user_services, &validated_config)?;

    Ok(BootstrapResult {
        validated_config,
        runtime_paths,
        user_services,
        created_config,
        created_admin,
    })
}

pub(crate) fn log_action(message: impl AsRef<str>) {
    eprintln!("[bootstrap] {}", message.as_ref());
}

pub(crate) fn log_warning(message: impl AsRef<str>) {
    eprintln!("[bootstrap] WARNING: {}", message.as_ref());
}
