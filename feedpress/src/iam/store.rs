// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::types::{IamError, UsersData};
use crate::util::atomic_file::write_atomic;
use std::path::PathBuf;
use std::sync::RwLock;

pub trait UserStore: Send + Sync {
    fn load(&self) -> Result<UsersData, IamError>;
    fn save(&self, users: &UsersData) -> Result<(), IamError>;
}

pub struct FileUserStore {
    users_file: PathBuf,
}

impl FileUserStore {
    pub fn new(users_file: PathBuf) -> Result<Self, IamError> {
        if users_file.as_os_str().is_empty() {
            return Err(IamError::ConfigurationError(
                "Users file path is empty".to_string(),
            ));
        }

        Ok(Self { users_file })
    }
}

impl UserStore for FileUserStore {
    fn load(&self) -> Result<UsersData, IamError> {
        if !self.users_file.exists() {
            return Ok(UsersData::default());
        }
        let content = std::fs::read_to_string(&self.users_file)
            .map_err(|e| IamError::FileError(format!("Failed to read users file: {}", e)))?;
        if content.trim().is_empty() {
            return Ok(UsersData::default());
        }
        serde_yaml::from_str(&content)
            .map_err(|e| IamError::ParseError(format!("Failed to parse users file: {}", e)))
    }

    fn save(&self, users: &UsersData) -> Result<(), IamError> {
        let content = serde_yaml::to_string(users)
            .map_err(|e| IamError::ParseError(format!("Failed to serialize users: {}", e)))?;
        write_atomic(&self.users_file, content.as_bytes())
            .map_err(|e| IamError::FileError(format!("Failed to write users file: {}", e)))
    }
}

/// Users held only for the lifetime of the process.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<UsersData>,
}

impl MemoryUserStore {
    pub fn new(users: UsersData) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }
}

impl UserStore for MemoryUserStore {
    fn load(&self) -> Result<UsersData, IamError> {
        let users = match self.users.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::error!("Memory user store lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        Ok(users.clone())
    }

    fn save(&self, users: &UsersData) -> Result<(), IamError> {
        let mut guard = match self.users.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::error!("Memory user store lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        *guard = users.clone();
        Ok(())
    }
}
