// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ADMIN_ROLE: &str = "admin";

/// A user as persisted in the users collection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2id PHC string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub enable_api_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Hex SHA-256 of `api_key`, used for lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_index: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|role| role == ADMIN_ROLE)
    }

    pub fn view(&self) -> UserView {
        UserView {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            roles: self.roles.clone(),
            enable_api_key: self.enable_api_key,
            api_key: self.api_key.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// API representation of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
    #[serde(rename = "enableAPIKey")]
    pub enable_api_key: bool,
    #[serde(rename = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Body of a user create request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    #[serde(default, rename = "enableAPIKey")]
    pub enable_api_key: bool,
}

/// Body of a user update request. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    #[serde(default, rename = "enableAPIKey")]
    pub enable_api_key: Option<bool>,
}

// Layout of the users file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UsersData {
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Clone)]
pub enum IamError {
    UserNotFound(String),
    ConfigurationError(String),
    FileError(String),
    ParseError(String),
}

impl std::fmt::Display for IamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IamError::UserNotFound(id) => write!(f, "User not found: {}", id),
            IamError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            IamError::FileError(msg) => write!(f, "File error: {}", msg),
            IamError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for IamError {}
