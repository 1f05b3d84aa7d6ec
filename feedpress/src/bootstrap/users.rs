// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action, log_warning};
use crate::config::{DatabaseTarget, ValidatedConfig};
use crate::iam::{ADMIN_ROLE, NewUser, UserServices};
use argon2::password_hash::rand_core::{OsRng, RngCore};

const ADMIN_NAME: &str = "Administrator";
const ADMIN_PASSWORD_LENGTH: usize = 16;
const PASSWORD_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Seeds `auth.admin_email` with a random password when no users exist.
pub fn ensure_admin(
    user_services: &UserServices,
    config: &ValidatedConfig,
) -> Result<bool, BootstrapError> {
    let Some(email) = config
        .auth
        .admin_email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
    else {
        return Ok(false);
    };
    if user_services.has_users() {
        return Ok(false);
    }

    let password = generate_password();
    let admin = user_services.create_user(
        NewUser {
            name: ADMIN_NAME.to_string(),
            email: email.to_string(),
            password: password.clone(),
            roles: Some(vec![ADMIN_ROLE.to_string()]),
            enable_api_key: false,
        },
        true,
    )?;

    log_action(format!("created administrator {}", admin.email));
    log_warning(format!(
        "{} password: {} (change this immediately)",
        admin.email, password
    ));
    if config.database == DatabaseTarget::Memory {
        log_warning("users are kept in memory and will be lost on restart");
    }

    Ok(true)
}

fn generate_password() -> String {
    let mut bytes = [0u8; ADMIN_PASSWORD_LENGTH];
    OsRng.fill_bytes(&mut bytes);

    bytes
        .iter()
        .map(|byte| PASSWORD_CHARS[(*byte as usize) % PASSWORD_CHARS.len()] as char)
        .collect()
}
