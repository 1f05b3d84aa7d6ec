// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::jwt::JwtService;
use super::password::{
    PasswordError, api_key_index, generate_api_key, hash_password, verify_password,
};
use super::store::{FileUserStore, MemoryUserStore, UserStore};
use super::types::{ADMIN_ROLE, IamError, NewUser, User, UserPatch, UsersData};
use crate::config::AuthConfig;
use crate::runtime_paths::RuntimePaths;
use chrono::Utc;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// User directory, password checks and session tokens.
pub struct UserServices {
    store: Arc<dyn UserStore>,
    users: RwLock<UsersData>,
    jwt_service: JwtService,
    dummy_stored_hash: String,
}

pub type UserServiceResult<T> = Result<T, UserServiceError>;

#[derive(Debug)]
pub enum UserServiceError {
    Validation(String),
    Conflict(String),
    Forbidden(String),
    Iam(IamError),
    Password(PasswordError),
}

impl fmt::Display for UserServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserServiceError::Validation(message) => write!(f, "{}", message),
            UserServiceError::Conflict(message) => write!(f, "{}", message),
            UserServiceError::Forbidden(message) => write!(f, "{}", message),
            UserServiceError::Iam(err) => write!(f, "{}", err),
            UserServiceError::Password(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for UserServiceError {}

impl From<PasswordError> for UserServiceError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooShort => UserServiceError::Validation(err.to_string()),
            other => UserServiceError::Password(other),
        }
    }
}

impl From<IamError> for UserServiceError {
    fn from(err: IamError) -> Self {
        UserServiceError::Iam(err)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> UserServiceResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(UserServiceError::Validation(
            "A valid email address is required".to_string(),
        ))
    }
}

fn set_api_key_enabled(user: &mut User, enabled: bool) {
    if enabled && !user.enable_api_key {
        let key = user.api_key.clone().unwrap_or_else(generate_api_key);
        user.api_key_index = Some(api_key_index(&key));
        user.api_key = Some(key);
    } else if !enabled {
        user.api_key = None;
        user.api_key_index = None;
    }
    user.enable_api_key = enabled;
}

impl UserServices {
    /// File-backed when the runtime has a data directory, in memory otherwise.
    pub fn from_runtime(paths: &RuntimePaths, auth: &AuthConfig) -> UserServiceResult<Self> {
        let store: Arc<dyn UserStore> = match paths.users_file.as_ref() {
            Some(users_file) => Arc::new(FileUserStore::new(users_file.clone())?),
            None => Arc::new(MemoryUserStore::default()),
        };
        Self::new_with_store(store, auth)
    }

    pub fn new_with_store(store: Arc<dyn UserStore>, auth: &AuthConfig) -> UserServiceResult<Self> {
        let users = store.load()?;
        log::info!("Loaded {} user(s)", users.users.len());
        let dummy_stored_hash = hash_password("dummy-password-for-timing")?;
        Ok(UserServices {
            store,
            users: RwLock::new(users),
            jwt_service: JwtService::new(auth),
            dummy_stored_hash,
        })
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    fn read(&self) -> RwLockReadGuard<'_, UsersData> {
        match self.users.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::error!("User directory lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, UsersData> {
        match self.users.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::error!("User directory lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Applies `mutation` to a copy and keeps it only once the store has saved it.
    fn mutate<T, F>(&self, mutation: F) -> UserServiceResult<T>
    where
        F: FnOnce(&mut UsersData) -> UserServiceResult<(T, bool)>,
    {
        let mut guard = self.write();
        let mut next = UsersData::clone(&guard);
        let (result, changed) = mutation(&mut next)?;
        if changed {
            self.store.save(&next)?;
            *guard = next;
        }
        Ok(result)
    }

    pub fn has_users(&self) -> bool {
        !self.read().users.is_empty()
    }

    pub fn list_users(&self) -> Vec<User> {
        self.read().users.clone()
    }

    pub fn get_user(&self, id: &str) -> Option<User> {
        self.read().users.iter().find(|user| user.id == id).cloned()
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let email = normalize_email(email);
        self.read()
            .users
            .iter()
            .find(|user| user.email == email)
            .cloned()
    }

    /// Checks credentials. Unknown users are verified against a dummy hash so
    /// both paths cost the same.
    pub fn authenticate(&self, email: &str, password: &str) -> UserServiceResult<Option<User>> {
        let user = self.find_by_email(email);
        let stored_hash = match user.as_ref().and_then(|user| user.password_hash.as_deref()) {
            Some(hash) => hash,
            None => {
                if let Some(user) = user.as_ref() {
                    log::warn!("User {} has no password set", user.email);
                }
                self.dummy_stored_hash.as_str()
            }
        };
        let valid = verify_password(password, stored_hash)?;
        Ok(user.filter(|user| valid && user.password_hash.is_some()))
    }

    /// The user behind a session token, if the token is valid and the user
    /// still exists.
    pub fn validate_jwt(&self, token: &str) -> Option<User> {
        let claims = self.jwt_service.verify_token(token).ok()?;
        let user = self.get_user(&claims.sub);
        if user.is_none() {
            log::debug!("JWT for unknown user {}", claims.sub);
        }
        user
    }

    /// The user owning `api_key`, if that user has API keys enabled.
    pub fn find_by_api_key(&self, api_key: &str) -> Option<User> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return None;
        }
        let index = api_key_index(api_key);
        self.read()
            .users
            .iter()
            .find(|user| user.enable_api_key && user.api_key_index.as_deref() == Some(&index))
            .cloned()
    }

    /// Creates a user. The very first user always gets the admin role.
    ///
    /// Unauthenticated callers may only create the first account and cannot
    /// choose its roles. The check runs under the write lock.
    pub fn create_user(&self, input: NewUser, authenticated: bool) -> UserServiceResult<User> {
        let name = input.name.trim().to_string();
        let email = normalize_email(&input.email);
        validate_email(&email)?;
        let password_hash = hash_password(&input.password)?;

        self.mutate(|data| {
            if !authenticated && !data.users.is_empty() {
                return Err(UserServiceError::Forbidden(
                    "Sign-up is closed once the first user exists".to_string(),
                ));
            }
            if data.users.iter().any(|user| user.email == email) {
                return Err(UserServiceError::Conflict(
                    "A user with this email already exists".to_string(),
                ));
            }
            let mut roles = if authenticated {
                input.roles.unwrap_or_default()
            } else {
                Vec::new()
            };
            if data.users.is_empty() && !roles.iter().any(|role| role == ADMIN_ROLE) {
                roles.push(ADMIN_ROLE.to_string());
            }
            let now = Utc::now();
            let mut user = User {
                id: Uuid::new_v4().to_string(),
                name: if name.is_empty() { email.clone() } else { name },
                email,
                password_hash: Some(password_hash),
                roles,
                enable_api_key: false,
                api_key: None,
                api_key_index: None,
                created_at: now,
                updated_at: now,
            };
            set_api_key_enabled(&mut user, input.enable_api_key);
            data.users.push(user.clone());
            log::info!("👤 Created user {}", user.email);
            Ok((user, true))
        })
    }

    /// Partial update. `Ok(None)` when no user has this id.
    pub fn update_user(&self, id: &str, patch: UserPatch) -> UserServiceResult<Option<User>> {
        let email = match patch.email.as_deref() {
            Some(email) => {
                let email = normalize_email(email);
                validate_email(&email)?;
                Some(email)
            }
            None => None,
        };
        let password_hash = patch.password.as_deref().map(hash_password).transpose()?;

        self.mutate(|data| {
            if let Some(email) = email.as_ref()
                && data
                    .users
                    .iter()
                    .any(|user| user.id != id && &user.email == email)
            {
                return Err(UserServiceError::Conflict(
                    "A user with this email already exists".to_string(),
                ));
            }
            let Some(user) = data.users.iter_mut().find(|user| user.id == id) else {
                return Ok((None, false));
            };
            if let Some(name) = patch.name.map(|name| name.trim().to_string())
                && !name.is_empty()
            {
                user.name = name;
            }
            if let Some(email) = email {
                user.email = email;
            }
            if let Some(hash) = password_hash {
                user.password_hash = Some(hash);
            }
            if let Some(roles) = patch.roles {
                user.roles = roles;
            }
            if let Some(enabled) = patch.enable_api_key {
                set_api_key_enabled(user, enabled);
            }
            user.updated_at = Utc::now();
            Ok((Some(user.clone()), true))
        })
    }

    /// `Ok(None)` when no user has this id.
    pub fn delete_user(&self, id: &str) -> UserServiceResult<Option<User>> {
        self.mutate(|data| {
            let Some(index) = data.users.iter().position(|user| user.id == id) else {
                return Ok((None, false));
            };
            let removed = data.users.remove(index);
            log::info!("👤 Deleted user {}", removed.email);
            Ok((Some(removed), true))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_config::test_config;

    const VALID_PASSWORD: &str = "correct-password";

    fn build_user_services() -> UserServices {
        UserServices::new_with_store(Arc::new(MemoryUserStore::default()), &test_config().auth)
            .expect("user services")
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Editor".to_string(),
            email: email.to_string(),
            password: VALID_PASSWORD.to_string(),
            roles: None,
            enable_api_key: false,
        }
    }

    #[test]
    fn first_user_becomes_admin() {
        let services = build_user_services();
        let first = services.create_user(new_user("first@example.com"), true).unwrap();
        let second = services.create_user(new_user("second@example.com"), true).unwrap();
        assert!(first.is_admin());
        assert!(!second.is_admin());
    }

    #[test]
    fn anonymous_sign_up_closes_after_first_user() {
        let services = build_user_services();
        let mut first = new_user("first@example.com");
        first.roles = Some(vec![ADMIN_ROLE.to_string(), "editor".to_string()]);
        let first = services.create_user(first, false).unwrap();
        assert_eq!(first.roles, vec![ADMIN_ROLE.to_string()]);

        let mut late = new_user("late@example.com");
        late.roles = Some(vec![ADMIN_ROLE.to_string()]);
        assert!(matches!(
            services.create_user(late, false),
            Err(UserServiceError::Forbidden(_))
        ));
        assert_eq!(services.list_users().len(), 1);

        let invited = services.create_user(new_user("invited@example.com"), true).unwrap();
        assert!(!invited.is_admin());
    }

    #[test]
    fn email_is_unique_ignoring_case() {
        let services = build_user_services();
        services.create_user(new_user("Editor@Example.com"), true).unwrap();
        let duplicate = services.create_user(new_user("editor@example.COM"), true);
        assert!(matches!(duplicate, Err(UserServiceError::Conflict(_))));
    }

    #[test]
    fn invalid_email_and_short_password_are_rejected() {
        let services = build_user_services();
        assert!(matches!(
            services.create_user(new_user("not-an-email"), true),
            Err(UserServiceError::Validation(_))
        ));
        let mut short = new_user("a@example.com");
        short.password = "short".to_string();
        assert!(matches!(
            services.create_user(short, true),
            Err(UserServiceError::Validation(_))
        ));
    }

    #[test]
    fn authenticate_checks_password() {
        let services = build_user_services();
        services.create_user(new_user("editor@example.com"), true).unwrap();

        let ok = services
            .authenticate("EDITOR@example.com", VALID_PASSWORD)
            .unwrap();
        assert!(ok.is_some());
        assert!(
            services
                .authenticate("editor@example.com", "wrong-password")
                .unwrap()
                .is_none()
        );
        assert!(
            services
                .authenticate("nobody@example.com", VALID_PASSWORD)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn validate_jwt_requires_existing_user() {
        let services = build_user_services();
        let user = services.create_user(new_user("editor@example.com"), true).unwrap();
        let (token, _) = services.jwt_service().create_token(&user).unwrap();

        assert_eq!(services.validate_jwt(&token).map(|u| u.id), Some(user.id.clone()));
        services.delete_user(&user.id).unwrap();
        assert!(services.validate_jwt(&token).is_none());
    }

    #[test]
    fn enabling_api_key_materializes_and_disabling_clears() {
        let services = build_user_services();
        let user = services.create_user(new_user("bot@example.com"), true).unwrap();
        assert!(user.api_key.is_none());

        let enabled = services
            .update_user(
                &user.id,
                UserPatch {
                    enable_api_key: Some(true),
                    ..UserPatch::default()
                },
            )
            .unwrap()
            .unwrap();
        let key = enabled.api_key.clone().expect("key generated");
        assert_eq!(enabled.api_key_index, Some(api_key_index(&key)));
        assert_eq!(
            services.find_by_api_key(&key).map(|u| u.id),
            Some(user.id.clone())
        );

        let disabled = services
            .update_user(
                &user.id,
                UserPatch {
                    enable_api_key: Some(false),
                    ..UserPatch::default()
                },
            )
            .unwrap()
            .unwrap();
        assert!(disabled.api_key.is_none());
        assert!(disabled.api_key_index.is_none());
        assert!(services.find_by_api_key(&key).is_none());
    }

    #[test]
    fn keeping_api_key_enabled_keeps_the_key() {
        let services = build_user_services();
        let mut input = new_user("bot@example.com");
        input.enable_api_key = true;
        let user = services.create_user(input, true).unwrap();

        let updated = services
            .update_user(
                &user.id,
                UserPatch {
                    enable_api_key: Some(true),
                    name: Some("Renamed".to_string()),
                    ..UserPatch::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.api_key, user.api_key);
        assert_eq!(updated.name, "Renamed");
    }

    #[test]
    fn update_and_delete_unknown_user_are_none() {
        let services = build_user_services();
        assert!(
            services
                .update_user("missing", UserPatch::default())
                .unwrap()
                .is_none()
        );
        assert!(services.delete_user("missing").unwrap().is_none());
    }
}
