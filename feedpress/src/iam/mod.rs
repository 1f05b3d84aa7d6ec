// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod access;
pub mod jwt;
pub mod middleware;
mod password;
mod store;
pub(crate) mod types;
mod user_services;

pub use access::{authorize_delete, authorize_request, bearer_token};
pub use middleware::{API_KEY_AUTH_PREFIX, AuthMiddlewareFactory, AuthRequest};
pub use password::{PasswordError, api_key_index, generate_api_key, hash_password};
pub use store::{FileUserStore, MemoryUserStore, UserStore};
pub use types::{ADMIN_ROLE, IamError, NewUser, User, UserPatch, UserView, UsersData};
pub use user_services::{UserServiceError, UserServiceResult, UserServices};
