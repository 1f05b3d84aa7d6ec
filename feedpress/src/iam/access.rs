// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::HttpRequest;
use actix_web::http::header::AUTHORIZATION;

use super::AuthRequest;
use super::types::User;

/// Token from an `Authorization: Bearer <token>` header value. The scheme is
/// matched case-insensitively.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Whether a post may be deleted: any signed-in user may, and so may a
/// caller presenting the configured worker secret as a bearer token. A
/// missing or empty secret never matches.
pub fn authorize_delete(
    user: Option<&User>,
    authorization: Option<&str>,
    secret: Option<&str>,
) -> bool {
    if user.is_some() {
        return true;
    }
    let Some(secret) = secret.filter(|secret| !secret.is_empty()) else {
        return false;
    };
    authorization
        .and_then(bearer_token)
        .is_some_and(|token| token == secret)
}

/// [`authorize_delete`] against the user and `Authorization` header of `req`.
pub fn authorize_request(req: &HttpRequest, secret: Option<&str>) -> bool {
    let user = req.user_info();
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    authorize_delete(user.as_ref(), authorization, secret)
}
