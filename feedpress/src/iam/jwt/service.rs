// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::types::{Claims, JwtError};
use crate::config::AuthConfig;
use crate::iam::User;
use actix_web::cookie::time::{Duration as CookieDuration, OffsetDateTime};
use actix_web::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

/// Prefix of the `Authorization` header carrying a session token.
pub const JWT_AUTH_SCHEME: &str = "JWT";

pub struct JwtService {
    secret: String,
    issuer: String,
    audience: String,
    expiration_hours: u64,
    cookie_name: String,
    secure_cookies: bool,
}

impl JwtService {
    pub fn new(auth: &AuthConfig) -> Self {
        JwtService {
            secret: auth.secret.clone(),
            issuer: auth.issuer.clone(),
            audience: auth.audience.clone(),
            expiration_hours: auth.expiration_hours,
            cookie_name: auth.cookie_name.clone(),
            secure_cookies: auth.secure_cookies,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Returns the signed token and its expiry as a unix timestamp.
    pub fn create_token(&self, user: &User) -> Result<(String, i64), JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::hours(self.expiration_hours as i64);

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            roles: user.roles.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| JwtError::Creation(e.to_string()))?;

        Ok((token, claims.exp))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| JwtError::Verification(e.to_string()))
    }

    /// HTTP-only cookie carrying the session token.
    pub fn create_auth_cookie<'a>(&self, token: &str, exp: i64) -> Cookie<'a> {
        let expires = match OffsetDateTime::from_unix_timestamp(exp) {
            Ok(value) => value,
            Err(e) => {
                log::error!(
                    "Failed to convert expiration timestamp for auth cookie: {}",
                    e
                );
                OffsetDateTime::UNIX_EPOCH
            }
        };

        Cookie::build(self.cookie_name.clone(), token.to_string())
            .path("/")
            .secure(self.secure_cookies)
            .http_only(true)
            .same_site(SameSite::Lax)
            .expires(expires)
            .finish()
    }

    /// Expired, empty cookie that clears the session.
    pub fn create_logout_cookie<'a>(&self) -> Cookie<'a> {
        Cookie::build(self.cookie_name.clone(), "")
            .path("/")
            .secure(self.secure_cookies)
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::seconds(0))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .finish()
    }
}
