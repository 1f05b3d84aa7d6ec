// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::AUTHORIZATION;
use actix_web::web::Data;
use actix_web::{HttpMessage, HttpRequest};
use futures_util::future::{LocalBoxFuture, Ready, ok};
use std::rc::Rc;

use super::jwt::JWT_AUTH_SCHEME;
use super::types::User;
use crate::iam::user_services::UserServices;

/// `Authorization: users API-Key <key>`
pub const API_KEY_AUTH_PREFIX: &str = "users API-Key";

/// Access to the user attached by [`AuthMiddlewareFactory`].
pub trait AuthRequest {
    fn user_info(&self) -> Option<User>;
    fn is_authenticated(&self) -> bool;
}

impl AuthRequest for HttpRequest {
    fn user_info(&self) -> Option<User> {
        self.extensions().get::<User>().cloned()
    }

    fn is_authenticated(&self) -> bool {
        self.user_info().is_some()
    }
}

enum Credential {
    Token(String),
    ApiKey(String),
}

fn credential_from_header(value: &str) -> Option<Credential> {
    let value = value.trim();
    if let Some(rest) = value.strip_prefix(API_KEY_AUTH_PREFIX) {
        let key = rest.trim();
        return (!key.is_empty()).then(|| Credential::ApiKey(key.to_string()));
    }
    let (scheme, token) = value.split_once(char::is_whitespace)?;
    let token = token.trim();
    (scheme == JWT_AUTH_SCHEME && !token.is_empty()).then(|| Credential::Token(token.to_string()))
}

fn resolve_user(req: &ServiceRequest, user_services: &UserServices) -> Option<User> {
    let header_credential = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(credential_from_header);

    match header_credential {
        Some(Credential::ApiKey(key)) => {
            let user = user_services.find_by_api_key(&key);
            if user.is_none() {
                log::debug!("Rejected API key for {}", req.path());
            }
            user
        }
        Some(Credential::Token(token)) => user_services.validate_jwt(&token),
        None => req
            .cookie(user_services.jwt_service().cookie_name())
            .and_then(|cookie| user_services.validate_jwt(cookie.value())),
    }
}

/// Attaches the signed-in user, if any, to the request extensions. Never
/// rejects a request; handlers decide what an anonymous caller may do.
pub struct AuthMiddlewareFactory;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddleware {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let user_services = req.app_data::<Data<UserServices>>().cloned();
        let service = self.service.clone();

        Box::pin(async move {
            if let Some(user_services) = user_services
                && let Some(user) = resolve_user(&req, user_services.get_ref())
            {
                req.extensions_mut().insert(user);
            }
            service.call(req).await
        })
    }
}
