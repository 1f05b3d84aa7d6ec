// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use super::response::{self, parse_usize};
use crate::config::ValidatedConfig;
use crate::content::paginate;
use crate::iam::{AuthRequest, NewUser, UserPatch, UserServices, UserView};

const LOGIN_FAILED_MESSAGE: &str = "The email or password provided is incorrect.";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
struct LoginResponse<'a> {
    message: &'a str,
    token: String,
    exp: i64,
    user: UserView,
}

#[derive(Serialize)]
struct MeResponse {
    user: Option<UserView>,
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    page: Option<String>,
    limit: Option<String>,
}

pub async fn login(
    user_services: web::Data<UserServices>,
    body: web::Json<LoginRequest>,
) -> HttpResponse {
    let user = match user_services.authenticate(&body.email, &body.password) {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!("Failed login for {}", body.email.trim());
            return response::message(StatusCode::UNAUTHORIZED, LOGIN_FAILED_MESSAGE);
        }
        Err(err) => return response::user_service_error("Login failed", &err),
    };

    let jwt_service = user_services.jwt_service();
    let (token, exp) = match jwt_service.create_token(&user) {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to issue session token for {}: {}", user.email, err);
            return response::internal_error();
        }
    };
    info!("🔑 {} logged in", user.email);

    HttpResponse::Ok()
        .cookie(jwt_service.create_auth_cookie(&token, exp))
        .json(LoginResponse {
            message: "Auth Passed",
            token,
            exp,
            user: user.view(),
        })
}

pub async fn logout(user_services: web::Data<UserServices>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(user_services.jwt_service().create_logout_cookie())
        .json(serde_json::json!({ "message": "You have been logged out successfully." }))
}

pub async fn me(req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        user: req.user_info().map(|user| user.view()),
    })
}

pub async fn list_users(
    req: HttpRequest,
    user_services: web::Data<UserServices>,
    config: web::Data<ValidatedConfig>,
    query: web::Query<UserListQuery>,
) -> HttpResponse {
    if !req.is_authenticated() {
        return response::forbidden();
    }
    let limit = config.content.resolve_limit(parse_usize(query.limit.as_deref()));
    let page = parse_usize(query.page.as_deref()).unwrap_or(1);
    let result = paginate(user_services.list_users(), page, limit).map(|user| user.view());
    HttpResponse::Ok().json(result)
}

/// Open while the directory is empty so the first account can be created;
/// after that only signed-in users may add accounts.
pub async fn create_user(
    req: HttpRequest,
    user_services: web::Data<UserServices>,
    body: web::Json<NewUser>,
) -> HttpResponse {
    match user_services.create_user(body.into_inner(), req.is_authenticated()) {
        Ok(user) => response::doc(StatusCode::CREATED, "User successfully created.", user.view()),
        Err(err) => response::user_service_error("Failed to create user", &err),
    }
}

pub async fn get_user(
    req: HttpRequest,
    user_services: web::Data<UserServices>,
    id: web::Path<String>,
) -> HttpResponse {
    if !req.is_authenticated() {
        return response::forbidden();
    }
    match user_services.get_user(&id) {
        Some(user) => HttpResponse::Ok().json(user.view()),
        None => response::not_found(),
    }
}

pub async fn update_user(
    req: HttpRequest,
    user_services: web::Data<UserServices>,
    id: web::Path<String>,
    body: web::Json<UserPatch>,
) -> HttpResponse {
    if !req.is_authenticated() {
        return response::forbidden();
    }
    match user_services.update_user(&id, body.into_inner()) {
        Ok(Some(user)) => response::doc(StatusCode::OK, "Updated successfully.", user.view()),
        Ok(None) => response::not_found(),
        Err(err) => response::user_service_error("Failed to update user", &err),
    }
}

pub async fn delete_user(
    req: HttpRequest,
    user_services: web::Data<UserServices>,
    id: web::Path<String>,
) -> HttpResponse {
    if !req.is_authenticated() {
        return response::forbidden();
    }
    match user_services.delete_user(&id) {
        Ok(Some(user)) => response::doc(StatusCode::OK, "Deleted successfully.", user.view()),
        Ok(None) => response::not_found(),
        Err(err) => response::user_service_error("Failed to delete user", &err),
    }
}
