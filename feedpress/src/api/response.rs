// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, error, web};
use log::error;
use serde::Serialize;

use crate::iam::UserServiceError;
use crate::store::StoreError;

pub const NOT_FOUND_MESSAGE: &str = "Not Found";
pub const FORBIDDEN_MESSAGE: &str = "You are not allowed to perform this action.";
const INTERNAL_MESSAGE: &str = "Something went wrong.";

#[derive(Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

/// `{message, doc}` envelope returned by write endpoints.
#[derive(Serialize)]
pub struct DocResponse<'a, T: Serialize> {
    pub message: &'a str,
    pub doc: T,
}

pub fn message(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(MessageBody { message })
}

pub fn not_found() -> HttpResponse {
    message(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
}

pub fn forbidden() -> HttpResponse {
    message(StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE)
}

pub fn internal_error() -> HttpResponse {
    message(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
}

pub fn doc<T: Serialize>(status: StatusCode, text: &str, doc: T) -> HttpResponse {
    HttpResponse::build(status).json(DocResponse { message: text, doc })
}

pub fn store_error(context: &str, err: &StoreError) -> HttpResponse {
    match err {
        StoreError::Validation(msg) | StoreError::Conflict(msg) => {
            message(StatusCode::BAD_REQUEST, msg)
        }
        StoreError::Io(_) | StoreError::Parse(_) => {
            error!("{}: {}", context, err);
            internal_error()
        }
    }
}

pub fn user_service_error(context: &str, err: &UserServiceError) -> HttpResponse {
    match err {
        UserServiceError::Validation(msg) | UserServiceError::Conflict(msg) => {
            message(StatusCode::BAD_REQUEST, msg)
        }
        UserServiceError::Forbidden(_) => forbidden(),
        UserServiceError::Iam(_) | UserServiceError::Password(_) => {
            error!("{}: {}", context, err);
            internal_error()
        }
    }
}

/// Malformed JSON bodies get a JSON 400 instead of the plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        let response = message(StatusCode::BAD_REQUEST, &format!("Invalid JSON body: {}", err));
        error::InternalError::from_response(err, response).into()
    })
}

/// Lenient numeric query value: anything unparsable counts as absent.
pub fn parse_usize(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
}
