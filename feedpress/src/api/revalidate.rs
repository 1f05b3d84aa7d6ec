// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use log::warn;
use serde::{Deserialize, Serialize};

use super::response;
use crate::app_state::AppState;
use crate::config::ValidatedConfig;

#[derive(Debug, Deserialize)]
pub struct RevalidateQuery {
    secret: Option<String>,
    path: Option<String>,
}

#[derive(Serialize)]
struct RevalidateResponse {
    revalidated: bool,
    paths: Vec<String>,
    now: i64,
}

pub async fn revalidate(
    state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
    query: web::Query<RevalidateQuery>,
) -> HttpResponse {
    let authorized = match (config.revalidation.configured_secret(), query.secret.as_deref()) {
        (Some(expected), Some(provided)) => expected == provided,
        _ => false,
    };
    if !authorized {
        warn!("Revalidation rejected: invalid secret");
        return response::message(StatusCode::UNAUTHORIZED, "Invalid secret");
    }

    let extra = query
        .path
        .as_deref()
        .map(str::trim)
        .filter(|path| !path.is_empty());
    let paths = state.releases.bump_all(
        config
            .revalidation
            .paths
            .iter()
            .map(String::as_str)
            .chain(extra),
        "revalidate request",
    );

    HttpResponse::Ok().json(RevalidateResponse {
        revalidated: true,
        paths,
        now: Utc::now().timestamp_millis(),
    })
}
