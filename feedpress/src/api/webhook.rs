// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpRequest, HttpResponse, web};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::config::ValidatedConfig;
use crate::notify::WEBHOOK_SOURCE_HEADER;
use crate::store::FindQuery;

/// Article notification from the ingestion worker. Only `slug` is used.
#[derive(Debug, Deserialize)]
struct ArticleHook {
    #[serde(default)]
    event: Option<String>,
    #[serde(default)]
    slug: Option<String>,
}

#[derive(Serialize)]
struct HookFailure<'a> {
    success: bool,
    error: &'a str,
}

#[derive(Serialize)]
struct HookSuccess {
    success: bool,
    message: String,
}

fn failure(mut builder: actix_web::HttpResponseBuilder, error: &str) -> HttpResponse {
    builder.json(HookFailure {
        success: false,
        error,
    })
}

/// Refreshes the pages an ingested article appears on. The body is parsed by
/// hand so a malformed payload still gets a JSON answer.
pub async fn article_hook(
    req: HttpRequest,
    state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
    body: web::Bytes,
) -> HttpResponse {
    let source = req
        .headers()
        .get(WEBHOOK_SOURCE_HEADER)
        .and_then(|value| value.to_str().ok());
    if source != Some(config.worker.inbound_source.as_str()) {
        warn!("Article webhook rejected: unexpected source {:?}", source);
        return failure(HttpResponse::Unauthorized(), "Unauthorized");
    }

    let hook: ArticleHook = match serde_json::from_slice(&body) {
        Ok(hook) => hook,
        Err(err) => {
            warn!("Article webhook with malformed payload: {}", err);
            return failure(HttpResponse::BadRequest(), "Invalid JSON payload");
        }
    };

    let slug = hook
        .slug
        .as_deref()
        .map(str::trim)
        .filter(|slug| !slug.is_empty());
    let mut paths = vec!["/".to_string(), "/posts".to_string()];
    if let Some(slug) = slug {
        // Only stored posts get their own release entry.
        match state.posts.find(&FindQuery::by_slug(slug)) {
            Ok(found) if found.total_docs > 0 => paths.push(format!("/posts/{}", slug)),
            Ok(_) => info!("Article webhook for unknown slug {}", slug),
            Err(err) => error!("Article webhook could not look up {}: {}", slug, err),
        }
    }
    let paths = state.releases.bump_all(&paths, "article webhook");
    info!(
        "Article webhook ({}) revalidated {}",
        hook.event.as_deref().unwrap_or("unspecified"),
        paths.join(", ")
    );

    HttpResponse::Ok().json(HookSuccess {
        success: true,
        message: format!("Revalidated {} path(s)", paths.len()),
    })
}
