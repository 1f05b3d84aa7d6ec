// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use log::{error, info};
use serde::Deserialize;

use super::cache::cached_json;
use super::response::{self, parse_usize};
use crate::app_state::AppState;
use crate::config::ValidatedConfig;
use crate::content::PaginatedDocs;
use crate::iam::authorize_request;
use crate::store::{FindQuery, Post, PostFilter, PostInput, PostPatch, SortSpec};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    limit: Option<String>,
    page: Option<String>,
    sort: Option<String>,
    slug: Option<String>,
}

/// Front-end pages showing `post`.
fn affected_paths(post: &Post) -> [String; 4] {
    [
        "/".to_string(),
        "/posts".to_string(),
        "/tags".to_string(),
        format!("/posts/{}", post.slug),
    ]
}

/// Create and update are open unless `content.open_writes` is off, in which
/// case they need the same credentials as delete.
fn writes_allowed(req: &HttpRequest, config: &ValidatedConfig) -> bool {
    config.content.open_writes || authorize_request(req, config.worker.configured_api_key())
}

pub async fn list_posts(
    req: HttpRequest,
    state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
    query: web::Query<ListQuery>,
) -> HttpResponse {
    let limit = config.content.resolve_limit(parse_usize(query.limit.as_deref()));
    let slug = query
        .slug
        .as_deref()
        .map(str::trim)
        .filter(|slug| !slug.is_empty())
        .map(str::to_string);
    let find = FindQuery {
        filter: PostFilter { slug: slug.clone() },
        sort: query
            .sort
            .as_deref()
            .and_then(SortSpec::parse)
            .unwrap_or_default(),
        page: parse_usize(query.page.as_deref()).unwrap_or(1),
        limit,
    };

    let result = match state.posts.find(&find) {
        Ok(result) => result,
        Err(err) => {
            error!("Failed to list posts: {}", err);
            return HttpResponse::Ok().json(PaginatedDocs::<Post>::empty(limit));
        }
    };

    let page_path = match slug {
        Some(slug) => format!("/posts/{}", slug),
        None => "/posts".to_string(),
    };
    cached_json(&req, &state.releases, &page_path, &result)
}

pub async fn get_post(state: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    match state.posts.find_by_id(&id) {
        Ok(Some(post)) => HttpResponse::Ok().json(post),
        Ok(None) => response::not_found(),
        Err(err) => {
            error!("Failed to load post {}: {}", id, err);
            response::not_found()
        }
    }
}

pub async fn create_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
    body: web::Json<PostInput>,
) -> HttpResponse {
    if !writes_allowed(&req, &config) {
        return response::forbidden();
    }

    let post = match state.posts.create(body.into_inner()) {
        Ok(post) => post,
        Err(err) => return response::store_error("Failed to create post", &err),
    };
    info!("📝 Created post {} ({})", post.slug, post.id);

    state
        .releases
        .bump_all(affected_paths(&post), "post created");

    // Best effort: the response does not wait for the worker.
    let _ = state.notifier.dispatch_created(post.clone());

    response::doc(StatusCode::CREATED, "Post successfully created.", post)
}

pub async fn update_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
    id: web::Path<String>,
    body: web::Json<PostPatch>,
) -> HttpResponse {
    if !writes_allowed(&req, &config) {
        return response::forbidden();
    }

    match state.posts.update(&id, body.into_inner()) {
        Ok(Some(post)) => {
            state
                .releases
                .bump_all(affected_paths(&post), "post updated");
            response::doc(StatusCode::OK, "Updated successfully.", post)
        }
        Ok(None) => response::not_found(),
        Err(err) => response::store_error("Failed to update post", &err),
    }
}

pub async fn delete_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
    id: web::Path<String>,
) -> HttpResponse {
    if !authorize_request(&req, config.worker.configured_api_key()) {
        return response::forbidden();
    }

    match state.posts.delete(&id) {
        Ok(Some(post)) => {
            info!("🗑️ Deleted post {} ({})", post.slug, post.id);
            state
                .releases
                .bump_all(affected_paths(&post), "post deleted");
            response::doc(StatusCode::OK, "Deleted successfully.", post)
        }
        Ok(None) => response::not_found(),
        Err(err) => response::store_error("Failed to delete post", &err),
    }
}
