// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpRequest, HttpResponse, web};
use log::error;
use serde::{Deserialize, Serialize};

use super::cache::cached_json;
use super::response::parse_usize;
use crate::app_state::AppState;
use crate::config::ValidatedConfig;
use crate::content::{PaginatedDocs, TagCount, count_tags, filter_by_tag, paginate, tag_slug};
use crate::store::{FindQuery, Post, StoreError};

#[derive(Serialize)]
struct TagList {
    tags: Vec<TagCount>,
}

#[derive(Debug, Deserialize)]
pub struct TagPageQuery {
    page: Option<String>,
    limit: Option<String>,
}

/// The newest posts that tag listings are computed from. Older posts do not
/// contribute tags.
fn scan_window(state: &AppState, config: &ValidatedConfig) -> Result<Vec<Post>, StoreError> {
    state
        .posts
        .find(&FindQuery::newest(config.content.tag_scan_window))
        .map(|page| page.docs)
}

pub async fn list_tags(
    req: HttpRequest,
    state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
) -> HttpResponse {
    match scan_window(&state, &config) {
        Ok(posts) => cached_json(
            &req,
            &state.releases,
            "/tags",
            &TagList {
                tags: count_tags(&posts),
            },
        ),
        Err(err) => {
            error!("Failed to compute tag list: {}", err);
            HttpResponse::Ok().json(TagList { tags: Vec::new() })
        }
    }
}

pub async fn tag_posts(
    req: HttpRequest,
    state: web::Data<AppState>,
    config: web::Data<ValidatedConfig>,
    slug: web::Path<String>,
    query: web::Query<TagPageQuery>,
) -> HttpResponse {
    // Segments may arrive encoded twice when the front end re-encodes a slug.
    let tag = urlencoding::decode(&slug)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| slug.to_string());
    let limit = config.content.resolve_limit(parse_usize(query.limit.as_deref()));
    let page = parse_usize(query.page.as_deref()).unwrap_or(1);

    match scan_window(&state, &config) {
        Ok(posts) => {
            let result = paginate(filter_by_tag(posts, &tag), page, limit);
            let page_path = format!("/tags/{}", tag_slug(&tag));
            cached_json(&req, &state.releases, &page_path, &result)
        }
        Err(err) => {
            error!("Failed to load posts for tag {}: {}", tag, err);
            HttpResponse::Ok().json(PaginatedDocs::<Post>::empty(limit))
        }
    }
}
