// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::header::{CACHE_CONTROL, ETAG, HeaderName, HeaderValue, IF_NONE_MATCH};
use actix_web::{HttpRequest, HttpResponse};
use log::error;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::response::internal_error;
use crate::util::ReleaseTracker;

pub const X_RELEASE: &str = "x-release";

/// Serializes `body` and tags it with the release of `page_path`. A request
/// whose `If-None-Match` already names the tag gets an empty 304.
pub fn cached_json<T: Serialize>(
    req: &HttpRequest,
    releases: &ReleaseTracker,
    page_path: &str,
    body: &T,
) -> HttpResponse {
    let bytes = match serde_json::to_vec(body) {
        Ok(bytes) => bytes,
        Err(err) => {
            error!("Failed to serialize response for {}: {}", page_path, err);
            return internal_error();
        }
    };

    let release_hex = releases.release_hex_for(page_path);
    let hash = hex::encode(Sha256::digest(&bytes));
    let etag_value = format!("\"{}{}\"", &hash[..8], release_hex);
    let release_value = HeaderValue::from_str(&release_hex)
        .unwrap_or_else(|_| HeaderValue::from_static("invalid-release"));
    let etag_header = HeaderValue::from_str(&etag_value)
        .unwrap_or_else(|_| HeaderValue::from_static("\"invalid-etag\""));
    let x_release = HeaderName::from_static(X_RELEASE);

    if let Some(candidate) = req.headers().get(IF_NONE_MATCH)
        && let Ok(tag_str) = candidate.to_str()
        && tag_str
            .split(',')
            .any(|candidate_tag| candidate_tag.trim() == etag_value)
    {
        return HttpResponse::NotModified()
            .insert_header((ETAG, etag_header))
            .insert_header((x_release, release_value))
            .insert_header((CACHE_CONTROL, "no-cache"))
            .finish();
    }

    HttpResponse::Ok()
        .content_type("application/json")
        .insert_header((ETAG, etag_header))
        .insert_header((x_release, release_value))
        .insert_header((CACHE_CONTROL, "no-cache"))
        .body(bytes)
}
