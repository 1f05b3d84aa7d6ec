// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use feedpress::notify::WEBHOOK_SOURCE_HEADER;
use serde_json::json;

#[actix_web::test]
async fn unknown_source_is_unauthorized() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    let req = test::TestRequest::post()
        .uri("/api/webhook/article")
        .insert_header((WEBHOOK_SOURCE_HEADER, "somebody-else"))
        .set_json(json!({ "event": "article.created", "slug": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = common::read_json(resp).await;
    assert_eq!(json, json!({ "success": false, "error": "Unauthorized" }));

    let req = test::TestRequest::post()
        .uri("/api/webhook/article")
        .set_json(json!({ "slug": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn malformed_payload_is_a_bad_request() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    let req = test::TestRequest::post()
        .uri("/api/webhook/article")
        .insert_header((WEBHOOK_SOURCE_HEADER, "rss-worker"))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{broken")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = common::read_json(resp).await;
    assert_eq!(json["success"], json!(false));
    assert_eq!(json["error"], json!("Invalid JSON payload"));
}

#[actix_web::test]
async fn trusted_source_revalidates_article_pages() {
    let harness = common::TestHarness::new();
    let input = serde_json::from_value(common::sample_post("New article", "new-article", &[], &[]))
        .expect("input");
    harness.app_state.posts.create(input).expect("post");
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;
    let releases = &harness.app_state.releases;
    let article_before = releases.release_for("/posts/new-article");
    let tags_before = releases.release_for("/tags");

    let req = test::TestRequest::post()
        .uri("/api/webhook/article")
        .insert_header((WEBHOOK_SOURCE_HEADER, "rss-worker"))
        .set_json(json!({ "event": "article.created", "slug": "new-article" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = common::read_json(resp).await;
    assert_eq!(json["success"], json!(true));
    assert_eq!(json["message"], json!("Revalidated 3 path(s)"));

    assert!(releases.release_for("/posts/new-article") > article_before);
    // "/" is an ancestor of every page
    assert!(releases.release_for("/tags") > tags_before);
}

#[actix_web::test]
async fn unknown_slug_gets_no_release_entry() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;
    let releases = &harness.app_state.releases;

    let req = test::TestRequest::post()
        .uri("/api/webhook/article")
        .insert_header((WEBHOOK_SOURCE_HEADER, "rss-worker"))
        .set_json(json!({ "event": "article.created", "slug": "never-stored" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = common::read_json(resp).await;
    assert_eq!(json["message"], json!("Revalidated 2 path(s)"));

    // A bump of the slug itself would land after the `/posts` bump.
    assert_eq!(
        releases.release_for("/posts/never-stored"),
        releases.release_for("/posts")
    );
}
