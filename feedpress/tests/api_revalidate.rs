// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use feedpress::util::TestConfigBuilder;
use serde_json::json;

fn harness_with_secret() -> common::TestHarness {
    common::TestHarness::with_config(
        TestConfigBuilder::new()
            .with_revalidation_secret("reval-secret")
            .build(),
    )
}

#[actix_web::test]
async fn wrong_secret_is_unauthorized() {
    let harness = harness_with_secret();
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    let req = test::TestRequest::post()
        .uri("/api/revalidate?secret=wrong")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = common::read_json(resp).await;
    assert_eq!(json, json!({ "message": "Invalid secret" }));
}

#[actix_web::test]
async fn unconfigured_secret_rejects_everything() {
    let harness = common::TestHarness::new();
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    let req = test::TestRequest::post()
        .uri("/api/revalidate?secret=")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn valid_secret_bumps_listing_pages_and_extra_path() {
    let harness = harness_with_secret();
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;
    let before = harness.app_state.releases.release_for("/posts/some-article");

    let req = test::TestRequest::post()
        .uri("/api/revalidate?secret=reval-secret&path=/posts/some-article")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = common::read_json(resp).await;

    assert_eq!(json["revalidated"], json!(true));
    let paths: Vec<&str> = json["paths"]
        .as_array()
        .expect("paths")
        .iter()
        .filter_map(|path| path.as_str())
        .collect();
    assert!(paths.contains(&"/"));
    assert!(paths.contains(&"/posts"));
    assert!(paths.contains(&"/tags"));
    assert!(paths.contains(&"/posts/some-article"));
    assert!(json["now"].as_i64().is_some_and(|now| now > 0));
    assert!(harness.app_state.releases.release_for("/posts/some-article") > before);
}
