// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use feedpress::notify::{ArticleNotifier, EVENT_POST_CREATED, NotificationOutcome};
use feedpress::util::TestConfigBuilder;
use serde_json::json;

#[actix_web::test]
async fn created_post_is_pushed_to_the_worker() {
    let receiver = common::receiver::start_worker_receiver(StatusCode::OK).await;
    let config = TestConfigBuilder::new()
        .with_worker(Some(receiver.url.as_str()), Some("worker-key"))
        .with_server_url("https://news.example.com")
        .build();
    let harness = common::TestHarness::with_config(config);
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(common::sample_post("推送测试", "push-test", &["测试"], &["Test"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let captured = receiver.wait_for(1).await;
    assert_eq!(captured.len(), 1);
    let request = &captured[0];
    assert_eq!(request.authorization.as_deref(), Some("Bearer worker-key"));
    assert_eq!(request.source.as_deref(), Some("feedpress-cms"));
    assert_eq!(request.body["event"], json!(EVENT_POST_CREATED));
    assert_eq!(request.body["slug"], json!("push-test"));
    assert_eq!(
        request.body["url"],
        json!("https://news.example.com/posts/push-test")
    );
    assert_eq!(
        request.body["summary_zh"]["keywords"],
        json!([{ "keyword": "测试" }])
    );
}

#[actix_web::test]
async fn worker_rejection_does_not_fail_the_create() {
    let receiver = common::receiver::start_worker_receiver(StatusCode::INTERNAL_SERVER_ERROR).await;
    let config = TestConfigBuilder::new()
        .with_worker(Some(receiver.url.as_str()), Some("worker-key"))
        .build();
    let harness = common::TestHarness::with_config(config.clone());
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(common::sample_post("Rejected", "rejected", &[], &[]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = common::read_json(resp).await;
    assert_eq!(receiver.wait_for(1).await.len(), 1);

    let id = created["doc"]["id"].as_str().expect("id");
    let post = harness
        .app_state
        .posts
        .find_by_id(id)
        .expect("lookup")
        .expect("post stored");
    let notifier = ArticleNotifier::new(&config).expect("notifier");
    assert_eq!(
        notifier.notify_created(&post).await,
        NotificationOutcome::Rejected(500)
    );
}

#[actix_web::test]
async fn missing_api_key_skips_notification() {
    let receiver = common::receiver::start_worker_receiver(StatusCode::OK).await;
    let config = TestConfigBuilder::new()
        .with_worker(Some(receiver.url.as_str()), None)
        .build();
    let harness = common::TestHarness::with_config(config);
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(common::sample_post("Quiet", "quiet", &[], &[]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    actix_web::rt::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(receiver.captured().is_empty());
}
