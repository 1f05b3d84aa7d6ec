// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpResponse, web};

pub mod cache;
mod posts;
pub mod response;
mod revalidate;
mod tags;
mod users;
mod webhook;

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(response::json_config())
            .route("/health", web::get().to(health))
            .service(
                web::resource("/posts")
                    .route(web::get().to(posts::list_posts))
                    .route(web::post().to(posts::create_post)),
            )
            .service(
                web::resource("/posts/{id}")
                    .route(web::get().to(posts::get_post))
                    .route(web::patch().to(posts::update_post))
                    .route(web::delete().to(posts::delete_post)),
            )
            .route("/tags", web::get().to(tags::list_tags))
            .route("/tags/{slug}", web::get().to(tags::tag_posts))
            .route("/revalidate", web::post().to(revalidate::revalidate))
            .route("/webhook/article", web::post().to(webhook::article_hook))
            .route("/users/login", web::post().to(users::login))
            .route("/users/logout", web::post().to(users::logout))
            .route("/users/me", web::get().to(users::me))
            .service(
                web::resource("/users")
                    .route(web::get().to(users::list_users))
                    .route(web::post().to(users::create_user)),
            )
            .service(
                web::resource("/users/{id}")
                    .route(web::get().to(users::get_user))
                    .route(web::patch().to(users::update_user))
                    .route(web::delete().to(users::delete_user)),
            ),
    );
}
