// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

pub mod receiver;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use feedpress::api;
use feedpress::app_state::AppState;
use feedpress::config::ValidatedConfig;
use feedpress::content::PaginatedDocs;
use feedpress::iam::{AuthMiddlewareFactory, MemoryUserStore, NewUser, User, UserServices};
use feedpress::notify::ArticleNotifier;
use feedpress::store::{FindQuery, Post, PostInput, PostPatch, PostStore, StoreError};
use feedpress::util::test_config;
use serde_json::{Value, json};
use std::sync::Arc;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestHarness {
    pub config: Arc<ValidatedConfig>,
    pub app_state: Arc<AppState>,
    pub user_services: Arc<UserServices>,
}

pub struct AuthSession {
    pub user: User,
    pub jwt_token: String,
    pub cookie: actix_web::cookie::Cookie<'static>,
}

#[derive(Clone)]
pub struct AppBundle {
    pub config: Arc<ValidatedConfig>,
    pub app_state: Arc<AppState>,
    pub user_services: Arc<UserServices>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// In-memory stores for posts and users, no admin account.
    pub fn with_config(config: ValidatedConfig) -> Self {
        let app_state = AppState::in_memory(&config).expect("app state");
        Self::with_app_state(config, app_state)
    }

    /// Same as `new`, with every post store call failing.
    pub fn with_failing_posts() -> Self {
        let config = test_config();
        let notifier = ArticleNotifier::new(&config).expect("notifier");
        let app_state = AppState::new(Arc::new(FailingPostStore), notifier);
        Self::with_app_state(config, app_state)
    }

    fn with_app_state(config: ValidatedConfig, app_state: AppState) -> Self {
        let user_services = UserServices::new_with_store(
            Arc::new(MemoryUserStore::default()),
            &config.auth,
        )
        .expect("user services");
        Self {
            config: Arc::new(config),
            app_state: Arc::new(app_state),
            user_services: Arc::new(user_services),
        }
    }

    pub fn app_bundle(&self) -> AppBundle {
        AppBundle {
            config: self.config.clone(),
            app_state: self.app_state.clone(),
            user_services: self.user_services.clone(),
        }
    }

    pub fn create_user(&self, email: &str, password: &str) -> User {
        self.user_services
            .create_user(
                NewUser {
                    name: email.split('@').next().unwrap_or(email).to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    roles: None,
                    enable_api_key: false,
                },
                true,
            )
            .expect("create user")
    }

    /// Creates the admin account and issues a session for it.
    pub fn admin_auth(&self) -> AuthSession {
        let user = match self.user_services.find_by_email(ADMIN_EMAIL) {
            Some(user) => user,
            None => self.create_user(ADMIN_EMAIL, ADMIN_PASSWORD),
        };
        self.session_for(user)
    }

    pub fn session_for(&self, user: User) -> AuthSession {
        let jwt_service = self.user_services.jwt_service();
        let (jwt_token, exp) = jwt_service.create_token(&user).expect("token");
        let cookie = jwt_service.create_auth_cookie(&jwt_token, exp).into_owned();
        AuthSession {
            user,
            jwt_token,
            cookie,
        }
    }
}

pub fn build_test_app(
    bundle: AppBundle,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::from(bundle.config))
        .app_data(web::Data::from(bundle.app_state))
        .app_data(web::Data::from(bundle.user_services))
        .wrap(AuthMiddlewareFactory)
        .configure(api::configure)
}

pub fn add_auth_headers(req: test::TestRequest, session: &AuthSession) -> test::TestRequest {
    req.cookie(session.cookie.clone())
}

pub fn sample_post(title: &str, slug: &str, zh_keywords: &[&str], en_keywords: &[&str]) -> Value {
    json!({
        "title": title,
        "title_en": format!("{} (en)", title),
        "slug": slug,
        "source": {
            "url": format!("https://news.example.com/{}", slug),
            "name": "Example News",
            "author": "Reporter"
        },
        "original_language": "en",
        "summary_zh": {
            "content": "中文摘要",
            "keywords": zh_keywords.iter().map(|keyword| json!({ "keyword": keyword })).collect::<Vec<_>>()
        },
        "summary_en": {
            "content": "English summary",
            "keywords": en_keywords.iter().map(|keyword| json!({ "keyword": keyword })).collect::<Vec<_>>()
        },
        "publishedAt": "2025-03-01T08:00:00Z"
    })
}

pub async fn read_json<B>(resp: ServiceResponse<B>) -> Value
where
    B: MessageBody,
{
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).expect("json body")
}

/// Post store whose every call fails with an I/O error.
pub struct FailingPostStore;

fn unavailable() -> StoreError {
    StoreError::Io("storage unavailable".to_string())
}

impl PostStore for FailingPostStore {
    fn find(&self, _query: &FindQuery) -> Result<PaginatedDocs<Post>, StoreError> {
        Err(unavailable())
    }

    fn find_by_id(&self, _id: &str) -> Result<Option<Post>, StoreError> {
        Err(unavailable())
    }

    fn create(&self, _input: PostInput) -> Result<Post, StoreError> {
        Err(unavailable())
    }

    fn update(&self, _id: &str, _patch: PostPatch) -> Result<Option<Post>, StoreError> {
        Err(unavailable())
    }

    fn delete(&self, _id: &str) -> Result<Option<Post>, StoreError> {
        Err(unavailable())
    }
}
