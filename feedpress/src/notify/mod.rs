// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Outbound "post created" notification to the ingestion worker.
//!
//! Delivery is best effort: one attempt per created post, no retry and no
//! queue. Every failure ends up in the log and in the returned
//! [`NotificationOutcome`]; none of them reaches the request that created
//! the post.

use actix_web::rt::task::JoinHandle;
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::config::ValidatedConfig;
use crate::store::{Language, Post, Summary};

pub const EVENT_POST_CREATED: &str = "post.created";
pub const WEBHOOK_SOURCE_HEADER: &str = "X-Webhook-Source";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Webhook URL or API key not configured.
    Skipped,
    Delivered(u16),
    /// The worker answered with a non-2xx status.
    Rejected(u16),
    /// Network error or timeout.
    Failed(String),
}

#[derive(Debug)]
pub enum NotifyError {
    Client(String),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::Client(msg) => write!(f, "Notification client error: {}", msg),
        }
    }
}

impl std::error::Error for NotifyError {}

#[derive(Debug, Serialize)]
pub struct ArticleCreatedPayload<'a> {
    pub event: &'static str,
    pub id: &'a str,
    pub slug: &'a str,
    pub title: &'a str,
    pub title_en: Option<&'a str>,
    pub original_language: Language,
    pub url: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
    pub summary_zh: &'a Summary,
    pub summary_en: &'a Summary,
}

#[derive(Clone)]
pub struct ArticleNotifier {
    client: Client,
    webhook_url: Option<String>,
    api_key: Option<String>,
    source_name: String,
    server_url: Option<String>,
}

impl ArticleNotifier {
    pub fn new(config: &ValidatedConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .user_agent(concat!("feedpress/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.worker.timeout_seconds))
            .build()
            .map_err(|err| NotifyError::Client(err.to_string()))?;

        Ok(Self {
            client,
            webhook_url: config
                .worker
                .webhook_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            api_key: config.worker.configured_api_key().map(str::to_string),
            source_name: config.worker.source_name.clone(),
            server_url: config.app.server_url.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some() && self.api_key.is_some()
    }

    pub fn payload<'a>(&self, post: &'a Post) -> ArticleCreatedPayload<'a> {
        ArticleCreatedPayload {
            event: EVENT_POST_CREATED,
            id: &post.id,
            slug: &post.slug,
            title: &post.title,
            title_en: post.title_en.as_deref(),
            original_language: post.original_language,
            url: self
                .server_url
                .as_ref()
                .map(|base| format!("{}/posts/{}", base, post.slug)),
            published_at: post.published_at,
            summary_zh: &post.summary_zh,
            summary_en: &post.summary_en,
        }
    }

    /// Sends one notification for `post` and reports what happened.
    pub async fn notify_created(&self, post: &Post) -> NotificationOutcome {
        let (Some(url), Some(api_key)) = (self.webhook_url.as_deref(), self.api_key.as_deref())
        else {
            info!(
                "Worker notification skipped for post {}: webhook not configured",
                post.slug
            );
            return NotificationOutcome::Skipped;
        };

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .header(WEBHOOK_SOURCE_HEADER, self.source_name.as_str())
            .json(&self.payload(post))
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                let status = response.status().as_u16();
                info!("📨 Worker notified of post {} ({})", post.slug, status);
                NotificationOutcome::Delivered(status)
            }
            Ok(response) => {
                let status = response.status().as_u16();
                warn!(
                    "Worker rejected notification for post {} with status {}",
                    post.slug, status
                );
                NotificationOutcome::Rejected(status)
            }
            Err(err) => {
                let reason = if err.is_timeout() {
                    "timed out".to_string()
                } else {
                    err.to_string()
                };
                error!(
                    "Worker notification for post {} failed: {}",
                    post.slug, reason
                );
                NotificationOutcome::Failed(reason)
            }
        }
    }

    /// Runs [`Self::notify_created`] in the background. The caller does not
    /// need to await the handle.
    pub fn dispatch_created(&self, post: Post) -> JoinHandle<NotificationOutcome> {
        let notifier = self.clone();
        actix_web::rt::spawn(async move { notifier.notify_created(&post).await })
    }
}
