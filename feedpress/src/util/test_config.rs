// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use crate::config::{
    AppConfig, AuthConfig, ContentConfig, DatabaseTarget, LoggingConfig, RevalidationConfig,
    ServerConfig, ValidatedConfig, WorkerConfig,
};

pub const TEST_CMS_SECRET: &str = "test-secret-0123456789abcdef";

/// In-memory configuration for tests: no data directory, no worker, no
/// revalidation secret until one is set.
#[derive(Debug, Clone)]
pub struct TestConfigBuilder {
    config: ValidatedConfig,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ValidatedConfig {
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 5466,
                    workers: 1,
                },
                app: AppConfig {
                    name: "FeedPress Test".to_string(),
                    description: "Test Description".to_string(),
                    server_url: None,
                },
                database: DatabaseTarget::Memory,
                auth: AuthConfig {
                    secret: TEST_CMS_SECRET.to_string(),
                    issuer: "feedpress".to_string(),
                    audience: "feedpress-users".to_string(),
                    expiration_hours: 12,
                    cookie_name: "feedpress_token".to_string(),
                    secure_cookies: false,
                    admin_email: None,
                },
                worker: WorkerConfig::default(),
                revalidation: RevalidationConfig::default(),
                content: ContentConfig::default(),
                logging: LoggingConfig {
                    level: "debug".to_string(),
                },
            },
        }
    }

    pub fn with_worker(mut self, webhook_url: Option<&str>, api_key: Option<&str>) -> Self {
        self.config.worker.webhook_url = webhook_url.map(str::to_string);
        self.config.worker.api_key = api_key.map(str::to_string);
        self
    }

    pub fn with_worker_timeout(mut self, seconds: u64) -> Self {
        self.config.worker.timeout_seconds = seconds;
        self
    }

    pub fn with_revalidation_secret(mut self, secret: &str) -> Self {
        self.config.revalidation.secret = Some(secret.to_string());
        self
    }

    pub fn with_server_url(mut self, url: &str) -> Self {
        self.config.app.server_url = Some(url.to_string());
        self
    }

    pub fn with_open_writes(mut self, open: bool) -> Self {
        self.config.content.open_writes = open;
        self
    }

    pub fn with_tag_scan_window(mut self, window: usize) -> Self {
        self.config.content.tag_scan_window = window;
        self
    }

    pub fn build(self) -> ValidatedConfig {
        self.config
    }
}

pub fn test_config() -> ValidatedConfig {
    TestConfigBuilder::new().build()
}
