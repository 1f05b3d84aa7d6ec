// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::sync::Arc;

use crate::config::ValidatedConfig;
use crate::notify::{ArticleNotifier, NotifyError};
use crate::store::{MemoryPostStore, PostStore};
use crate::util::ReleaseTracker;

/// Services shared by every handler. Built once at startup.
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub notifier: ArticleNotifier,
    pub releases: ReleaseTracker,
}

impl AppState {
    pub fn new(posts: Arc<dyn PostStore>, notifier: ArticleNotifier) -> Self {
        Self {
            posts,
            notifier,
            releases: ReleaseTracker::new(),
        }
    }

    /// Empty in-memory post store, for tests and `memory:` databases.
    pub fn in_memory(config: &ValidatedConfig) -> Result<Self, NotifyError> {
        Ok(Self::new(
            Arc::new(MemoryPostStore::new()),
            ArticleNotifier::new(config)?,
        ))
    }
}
