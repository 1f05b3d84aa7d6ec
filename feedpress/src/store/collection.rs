// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::post::{Post, PostInput, PostPatch, non_blank};
use super::query::FindQuery;
use super::StoreError;
use crate::content::{PaginatedDocs, derive_slug, paginate};

/// Collection semantics shared by every store backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostCollection {
    #[serde(default)]
    posts: Vec<Post>,
}

impl PostCollection {
    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn find(&self, query: &FindQuery) -> PaginatedDocs<Post> {
        let mut matching: Vec<Post> = self
            .posts
            .iter()
            .filter(|post| query.filter.matches(post))
            .cloned()
            .collect();
        matching.sort_by(|a, b| query.sort.compare(a, b));
        paginate(matching, query.page, query.limit)
    }

    pub fn find_by_id(&self, id: &str) -> Option<Post> {
        self.posts.iter().find(|post| post.id == id).cloned()
    }

    pub fn create(&mut self, input: PostInput) -> Result<Post, StoreError> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(StoreError::Validation("title is required".to_string()));
        }
        let title_en = non_blank(input.title_en);
        let slug = derive_slug(input.slug.as_deref(), title_en.as_deref(), &title);
        if self.posts.iter().any(|post| post.slug == slug) {
            return Err(StoreError::Conflict(format!(
                "slug '{}' is already in use",
                slug
            )));
        }

        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4().to_string(),
            title,
            title_en,
            slug,
            source: input.source.unwrap_or_default(),
            original_language: input.original_language.unwrap_or_default(),
            summary_zh: input.summary_zh.unwrap_or_default(),
            summary_en: input.summary_en.unwrap_or_default(),
            published_at: input.published_at.unwrap_or(now),
            meta: input.meta.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.posts.push(post.clone());
        Ok(post)
    }

    pub fn update(&mut self, id: &str, patch: PostPatch) -> Result<Option<Post>, StoreError> {
        if let Some(title) = patch.title.as_deref()
            && title.trim().is_empty()
        {
            return Err(StoreError::Validation("title cannot be empty".to_string()));
        }
        let Some(post) = self.posts.iter_mut().find(|post| post.id == id) else {
            return Ok(None);
        };
        post.apply_patch(patch, Utc::now());
        Ok(Some(post.clone()))
    }

    pub fn delete(&mut self, id: &str) -> Option<Post> {
        let index = self.posts.iter().position(|post| post.id == id)?;
        Some(self.posts.remove(index))
    }
}
