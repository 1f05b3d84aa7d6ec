// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{FindQuery, Post, PostCollection, PostInput, PostPatch, PostStore, StoreError};
use crate::content::PaginatedDocs;

#[derive(Default)]
pub struct MemoryPostStore {
    collection: RwLock<PostCollection>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            collection: RwLock::new(PostCollection::from_posts(posts)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, PostCollection> {
        match self.collection.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::error!("Post store lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, PostCollection> {
        match self.collection.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::error!("Post store lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl PostStore for MemoryPostStore {
    fn find(&self, query: &FindQuery) -> Result<PaginatedDocs<Post>, StoreError> {
        Ok(self.read().find(query))
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.read().find_by_id(id))
    }

    fn create(&self, input: PostInput) -> Result<Post, StoreError> {
        self.write().create(input)
    }

    fn update(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, StoreError> {
        self.write().update(id, patch)
    }

    fn delete(&self, id: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.write().delete(id))
    }
}
