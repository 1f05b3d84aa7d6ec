// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{FindQuery, Post, PostCollection, PostInput, PostPatch, PostStore, StoreError};
use crate::content::PaginatedDocs;
use crate::util::atomic_file::write_atomic;

/// Posts kept in memory and persisted to a YAML file after every mutation.
/// A mutation is only visible once it has reached disk.
pub struct FilePostStore {
    path: PathBuf,
    collection: RwLock<PostCollection>,
}

impl FilePostStore {
    /// Loads `path`, or starts empty when the file does not exist yet.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        if path.as_os_str().is_empty() {
            return Err(StoreError::Io("Posts file path is empty".to_string()));
        }
        let collection = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                StoreError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;
            if content.trim().is_empty() {
                PostCollection::default()
            } else {
                serde_yaml::from_str(&content).map_err(|e| {
                    StoreError::Parse(format!("Failed to parse {}: {}", path.display(), e))
                })?
            }
        } else {
            PostCollection::default()
        };
        log::info!(
            "Loaded {} post(s) from {}",
            collection.len(),
            path.display()
        );
        Ok(Self {
            path,
            collection: RwLock::new(collection),
        })
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

    fn persist(&self, collection: &PostCollection) -> Result<(), StoreError> {
        let content = serde_yaml::to_string(collection)
            .map_err(|e| StoreError::Parse(format!("Failed to serialize posts: {}", e)))?;
        write_atomic(&self.path, content.as_bytes()).map_err(|e| {
            StoreError::Io(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    /// Applies `mutation` to a copy and swaps it in only after the copy is saved.
    fn mutate<T, F>(&self, mutation: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut PostCollection) -> Result<(T, bool), StoreError>,
    {
        let mut guard = self.write();
        let mut next = PostCollection::clone(&guard);
        let (result, changed) = mutation(&mut next)?;
        if changed {
            self.persist(&next)?;
            *guard = next;
        }
        Ok(result)
    }
}

impl PostStore for FilePostStore {
    fn find(&self, query: &FindQuery) -> Result<PaginatedDocs<Post>, StoreError> {
        Ok(self.read().find(query))
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.read().find_by_id(id))
    }

    fn create(&self, input: PostInput) -> Result<Post, StoreError> {
        self.mutate(|collection| collection.create(input).map(|post| (post, true)))
    }

    fn update(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, StoreError> {
        self.mutate(|collection| {
            let updated = collection.update(id, patch)?;
            let changed = updated.is_some();
            Ok((updated, changed))
        })
    }

    fn delete(&self, id: &str) -> Result<Option<Post>, StoreError> {
        self.mutate(|collection| {
            let removed = collection.delete(id);
            let changed = removed.is_some();
            Ok((removed, changed))
        })
    }
}
