// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod collection;
mod file;
mod memory;
mod post;
mod query;

use std::sync::Arc;

pub use collection::PostCollection;
pub use file::FilePostStore;
pub use memory::MemoryPostStore;
pub use post::{
    Keyword, Language, Meta, Post, PostInput, PostPatch, Source, Summary, deserialize_keywords,
};
pub use query::{FindQuery, PostFilter, SortField, SortSpec};

use crate::content::PaginatedDocs;
use crate::runtime_paths::RuntimePaths;

#[derive(Debug)]
pub enum StoreError {
    /// Input rejected before it reached the collection.
    Validation(String),
    /// Unique constraint violated.
    Conflict(String),
    Io(String),
    Parse(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Validation(msg) => write!(f, "Validation error: {}", msg),
            StoreError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            StoreError::Io(msg) => write!(f, "Storage I/O error: {}", msg),
            StoreError::Parse(msg) => write!(f, "Storage parse error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Document store for posts. Constructed once at startup and shared through
/// `AppState`.
pub trait PostStore: Send + Sync {
    fn find(&self, query: &FindQuery) -> Result<PaginatedDocs<Post>, StoreError>;
    fn find_by_id(&self, id: &str) -> Result<Option<Post>, StoreError>;
    fn create(&self, input: PostInput) -> Result<Post, StoreError>;
    /// `Ok(None)` when no post has this id.
    fn update(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, StoreError>;
    /// `Ok(None)` when no post has this id.
    fn delete(&self, id: &str) -> Result<Option<Post>, StoreError>;
}

/// File-backed when the runtime has a data directory, in memory otherwise.
pub fn open_post_store(paths: &RuntimePaths) -> Result<Arc<dyn PostStore>, StoreError> {
    match paths.posts_file.as_ref() {
        Some(path) => Ok(Arc::new(FilePostStore::open(path.clone())?)),
        None => Ok(Arc::new(MemoryPostStore::new())),
    }
}
