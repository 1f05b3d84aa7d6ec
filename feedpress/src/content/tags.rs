// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Tags are not stored. They are the summary keywords of posts, compared
//! case-insensitively. Counting and filtering both go through
//! [`tag_key`] so the tag list and the tag pages always agree.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::store::Post;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub keyword: String,
    pub count: usize,
    pub slug: String,
}

/// Identity of a tag: trimmed and lowercased.
pub fn tag_key(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

/// URL segment for a tag.
pub fn tag_slug(keyword: &str) -> String {
    urlencoding::encode(&tag_key(keyword)).into_owned()
}

/// Chinese summary keywords first, then English ones.
pub fn extract_keywords(post: &Post) -> impl Iterator<Item = &str> {
    post.summary_zh
        .keywords
        .iter()
        .chain(post.summary_en.keywords.iter())
        .map(|keyword| keyword.as_str())
}

pub fn post_has_tag(post: &Post, tag: &str) -> bool {
    let wanted = tag_key(tag);
    !wanted.is_empty() && extract_keywords(post).any(|keyword| tag_key(keyword) == wanted)
}

/// Posts carrying `tag`, in input order.
pub fn filter_by_tag(posts: Vec<Post>, tag: &str) -> Vec<Post> {
    if tag_key(tag).is_empty() {
        return Vec::new();
    }
    posts
        .into_iter()
        .filter(|post| post_has_tag(post, tag))
        .collect()
}

/// Number of posts per tag, most used first, ties by slug.
pub fn count_tags(posts: &[Post]) -> Vec<TagCount> {
    let mut counts: HashMap<String, TagCount> = HashMap::new();
    for post in posts {
        let mut seen_in_post = HashSet::new();
        for keyword in extract_keywords(post) {
            let key = tag_key(keyword);
            if key.is_empty() || !seen_in_post.insert(key.clone()) {
                continue;
            }
            counts
                .entry(key)
                .and_modify(|tag| tag.count += 1)
                .or_insert_with(|| TagCount {
                    keyword: keyword.trim().to_string(),
                    count: 1,
                    slug: tag_slug(keyword),
                });
        }
    }

    let mut tags: Vec<TagCount> = counts.into_values().collect();
    tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.slug.cmp(&b.slug)));
    tags
}
