// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::cmp::Ordering;

use super::post::Post;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    PublishedAt,
    CreatedAt,
    UpdatedAt,
    Title,
    Slug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortSpec {
    /// Newest first.
    fn default() -> Self {
        Self {
            field: SortField::PublishedAt,
            descending: true,
        }
    }
}

impl SortSpec {
    /// Parses `publishedAt` / `-publishedAt` style sort keys. Unknown fields
    /// yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (descending, name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };
        let field = match name {
            "publishedAt" => SortField::PublishedAt,
            "createdAt" => SortField::CreatedAt,
            "updatedAt" => SortField::UpdatedAt,
            "title" => SortField::Title,
            "slug" => SortField::Slug,
            _ => return None,
        };
        Some(Self { field, descending })
    }

    pub fn compare(&self, a: &Post, b: &Post) -> Ordering {
        let ordering = match self.field {
            SortField::PublishedAt => a.published_at.cmp(&b.published_at),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Slug => a.slug.cmp(&b.slug),
        };
        // id keeps equal keys in a stable order across pages
        let ordering = ordering.then_with(|| a.id.cmp(&b.id));
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub slug: Option<String>,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        match self.slug.as_deref() {
            Some(slug) => post.slug == slug,
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindQuery {
    pub filter: PostFilter,
    pub sort: SortSpec,
    pub page: usize,
    pub limit: usize,
}

impl FindQuery {
    /// First `limit` posts, newest first.
    pub fn newest(limit: usize) -> Self {
        Self {
            filter: PostFilter::default(),
            sort: SortSpec::default(),
            page: 1,
            limit,
        }
    }

    /// At most one post, matched on its slug.
    pub fn by_slug(slug: &str) -> Self {
        Self {
            filter: PostFilter {
                slug: Some(slug.to_string()),
            },
            ..Self::newest(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_slug_asks_for_a_single_match() {
        let query = FindQuery::by_slug("hello");
        assert_eq!(query.filter.slug.as_deref(), Some("hello"));
        assert_eq!((query.page, query.limit), (1, 1));
    }

    #[test]
    fn parse_reads_direction_prefix() {
        assert_eq!(
            SortSpec::parse("-publishedAt"),
            Some(SortSpec {
                field: SortField::PublishedAt,
                descending: true
            })
        );
        assert_eq!(
            SortSpec::parse("title"),
            Some(SortSpec {
                field: SortField::Title,
                descending: false
            })
        );
    }

    #[test]
    fn parse_rejects_unknown_fields() {
        assert_eq!(SortSpec::parse("-password"), None);
        assert_eq!(SortSpec::parse(""), None);
    }
}
