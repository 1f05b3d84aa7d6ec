// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single summary keyword. Input accepts either `"AI"` or
/// `{"keyword": "AI"}`; output is always the record form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keyword(String);

impl Keyword {
    /// Returns `None` for blank input.
    pub fn new(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Keyword {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("Keyword", 1)?;
        record.serialize_field("keyword", &self.0)?;
        record.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKeyword {
    Plain(String),
    Record {
        #[serde(default)]
        keyword: Option<String>,
    },
}

impl RawKeyword {
    fn into_keyword(self) -> Option<Keyword> {
        match self {
            RawKeyword::Plain(value) => Keyword::new(&value),
            RawKeyword::Record { keyword } => keyword.as_deref().and_then(Keyword::new),
        }
    }
}

impl<'de> Deserialize<'de> for Keyword {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawKeyword::deserialize(deserializer)?
            .into_keyword()
            .ok_or_else(|| serde::de::Error::custom("keyword must not be blank"))
    }
}

/// Accepts a missing or null list, mixed keyword shapes, and silently drops
/// null or blank entries.
pub fn deserialize_keywords<'de, D>(deserializer: D) -> Result<Vec<Keyword>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<RawKeyword>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter_map(RawKeyword::into_keyword)
        .collect())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Zh,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_keywords")]
    pub keywords: Vec<Keyword>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub title_en: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub original_language: Language,
    #[serde(default)]
    pub summary_zh: Summary,
    #[serde(default)]
    pub summary_en: Summary,
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub meta: Meta,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Body of a create request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub title_en: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub original_language: Option<Language>,
    #[serde(default)]
    pub summary_zh: Option<Summary>,
    #[serde(default)]
    pub summary_en: Option<Summary>,
    #[serde(default, rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// Body of an update request. Slugs are fixed at creation, so a `slug` sent
/// here is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_en: Option<String>,
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub original_language: Option<Language>,
    #[serde(default)]
    pub summary_zh: Option<Summary>,
    #[serde(default)]
    pub summary_en: Option<Summary>,
    #[serde(default, rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

impl Post {
    pub fn apply_patch(&mut self, patch: PostPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(title_en) = patch.title_en {
            self.title_en = non_blank(Some(title_en));
        }
        if let Some(source) = patch.source {
            self.source = source;
        }
        if let Some(language) = patch.original_language {
            self.original_language = language;
        }
        if let Some(summary) = patch.summary_zh {
            self.summary_zh = summary;
        }
        if let Some(summary) = patch.summary_en {
            self.summary_en = summary;
        }
        if let Some(published_at) = patch.published_at {
            self.published_at = published_at;
        }
        if let Some(meta) = patch.meta {
            self.meta = meta;
        }
        self.updated_at = now;
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
