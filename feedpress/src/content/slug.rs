// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use uuid::Uuid;

const MAX_SLUG_CHARS: usize = 96;

/// Lowercase ASCII letters and digits joined by single dashes. Anything else
/// (including CJK text) is dropped, so the result may be empty.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_dash = true;
        }
    }
    slug.chars()
        .take(MAX_SLUG_CHARS)
        .collect::<String>()
        .trim_end_matches('-')
        .to_string()
}

/// Slug for a new post: an explicit slug wins, then the English title, then
/// the primary title. Falls back to `post-<8 hex>` when nothing usable remains.
pub fn derive_slug(explicit: Option<&str>, title_en: Option<&str>, title: &str) -> String {
    [explicit, title_en, Some(title)]
        .into_iter()
        .flatten()
        .map(slugify)
        .find(|slug| !slug.is_empty())
        .unwrap_or_else(fallback_slug)
}

fn fallback_slug() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("post-{}", &id[..8])
}
