// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod pagination;
pub mod slug;
pub mod tags;

pub use pagination::{PaginatedDocs, paginate};
pub use slug::{derive_slug, slugify};
pub use tags::{TagCount, count_tags, extract_keywords, filter_by_tag, post_has_tag, tag_slug};
