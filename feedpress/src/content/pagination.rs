// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::Serialize;

/// One page of a larger result set, in the shape the front end expects from
/// every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedDocs<T> {
    pub docs: Vec<T>,
    pub total_docs: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub page: usize,
    pub paging_counter: usize,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<usize>,
    pub next_page: Option<usize>,
}

impl<T> PaginatedDocs<T> {
    /// Benign result used when the underlying read fails.
    pub fn empty(limit: usize) -> Self {
        paginate(Vec::new(), 1, limit)
    }

    pub fn map<U, F>(self, f: F) -> PaginatedDocs<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedDocs {
            docs: self.docs.into_iter().map(f).collect(),
            total_docs: self.total_docs,
            limit: self.limit,
            total_pages: self.total_pages,
            page: self.page,
            paging_counter: self.paging_counter,
            has_prev_page: self.has_prev_page,
            has_next_page: self.has_next_page,
            prev_page: self.prev_page,
            next_page: self.next_page,
        }
    }
}

/// Slices `items` into the requested 1-based page. Page 0 is read as page 1
/// and a limit of 0 as 1.
pub fn paginate<T>(items: Vec<T>, page: usize, limit: usize) -> PaginatedDocs<T> {
    let page = page.max(1);
    let limit = limit.max(1);
    let total_docs = items.len();
    let total_pages = total_docs.div_ceil(limit);

    let start = (page - 1).saturating_mul(limit);
    let docs: Vec<T> = items.into_iter().skip(start).take(limit).collect();

    let has_prev_page = page > 1 && total_pages > 0;
    let has_next_page = page < total_pages;

    PaginatedDocs {
        docs,
        total_docs,
        limit,
        total_pages,
        page,
        paging_counter: start.saturating_add(1),
        has_prev_page,
        has_next_page,
        prev_page: has_prev_page.then(|| page - 1),
        next_page: has_next_page.then(|| page + 1),
    }
}
