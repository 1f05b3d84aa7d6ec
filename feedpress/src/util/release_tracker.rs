// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::{error, info};
use std::cmp::max;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Per-path release counters exposed via the X-Release header.
///
/// Every bump draws from one self-bumping clock so values stay strictly
/// monotonic even when the system clock stands still. A path's release is the
/// newest bump recorded for the path itself or any of its ancestors, so
/// revalidating `/posts` also refreshes `/posts/some-slug` and `/` refreshes
/// everything.
#[derive(Clone)]
pub struct ReleaseTracker {
    clock: Arc<AtomicU64>,
    baseline: u64,
    paths: Arc<RwLock<HashMap<String, u64>>>,
}

impl ReleaseTracker {
    /// Starts every path at the current epoch milliseconds.
    pub fn new() -> Self {
        let now = current_epoch_millis();
        Self {
            clock: Arc::new(AtomicU64::new(now)),
            baseline: now,
            paths: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the release currently visible for `path`.
    pub fn release_for(&self, path: &str) -> u64 {
        let normalized = normalize_path(path);
        let paths = match self.paths.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("Release tracker lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        ancestors(&normalized)
            .filter_map(|candidate| paths.get(candidate).copied())
            .fold(self.baseline, max)
    }

    pub fn release_hex_for(&self, path: &str) -> String {
        format!("{:x}", self.release_for(path))
    }

    /// Bumps `path` to the current epoch (or the next integer) and logs the reason.
    pub fn bump(&self, path: &str, reason: &str) -> u64 {
        let normalized = normalize_path(path);
        let new_value = self.tick();
        let mut paths = match self.paths.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("Release tracker lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        paths.insert(normalized.clone(), new_value);
        info!(
            "🔁 Release for {} bumped to {} ({})",
            normalized, new_value, reason
        );
        new_value
    }

    /// Bumps each path once, returning the normalized paths in input order
    /// without duplicates.
    pub fn bump_all<I, S>(&self, paths: I, reason: &str) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut bumped: Vec<String> = Vec::new();
        for path in paths {
            let normalized = normalize_path(path.as_ref());
            if bumped.contains(&normalized) {
                continue;
            }
            self.bump(&normalized, reason);
            bumped.push(normalized);
        }
        bumped
    }

    fn tick(&self) -> u64 {
        let now = current_epoch_millis();
        let mut previous = self.clock.load(Ordering::SeqCst);
        loop {
            let new_value = max(now, previous.saturating_add(1));
            match self.clock.compare_exchange(
                previous,
                new_value,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return new_value,
                Err(observed) => previous = observed,
            }
        }
    }
}

impl Default for ReleaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapses duplicate and trailing slashes and drops any query string.
pub fn normalize_path(path: &str) -> String {
    let without_query = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = without_query
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

// `/a/b` -> `/a/b`, `/a`, `/`
fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    let mut next = Some(path);
    std::iter::from_fn(move || {
        let current = next?;
        next = if current == "/" {
            None
        } else {
            match current.rfind('/') {
                Some(0) | None => Some("/"),
                Some(index) => Some(&current[..index]),
            }
        };
        Some(current)
    })
}

fn current_epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}
