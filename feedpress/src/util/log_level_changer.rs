// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use env_logger::Logger;
use log::{Level, Log, Metadata, Record, SetLoggerError};

/// Rewrites the level of records whose target starts with `target_prefix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRule {
    pub target_prefix: String,
    pub from: Level,
    pub to: Level,
}

impl LevelRule {
    pub fn new(target_prefix: &str, from: Level, to: Level) -> Self {
        Self {
            target_prefix: target_prefix.to_string(),
            from,
            to,
        }
    }
}

/// Rules applied by the server: chatty HTTP client internals are demoted.
pub fn default_rules() -> Vec<LevelRule> {
    vec![
        LevelRule::new("hyper", Level::Info, Level::Debug),
        LevelRule::new("reqwest", Level::Info, Level::Debug),
        LevelRule::new("rustls", Level::Info, Level::Debug),
        LevelRule::new("actix_server::builder", Level::Info, Level::Debug),
    ]
}

struct LevelRewritingLogger {
    inner: Logger,
    rules: Vec<LevelRule>,
}

impl LevelRewritingLogger {
    fn rewrite(&self, target: &str, level: Level) -> Level {
        rewrite_level(&self.rules, target, level)
    }
}

fn rewrite_level(rules: &[LevelRule], target: &str, level: Level) -> Level {
    rules
        .iter()
        .find(|rule| target.starts_with(&rule.target_prefix) && rule.from == level)
        .map(|rule| rule.to)
        .unwrap_or(level)
}

impl Log for LevelRewritingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let level = self.rewrite(metadata.target(), metadata.level());
        let rewritten = Metadata::builder()
            .level(level)
            .target(metadata.target())
            .build();
        self.inner.enabled(&rewritten)
    }

    fn log(&self, record: &Record) {
        let level = self.rewrite(record.target(), record.level());
        self.inner.log(
            &Record::builder()
                .level(level)
                .target(record.target())
                .args(*record.args())
                .module_path(record.module_path())
                .file(record.file())
                .line(record.line())
                .build(),
        );
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

pub fn init_logger(rules: Vec<LevelRule>, logger: Logger) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(LevelRewritingLogger {
        inner: logger,
        rules,
    }))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_prefix_and_level_is_rewritten() {
        let rules = default_rules();
        assert_eq!(
            rewrite_level(&rules, "reqwest::connect", Level::Info),
            Level::Debug
        );
    }

    #[test]
    fn other_levels_and_targets_pass_through() {
        let rules = default_rules();
        assert_eq!(
            rewrite_level(&rules, "reqwest::connect", Level::Warn),
            Level::Warn
        );
        assert_eq!(
            rewrite_level(&rules, "feedpress::notify", Level::Info),
            Level::Info
        );
    }
}
