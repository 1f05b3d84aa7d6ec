// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Scratch runtime root under `target/test-fixtures`, removed on drop.
#[derive(Debug)]
pub struct TestFixtureRoot {
    path: PathBuf,
}

impl TestFixtureRoot {
    pub fn new_unique(prefix: &str) -> std::io::Result<Self> {
        let root = fixtures_root().join(format!("{}-{}", prefix, Uuid::new_v4()));
        fs::create_dir_all(&root)?;
        Ok(Self { path: root })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data_dir(&self) -> PathBuf {
        self.path.join("data")
    }

    pub fn config_file(&self) -> PathBuf {
        self.path.join("config.yaml")
    }

    /// Writes `config.yaml` with collections stored under `data/`, followed by `extra_yaml`.
    pub fn write_config(&self, extra_yaml: &str) -> std::io::Result<()> {
        let base = format!(
            r#"server:
  host: "127.0.0.1"
  port: 8080
app:
  name: "FeedPress Test"
database:
  uri: "file:data"
auth:
  secret: "{}"
  secure_cookies: false
logging:
  level: "debug"
"#,
            "fixture-secret-0123456789abcdef"
        );
        fs::write(self.config_file(), format!("{}{}", base, extra_yaml))
    }
}

impl Drop for TestFixtureRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn fixtures_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let repo_root = manifest_dir.parent().unwrap_or(&manifest_dir);
    repo_root.join("target").join("test-fixtures")
}
