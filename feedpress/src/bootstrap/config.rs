// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use argon2::password_hash::rand_core::{OsRng, RngCore};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_WORKERS: u16 = 4;
const SECRET_BYTES: usize = 32;
pub(crate) const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

pub fn ensure_config(root: &Path) -> Result<bool, BootstrapError> {
    let root_path = normalize_root(root)?;
    let config_path = root_path.join("config.yaml");

    if config_path.exists() {
        return Ok(false);
    }

    let contents = default_config_yaml(&generate_secret());

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&config_path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(BootstrapError::Io(err)),
    };

    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    log_action(format!(
        "created config.yaml (port {}, collections under data/)",
        DEFAULT_PORT
    ));

    Ok(true)
}

fn normalize_root(root: &Path) -> Result<PathBuf, BootstrapError> {
    let root_path = if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root.to_path_buf()
    };

    if root_path.exists() {
        if !root_path.is_dir() {
            return Err(BootstrapError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Runtime root is not a directory: {}", root_path.display()),
            )));
        }
        return Ok(root_path);
    }

    fs::create_dir_all(&root_path)?;
    log_action(format!(
        "created runtime root directory {}",
        root_path.display()
    ));
    Ok(root_path)
}

fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn default_config_yaml(secret: &str) -> String {
    format!(
        "server:\n  host: \"0.0.0.0\"\n  port: {port}\n  workers: {workers}\n\napp:\n  name: \"FeedPress\"\n  description: \"Headless CMS for summarized articles\"\n\ndatabase:\n  uri: \"file:data\"\n\nauth:\n  secret: \"{secret}\"\n  secure_cookies: false\n  admin_email: \"{admin_email}\"\n\nworker:\n  source_name: \"feedpress-cms\"\n  inbound_source: \"rss-worker\"\n  timeout_seconds: 10\n\nrevalidation:\n  paths:\n    - \"/\"\n    - \"/posts\"\n    - \"/tags\"\n\ncontent:\n  tag_scan_window: 1000\n  default_limit: 10\n  max_limit: 100\n\nlogging:\n  level: \"info\"\n",
        port = DEFAULT_PORT,
        workers = DEFAULT_WORKERS,
        secret = secret,
        admin_email = DEFAULT_ADMIN_EMAIL,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn default_config_parses_and_validates() {
        let yaml = default_config_yaml(&generate_secret());
        let config = Config::parse(&yaml).expect("default config should parse");
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.auth.admin_email.as_deref(), Some(DEFAULT_ADMIN_EMAIL));
        config
            .validate(Path::new("."))
            .expect("default config should validate");
    }

    #[test]
    fn generated_secrets_are_hex_and_distinct() {
        let first = generate_secret();
        let second = generate_secret();
        assert_eq!(first.len(), SECRET_BYTES * 2);
        assert!(first.chars().all(|ch| ch.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }
}
