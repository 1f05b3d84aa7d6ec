// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const MAX_TEMP_ATTEMPTS: u32 = 100;

/// Replaces `target` with `content` through a sibling temp file and a rename.
/// Readers see either the old file or the new one, never a partial write.
pub fn write_atomic(target: &Path, content: &[u8]) -> io::Result<()> {
    let parent = target
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = target.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Path has no file name: {}", target.display()),
        )
    })?;

    let (mut file, temp_path) = create_temp_file(parent, &file_name.to_string_lossy())?;

    #[cfg(unix)]
    {
        if let Ok(metadata) = std::fs::metadata(target)
            && let Err(err) = std::fs::set_permissions(&temp_path, metadata.permissions())
        {
            let _ = std::fs::remove_file(&temp_path);
            return Err(err);
        }
    }

    let written = file.write_all(content).and_then(|_| file.sync_all());
    if let Err(err) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(err);
    }
    drop(file);

    if let Err(err) = std::fs::rename(&temp_path, target) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(err);
    }

    #[cfg(unix)]
    {
        if let Err(err) = File::open(parent).and_then(|dir| dir.sync_all()) {
            log::warn!("Directory sync failed for {}: {}", parent.display(), err);
        }
    }

    Ok(())
}

fn create_temp_file(dir: &Path, base: &str) -> io::Result<(File, PathBuf)> {
    for attempt in 0..MAX_TEMP_ATTEMPTS {
        let candidate = dir.join(format!(".{}.tmp.{}.{}", base, std::process::id(), attempt));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(file) => return Ok((file, candidate)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("No free temp file name for {} in {}", base, dir.display()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_fixtures::TestFixtureRoot;

    #[test]
    fn replaces_existing_content() {
        let fixture = TestFixtureRoot::new_unique("atomic-write").unwrap();
        let target = fixture.path().join("posts.yaml");
        std::fs::write(&target, "old").unwrap();

        write_atomic(&target, b"new").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn leaves_no_temp_files_behind() {
        let fixture = TestFixtureRoot::new_unique("atomic-clean").unwrap();
        let target = fixture.path().join("users.yaml");

        write_atomic(&target, b"a: 1\n").unwrap();

        let names: Vec<String> = std::fs::read_dir(fixture.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["users.yaml".to_string()]);
    }
}
