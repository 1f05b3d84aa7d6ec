// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod atomic_file;
pub mod log_level_changer;
pub mod release_tracker;
pub mod test_config;
pub mod test_fixtures;

pub use log_level_changer::{LevelRule, init_logger};
pub use release_tracker::ReleaseTracker;
pub use test_config::{TestConfigBuilder, test_config};
