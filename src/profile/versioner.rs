//! Profile schema migration
//!
//! Profiles written by older releases are upgraded one step at a time until
//! they reach [`CURRENT_VERSION`], then completed against the known-key set.

use tracing::{debug, warn};

use crate::constants::store::CURRENT_VERSION;
use crate::settings::{SettingsMap, keys};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStatus {
    Current,
    /// Older than the running schema; migrated on load
    Outdated,
    /// Newer than the running schema; loaded as-is
    TooNew,
}

pub fn status(version: u32) -> VersionStatus {
    match version.cmp(&CURRENT_VERSION) {
        std::cmp::Ordering::Less => VersionStatus::Outdated,
        std::cmp::Ordering::Equal => VersionStatus::Current,
        std::cmp::Ordering::Greater => VersionStatus::TooNew,
    }
}

/// Keys renamed between version 1 and 2
const V1_RENAMES: &[(&str, &str)] = &[
    ("indent_size", keys::INDENTATION_SIZE),
    ("blank_lines_before_first_decl", keys::BLANK_LINES_BEFORE_FIRST_CLASS_BODY_DECLARATION),
    ("comment_line_width", keys::COMMENT_LINE_LENGTH),
];

fn v1_to_v2(settings: &mut SettingsMap) {
    for (old, new) in V1_RENAMES {
        if let Some(value) = settings.remove(old) {
            debug!(from = old, to = new, "Renaming legacy key");
            settings.insert(*new, value);
        }
    }
}

/// Version 3 switched `insert_space_*` values from booleans to
/// insert/do_not_insert tokens
fn v2_to_v3(settings: &mut SettingsMap) {
    let rewrites: Vec<(String, &str)> = settings
        .iter()
        .filter(|(key, _)| key.starts_with("insert_space_"))
        .filter_map(|(key, value)| match value {
            keys::TRUE => Some((key.to_string(), keys::INSERT)),
            keys::FALSE => Some((key.to_string(), keys::DO_NOT_INSERT)),
            _ => None,
        })
        .collect();
    for (key, value) in rewrites {
        settings.insert(key, value);
    }
}

/// Migrate `raw` from `version` to the current schema, drop unknown keys and
/// default missing ones
pub fn update_and_complete(mut raw: SettingsMap, version: u32) -> SettingsMap {
    match status(version) {
        VersionStatus::TooNew => {
            warn!(
                version,
                current = CURRENT_VERSION,
                "Profile version is newer than supported, loading without migration"
            );
        }
        VersionStatus::Outdated => {
            if version < 2 {
                v1_to_v2(&mut raw);
            }
            if version < 3 {
                v2_to_v3(&mut raw);
            }
        }
        VersionStatus::Current => {}
    }

    raw.retain_known();
    raw.complete();
    raw
}

/// Version a profile carries after [`update_and_complete`]
pub fn migrated_version(version: u32) -> u32 {
    version.max(CURRENT_VERSION)
}
