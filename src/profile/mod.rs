//! Profile model
//!
//! A profile is a named, versioned [`SettingsMap`]. Three kinds exist:
//! - **BuiltIn**: shipped with the crate, immutable, ordered by priority
//! - **Custom**: created by the user, renamable and deletable, persisted
//! - **Shared**: synthesized from project settings that match no known
//!   profile; becomes Custom when renamed

pub mod events;
pub mod manager;
pub mod store;
pub mod versioner;

use std::cmp::Ordering;

use crate::constants::profiles::{
    CONVENTIONS_ID, CONVENTIONS_NAME, CONVENTIONS_PRIORITY, CUSTOM_ID_PREFIX, DEFAULT_ID,
    DEFAULT_NAME, DEFAULT_PRIORITY, SHARED_ID,
};
use crate::constants::store::CURRENT_VERSION;
use crate::settings::{SettingsMap, keys};

pub use events::{ProfileEvent, ProfileEventKind, SubscriptionId};
pub use manager::ProfileManager;
pub use versioner::VersionStatus;

pub type ProfileId = String;

/// ID a custom profile with this name is stored under
pub fn custom_id(name: &str) -> ProfileId {
    format!("{CUSTOM_ID_PREFIX}{name}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltInProfile {
    pub id: ProfileId,
    pub name: String,
    pub settings: SettingsMap,
    pub priority: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomProfile {
    id: ProfileId,
    name: String,
    pub settings: SettingsMap,
    pub version: u32,
}

impl CustomProfile {
    pub fn new(name: impl Into<String>, settings: SettingsMap, version: u32) -> Self {
        let name = name.into().trim().to_string();
        Self {
            id: custom_id(&name),
            name,
            settings,
            version,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Re-key this profile under a new name
    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.id = custom_id(name);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedProfile {
    pub name: String,
    pub settings: SettingsMap,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    BuiltIn(BuiltInProfile),
    Custom(CustomProfile),
    Shared(SharedProfile),
}

impl Profile {
    pub fn id(&self) -> &str {
        match self {
            Profile::BuiltIn(p) => &p.id,
            Profile::Custom(p) => p.id(),
            Profile::Shared(_) => SHARED_ID,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Profile::BuiltIn(p) => &p.name,
            Profile::Custom(p) => p.name(),
            Profile::Shared(p) => &p.name,
        }
    }

    pub fn settings(&self) -> &SettingsMap {
        match self {
            Profile::BuiltIn(p) => &p.settings,
            Profile::Custom(p) => &p.settings,
            Profile::Shared(p) => &p.settings,
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            Profile::BuiltIn(_) => CURRENT_VERSION,
            Profile::Custom(p) => p.version,
            Profile::Shared(p) => p.version,
        }
    }

    pub fn version_status(&self) -> VersionStatus {
        versioner::status(self.version())
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Profile::BuiltIn(_))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Profile::Custom(_))
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Profile::Shared(_))
    }

    /// Only custom profiles are written to the profile store
    pub fn is_profile_to_save(&self) -> bool {
        self.is_custom()
    }

    pub fn has_equal_settings(&self, other: &SettingsMap) -> bool {
        self.settings().equal_on_known(other)
    }

    /// Sorted order: built-ins by priority first, everything else by
    /// case-insensitive name
    pub fn sort_cmp(&self, other: &Profile) -> Ordering {
        match (self, other) {
            (Profile::BuiltIn(a), Profile::BuiltIn(b)) => a.priority.cmp(&b.priority),
            (Profile::BuiltIn(_), _) => Ordering::Less,
            (_, Profile::BuiltIn(_)) => Ordering::Greater,
            _ => self
                .name()
                .to_lowercase()
                .cmp(&other.name().to_lowercase())
                .then_with(|| self.name().cmp(other.name())),
        }
    }
}

/// The two built-in profiles, in priority order
pub fn builtin_profiles() -> Vec<Profile> {
    vec![
        Profile::BuiltIn(BuiltInProfile {
            id: DEFAULT_ID.to_string(),
            name: DEFAULT_NAME.to_string(),
            settings: SettingsMap::defaults(),
            priority: DEFAULT_PRIORITY,
        }),
        Profile::BuiltIn(BuiltInProfile {
            id: CONVENTIONS_ID.to_string(),
            name: CONVENTIONS_NAME.to_string(),
            settings: conventions_settings(),
            priority: CONVENTIONS_PRIORITY,
        }),
    ]
}

/// Conventions profile: mixed indentation with 4-column indents and
/// 8-column tabs, wider blank-line spacing
fn conventions_settings() -> SettingsMap {
    let mut settings = SettingsMap::defaults();
    settings.insert(keys::TAB_CHAR, keys::TAB_POLICY_MIXED);
    settings.insert(keys::TAB_SIZE, "8");
    settings.insert(keys::INDENTATION_SIZE, "4");
    settings.insert(keys::CONTINUATION_INDENTATION, "2");
    settings.insert(keys::LINE_SPLIT, "80");
    settings.insert(keys::COMMENT_LINE_LENGTH, "80");
    settings.insert(keys::BLANK_LINES_BEFORE_FIRST_CLASS_BODY_DECLARATION, "1");
    settings.insert(keys::INSERT_NEW_LINE_IN_EMPTY_METHOD_BODY, keys::DO_NOT_INSERT);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_id_tracks_name() {
        let mut profile = CustomProfile::new("  Foo ", SettingsMap::defaults(), CURRENT_VERSION);
        assert_eq!(profile.name(), "Foo");
        assert_eq!(profile.id(), "_Foo");

        profile.set_name("Bar");
        assert_eq!(profile.id(), "_Bar");
    }

    #[test]
    fn test_sort_builtins_first_then_case_insensitive_name() {
        let mut profiles = builtin_profiles();
        profiles.push(Profile::Custom(CustomProfile::new("beta", SettingsMap::defaults(), 3)));
        profiles.push(Profile::Custom(CustomProfile::new("Alpha", SettingsMap::defaults(), 3)));
        profiles.push(Profile::Shared(SharedProfile {
            name: "Unmanaged profile".to_string(),
            settings: SettingsMap::defaults(),
            version: 3,
        }));
        profiles.reverse();
        profiles.sort_by(Profile::sort_cmp);

        let names: Vec<&str> = profiles.iter().map(Profile::name).collect();
        assert_eq!(
            names,
            vec![DEFAULT_NAME, CONVENTIONS_NAME, "Alpha", "beta", "Unmanaged profile"]
        );
    }

    #[test]
    fn test_only_custom_profiles_are_saved() {
        let builtins = builtin_profiles();
        assert!(builtins.iter().all(|p| !p.is_profile_to_save()));
        let custom = Profile::Custom(CustomProfile::new("x", SettingsMap::new(), 3));
        assert!(custom.is_profile_to_save());
    }
}
