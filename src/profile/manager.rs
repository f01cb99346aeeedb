//! Profile manager
//!
//! Owns every profile, the current selection and the event bus. All mutation
//! goes through here; other components only borrow the selected profile.

use anyhow::Result;
use tracing::{debug, info};

use crate::config::port::{ConfigPort, Scope};
use crate::constants::port::PROFILE_KEY;
use crate::constants::profiles::{DEFAULT_ID, SHARED_ID, SHARED_NAME};
use crate::constants::store::CURRENT_VERSION;
use crate::profile::events::{EventBus, ProfileEvent, SubscriptionId};
use crate::profile::{CustomProfile, Profile, ProfileId, SharedProfile, builtin_profiles, custom_id};
use crate::settings::{SettingsMap, keys::KNOWN_KEYS};

/// Known-key settings stored directly in `scope`, completed with defaults.
/// `None` when the scope holds none of them.
pub fn read_scope_settings(port: &impl ConfigPort, scope: Scope) -> Option<SettingsMap> {
    let mut settings = SettingsMap::new();
    for def in KNOWN_KEYS {
        if let Some(value) = port.get(scope, def.id) {
            settings.insert(def.id, value);
        }
    }
    if settings.is_empty() {
        return None;
    }
    settings.complete();
    Some(settings)
}

pub struct ProfileManager<P: ConfigPort> {
    /// Always kept in sorted order
    profiles: Vec<Profile>,
    selected: ProfileId,
    port: P,
    scope: Scope,
    events: EventBus<ProfileEvent>,
}

impl<P: ConfigPort> ProfileManager<P> {
    /// Build the manager for `scope`, reading the last selection and (for
    /// project scope) the project's own settings from `port`
    pub fn new(stored: Vec<Profile>, port: P, scope: Scope) -> Self {
        let (project_settings, project_profile) = match scope {
            Scope::Project => (
                read_scope_settings(&port, Scope::Project),
                port.get(Scope::Project, PROFILE_KEY),
            ),
            Scope::Workspace => (None, None),
        };
        Self::build(stored, port, scope, project_settings, project_profile)
    }

    /// Build the manager with project settings supplied by the caller
    pub fn with_project_settings(
        stored: Vec<Profile>,
        project_settings: Option<SettingsMap>,
        port: P,
        scope: Scope,
    ) -> Self {
        Self::build(stored, port, scope, project_settings, None)
    }

    fn build(
        stored: Vec<Profile>,
        port: P,
        scope: Scope,
        project_settings: Option<SettingsMap>,
        project_profile: Option<ProfileId>,
    ) -> Self {
        let mut profiles = builtin_profiles();
        for profile in stored {
            match profile {
                Profile::Custom(custom) => {
                    profiles.retain(|p| !(p.is_custom() && p.id() == custom.id()));
                    profiles.push(Profile::Custom(custom));
                }
                other => debug!(profile = %other.name(), "Ignoring non-custom stored profile"),
            }
        }
        profiles.sort_by(Profile::sort_cmp);

        let mut selected = port
            .get(Scope::Workspace, PROFILE_KEY)
            .filter(|id| profiles.iter().any(|p| p.id() == id))
            .unwrap_or_else(|| DEFAULT_ID.to_string());

        if let Some(mut settings) = project_settings {
            settings.complete();
            let hinted = project_profile.filter(|id| {
                profiles
                    .iter()
                    .any(|p| p.id() == id && p.has_equal_settings(&settings))
            });
            let matching = hinted.or_else(|| {
                profiles
                    .iter()
                    .find(|p| p.has_equal_settings(&settings))
                    .map(|p| p.id().to_string())
            });

            selected = match matching {
                Some(id) => {
                    debug!(profile = %id, "Project settings match a known profile");
                    id
                }
                None => {
                    info!("Project settings match no known profile, creating shared profile");
                    profiles.push(Profile::Shared(SharedProfile {
                        name: SHARED_NAME.to_string(),
                        settings,
                        version: CURRENT_VERSION,
                    }));
                    profiles.sort_by(Profile::sort_cmp);
                    SHARED_ID.to_string()
                }
            };
        }

        info!(count = profiles.len(), selected = %selected, "Initialized profile manager");
        Self {
            profiles,
            selected,
            port,
            scope,
            events: EventBus::new(),
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&ProfileEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn emit(&mut self, event: ProfileEvent) {
        debug!(event = ?event, "Publishing profile event");
        self.events.publish(&event);
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn sorted_profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn sorted_names(&self) -> Vec<&str> {
        self.profiles.iter().map(Profile::name).collect()
    }

    /// Profiles the store persists, in sorted order
    pub fn custom_profiles(&self) -> Vec<Profile> {
        self.profiles
            .iter()
            .filter(|p| p.is_profile_to_save())
            .cloned()
            .collect()
    }

    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id() == id)
    }

    pub fn profile_by_name(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name() == name)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.profile_by_name(name).is_some()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.profiles.iter().position(|p| p.id() == id)
    }

    fn selected_index(&self) -> usize {
        // built-ins are never removed, so index 0 always exists
        self.position(&self.selected).unwrap_or(0)
    }

    pub fn selected(&self) -> &Profile {
        &self.profiles[self.selected_index()]
    }

    pub fn selected_id(&self) -> &str {
        self.selected().id()
    }

    fn sort(&mut self) {
        self.profiles.sort_by(Profile::sort_cmp);
    }

    /// Select the profile with `id`. Unknown or already selected profiles
    /// are ignored.
    pub fn set_selected(&mut self, id: &str) -> bool {
        if self.selected == id {
            return false;
        }
        if self.position(id).is_none() {
            debug!(profile = %id, "Cannot select unknown profile");
            return false;
        }
        self.selected = id.to_string();
        info!(profile = %id, "Selected profile");
        self.emit(ProfileEvent::SelectionChanged {
            selected: self.selected.clone(),
        });
        true
    }

    /// Add a custom profile, replacing any custom profile with the same ID,
    /// and select it
    pub fn add_profile(&mut self, profile: Profile) -> bool {
        let Profile::Custom(custom) = profile else {
            debug!(profile = %profile.name(), "Only custom profiles can be added");
            return false;
        };

        let id = custom.id().to_string();
        let before = self.profiles.len();
        self.profiles.retain(|p| !(p.is_custom() && p.id() == id));
        if self.profiles.len() != before {
            info!(profile = %id, "Replacing existing profile");
        }

        self.profiles.push(Profile::Custom(custom));
        self.sort();
        self.selected = id.clone();
        info!(profile = %id, "Created profile");
        self.emit(ProfileEvent::ProfileCreated { created: id });
        true
    }

    /// Create a custom profile named `name` from the settings of `base_id`
    pub fn new_profile(&mut self, name: &str, base_id: &str) -> Option<ProfileId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let settings = self.profile(base_id)?.settings().clone();
        let profile = CustomProfile::new(name, settings, CURRENT_VERSION);
        let id = profile.id().to_string();
        self.add_profile(Profile::Custom(profile));
        Some(id)
    }

    /// Delete the selected profile if it is a custom profile, then select its
    /// neighbour in sorted order
    pub fn delete_selected(&mut self) -> bool {
        if !self.selected().is_custom() {
            debug!(profile = %self.selected, "Selected profile is not deletable");
            return false;
        }

        let index = self.selected_index();
        let removed = self.profiles.remove(index);
        let next = index.min(self.profiles.len() - 1);
        self.selected = self.profiles[next].id().to_string();

        self.update_project_reference(removed.id(), None);
        info!(profile = %removed.id(), selected = %self.selected, "Deleted profile");
        self.emit(ProfileEvent::ProfileDeleted {
            deleted: removed.id().to_string(),
        });
        true
    }

    /// Rename a custom profile, or turn the shared profile into a custom one.
    /// Refused when another profile already has the new name's ID.
    pub fn rename(&mut self, id: &str, new_name: &str) -> bool {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return false;
        }
        let Some(index) = self.position(id) else {
            debug!(profile = %id, "Cannot rename unknown profile");
            return false;
        };

        let new_id = custom_id(new_name);
        if new_id != id && self.position(&new_id).is_some() {
            debug!(profile = %id, taken = %new_id, "Rename target already exists");
            return false;
        }

        match &self.profiles[index] {
            Profile::BuiltIn(_) => {
                debug!(profile = %id, "Built-in profiles cannot be renamed");
                false
            }
            Profile::Custom(custom) if custom.name() == new_name => false,
            Profile::Custom(_) => {
                self.rename_custom(index, new_name);
                true
            }
            Profile::Shared(shared) => {
                let replacement = CustomProfile::new(new_name, shared.settings.clone(), shared.version);
                self.replace_shared(index, replacement);
                true
            }
        }
    }

    fn rename_custom(&mut self, index: usize, new_name: &str) {
        let mut profile = self.profiles.remove(index);
        let old_id = profile.id().to_string();
        if let Profile::Custom(custom) = &mut profile {
            custom.set_name(new_name);
        }
        let new_id = profile.id().to_string();

        self.profiles.push(profile);
        self.sort();

        if self.selected == old_id || self.position(&self.selected).is_none() {
            self.selected = new_id.clone();
        }
        self.update_project_reference(&old_id, Some(&new_id));

        info!(from = %old_id, to = %new_id, "Renamed profile");
        self.emit(ProfileEvent::ProfileRenamed { old_id, new_id });
    }

    fn replace_shared(&mut self, index: usize, replacement: CustomProfile) {
        self.profiles.remove(index);
        let new_id = replacement.id().to_string();
        self.profiles.push(Profile::Custom(replacement));
        self.sort();
        self.selected = new_id.clone();

        info!(profile = %new_id, "Converted shared profile to custom profile");
        self.emit(ProfileEvent::ProfileCreated {
            created: new_id.clone(),
        });
        self.emit(ProfileEvent::SelectionChanged { selected: new_id });
    }

    /// Replace the selected profile's settings. Built-in profiles are
    /// read-only.
    pub fn apply_settings(&mut self, mut settings: SettingsMap) -> bool {
        settings.complete();
        let index = self.selected_index();
        let target = match &mut self.profiles[index] {
            Profile::BuiltIn(_) => {
                debug!(profile = %self.selected, "Built-in profile settings are read-only");
                return false;
            }
            Profile::Custom(custom) => &mut custom.settings,
            Profile::Shared(shared) => &mut shared.settings,
        };
        if *target == settings {
            return false;
        }
        *target = settings;

        info!(profile = %self.selected, "Applied settings");
        self.emit(ProfileEvent::SettingsChanged {
            profile: self.selected.clone(),
        });
        true
    }

    /// Write the selected profile's settings to the bound scope, touching
    /// only keys whose stored value differs
    pub fn commit_changes(&mut self) -> Result<()> {
        let scope = self.scope;
        let profile = &self.profiles[self.selected_index()];

        let mut written = 0usize;
        for (key, value) in profile.settings().canonical_entries() {
            if self.port.get(scope, key).as_deref() != Some(value) {
                self.port.put(scope, key, value);
                written += 1;
            }
        }

        match scope {
            Scope::Workspace => {
                if self.port.get(scope, PROFILE_KEY).as_deref() != Some(profile.id()) {
                    self.port.put(scope, PROFILE_KEY, profile.id());
                }
            }
            Scope::Project if profile.is_shared() => self.port.remove(scope, PROFILE_KEY),
            Scope::Project => {
                if self.port.get(scope, PROFILE_KEY).as_deref() != Some(profile.id()) {
                    self.port.put(scope, PROFILE_KEY, profile.id());
                }
            }
        }

        info!(profile = %profile.id(), scope = ?scope, written, "Committed profile settings");
        self.port.flush(scope)
    }

    fn update_project_reference(&mut self, old_id: &str, new_id: Option<&str>) {
        if self.port.get(Scope::Project, PROFILE_KEY).as_deref() != Some(old_id) {
            return;
        }
        match new_id {
            Some(new_id) => self.port.put(Scope::Project, PROFILE_KEY, new_id),
            None => self.port.remove(Scope::Project, PROFILE_KEY),
        }
        debug!(from = %old_id, to = ?new_id, "Updated project profile reference");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::port::MemoryConfigPort;
    use crate::constants::profiles::{CONVENTIONS_ID, DEFAULT_NAME};
    use crate::profile::events::ProfileEventKind;
    use crate::profile::store;
    use crate::settings::keys;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn custom(name: &str, pairs: &[(&str, &str)]) -> Profile {
        let mut settings: SettingsMap = pairs.iter().copied().collect();
        settings.complete();
        Profile::Custom(CustomProfile::new(name, settings, CURRENT_VERSION))
    }

    fn manager(stored: Vec<Profile>) -> ProfileManager<MemoryConfigPort> {
        ProfileManager::new(stored, MemoryConfigPort::new(), Scope::Workspace)
    }

    fn record(manager: &mut ProfileManager<MemoryConfigPort>) -> Rc<RefCell<Vec<ProfileEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        manager.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        events
    }

    fn kinds(events: &Rc<RefCell<Vec<ProfileEvent>>>) -> Vec<ProfileEventKind> {
        events.borrow().iter().map(ProfileEvent::kind).collect()
    }

    #[test]
    fn test_initial_selection_defaults_to_builtin() {
        let m = manager(vec![custom("Foo", &[])]);
        assert_eq!(m.selected_id(), DEFAULT_ID);
        assert_eq!(m.selected().name(), DEFAULT_NAME);
    }

    #[test]
    fn test_initial_selection_from_last_selected() {
        let port = MemoryConfigPort::new().with(Scope::Workspace, PROFILE_KEY, "_Foo");
        let m = ProfileManager::new(vec![custom("Foo", &[])], port, Scope::Workspace);
        assert_eq!(m.selected_id(), "_Foo");

        let port = MemoryConfigPort::new().with(Scope::Workspace, PROFILE_KEY, "_Gone");
        let m = ProfileManager::new(vec![custom("Foo", &[])], port, Scope::Workspace);
        assert_eq!(m.selected_id(), DEFAULT_ID);
    }

    #[test]
    fn test_sorted_profiles() {
        let m = manager(vec![custom("zeta", &[]), custom("Alpha", &[]), custom("beta", &[])]);
        let names = m.sorted_names();
        assert_eq!(&names[2..], &["Alpha", "beta", "zeta"]);
        assert!(m.sorted_profiles()[0].is_builtin());
        assert!(m.sorted_profiles()[1].is_builtin());
    }

    #[test]
    fn test_duplicate_stored_ids_keep_last() {
        let m = manager(vec![
            custom("Foo", &[(keys::TAB_SIZE, "2")]),
            custom("Foo", &[(keys::TAB_SIZE, "8")]),
        ]);
        assert_eq!(m.sorted_profiles().len(), 3);
        assert_eq!(m.profile("_Foo").unwrap().settings().get(keys::TAB_SIZE), Some("8"));
    }

    #[test]
    fn test_set_selected_fires_once() {
        let mut m = manager(vec![custom("Foo", &[])]);
        let events = record(&mut m);

        assert!(m.set_selected("_Foo"));
        assert!(!m.set_selected("_Foo"));
        assert!(!m.set_selected("_Missing"));

        assert_eq!(m.selected_id(), "_Foo");
        assert_eq!(kinds(&events), vec![ProfileEventKind::SelectionChanged]);
    }

    #[test]
    fn test_add_profile_replaces_same_id() {
        let mut m = manager(vec![custom("Foo", &[(keys::TAB_SIZE, "2")])]);
        let events = record(&mut m);

        assert!(m.add_profile(custom("Foo", &[(keys::TAB_SIZE, "6")])));
        assert_eq!(m.sorted_profiles().len(), 3);
        assert_eq!(m.selected_id(), "_Foo");
        assert_eq!(m.selected().settings().get(keys::TAB_SIZE), Some("6"));
        assert_eq!(kinds(&events), vec![ProfileEventKind::ProfileCreated]);

        assert!(!m.add_profile(builtin_profiles().remove(0)));
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_delete_builtin_is_refused() {
        let mut m = manager(vec![custom("Foo", &[])]);
        let events = record(&mut m);
        let before = m.sorted_profiles().to_vec();

        assert!(m.selected().is_builtin());
        assert!(!m.delete_selected());
        assert_eq!(m.sorted_profiles(), before.as_slice());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_delete_selects_neighbour() {
        let mut m = manager(vec![custom("A", &[]), custom("B", &[]), custom("C", &[])]);
        let events = record(&mut m);

        m.set_selected("_B");
        assert!(m.delete_selected());
        assert_eq!(m.selected_id(), "_C");

        assert!(m.delete_selected());
        assert_eq!(m.selected_id(), "_A");

        assert!(m.delete_selected());
        assert_eq!(m.selected_id(), CONVENTIONS_ID);
        assert!(m.profile(m.selected_id()).is_some());

        assert_eq!(
            kinds(&events),
            vec![
                ProfileEventKind::SelectionChanged,
                ProfileEventKind::ProfileDeleted,
                ProfileEventKind::ProfileDeleted,
                ProfileEventKind::ProfileDeleted,
            ]
        );
    }

    #[test]
    fn test_selected_profile_from_store_document() {
        let xml = r#"<profiles version="3"><profile name="Foo" version="3">
            <setting id="tab_char" value="space"/>
            <setting id="tab_size" value="4"/>
        </profile></profiles>"#;
        let mut m = manager(store::read_str(xml).unwrap());

        assert!(m.set_selected(&custom_id("Foo")));
        assert_eq!(m.selected().settings().get(keys::TAB_SIZE), Some("4"));
        assert_eq!(m.selected().settings().get(keys::TAB_CHAR), Some("space"));
    }

    #[test]
    fn test_copy_builtin_then_rename() {
        let mut m = manager(Vec::new());
        let id = m.new_profile("Bar", DEFAULT_ID).unwrap();
        assert_eq!(m.selected_id(), id);

        let events = record(&mut m);
        assert!(m.rename(&id, "Bar2"));

        assert!(m.contains_name("Bar2"));
        assert!(!m.contains_name("Bar"));
        assert_eq!(m.selected().name(), "Bar2");
        assert_eq!(m.selected_id(), "_Bar2");
        assert_eq!(kinds(&events), vec![ProfileEventKind::ProfileRenamed]);
    }

    #[test]
    fn test_rename_noops() {
        let mut m = manager(vec![custom("Foo", &[])]);
        let events = record(&mut m);

        assert!(!m.rename("_Foo", "  Foo  "));
        assert!(!m.rename("_Foo", "   "));
        assert!(!m.rename(DEFAULT_ID, "Mine"));
        assert!(!m.rename("_Missing", "Other"));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_rename_onto_existing_name_is_refused() {
        let mut m = manager(vec![custom("A", &[]), custom("B", &[(keys::TAB_SIZE, "7")])]);
        m.set_selected("_B");
        let events = record(&mut m);

        assert!(!m.rename("_A", " B "));

        assert_eq!(m.sorted_profiles().len(), 4);
        assert!(m.profile("_A").is_some());
        assert_eq!(m.selected_id(), "_B");
        assert_eq!(m.selected().settings().get(keys::TAB_SIZE), Some("7"));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_rename_shared_onto_existing_name_is_refused() {
        let port = MemoryConfigPort::new().with(Scope::Project, keys::TAB_SIZE, "5");
        let mut m = ProfileManager::new(vec![custom("Team", &[])], port, Scope::Project);
        assert!(m.selected().is_shared());
        let events = record(&mut m);

        assert!(!m.rename(SHARED_ID, "Team"));
        assert!(m.selected().is_shared());
        assert_eq!(m.profile("_Team").map(|p| p.settings().get(keys::TAB_SIZE)), Some(Some("4")));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_custom_profiles_excludes_builtin_and_shared() {
        let port = MemoryConfigPort::new().with(Scope::Project, keys::TAB_SIZE, "5");
        let m = ProfileManager::new(vec![custom("Foo", &[]), custom("Bar", &[])], port, Scope::Project);

        let names: Vec<_> = m.custom_profiles().iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, vec!["Bar".to_string(), "Foo".to_string()]);
    }

    #[test]
    fn test_project_settings_matching_profile_are_selected() {
        let foo = custom("Foo", &[(keys::TAB_SIZE, "3")]);
        let project = foo.settings().clone();
        let m = ProfileManager::with_project_settings(
            vec![foo],
            Some(project),
            MemoryConfigPort::new(),
            Scope::Project,
        );
        assert_eq!(m.selected_id(), "_Foo");
        assert!(m.sorted_profiles().iter().all(|p| !p.is_shared()));
    }

    #[test]
    fn test_project_settings_without_match_create_shared_profile() {
        let port = MemoryConfigPort::new().with(Scope::Project, keys::TAB_SIZE, "5");
        let m = ProfileManager::new(vec![custom("Foo", &[])], port, Scope::Project);

        assert!(m.selected().is_shared());
        assert_eq!(m.selected().settings().get(keys::TAB_SIZE), Some("5"));
        assert_eq!(m.selected().settings().get(keys::LINE_SPLIT), Some("120"));
    }

    #[test]
    fn test_project_profile_hint() {
        let a = custom("A", &[]);
        let b = custom("B", &[]);
        let port = MemoryConfigPort::new()
            .with(Scope::Project, keys::TAB_CHAR, keys::TAB_POLICY_TAB)
            .with(Scope::Project, PROFILE_KEY, "_B");
        let m = ProfileManager::new(vec![a, b], port, Scope::Project);
        assert_eq!(m.selected_id(), "_B");
    }

    #[test]
    fn test_rename_shared_creates_custom() {
        let port = MemoryConfigPort::new().with(Scope::Project, keys::TAB_SIZE, "5");
        let mut m = ProfileManager::new(Vec::new(), port, Scope::Project);
        let events = record(&mut m);

        assert!(m.rename(SHARED_ID, "Team"));
        assert!(m.selected().is_custom());
        assert_eq!(m.selected_id(), "_Team");
        assert_eq!(m.selected().settings().get(keys::TAB_SIZE), Some("5"));
        assert!(m.profile(SHARED_ID).is_none());
        assert_eq!(
            kinds(&events),
            vec![ProfileEventKind::ProfileCreated, ProfileEventKind::SelectionChanged]
        );
    }

    #[test]
    fn test_shared_profile_cannot_be_deleted() {
        let port = MemoryConfigPort::new().with(Scope::Project, keys::TAB_SIZE, "5");
        let mut m = ProfileManager::new(Vec::new(), port, Scope::Project);
        assert!(m.selected().is_shared());
        assert!(!m.delete_selected());
    }

    #[test]
    fn test_apply_settings() {
        let mut m = manager(vec![custom("Foo", &[])]);
        let events = record(&mut m);

        let mut edited = m.selected().settings().clone();
        edited.insert(keys::LINE_SPLIT, "100");
        assert!(!m.apply_settings(edited.clone()));

        m.set_selected("_Foo");
        assert!(m.apply_settings(edited.clone()));
        assert!(!m.apply_settings(edited));
        assert_eq!(m.selected().settings().get(keys::LINE_SPLIT), Some("100"));
        assert_eq!(
            kinds(&events),
            vec![ProfileEventKind::SelectionChanged, ProfileEventKind::SettingsChanged]
        );
    }

    #[test]
    fn test_commit_writes_only_differences() {
        let mut m = manager(vec![custom("Foo", &[])]);
        m.set_selected("_Foo");

        m.commit_changes().unwrap();
        let first = m.port().writes();
        assert_eq!(first, keys::KNOWN_KEYS.len() + 1);
        assert_eq!(m.port().get(Scope::Workspace, PROFILE_KEY).as_deref(), Some("_Foo"));

        m.commit_changes().unwrap();
        assert_eq!(m.port().writes(), first);

        let mut edited = m.selected().settings().clone();
        edited.insert(keys::TAB_SIZE, "2");
        m.apply_settings(edited);
        m.commit_changes().unwrap();
        assert_eq!(m.port().writes(), first + 1);
        assert_eq!(m.port().flushes(), 3);
    }

    #[test]
    fn test_commit_shared_in_project_scope_clears_marker() {
        let port = MemoryConfigPort::new()
            .with(Scope::Project, keys::TAB_SIZE, "5")
            .with(Scope::Project, PROFILE_KEY, "_Gone");
        let mut m = ProfileManager::new(Vec::new(), port, Scope::Project);
        assert!(m.selected().is_shared());

        m.commit_changes().unwrap();
        assert_eq!(m.port().get(Scope::Project, PROFILE_KEY), None);
        assert_eq!(m.port().get(Scope::Workspace, PROFILE_KEY), None);
    }

    #[test]
    fn test_rename_and_delete_update_project_reference() {
        let port = MemoryConfigPort::new().with(Scope::Project, PROFILE_KEY, "_Foo");
        let mut m = ProfileManager::new(vec![custom("Foo", &[])], port, Scope::Workspace);

        m.rename("_Foo", "Renamed");
        assert_eq!(m.port().get(Scope::Project, PROFILE_KEY).as_deref(), Some("_Renamed"));

        m.set_selected("_Renamed");
        m.delete_selected();
        assert_eq!(m.port().get(Scope::Project, PROFILE_KEY), None);
    }
}
