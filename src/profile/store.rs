//! Profile store: XML persistence for custom profiles
//!
//! Document layout:
//!
//! ```xml
//! <profiles version="3">
//!     <profile kind="CodeFormatterProfile" name="Foo" version="3">
//!         <setting id="tab_char" value="space"/>
//!     </profile>
//! </profiles>
//! ```
//!
//! Only custom profiles are written. Reading never returns built-in or shared
//! profiles.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::constants::store::{
    CURRENT_VERSION, INDENT_WIDTH, PROFILE_KIND, PROFILE_TAG, ROOT_TAG, SETTING_TAG,
};
use crate::error::StoreError;
use crate::profile::versioner::{self, VersionStatus};
use crate::profile::{CustomProfile, Profile};
use crate::settings::SettingsMap;

/// Profile element being assembled while its settings are read
struct PendingProfile {
    name: String,
    version: Option<u32>,
    kind: Option<String>,
    settings: SettingsMap,
}

/// Nesting position inside the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Depth {
    Outside,
    Root,
    Profile,
    Setting,
}

fn collect_attrs(e: &BytesStart, reader: &Reader<&[u8]>) -> Result<HashMap<String, String>, StoreError> {
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| StoreError::parse(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|err| StoreError::parse(err.to_string()))?;
        attrs.insert(key, value.into_owned());
    }
    Ok(attrs)
}

fn parse_version(attrs: &HashMap<String, String>, element: &str) -> Result<Option<u32>, StoreError> {
    match attrs.get("version") {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<u32>().map(Some).map_err(|_| {
            StoreError::parse(format!("<{element}> has non-integer version '{raw}'"))
        }),
    }
}

fn tag_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn begin_profile(attrs: &HashMap<String, String>) -> Result<PendingProfile, StoreError> {
    let name = attrs
        .get("name")
        .ok_or_else(|| StoreError::parse("<profile> is missing the name attribute"))?;
    Ok(PendingProfile {
        name: name.clone(),
        version: parse_version(attrs, PROFILE_TAG)?,
        kind: attrs.get("kind").cloned(),
        settings: SettingsMap::new(),
    })
}

fn read_setting(attrs: &HashMap<String, String>, pending: &mut PendingProfile) -> Result<(), StoreError> {
    let (Some(id), Some(value)) = (attrs.get("id"), attrs.get("value")) else {
        return Err(StoreError::parse(format!(
            "<setting> in profile '{}' needs both id and value",
            pending.name
        )));
    };
    pending.settings.insert(id.as_str(), value.as_str());
    Ok(())
}

fn finish_profile(pending: PendingProfile, root_version: u32, profiles: &mut Vec<Profile>) {
    if let Some(kind) = pending.kind.as_deref() {
        if kind != PROFILE_KIND {
            debug!(profile = %pending.name, kind, "Skipping profile of foreign kind");
            return;
        }
    }

    let version = pending.version.unwrap_or(root_version);
    if versioner::status(version) == VersionStatus::TooNew {
        warn!(
            profile = %pending.name,
            version,
            current = CURRENT_VERSION,
            "Profile was written by a newer release"
        );
    }

    let settings = versioner::update_and_complete(pending.settings, version);
    profiles.push(Profile::Custom(CustomProfile::new(
        pending.name,
        settings,
        versioner::migrated_version(version),
    )));
}

/// Parse a profile store document
pub fn read_str(xml: &str) -> Result<Vec<Profile>, StoreError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut depth = Depth::Outside;
    let mut root_version: Option<u32> = None;
    let mut pending: Option<PendingProfile> = None;
    let mut profiles = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| StoreError::parse(err.to_string()))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let empty = matches!(event, Event::Empty(_));
                let name = tag_name(e);
                let attrs = collect_attrs(e, &reader)?;

                match (depth, name.as_str()) {
                    (Depth::Outside, ROOT_TAG) if root_version.is_none() => {
                        let version = parse_version(&attrs, ROOT_TAG)?.ok_or_else(|| {
                            StoreError::parse("<profiles> is missing the version attribute")
                        })?;
                        root_version = Some(version);
                        if !empty {
                            depth = Depth::Root;
                        }
                    }
                    (Depth::Outside, _) if root_version.is_some() => {
                        return Err(StoreError::parse(format!(
                            "unexpected <{name}> after the root element"
                        )));
                    }
                    (Depth::Outside, _) => {
                        return Err(StoreError::parse(format!(
                            "expected <{ROOT_TAG}> root element, found <{name}>"
                        )));
                    }
                    (Depth::Root, PROFILE_TAG) => {
                        let profile = begin_profile(&attrs)?;
                        if empty {
                            finish_profile(profile, root_version.unwrap_or(CURRENT_VERSION), &mut profiles);
                        } else {
                            pending = Some(profile);
                            depth = Depth::Profile;
                        }
                    }
                    (Depth::Profile, SETTING_TAG) => {
                        if let Some(profile) = pending.as_mut() {
                            read_setting(&attrs, profile)?;
                        }
                        if !empty {
                            depth = Depth::Setting;
                        }
                    }
                    (_, _) => {
                        return Err(StoreError::parse(format!("unexpected <{name}> element")));
                    }
                }
            }
            Event::End(_) => {
                depth = match depth {
                    Depth::Setting => Depth::Profile,
                    Depth::Profile => {
                        if let Some(profile) = pending.take() {
                            finish_profile(profile, root_version.unwrap_or(CURRENT_VERSION), &mut profiles);
                        }
                        Depth::Root
                    }
                    Depth::Root | Depth::Outside => Depth::Outside,
                };
            }
            Event::Eof => break,
            // Declarations, comments and whitespace carry no data
            _ => {}
        }
        buf.clear();
    }

    if root_version.is_none() {
        return Err(StoreError::parse("document has no <profiles> root element"));
    }
    if depth != Depth::Outside {
        return Err(StoreError::parse("document ended inside an open element"));
    }

    info!(count = profiles.len(), "Read profiles from store document");
    Ok(profiles)
}

/// Read profiles from `path`. A missing file yields no profiles.
pub fn read_file(path: &Path) -> Result<Vec<Profile>, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "Profile store not found, starting with no custom profiles");
            return Ok(Vec::new());
        }
        Err(err) => return Err(StoreError::io(path, err)),
    };
    read_str(&contents)
}

fn serialization(err: impl std::fmt::Display) -> StoreError {
    StoreError::Serialization(err.to_string())
}

/// Serialize the custom profiles among `profiles` to a store document
pub fn to_xml_string(profiles: &[Profile]) -> Result<String, StoreError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))
        .map_err(serialization)?;

    let root_version = CURRENT_VERSION.to_string();
    let mut root = BytesStart::new(ROOT_TAG);
    root.push_attribute(("version", root_version.as_str()));
    writer.write_event(Event::Start(root)).map_err(serialization)?;

    for profile in profiles.iter().filter(|p| p.is_profile_to_save()) {
        let version = profile.version().to_string();
        let mut element = BytesStart::new(PROFILE_TAG);
        element.push_attribute(("kind", PROFILE_KIND));
        element.push_attribute(("name", profile.name()));
        element.push_attribute(("version", version.as_str()));
        writer.write_event(Event::Start(element)).map_err(serialization)?;

        let mut settings = profile.settings().known_subset();
        settings.complete();
        for (id, value) in settings.canonical_entries() {
            let mut setting = BytesStart::new(SETTING_TAG);
            setting.push_attribute(("id", id));
            setting.push_attribute(("value", value));
            writer.write_event(Event::Empty(setting)).map_err(serialization)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(PROFILE_TAG)))
            .map_err(serialization)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(ROOT_TAG)))
        .map_err(serialization)?;

    String::from_utf8(writer.into_inner()).map_err(serialization)
}

/// Write the custom profiles among `profiles` to `path`, replacing the file
/// only once the new document is fully on disk
pub fn write_file(profiles: &[Profile], path: &Path) -> Result<(), StoreError> {
    let xml = to_xml_string(profiles)?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;

    let tmp_file = NamedTempFile::new_in(parent).map_err(|err| StoreError::io(parent, err))?;
    fs::write(tmp_file.path(), xml).map_err(|err| StoreError::io(tmp_file.path(), err))?;
    tmp_file
        .persist(path)
        .map_err(|err| StoreError::io(path, err.error))?;

    let saved = profiles.iter().filter(|p| p.is_profile_to_save()).count();
    info!(path = %path.display(), count = saved, "Saved profile store");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::builtin_profiles;
    use crate::settings::keys;
    use pretty_assertions::assert_eq;

    fn custom(name: &str, pairs: &[(&str, &str)]) -> Profile {
        let mut settings: SettingsMap = pairs.iter().copied().collect();
        settings.complete();
        Profile::Custom(CustomProfile::new(name, settings, CURRENT_VERSION))
    }

    #[test]
    fn test_read_single_profile() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <profiles version="3">
                <profile name="Foo" version="3">
                    <setting id="tab_char" value="space"/>
                    <setting id="tab_size" value="4"/>
                </profile>
            </profiles>"#;

        let profiles = read_str(xml).unwrap();
        assert_eq!(profiles.len(), 1);
        let foo = &profiles[0];
        assert!(foo.is_custom());
        assert_eq!(foo.name(), "Foo");
        assert_eq!(foo.settings().get(keys::TAB_CHAR), Some("space"));
        assert_eq!(foo.settings().get(keys::TAB_SIZE), Some("4"));
        // missing known keys are defaulted
        assert_eq!(foo.settings().get(keys::LINE_SPLIT), Some("120"));
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let xml = r#"<profiles version="3"><profile name="Foo">
            <setting id="mystery" value="1"/></profile></profiles>"#;
        let profiles = read_str(xml).unwrap();
        assert_eq!(profiles[0].settings().get("mystery"), None);
        assert_eq!(profiles[0].settings().len(), keys::KNOWN_KEYS.len());
    }

    #[test]
    fn test_empty_root() {
        assert!(read_str(r#"<profiles version="3"/>"#).unwrap().is_empty());
        assert!(read_str(r#"<profiles version="3"></profiles>"#).unwrap().is_empty());
    }

    #[test]
    fn test_profile_version_defaults_to_root_version() {
        let xml = r#"<profiles version="1"><profile name="Old">
            <setting id="indent_size" value="2"/></profile></profiles>"#;
        let profiles = read_str(xml).unwrap();
        assert_eq!(profiles[0].settings().get(keys::INDENTATION_SIZE), Some("2"));
        assert_eq!(profiles[0].version(), CURRENT_VERSION);
    }

    #[test]
    fn test_too_new_profile_still_loads() {
        let xml = r#"<profiles version="3"><profile name="Future" version="99">
            <setting id="tab_size" value="3"/></profile></profiles>"#;
        let profiles = read_str(xml).unwrap();
        assert_eq!(profiles[0].version(), 99);
        assert_eq!(profiles[0].version_status(), VersionStatus::TooNew);
        assert_eq!(profiles[0].settings().get(keys::TAB_SIZE), Some("3"));
    }

    #[test]
    fn test_foreign_kind_is_skipped() {
        let xml = r#"<profiles version="3">
            <profile kind="CleanUpProfile" name="Other"/>
            <profile kind="CodeFormatterProfile" name="Mine"/>
        </profiles>"#;
        let profiles = read_str(xml).unwrap();
        let names: Vec<&str> = profiles.iter().map(Profile::name).collect();
        assert_eq!(names, vec!["Mine"]);
    }

    #[test]
    fn test_malformed_documents() {
        let cases = [
            "",
            r#"<settings version="3"/>"#,
            r#"<profiles/>"#,
            r#"<profiles version="three"/>"#,
            r#"<profiles version="3"><setting id="a" value="b"/></profiles>"#,
            r#"<profiles version="3"><profile name="x"><option/></profile></profiles>"#,
            r#"<profiles version="3"><profile version="3"/></profiles>"#,
            r#"<profiles version="3"><profile name="x"><setting id="a"/></profile></profiles>"#,
            r#"<profiles version="3"><profile name="x" version="v2"/></profiles>"#,
            r#"<profiles version="3"/><profiles version="3"/>"#,
        ];
        for xml in cases {
            match read_str(xml) {
                Err(StoreError::Parse(_)) => {}
                other => panic!("expected parse error for {xml:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_round_trip() {
        let profiles = vec![
            custom("Foo", &[(keys::TAB_CHAR, "space"), (keys::TAB_SIZE, "4")]),
            custom("Bar & <Baz>", &[(keys::DISABLING_TAG, "\"off\" & <stop>")]),
        ];
        let xml = to_xml_string(&profiles).unwrap();
        let read = read_str(&xml).unwrap();
        assert_eq!(read, profiles);
    }

    #[test]
    fn test_write_skips_builtin_and_shared() {
        let mut profiles = builtin_profiles();
        profiles.push(Profile::Shared(crate::profile::SharedProfile {
            name: "Unmanaged profile".to_string(),
            settings: SettingsMap::defaults(),
            version: CURRENT_VERSION,
        }));
        profiles.push(custom("Only", &[]));

        let read = read_str(&to_xml_string(&profiles).unwrap()).unwrap();
        let names: Vec<&str> = read.iter().map(Profile::name).collect();
        assert_eq!(names, vec!["Only"]);
    }

    #[test]
    fn test_written_settings_are_canonical_and_complete() {
        let xml = to_xml_string(&[custom("Foo", &[("mystery", "1")])]).unwrap();
        assert!(!xml.contains("mystery"));
        let first = xml.find(r#"id="tab_char""#).unwrap();
        let last = xml.find(r#"id="ui_show_whitespace""#).unwrap();
        assert!(first < last);
        assert_eq!(xml.matches("<setting ").count(), keys::KNOWN_KEYS.len());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let profiles = read_file(&dir.path().join("absent.xml")).unwrap();
        assert!(profiles.is_empty());
    }

    #[test]
    fn test_write_file_replaces_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("profiles.xml");

        write_file(&[custom("First", &[])], &path).unwrap();
        write_file(&[custom("Second", &[(keys::TAB_SIZE, "2")])], &path).unwrap();

        let read = read_file(&path).unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].name(), "Second");
        assert_eq!(read[0].settings().get(keys::TAB_SIZE), Some("2"));
    }

    #[test]
    fn test_failed_persist_keeps_previous_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.xml");
        let original = vec![custom("Foo", &[(keys::TAB_SIZE, "2")])];
        write_file(&original, &path).unwrap();

        // a non-empty directory cannot be replaced by a file
        let occupied = dir.path().join("occupied");
        fs::create_dir(&occupied).unwrap();
        fs::write(occupied.join("keep.txt"), "keep").unwrap();

        let result = write_file(&[custom("Bar", &[])], &occupied);
        assert!(matches!(result, Err(StoreError::Io { path: ref failed, .. }) if failed == &occupied));
        assert!(occupied.join("keep.txt").is_file());
        assert_eq!(read_file(&path).unwrap(), original);
        // the temporary file is cleaned up
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_parent_that_is_a_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.xml");
        let original = vec![custom("Foo", &[])];
        write_file(&original, &path).unwrap();

        let result = write_file(&[custom("Bar", &[])], &path.join("inner.xml"));
        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert_eq!(read_file(&path).unwrap(), original);
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.xml");
        fs::write(&path, "<profiles>").unwrap();
        assert!(matches!(read_file(&path), Err(StoreError::Parse(_))));
    }
}
