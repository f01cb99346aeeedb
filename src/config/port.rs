//! Scoped preference storage
//!
//! The profile manager never touches a concrete preference backend. It reads
//! and writes through a [`ConfigPort`], addressed by [`Scope`]: the
//! workspace (per-user) scope or the project scope.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::config::{APP_DIR, PROJECT_DIR, PROJECT_FILENAME, WORKSPACE_FILENAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Per-user settings; the outermost scope
    Workspace,
    /// Settings checked into a project
    Project,
}

pub trait ConfigPort {
    fn get(&self, scope: Scope, key: &str) -> Option<String>;
    fn put(&mut self, scope: Scope, key: &str, value: &str);
    fn remove(&mut self, scope: Scope, key: &str);
    fn flush(&mut self, scope: Scope) -> Result<()>;
}

/// In-memory port, counting writes so callers can observe skipped puts
#[derive(Debug, Default)]
pub struct MemoryConfigPort {
    values: HashMap<Scope, BTreeMap<String, String>>,
    writes: usize,
    flushes: usize,
}

impl MemoryConfigPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seeding that does not count as a write
    pub fn with(mut self, scope: Scope, key: &str, value: &str) -> Self {
        self.values
            .entry(scope)
            .or_default()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn scope_len(&self, scope: Scope) -> usize {
        self.values.get(&scope).map_or(0, BTreeMap::len)
    }
}

impl ConfigPort for MemoryConfigPort {
    fn get(&self, scope: Scope, key: &str) -> Option<String> {
        self.values.get(&scope)?.get(key).cloned()
    }

    fn put(&mut self, scope: Scope, key: &str, value: &str) {
        self.writes += 1;
        self.values
            .entry(scope)
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, scope: Scope, key: &str) {
        if let Some(values) = self.values.get_mut(&scope) {
            if values.remove(key).is_some() {
                self.writes += 1;
            }
        }
    }

    fn flush(&mut self, _scope: Scope) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

/// One JSON object file per scope
#[derive(Debug)]
pub struct JsonConfigPort {
    workspace_path: PathBuf,
    project_path: Option<PathBuf>,
    workspace: BTreeMap<String, String>,
    project: BTreeMap<String, String>,
    dirty: HashSet<Scope>,
}

fn load_scope_file(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {:?}", path))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse JSON settings from {:?}", path))
}

impl JsonConfigPort {
    pub fn open(workspace_path: PathBuf, project_path: Option<PathBuf>) -> Result<Self> {
        let workspace = load_scope_file(&workspace_path)?;
        let project = match &project_path {
            Some(path) => load_scope_file(path)?,
            None => BTreeMap::new(),
        };
        debug!(
            workspace = %workspace_path.display(),
            project = ?project_path,
            "Opened scoped settings"
        );
        Ok(Self {
            workspace_path,
            project_path,
            workspace,
            project,
            dirty: HashSet::new(),
        })
    }

    /// Workspace settings under the platform config dir, project settings
    /// under `<project>/.settings/` when a project is given
    pub fn open_default(project_dir: Option<&Path>) -> Result<Self> {
        Self::open(
            Self::default_workspace_path(),
            project_dir.map(Self::project_path_for),
        )
    }

    pub fn default_workspace_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path.push(WORKSPACE_FILENAME);
        path
    }

    pub fn project_path_for(project_dir: &Path) -> PathBuf {
        project_dir.join(PROJECT_DIR).join(PROJECT_FILENAME)
    }

    pub fn has_project(&self) -> bool {
        self.project_path.is_some()
    }

    fn values(&self, scope: Scope) -> &BTreeMap<String, String> {
        match scope {
            Scope::Workspace => &self.workspace,
            Scope::Project => &self.project,
        }
    }

    fn values_mut(&mut self, scope: Scope) -> Option<&mut BTreeMap<String, String>> {
        match scope {
            Scope::Workspace => Some(&mut self.workspace),
            Scope::Project if self.project_path.is_some() => Some(&mut self.project),
            Scope::Project => {
                debug!("No project bound, ignoring project-scope write");
                None
            }
        }
    }
}

impl ConfigPort for JsonConfigPort {
    fn get(&self, scope: Scope, key: &str) -> Option<String> {
        self.values(scope).get(key).cloned()
    }

    fn put(&mut self, scope: Scope, key: &str, value: &str) {
        if let Some(values) = self.values_mut(scope) {
            values.insert(key.to_string(), value.to_string());
            self.dirty.insert(scope);
        }
    }

    fn remove(&mut self, scope: Scope, key: &str) {
        let removed = self
            .values_mut(scope)
            .is_some_and(|values| values.remove(key).is_some());
        if removed {
            self.dirty.insert(scope);
        }
    }

    fn flush(&mut self, scope: Scope) -> Result<()> {
        if !self.dirty.contains(&scope) {
            return Ok(());
        }
        let path = match scope {
            Scope::Workspace => self.workspace_path.clone(),
            Scope::Project => match &self.project_path {
                Some(path) => path.clone(),
                None => return Ok(()),
            },
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self.values(scope))
            .context("Failed to serialize scoped settings to JSON")?;
        fs::write(&path, json).with_context(|| format!("Failed to write settings to {:?}", path))?;

        self.dirty.remove(&scope);
        info!(scope = ?scope, path = %path.display(), "Flushed scoped settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_port_counts_writes() {
        let mut port = MemoryConfigPort::new().with(Scope::Workspace, "a", "1");
        assert_eq!(port.get(Scope::Workspace, "a").as_deref(), Some("1"));
        assert_eq!(port.writes(), 0);

        port.put(Scope::Project, "b", "2");
        port.remove(Scope::Project, "b");
        port.remove(Scope::Project, "b");
        assert_eq!(port.writes(), 2);
        assert_eq!(port.get(Scope::Project, "b"), None);
    }

    #[test]
    fn test_json_port_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = dir.path().join("ws").join("workspace.json");
        let project_dir = dir.path().join("project");

        let mut port =
            JsonConfigPort::open(workspace.clone(), Some(JsonConfigPort::project_path_for(&project_dir)))
                .unwrap();
        port.put(Scope::Workspace, "formatter_profile", "_Foo");
        port.put(Scope::Project, "tab_size", "8");
        port.flush(Scope::Workspace).unwrap();
        port.flush(Scope::Project).unwrap();

        let reopened =
            JsonConfigPort::open(workspace, Some(JsonConfigPort::project_path_for(&project_dir)))
                .unwrap();
        assert_eq!(reopened.get(Scope::Workspace, "formatter_profile").as_deref(), Some("_Foo"));
        assert_eq!(reopened.get(Scope::Project, "tab_size").as_deref(), Some("8"));
    }

    #[test]
    fn test_json_port_without_project_ignores_project_writes() {
        let dir = tempfile::tempdir().unwrap();
        let mut port = JsonConfigPort::open(dir.path().join("workspace.json"), None).unwrap();
        port.put(Scope::Project, "tab_size", "8");
        assert_eq!(port.get(Scope::Project, "tab_size"), None);
        port.flush(Scope::Project).unwrap();
        assert!(!port.has_project());
    }

    #[test]
    fn test_json_port_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workspace.json");
        fs::write(&path, "not json").unwrap();
        assert!(JsonConfigPort::open(path, None).is_err());
    }
}
