//! Command-line host
//!
//! Loads the profile store and the scoped settings, runs one command and
//! writes back whatever the command changed.

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{AppConfig, JsonConfigPort, Scope};
use crate::preferences::{CommitOutcome, editor};
use crate::preview::{PassthroughFormatter, PreviewSelector, render_preview};
use crate::profile::{Profile, ProfileId, ProfileManager, VersionStatus, store};
use crate::settings::keys;

#[derive(Parser, Debug)]
#[command(name = "formatter-profiles")]
#[command(about = "Manage code formatter settings profiles")]
#[command(version)]
pub struct Cli {
    /// Profile store file (default: from config.json)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Project directory; binds the selection to the project's settings
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List profiles in display order, marking the selected one
    List,

    /// Print the settings of a profile (default: the selected one)
    Show {
        name: Option<String>,
    },

    /// Create a custom profile
    New {
        name: String,

        /// Profile to copy settings from (default: the selected one)
        #[arg(long)]
        from: Option<String>,
    },

    /// Rename a custom or unmanaged profile
    Rename {
        name: String,
        new_name: String,
    },

    /// Delete a custom profile
    Delete {
        name: String,
    },

    /// Select a profile
    Select {
        name: String,
    },

    /// Set a value on the selected profile, with validation and dependencies
    #[command(after_help = "\
Examples:
  formatter-profiles set tab_char mixed
  formatter-profiles set line_split 100")]
    Set {
        key: String,
        value: String,
    },

    /// Add the profiles from a store file
    Import {
        file: PathBuf,
    },

    /// Write the custom profiles to a store file
    Export {
        file: PathBuf,
    },

    /// Parse a store file and report each profile's version status
    Check {
        file: PathBuf,
    },

    /// Print the preview snippet for a setting or section key
    Preview {
        key: String,
    },
}

struct Session {
    store_path: PathBuf,
    manager: ProfileManager<JsonConfigPort>,
}

impl Session {
    fn open(cli: &Cli, config: &AppConfig) -> Result<Self> {
        let store_path = cli.store.clone().unwrap_or_else(|| config.store_path());
        let stored = store::read_file(&store_path)
            .with_context(|| format!("Failed to load profiles from {:?}", store_path))?;
        let port = JsonConfigPort::open_default(cli.project.as_deref())?;
        let scope = if cli.project.is_some() {
            Scope::Project
        } else {
            Scope::Workspace
        };
        Ok(Self {
            store_path,
            manager: ProfileManager::new(stored, port, scope),
        })
    }

    /// Resolve a profile by display name, falling back to its ID
    fn find(&self, name: &str) -> Result<ProfileId> {
        self.manager
            .profile_by_name(name)
            .or_else(|| self.manager.profile(name))
            .map(|p| p.id().to_string())
            .ok_or_else(|| anyhow!("No profile named '{name}'"))
    }

    fn save(&mut self) -> Result<()> {
        store::write_file(&self.manager.custom_profiles(), &self.store_path)
            .with_context(|| format!("Failed to save profiles to {:?}", self.store_path))?;
        self.manager.commit_changes()
    }
}

fn kind_label(profile: &Profile) -> &'static str {
    match profile {
        Profile::BuiltIn(_) => "built-in",
        Profile::Custom(_) => "custom",
        Profile::Shared(_) => "unmanaged",
    }
}

fn status_label(status: VersionStatus) -> &'static str {
    match status {
        VersionStatus::Current => "current",
        VersionStatus::Outdated => "outdated",
        VersionStatus::TooNew => "written by a newer release",
    }
}

pub fn run(cli: Cli, config: &AppConfig) -> Result<()> {
    if let Commands::Check { file } = &cli.command {
        return check(file);
    }

    let mut session = Session::open(&cli, config)?;
    match cli.command {
        Commands::List => {
            let selected = session.manager.selected_id().to_string();
            for profile in session.manager.sorted_profiles() {
                let marker = if profile.id() == selected { "*" } else { " " };
                println!("{marker} {} ({})", profile.name(), kind_label(profile));
            }
        }

        Commands::Show { name } => {
            let profile = match name {
                Some(name) => {
                    let id = session.find(&name)?;
                    session.manager.profile(&id).ok_or_else(|| anyhow!("No profile named '{name}'"))?
                }
                None => session.manager.selected(),
            };
            println!("# {} (version {})", profile.name(), profile.version());
            for (key, value) in profile.settings().canonical_entries() {
                println!("{key} = {value}");
            }
        }

        Commands::New { name, from } => {
            if session.manager.contains_name(name.trim()) {
                bail!("A profile named '{}' already exists", name.trim());
            }
            let base = match from {
                Some(from) => session.find(&from)?,
                None => session.manager.selected_id().to_string(),
            };
            let id = session
                .manager
                .new_profile(&name, &base)
                .ok_or_else(|| anyhow!("Cannot create profile '{name}'"))?;
            session.save()?;
            info!(profile = %id, "Created profile");
        }

        Commands::Rename { name, new_name } => {
            let id = session.find(&name)?;
            if session.manager.contains_name(new_name.trim()) {
                bail!("A profile named '{}' already exists", new_name.trim());
            }
            if !session.manager.rename(&id, &new_name) {
                bail!("Profile '{name}' cannot be renamed to '{new_name}'");
            }
            session.save()?;
        }

        Commands::Delete { name } => {
            let id = session.find(&name)?;
            session.manager.set_selected(&id);
            if !session.manager.delete_selected() {
                bail!("Profile '{name}' cannot be deleted");
            }
            session.save()?;
        }

        Commands::Select { name } => {
            let id = session.find(&name)?;
            session.manager.set_selected(&id);
            session.save()?;
        }

        Commands::Set { key, value } => {
            if !keys::is_known(&key) {
                bail!("Unknown setting '{key}'");
            }
            if session.manager.selected().is_builtin() {
                bail!(
                    "Built-in profile '{}' is read-only, create a copy with `new` first",
                    session.manager.selected().name()
                );
            }

            let mut editor = editor::build(session.manager.selected().settings().clone());
            let node = editor
                .node_for_key(&key)
                .ok_or_else(|| anyhow!("Setting '{key}' has no editor"))?;
            if !editor.graph.is_enabled(node) {
                bail!("Setting '{key}' is disabled by another setting");
            }
            match editor.graph.commit_value(node, &value) {
                CommitOutcome::Rejected { reason } => bail!("Rejected: {reason}"),
                CommitOutcome::Applied { advisory: Some(note) } => println!("Note: {note}"),
                CommitOutcome::Applied { advisory: None } | CommitOutcome::Unchanged => {}
            }
            if session.manager.apply_settings(editor.into_settings()) {
                session.save()?;
            }
        }

        Commands::Import { file } => {
            let profiles = store::read_file(&file)
                .with_context(|| format!("Failed to import profiles from {:?}", file))?;
            if profiles.is_empty() {
                bail!("No profiles found in {:?}", file);
            }
            let previous = session.manager.selected_id().to_string();
            let count = profiles.len();
            for profile in profiles {
                session.manager.add_profile(profile);
            }
            session.manager.set_selected(&previous);
            session.save()?;
            println!("Imported {count} profile(s)");
        }

        Commands::Export { file } => {
            let profiles = session.manager.custom_profiles();
            store::write_file(&profiles, &file)
                .with_context(|| format!("Failed to export profiles to {:?}", file))?;
            println!("Exported {} profile(s) to {}", profiles.len(), file.display());
        }

        Commands::Preview { key } => {
            let editor = editor::build(session.manager.selected().settings().clone());
            let node = editor
                .graph
                .node_ids()
                .find(|&n| editor.graph.preview_key(n) == Some(key.as_str()))
                .ok_or_else(|| anyhow!("No setting or section with key '{key}'"))?;
            let selector = PreviewSelector::builtin();
            println!("{}", render_preview(&selector, &editor.graph, node, &PassthroughFormatter));
        }

        Commands::Check { .. } => {}
    }
    Ok(())
}

fn check(file: &Path) -> Result<()> {
    if !file.exists() {
        bail!("File not found: {:?}", file);
    }
    let profiles = store::read_file(file).with_context(|| format!("Failed to parse {:?}", file))?;
    for profile in &profiles {
        println!(
            "{}: version {} ({})",
            profile.name(),
            profile.version(),
            status_label(profile.version_status())
        );
    }
    println!("{} profile(s) OK", profiles.len());
    Ok(())
}
