//! Formatter settings profiles
//!
//! Named, versioned sets of code formatter settings, their XML persistence,
//! and the preference graph that drives a live settings editor.

#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod preferences;
pub mod preview;
pub mod profile;
pub mod settings;

pub use error::{FormatError, SnippetError, StoreError};
pub use preferences::{CommitOutcome, NodeId, PreferenceGraph, Validation};
pub use preview::{PreviewSelector, SnippetCorpus};
pub use profile::{Profile, ProfileManager};
pub use settings::SettingsMap;
