//! Configuration management
//!
//! This module provides two config systems:
//! - **port**: scoped key/value storage the profile manager commits through
//! - **app**: AppConfig used by the CLI host (JSON)

pub mod app;
pub mod port;

// Re-export commonly used types
pub use app::AppConfig;
pub use port::{ConfigPort, JsonConfigPort, MemoryConfigPort, Scope};
