//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the crate, providing a single source of truth for constant values.

/// Profile store document format
pub mod store {
    /// Schema version written to the document root
    pub const CURRENT_VERSION: u32 = 3;

    /// Root element tag
    pub const ROOT_TAG: &str = "profiles";

    /// Profile element tag
    pub const PROFILE_TAG: &str = "profile";

    /// Setting element tag
    pub const SETTING_TAG: &str = "setting";

    /// Profile kind written on every profile element
    pub const PROFILE_KIND: &str = "CodeFormatterProfile";

    /// Indentation step for the written document
    pub const INDENT_WIDTH: usize = 4;
}

/// Built-in and synthetic profile identities
pub mod profiles {
    /// ID of the built-in profile used when nothing else is selected
    pub const DEFAULT_ID: &str = "builtin.default";
    pub const DEFAULT_NAME: &str = "Default [built-in]";
    pub const DEFAULT_PRIORITY: u32 = 1;

    pub const CONVENTIONS_ID: &str = "builtin.conventions";
    pub const CONVENTIONS_NAME: &str = "Conventions [built-in]";
    pub const CONVENTIONS_PRIORITY: u32 = 2;

    /// Fixed ID of the synthetic shared profile
    pub const SHARED_ID: &str = "shared";
    pub const SHARED_NAME: &str = "Unmanaged profile";

    /// Prefix prepended to a custom profile's name to form its ID
    pub const CUSTOM_ID_PREFIX: &str = "_";
}

/// Keys written to the scoped config port (outside the settings map)
pub mod port {
    /// Last selected / project-bound profile ID
    pub const PROFILE_KEY: &str = "formatter_profile";
}

/// Configuration file locations
pub mod config {
    /// Application directory name under the platform config dir
    pub const APP_DIR: &str = "formatter-profiles";

    /// Application config file name
    pub const FILENAME: &str = "config.json";

    /// Profile store file name
    pub const STORE_FILENAME: &str = "profiles.xml";

    /// Workspace-scope settings file name
    pub const WORKSPACE_FILENAME: &str = "workspace.json";

    /// Project-scope settings directory and file
    pub const PROJECT_DIR: &str = ".settings";
    pub const PROJECT_FILENAME: &str = "formatter-profiles.json";

    /// Default preview refresh debounce
    pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
}

/// Preview pane constants
pub mod preview {
    /// Shown when no snippet resolves for the focused node
    pub const PLACEHOLDER: &str = "// No preview available for this setting";

    /// Separator between aggregated snippets
    pub const SNIPPET_SEPARATOR: &str = "\n\n";

    /// Section preview keys of the standard editor tree
    pub const SECTION_INDENTATION: &str = "section.indentation";
    pub const SECTION_BRACES: &str = "section.braces";
    pub const SECTION_BLANK_LINES: &str = "section.blank_lines";
    pub const SECTION_WHITE_SPACE: &str = "section.white_space";
    pub const SECTION_LINE_WRAPPING: &str = "section.line_wrapping";
    pub const SECTION_COMMENTS: &str = "section.comments";
}
