//! Names, INI dialect tokens and status timing shared by the editor

/// Catalog store location
pub mod config {
    /// Directory under the platform config dir holding the catalog
    pub const APP_DIR: &str = "easyini";

    /// Catalog file name
    pub const FILENAME: &str = "editor_config.json";

    /// Environment variable overriding the catalog path
    pub const CATALOG_ENV: &str = "EASYINI_CATALOG";

    /// Environment variable selecting the log level
    pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
}

/// INI dialect tokens
pub mod dialect {
    /// UTF-8 byte-order mark, stripped before parsing
    pub const BOM: char = '\u{FEFF}';

    /// Key/value separator
    pub const SEPARATOR: char = '=';

    /// Line prefixes marking a comment
    pub const COMMENT_PREFIXES: [char; 2] = ['#', ';'];

    /// Separator between domain values in the catalog file
    pub const DOMAIN_SEPARATOR: char = ',';
}

/// Fields that accept free text regardless of their domain
pub mod exemption {
    /// Section name, matched case-sensitively
    pub const SECTION: &str = "DECODE";

    /// Option name, matched case-insensitively
    pub const OPTION: &str = "CALIBRATION";
}

/// Status line texts and timing
pub mod status {
    /// Shown while nothing was saved recently
    pub const IDLE_TEXT: &str = "Changes are saved automatically";

    /// Shown right after a successful write
    pub const SAVED_TEXT: &str = "File saved";

    /// Delay before the saved status reverts to idle
    pub const REVERT_DELAY_MS: u64 = 2000;
}
