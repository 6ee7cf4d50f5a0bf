/// Project configuration file looked up in the project directory.
pub const CONFIG_FILENAME: &str = "nbind.json";

/// Overrides the project configuration file location.
pub const CONFIG_ENV: &str = "NBIND_CONFIG";

/// Overrides the directory the runtime resolver loads artifacts from.
pub const NATIVE_DIR_ENV: &str = "NBIND_NATIVE_DIR";
