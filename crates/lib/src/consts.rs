//! Shared constants.

/// Application name, used for default directory locations.
pub const APP_NAME: &str = "wasmdock";

/// Extension of the compiled module body.
pub const BINARY_EXT: &str = "wasm";

/// Extension of the loader script.
pub const LOADER_EXT: &str = "js";

/// Extension of the typed wrapper.
pub const WRAPPER_EXT: &str = "ts";
