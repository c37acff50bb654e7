//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [render] Section Defaults
// ============================================================================

pub mod render {
    pub fn image_quality() -> u8 {
        80
    }

    pub fn jobs() -> usize {
        4
    }

    pub fn base_url() -> String {
        "http://localhost".into()
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    use std::path::PathBuf;

    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }

    pub fn root() -> PathBuf {
        "public".into()
    }
}
