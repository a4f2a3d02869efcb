//! Consolidated constants for the connector service

// =============================================================================
// HTTP Headers
// =============================================================================

/// Content type header
pub const CONTENT_TYPE: &str = "Content-Type";
/// JSON content type
pub const APPLICATION_JSON: &str = "application/json";

// =============================================================================
// Masking
// =============================================================================

/// A string constant representing a redacted or masked value
pub const REDACTED: &str = "Redacted";

// =============================================================================
// Environment and Configuration
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    Development,
    Release,
}

impl Env {
    pub const fn current_env() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Release
        }
    }

    pub const fn config_path(self) -> &'static str {
        match self {
            Self::Development => "development.toml",
            Self::Release => "production.toml",
        }
    }
}

impl std::fmt::Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Release => write!(f, "release"),
        }
    }
}
