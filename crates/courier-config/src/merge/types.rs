use std::collections::HashMap;

/// Which configuration layer a value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLayer {
    /// Compiled-in defaults (`defaults.toml`).
    Defaults,
    /// User-level configuration (`~/.courier/config.toml`).
    User,
    /// Workspace-level configuration (`{workspace}/.courier/config.toml`).
    Workspace,
    /// File passed explicitly with `--config`.
    Explicit,
}

impl std::fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Defaults => write!(f, "defaults"),
            Self::User => write!(f, "user (~/.courier/config.toml)"),
            Self::Workspace => write!(f, "workspace (.courier/config.toml)"),
            Self::Explicit => write!(f, "explicit (--config)"),
        }
    }
}

/// Tracks which layer set each field's value.
pub type FieldSources = HashMap<String, ConfigLayer>;
