/// Application-level constants
pub const APP_NAME: &str = "Riskscope";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Namespace used for record keys when no branding override is configured.
pub const DEFAULT_NAMESPACE: &str = "riskscope";

/// Environment variable overriding the storage namespace.
pub const ENV_NAMESPACE: &str = "RISKSCOPE_NAMESPACE";

/// Environment variable toggling the family-history modifier ("0"/"false" disables).
pub const ENV_FAMILY_HISTORY: &str = "RISKSCOPE_FAMILY_HISTORY";

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "riskscope_lib=info,riskscope=info,warn"
}

/// Engine configuration.
///
/// The storage namespace is an explicit value handed to whoever persists
/// records; nothing in the crate keeps a process-wide prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub storage_namespace: String,
    pub apply_family_history: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_namespace: DEFAULT_NAMESPACE.to_string(),
            apply_family_history: true,
        }
    }
}

impl EngineConfig {
    /// Build a config from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (used by `from_env` and tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ns) = lookup(ENV_NAMESPACE) {
            let ns = ns.trim();
            if !ns.is_empty() {
                config.storage_namespace = ns.to_string();
            }
        }

        if let Some(flag) = lookup(ENV_FAMILY_HISTORY) {
            config.apply_family_history =
                !matches!(flag.trim().to_lowercase().as_str(), "0" | "false" | "off" | "no");
        }

        config
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.storage_namespace = namespace.into();
        self
    }

    pub fn with_family_history(mut self, enabled: bool) -> Self {
        self.apply_family_history = enabled;
        self
    }

    /// Storage key for a client record: `{namespace}:client:{id}`.
    pub fn record_key(&self, id: &str) -> String {
        format!("{}:client:{}", self.storage_namespace, id)
    }
}
