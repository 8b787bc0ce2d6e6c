use crate::error::CoreError;

/// Default upper bound on a requested hierarchy depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Engine configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Requested depths above this are clamped (default: `64`).
    pub max_depth: usize,
    /// Depth applied when a query does not ask for one (default: unlimited).
    pub default_depth: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            default_depth: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `HIERARCHY_MAX_DEPTH`     | `64`    |
    /// | `HIERARCHY_DEFAULT_DEPTH` | unset   |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str| -> Result<Option<usize>, CoreError> {
            lookup(key)
                .map(|raw| {
                    raw.trim().parse::<usize>().map_err(|_| {
                        CoreError::Validation(format!("{key} must be a non-negative integer, got '{raw}'"))
                    })
                })
                .transpose()
        };

        let max_depth = parse("HIERARCHY_MAX_DEPTH")?.unwrap_or(DEFAULT_MAX_DEPTH);
        let default_depth = parse("HIERARCHY_DEFAULT_DEPTH")?;

        Ok(Self {
            max_depth,
            default_depth,
        })
    }

    /// The depth to apply for a query: the requested one (or the default),
    /// clamped to `max_depth`.
    pub fn effective_depth(&self, requested: Option<usize>) -> Option<usize> {
        let depth = requested.or(self.default_depth)?;
        if depth > self.max_depth {
            tracing::warn!(
                requested = depth,
                max_depth = self.max_depth,
                "Requested hierarchy depth clamped"
            );
        }
        Some(depth.min(self.max_depth))
    }
}
