// Lookup limits.

/// Default bound on traversal recursion depth.
pub const DEFAULT_MAX_DEPTH: usize = 2000;

/// Environment variable overriding [`LookupConfig::max_depth`].
pub const MAX_DEPTH_ENV: &str = "HFST_OL_MAX_DEPTH";

/// Environment variable setting [`LookupConfig::max_analyses`].
pub const MAX_ANALYSES_ENV: &str = "HFST_OL_MAX_ANALYSES";

/// Limits applied to a single lookup.
///
/// `max_depth` bounds the recursion of one traversal; transducers with
/// epsilon cycles would otherwise never terminate. Exceeding it aborts the
/// lookup with [`HfstError::CycleLimitExceeded`](crate::HfstError).
/// `max_analyses`, when set, stops the traversal once that many analyses
/// have been collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupConfig {
    pub max_depth: usize,
    pub max_analyses: Option<usize>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_analyses: None,
        }
    }
}

impl LookupConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_analyses(mut self, max_analyses: usize) -> Self {
        self.max_analyses = Some(max_analyses);
        self
    }

    /// Defaults, overridden by `HFST_OL_MAX_DEPTH` and `HFST_OL_MAX_ANALYSES`
    /// when set. Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(depth) = parse_var(MAX_DEPTH_ENV, var(MAX_DEPTH_ENV)) {
            config.max_depth = depth;
        }
        if let Some(limit) = parse_var(MAX_ANALYSES_ENV, var(MAX_ANALYSES_ENV)) {
            config.max_analyses = Some(limit);
        }
        config
    }
}

fn parse_var(name: &str, value: Option<String>) -> Option<usize> {
    let value = value?;
    match value.trim().parse() {
        Ok(n) => Some(n),
        Err(e) => {
            log::warn!("ignoring {name}={value:?}: {e}");
            None
        }
    }
}
