//! Configuration for the incremental engine

/// Options for `ParseEngine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseEngineOptions {
    /// Memoize deterministic reduction paths with transitive items (Leo's
    /// optimization), keeping right recursion linear.
    pub optimize_right_recursion: bool,
}

impl Default for ParseEngineOptions {
    fn default() -> Self {
        Self { optimize_right_recursion: true }
    }
}

impl ParseEngineOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable Leo's optimization
    #[must_use]
    pub fn with_right_recursion_optimization(mut self, enabled: bool) -> Self {
        self.optimize_right_recursion = enabled;
        self
    }
}
