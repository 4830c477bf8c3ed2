//! Configuration for [`DslService`](crate::DslService).

use serde::Deserialize;
use verdict_foundation::{Error, Result};
use verdict_language::ParserConfig;
use verdict_language::parser::DEFAULT_MAX_DEPTH;

/// Nesting depth used by [`DslConfig::strict`].
pub const STRICT_MAX_DEPTH: usize = 16;

/// Largest nesting limit [`DslConfig::check`] accepts.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Service-wide settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DslConfig {
    /// Deepest allowed nesting of `not`, parentheses and `and`/`or` chains.
    pub max_nesting_depth: usize,
    /// Whether `check` runs the semantic validator.
    pub validate: bool,
    /// Whether compiled conditions are memoized.
    pub cache_enabled: bool,
}

impl Default for DslConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_DEPTH,
            validate: true,
            cache_enabled: true,
        }
    }
}

impl DslConfig {
    /// Default settings with a tighter nesting limit.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_nesting_depth: STRICT_MAX_DEPTH,
            ..Self::default()
        }
    }

    /// Sets the nesting limit.
    #[must_use]
    pub const fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Turns validation on or off.
    #[must_use]
    pub const fn with_validation(mut self, enabled: bool) -> Self {
        self.validate = enabled;
        self
    }

    /// Turns the expression cache on or off.
    #[must_use]
    pub const fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// The parser-level slice of this configuration.
    #[must_use]
    pub const fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            max_depth: self.max_nesting_depth,
        }
    }

    /// Rejects settings no condition could satisfy.
    ///
    /// # Errors
    /// Returns a usage error if the nesting limit is zero or above
    /// [`MAX_NESTING_DEPTH`].
    pub fn check(&self) -> Result<()> {
        if self.max_nesting_depth == 0 {
            return Err(Error::usage("max_nesting_depth must be at least 1"));
        }
        if self.max_nesting_depth > MAX_NESTING_DEPTH {
            return Err(Error::usage(format!(
                "max_nesting_depth must be at most {MAX_NESTING_DEPTH}"
            )));
        }
        Ok(())
    }
}
