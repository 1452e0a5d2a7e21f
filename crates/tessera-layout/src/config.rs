//! Codec configuration with environment overrides.
//!
//! Decisions are deterministic given the environment lookup, so tests drive
//! [`CodecConfig::from_env_with`] with a closure instead of the process env.
//!
//! The [`LayoutTree`](crate::LayoutTree) codec methods use the defaults. Pass a
//! configured [`LayoutCodec`](crate::LayoutCodec) to the `*_with` variants
//! (`to_json_with`, `from_json_with`, `deserialize_with`) to apply overrides.

use serde::{Deserialize, Serialize};

/// Environment variable for the default JSON indent (`0` = compact).
pub const ENV_JSON_INDENT: &str = "TESSERA_LAYOUT_JSON_INDENT";
/// Environment variable bounding split nesting on encode and decode.
pub const ENV_MAX_TREE_DEPTH: &str = "TESSERA_LAYOUT_MAX_DEPTH";

/// Split nesting accepted unless overridden.
pub const DEFAULT_MAX_TREE_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Indent used by `to_json` when the caller passes none.
    pub json_indent: Option<usize>,
    /// Deepest branch count a tree may have to be encoded or decoded.
    pub max_tree_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            json_indent: None,
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
        }
    }
}

impl CodecConfig {
    /// Read overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Read overrides using a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = get_env(ENV_JSON_INDENT) {
            match raw.trim().parse::<usize>() {
                Ok(0) => config.json_indent = None,
                Ok(indent) => config.json_indent = Some(indent),
                Err(_) => {
                    tracing::warn!(
                        var = ENV_JSON_INDENT,
                        value = %raw,
                        "ignoring invalid indent override"
                    );
                }
            }
        }

        if let Some(raw) = get_env(ENV_MAX_TREE_DEPTH) {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_tree_depth = depth,
                _ => {
                    tracing::warn!(
                        var = ENV_MAX_TREE_DEPTH,
                        value = %raw,
                        "ignoring invalid depth override"
                    );
                }
            }
        }

        config
    }

    #[must_use]
    pub fn with_json_indent(mut self, indent: Option<usize>) -> Self {
        self.json_indent = indent.filter(|indent| *indent > 0);
        self
    }

    #[must_use]
    pub fn with_max_tree_depth(mut self, depth: usize) -> Self {
        self.max_tree_depth = depth.max(1);
        self
    }
}
