//! Error taxonomy for layout tree editing and serialization.
//!
//! Every failure is synchronous and local. A failed edit never leaves a
//! partially rewritten tree behind: the caller keeps the tree it started with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::{LayoutBranch, LayoutPath};

pub type Result<T, E = LayoutError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("path not found: no node at {path} (while resolving {requested})")]
    PathNotFound {
        path: LayoutPath,
        requested: LayoutPath,
    },

    #[error("sibling not found: parent of {path} is not a split node")]
    SiblingNotFound { path: LayoutPath },

    #[error("invalid split percentage {value}: expected a finite number in [0, 100]")]
    InvalidPercentage { value: f64 },

    #[error("invalid region size {value}: expected a finite, non-negative number")]
    InvalidSize { value: f64 },

    #[error("cannot {operation} on an empty layout tree")]
    EmptyTree { operation: &'static str },

    #[error("layout tree already has a root panel")]
    TreeNotEmpty,

    #[error("node at {path} is not a split parent")]
    NotAParent { path: LayoutPath },

    #[error("cannot {operation} on the root region: it carries no constraints")]
    RootRegion { operation: &'static str },

    #[error("node at {path} is not a panel")]
    NotAPanel { path: LayoutPath },

    #[error("invalid move position '{position}' (expected replace, before or after)")]
    InvalidPosition { position: String },

    #[error("invalid branch token '{token}' (expected leading or trailing)")]
    InvalidBranch { token: String },

    #[error("deserialization failed: {reason}")]
    Deserialization { reason: String },

    #[error("serialization failed: {reason}")]
    Serialization { reason: String },

    #[error("batch operation {index} failed: {source}")]
    Batch {
        index: usize,
        #[source]
        source: Box<LayoutError>,
    },
}

impl LayoutError {
    #[must_use]
    pub fn deserialization(reason: impl Into<String>) -> Self {
        Self::Deserialization {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub(crate) fn path_not_found(path: &[LayoutBranch], requested: &[LayoutBranch]) -> Self {
        Self::PathNotFound {
            path: LayoutPath::from(path),
            requested: LayoutPath::from(requested),
        }
    }

    /// Stable discriminator for logs and telemetry.
    #[must_use]
    pub const fn kind(&self) -> LayoutErrorKind {
        match self {
            Self::PathNotFound { .. } => LayoutErrorKind::PathNotFound,
            Self::SiblingNotFound { .. } => LayoutErrorKind::SiblingNotFound,
            Self::InvalidPercentage { .. } => LayoutErrorKind::InvalidPercentage,
            Self::InvalidSize { .. } => LayoutErrorKind::InvalidSize,
            Self::EmptyTree { .. } => LayoutErrorKind::EmptyTree,
            Self::TreeNotEmpty => LayoutErrorKind::TreeNotEmpty,
            Self::NotAParent { .. } => LayoutErrorKind::NotAParent,
            Self::RootRegion { .. } => LayoutErrorKind::RootRegion,
            Self::NotAPanel { .. } => LayoutErrorKind::NotAPanel,
            Self::InvalidPosition { .. } => LayoutErrorKind::InvalidPosition,
            Self::InvalidBranch { .. } => LayoutErrorKind::InvalidBranch,
            Self::Deserialization { .. } => LayoutErrorKind::Deserialization,
            Self::Serialization { .. } => LayoutErrorKind::Serialization,
            Self::Batch { .. } => LayoutErrorKind::Batch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutErrorKind {
    PathNotFound,
    SiblingNotFound,
    InvalidPercentage,
    InvalidSize,
    EmptyTree,
    TreeNotEmpty,
    NotAParent,
    RootRegion,
    NotAPanel,
    InvalidPosition,
    InvalidBranch,
    Deserialization,
    Serialization,
    Batch,
}

impl LayoutErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PathNotFound => "path_not_found",
            Self::SiblingNotFound => "sibling_not_found",
            Self::InvalidPercentage => "invalid_percentage",
            Self::InvalidSize => "invalid_size",
            Self::EmptyTree => "empty_tree",
            Self::TreeNotEmpty => "tree_not_empty",
            Self::NotAParent => "not_a_parent",
            Self::RootRegion => "root_region",
            Self::NotAPanel => "not_a_panel",
            Self::InvalidPosition => "invalid_position",
            Self::InvalidBranch => "invalid_branch",
            Self::Deserialization => "deserialization",
            Self::Serialization => "serialization",
            Self::Batch => "batch",
        }
    }
}
