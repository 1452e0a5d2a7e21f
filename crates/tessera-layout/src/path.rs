//! Path addressing for binary layout trees.
//!
//! A [`LayoutPath`] is a sequence of [`LayoutBranch`] tokens walked from the
//! root. The empty path always denotes the root itself.
//!
//! ```text
//! row ─┬─ leading:  "editor"                 path: leading
//!      └─ trailing: column ─┬─ leading:  "terminal"   path: trailing/leading
//!                           └─ trailing: "preview"    path: trailing/trailing
//! ```

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::node::LayoutNode;

/// Default bound for [`get_all_paths`].
pub const DEFAULT_MAX_PATH_DEPTH: usize = 10;

/// Bound satisfied by every type usable as a panel identifier.
pub trait PanelKey: Clone + PartialEq + fmt::Debug {}

impl<T: Clone + PartialEq + fmt::Debug> PanelKey for T {}

/// Default panel identifier: either a number or a name.
///
/// Identifiers are opaque and may repeat across leaves.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PanelId {
    Number(i64),
    Name(String),
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<&str> for PanelId {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for PanelId {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<i64> for PanelId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// Split orientation of a parent node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    /// Children side by side (horizontal split).
    #[default]
    Row,
    /// Children stacked (vertical split).
    Column,
}

impl LayoutDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Column => "column",
        }
    }

    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Row => Self::Column,
            Self::Column => Self::Row,
        }
    }

    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value {
            "row" => Some(Self::Row),
            "column" => Some(Self::Column),
            _ => None,
        }
    }
}

impl fmt::Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two children of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutBranch {
    Leading,
    Trailing,
}

impl LayoutBranch {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Leading => "leading",
            Self::Trailing => "trailing",
        }
    }

    /// The sibling branch.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Leading => Self::Trailing,
            Self::Trailing => Self::Leading,
        }
    }
}

impl fmt::Display for LayoutBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutBranch {
    type Err = LayoutError;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "leading" => Ok(Self::Leading),
            "trailing" => Ok(Self::Trailing),
            other => Err(LayoutError::InvalidBranch {
                token: other.to_owned(),
            }),
        }
    }
}

/// Owned branch sequence from the root.
///
/// Displays as `leading/trailing`; the root path displays as `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutPath(Vec<LayoutBranch>);

impl LayoutPath {
    /// The empty path addressing the root.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[LayoutBranch] {
        &self.0
    }

    /// Path to this node's child on `branch`.
    #[must_use]
    pub fn child(&self, branch: LayoutBranch) -> Self {
        let mut branches = Vec::with_capacity(self.0.len() + 1);
        branches.extend_from_slice(&self.0);
        branches.push(branch);
        Self(branches)
    }

    /// Path to the parent node, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        split_last(&self.0).map(|(parent, _)| Self(parent.to_vec()))
    }

    pub fn push(&mut self, branch: LayoutBranch) {
        self.0.push(branch);
    }

    pub fn pop(&mut self) -> Option<LayoutBranch> {
        self.0.pop()
    }
}

impl Deref for LayoutPath {
    type Target = [LayoutBranch];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[LayoutBranch]> for LayoutPath {
    fn as_ref(&self) -> &[LayoutBranch] {
        &self.0
    }
}

impl From<Vec<LayoutBranch>> for LayoutPath {
    fn from(branches: Vec<LayoutBranch>) -> Self {
        Self(branches)
    }
}

impl From<&[LayoutBranch]> for LayoutPath {
    fn from(branches: &[LayoutBranch]) -> Self {
        Self(branches.to_vec())
    }
}

impl<const N: usize> From<[LayoutBranch; N]> for LayoutPath {
    fn from(branches: [LayoutBranch; N]) -> Self {
        Self(branches.to_vec())
    }
}

impl FromIterator<LayoutBranch> for LayoutPath {
    fn from_iter<I: IntoIterator<Item = LayoutBranch>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for LayoutPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for (idx, branch) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("/")?;
            }
            f.write_str(branch.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for LayoutPath {
    type Err = LayoutError;

    /// Parse `leading/trailing` style paths. `""` and `"/"` are the root.
    fn from_str(text: &str) -> Result<Self> {
        let trimmed = text.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        trimmed.split('/').map(LayoutBranch::from_str).collect()
    }
}

/// Split a path into its parent segment and final branch.
#[must_use]
pub(crate) fn split_last(path: &[LayoutBranch]) -> Option<(&[LayoutBranch], LayoutBranch)> {
    let (last, parent) = path.split_last()?;
    Some((parent, *last))
}

/// Walk `path` from `root`. Returns `None` when the path leaves the tree.
#[must_use]
pub fn get_node_at_path<'a, T>(
    root: Option<&'a LayoutNode<T>>,
    path: &[LayoutBranch],
) -> Option<&'a LayoutNode<T>> {
    let mut node = root?;
    for &branch in path {
        node = node.as_parent()?.child(branch);
    }
    Some(node)
}

/// Like [`get_node_at_path`], but reports which sub-path failed to resolve.
pub fn get_node_at_path_safe<'a, T>(
    root: Option<&'a LayoutNode<T>>,
    path: &[LayoutBranch],
) -> Result<&'a LayoutNode<T>> {
    let Some(mut node) = root else {
        return Err(LayoutError::EmptyTree {
            operation: "resolve a path",
        });
    };
    for (idx, &branch) in path.iter().enumerate() {
        let Some(parent) = node.as_parent() else {
            tracing::trace!(
                path = %LayoutPath::from(path),
                failed_at = idx,
                "path walked past a leaf"
            );
            return Err(LayoutError::path_not_found(&path[..=idx], path));
        };
        node = parent.child(branch);
    }
    Ok(node)
}

/// Depth-first (leading before trailing) search for the first leaf equal to `id`.
#[must_use]
pub fn find_panel_path<T: PartialEq>(root: Option<&LayoutNode<T>>, id: &T) -> Option<LayoutPath> {
    let mut stack = vec![(root?, LayoutPath::root())];
    while let Some((node, path)) = stack.pop() {
        match node {
            LayoutNode::Leaf(panel) => {
                if panel == id {
                    return Some(path);
                }
            }
            LayoutNode::Parent(parent) => {
                stack.push((parent.trailing.as_ref(), path.child(LayoutBranch::Trailing)));
                stack.push((parent.leading.as_ref(), path.child(LayoutBranch::Leading)));
            }
        }
    }
    None
}

/// Pre-order enumeration of every path shorter than `max_depth` branches.
///
/// The root path is included whenever `max_depth > 0`.
#[must_use]
pub fn get_all_paths<T>(root: Option<&LayoutNode<T>>, max_depth: usize) -> Vec<LayoutPath> {
    let mut out = Vec::new();
    let Some(root) = root else {
        return out;
    };
    let mut stack = vec![(root, LayoutPath::root())];
    while let Some((node, path)) = stack.pop() {
        if path.len() >= max_depth {
            continue;
        }
        if let LayoutNode::Parent(parent) = node {
            stack.push((parent.trailing.as_ref(), path.child(LayoutBranch::Trailing)));
            stack.push((parent.leading.as_ref(), path.child(LayoutBranch::Leading)));
        }
        out.push(path);
    }
    out
}

/// `-1` for an empty tree, `0` for a single leaf, else the longest branch count.
#[must_use]
pub fn get_tree_depth<T>(root: Option<&LayoutNode<T>>) -> i32 {
    let Some(root) = root else {
        return -1;
    };
    let mut deepest = 0usize;
    let mut stack = vec![(root, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        if let LayoutNode::Parent(parent) = node {
            stack.push((parent.leading.as_ref(), depth + 1));
            stack.push((parent.trailing.as_ref(), depth + 1));
        }
    }
    i32::try_from(deepest).unwrap_or(i32::MAX)
}
