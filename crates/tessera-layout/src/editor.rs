//! Copy-on-write structural edits.
//!
//! Every function takes the current root and returns a new one. Nodes on the
//! edited path are rebuilt bottom-up; every other subtree is shared with the
//! input through its `Arc`. Inputs are never mutated, and a failed edit
//! returns an error without producing a partial tree.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constraints::RegionConstraints;
use crate::error::{LayoutError, Result};
use crate::node::{LayoutNode, LayoutParent};
use crate::path::{LayoutBranch, LayoutDirection, get_node_at_path, split_last};

/// Shared handle to a node.
pub type NodeRef<T> = Arc<LayoutNode<T>>;

/// Where `move_panel` re-inserts the moved panel relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovePosition {
    /// Substitute the node at the target path.
    Replace,
    /// Wrap the target in a split with the panel on the leading branch.
    Before,
    /// Wrap the target in a split with the panel on the trailing branch.
    After,
}

impl MovePosition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl fmt::Display for MovePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovePosition {
    type Err = LayoutError;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "replace" => Ok(Self::Replace),
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            other => Err(LayoutError::InvalidPosition {
                position: other.to_owned(),
            }),
        }
    }
}

#[must_use]
pub fn is_valid_percentage(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}

fn check_percentage(value: f64) -> Result<f64> {
    if is_valid_percentage(value) {
        Ok(value)
    } else {
        Err(LayoutError::InvalidPercentage { value })
    }
}

fn check_size(value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::InvalidSize { value })
    }
}

fn parent_node<T>(parent: LayoutParent<T>) -> NodeRef<T> {
    Arc::new(LayoutNode::Parent(parent))
}

/// Rebuild the spine from `node` down to `path[walked..]`, replacing the
/// addressed node with the result of `edit`.
fn rewrite_at<T, F>(
    node: &NodeRef<T>,
    path: &[LayoutBranch],
    walked: usize,
    edit: F,
) -> Result<NodeRef<T>>
where
    F: FnOnce(&NodeRef<T>) -> Result<NodeRef<T>>,
{
    let Some(&branch) = path.get(walked) else {
        return edit(node);
    };
    let LayoutNode::Parent(parent) = node.as_ref() else {
        return Err(LayoutError::path_not_found(&path[..=walked], path));
    };
    let child = rewrite_at(parent.child_arc(branch), path, walked + 1, edit)?;
    Ok(parent_node(parent.with_child(branch, child)))
}

/// Shared handle of the node at `path`.
pub(crate) fn node_ref_at<'a, T>(
    root: &'a NodeRef<T>,
    path: &[LayoutBranch],
) -> Option<&'a NodeRef<T>> {
    let mut node = root;
    for &branch in path {
        node = node.as_parent()?.child_arc(branch);
    }
    Some(node)
}

fn leaf_ref_at<'a, T>(
    root: Option<&'a NodeRef<T>>,
    path: &[LayoutBranch],
) -> Result<&'a NodeRef<T>> {
    root.and_then(|root| node_ref_at(root, path))
        .filter(|node| node.is_leaf())
        .ok_or_else(|| LayoutError::NotAPanel { path: path.into() })
}

/// Replace the node at `path` with a split holding it on the leading branch
/// and `panel` on the trailing branch.
///
/// On an empty tree, splitting the root path yields a split whose two
/// branches both hold `panel`. Use [`insert_first_panel`] to seed a tree with
/// a single leaf instead.
pub fn split_region<T: Clone>(
    root: Option<&NodeRef<T>>,
    path: &[LayoutBranch],
    panel: T,
    direction: LayoutDirection,
    split_percentage: f64,
) -> Result<NodeRef<T>> {
    let split_percentage = check_percentage(split_percentage)?;
    let Some(root) = root else {
        if !path.is_empty() {
            return Err(LayoutError::path_not_found(&path[..1], path));
        }
        let duplicate = LayoutNode::leaf(panel.clone());
        let parent = LayoutParent::new(direction, duplicate, LayoutNode::leaf(panel));
        return Ok(parent_node(parent.with_split_percentage(split_percentage)));
    };
    rewrite_at(root, path, 0, |target| {
        let parent = LayoutParent::new(direction, Arc::clone(target), LayoutNode::leaf(panel));
        Ok(parent_node(parent.with_split_percentage(split_percentage)))
    })
}

/// Seed an empty tree with a single leaf.
pub fn insert_first_panel<T>(root: Option<&NodeRef<T>>, panel: T) -> Result<NodeRef<T>> {
    match root {
        Some(_) => Err(LayoutError::TreeNotEmpty),
        None => Ok(Arc::new(LayoutNode::leaf(panel))),
    }
}

/// Remove the node at `path`, promoting its sibling into the parent's slot.
///
/// The empty path clears the whole tree.
pub fn remove_region<T>(
    root: Option<&NodeRef<T>>,
    path: &[LayoutBranch],
) -> Result<Option<NodeRef<T>>> {
    let Some((parent_path, branch)) = split_last(path) else {
        return Ok(None);
    };
    let Some(root) = root else {
        return Err(LayoutError::EmptyTree {
            operation: "remove a region",
        });
    };
    rewrite_at(root, parent_path, 0, |parent| match parent.as_ref() {
        LayoutNode::Parent(parent) => Ok(Arc::clone(parent.child_arc(branch.opposite()))),
        LayoutNode::Leaf(_) => Err(LayoutError::SiblingNotFound { path: path.into() }),
    })
    .map(Some)
}

/// Replace the split percentage of the parent at `path`.
pub fn resize_region<T>(
    root: Option<&NodeRef<T>>,
    path: &[LayoutBranch],
    percentage: f64,
) -> Result<NodeRef<T>> {
    let Some(root) = root else {
        return Err(LayoutError::EmptyTree {
            operation: "resize a region",
        });
    };
    let percentage = check_percentage(percentage)?;
    rewrite_at(root, path, 0, |target| match target.as_ref() {
        LayoutNode::Parent(parent) => {
            Ok(parent_node(parent.shallow_copy().with_split_percentage(percentage)))
        }
        LayoutNode::Leaf(_) => Err(LayoutError::NotAParent { path: path.into() }),
    })
}

/// `true` when `path` names an unlocked parent and `percentage` is valid.
#[must_use]
pub fn can_resize<T>(root: Option<&LayoutNode<T>>, path: &[LayoutBranch], percentage: f64) -> bool {
    is_valid_percentage(percentage)
        && get_node_at_path(root, path)
            .and_then(LayoutNode::as_parent)
            .is_some_and(LayoutParent::is_resizable)
}

/// Merge `patch` into the constraints the parent of `path` keeps for it.
fn update_region<T>(
    root: Option<&NodeRef<T>>,
    path: &[LayoutBranch],
    operation: &'static str,
    patch: RegionConstraints,
) -> Result<NodeRef<T>> {
    let Some((parent_path, branch)) = split_last(path) else {
        return Err(LayoutError::RootRegion { operation });
    };
    let Some(root) = root else {
        return Err(LayoutError::EmptyTree { operation });
    };
    rewrite_at(root, parent_path, 0, |parent| match parent.as_ref() {
        LayoutNode::Parent(parent) => {
            let constraints = parent.constraints.unwrap_or_default().merged(branch, patch);
            Ok(parent_node(parent.shallow_copy().with_constraints(constraints)))
        }
        LayoutNode::Leaf(_) => Err(LayoutError::NotAParent {
            path: parent_path.into(),
        }),
    })
}

pub fn lock_region<T>(
    root: Option<&NodeRef<T>>,
    path: &[LayoutBranch],
    locked: bool,
) -> Result<NodeRef<T>> {
    update_region(
        root,
        path,
        "lock a region",
        RegionConstraints::default().with_locked(locked),
    )
}

pub fn set_min_size<T>(
    root: Option<&NodeRef<T>>,
    path: &[LayoutBranch],
    size: f64,
) -> Result<NodeRef<T>> {
    let size = check_size(size)?;
    update_region(
        root,
        path,
        "set a minimum size",
        RegionConstraints::default().with_min_size(size),
    )
}

pub fn set_max_size<T>(
    root: Option<&NodeRef<T>>,
    path: &[LayoutBranch],
    size: f64,
) -> Result<NodeRef<T>> {
    let size = check_size(size)?;
    update_region(
        root,
        path,
        "set a maximum size",
        RegionConstraints::default().with_max_size(size),
    )
}

pub fn set_collapsible<T>(
    root: Option<&NodeRef<T>>,
    path: &[LayoutBranch],
    collapsible: bool,
) -> Result<NodeRef<T>> {
    update_region(
        root,
        path,
        "mark a region collapsible",
        RegionConstraints::default().with_collapsible(collapsible),
    )
}

/// Insert `panel` at `path` of a (possibly empty) tree.
fn place_panel<T>(
    root: Option<&NodeRef<T>>,
    path: &[LayoutBranch],
    panel: NodeRef<T>,
    position: MovePosition,
) -> Result<NodeRef<T>> {
    let Some(root) = root else {
        if path.is_empty() {
            return Ok(panel);
        }
        return Err(LayoutError::path_not_found(&path[..1], path));
    };
    rewrite_at(root, path, 0, |target| {
        Ok(match position {
            MovePosition::Replace => panel,
            MovePosition::Before => {
                parent_node(LayoutParent::new(LayoutDirection::Row, panel, Arc::clone(target)))
            }
            MovePosition::After => {
                parent_node(LayoutParent::new(LayoutDirection::Row, Arc::clone(target), panel))
            }
        })
    })
}

/// Detach the panel at `from` and re-insert it at `to`.
///
/// `to` is resolved against the tree after the panel has been removed.
pub fn move_panel<T>(
    root: Option<&NodeRef<T>>,
    from: &[LayoutBranch],
    to: &[LayoutBranch],
    position: MovePosition,
) -> Result<NodeRef<T>> {
    let moved = Arc::clone(leaf_ref_at(root, from)?);
    let detached = remove_region(root, from)?;
    place_panel(detached.as_ref(), to, moved, position)
}

/// Exchange the panels at two leaf paths.
pub fn swap_panels<T>(
    root: Option<&NodeRef<T>>,
    first: &[LayoutBranch],
    second: &[LayoutBranch],
) -> Result<NodeRef<T>> {
    let first_leaf = Arc::clone(leaf_ref_at(root, first)?);
    let second_leaf = Arc::clone(leaf_ref_at(root, second)?);
    let Some(root) = root else {
        return Err(LayoutError::EmptyTree {
            operation: "swap panels",
        });
    };
    if first == second {
        return Ok(Arc::clone(root));
    }
    let swapped = rewrite_at(root, first, 0, |_| Ok(second_leaf))?;
    rewrite_at(&swapped, second, 0, |_| Ok(first_leaf))
}

/// Build a balanced tree over `panels`, alternating direction per level.
///
/// Each split gives its leading branch a share proportional to the number of
/// panels it holds, so every panel ends up with the same area.
#[must_use]
pub fn balanced<T>(panels: Vec<T>, direction: LayoutDirection) -> Option<NodeRef<T>> {
    balanced_node(panels, direction).map(Arc::new)
}

fn balanced_node<T>(mut panels: Vec<T>, direction: LayoutDirection) -> Option<LayoutNode<T>> {
    let total = panels.len();
    if total <= 1 {
        return panels.pop().map(LayoutNode::Leaf);
    }
    let trailing_panels = panels.split_off(total.div_ceil(2));
    let leading_count = panels.len();
    let leading = balanced_node(panels, direction.flipped())?;
    let trailing = balanced_node(trailing_panels, direction.flipped())?;
    let share = leading_count as f64 * 100.0 / total as f64;
    let parent = LayoutParent::new(direction, leading, trailing);
    Some(LayoutNode::Parent(parent.with_split_percentage(share)))
}
