//! Immutable layout tree handle.
//!
//! [`LayoutTree`] is a value type. Every edit returns a new handle and leaves
//! `self` untouched; the two handles share every subtree the edit did not
//! touch. Handles are `Send + Sync` whenever the panel type is, so a tree can
//! be read from many threads without locking.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::codec::{LayoutCodec, LayoutEnvelope};
use crate::constraints::{self, RegionConstraints};
use crate::editor::{self, MovePosition, NodeRef};
use crate::error::{LayoutError, Result};
use crate::node::LayoutNode;
use crate::operation::LayoutOperation;
use crate::path::{self, LayoutBranch, LayoutDirection, LayoutPath, PanelId, PanelKey};

#[derive(Debug)]
pub struct LayoutTree<T = PanelId> {
    root: Option<NodeRef<T>>,
}

impl<T> Clone for LayoutTree<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<T> Default for LayoutTree<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> LayoutTree<T> {
    #[must_use]
    pub fn new(root: Option<LayoutNode<T>>) -> Self {
        Self {
            root: root.map(Arc::new),
        }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self { root: None }
    }

    /// Wrap an existing shared root without copying it.
    #[must_use]
    pub const fn from_root(root: Arc<LayoutNode<T>>) -> Self {
        Self { root: Some(root) }
    }

    const fn from_option(root: Option<NodeRef<T>>) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> Option<&LayoutNode<T>> {
        self.root.as_deref()
    }

    #[must_use]
    pub const fn root_arc(&self) -> Option<&Arc<LayoutNode<T>>> {
        self.root.as_ref()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// New handle on the same root. No node is copied.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Every panel, depth-first, leading before trailing.
    #[must_use]
    pub fn panel_ids(&self) -> Vec<&T> {
        self.root()
            .map(|root| root.panels().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.root().map_or(0, LayoutNode::panel_count)
    }

    /// `-1` for an empty tree, `0` for a single panel.
    #[must_use]
    pub fn depth(&self) -> i32 {
        path::get_tree_depth(self.root())
    }

    #[must_use]
    pub fn node_at(&self, path: &[LayoutBranch]) -> Option<&LayoutNode<T>> {
        path::get_node_at_path(self.root(), path)
    }

    pub fn node_at_checked(&self, path: &[LayoutBranch]) -> Result<&LayoutNode<T>> {
        path::get_node_at_path_safe(self.root(), path)
    }

    /// Paths shorter than `max_depth` branches, in pre-order.
    #[must_use]
    pub fn all_paths(&self, max_depth: usize) -> Vec<LayoutPath> {
        path::get_all_paths(self.root(), max_depth)
    }

    #[must_use]
    pub fn region_constraints(&self, path: &[LayoutBranch]) -> RegionConstraints {
        constraints::get_region_constraints(self.root(), path)
    }

    #[must_use]
    pub fn is_region_locked(&self, path: &[LayoutBranch]) -> bool {
        constraints::is_region_locked(self.root(), path)
    }

    #[must_use]
    pub fn is_region_collapsible(&self, path: &[LayoutBranch]) -> bool {
        constraints::is_region_collapsible(self.root(), path)
    }

    #[must_use]
    pub fn can_resize(&self, path: &[LayoutBranch], percentage: f64) -> bool {
        editor::can_resize(self.root(), path, percentage)
    }
}

impl<T: PartialEq> LayoutTree<T> {
    #[must_use]
    pub fn has_panel(&self, id: &T) -> bool {
        self.root()
            .is_some_and(|root| root.panels().any(|panel| panel == id))
    }

    #[must_use]
    pub fn find_panel_path(&self, id: &T) -> Option<LayoutPath> {
        path::find_panel_path(self.root(), id)
    }

    /// Structural comparison; an absent split percentage counts as 50.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (None, None) => true,
            (Some(left), Some(right)) => Arc::ptr_eq(left, right) || **left == **right,
            _ => false,
        }
    }
}

impl<T: PartialEq> PartialEq for LayoutTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<T: PanelKey> LayoutTree<T> {
    fn edit<F>(&self, op: &'static str, apply: F) -> Result<Self>
    where
        F: FnOnce(Option<&NodeRef<T>>) -> Result<Option<NodeRef<T>>>,
    {
        let _span = tracing::debug_span!("layout.edit", op).entered();
        match apply(self.root.as_ref()) {
            Ok(root) => {
                let next = Self::from_option(root);
                tracing::debug!(
                    panels_before = self.panel_count(),
                    panels_after = next.panel_count(),
                    depth = next.depth(),
                    "layout edit applied"
                );
                Ok(next)
            }
            Err(err) => {
                tracing::debug!(kind = err.kind().as_str(), error = %err, "layout edit rejected");
                Err(err)
            }
        }
    }

    /// Replace the node at `path` with a split of it and `panel`.
    ///
    /// Splitting an empty tree at the root yields a split with `panel` on both
    /// branches; see [`Self::insert_first_panel`] for a single-leaf seed.
    pub fn split_region(
        &self,
        path: &[LayoutBranch],
        panel: T,
        direction: LayoutDirection,
        split_percentage: f64,
    ) -> Result<Self> {
        self.edit("split_region", |root| {
            editor::split_region(root, path, panel, direction, split_percentage).map(Some)
        })
    }

    pub fn insert_first_panel(&self, panel: T) -> Result<Self> {
        self.edit("insert_first_panel", |root| {
            editor::insert_first_panel(root, panel).map(Some)
        })
    }

    /// Remove the node at `path`; its sibling takes the parent's place.
    pub fn remove_region(&self, path: &[LayoutBranch]) -> Result<Self> {
        self.edit("remove_region", |root| editor::remove_region(root, path))
    }

    pub fn resize_region(&self, path: &[LayoutBranch], percentage: f64) -> Result<Self> {
        self.edit("resize_region", |root| {
            editor::resize_region(root, path, percentage).map(Some)
        })
    }

    pub fn lock_region(&self, path: &[LayoutBranch], locked: bool) -> Result<Self> {
        self.edit("lock_region", |root| {
            editor::lock_region(root, path, locked).map(Some)
        })
    }

    pub fn set_min_size(&self, path: &[LayoutBranch], size: f64) -> Result<Self> {
        self.edit("set_min_size", |root| {
            editor::set_min_size(root, path, size).map(Some)
        })
    }

    pub fn set_max_size(&self, path: &[LayoutBranch], size: f64) -> Result<Self> {
        self.edit("set_max_size", |root| {
            editor::set_max_size(root, path, size).map(Some)
        })
    }

    pub fn set_collapsible(&self, path: &[LayoutBranch], collapsible: bool) -> Result<Self> {
        self.edit("set_collapsible", |root| {
            editor::set_collapsible(root, path, collapsible).map(Some)
        })
    }

    /// Detach the panel at `from` and re-insert it at `to`, resolved against
    /// the tree without the panel.
    pub fn move_panel(
        &self,
        from: &[LayoutBranch],
        to: &[LayoutBranch],
        position: MovePosition,
    ) -> Result<Self> {
        self.edit("move_panel", |root| {
            editor::move_panel(root, from, to, position).map(Some)
        })
    }

    pub fn swap_panels(&self, first: &[LayoutBranch], second: &[LayoutBranch]) -> Result<Self> {
        self.edit("swap_panels", |root| {
            editor::swap_panels(root, first, second).map(Some)
        })
    }

    pub fn apply(&self, operation: &LayoutOperation<T>) -> Result<Self> {
        self.edit(operation.kind().as_str(), |root| operation.apply_to(root))
    }

    /// Apply `operations` in order. Either all succeed or `self` is kept and
    /// the first failure is reported with its index.
    pub fn apply_all<'a, I>(&self, operations: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a LayoutOperation<T>>,
        T: 'a,
    {
        let _span = tracing::debug_span!("layout.batch").entered();
        let mut current = self.clone();
        for (index, operation) in operations.into_iter().enumerate() {
            current = current.apply(operation).map_err(|source| LayoutError::Batch {
                index,
                source: Box::new(source),
            })?;
        }
        Ok(current)
    }

    /// Tree in which every panel gets the same share of space.
    #[must_use]
    pub fn balanced(panels: Vec<T>, direction: LayoutDirection) -> Self {
        Self::from_option(editor::balanced(panels, direction))
    }

    #[must_use]
    pub fn serialize(&self) -> LayoutEnvelope<T> {
        LayoutCodec::default().serialize(self)
    }

    /// Fully independent copy; no node is shared with `self`. Not bounded by
    /// the codec depth limit.
    pub fn deep_clone(&self) -> Result<Self> {
        LayoutCodec::default().clone_tree(self)
    }

    pub fn from_envelope(envelope: LayoutEnvelope<T>) -> Result<Self> {
        LayoutCodec::default().decode(envelope)
    }
}

impl<T: PanelKey + Serialize> LayoutTree<T> {
    pub fn to_json(&self, indent: Option<usize>) -> Result<String> {
        self.to_json_with(&LayoutCodec::default(), indent)
    }

    /// [`Self::to_json`] with the indent and depth limit of `codec`.
    pub fn to_json_with(&self, codec: &LayoutCodec, indent: Option<usize>) -> Result<String> {
        codec.to_json(self, indent)
    }
}

impl<T: PanelKey + DeserializeOwned> LayoutTree<T> {
    pub fn deserialize(data: &Value) -> Result<Self> {
        Self::deserialize_with(&LayoutCodec::default(), data)
    }

    pub fn deserialize_with(codec: &LayoutCodec, data: &Value) -> Result<Self> {
        codec.deserialize(data)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_json_with(&LayoutCodec::default(), text)
    }

    /// Parse and validate `text` with the depth limit of `codec`.
    pub fn from_json_with(codec: &LayoutCodec, text: &str) -> Result<Self> {
        codec.from_json(text)
    }
}
