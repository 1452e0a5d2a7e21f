//! Recursive node model.
//!
//! A node is either a leaf panel or a split parent with exactly two children.
//! Children are reference counted so an edit can rebuild the nodes on one
//! path and share every other subtree with the previous tree.

use std::sync::Arc;

use crate::constraints::{BranchConstraints, RegionConstraints};
use crate::path::{LayoutBranch, LayoutDirection};

/// Split percentage assumed when a parent carries none.
pub const DEFAULT_SPLIT_PERCENTAGE: f64 = 50.0;

/// A layout tree node.
#[derive(Debug, Clone)]
pub enum LayoutNode<T> {
    /// A panel occupying a region.
    Leaf(T),
    /// A split of a region into two children.
    Parent(LayoutParent<T>),
}

impl<T> LayoutNode<T> {
    #[must_use]
    pub const fn leaf(id: T) -> Self {
        Self::Leaf(id)
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    #[must_use]
    pub const fn as_leaf(&self) -> Option<&T> {
        match self {
            Self::Leaf(id) => Some(id),
            Self::Parent(_) => None,
        }
    }

    #[must_use]
    pub const fn as_parent(&self) -> Option<&LayoutParent<T>> {
        match self {
            Self::Leaf(_) => None,
            Self::Parent(parent) => Some(parent),
        }
    }

    /// Leaves in depth-first order, leading before trailing.
    pub fn panels(&self) -> Panels<'_, T> {
        Panels { stack: vec![self] }
    }

    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.panels().count()
    }
}

impl<T> From<LayoutParent<T>> for LayoutNode<T> {
    fn from(parent: LayoutParent<T>) -> Self {
        Self::Parent(parent)
    }
}

impl<T: PartialEq> PartialEq for LayoutNode<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Leaf(left), Self::Leaf(right)) => left == right,
            (Self::Parent(left), Self::Parent(right)) => left == right,
            _ => false,
        }
    }
}

/// Split node. Both children are mandatory.
#[derive(Debug, Clone)]
pub struct LayoutParent<T> {
    pub direction: LayoutDirection,
    pub leading: Arc<LayoutNode<T>>,
    pub trailing: Arc<LayoutNode<T>>,
    /// Share (0..=100) given to the leading branch; `None` reads as 50.
    pub split_percentage: Option<f64>,
    pub constraints: Option<BranchConstraints>,
}

impl<T> LayoutParent<T> {
    /// Build a parent with no explicit percentage and no constraints.
    #[must_use]
    pub fn new(
        direction: LayoutDirection,
        leading: impl Into<Arc<LayoutNode<T>>>,
        trailing: impl Into<Arc<LayoutNode<T>>>,
    ) -> Self {
        Self {
            direction,
            leading: leading.into(),
            trailing: trailing.into(),
            split_percentage: None,
            constraints: None,
        }
    }

    #[must_use]
    pub fn with_split_percentage(mut self, percentage: f64) -> Self {
        self.split_percentage = Some(percentage);
        self
    }

    #[must_use]
    pub fn with_constraints(mut self, constraints: BranchConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    #[must_use]
    pub fn child(&self, branch: LayoutBranch) -> &LayoutNode<T> {
        self.child_arc(branch)
    }

    #[must_use]
    pub const fn child_arc(&self, branch: LayoutBranch) -> &Arc<LayoutNode<T>> {
        match branch {
            LayoutBranch::Leading => &self.leading,
            LayoutBranch::Trailing => &self.trailing,
        }
    }

    #[must_use]
    pub fn effective_split_percentage(&self) -> f64 {
        self.split_percentage.unwrap_or(DEFAULT_SPLIT_PERCENTAGE)
    }

    #[must_use]
    pub fn region_constraints(&self, branch: LayoutBranch) -> RegionConstraints {
        self.constraints
            .map(|constraints| constraints.region(branch))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_resizable(&self) -> bool {
        !self
            .constraints
            .is_some_and(|constraints| constraints.any_locked())
    }

    /// Copy of this parent with `branch` replaced; the other child is shared.
    #[must_use]
    pub(crate) fn with_child(&self, branch: LayoutBranch, child: Arc<LayoutNode<T>>) -> Self {
        let (leading, trailing) = match branch {
            LayoutBranch::Leading => (child, Arc::clone(&self.trailing)),
            LayoutBranch::Trailing => (Arc::clone(&self.leading), child),
        };
        Self {
            direction: self.direction,
            leading,
            trailing,
            split_percentage: self.split_percentage,
            constraints: self.constraints,
        }
    }

    /// Copy of this parent sharing both children.
    #[must_use]
    pub(crate) fn shallow_copy(&self) -> Self {
        Self {
            direction: self.direction,
            leading: Arc::clone(&self.leading),
            trailing: Arc::clone(&self.trailing),
            split_percentage: self.split_percentage,
            constraints: self.constraints,
        }
    }
}

impl<T: PartialEq> PartialEq for LayoutParent<T> {
    fn eq(&self, other: &Self) -> bool {
        fn same_child<T: PartialEq>(left: &Arc<LayoutNode<T>>, right: &Arc<LayoutNode<T>>) -> bool {
            Arc::ptr_eq(left, right) || **left == **right
        }

        self.direction == other.direction
            && self.effective_split_percentage() == other.effective_split_percentage()
            && [LayoutBranch::Leading, LayoutBranch::Trailing]
                .into_iter()
                .all(|branch| {
                    self.region_constraints(branch).normalized()
                        == other.region_constraints(branch).normalized()
                })
            && same_child(&self.leading, &other.leading)
            && same_child(&self.trailing, &other.trailing)
    }
}

/// Depth-first leaf iterator returned by [`LayoutNode::panels`].
#[derive(Debug, Clone)]
pub struct Panels<'a, T> {
    stack: Vec<&'a LayoutNode<T>>,
}

impl<'a, T> Iterator for Panels<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                LayoutNode::Leaf(id) => return Some(id),
                LayoutNode::Parent(parent) => {
                    self.stack.push(&parent.trailing);
                    self.stack.push(&parent.leading);
                }
            }
        }
        None
    }
}
