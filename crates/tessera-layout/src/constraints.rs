//! Per-branch editing constraints.
//!
//! Constraints live inline on the owning [`LayoutParent`], keyed by branch.
//! There is no global constraint table, so a tree stays one persistent value
//! and structural sharing keeps working across edits.
//!
//! The root region has no parent and is therefore always unconstrained.

use serde::{Deserialize, Serialize};

use crate::node::{LayoutNode, LayoutParent};
use crate::path::{LayoutBranch, get_node_at_path, split_last};

/// Constraints for one branch of a split.
///
/// Absent fields mean "unconstrained"; absent flags read as `false`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsible: Option<bool>,
}

impl RegionConstraints {
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.unwrap_or(false)
    }

    #[must_use]
    pub fn is_collapsible(&self) -> bool {
        self.collapsible.unwrap_or(false)
    }

    /// `true` when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_size.is_none()
            && self.max_size.is_none()
            && self.locked.is_none()
            && self.collapsible.is_none()
    }

    /// Overlay every field set in `patch`, keeping the rest.
    #[must_use]
    pub fn merged(self, patch: Self) -> Self {
        Self {
            min_size: patch.min_size.or(self.min_size),
            max_size: patch.max_size.or(self.max_size),
            locked: patch.locked.or(self.locked),
            collapsible: patch.collapsible.or(self.collapsible),
        }
    }

    /// Semantic form: `false` flags collapse to absent.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            locked: self.locked.filter(|locked| *locked),
            collapsible: self.collapsible.filter(|collapsible| *collapsible),
            ..self
        }
    }

    #[must_use]
    pub fn with_min_size(mut self, size: f64) -> Self {
        self.min_size = Some(size);
        self
    }

    #[must_use]
    pub fn with_max_size(mut self, size: f64) -> Self {
        self.max_size = Some(size);
        self
    }

    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    #[must_use]
    pub fn with_collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = Some(collapsible);
        self
    }
}

/// Constraint slots for the two branches of one parent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BranchConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leading: Option<RegionConstraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing: Option<RegionConstraints>,
}

impl BranchConstraints {
    #[must_use]
    pub const fn get(&self, branch: LayoutBranch) -> Option<&RegionConstraints> {
        match branch {
            LayoutBranch::Leading => self.leading.as_ref(),
            LayoutBranch::Trailing => self.trailing.as_ref(),
        }
    }

    /// Constraints for `branch`, defaulted when absent.
    #[must_use]
    pub fn region(&self, branch: LayoutBranch) -> RegionConstraints {
        self.get(branch).copied().unwrap_or_default()
    }

    /// Merge `patch` into the slot for `branch`.
    #[must_use]
    pub fn merged(self, branch: LayoutBranch, patch: RegionConstraints) -> Self {
        let region = self.region(branch).merged(patch);
        match branch {
            LayoutBranch::Leading => Self {
                leading: Some(region),
                ..self
            },
            LayoutBranch::Trailing => Self {
                trailing: Some(region),
                ..self
            },
        }
    }

    #[must_use]
    pub fn any_locked(&self) -> bool {
        self.region(LayoutBranch::Leading).is_locked()
            || self.region(LayoutBranch::Trailing).is_locked()
    }
}

/// Resolve the parent owning the region at `path`.
///
/// Returns `None` for the root path, unresolvable paths and leaf parents.
fn owning_parent<'a, T>(
    root: Option<&'a LayoutNode<T>>,
    path: &[LayoutBranch],
) -> Option<(&'a LayoutParent<T>, LayoutBranch)> {
    let (parent_path, branch) = split_last(path)?;
    let parent = get_node_at_path(root, parent_path)?.as_parent()?;
    Some((parent, branch))
}

/// Constraints on the region at `path`, defaulted when absent.
#[must_use]
pub fn get_region_constraints<T>(
    root: Option<&LayoutNode<T>>,
    path: &[LayoutBranch],
) -> RegionConstraints {
    owning_parent(root, path)
        .map(|(parent, branch)| parent.region_constraints(branch))
        .unwrap_or_default()
}

#[must_use]
pub fn is_region_locked<T>(root: Option<&LayoutNode<T>>, path: &[LayoutBranch]) -> bool {
    get_region_constraints(root, path).is_locked()
}

#[must_use]
pub fn is_region_collapsible<T>(root: Option<&LayoutNode<T>>, path: &[LayoutBranch]) -> bool {
    get_region_constraints(root, path).is_collapsible()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::LayoutBranch::{Leading, Trailing};
    use crate::path::LayoutDirection;

    fn locked_leading() -> LayoutNode<String> {
        let leading = RegionConstraints::default()
            .with_locked(true)
            .with_min_size(120.0);
        LayoutNode::from(
            LayoutParent::new(
                LayoutDirection::Row,
                LayoutNode::leaf("a".to_string()),
                LayoutNode::leaf("b".to_string()),
            )
            .with_constraints(BranchConstraints {
                leading: Some(leading),
                trailing: None,
            }),
        )
    }

    #[test]
    fn merge_preserves_unrelated_fields() {
        let base = RegionConstraints::default().with_locked(true);
        let merged = base.merged(RegionConstraints::default().with_min_size(80.0));
        assert_eq!(merged.locked, Some(true));
        assert_eq!(merged.min_size, Some(80.0));
    }

    #[test]
    fn branch_merge_only_touches_one_slot() {
        let slots = BranchConstraints::default()
            .merged(Leading, RegionConstraints::default().with_collapsible(true));
        assert!(slots.region(Leading).is_collapsible());
        assert!(slots.trailing.is_none());
    }

    #[test]
    fn read_accessors_resolve_the_owning_parent() {
        let root = locked_leading();
        assert!(is_region_locked(Some(&root), &[Leading]));
        assert!(!is_region_locked(Some(&root), &[Trailing]));
        assert_eq!(
            get_region_constraints(Some(&root), &[Leading]).min_size,
            Some(120.0)
        );
    }

    #[test]
    fn root_and_invalid_paths_are_unconstrained() {
        let root = locked_leading();
        assert!(!is_region_locked(Some(&root), &[]));
        assert!(!is_region_collapsible(Some(&root), &[Leading, Leading]));
        assert!(get_region_constraints::<String>(None, &[Leading]).is_empty());
    }

    #[test]
    fn normalized_treats_false_flags_as_absent() {
        let explicit = RegionConstraints::default().with_locked(false);
        assert_eq!(explicit.normalized(), RegionConstraints::default());
    }

    #[test]
    fn serialized_form_uses_camel_case_and_skips_absent_fields() {
        let json = serde_json::to_string(&RegionConstraints::default().with_min_size(10.0))
            .expect("serialize constraints");
        assert_eq!(json, r#"{"minSize":10.0}"#);
    }
}
