//! Serializable edit commands.
//!
//! A [`LayoutOperation`] names one editor call together with its arguments so
//! edits can be queued, logged, replayed, or sent over the wire. Applying an
//! operation goes through exactly the same copy-on-write path as the direct
//! editor call.

use serde::{Deserialize, Serialize};

use crate::editor::{self, MovePosition, NodeRef};
use crate::error::Result;
use crate::node::DEFAULT_SPLIT_PERCENTAGE;
use crate::path::{LayoutDirection, LayoutPath};

fn default_split_percentage() -> f64 {
    DEFAULT_SPLIT_PERCENTAGE
}

/// One structural edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LayoutOperation<T> {
    /// Seed an empty tree with a single panel.
    InsertFirstPanel { panel: T },
    SplitRegion {
        path: LayoutPath,
        panel: T,
        #[serde(default)]
        direction: LayoutDirection,
        #[serde(default = "default_split_percentage")]
        split_percentage: f64,
    },
    RemoveRegion { path: LayoutPath },
    ResizeRegion { path: LayoutPath, percentage: f64 },
    LockRegion { path: LayoutPath, locked: bool },
    SetMinSize { path: LayoutPath, size: f64 },
    SetMaxSize { path: LayoutPath, size: f64 },
    SetCollapsible { path: LayoutPath, collapsible: bool },
    MovePanel {
        from: LayoutPath,
        to: LayoutPath,
        position: MovePosition,
    },
    SwapPanels {
        first: LayoutPath,
        second: LayoutPath,
    },
}

impl<T> LayoutOperation<T> {
    /// Operation family.
    #[must_use]
    pub const fn kind(&self) -> LayoutOperationKind {
        match self {
            Self::InsertFirstPanel { .. } => LayoutOperationKind::InsertFirstPanel,
            Self::SplitRegion { .. } => LayoutOperationKind::SplitRegion,
            Self::RemoveRegion { .. } => LayoutOperationKind::RemoveRegion,
            Self::ResizeRegion { .. } => LayoutOperationKind::ResizeRegion,
            Self::LockRegion { .. } => LayoutOperationKind::LockRegion,
            Self::SetMinSize { .. } => LayoutOperationKind::SetMinSize,
            Self::SetMaxSize { .. } => LayoutOperationKind::SetMaxSize,
            Self::SetCollapsible { .. } => LayoutOperationKind::SetCollapsible,
            Self::MovePanel { .. } => LayoutOperationKind::MovePanel,
            Self::SwapPanels { .. } => LayoutOperationKind::SwapPanels,
        }
    }
}

impl<T: Clone> LayoutOperation<T> {
    /// Run this operation against `root`, producing the next root.
    pub(crate) fn apply_to(&self, root: Option<&NodeRef<T>>) -> Result<Option<NodeRef<T>>> {
        match self {
            Self::InsertFirstPanel { panel } => {
                editor::insert_first_panel(root, panel.clone()).map(Some)
            }
            Self::SplitRegion {
                path,
                panel,
                direction,
                split_percentage,
            } => {
                editor::split_region(root, path, panel.clone(), *direction, *split_percentage)
                    .map(Some)
            }
            Self::RemoveRegion { path } => editor::remove_region(root, path),
            Self::ResizeRegion { path, percentage } => {
                editor::resize_region(root, path, *percentage).map(Some)
            }
            Self::LockRegion { path, locked } => editor::lock_region(root, path, *locked).map(Some),
            Self::SetMinSize { path, size } => editor::set_min_size(root, path, *size).map(Some),
            Self::SetMaxSize { path, size } => editor::set_max_size(root, path, *size).map(Some),
            Self::SetCollapsible { path, collapsible } => {
                editor::set_collapsible(root, path, *collapsible).map(Some)
            }
            Self::MovePanel { from, to, position } => {
                editor::move_panel(root, from, to, *position).map(Some)
            }
            Self::SwapPanels { first, second } => {
                editor::swap_panels(root, first, second).map(Some)
            }
        }
    }
}

/// Stable operation discriminator used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutOperationKind {
    InsertFirstPanel,
    SplitRegion,
    RemoveRegion,
    ResizeRegion,
    LockRegion,
    SetMinSize,
    SetMaxSize,
    SetCollapsible,
    MovePanel,
    SwapPanels,
}

impl LayoutOperationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsertFirstPanel => "insert_first_panel",
            Self::SplitRegion => "split_region",
            Self::RemoveRegion => "remove_region",
            Self::ResizeRegion => "resize_region",
            Self::LockRegion => "lock_region",
            Self::SetMinSize => "set_min_size",
            Self::SetMaxSize => "set_max_size",
            Self::SetCollapsible => "set_collapsible",
            Self::MovePanel => "move_panel",
            Self::SwapPanels => "swap_panels",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::node::LayoutNode;
    use crate::path::LayoutBranch::{Leading, Trailing};
    use crate::path::PanelId;
    use serde_json::json;

    #[test]
    fn split_defaults_fill_direction_and_percentage() {
        let op: LayoutOperation<PanelId> = serde_json::from_value(json!({
            "op": "split_region",
            "path": [],
            "panel": "logs"
        }))
        .expect("decode split");
        assert_eq!(
            op,
            LayoutOperation::SplitRegion {
                path: LayoutPath::root(),
                panel: PanelId::from("logs"),
                direction: LayoutDirection::Row,
                split_percentage: 50.0,
            }
        );
    }

    #[test]
    fn wire_shape_is_tagged_by_op() {
        let op = LayoutOperation::<PanelId>::MovePanel {
            from: LayoutPath::from([Leading]),
            to: LayoutPath::from([Trailing, Leading]),
            position: MovePosition::After,
        };
        let value = serde_json::to_value(&op).expect("encode move");
        assert_eq!(
            value,
            json!({
                "op": "move_panel",
                "from": ["leading"],
                "to": ["trailing", "leading"],
                "position": "after"
            })
        );
    }

    #[test]
    fn unknown_position_token_is_rejected_on_decode() {
        let decoded = serde_json::from_value::<LayoutOperation<PanelId>>(json!({
            "op": "move_panel",
            "from": [],
            "to": [],
            "position": "above"
        }));
        assert!(decoded.is_err());
    }

    #[test]
    fn kind_names_match_wire_tags() {
        let op = LayoutOperation::<PanelId>::SetCollapsible {
            path: LayoutPath::from([Leading]),
            collapsible: true,
        };
        let value = serde_json::to_value(&op).expect("encode");
        assert_eq!(value["op"], json!(op.kind().as_str()));
    }

    #[test]
    fn apply_dispatches_to_editor() {
        let seeded = LayoutOperation::InsertFirstPanel {
            panel: PanelId::from("a"),
        }
        .apply_to(None)
        .expect("seed")
        .expect("non-empty");
        assert_eq!(*seeded, LayoutNode::leaf(PanelId::from("a")));

        let cleared = LayoutOperation::<PanelId>::RemoveRegion {
            path: LayoutPath::root(),
        }
        .apply_to(Some(&seeded))
        .expect("clear");
        assert!(cleared.is_none());

        let err = LayoutOperation::<PanelId>::ResizeRegion {
            path: LayoutPath::root(),
            percentage: 20.0,
        }
        .apply_to(Some(&seeded))
        .expect_err("leaf root cannot be resized");
        assert!(matches!(err, LayoutError::NotAParent { .. }));
    }
}
