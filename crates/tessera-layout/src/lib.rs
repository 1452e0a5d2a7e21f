#![forbid(unsafe_code)]

//! Tessera Layout
//!
//! Immutable binary layout trees for tiling workspaces. Panels sit at the
//! leaves of a split tree; every edit (split, remove, resize, lock, move)
//! produces a new tree and never touches the old one.
//!
//! # Key Components
//!
//! - [`LayoutTree`] - Immutable handle exposing queries and edits
//! - [`LayoutNode`] / [`LayoutParent`] - Recursive node model with shared subtrees
//! - [`LayoutPath`] - Branch sequence addressing a node from the root
//! - [`RegionConstraints`] - Per-branch `minSize`/`maxSize`/`locked`/`collapsible`
//! - [`LayoutOperation`] - Serializable edit commands for replay and batching
//! - [`LayoutCodec`] - Versioned JSON envelope with validating decode
//!
//! # Example
//!
//! ```
//! use tessera_layout::{LayoutBranch, LayoutDirection, LayoutTree, PanelId};
//!
//! let tree = LayoutTree::empty()
//!     .insert_first_panel(PanelId::from("editor"))?
//!     .split_region(&[], PanelId::from("terminal"), LayoutDirection::Column, 70.0)?;
//! assert_eq!(tree.panel_count(), 2);
//!
//! let text = tree.to_json(None)?;
//! let restored = LayoutTree::<PanelId>::from_json(&text)?;
//! assert!(restored.equals(&tree));
//!
//! let closed = restored.remove_region(&[LayoutBranch::Trailing])?;
//! assert_eq!(closed.panel_count(), 1);
//! # Ok::<(), tessera_layout::LayoutError>(())
//! ```

pub mod codec;
pub mod config;
pub mod constraints;
pub mod editor;
pub mod error;
pub mod node;
pub mod operation;
pub mod path;
pub mod tree;

pub use codec::{
    LAYOUT_CODEC_VERSION, LayoutCodec, LayoutEnvelope, SerializableNode, SerializableParent,
};
pub use config::CodecConfig;
pub use constraints::{
    BranchConstraints, RegionConstraints, get_region_constraints, is_region_collapsible,
    is_region_locked,
};
pub use editor::{MovePosition, NodeRef, can_resize};
pub use error::{LayoutError, LayoutErrorKind, Result};
pub use node::{DEFAULT_SPLIT_PERCENTAGE, LayoutNode, LayoutParent};
pub use operation::{LayoutOperation, LayoutOperationKind};
pub use path::{
    DEFAULT_MAX_PATH_DEPTH, LayoutBranch, LayoutDirection, LayoutPath, PanelId, PanelKey,
    find_panel_path, get_all_paths, get_node_at_path, get_node_at_path_safe, get_tree_depth,
};
pub use tree::LayoutTree;
