//! End-to-end workspace scenarios through the public API.

use serde_json::json;
use tessera_layout::LayoutBranch::{Leading, Trailing};
use tessera_layout::{
    LayoutDirection, LayoutError, LayoutNode, LayoutParent, LayoutTree, MovePosition, PanelId,
    codec,
};

fn id(name: &str) -> PanelId {
    PanelId::from(name)
}

#[test]
fn splitting_an_empty_tree_puts_the_panel_on_both_branches() {
    let tree = LayoutTree::empty()
        .split_region(&[], id("p1"), LayoutDirection::Row, 50.0)
        .expect("split empty tree");
    let expected = LayoutNode::from(
        LayoutParent::new(
            LayoutDirection::Row,
            LayoutNode::leaf(id("p1")),
            LayoutNode::leaf(id("p1")),
        )
        .with_split_percentage(50.0),
    );
    assert_eq!(tree.root(), Some(&expected));
}

#[test]
fn removing_leading_promotes_trailing_to_root() {
    let tree = LayoutTree::new(Some(LayoutNode::from(LayoutParent::new(
        LayoutDirection::Row,
        LayoutNode::leaf(id("A")),
        LayoutNode::leaf(id("B")),
    ))));
    let next = tree.remove_region(&[Leading]).expect("remove leading");
    assert_eq!(next.root(), Some(&LayoutNode::leaf(id("B"))));
    assert_eq!(tree.panel_count(), 2, "original tree is untouched");
}

#[test]
fn unknown_envelope_version_is_rejected() {
    let err = LayoutTree::<PanelId>::deserialize(&json!({ "version": "9.9.9", "tree": null }))
        .expect_err("unsupported version");
    let LayoutError::Deserialization { reason } = &err else {
        panic!("unexpected error {err:?}");
    };
    assert!(reason.contains("9.9.9"));
}

#[test]
fn resize_outside_range_is_rejected() {
    let tree = LayoutTree::new(Some(LayoutNode::from(LayoutParent::new(
        LayoutDirection::Column,
        LayoutNode::leaf(id("A")),
        LayoutNode::leaf(id("B")),
    ))));
    for value in [-5.0, 150.0] {
        assert!(matches!(
            tree.resize_region(&[], value),
            Err(LayoutError::InvalidPercentage { .. })
        ));
    }
}

#[test]
fn ide_workspace_session() {
    let tree = LayoutTree::empty()
        .insert_first_panel(id("editor"))
        .and_then(|tree| tree.split_region(&[], id("sidebar"), LayoutDirection::Row, 75.0))
        .and_then(|tree| {
            tree.split_region(&[Leading], id("terminal"), LayoutDirection::Column, 70.0)
        })
        .and_then(|tree| tree.lock_region(&[Trailing], true))
        .and_then(|tree| tree.set_min_size(&[Trailing], 180.0))
        .expect("build workspace");

    assert_eq!(tree.panel_count(), 3);
    assert_eq!(tree.depth(), 2);
    assert!(!tree.can_resize(&[], 60.0), "sidebar lock pins the root");
    assert!(tree.can_resize(&[Leading], 60.0));

    let moved = tree
        .move_panel(&[Leading, Trailing], &[Trailing], MovePosition::After)
        .expect("move terminal under sidebar");
    assert_eq!(
        moved.find_panel_path(&id("terminal")),
        Some([Trailing, Trailing].into())
    );
    assert_eq!(
        moved.node_at(&[Leading]),
        Some(&LayoutNode::leaf(id("editor")))
    );

    let text = moved.to_json(Some(2)).expect("persist");
    let restored = codec::from_json::<PanelId>(&text).expect("restore");
    assert!(restored.equals(&moved));
    assert!(codec::is_valid_serialized_tree::<PanelId>(
        &serde_json::from_str(&text).expect("valid JSON")
    ));
}
