#![no_main]

use libfuzzer_sys::fuzz_target;
use tessera_layout::config::DEFAULT_MAX_TREE_DEPTH;
use tessera_layout::{LayoutDirection, LayoutNode, LayoutPath, LayoutTree, MovePosition, PanelId};

fn pick(paths: &[LayoutPath], byte: u8) -> Option<&LayoutPath> {
    if paths.is_empty() {
        return None;
    }
    paths.get(usize::from(byte) % paths.len())
}

fuzz_target!(|data: &[u8]| {
    let mut tree = LayoutTree::new(Some(LayoutNode::leaf(PanelId::from(0_i64))));
    let mut next_id = 1_i64;

    // Each edit consumes four bytes: opcode, two path selectors, one argument.
    for chunk in data.chunks_exact(4) {
        let paths = tree.all_paths(usize::MAX);
        let (Some(first), Some(second)) = (pick(&paths, chunk[1]), pick(&paths, chunk[2])) else {
            break;
        };
        let percentage = f64::from(chunk[3]) * 100.0 / 255.0;
        let before = tree.serialize();
        let count_before = tree.panel_count();

        let result = match chunk[0] % 8 {
            0 => {
                next_id += 1;
                let direction = if chunk[3] & 1 == 0 {
                    LayoutDirection::Row
                } else {
                    LayoutDirection::Column
                };
                tree.split_region(first, PanelId::from(next_id), direction, percentage)
            }
            1 => tree.remove_region(first),
            2 => tree.resize_region(first, percentage),
            3 => tree.lock_region(first, chunk[3] & 1 == 1),
            4 => tree.set_min_size(first, f64::from(chunk[3])),
            5 => tree.set_collapsible(first, chunk[3] & 1 == 1),
            6 => {
                let position = match chunk[3] % 3 {
                    0 => MovePosition::Replace,
                    1 => MovePosition::Before,
                    _ => MovePosition::After,
                };
                tree.move_panel(first, second, position)
            }
            _ => tree.swap_panels(first, second),
        };

        // Failed or not, the previous tree is never touched.
        assert_eq!(tree.serialize(), before, "edit mutated its input");

        let Ok(next) = result else {
            continue;
        };
        if chunk[0] % 8 == 0 {
            assert_eq!(next.panel_count(), count_before + 1, "split adds one panel");
        }
        let clone = next.deep_clone().expect("edited tree clones");
        assert!(clone.equals(&next));
        let decoded = LayoutTree::from_envelope(next.serialize());
        let within_limit = usize::try_from(next.depth()).unwrap_or(0) <= DEFAULT_MAX_TREE_DEPTH;
        assert_eq!(decoded.is_ok(), within_limit, "depth limit");

        if next.is_empty() {
            break;
        }
        tree = next;
    }
});
