#![no_main]

use libfuzzer_sys::fuzz_target;
use tessera_layout::{LayoutTree, PanelId, codec};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Decoding untrusted text must never panic; it either succeeds or errors.
    let Ok(tree) = codec::from_json::<PanelId>(text) else {
        return;
    };

    // Anything accepted must survive a round trip unchanged.
    let encoded = tree.to_json(None).expect("accepted tree re-encodes");
    let decoded = LayoutTree::<PanelId>::from_json(&encoded).expect("re-encoded tree decodes");
    assert!(decoded.equals(&tree), "round trip changed the tree");
    assert_eq!(
        decoded.serialize(),
        tree.serialize(),
        "round trip changed the envelope"
    );

    // Nesting here may exceed serde_json's default recursion limit.
    let value = serde_json::to_value(tree.serialize()).expect("envelope converts to a value");
    assert!(codec::is_valid_serialized_tree::<PanelId>(&value));
});
