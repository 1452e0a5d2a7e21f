//! Versioned envelope codec.
//!
//! Wire form: `{ "version": "0.2.0", "tree": <node | null> }`, where a node is
//! either a bare panel value or an object carrying `direction`, `leading`,
//! `trailing` and the optional `splitPercentage` and `constraints`.
//!
//! The version gate is an exact string match. There is no migration between
//! versions; anything else is rejected.
//!
//! [`CodecConfig::max_tree_depth`] bounds both directions: the decoder rejects
//! deeper splits and [`LayoutCodec::to_json`] refuses to write a tree the
//! decoder would reject. [`LayoutCodec::clone_tree`] copies an in-memory tree
//! and is not bounded.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::CodecConfig;
use crate::constraints::BranchConstraints;
use crate::editor::is_valid_percentage;
use crate::error::{LayoutError, Result};
use crate::node::{LayoutNode, LayoutParent};
use crate::path::{LayoutBranch, LayoutDirection, LayoutPath};
use crate::tree::LayoutTree;

/// The only envelope version this codec reads or writes.
pub const LAYOUT_CODEC_VERSION: &str = "0.2.0";

/// Bracket nesting JSON text may carry beyond `max_tree_depth`: the envelope,
/// `constraints` maps and structured panel values.
const TEXT_NESTING_HEADROOM: usize = 32;

/// Top-level persisted form of a [`LayoutTree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEnvelope<T> {
    pub version: String,
    pub tree: Option<SerializableNode<T>>,
}

/// Wire mirror of [`LayoutNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializableNode<T> {
    Parent(Box<SerializableParent<T>>),
    Leaf(T),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableParent<T> {
    pub direction: LayoutDirection,
    pub leading: SerializableNode<T>,
    pub trailing: SerializableNode<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<BranchConstraints>,
}

fn encode_node<T: Clone>(node: &LayoutNode<T>) -> SerializableNode<T> {
    match node {
        LayoutNode::Leaf(id) => SerializableNode::Leaf(id.clone()),
        LayoutNode::Parent(parent) => SerializableNode::Parent(Box::new(SerializableParent {
            direction: parent.direction,
            leading: encode_node(&parent.leading),
            trailing: encode_node(&parent.trailing),
            split_percentage: parent.split_percentage,
            constraints: parent.constraints,
        })),
    }
}

/// A JSON object is read as a split node when it carries any of these keys.
fn is_parent_object(fields: &Map<String, Value>) -> bool {
    ["direction", "leading", "trailing"]
        .iter()
        .any(|key| fields.contains_key(*key))
}

/// Encoder/decoder bound to one [`CodecConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutCodec {
    config: CodecConfig,
}

impl LayoutCodec {
    #[must_use]
    pub const fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Pre-order copy of `tree` into an envelope tagged with the current version.
    #[must_use]
    pub fn serialize<T: Clone>(&self, tree: &LayoutTree<T>) -> LayoutEnvelope<T> {
        LayoutEnvelope {
            version: LAYOUT_CODEC_VERSION.to_owned(),
            tree: tree.root().map(encode_node),
        }
    }

    /// Rebuild a tree from a typed envelope.
    pub fn decode<T>(&self, envelope: LayoutEnvelope<T>) -> Result<LayoutTree<T>> {
        check_version(&envelope.version)?;
        let Some(node) = envelope.tree else {
            return Ok(LayoutTree::empty());
        };
        let mut path = LayoutPath::root();
        let root = self.decode_typed(node, &mut path)?;
        Ok(LayoutTree::from_root(Arc::new(root)))
    }

    fn decode_typed<T>(
        &self,
        node: SerializableNode<T>,
        path: &mut LayoutPath,
    ) -> Result<LayoutNode<T>> {
        let parent = match node {
            SerializableNode::Leaf(id) => return Ok(LayoutNode::Leaf(id)),
            SerializableNode::Parent(parent) => *parent,
        };
        self.check_depth(path)?;
        let split_percentage = parent
            .split_percentage
            .map(|value| check_split_percentage(value, path))
            .transpose()?;
        let leading = self.decode_child(parent.leading, path, LayoutBranch::Leading)?;
        let trailing = self.decode_child(parent.trailing, path, LayoutBranch::Trailing)?;
        Ok(LayoutNode::Parent(LayoutParent {
            direction: parent.direction,
            leading: Arc::new(leading),
            trailing: Arc::new(trailing),
            split_percentage,
            constraints: parent.constraints,
        }))
    }

    fn decode_child<T>(
        &self,
        node: SerializableNode<T>,
        path: &mut LayoutPath,
        branch: LayoutBranch,
    ) -> Result<LayoutNode<T>> {
        path.push(branch);
        let decoded = self.decode_typed(node, path);
        path.pop();
        decoded
    }

    /// Validate and decode an untrusted envelope.
    ///
    /// Checks run in order: object envelope, `version` present, exact version
    /// match, `tree` present, then every node recursively.
    pub fn deserialize<T: DeserializeOwned>(&self, data: &Value) -> Result<LayoutTree<T>> {
        self.decode_value(data).inspect_err(log_rejection)
    }

    /// Same checks as [`Self::deserialize`], reported as a boolean.
    #[must_use]
    pub fn is_valid_serialized_tree<T: DeserializeOwned>(&self, data: &Value) -> bool {
        self.decode_value::<T>(data).is_ok()
    }

    fn decode_value<T: DeserializeOwned>(&self, data: &Value) -> Result<LayoutTree<T>> {
        let Value::Object(envelope) = data else {
            return Err(LayoutError::deserialization("envelope must be a JSON object"));
        };
        let Some(version) = envelope.get("version") else {
            return Err(LayoutError::deserialization("envelope is missing 'version'"));
        };
        let Value::String(version) = version else {
            return Err(LayoutError::deserialization("'version' must be a string"));
        };
        check_version(version)?;
        let Some(tree) = envelope.get("tree") else {
            return Err(LayoutError::deserialization("envelope is missing 'tree'"));
        };
        if tree.is_null() {
            return Ok(LayoutTree::empty());
        }
        let mut path = LayoutPath::root();
        let root = self.decode_raw(tree, &mut path)?;
        Ok(LayoutTree::from_root(Arc::new(root)))
    }

    fn decode_raw<T: DeserializeOwned>(
        &self,
        value: &Value,
        path: &mut LayoutPath,
    ) -> Result<LayoutNode<T>> {
        let fields = match value {
            Value::Object(fields) if is_parent_object(fields) => fields,
            _ => {
                let panel = T::deserialize(value).map_err(|err| {
                    LayoutError::deserialization(format!("invalid panel at {path}: {err}"))
                })?;
                return Ok(LayoutNode::Leaf(panel));
            }
        };
        self.check_depth(path)?;

        let direction = fields
            .get("direction")
            .and_then(Value::as_str)
            .and_then(LayoutDirection::parse)
            .ok_or_else(|| {
                LayoutError::deserialization(format!(
                    "node at {path} has an invalid direction (expected 'row' or 'column')"
                ))
            })?;

        let split_percentage = match fields.get("splitPercentage") {
            None | Some(Value::Null) => None,
            Some(Value::Number(number)) => {
                let value = number.as_f64().ok_or_else(|| {
                    LayoutError::deserialization(format!(
                        "node at {path} has an unreadable splitPercentage"
                    ))
                })?;
                Some(check_split_percentage(value, path)?)
            }
            Some(_) => {
                return Err(LayoutError::deserialization(format!(
                    "node at {path} has a non-numeric splitPercentage"
                )));
            }
        };

        let constraints = match fields.get("constraints") {
            None | Some(Value::Null) => None,
            Some(raw) => {
                let constraints = BranchConstraints::deserialize(raw).map_err(|err| {
                    LayoutError::deserialization(format!(
                        "node at {path} has invalid constraints: {err}"
                    ))
                })?;
                Some(constraints)
            }
        };

        let leading = self.decode_raw_child(fields, path, LayoutBranch::Leading)?;
        let trailing = self.decode_raw_child(fields, path, LayoutBranch::Trailing)?;

        Ok(LayoutNode::Parent(LayoutParent {
            direction,
            leading: Arc::new(leading),
            trailing: Arc::new(trailing),
            split_percentage,
            constraints,
        }))
    }

    fn decode_raw_child<T: DeserializeOwned>(
        &self,
        fields: &Map<String, Value>,
        path: &mut LayoutPath,
        branch: LayoutBranch,
    ) -> Result<LayoutNode<T>> {
        let child = match fields.get(branch.as_str()) {
            None | Some(Value::Null) => {
                return Err(LayoutError::deserialization(format!(
                    "node at {path} is missing its {branch} child"
                )));
            }
            Some(child) => child,
        };
        path.push(branch);
        let decoded = self.decode_raw(child, path);
        path.pop();
        decoded
    }

    fn check_depth(&self, path: &LayoutPath) -> Result<()> {
        let limit = self.config.max_tree_depth;
        if path.len() >= limit {
            return Err(LayoutError::deserialization(format!(
                "tree exceeds the maximum depth of {limit} at {path}"
            )));
        }
        Ok(())
    }

    /// Refuse to write a tree the decoder would reject.
    fn check_encodable<T>(&self, tree: &LayoutTree<T>) -> Result<()> {
        let limit = self.config.max_tree_depth;
        let depth = usize::try_from(tree.depth()).unwrap_or(0);
        if depth <= limit {
            return Ok(());
        }
        Err(LayoutError::Serialization {
            reason: format!("tree depth {depth} exceeds the maximum depth of {limit}"),
        })
    }

    /// Deep copy via a full envelope round trip. No node is shared with `tree`.
    ///
    /// The depth limit does not apply: the source is already a valid tree.
    pub fn clone_tree<T: Clone>(&self, tree: &LayoutTree<T>) -> Result<LayoutTree<T>> {
        let unbounded = Self::new(self.config.with_max_tree_depth(usize::MAX));
        unbounded.decode(self.serialize(tree))
    }

    /// Encode `tree` as JSON text.
    ///
    /// `indent` overrides the configured indent; `Some(0)` forces compact output.
    pub fn to_json<T: Clone + Serialize>(
        &self,
        tree: &LayoutTree<T>,
        indent: Option<usize>,
    ) -> Result<String> {
        self.check_encodable(tree)?;
        let envelope = self.serialize(tree);
        let width = indent.or(self.config.json_indent).unwrap_or(0);
        if width == 0 {
            return serde_json::to_string(&envelope).map_err(serialization_error);
        }
        let indent = " ".repeat(width);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        envelope
            .serialize(&mut serializer)
            .map_err(serialization_error)?;
        String::from_utf8(out).map_err(|err| LayoutError::Serialization {
            reason: err.to_string(),
        })
    }

    /// Parse JSON text and decode it with [`Self::deserialize`].
    pub fn from_json<T: DeserializeOwned>(&self, text: &str) -> Result<LayoutTree<T>> {
        let value = self.parse_json(text).inspect_err(log_rejection)?;
        self.deserialize(&value)
    }

    /// Parse with serde_json's fixed recursion limit lifted. Bracket nesting
    /// is bounded first so the parser's stack use stays proportional to
    /// `max_tree_depth`.
    fn parse_json(&self, text: &str) -> Result<Value> {
        let depth = self.config.max_tree_depth;
        let limit = depth.saturating_add(TEXT_NESTING_HEADROOM);
        if exceeds_nesting(text, limit) {
            return Err(LayoutError::deserialization(format!(
                "Invalid JSON: nesting deeper than {limit} levels"
            )));
        }
        let mut deserializer = serde_json::Deserializer::from_str(text);
        deserializer.disable_recursion_limit();
        let value = Value::deserialize(&mut deserializer).map_err(invalid_json)?;
        deserializer.end().map_err(invalid_json)?;
        Ok(value)
    }
}

/// `true` once `{`/`[` nesting in `text` passes `limit`. Brackets inside
/// strings do not count.
fn exceeds_nesting(text: &str, limit: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > limit {
                    return true;
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}

fn log_rejection(err: &LayoutError) {
    tracing::warn!(kind = err.kind().as_str(), reason = %err, "rejected serialized layout");
}

fn invalid_json(err: serde_json::Error) -> LayoutError {
    LayoutError::deserialization(format!("Invalid JSON: {err}"))
}

fn serialization_error(err: serde_json::Error) -> LayoutError {
    LayoutError::Serialization {
        reason: err.to_string(),
    }
}

fn check_version(version: &str) -> Result<()> {
    if version == LAYOUT_CODEC_VERSION {
        return Ok(());
    }
    Err(LayoutError::deserialization(format!(
        "unsupported layout version '{version}' (expected '{LAYOUT_CODEC_VERSION}')"
    )))
}

fn check_split_percentage(value: f64, path: &LayoutPath) -> Result<f64> {
    if is_valid_percentage(value) {
        return Ok(value);
    }
    Err(LayoutError::deserialization(format!(
        "node at {path} has splitPercentage {value} outside [0, 100]"
    )))
}

/// [`LayoutCodec::serialize`] with the default configuration.
#[must_use]
pub fn serialize<T: Clone>(tree: &LayoutTree<T>) -> LayoutEnvelope<T> {
    LayoutCodec::default().serialize(tree)
}

/// [`LayoutCodec::deserialize`] with the default configuration.
pub fn deserialize<T: DeserializeOwned>(data: &Value) -> Result<LayoutTree<T>> {
    LayoutCodec::default().deserialize(data)
}

#[must_use]
pub fn is_valid_serialized_tree<T: DeserializeOwned>(data: &Value) -> bool {
    LayoutCodec::default().is_valid_serialized_tree::<T>(data)
}

pub fn clone_tree<T: Clone>(tree: &LayoutTree<T>) -> Result<LayoutTree<T>> {
    LayoutCodec::default().clone_tree(tree)
}

pub fn to_json<T: Clone + Serialize>(
    tree: &LayoutTree<T>,
    indent: Option<usize>,
) -> Result<String> {
    LayoutCodec::default().to_json(tree, indent)
}

pub fn from_json<T: DeserializeOwned>(text: &str) -> Result<LayoutTree<T>> {
    LayoutCodec::default().from_json(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::RegionConstraints;
    use crate::path::LayoutBranch::{Leading, Trailing};
    use crate::path::LayoutDirection::{Column, Row};
    use crate::path::PanelId;
    use serde_json::json;
    use tracing_test::traced_test;

    fn sample() -> LayoutTree<PanelId> {
        let inner = LayoutParent::new(
            Column,
            LayoutNode::leaf(PanelId::from(3_i64)),
            LayoutNode::leaf(PanelId::from("preview")),
        );
        let constraints = BranchConstraints {
            leading: Some(RegionConstraints::default().with_locked(true).with_min_size(120.0)),
            trailing: None,
        };
        let root = LayoutParent::new(
            Row,
            LayoutNode::leaf(PanelId::from("editor")),
            LayoutNode::from(inner.with_split_percentage(25.0)),
        );
        LayoutTree::new(Some(LayoutNode::from(root.with_constraints(constraints))))
    }

    fn sample_json() -> Value {
        json!({
            "version": "0.2.0",
            "tree": {
                "direction": "row",
                "leading": "editor",
                "trailing": {
                    "direction": "column",
                    "leading": 3,
                    "trailing": "preview",
                    "splitPercentage": 25.0
                },
                "constraints": {
                    "leading": { "minSize": 120.0, "locked": true }
                }
            }
        })
    }

    fn envelope(tree: Value) -> Value {
        json!({ "version": "0.2.0", "tree": tree })
    }

    /// Chain of `splits` splits, each nested on the leading branch of the last.
    fn leading_spine(splits: usize) -> LayoutTree<PanelId> {
        let mut tree = LayoutTree::new(Some(LayoutNode::leaf(PanelId::from(0_i64))));
        let mut path = LayoutPath::root();
        for index in 1..=splits {
            let panel = PanelId::from(index as i64);
            tree = tree.split_region(&path, panel, Row, 50.0).expect("split");
            path.push(Leading);
        }
        tree
    }

    fn reason(err: LayoutError) -> String {
        match err {
            LayoutError::Deserialization { reason } => reason,
            other => panic!("expected deserialization error, got {other:?}"),
        }
    }

    #[test]
    fn serialize_produces_documented_wire_shape() {
        let value = serde_json::to_value(serialize(&sample())).expect("encode envelope");
        assert_eq!(value, sample_json());
    }

    #[test]
    fn empty_tree_serializes_null() {
        let empty = LayoutTree::<PanelId>::empty();
        let value = serde_json::to_value(serialize(&empty)).expect("encode");
        assert_eq!(value, envelope(Value::Null));
        let decoded = deserialize::<PanelId>(&value).expect("decode empty");
        assert!(decoded.is_empty());
    }

    #[test]
    fn raw_and_typed_decode_agree() {
        let raw = deserialize::<PanelId>(&sample_json()).expect("raw decode");
        let envelope: LayoutEnvelope<PanelId> =
            serde_json::from_value(sample_json()).expect("typed envelope");
        let typed = LayoutCodec::default().decode(envelope).expect("typed");
        assert_eq!(raw, sample());
        assert_eq!(typed, sample());
    }

    #[test]
    fn unsupported_version_is_named() {
        let err = deserialize::<PanelId>(&json!({ "version": "9.9.9", "tree": null }))
            .expect_err("version mismatch");
        assert!(reason(err).contains("9.9.9"));
    }

    #[test]
    fn envelope_checks_run_in_order() {
        let cases = [
            (json!([1, 2]), "must be a JSON object"),
            (json!({ "tree": null }), "missing 'version'"),
            (json!({ "version": 2, "tree": null }), "must be a string"),
            (json!({ "version": "0.1.0" }), "unsupported layout version"),
            (json!({ "version": "0.2.0" }), "missing 'tree'"),
        ];
        for (data, expected) in cases {
            let message = reason(deserialize::<PanelId>(&data).expect_err("invalid envelope"));
            assert!(
                message.contains(expected),
                "{message} should mention {expected}"
            );
        }
    }

    #[test]
    fn node_validation_rejects_malformed_parents() {
        let cases = [
            (
                json!({ "direction": "diagonal", "leading": "a", "trailing": "b" }),
                "invalid direction",
            ),
            (
                json!({ "direction": "row", "leading": "a" }),
                "missing its trailing child",
            ),
            (
                json!({ "direction": "row", "leading": null, "trailing": "b" }),
                "missing its leading child",
            ),
            (
                json!({
                    "direction": "row", "leading": "a", "trailing": "b",
                    "splitPercentage": 120
                }),
                "outside [0, 100]",
            ),
            (
                json!({
                    "direction": "row", "leading": "a", "trailing": "b",
                    "splitPercentage": "half"
                }),
                "non-numeric splitPercentage",
            ),
            (
                json!({
                    "direction": "row", "leading": "a", "trailing": "b",
                    "constraints": { "leading": { "locked": "yes" } }
                }),
                "invalid constraints",
            ),
            (
                json!({
                    "direction": "row", "leading": "a",
                    "trailing": { "direction": "column", "leading": "b" }
                }),
                "node at trailing is missing its trailing child",
            ),
        ];
        for (tree, expected) in cases {
            let data = envelope(tree);
            let message = reason(deserialize::<PanelId>(&data).expect_err("invalid node"));
            assert!(
                message.contains(expected),
                "{message} should mention {expected}"
            );
            assert!(!is_valid_serialized_tree::<PanelId>(&data));
        }
        assert!(is_valid_serialized_tree::<PanelId>(&sample_json()));
    }

    #[test]
    fn leaves_must_decode_as_panels() {
        let data = envelope(json!({ "direction": "row", "leading": true, "trailing": "b" }));
        let message = reason(deserialize::<PanelId>(&data).expect_err("boolean panel"));
        assert!(message.contains("invalid panel at leading"), "{message}");
    }

    #[test]
    fn depth_guard_bounds_nesting() {
        let mut tree = json!("leaf");
        for _ in 0..5 {
            tree = json!({ "direction": "row", "leading": tree, "trailing": "x" });
        }
        let data = envelope(tree);
        let strict = LayoutCodec::new(CodecConfig::default().with_max_tree_depth(4));
        let message = reason(strict.deserialize::<PanelId>(&data).expect_err("too deep"));
        assert!(message.contains("maximum depth of 4"), "{message}");
        let roomy = LayoutCodec::new(CodecConfig::default().with_max_tree_depth(5));
        assert!(roomy.is_valid_serialized_tree::<PanelId>(&data));
    }

    #[test]
    fn encoder_refuses_trees_the_decoder_would_reject() {
        let codec = LayoutCodec::new(CodecConfig::default().with_max_tree_depth(4));
        let fits = leading_spine(4);
        let text = codec.to_json(&fits, None).expect("depth 4 encodes");
        let decoded = codec.from_json::<PanelId>(&text).expect("decodes");
        assert_eq!(decoded, fits);

        let deep = leading_spine(5);
        let err = codec.to_json(&deep, None).expect_err("over the limit");
        assert!(matches!(err, LayoutError::Serialization { .. }), "{err:?}");
        let copy = codec.clone_tree(&deep).expect("clone ignores the limit");
        assert_eq!(copy, deep);
    }

    #[test]
    fn text_round_trip_nests_past_parser_default() {
        let tree = leading_spine(200);
        assert_eq!(tree.depth(), 200);
        let text = to_json(&tree, None).expect("encode deep tree");
        let restored = from_json::<PanelId>(&text).expect("decode deep tree");
        assert!(restored.equals(&tree));

        let pretty = to_json(&tree, Some(2)).expect("indented");
        let restored = from_json::<PanelId>(&pretty).expect("decode indented");
        assert_eq!(restored, tree);
    }

    #[test]
    fn clone_of_very_deep_tree_succeeds() {
        let tree = leading_spine(600);
        let copy = clone_tree(&tree).expect("clone deep tree");
        assert!(copy.equals(&tree));
        assert_eq!(copy.depth(), 600);
    }

    #[test]
    fn over_nested_text_is_rejected_before_parsing() {
        let depth = 4096;
        let text = format!(
            r#"{{"version":"0.2.0","tree":{}0{}}}"#,
            "[".repeat(depth),
            "]".repeat(depth)
        );
        let message = reason(from_json::<PanelId>(&text).expect_err("too deep"));
        assert!(message.contains("nesting deeper than"), "{message}");

        let bracketed = "[".repeat(depth);
        let quoted = serde_json::to_string(&envelope(json!(bracketed))).expect("encode");
        let tree = from_json::<PanelId>(&quoted).expect("brackets in strings do not nest");
        let expected = LayoutNode::leaf(PanelId::from(bracketed));
        assert_eq!(tree.root(), Some(&expected));
    }

    #[test]
    fn trailing_text_is_rejected() {
        let text = r#"{"version":"0.2.0","tree":null} {}"#;
        let message = reason(from_json::<PanelId>(text).expect_err("trailing characters"));
        assert!(message.starts_with("Invalid JSON"), "{message}");
    }

    #[test]
    fn round_trip_preserves_envelope() {
        let tree = sample();
        let envelope = serialize(&tree);
        let codec = LayoutCodec::default();
        let decoded = codec.decode(envelope.clone()).expect("decode");
        assert_eq!(decoded, tree);
        assert_eq!(serialize(&decoded), envelope);
    }

    #[test]
    fn clone_shares_no_nodes() {
        let tree = sample();
        let copy = clone_tree(&tree).expect("clone");
        assert_eq!(copy, tree);
        let original = tree.root_arc().expect("root");
        let cloned = copy.root_arc().expect("root");
        assert!(!Arc::ptr_eq(original, cloned));
        let original_split = original.as_parent().expect("split");
        let cloned_split = cloned.as_parent().expect("split");
        assert!(!Arc::ptr_eq(&original_split.trailing, &cloned_split.trailing));
    }

    #[test]
    fn json_text_compact_and_indented() {
        let tree = LayoutTree::new(Some(LayoutNode::leaf(PanelId::from("solo"))));
        assert_eq!(
            to_json(&tree, None).expect("compact"),
            r#"{"version":"0.2.0","tree":"solo"}"#
        );
        assert_eq!(
            to_json(&tree, Some(2)).expect("pretty"),
            "{\n  \"version\": \"0.2.0\",\n  \"tree\": \"solo\"\n}"
        );
        let configured = LayoutCodec::new(CodecConfig::default().with_json_indent(Some(4)));
        let indented = configured.to_json(&tree, None).expect("configured");
        assert!(indented.contains("\n    \"tree\""));
        let compact = configured.to_json(&tree, Some(0)).expect("forced compact");
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn from_json_round_trips_text() {
        let tree = sample();
        let text = to_json(&tree, Some(2)).expect("encode");
        assert_eq!(from_json::<PanelId>(&text).expect("decode"), tree);
    }

    #[test]
    #[traced_test]
    fn invalid_json_is_wrapped_and_logged() {
        let message = reason(from_json::<PanelId>("{ not json").expect_err("parse failure"));
        assert!(message.starts_with("Invalid JSON"), "{message}");
        assert!(logs_contain("rejected serialized layout"));
    }

    #[test]
    fn typed_decode_validates_percentage_and_version() {
        let mut envelope = serialize(&sample());
        envelope.version = "0.3.0".into();
        assert!(LayoutCodec::default().decode(envelope).is_err());

        let bad = LayoutEnvelope {
            version: LAYOUT_CODEC_VERSION.to_owned(),
            tree: Some(SerializableNode::Parent(Box::new(SerializableParent {
                direction: Row,
                leading: SerializableNode::Leaf(PanelId::from("a")),
                trailing: SerializableNode::Leaf(PanelId::from("b")),
                split_percentage: Some(f64::NAN),
                constraints: None,
            }))),
        };
        assert!(LayoutCodec::default().decode(bad).is_err());
    }

    #[test]
    fn decoded_paths_resolve() {
        let tree = deserialize::<PanelId>(&sample_json()).expect("decode");
        let leaf = tree.node_at(&[Trailing, Leading]).expect("leaf");
        assert_eq!(leaf.as_leaf(), Some(&PanelId::from(3_i64)));
        assert!(tree.is_region_locked(&[Leading]));
    }
}
