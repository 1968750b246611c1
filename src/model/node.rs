//! Graph node model in the target engine's wire format.

use serde::{Deserialize, Serialize};

use crate::common::Vars;

/// Node name, unique within a graph.
pub type NodeName = String;

/// Canonical node type identifier, e.g. `n8n-nodes-base.slack`.
pub type TypeId = String;

/// 2-D node coordinates, `[x, y]` top-left.
pub type Position = [f64; 2];

/// Name reserved for the single entry node of every graph.
pub const TRIGGER_NAME: &str = "Trigger";

/// Structural kind of a node, resolved once during type resolution.
///
/// Downstream components dispatch on this tag instead of re-deriving the
/// kind from the node's type string.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
    /// The graph's entry node.
    Trigger,
    /// A node that splits execution into true/false ports.
    Conditional,
    /// Everything else.
    #[default]
    Leaf,
}

/// One node of the produced graph. Immutable once the build completes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Sequential per-graph id, rendered in decimal. The trigger is always 1.
    pub id: String,
    /// Unique display name.
    pub name: NodeName,
    /// Resolved type identifier.
    #[serde(rename = "type")]
    pub type_key: TypeId,
    /// Schema version of the node type on the target engine.
    pub type_version: f64,
    /// Layout coordinates.
    pub position: Position,
    /// Opaque parameter payload.
    pub parameters: Vars,
    /// Structural kind, build-time only.
    #[serde(skip)]
    pub kind: NodeKind,
}

impl Node {
    pub fn is_trigger(&self) -> bool {
        self.kind == NodeKind::Trigger
    }

    pub fn is_conditional(&self) -> bool {
        self.kind == NodeKind::Conditional
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_wire_format() {
        let node = Node {
            id: "2".to_string(),
            name: "slack.send".to_string(),
            type_key: "n8n-nodes-base.slack".to_string(),
            type_version: 1.0,
            position: [300.0, 100.0],
            parameters: Vars::new().with("channel", "#ops"),
            kind: NodeKind::Leaf,
        };

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["id"], "2");
        assert_eq!(value["type"], "n8n-nodes-base.slack");
        assert_eq!(value["typeVersion"], 1.0);
        assert_eq!(value["position"], serde_json::json!([300.0, 100.0]));
        // kind is build-time state, not part of the wire format
        assert!(value.get("kind").is_none());
    }
}
