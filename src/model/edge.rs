//! Connection model: per-source, per-port edge lists.
//!
//! The wire format groups edges under their source node as
//! `{ "main": [ [targets at port 0], [targets at port 1] ] }`. Port 0 is the
//! primary/true output, port 1 the alternate/false output.

use serde::{Deserialize, Serialize};

use crate::model::node::NodeName;

/// Primary/true output port.
pub const PORT_TRUE: usize = 0;
/// Alternate/false output port.
pub const PORT_FALSE: usize = 1;

/// Connection channel on the target engine. Only the main channel exists in
/// this design.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionKind {
    #[default]
    Main,
}

/// One endpoint of a connection: the target node and its input port.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConnectionTarget {
    pub node: NodeName,
    #[serde(rename = "type")]
    pub kind: ConnectionKind,
    pub index: usize,
}

impl ConnectionTarget {
    pub fn new(
        node: impl Into<NodeName>,
        index: usize,
    ) -> Self {
        Self {
            node: node.into(),
            kind: ConnectionKind::Main,
            index,
        }
    }
}

/// All outgoing connections of one node, indexed by output port.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NodePorts {
    pub main: Vec<Vec<ConnectionTarget>>,
}

impl NodePorts {
    /// Appends a target at the given output port, growing the port list as
    /// needed. Lower ports stay present (as empty lists) so port indices
    /// remain positional on the wire.
    pub fn add(
        &mut self,
        output_port: usize,
        target: ConnectionTarget,
    ) {
        while self.main.len() <= output_port {
            self.main.push(Vec::new());
        }
        self.main[output_port].push(target);
    }

    /// Targets at one output port.
    pub fn port(
        &self,
        output_port: usize,
    ) -> &[ConnectionTarget] {
        self.main.get(output_port).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Flattened view of a single connection, used by layout and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: NodeName,
    pub output_port: usize,
    pub to: NodeName,
    pub input_port: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ports_grow_positionally() {
        let mut ports = NodePorts::default();
        ports.add(PORT_FALSE, ConnectionTarget::new("f1", 0));

        // port 0 exists but is empty, port 1 holds the target
        assert_eq!(ports.main.len(), 2);
        assert!(ports.port(PORT_TRUE).is_empty());
        assert_eq!(ports.port(PORT_FALSE)[0].node, "f1");
    }

    #[test]
    fn test_target_wire_format() {
        let target = ConnectionTarget::new("slack.send", 0);
        let value = serde_json::to_value(&target).unwrap();
        assert_eq!(value, serde_json::json!({ "node": "slack.send", "type": "main", "index": 0 }));
    }
}
