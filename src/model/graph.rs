//! The produced execution graph, in the target engine's wire format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    FlowforgeError, Result,
    model::{
        edge::{ConnectionTarget, Edge, NodePorts},
        node::{Node, NodeName, TRIGGER_NAME, TypeId},
    },
};

/// Workflow-level settings forwarded to the target engine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphSettings {
    pub save_execution_progress: bool,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            save_execution_progress: true,
        }
    }
}

/// A complete, laid-out execution graph. Read-only once the build returns;
/// deployment and persistence collaborators consume it verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub name: String,
    pub nodes: Vec<Node>,
    /// Per-source, per-port edge lists, keyed by source node name. A
    /// `BTreeMap` keeps serialization deterministic.
    pub connections: BTreeMap<NodeName, NodePorts>,
    #[serde(default)]
    pub settings: GraphSettings,
}

/// Summary counters over a produced graph.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub connection_count: usize,
    pub trigger_type: Option<TypeId>,
    pub has_conditional_nodes: bool,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| FlowforgeError::Graph(format!("{}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        let s = serde_json::to_string_pretty(self)?;
        Ok(s)
    }

    pub fn add_node(
        &mut self,
        node: Node,
    ) {
        self.nodes.push(node);
    }

    /// Records one connection `from --port--> to`.
    pub fn add_connection(
        &mut self,
        from: &str,
        to: &str,
        output_port: usize,
        input_port: usize,
    ) {
        self.connections.entry(from.to_string()).or_default().add(output_port, ConnectionTarget::new(to, input_port));
    }

    /// Looks a node up by name.
    pub fn node(
        &self,
        name: &str,
    ) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn node_mut(
        &mut self,
        name: &str,
    ) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.name == name)
    }

    /// Targets reachable from one node at one output port.
    pub fn targets(
        &self,
        from: &str,
        output_port: usize,
    ) -> &[ConnectionTarget] {
        self.connections.get(from).map(|p| p.port(output_port)).unwrap_or(&[])
    }

    /// Flattens the per-port connection lists into a single edge list.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::new();
        for (from, ports) in &self.connections {
            for (output_port, targets) in ports.main.iter().enumerate() {
                for target in targets {
                    edges.push(Edge {
                        from: from.clone(),
                        output_port,
                        to: target.node.clone(),
                        input_port: target.index,
                    });
                }
            }
        }
        edges
    }

    /// Summary counters, mirroring what the monitoring surface reports.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.nodes.len(),
            connection_count: self.connections.len(),
            trigger_type: self.node(TRIGGER_NAME).map(|n| n.type_key.clone()),
            has_conditional_nodes: self.nodes.iter().any(|n| n.is_conditional()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::Vars,
        model::{
            edge::{PORT_FALSE, PORT_TRUE},
            node::NodeKind,
        },
    };

    fn node(
        id: &str,
        name: &str,
        kind: NodeKind,
    ) -> Node {
        Node {
            id: id.to_string(),
            name: name.to_string(),
            type_key: "n8n-nodes-base.function".to_string(),
            type_version: 1.0,
            position: [0.0, 0.0],
            parameters: Vars::new(),
            kind,
        }
    }

    #[test]
    fn test_edges_flatten_ports() {
        let mut graph = Graph::new("test");
        graph.add_node(node("1", "Trigger", NodeKind::Trigger));
        graph.add_node(node("2", "if.check", NodeKind::Conditional));
        graph.add_node(node("3", "t1", NodeKind::Leaf));
        graph.add_node(node("4", "f1", NodeKind::Leaf));
        graph.add_connection("Trigger", "if.check", PORT_TRUE, 0);
        graph.add_connection("if.check", "t1", PORT_TRUE, 0);
        graph.add_connection("if.check", "f1", PORT_FALSE, 0);

        let edges = graph.edges();
        assert_eq!(edges.len(), 3);
        assert!(edges.iter().any(|e| e.from == "if.check" && e.to == "t1" && e.output_port == PORT_TRUE));
        assert!(edges.iter().any(|e| e.from == "if.check" && e.to == "f1" && e.output_port == PORT_FALSE));
    }

    #[test]
    fn test_stats() {
        let mut graph = Graph::new("test");
        graph.add_node(node("1", "Trigger", NodeKind::Trigger));
        graph.add_node(node("2", "if.check", NodeKind::Conditional));
        graph.add_connection("Trigger", "if.check", PORT_TRUE, 0);

        let stats = graph.stats();
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.connection_count, 1);
        assert_eq!(stats.trigger_type.as_deref(), Some("n8n-nodes-base.function"));
        assert!(stats.has_conditional_nodes);
    }

    #[test]
    fn test_wire_format_roundtrip() {
        let mut graph = Graph::new("AI Generated Workflow");
        graph.add_node(node("1", "Trigger", NodeKind::Trigger));
        graph.add_node(node("2", "slack.send", NodeKind::Leaf));
        graph.add_connection("Trigger", "slack.send", PORT_TRUE, 0);

        let json = graph.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "AI Generated Workflow");
        assert_eq!(value["settings"]["saveExecutionProgress"], true);
        assert_eq!(value["connections"]["Trigger"]["main"][0][0]["node"], "slack.send");

        let parsed = Graph::from_json(&json).unwrap();
        assert_eq!(parsed.nodes.len(), 2);
        assert_eq!(parsed.targets("Trigger", PORT_TRUE)[0].node, "slack.send");
    }
}
