mod edge;
mod graph;
mod intent;
mod node;

pub use edge::{ConnectionKind, ConnectionTarget, Edge, NodePorts, PORT_FALSE, PORT_TRUE};
pub use graph::{Graph, GraphSettings, GraphStats};
pub use intent::{ActionSpec, ExecutionMode, IntentSpec};
pub use node::{Node, NodeKind, NodeName, Position, TRIGGER_NAME, TypeId};
