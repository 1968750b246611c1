//! Build orchestration: intent in, laid-out graph plus diagnostics out.

use std::sync::Arc;

use tracing::debug;

use crate::{
    FlowforgeError, Result,
    build::{FlowGraphBuilder, NodeFactory},
    catalog::NodeCatalog,
    config::Config,
    diagnostics::Diagnostic,
    layout::LayoutEngine,
    model::{Graph, IntentSpec},
    validator::GraphValidator,
};

/// Name given to graphs whose caller did not supply one.
pub const DEFAULT_GRAPH_NAME: &str = "AI Generated Workflow";

/// A finished build: the graph and every non-fatal anomaly encountered while
/// producing it.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub graph: Graph,
    pub diagnostics: Vec<Diagnostic>,
}

/// Orchestrates one build: node creation, edge routing, layout, validation.
///
/// The assembler itself is stateless across builds; every `assemble` call
/// owns a fresh factory and builder, so one assembler may serve concurrent
/// builds from multiple threads.
pub struct GraphAssembler {
    catalog: Arc<dyn NodeCatalog>,
    config: Config,
}

impl GraphAssembler {
    pub fn new(catalog: Arc<dyn NodeCatalog>) -> Self {
        Self::with_config(catalog, Config::default())
    }

    pub fn with_config(
        catalog: Arc<dyn NodeCatalog>,
        config: Config,
    ) -> Self {
        Self {
            catalog,
            config,
        }
    }

    /// Builds a graph under the default name.
    pub fn assemble(
        &self,
        intent: &IntentSpec,
    ) -> Result<BuildOutput> {
        self.assemble_named(intent, DEFAULT_GRAPH_NAME)
    }

    /// Builds a graph from one intent. Fails only on contract violations in
    /// the action list; every other anomaly is absorbed into diagnostics.
    pub fn assemble_named(
        &self,
        intent: &IntentSpec,
        name: &str,
    ) -> Result<BuildOutput> {
        if intent.trigger.trim().is_empty() {
            return Err(FlowforgeError::Intent("intent has no trigger".to_string()));
        }

        debug!(trigger = %intent.trigger, actions = intent.actions.len(), "assembling graph");

        let mut factory = NodeFactory::new(self.catalog.as_ref());
        let mut builder = FlowGraphBuilder::new();
        let mut graph = Graph::new(name);

        graph.add_node(factory.create_trigger(&intent.trigger, intent.trigger_params.clone()));

        for (index, spec) in intent.actions.iter().enumerate() {
            let node = factory.create_action(spec, [0.0, 0.0]);
            builder.connect(index, spec.mode, node.kind, &node.name)?;
            graph.add_node(node);
        }

        graph.connections = builder.into_connections();

        let mut diagnostics = factory.take_diagnostics();
        diagnostics.extend(LayoutEngine::new(self.config.layout.clone()).layout(&mut graph));
        diagnostics.extend(GraphValidator::new().validate(&graph));

        debug!(nodes = graph.nodes.len(), diagnostics = diagnostics.len(), "graph assembled");

        Ok(BuildOutput {
            graph,
            diagnostics,
        })
    }
}
