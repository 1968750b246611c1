//! Node record construction: ids, unique names, type resolution, parameter
//! shims.

use std::collections::HashSet;

use tracing::warn;

use crate::{
    catalog::NodeCatalog,
    common::Vars,
    diagnostics::Diagnostic,
    model::{ActionSpec, Node, NodeKind, NodeName, Position, TRIGGER_NAME, TypeId},
};

/// Reserved service prefix that marks a branching action.
const CONDITIONAL_SERVICE: &str = "if";
/// Trigger key prefix for time-based triggers.
const SCHEDULE_PREFIX: &str = "schedule.";

/// Conditional node type on the target engine.
const CONDITIONAL_TYPE: &str = "n8n-nodes-base.if";
/// Catch-all action type for unresolved services.
const FUNCTION_TYPE: &str = "n8n-nodes-base.function";
/// Time-based trigger type, used when the catalog has no cron entry.
const CRON_TRIGGER_TYPE: &str = "n8n-nodes-base.cron";
/// Generic trigger type for unresolved trigger services.
const MANUAL_TRIGGER_TYPE: &str = "n8n-nodes-base.manualTrigger";

/// Builds node records for the trigger and each action.
///
/// The used-name set and id counter are instance fields so concurrent builds
/// never interfere; one factory serves exactly one build.
pub struct NodeFactory<'a> {
    catalog: &'a dyn NodeCatalog,
    used_names: HashSet<NodeName>,
    next_id: u32,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> NodeFactory<'a> {
    pub fn new(catalog: &'a dyn NodeCatalog) -> Self {
        Self {
            catalog,
            used_names: HashSet::from([TRIGGER_NAME.to_string()]),
            next_id: 1,
            diagnostics: Vec::new(),
        }
    }

    /// Creates the graph's entry node: always named `"Trigger"`, always id 1,
    /// always at the origin before layout.
    pub fn create_trigger(
        &mut self,
        trigger_key: &str,
        trigger_params: Vars,
    ) -> Node {
        let type_key = self.resolve_trigger_type(trigger_key);
        self.build_node(TRIGGER_NAME.to_string(), type_key, NodeKind::Trigger, [0.0, 0.0], trigger_params)
    }

    /// Creates one action node at the given provisional position. Duplicate
    /// action keys get `_2`, `_3`, … suffixes in first-seen order.
    pub fn create_action(
        &mut self,
        spec: &ActionSpec,
        position: Position,
    ) -> Node {
        let (type_key, kind) = self.resolve_action_type(&spec.action);
        let name = self.unique_name(&spec.action);
        let parameters = shim_parameters(&type_key, &spec.params);
        self.build_node(name, type_key, kind, position, parameters)
    }

    /// Diagnostics accumulated while resolving, drained by the assembler.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn build_node(
        &mut self,
        name: NodeName,
        type_key: TypeId,
        kind: NodeKind,
        position: Position,
        parameters: Vars,
    ) -> Node {
        let id = self.next_id.to_string();
        self.next_id += 1;

        let type_version = type_version(&type_key);
        Node {
            id,
            name,
            type_key,
            type_version,
            position,
            parameters,
            kind,
        }
    }

    /// Trigger resolution: schedule-prefixed keys use the cron type; other
    /// services try the catalog directly, then with a `trigger` suffix, then
    /// fall back to the generic manual trigger.
    fn resolve_trigger_type(
        &mut self,
        trigger_key: &str,
    ) -> TypeId {
        if trigger_key.starts_with(SCHEDULE_PREFIX) {
            return self.catalog.lookup_trigger("cron").unwrap_or_else(|| CRON_TRIGGER_TYPE.to_string());
        }

        let service = service_prefix(trigger_key);
        if let Some(type_key) = self.catalog.lookup_trigger(&service) {
            return type_key;
        }
        if let Some(type_key) = self.catalog.lookup_trigger(&format!("{}trigger", service)) {
            return type_key;
        }

        self.record_miss(&service, MANUAL_TRIGGER_TYPE);
        MANUAL_TRIGGER_TYPE.to_string()
    }

    /// Action resolution tiers: the reserved conditional marker, then an
    /// exact catalog match on the service prefix, then the function
    /// catch-all. Misses are diagnostics, never failures.
    fn resolve_action_type(
        &mut self,
        action_key: &str,
    ) -> (TypeId, NodeKind) {
        let service = service_prefix(action_key);
        if service == CONDITIONAL_SERVICE {
            return (CONDITIONAL_TYPE.to_string(), NodeKind::Conditional);
        }

        if let Some(type_key) = self.catalog.lookup_action(&service) {
            return (type_key, NodeKind::Leaf);
        }

        self.record_miss(&service, FUNCTION_TYPE);
        (FUNCTION_TYPE.to_string(), NodeKind::Leaf)
    }

    fn record_miss(
        &mut self,
        key: &str,
        fallback: &str,
    ) {
        warn!(key, fallback, "catalog miss, using fallback type");
        self.diagnostics.push(Diagnostic::CatalogMiss {
            key: key.to_string(),
            fallback: fallback.to_string(),
        });
    }

    fn unique_name(
        &mut self,
        base: &str,
    ) -> NodeName {
        let mut name = base.to_string();
        let mut counter = 2;
        while self.used_names.contains(&name) {
            name = format!("{}_{}", base, counter);
            counter += 1;
        }
        self.used_names.insert(name.clone());
        name
    }
}

/// Everything before the first `.`, lowercased.
fn service_prefix(key: &str) -> String {
    key.split('.').next().unwrap_or(key).to_lowercase()
}

/// Schema version of a node type on the target engine.
fn type_version(type_key: &str) -> f64 {
    match type_key {
        CONDITIONAL_TYPE => 2.2,
        _ => 1.0,
    }
}

/// Function nodes duplicate the script payload under every alias the target
/// schema might read. The schema is ambiguous about which one applies, so
/// all of them are populated; this is a compatibility shim, not a bug.
fn shim_parameters(
    type_key: &str,
    params: &Vars,
) -> Vars {
    if type_key != FUNCTION_TYPE {
        return params.clone();
    }
    let Some(code) = params.get::<String>("code") else {
        return params.clone();
    };

    Vars::new()
        .with("functionCode", &code)
        .with("code", &code)
        .with("jsCode", &code)
        .with("language", "javascript")
}
