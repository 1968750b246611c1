//! Non-fatal build anomalies, reported alongside a still-usable graph.
//!
//! Upstream input is LLM-derived and frequently imperfect; the build stays
//! usable by absorbing these conditions instead of failing. Only contract
//! violations in the action list abort a build (see `FlowforgeError`).

use serde::{Deserialize, Serialize};

use crate::model::{NodeName, TypeId};

/// One recorded anomaly.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A service key that resolved to no catalog entry and fell back to a
    /// default type.
    CatalogMiss {
        key: String,
        fallback: TypeId,
    },
    /// A node the layered pass never reached, repositioned on the fallback
    /// grid.
    LayoutFallback {
        node: NodeName,
    },
    /// A node unreachable from the trigger. Intentionally dead branches are
    /// valid input, so this is surfaced for monitoring only.
    Orphan {
        node: NodeName,
    },
}
