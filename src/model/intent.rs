//! Input model: the flat, control-flow-annotated action list.
//!
//! An `IntentSpec` is produced upstream (typically by a text-to-intent
//! service) and is the sole input to a build. Documents are validated
//! against a JSON schema before deserialization so malformed upstream
//! output is rejected with a pointer into the offending field.

use serde::{Deserialize, Serialize};

use crate::{Result, common::Vars};

/// An action's declared relationship to the existing execution lanes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExecutionMode {
    /// Chain after the last node on the main lane.
    #[default]
    Sequential,
    /// Chain on the parallel lane, branching off the trigger.
    Parallel,
    /// Chain on the true branch of the active conditional.
    BranchTrue,
    /// Chain on the false branch of the active conditional.
    BranchFalse,
}

/// One requested step: a dot-delimited `service.verb` key, an opaque
/// parameter payload, and an execution mode.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ActionSpec {
    pub action: String,
    #[serde(default)]
    pub params: Vars,
    #[serde(default)]
    pub mode: ExecutionMode,
}

/// The full build input. Action order is semantically meaningful: it defines
/// default chaining.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntentSpec {
    pub trigger: String,
    #[serde(default)]
    pub trigger_params: Vars,
    pub actions: Vec<ActionSpec>,
}

impl IntentSpec {
    /// Parses and validates an intent document.
    pub fn from_json(s: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        let schema = Self::schema();
        jsonschema::validate(&schema, &value)?;

        let intent = serde_json::from_value(value)?;
        Ok(intent)
    }

    /// Returns the schema an intent document must satisfy.
    pub fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "trigger": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Trigger key, e.g. webhook.received"
                },
                "triggerParams": {
                    "type": "object",
                    "description": "Parameters forwarded to the trigger node"
                },
                "actions": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "action": {
                                "type": "string",
                                "minLength": 1,
                                "description": "Dot-delimited service.verb key"
                            },
                            "params": {
                                "type": "object",
                                "description": "Opaque parameters forwarded to the node"
                            },
                            "mode": {
                                "type": "string",
                                "enum": ["sequential", "parallel", "branch_true", "branch_false"]
                            }
                        },
                        "required": ["action"]
                    }
                }
            },
            "required": ["trigger", "actions"]
        })
    }
}
