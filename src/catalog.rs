//! Node type catalog: the lookup contract between the build and the target
//! engine's node inventory.
//!
//! The build only ever asks two questions: "which trigger type implements
//! this service?" and "which action type implements this service?". Loading
//! and refreshing the underlying inventory is the collaborator's concern and
//! happens before a build starts.

use std::collections::HashMap;

use regex::Regex;
use serde::Deserialize;

use crate::{FlowforgeError, Result, model::TypeId};

/// Read-only lookup from a lowercase service key to a canonical node type.
pub trait NodeCatalog: Send + Sync {
    fn lookup_trigger(
        &self,
        service: &str,
    ) -> Option<TypeId>;

    fn lookup_action(
        &self,
        service: &str,
    ) -> Option<TypeId>;
}

/// Suffixes that service keys commonly carry without changing which node
/// they refer to.
const KEY_SUFFIXES: [&str; 5] = ["trigger", "api", "webhook", "node", "service"];

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    triggers: HashMap<String, TypeId>,
    #[serde(default)]
    actions: HashMap<String, TypeId>,
}

/// An in-memory catalog, pre-loaded and immutable during builds.
///
/// Each registered key is also indexed under generated variations (suffix
/// stripped, separators removed, embedded words) so near-miss service keys
/// from upstream still resolve. Direct registrations always win over
/// variations; among variations, first registration wins.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    triggers: HashMap<String, TypeId>,
    actions: HashMap<String, TypeId>,
}

impl StaticCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog seeded with the built-in n8n-base entries.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        for (key, type_id) in [
            ("webhook", "n8n-nodes-base.webhook"),
            ("cron", "n8n-nodes-base.cron"),
            ("schedule", "n8n-nodes-base.cron"),
            ("manual", "n8n-nodes-base.manualTrigger"),
            ("gmailtrigger", "n8n-nodes-base.gmailTrigger"),
            ("slacktrigger", "n8n-nodes-base.slackTrigger"),
        ] {
            catalog.add_trigger(key, type_id);
        }

        for (key, type_id) in [
            ("httprequest", "n8n-nodes-base.httpRequest"),
            ("wait", "n8n-nodes-base.wait"),
            ("delay", "n8n-nodes-base.wait"),
            ("postgres", "n8n-nodes-base.postgres"),
            ("mysql", "n8n-nodes-base.mySql"),
            ("mongodb", "n8n-nodes-base.mongoDb"),
            ("salesforce", "n8n-nodes-base.salesforce"),
            ("gmail", "n8n-nodes-base.gmail"),
            ("mailchimp", "n8n-nodes-base.mailchimp"),
            ("slack", "n8n-nodes-base.slack"),
            ("airtable", "n8n-nodes-base.airtable"),
            ("googlecalendar", "n8n-nodes-base.googleCalendar"),
            ("sms77", "n8n-nodes-base.sms77"),
        ] {
            catalog.add_action(key, type_id);
        }

        catalog
    }

    /// Loads a catalog document of the form
    /// `{ "triggers": { key: type }, "actions": { key: type } }`.
    pub fn from_json(s: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(s).map_err(|e| FlowforgeError::Catalog(format!("invalid catalog document: {}", e)))?;

        let mut catalog = Self::new();
        for (key, type_id) in document.triggers {
            catalog.add_trigger(&key, &type_id);
        }
        for (key, type_id) in document.actions {
            catalog.add_action(&key, &type_id);
        }
        Ok(catalog)
    }

    /// Registers a trigger type under a key and its variations.
    pub fn add_trigger(
        &mut self,
        key: &str,
        type_id: &str,
    ) {
        Self::register(&mut self.triggers, key, type_id);
    }

    /// Registers an action type under a key and its variations.
    pub fn add_action(
        &mut self,
        key: &str,
        type_id: &str,
    ) {
        Self::register(&mut self.actions, key, type_id);
    }

    fn register(
        map: &mut HashMap<String, TypeId>,
        key: &str,
        type_id: &str,
    ) {
        map.insert(normalize(key), type_id.to_string());
        for variation in variations(key) {
            map.entry(variation).or_insert_with(|| type_id.to_string());
        }
    }
}

impl NodeCatalog for StaticCatalog {
    fn lookup_trigger(
        &self,
        service: &str,
    ) -> Option<TypeId> {
        self.triggers.get(&normalize(service)).cloned()
    }

    fn lookup_action(
        &self,
        service: &str,
    ) -> Option<TypeId> {
        self.actions.get(&normalize(service)).cloned()
    }
}

/// Canonical lookup form: lowercase with separators removed.
fn normalize(key: &str) -> String {
    key.to_lowercase().chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Generates alternate lookup keys for one registered service name.
fn variations(key: &str) -> Vec<String> {
    let key = key.to_lowercase();
    let mut variations = Vec::new();

    // Suffix-stripped forms: "slacktrigger" is still "slack"
    for suffix in KEY_SUFFIXES {
        if let Some(base) = key.strip_suffix(suffix) {
            variations.push(normalize(base));
        }
    }

    // Embedded words: "google-calendar" also answers to "google" and "calendar"
    let word = Regex::new(r"[a-z]{3,}").unwrap();
    for m in word.find_iter(&key) {
        variations.push(m.as_str().to_string());
    }

    variations.retain(|v| v.len() > 1 && *v != normalize(&key));
    variations.dedup();
    variations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let catalog = StaticCatalog::builtin();
        assert_eq!(catalog.lookup_action("slack").as_deref(), Some("n8n-nodes-base.slack"));
        assert_eq!(catalog.lookup_trigger("webhook").as_deref(), Some("n8n-nodes-base.webhook"));
        assert_eq!(catalog.lookup_action("nonexistent"), None);
    }

    #[test]
    fn test_lookup_normalizes_separators() {
        let catalog = StaticCatalog::builtin();
        assert_eq!(catalog.lookup_action("http-request").as_deref(), Some("n8n-nodes-base.httpRequest"));
        assert_eq!(catalog.lookup_action("HTTP_Request").as_deref(), Some("n8n-nodes-base.httpRequest"));
    }

    #[test]
    fn test_suffix_variation() {
        let catalog = StaticCatalog::builtin();
        // "gmailtrigger" also registers its suffix-stripped base
        assert_eq!(catalog.lookup_trigger("gmail").as_deref(), Some("n8n-nodes-base.gmailTrigger"));
    }

    #[test]
    fn test_direct_registration_wins_over_variation() {
        let mut catalog = StaticCatalog::new();
        catalog.add_action("googlecalendar", "n8n-nodes-base.googleCalendar");
        // direct key beats the word variation "google" already registered above
        catalog.add_action("google", "n8n-nodes-base.google");
        assert_eq!(catalog.lookup_action("google").as_deref(), Some("n8n-nodes-base.google"));
        assert_eq!(catalog.lookup_action("googlecalendar").as_deref(), Some("n8n-nodes-base.googleCalendar"));
    }

    #[test]
    fn test_from_json() {
        let catalog = StaticCatalog::from_json(
            r#"{
                "triggers": { "webhook": "n8n-nodes-base.webhook" },
                "actions": { "notion": "n8n-nodes-base.notion" }
            }"#,
        )
        .unwrap();
        assert_eq!(catalog.lookup_trigger("webhook").as_deref(), Some("n8n-nodes-base.webhook"));
        assert_eq!(catalog.lookup_action("notion").as_deref(), Some("n8n-nodes-base.notion"));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(StaticCatalog::from_json("[]").is_err());
    }
}
