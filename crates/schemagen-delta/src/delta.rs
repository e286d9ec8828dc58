//! Delta computation and application over flat config maps
//!
//! `compute(base, target)` partitions every changed key into exactly one of
//! additions, deletions or updates; `apply(base, delta)` rebuilds the target.
//! Values compare structurally with no numeric coercion: `1` and `"1"` differ.
//! Numbers keep their literal text, and maps keep their file key order.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use schemagen_core::artifact::{read_source, write_json};
use schemagen_core::{Diagnostic, DiagnosticCode, Error, Result};

use crate::config_map::ConfigMap;

/// A key present only in the target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addition {
    pub key: String,
    pub value: Value,
}

/// A key present in both maps with differing values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub key: String,
    pub from: Value,
    pub to: Value,
}

/// Difference between a base and a target config map (delta.json)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    /// Keys only in the target
    pub additions: Vec<Addition>,

    /// Keys only in the base
    pub deletions: Vec<String>,

    /// Keys in both with a changed value
    pub updates: Vec<Update>,
}

/// Section counts of a delta
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaSummary {
    pub additions: usize,
    pub deletions: usize,
    pub updates: usize,
}

impl std::fmt::Display for DeltaSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} added, {} deleted, {} updated",
            self.additions, self.deletions, self.updates
        )
    }
}

impl Delta {
    /// Whether the delta changes nothing
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.deletions.is_empty() && self.updates.is_empty()
    }

    /// Total number of entries across sections
    pub fn len(&self) -> usize {
        self.additions.len() + self.deletions.len() + self.updates.len()
    }

    /// Section counts
    pub fn summary(&self) -> DeltaSummary {
        DeltaSummary {
            additions: self.additions.len(),
            deletions: self.deletions.len(),
            updates: self.updates.len(),
        }
    }

    /// Every key mentioned by any section
    pub fn touched_keys(&self) -> BTreeSet<&str> {
        self.additions
            .iter()
            .map(|a| a.key.as_str())
            .chain(self.deletions.iter().map(String::as_str))
            .chain(self.updates.iter().map(|u| u.key.as_str()))
            .collect()
    }

    /// Report keys listed more than once
    ///
    /// A computed delta never has any. Hand-edited ones may; `apply` still
    /// resolves them (updates win over additions, both win over deletions).
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut sections: HashMap<&str, Vec<&'static str>> = HashMap::new();
        for a in &self.additions {
            sections.entry(a.key.as_str()).or_default().push("additions");
        }
        for key in &self.deletions {
            sections.entry(key.as_str()).or_default().push("deletions");
        }
        for u in &self.updates {
            sections.entry(u.key.as_str()).or_default().push("updates");
        }

        let mut overlapping: Vec<(&str, Vec<&'static str>)> = sections
            .into_iter()
            .filter(|(_, listed)| listed.len() > 1)
            .collect();
        overlapping.sort();

        overlapping
            .into_iter()
            .map(|(key, listed)| {
                Diagnostic::warn(
                    DiagnosticCode::DeltaOverlappingKeys,
                    format!("Key '{}' is listed in {}", key, listed.join(", ")),
                )
            })
            .collect()
    }

    /// Parse a delta document from JSON text
    pub fn from_json(source_name: impl Into<String>, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::parse(source_name, e.to_string()))
    }

    /// Load a delta document from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = read_source(path)?;
        Self::from_json(path.display().to_string(), &contents)
    }

    /// Write the delta as pretty JSON, returning the artifact digest
    pub fn save_to_file(&self, path: &Path) -> Result<String> {
        write_json(path, self)
    }
}

/// Computes and applies deltas
pub struct DeltaEngine;

impl DeltaEngine {
    /// Compute the delta turning `base` into `target`
    ///
    /// Target keys are scanned for additions and updates, then base keys for
    /// deletions. Each section follows the maps' key order.
    pub fn compute(base: &ConfigMap, target: &ConfigMap) -> Delta {
        let mut delta = Delta::default();

        for (key, value) in target {
            match base.get(key) {
                None => delta.additions.push(Addition {
                    key: key.clone(),
                    value: value.clone(),
                }),
                Some(previous) if previous != value => delta.updates.push(Update {
                    key: key.clone(),
                    from: previous.clone(),
                    to: value.clone(),
                }),
                Some(_) => {}
            }
        }

        for key in base.keys() {
            if !target.contains_key(key) {
                delta.deletions.push(key.clone());
            }
        }

        tracing::debug!(
            base_keys = base.len(),
            target_keys = target.len(),
            summary = %delta.summary(),
            "delta computed"
        );
        delta
    }

    /// Apply `delta` to a copy of `base`
    ///
    /// Deletions first (absent keys are skipped), then additions, then
    /// updates; a key in both additions and updates ends with `updates.to`.
    /// Surviving keys keep their base position; added keys are appended.
    pub fn apply(base: &ConfigMap, delta: &Delta) -> ConfigMap {
        let mut patched = base.clone();

        for key in &delta.deletions {
            if patched.shift_remove(key).is_none() {
                tracing::debug!(key = %key, "deleted key already absent");
            }
        }

        for addition in &delta.additions {
            patched.insert(addition.key.clone(), addition.value.clone());
        }

        for update in &delta.updates {
            patched.insert(update.key.clone(), update.to.clone());
        }

        tracing::debug!(
            base_keys = base.len(),
            patched_keys = patched.len(),
            "delta applied"
        );
        patched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_map::parse_config_map;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(value: Value) -> ConfigMap {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn documented_scenario() {
        let base = map(json!({"a": 1, "b": 2}));
        let target = map(json!({"b": 3, "c": 4}));

        let delta = DeltaEngine::compute(&base, &target);

        assert_eq!(
            serde_json::to_value(&delta).unwrap(),
            json!({
                "additions": [{"key": "c", "value": 4}],
                "deletions": ["a"],
                "updates": [{"key": "b", "from": 2, "to": 3}]
            })
        );
        assert_eq!(DeltaEngine::apply(&base, &delta), target);
    }

    #[test]
    fn no_numeric_coercion() {
        let base = map(json!({"n": 10}));
        let target = map(json!({"n": "10"}));

        let delta = DeltaEngine::compute(&base, &target);
        assert_eq!(
            delta.updates,
            vec![Update { key: "n".into(), from: json!(10), to: json!("10") }]
        );
    }

    #[test]
    fn nested_values_compare_structurally() {
        let base = map(json!({"t": {"a": [1, 2]}, "same": {"x": null}}));
        let target = map(json!({"t": {"a": [2, 1]}, "same": {"x": null}}));

        let delta = DeltaEngine::compute(&base, &target);
        assert_eq!(delta.summary(), DeltaSummary { additions: 0, deletions: 0, updates: 1 });
        assert_eq!(delta.updates[0].key, "t");
    }

    #[test]
    fn identical_maps_give_empty_delta() {
        let base = map(json!({"a": 1}));
        let delta = DeltaEngine::compute(&base, &base.clone());
        assert!(delta.is_empty());
        assert_eq!(delta.len(), 0);
    }

    #[test]
    fn apply_does_not_mutate_base() {
        let base = map(json!({"a": 1}));
        let delta = Delta {
            deletions: vec!["a".into()],
            ..Delta::default()
        };

        let patched = DeltaEngine::apply(&base, &delta);
        assert!(patched.is_empty());
        assert_eq!(base, map(json!({"a": 1})));
    }

    #[test]
    fn deleting_absent_key_is_noop() {
        let base = map(json!({"a": 1}));
        let delta = Delta {
            deletions: vec!["zzz".into()],
            ..Delta::default()
        };
        assert_eq!(DeltaEngine::apply(&base, &delta), base);
    }

    #[test]
    fn update_wins_over_addition_for_same_key() {
        let base = map(json!({}));
        let delta = Delta {
            additions: vec![Addition { key: "k".into(), value: json!("added") }],
            deletions: vec![],
            updates: vec![Update { key: "k".into(), from: json!(null), to: json!("updated") }],
        };

        assert_eq!(DeltaEngine::apply(&base, &delta), map(json!({"k": "updated"})));

        let findings = delta.validate();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, DiagnosticCode::DeltaOverlappingKeys);
        assert!(findings[0].message.contains("additions, updates"));
    }

    #[test]
    fn addition_survives_deletion_of_same_key() {
        let base = map(json!({"k": 1}));
        let delta = Delta {
            additions: vec![Addition { key: "k".into(), value: json!(2) }],
            deletions: vec!["k".into()],
            updates: vec![],
        };
        assert_eq!(DeltaEngine::apply(&base, &delta), map(json!({"k": 2})));
    }

    #[test]
    fn computed_delta_validates_clean() {
        let base = map(json!({"a": 1, "b": 2, "c": 3}));
        let target = map(json!({"b": 20, "c": 3, "d": 4}));
        let delta = DeltaEngine::compute(&base, &target);

        assert!(delta.validate().is_empty());
        assert_eq!(
            delta.touched_keys().into_iter().collect::<Vec<_>>(),
            vec!["a", "b", "d"]
        );
    }

    #[test]
    fn delta_document_must_have_all_sections() {
        let err = Delta::from_json("delta.json", r#"{"additions": [], "deletions": []}"#).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn delta_document_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("delta.json");

        let delta = DeltaEngine::compute(&map(json!({"a": 1})), &map(json!({"a": 2, "b": [1]})));
        delta.save_to_file(&path).unwrap();

        assert_eq!(Delta::from_file(&path).unwrap(), delta);
    }

    #[test]
    fn apply_keeps_base_key_order() {
        let base = parse_config_map("base.json", r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let target = parse_config_map("target.json", r#"{"zeta": 10, "mid": 3, "new": 4}"#).unwrap();

        let delta = DeltaEngine::compute(&base, &target);
        assert_eq!(delta.deletions, vec!["alpha"]);

        let patched = DeltaEngine::apply(&base, &delta);
        assert_eq!(patched.keys().collect::<Vec<_>>(), vec!["zeta", "mid", "new"]);
        assert_eq!(
            serde_json::to_string(&patched).unwrap(),
            r#"{"zeta":10,"mid":3,"new":4}"#
        );
    }

    #[test]
    fn summary_display() {
        let summary = DeltaSummary { additions: 1, deletions: 2, updates: 3 };
        assert_eq!(summary.to_string(), "1 added, 2 deleted, 3 updated");
    }
}
