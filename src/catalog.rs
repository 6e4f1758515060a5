use std::path::Path;
use log::warn;
use serde_yaml::{Mapping, Value};

use crate::errors::ExtractorError;
use crate::file_utils::FileManager;
use crate::replacer::ReplacementResult;

// @module: Locale catalog accumulation and YAML rendering

/// Accumulates synthesized keys and their original texts, and renders them
/// as a YAML mapping nested by the `.`-separated segments of each key under
/// a single locale root.
///
/// Key uniqueness is not the replacer's concern; collisions land here and
/// resolve last-wins with a warning.
#[derive(Debug, Clone)]
pub struct LocaleCatalog {
    locale: String,
    entries: Vec<(String, String)>,
}

impl LocaleCatalog {
    pub fn new(locale: &str) -> Self {
        LocaleCatalog {
            locale: locale.to_string(),
            entries: Vec::new(),
        }
    }

    /// Record one replacement outcome. Failed replacements carry no key and
    /// are ignored.
    pub fn record(&mut self, result: &ReplacementResult) {
        if !result.success {
            return;
        }
        let Some(key) = result.key_name.as_deref() else {
            return;
        };
        self.insert(key, &result.replaced_text);
    }

    /// Insert a key/value pair, replacing any earlier value for the same key.
    pub fn insert(&mut self, key: &str, value: &str) {
        if let Some(existing) = self.entries.iter_mut().find(|(k, _)| k == key) {
            if existing.1 != value {
                warn!(
                    "catalog key {:?} recorded twice; keeping the latest value",
                    key
                );
            }
            existing.1 = value.to_string();
        } else {
            self.entries.push((key.to_string(), value.to_string()));
        }
    }

    /// Fold another catalog's entries into this one.
    pub fn merge(&mut self, other: &LocaleCatalog) {
        for (key, value) in &other.entries {
            self.insert(key, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The accumulated entries in insertion order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// The nested YAML value, rooted at the locale.
    pub fn to_value(&self) -> Value {
        let mut tree = Mapping::new();
        for (key, value) in &self.entries {
            let segments: Vec<&str> = key.split('.').collect();
            insert_nested(&mut tree, &segments, value);
        }
        let mut root = Mapping::new();
        root.insert(
            Value::String(self.locale.clone()),
            Value::Mapping(tree),
        );
        Value::Mapping(root)
    }

    /// Render the catalog as a YAML document string.
    pub fn to_yaml_string(&self) -> Result<String, ExtractorError> {
        serde_yaml::to_string(&self.to_value())
            .map_err(|e| ExtractorError::File(format!("catalog serialization failed: {}", e)))
    }

    /// Write the catalog to disk as YAML.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ExtractorError> {
        let yaml = self.to_yaml_string()?;
        FileManager::write_to_file(path, &yaml).map_err(|e| ExtractorError::File(e.to_string()))
    }
}

/// Descend the mapping along the key segments, creating intermediate maps,
/// and set the leaf. A leaf/branch clash is resolved toward the newcomer.
fn insert_nested(tree: &mut Mapping, segments: &[&str], value: &str) {
    let Some((head, tail)) = segments.split_first() else {
        return;
    };
    let entry_key = Value::String(head.to_string());
    if tail.is_empty() {
        tree.insert(entry_key, Value::String(value.to_string()));
        return;
    }
    let child = tree
        .entry(entry_key)
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    if !child.is_mapping() {
        warn!(
            "catalog key segment {:?} shadows an existing entry; replacing it",
            head
        );
        *child = Value::Mapping(Mapping::new());
    }
    if let Value::Mapping(inner) = child {
        insert_nested(inner, tail, value);
    }
}
