//! Catalog of registered plugin instances, consumed by the dashboard UI

use serde::{Deserialize, Serialize};

use super::{InstanceConfig, PluginKind};

/// Descriptive metadata of one registered plugin instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub r#type: String,
}

impl CatalogEntry {
    pub fn from_config<C: InstanceConfig + ?Sized>(kind: PluginKind, config: &C) -> Self {
        Self {
            name: config.name().to_string(),
            display_name: config.display_name().to_string(),
            description: config.description().to_string(),
            r#type: kind.as_str().to_string(),
        }
    }
}

/// Append-only list of catalog entries.
///
/// Built once during startup and shared read-only afterwards; entries are
/// never removed or modified once appended.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    /// Entries in registration order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Entries of one plugin kind, in registration order
    pub fn by_type(&self, kind: PluginKind) -> impl Iterator<Item = &CatalogEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.r#type == kind.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: PluginKind) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            display_name: name.to_uppercase(),
            description: String::new(),
            r#type: kind.as_str().to_string(),
        }
    }

    #[test]
    fn test_append_keeps_order() {
        let mut catalog = Catalog::new();
        assert!(catalog.is_empty());

        catalog.append(entry("es1", PluginKind::Elasticsearch));
        catalog.append(entry("github", PluginKind::Github));
        catalog.append(entry("es2", PluginKind::Elasticsearch));

        let names: Vec<_> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["es1", "github", "es2"]);

        let es: Vec<_> = catalog
            .by_type(PluginKind::Elasticsearch)
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(es, vec!["es1", "es2"]);
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let value = serde_json::to_value(entry("es1", PluginKind::Elasticsearch)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "es1",
                "displayName": "ES1",
                "description": "",
                "type": "elasticsearch"
            })
        );
    }
}
