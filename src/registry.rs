use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DatasetDescriptor – one selectable dataset
// ---------------------------------------------------------------------------

/// Static metadata for one dataset the viewer can display: a display name,
/// the embedding model that produced it, and where its cluster data and
/// source images live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    /// Display name shown in the dataset dropdown.
    pub dataset: String,
    /// Model that produced the embeddings (e.g. "Image Embeddings").
    pub model: String,
    /// Cluster assignments for this dataset.
    pub cluster_filepath: PathBuf,
    /// Per-class cluster assignments; not every dataset has them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_cluster_filepath: Option<PathBuf>,
    /// Directory holding the dataset's images.
    pub image_filepath: PathBuf,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading or validating a dataset registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Failed to read a registry config file.
    #[error("failed to read registry file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The registry config was not a valid JSON array of descriptors.
    #[error("failed to parse registry JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two entries share a dataset name, so dropdown selection by name
    /// would be ambiguous.
    #[error("duplicate dataset name: {0}")]
    DuplicateName(String),
    /// An entry has an empty dataset name.
    #[error("dataset entry {index} has an empty name")]
    EmptyName { index: usize },
}

// ---------------------------------------------------------------------------
// DatasetRegistry – ordered, read-only list of descriptors
// ---------------------------------------------------------------------------

/// The ordered list of datasets offered by the dataset selector. Read-only
/// after construction; iteration yields entries in declaration order.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    entries: Vec<DatasetDescriptor>,
}

impl DatasetRegistry {
    /// The in-source registry. Add an entry here to make it selectable in
    /// the dataset dropdown.
    pub fn builtin() -> Self {
        Self::new(vec![DatasetDescriptor {
            dataset: "Ditadura Nunca Mais".to_string(),
            model: "Image Embeddings".to_string(),
            cluster_filepath: PathBuf::from("data/ditaduranuncamais.json"),
            class_cluster_filepath: None,
            image_filepath: PathBuf::from("images/ditadura_images"),
        }])
    }

    /// Wrap a list of descriptors. No validation happens here; call
    /// [`DatasetRegistry::validate`] to enforce name uniqueness.
    pub fn new(entries: Vec<DatasetDescriptor>) -> Self {
        Self { entries }
    }

    /// Parse a registry from a JSON array of descriptors.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let entries: Vec<DatasetDescriptor> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    /// Load a registry from a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, RegistryError> {
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_json_str(&text)?;
        log::info!(
            "loaded {} dataset entries from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[DatasetDescriptor] {
        &self.entries
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, DatasetDescriptor> {
        self.entries.iter()
    }

    /// Dataset names in declaration order, for dropdown labels.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.dataset.as_str())
    }

    /// Look up a dataset by name. First match wins when names collide.
    pub fn get(&self, name: &str) -> Option<&DatasetDescriptor> {
        self.entries.iter().find(|d| d.dataset == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that every entry has a non-empty, unique dataset name.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let mut seen = std::collections::BTreeSet::new();
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.dataset.is_empty() {
                return Err(RegistryError::EmptyName { index });
            }
            if !seen.insert(entry.dataset.as_str()) {
                return Err(RegistryError::DuplicateName(entry.dataset.clone()));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a DatasetRegistry {
    type Item = &'a DatasetDescriptor;
    type IntoIter = std::slice::Iter<'a, DatasetDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str) -> DatasetDescriptor {
        DatasetDescriptor {
            dataset: name.to_string(),
            model: "Image Embeddings".to_string(),
            cluster_filepath: PathBuf::from(format!("data/{name}.json")),
            class_cluster_filepath: None,
            image_filepath: PathBuf::from(format!("images/{name}")),
        }
    }

    #[test]
    fn builtin_contains_ditadura_entry() {
        let registry = DatasetRegistry::builtin();
        let entry = registry.get("Ditadura Nunca Mais").unwrap();
        assert_eq!(entry.model, "Image Embeddings");
        assert_eq!(entry.cluster_filepath, PathBuf::from("data/ditaduranuncamais.json"));
        assert_eq!(entry.class_cluster_filepath, None);
        assert_eq!(entry.image_filepath, PathBuf::from("images/ditadura_images"));
    }

    #[test]
    fn iteration_preserves_declaration_order() {
        let registry = DatasetRegistry::new(vec![
            descriptor("c"),
            descriptor("a"),
            descriptor("b"),
        ]);
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["c", "a", "b"]);

        let iterated: Vec<&str> = registry.iter().map(|d| d.dataset.as_str()).collect();
        assert_eq!(iterated, names);

        let mut looped = Vec::new();
        for entry in &registry {
            looped.push(entry.dataset.as_str());
        }
        assert_eq!(looped, names);
    }

    #[test]
    fn missing_class_cluster_path_stays_absent() {
        let json = r#"[{
            "dataset": "archive",
            "model": "Image Embeddings",
            "cluster_filepath": "data/archive.json",
            "image_filepath": "images/archive"
        }]"#;
        let registry = DatasetRegistry::from_json_str(json).unwrap();
        assert_eq!(registry.entries()[0].class_cluster_filepath, None);

        // The field is omitted on the way back out, not written as "".
        let out = serde_json::to_string(&registry.entries()[0]).unwrap();
        assert!(!out.contains("class_cluster_filepath"));
    }

    #[test]
    fn present_class_cluster_path_round_trips() {
        let mut entry = descriptor("archive");
        entry.class_cluster_filepath = Some(PathBuf::from("data/archive_classes.json"));

        let out = serde_json::to_string(&entry).unwrap();
        let back: DatasetDescriptor = serde_json::from_str(&out).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn from_json_file_reads_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datasets.json");
        std::fs::write(
            &path,
            r#"[
                {
                    "dataset": "first",
                    "model": "Image Embeddings",
                    "cluster_filepath": "data/first.json",
                    "image_filepath": "images/first"
                },
                {
                    "dataset": "second",
                    "model": "Text Embeddings",
                    "cluster_filepath": "data/second.json",
                    "class_cluster_filepath": "data/second_classes.json",
                    "image_filepath": "images/second"
                }
            ]"#,
        )
        .unwrap();

        let registry = DatasetRegistry::from_json_file(&path).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.entries()[1].model, "Text Embeddings");
        assert_eq!(
            registry.entries()[1].class_cluster_filepath,
            Some(PathBuf::from("data/second_classes.json"))
        );
    }

    #[test]
    fn from_json_file_reports_missing_file() {
        let err = DatasetRegistry::from_json_file(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }

    #[test]
    fn from_json_str_reports_malformed_input() {
        let err = DatasetRegistry::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, RegistryError::Parse(_)));
    }

    #[test]
    fn validate_rejects_duplicate_names() {
        let registry = DatasetRegistry::new(vec![descriptor("same"), descriptor("same")]);
        let err = registry.validate().unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(name) if name == "same"));
    }

    #[test]
    fn validate_rejects_empty_names() {
        let registry = DatasetRegistry::new(vec![descriptor("ok"), descriptor("")]);
        let err = registry.validate().unwrap_err();
        assert!(matches!(err, RegistryError::EmptyName { index: 1 }));
    }

    #[test]
    fn lookup_by_unknown_name_is_none() {
        assert!(DatasetRegistry::builtin().get("nope").is_none());
    }
}
