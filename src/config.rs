//! Project configuration loader describing the source tree conventions.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::project::{SubsetLayout, SubsetRule};

/// File name searched for in the source root when no explicit configuration is given.
pub const DEFAULT_CONFIG_FILE: &str = "package-subset.json";

/// Discoverable configuration describing the source layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubsetConfig {
  /// Category directory holding the labels file.
  pub labels_dir: String,
  /// File name of the custom labels document.
  pub labels_file: String,
  /// Category directory holding translation files.
  pub translations_dir: String,
  /// Manifest category naming individual labels.
  pub label_category: String,
  /// Suffix marking metadata-companion files.
  pub metadata_suffix: String,
  /// Category directories treated as multi-file bundles.
  pub bundle_dirs: Vec<String>,
  /// Metadata type to folder mappings added to, or replacing, the built-in catalog.
  pub folder_overrides: BTreeMap<String, String>,
  /// Root element of the labels document.
  pub labels_container: String,
  /// Element repeated once per label.
  pub labels_element: String,
  /// Field holding a label's name.
  pub labels_key: String,
  /// Root element of a translation document.
  pub translations_container: String,
  /// Element repeated once per label translation.
  pub translations_element: String,
  /// Field holding a translated label's name.
  pub translations_key: String,
}

impl Default for SubsetConfig {
  fn default() -> Self {
    let layout = SubsetLayout::default();
    Self {
      labels_dir: layout.labels_dir,
      labels_file: layout.labels_file,
      translations_dir: layout.translations_dir,
      label_category: layout.label_category,
      metadata_suffix: layout.metadata_suffix,
      bundle_dirs: layout.bundle_dirs.into_iter().collect(),
      folder_overrides: layout.folder_overrides,
      labels_container: layout.labels_rule.container,
      labels_element: layout.labels_rule.repeating,
      labels_key: layout.labels_rule.key_field,
      translations_container: layout.translations_rule.container,
      translations_element: layout.translations_rule.repeating,
      translations_key: layout.translations_rule.key_field,
    }
  }
}

impl SubsetConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// A missing or unparsable configuration file falls back to the default layout.
  pub fn discover(source_root: &Path) -> Self {
    let candidate = source_root.join(DEFAULT_CONFIG_FILE);
    Self::from_path(&candidate).unwrap_or_default()
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Convert the configuration into an owned layout description.
  pub fn into_layout(self) -> SubsetLayout {
    SubsetLayout {
      labels_dir: self.labels_dir,
      labels_file: self.labels_file,
      translations_dir: self.translations_dir,
      label_category: self.label_category,
      metadata_suffix: self.metadata_suffix,
      bundle_dirs: self
        .bundle_dirs
        .into_iter()
        .map(|dir| dir.trim_matches('/').to_string())
        .filter(|dir| !dir.is_empty())
        .collect::<BTreeSet<_>>(),
      folder_overrides: self.folder_overrides,
      labels_rule: SubsetRule {
        container: self.labels_container,
        repeating: self.labels_element,
        key_field: self.labels_key,
      },
      translations_rule: SubsetRule {
        container: self.translations_container,
        repeating: self.translations_element,
        key_field: self.translations_key,
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn discover_falls_back_to_defaults() {
    let temp = tempdir().unwrap();
    let layout = SubsetConfig::discover(temp.path()).into_layout();

    assert_eq!(layout.labels_dir, "labels");
    assert_eq!(layout.metadata_suffix, "-meta.xml");
    assert!(layout.bundle_dirs.contains("aura"));
    assert_eq!(layout.bundle_dirs.len(), 1);
    assert_eq!(layout.translations_rule.key_field, "name");
  }

  #[test]
  fn discover_ignores_malformed_files() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();

    let layout = SubsetConfig::discover(temp.path()).into_layout();
    assert_eq!(layout.labels_file, "CustomLabels.labels");
  }

  #[test]
  fn from_path_explains_missing_and_malformed_files() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("layout.json");

    let missing = SubsetConfig::from_path(&path).unwrap_err();
    assert!(matches!(missing, ConfigError::Read { .. }));

    fs::write(&path, r#"{"bundle_dirs": "aura"}"#).unwrap();
    let malformed = SubsetConfig::from_path(&path).unwrap_err();
    assert!(matches!(malformed, ConfigError::Parse { .. }));
    assert!(malformed.to_string().contains("layout.json"));
  }

  #[test]
  fn partial_files_override_selected_fields() {
    let temp = tempdir().unwrap();
    fs::write(
      temp.path().join(DEFAULT_CONFIG_FILE),
      r#"{"bundle_dirs": ["aura", "lwc/", ""], "folder_overrides": {"Widget": "widgets"}}"#,
    )
    .unwrap();

    let layout = SubsetConfig::discover(temp.path()).into_layout();
    assert_eq!(
      layout.bundle_dirs.iter().cloned().collect::<Vec<_>>(),
      vec!["aura".to_string(), "lwc".to_string()]
    );
    assert_eq!(layout.folder_overrides.get("Widget").map(String::as_str), Some("widgets"));
    assert_eq!(layout.labels_rule.container, "CustomLabels");
  }
}
