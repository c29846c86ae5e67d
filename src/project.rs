//! Layout description shared by every stage of a subset run.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Tag names used to filter one kind of XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetRule {
  /// Element whose shallow copy becomes the root of the filtered document.
  pub container: String,
  /// Element repeated once per entry.
  pub repeating: String,
  /// Child element of `repeating` whose text is the entry key.
  pub key_field: String,
}

impl SubsetRule {
  /// Build a rule from borrowed tag names.
  pub fn new(container: &str, repeating: &str, key_field: &str) -> Self {
    Self {
      container: container.to_string(),
      repeating: repeating.to_string(),
      key_field: key_field.to_string(),
    }
  }
}

/// Owned description of the source layout conventions.
#[derive(Debug, Clone)]
pub struct SubsetLayout {
  /// Category directory holding the labels file.
  pub labels_dir: String,
  /// File name of the custom labels document.
  pub labels_file: String,
  /// Category directory holding per-locale translation files.
  pub translations_dir: String,
  /// Manifest category naming individual labels.
  pub label_category: String,
  /// Suffix marking metadata-companion files.
  pub metadata_suffix: String,
  /// Category directories whose sub-directories are multi-file bundles.
  pub bundle_dirs: BTreeSet<String>,
  /// Extra metadata type to folder mappings layered over the built-in catalog.
  pub folder_overrides: BTreeMap<String, String>,
  /// Tags of the custom labels document.
  pub labels_rule: SubsetRule,
  /// Tags of the translation documents.
  pub translations_rule: SubsetRule,
}

impl Default for SubsetLayout {
  fn default() -> Self {
    Self {
      labels_dir: "labels".into(),
      labels_file: "CustomLabels.labels".into(),
      translations_dir: "translations".into(),
      label_category: "CustomLabel".into(),
      metadata_suffix: "-meta.xml".into(),
      bundle_dirs: BTreeSet::from(["aura".to_string()]),
      folder_overrides: BTreeMap::new(),
      labels_rule: SubsetRule::new("CustomLabels", "labels", "fullName"),
      translations_rule: SubsetRule::new("Translations", "customLabels", "name"),
    }
  }
}

impl SubsetLayout {
  /// Relative `/`-separated path of the labels document.
  pub fn labels_relative_path(&self) -> String {
    format!("{}/{}", self.labels_dir, self.labels_file)
  }

  /// Whether a relative `/`-separated path lives in the translations category.
  pub fn is_translation_path(&self, relative_path: &str) -> bool {
    relative_path
      .strip_prefix(self.translations_dir.as_str())
      .is_some_and(|rest| rest.starts_with('/'))
  }
}

/// Paths and layout for a single run.
#[derive(Debug, Clone, Copy)]
pub struct SubsetContext<'a> {
  /// Source tree root.
  pub source_root: &'a Path,
  /// Target tree root, erased on each run.
  pub target_root: &'a Path,
  /// Layout conventions.
  pub layout: &'a SubsetLayout,
}

impl<'a> SubsetContext<'a> {
  /// Create a context for the given roots.
  pub fn new(source_root: &'a Path, target_root: &'a Path, layout: &'a SubsetLayout) -> Self {
    Self {
      source_root,
      target_root,
      layout,
    }
  }

  /// Labels document inside the source tree.
  pub fn labels_source(&self) -> PathBuf {
    self
      .source_root
      .join(&self.layout.labels_dir)
      .join(&self.layout.labels_file)
  }

  /// Labels directory inside the target tree.
  pub fn labels_target_dir(&self) -> PathBuf {
    self.target_root.join(&self.layout.labels_dir)
  }
}
