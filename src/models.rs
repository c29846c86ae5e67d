//! Data structures produced while preparing a package subset.

use std::collections::BTreeSet;

use serde::Serialize;

/// One logical key listed by a package manifest, such as `ApexClass/Foo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ManifestEntry {
  key: String,
}

impl ManifestEntry {
  /// Wrap a raw `Category/Name` key.
  pub fn new(key: impl Into<String>) -> Self {
    Self { key: key.into() }
  }

  /// Build a key from a metadata type and member name.
  pub fn from_parts(category: &str, name: &str) -> Self {
    Self::new(format!("{category}/{name}"))
  }

  /// Full key as listed.
  pub fn key(&self) -> &str {
    &self.key
  }

  /// Segment before the first separator.
  pub fn category(&self) -> &str {
    self
      .key
      .split_once('/')
      .map_or(self.key.as_str(), |(category, _)| category)
  }

  /// Segment after the first separator, or an empty string when there is none.
  pub fn name(&self) -> &str {
    self.key.split_once('/').map_or("", |(_, name)| name)
  }
}

impl From<&str> for ManifestEntry {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

/// Label names referenced by the manifest.
///
/// Produced by label processing and passed into translation processing. An empty set
/// disables translation filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
  names: BTreeSet<String>,
}

impl LabelSet {
  /// Collect the names of every entry in `category`.
  pub fn from_entries<'a>(
    entries: impl IntoIterator<Item = &'a ManifestEntry>,
    category: &str,
  ) -> Self {
    entries
      .into_iter()
      .filter(|entry| entry.category() == category)
      .map(|entry| entry.name().to_string())
      .filter(|name| !name.is_empty())
      .collect()
  }

  /// Returns `true` when no labels were referenced.
  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  /// Number of distinct label names.
  pub fn len(&self) -> usize {
    self.names.len()
  }

  /// Membership test used by the XML filters.
  pub fn contains(&self, name: &str) -> bool {
    self.names.contains(name)
  }

  /// Sorted view of the names.
  pub fn names(&self) -> &BTreeSet<String> {
    &self.names
  }
}

impl FromIterator<String> for LabelSet {
  fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
    Self {
      names: iter.into_iter().collect(),
    }
  }
}

/// Serializable summary of a subset run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubsetReport {
  /// The manifest listed no keys, so nothing was cleaned or copied.
  pub nothing_to_copy: bool,
  /// Files copied byte-for-byte, relative to the target root.
  pub copied_files: Vec<String>,
  /// Filtered labels document, relative to the target root.
  pub labels_file: Option<String>,
  /// Filtered translation documents, relative to the target root.
  pub translation_files: Vec<String>,
  /// Manifest copied into the target root.
  pub manifest_file: Option<String>,
  /// Non-fatal XML failures encountered during the run.
  pub warnings: Vec<String>,
}

impl SubsetReport {
  /// Report for a run whose manifest listed nothing.
  pub fn nothing_to_copy() -> Self {
    Self {
      nothing_to_copy: true,
      ..Self::default()
    }
  }

  /// Total number of files written into the target tree.
  pub fn files_written(&self) -> usize {
    self.copied_files.len()
      + self.translation_files.len()
      + usize::from(self.labels_file.is_some())
      + usize::from(self.manifest_file.is_some())
  }
}
