use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ManifestError;
use crate::manifest::catalog::FolderCatalog;
use crate::manifest::parsing::parse_package_manifest;
use crate::models::{LabelSet, ManifestEntry};
use crate::selection::KeyInclusion;

const WILDCARD_MEMBER: &str = "*";

/// Ordered manifest keys plus the manifest's own location.
///
/// Membership is tested against folder keys (`classes/Foo`): entries whose category is a
/// known metadata type are translated through the [`FolderCatalog`], everything else is
/// matched verbatim.
#[derive(Debug, Clone)]
pub struct ManifestIndex {
  entries: Vec<ManifestEntry>,
  manifest_path: PathBuf,
  folder_keys: BTreeSet<String>,
  wildcard_folders: BTreeSet<String>,
}

impl ManifestIndex {
  /// Build an index from already-extracted entries.
  pub fn new(
    entries: Vec<ManifestEntry>,
    manifest_path: impl Into<PathBuf>,
    catalog: &FolderCatalog,
  ) -> Self {
    let mut folder_keys = BTreeSet::new();
    let mut wildcard_folders = BTreeSet::new();

    for entry in &entries {
      let folder = catalog
        .folder_for(entry.category())
        .unwrap_or(entry.category());
      if entry.name() == WILDCARD_MEMBER {
        wildcard_folders.insert(folder.to_string());
      } else if entry.name().is_empty() {
        folder_keys.insert(entry.key().to_string());
      } else {
        folder_keys.insert(format!("{folder}/{}", entry.name()));
      }
    }

    Self {
      entries,
      manifest_path: manifest_path.into(),
      folder_keys,
      wildcard_folders,
    }
  }

  /// Read and parse a `package.xml` file.
  pub fn load(path: &Path, catalog: &FolderCatalog) -> Result<Self, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let entries = parse_package_manifest(&content).map_err(|source| ManifestError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    Ok(Self::new(entries, path, catalog))
  }

  /// Entries in manifest order.
  pub fn entries(&self) -> &[ManifestEntry] {
    &self.entries
  }

  /// Location of the manifest document.
  pub fn manifest_path(&self) -> &Path {
    &self.manifest_path
  }

  /// Returns `true` when the manifest lists nothing.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Names of the labels listed under `category`.
  pub fn label_names(&self, category: &str) -> LabelSet {
    LabelSet::from_entries(&self.entries, category)
  }
}

impl KeyInclusion for ManifestIndex {
  fn is_included(&self, key: &str) -> bool {
    if self.folder_keys.contains(key) {
      return true;
    }

    key
      .split_once('/')
      .is_some_and(|(folder, _)| self.wildcard_folders.contains(folder))
  }
}
