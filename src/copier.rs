//! Source tree traversal and target tree maintenance.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use same_file::is_same_file;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::SubsetError;
use crate::selection::{KeyInclusion, NameResolver};

/// A source file whose logical key is part of the subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
  /// Path relative to the source root.
  pub relative_path: PathBuf,
  /// `/`-separated form of `relative_path`.
  pub logical_path: String,
  /// Key derived by the [`NameResolver`].
  pub key: String,
}

/// Render a relative path with forward slashes regardless of the host separator.
pub fn to_logical_path(relative: &Path) -> String {
  relative
    .components()
    .filter_map(|component| match component {
      Component::Normal(segment) => Some(segment.to_string_lossy()),
      _ => None,
    })
    .collect::<Vec<_>>()
    .join("/")
}

/// Reject runs whose clean step would delete the source tree or the manifest.
///
/// The target may not be the source, contain it, or lie inside it, and the manifest may
/// not live under the target.
pub fn check_roots(
  source_root: &Path,
  target_root: &Path,
  manifest_path: &Path,
) -> Result<(), SubsetError> {
  if !source_root.is_dir() {
    return Err(SubsetError::MissingSource {
      path: source_root.to_path_buf(),
    });
  }

  let overlapping = || SubsetError::OverlappingRoots {
    source_root: source_root.to_path_buf(),
    target: target_root.to_path_buf(),
  };

  if target_root.exists() && is_same_file(source_root, target_root).unwrap_or(false) {
    return Err(overlapping());
  }

  let source = source_root.canonicalize().map_err(|source| SubsetError::Io {
    path: source_root.to_path_buf(),
    source,
  })?;
  let target = canonical_path(target_root).map_err(|source| SubsetError::Io {
    path: target_root.to_path_buf(),
    source,
  })?;

  if target.starts_with(&source) || source.starts_with(&target) {
    return Err(overlapping());
  }

  if let Ok(manifest) = canonical_path(manifest_path) {
    if manifest.starts_with(&target) {
      return Err(SubsetError::ManifestInTarget {
        manifest: manifest_path.to_path_buf(),
        target: target_root.to_path_buf(),
      });
    }
  }

  Ok(())
}

fn canonical_path(path: &Path) -> io::Result<PathBuf> {
  if path.exists() {
    return path.canonicalize();
  }

  let absolute = std::path::absolute(path)?;
  let mut existing = absolute.as_path();
  let mut missing = Vec::new();
  while !existing.exists() {
    match (existing.parent(), existing.file_name()) {
      (Some(parent), Some(name)) => {
        missing.push(name.to_os_string());
        existing = parent;
      }
      _ => return Ok(absolute),
    }
  }

  let mut resolved = existing.canonicalize()?;
  resolved.extend(missing.iter().rev());
  Ok(resolved)
}

/// Create `path` and any missing parents, logging when something was created.
pub fn ensure_dir(path: &Path) -> Result<(), SubsetError> {
  if path.is_dir() {
    return Ok(());
  }

  fs::create_dir_all(path).map_err(|source| SubsetError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  info!(path = %path.display(), "folder created");
  Ok(())
}

/// Remove every file and directory inside `root`, keeping `root` itself.
pub fn clean_dir(root: &Path) -> Result<(), SubsetError> {
  let io_err = |path: &Path| {
    let path = path.to_path_buf();
    move |source: io::Error| SubsetError::Io { path, source }
  };

  let entries = match fs::read_dir(root) {
    Ok(entries) => entries,
    Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
    Err(err) => return Err(io_err(root)(err)),
  };

  for entry in entries {
    let entry = entry.map_err(io_err(root))?;
    let path = entry.path();
    let file_type = entry.file_type().map_err(io_err(&path))?;
    if file_type.is_dir() {
      fs::remove_dir_all(&path).map_err(io_err(&path))?;
    } else {
      fs::remove_file(&path).map_err(io_err(&path))?;
    }
  }

  Ok(())
}

/// Copy `from` to `to` byte for byte.
///
/// Both handles are owned by this call and closed on every return path.
pub fn copy_file(from: &Path, to: &Path) -> Result<u64, SubsetError> {
  let copy_err = |source| SubsetError::Copy {
    from: from.to_path_buf(),
    to: to.to_path_buf(),
    source,
  };

  let mut reader = BufReader::new(File::open(from).map_err(copy_err)?);
  let mut writer = BufWriter::new(File::create(to).map_err(copy_err)?);
  let bytes = io::copy(&mut reader, &mut writer).map_err(copy_err)?;
  writer.flush().map_err(copy_err)?;

  debug!(from = %from.display(), to = %to.display(), bytes, "copied file");
  Ok(bytes)
}

/// Walk every category directory of `source_root` and return the files whose logical
/// key is included, depth first and sorted by file name.
///
/// Files sitting directly in the source root are not part of any category and are
/// never selected.
pub fn select_files<I: KeyInclusion + ?Sized>(
  source_root: &Path,
  resolver: &NameResolver,
  inclusion: &I,
) -> Result<Vec<SelectedFile>, SubsetError> {
  let mut categories = Vec::new();
  let entries = fs::read_dir(source_root).map_err(|source| SubsetError::Io {
    path: source_root.to_path_buf(),
    source,
  })?;
  for entry in entries {
    let entry = entry.map_err(|source| SubsetError::Io {
      path: source_root.to_path_buf(),
      source,
    })?;
    if entry.file_type().is_ok_and(|ft| ft.is_dir()) {
      categories.push(entry.path());
    }
  }
  categories.sort();

  let mut selected = Vec::new();
  for category in categories {
    for entry in WalkDir::new(&category).min_depth(1).sort_by_file_name() {
      let entry = entry.map_err(|source| SubsetError::Walk {
        path: category.clone(),
        source,
      })?;
      if !entry.file_type().is_file() {
        continue;
      }

      let Ok(relative_path) = entry.path().strip_prefix(source_root) else {
        continue;
      };
      let logical_path = to_logical_path(relative_path);
      let key = resolver.resolve(&logical_path);
      if inclusion.is_included(&key) {
        selected.push(SelectedFile {
          relative_path: relative_path.to_path_buf(),
          logical_path,
          key,
        });
      }
    }
  }

  Ok(selected)
}
