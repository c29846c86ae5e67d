//! Error types shared across the crate.
//!
//! Failures fall into two channels. [`SubsetError`] aborts a run and is returned to the
//! caller. [`XmlProcessingError`] is raised by the label and translation filters and never
//! escapes them: it is downgraded to a warning on the run report.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that stop a subset run.
#[derive(Debug, Error)]
pub enum SubsetError {
  /// The source tree is missing.
  #[error("folder {} doesn't exist", path.display())]
  MissingSource {
    /// Source root that was requested.
    path: PathBuf,
  },

  /// Source and target roots point at the same tree, or one is nested in the other.
  #[error("target folder {} overlaps source folder {}", target.display(), source_root.display())]
  OverlappingRoots {
    /// Source root.
    source_root: PathBuf,
    /// Target root.
    target: PathBuf,
  },

  /// The manifest lives inside the target tree and would be removed by the clean step.
  #[error("manifest {} lies inside target folder {}", manifest.display(), target.display())]
  ManifestInTarget {
    /// Manifest path.
    manifest: PathBuf,
    /// Target root.
    target: PathBuf,
  },

  /// The package manifest could not be loaded.
  #[error(transparent)]
  Manifest(#[from] ManifestError),

  /// Copying a file failed.
  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  Copy {
    /// File being read.
    from: PathBuf,
    /// File being written.
    to: PathBuf,
    /// Underlying I/O error.
    source: io::Error,
  },

  /// Creating, listing or cleaning a directory failed.
  #[error("failed to prepare {}: {source}", path.display())]
  Io {
    /// Directory being touched.
    path: PathBuf,
    /// Underlying I/O error.
    source: io::Error,
  },

  /// Traversing the source tree failed.
  #[error("failed to walk {}: {source}", path.display())]
  Walk {
    /// Category directory being walked.
    path: PathBuf,
    /// Underlying traversal error.
    source: walkdir::Error,
  },
}

impl SubsetError {
  /// Whether the error stems from invalid run configuration rather than a failed copy.
  pub fn is_configuration(&self) -> bool {
    matches!(
      self,
      Self::MissingSource { .. }
        | Self::OverlappingRoots { .. }
        | Self::ManifestInTarget { .. }
        | Self::Manifest(_)
    )
  }
}

/// Errors raised while loading a package manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// The manifest could not be read from disk.
  #[error("failed to read manifest {}: {source}", path.display())]
  Read {
    /// Manifest path.
    path: PathBuf,
    /// Underlying I/O error.
    source: io::Error,
  },

  /// The manifest is not well-formed XML.
  #[error("failed to parse manifest {}: {source}", path.display())]
  Parse {
    /// Manifest path.
    path: PathBuf,
    /// Underlying XML error.
    source: quick_xml::Error,
  },

  /// The manifest path has no file name component.
  #[error("manifest path {} does not name a file", path.display())]
  NotAFile {
    /// Manifest path.
    path: PathBuf,
  },
}

/// Errors raised while loading an explicit layout configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The configuration file could not be read.
  #[error("failed to read {}: {source}", path.display())]
  Read {
    /// Configuration path.
    path: PathBuf,
    /// Underlying I/O error.
    source: io::Error,
  },

  /// The configuration file is not valid JSON for the layout.
  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    /// Configuration path.
    path: PathBuf,
    /// Underlying JSON error.
    source: serde_json::Error,
  },
}

/// Failures inside the in-memory XML filter.
#[derive(Debug, Error)]
pub enum XmlSubsetError {
  /// The source document is not well-formed.
  #[error("malformed XML: {0}")]
  Syntax(#[from] quick_xml::Error),

  /// Writing the filtered document failed.
  #[error("failed to serialize XML: {0}")]
  Serialize(#[from] io::Error),

  /// The container element does not appear in the document.
  #[error("element <{0}> not found")]
  MissingContainer(String),

  /// The document ended inside a repeating element.
  #[error("document ended inside <{0}>")]
  Truncated(String),
}

/// Non-fatal failure filtering a labels or translation file.
#[derive(Debug, Error)]
pub enum XmlProcessingError {
  /// The source document could not be read.
  #[error("failed to read {}: {source}", path.display())]
  Read {
    /// Source document.
    path: PathBuf,
    /// Underlying I/O error.
    source: io::Error,
  },

  /// The source document could not be filtered.
  #[error("failed to filter {}: {source}", path.display())]
  Filter {
    /// Source document.
    path: PathBuf,
    /// Underlying filter error.
    source: XmlSubsetError,
  },

  /// The filtered document could not be written.
  #[error("failed to write {}: {source}", path.display())]
  Write {
    /// Destination document.
    path: PathBuf,
    /// Underlying I/O error.
    source: io::Error,
  },
}
