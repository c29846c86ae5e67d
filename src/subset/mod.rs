//! Filtering of the custom labels and translation documents.
//!
//! Both filters share [`subset_document`] and report their result as an [`XmlStep`]. A
//! failed step never aborts the run; the caller records the degraded step and moves on.

mod labels;
mod translations;
mod xml;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::XmlProcessingError;
use crate::project::SubsetRule;

pub use labels::{LabelOutcome, process_labels};
pub use translations::process_translation;
pub use xml::subset_document;

/// Outcome of a non-fatal XML filtering step.
#[derive(Debug)]
pub enum XmlStep {
  /// The filtered document was written to this path.
  Written(PathBuf),
  /// Nothing needed filtering.
  Skipped,
  /// Filtering failed; the run continues without this output.
  Degraded(XmlProcessingError),
}

impl XmlStep {
  /// Path of the written document, if any.
  pub fn written(&self) -> Option<&Path> {
    match self {
      Self::Written(path) => Some(path),
      _ => None,
    }
  }
}

/// Read `source`, keep the entries accepted by `rule`, and write the result to `destination`.
pub fn filter_file(
  source: &Path,
  destination: &Path,
  rule: &SubsetRule,
  accepted: &BTreeSet<String>,
) -> Result<(), XmlProcessingError> {
  let content = fs::read_to_string(source).map_err(|source_err| XmlProcessingError::Read {
    path: source.to_path_buf(),
    source: source_err,
  })?;

  let filtered = subset_document(&content, rule, accepted).map_err(|err| {
    XmlProcessingError::Filter {
      path: source.to_path_buf(),
      source: err,
    }
  })?;

  let write_err = |err| XmlProcessingError::Write {
    path: destination.to_path_buf(),
    source: err,
  };
  if let Some(parent) = destination.parent() {
    fs::create_dir_all(parent).map_err(write_err)?;
  }
  fs::write(destination, filtered).map_err(write_err)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn filter_file_reports_each_failure_kind() {
    let temp = tempdir().unwrap();
    let rule = SubsetRule::new("CustomLabels", "labels", "fullName");
    let accepted = BTreeSet::from(["One".to_string()]);
    let source = temp.path().join("CustomLabels.labels");
    let destination = temp.path().join("out.labels");

    let missing = filter_file(&source, &destination, &rule, &accepted).unwrap_err();
    assert!(matches!(missing, XmlProcessingError::Read { .. }));

    fs::write(&source, "<Other/>").unwrap();
    let malformed = filter_file(&source, &destination, &rule, &accepted).unwrap_err();
    assert!(matches!(malformed, XmlProcessingError::Filter { .. }));

    fs::write(&source, "<CustomLabels/>").unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "file").unwrap();
    let unwritable = blocker.join("out.labels");
    let write_err = filter_file(&source, &unwritable, &rule, &accepted).unwrap_err();
    assert!(matches!(write_err, XmlProcessingError::Write { .. }));

    filter_file(&source, &destination, &rule, &accepted).unwrap();
    assert!(destination.exists());
  }

  #[test]
  fn filter_file_creates_the_destination_folder_only_on_success() {
    let temp = tempdir().unwrap();
    let rule = SubsetRule::new("Translations", "customLabels", "name");
    let accepted = BTreeSet::from(["Bar".to_string()]);
    let source = temp.path().join("fr.translation");

    fs::write(&source, "<Translations><customLabels></Translations>").unwrap();
    let failed_dir = temp.path().join("failed");
    assert!(filter_file(&source, &failed_dir.join("fr.translation"), &rule, &accepted).is_err());
    assert!(!failed_dir.exists());

    fs::write(&source, "<Translations/>").unwrap();
    let written_dir = temp.path().join("written").join("translations");
    filter_file(&source, &written_dir.join("fr.translation"), &rule, &accepted).unwrap();
    assert!(written_dir.join("fr.translation").exists());
  }

  #[test]
  fn written_exposes_only_successful_paths() {
    let step = XmlStep::Written(PathBuf::from("out/labels/CustomLabels.labels"));
    assert_eq!(
      step.written(),
      Some(Path::new("out/labels/CustomLabels.labels"))
    );
    assert!(XmlStep::Skipped.written().is_none());
  }
}
