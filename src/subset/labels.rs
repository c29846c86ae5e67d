use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::XmlProcessingError;
use crate::manifest::ManifestIndex;
use crate::models::LabelSet;
use crate::project::SubsetLayout;
use crate::subset::{XmlStep, filter_file};

/// Labels referenced by the manifest and what happened to the labels document.
#[derive(Debug)]
pub struct LabelOutcome {
  /// Label names collected from the manifest, kept even when filtering degraded.
  pub labels: LabelSet,
  /// Result of writing the filtered labels document.
  pub step: XmlStep,
}

/// Write a copy of the labels document holding only the labels named by the manifest.
///
/// Nothing is written when the manifest references no labels. Read, parse and write
/// failures are logged and returned as [`XmlStep::Degraded`].
pub fn process_labels(
  layout: &SubsetLayout,
  source_file: &Path,
  target_dir: &Path,
  manifest: &ManifestIndex,
) -> LabelOutcome {
  let labels = manifest.label_names(&layout.label_category);
  if labels.is_empty() {
    return LabelOutcome {
      labels,
      step: XmlStep::Skipped,
    };
  }

  let destination = target_dir.join(&layout.labels_file);
  let result = fs::create_dir_all(target_dir)
    .map_err(|source| XmlProcessingError::Write {
      path: target_dir.to_path_buf(),
      source,
    })
    .and_then(|()| filter_file(source_file, &destination, &layout.labels_rule, labels.names()));

  let step = match result {
    Ok(()) => {
      info!(
        labels = labels.len(),
        path = %destination.display(),
        "filtered custom labels"
      );
      XmlStep::Written(destination)
    }
    Err(err) => {
      warn!(error = %err, "skipping custom labels");
      XmlStep::Degraded(err)
    }
  };

  LabelOutcome { labels, step }
}
