use std::path::Path;

use tracing::{debug, warn};

use crate::models::LabelSet;
use crate::project::SubsetRule;
use crate::subset::{XmlStep, filter_file};

/// Write a copy of one locale's translation file keeping only translations of `labels`.
///
/// An empty label set skips the file. Failures are logged and returned as
/// [`XmlStep::Degraded`]; the locale simply gets no translation output.
pub fn process_translation(
  rule: &SubsetRule,
  source_file: &Path,
  target_file: &Path,
  labels: &LabelSet,
) -> XmlStep {
  if labels.is_empty() {
    return XmlStep::Skipped;
  }

  match filter_file(source_file, target_file, rule, labels.names()) {
    Ok(()) => {
      debug!(path = %target_file.display(), "filtered translations");
      XmlStep::Written(target_file.to_path_buf())
    }
    Err(err) => {
      warn!(error = %err, "skipping translations");
      XmlStep::Degraded(err)
    }
  }
}
