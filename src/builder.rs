//! Subset orchestrator: clean the target, filter labels, copy matched files and the manifest.

use tracing::{debug, info};

use crate::copier::{check_roots, clean_dir, copy_file, ensure_dir, select_files};
use crate::error::{ManifestError, SubsetError};
use crate::manifest::ManifestIndex;
use crate::models::SubsetReport;
use crate::project::SubsetContext;
use crate::selection::NameResolver;
use crate::subset::{LabelOutcome, XmlStep, process_labels, process_translation};

/// High-level helper running one subset pass from a source tree into a target tree.
///
/// Runs against the same target must not overlap: the target is emptied before copying.
pub struct SubsetBuilder<'a> {
  context: SubsetContext<'a>,
  resolver: NameResolver,
}

impl<'a> SubsetBuilder<'a> {
  /// Create a builder for the provided context.
  pub fn new(context: SubsetContext<'a>) -> Self {
    let resolver = NameResolver::from_layout(context.layout);
    Self { context, resolver }
  }

  /// Rebuild the target tree from the files referenced by `manifest`.
  ///
  /// Missing or overlapping roots and failed copies abort the run. Label and translation
  /// filtering failures are recorded as report warnings instead.
  pub fn run(&self, manifest: &ManifestIndex) -> Result<SubsetReport, SubsetError> {
    let SubsetContext {
      source_root,
      target_root,
      layout,
    } = self.context;

    check_roots(source_root, target_root, manifest.manifest_path())?;
    ensure_dir(target_root)?;

    if manifest.is_empty() {
      info!("no files to copy");
      return Ok(SubsetReport::nothing_to_copy());
    }

    info!(
      source = %source_root.display(),
      target = %target_root.display(),
      entries = manifest.entries().len(),
      "started copying"
    );
    clean_dir(target_root)?;

    let mut report = SubsetReport::default();

    let LabelOutcome { labels, step } = process_labels(
      layout,
      &self.context.labels_source(),
      &self.context.labels_target_dir(),
      manifest,
    );
    let labels_relative = layout.labels_relative_path();
    let labels_written = match step {
      XmlStep::Written(_) => {
        report.labels_file = Some(labels_relative.clone());
        true
      }
      XmlStep::Degraded(err) => {
        report.warnings.push(err.to_string());
        false
      }
      XmlStep::Skipped => false,
    };

    for file in select_files(source_root, &self.resolver, manifest)? {
      if labels_written && file.logical_path == labels_relative {
        debug!(path = %file.logical_path, "labels already filtered");
        continue;
      }

      let from = source_root.join(&file.relative_path);
      let to = target_root.join(&file.relative_path);

      if !labels.is_empty() && layout.is_translation_path(&file.logical_path) {
        match process_translation(&layout.translations_rule, &from, &to, &labels) {
          XmlStep::Written(_) => report.translation_files.push(file.logical_path),
          XmlStep::Degraded(err) => report.warnings.push(err.to_string()),
          XmlStep::Skipped => {}
        }
        continue;
      }

      if let Some(parent) = to.parent() {
        ensure_dir(parent)?;
      }
      copy_file(&from, &to)?;
      report.copied_files.push(file.logical_path);
    }

    let manifest_path = manifest.manifest_path();
    let manifest_name = manifest_path
      .file_name()
      .ok_or_else(|| ManifestError::NotAFile {
        path: manifest_path.to_path_buf(),
      })?;
    copy_file(manifest_path, &target_root.join(manifest_name))?;
    report.manifest_file = Some(manifest_name.to_string_lossy().into_owned());

    info!(
      files = report.files_written(),
      warnings = report.warnings.len(),
      "completed copying"
    );
    Ok(report)
  }
}
