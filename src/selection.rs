//! Mapping physical files to the logical keys a manifest refers to.

use std::collections::BTreeSet;

use crate::project::SubsetLayout;

/// Trait describing which logical keys belong in the subset.
pub trait KeyInclusion {
  /// Returns `true` when the component identified by `key` should be copied.
  fn is_included(&self, key: &str) -> bool;
}

impl KeyInclusion for BTreeSet<String> {
  fn is_included(&self, key: &str) -> bool {
    self.contains(key)
  }
}

/// Derives logical keys from `/`-separated paths relative to the source root.
#[derive(Debug, Clone)]
pub struct NameResolver {
  metadata_suffix: String,
  bundle_dirs: BTreeSet<String>,
}

impl NameResolver {
  /// Create a resolver for a metadata suffix and a table of bundle directories.
  pub fn new(metadata_suffix: impl Into<String>, bundle_dirs: BTreeSet<String>) -> Self {
    Self {
      metadata_suffix: metadata_suffix.into(),
      bundle_dirs,
    }
  }

  /// Resolver configured from the project layout.
  pub fn from_layout(layout: &SubsetLayout) -> Self {
    Self::new(layout.metadata_suffix.clone(), layout.bundle_dirs.clone())
  }

  /// Whether `category` holds multi-file bundles.
  pub fn is_bundle_dir(&self, category: &str) -> bool {
    self.bundle_dirs.contains(category)
  }

  /// Resolve a relative path such as `classes/Foo.cls-meta.xml` to `classes/Foo`.
  ///
  /// Files inside a bundle directory (`aura/Widget/WidgetController.js`) all resolve to
  /// the bundle itself (`aura/Widget`).
  pub fn resolve(&self, relative_path: &str) -> String {
    let path = if self.metadata_suffix.is_empty() {
      relative_path
    } else {
      relative_path
        .strip_suffix(self.metadata_suffix.as_str())
        .unwrap_or(relative_path)
    };

    let (parent, file_name) = match path.rsplit_once('/') {
      Some((parent, file_name)) => (Some(parent), file_name),
      None => (None, path),
    };

    if let Some(parent) = parent {
      let mut segments = parent.split('/');
      if let (Some(category), Some(bundle)) = (segments.next(), segments.next()) {
        if self.is_bundle_dir(category) {
          return format!("{category}/{bundle}");
        }
      }
    }

    let stem = file_name
      .rfind('.')
      .map_or(file_name, |index| &file_name[..index]);

    match parent {
      Some(parent) => format!("{parent}/{stem}"),
      None => stem.to_string(),
    }
  }
}

impl Default for NameResolver {
  fn default() -> Self {
    Self::from_layout(&SubsetLayout::default())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn resolver() -> NameResolver {
    NameResolver::default()
  }

  #[test]
  fn companion_extension_and_bare_names_share_a_key() {
    let resolver = resolver();
    assert_eq!(resolver.resolve("Foo-meta.xml"), "Foo");
    assert_eq!(resolver.resolve("Foo.xml"), "Foo");
    assert_eq!(resolver.resolve("Foo"), "Foo");
  }

  #[test]
  fn strips_companion_suffix_before_extension() {
    let resolver = resolver();
    assert_eq!(resolver.resolve("classes/Foo.cls"), "classes/Foo");
    assert_eq!(resolver.resolve("classes/Foo.cls-meta.xml"), "classes/Foo");
    assert_eq!(
      resolver.resolve("objects/Account.object-meta.xml"),
      "objects/Account"
    );
  }

  #[test]
  fn collapses_bundle_files_to_the_bundle() {
    let resolver = resolver();
    let controller = resolver.resolve("aura/bundleX/controller.js");
    let helper = resolver.resolve("aura/bundleX/helper.js");
    let nested = resolver.resolve("aura/bundleX/styles/theme.css");
    let companion = resolver.resolve("aura/bundleX/bundleX.cmp-meta.xml");

    assert_eq!(controller, "aura/bundleX");
    assert_eq!(helper, controller);
    assert_eq!(nested, controller);
    assert_eq!(companion, controller);
  }

  #[test]
  fn only_configured_directories_are_bundles() {
    let resolver = resolver();
    assert_eq!(resolver.resolve("lwc/card/card.js"), "lwc/card/card");
    assert_eq!(resolver.resolve("classes/restaurant/Menu.cls"), "classes/restaurant/Menu");

    let with_lwc = NameResolver::new(
      "-meta.xml",
      BTreeSet::from(["aura".to_string(), "lwc".to_string()]),
    );
    assert_eq!(with_lwc.resolve("lwc/card/card.js"), "lwc/card");
  }

  #[test]
  fn keeps_foldered_components_and_dotted_directories() {
    let resolver = resolver();
    assert_eq!(
      resolver.resolve("documents/Shared/logo.png"),
      "documents/Shared/logo"
    );
    assert_eq!(resolver.resolve("documents/Shared-meta.xml"), "documents/Shared");
    assert_eq!(resolver.resolve("static.v2/README"), "static.v2/README");
  }

  #[test]
  fn btree_sets_act_as_inclusion_filters() {
    let keys = BTreeSet::from(["classes/Foo".to_string()]);
    assert!(keys.is_included("classes/Foo"));
    assert!(!keys.is_included("classes/Baz"));
  }
}
