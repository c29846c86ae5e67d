//! Package manifest loading split into focused submodules for easier testing.

mod catalog;
mod index;
mod parsing;

pub use catalog::FolderCatalog;
pub use index::ManifestIndex;
pub use parsing::parse_package_manifest;
