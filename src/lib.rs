#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod builder;
pub mod config;
pub mod copier;
pub mod error;
pub mod manifest;
pub mod models;
pub mod project;
pub mod selection;
pub mod subset;

pub use builder::SubsetBuilder;
pub use config::SubsetConfig;
pub use error::{ConfigError, ManifestError, SubsetError, XmlProcessingError};
pub use manifest::{FolderCatalog, ManifestIndex};
pub use models::{LabelSet, ManifestEntry, SubsetReport};
pub use project::{SubsetContext, SubsetLayout};
pub use selection::{KeyInclusion, NameResolver};
