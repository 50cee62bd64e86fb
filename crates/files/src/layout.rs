//! Dataset roots and version directories.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ukcp_vocab::Collection;

/// Version directory used when none is configured.
pub const DEFAULT_VERSION: &str = "latest";

/// Where the datasets live on disk.
///
/// Projections sit below `root/<collection>/uk/...`; observations have a
/// separate tree below `obs_root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
    obs_root: PathBuf,
    versions: BTreeMap<Collection, String>,
}

impl DataLayout {
    /// Layout with every collection at [`DEFAULT_VERSION`].
    pub fn new(root: impl Into<PathBuf>, obs_root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            obs_root: obs_root.into(),
            versions: BTreeMap::new(),
        }
    }

    /// Override the version directory of one collection.
    pub fn with_version(mut self, collection: Collection, version: impl Into<String>) -> Self {
        self.versions.insert(collection, version.into());
        self
    }

    /// Projection root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Observation root.
    pub fn obs_root(&self) -> &Path {
        &self.obs_root
    }

    /// Version directory of `collection`.
    pub fn version(&self, collection: Collection) -> &str {
        self.versions
            .get(&collection)
            .map_or(DEFAULT_VERSION, String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_default_to_latest() {
        let layout = DataLayout::new("/data", "/obs").with_version(Collection::LandObs, "v20230328");
        assert_eq!(layout.version(Collection::LandObs), "v20230328");
        assert_eq!(layout.version(Collection::LandRcm), DEFAULT_VERSION);
        assert_eq!(layout.root(), Path::new("/data"));
        assert_eq!(layout.obs_root(), Path::new("/obs"));
    }
}
