use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;
use ukcp_files::DataLayout;
use ukcp_vocab::{Collection, Vocabulary};

use crate::cli::DataArgs;

/// Config file read when `--config` is not given, if present.
pub const DEFAULT_CONFIG: &str = "ukcp.toml";

/// Top-level `ukcp.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UkcpConfig {
    /// Dataset locations.
    #[serde(default)]
    pub data: DataConfig,

    /// Sampling settings.
    #[serde(default)]
    pub sampling: SamplingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_obs_root")]
    pub obs_root: PathBuf,
    /// Vocabulary TOML replacing the bundled terms.
    #[serde(default)]
    pub vocabulary: Option<PathBuf>,
    /// Version directory per collection code, e.g. `land-rcm = "v20190731"`.
    #[serde(default)]
    pub versions: BTreeMap<String, String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            obs_root: default_obs_root(),
            vocabulary: None,
            versions: BTreeMap::new(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("/data/ukcp18")
}
fn default_obs_root() -> PathBuf {
    PathBuf::from("/data/ukcp-obs")
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplingConfig {
    /// Seed for random sampling; unseeded runs draw from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl UkcpConfig {
    /// Parse a config document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("failed to parse TOML config")
    }

    /// Read the config named by `args`, falling back to [`DEFAULT_CONFIG`]
    /// and then to defaults, and apply the command-line overrides.
    pub fn load(args: &DataArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::read(path)?,
            None if Path::new(DEFAULT_CONFIG).is_file() => Self::read(Path::new(DEFAULT_CONFIG))?,
            None => Self::default(),
        };
        if let Some(root) = &args.data_root {
            config.data.root = root.clone();
        }
        if let Some(root) = &args.obs_root {
            config.data.obs_root = root.clone();
        }
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        debug!(path = %path.display(), "config loaded");
        Self::from_toml_str(&text)
    }

    /// Dataset layout with the configured version directories.
    pub fn layout(&self) -> Result<DataLayout> {
        let mut layout = DataLayout::new(&self.data.root, &self.data.obs_root);
        for (code, version) in &self.data.versions {
            let collection: Collection = code
                .parse()
                .with_context(|| format!("invalid [data.versions] key '{code}'"))?;
            layout = layout.with_version(collection, version);
        }
        Ok(layout)
    }

    /// The configured vocabulary, or the bundled one.
    pub fn vocabulary(&self) -> Result<Arc<Vocabulary>> {
        let vocab = match &self.data.vocabulary {
            Some(path) => Vocabulary::from_path(path)
                .with_context(|| format!("failed to load vocabulary: {}", path.display()))?,
            None => Vocabulary::builtin().context("bundled vocabulary is invalid")?,
        };
        Ok(Arc::new(vocab))
    }
}
