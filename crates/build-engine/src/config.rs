//! Build Configuration

use std::path::PathBuf;
use serde::{Deserialize, Serialize};

use crate::validity::IncrementalCache;

/// Settings for one build invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Directory holding `rdroid.toml`
    pub project_dir: PathBuf,

    /// Modules to build; empty means all
    #[serde(default)]
    pub modules: Vec<String>,

    /// Package every module even if its inputs are unchanged
    #[serde(default)]
    pub force: bool,

    /// Validity cache location, defaults to `<project>/.rdroid/validity.json`
    #[serde(default)]
    pub cache_file: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            modules: Vec::new(),
            force: false,
            cache_file: None,
        }
    }
}

impl BuildConfig {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            ..Default::default()
        }
    }

    pub fn effective_cache_file(&self) -> PathBuf {
        self.cache_file
            .clone()
            .unwrap_or_else(|| IncrementalCache::default_path(&self.project_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_file_default() {
        let config = BuildConfig::new("/work/notes");
        assert_eq!(config.effective_cache_file(), PathBuf::from("/work/notes/.rdroid/validity.json"));

        let config = BuildConfig {
            cache_file: Some(PathBuf::from("/tmp/cache.json")),
            ..config
        };
        assert_eq!(config.effective_cache_file(), PathBuf::from("/tmp/cache.json"));
    }
}
