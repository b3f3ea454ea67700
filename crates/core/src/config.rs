//! Project Configuration
//!
//! The project descriptor (`rdroid.toml`) lists modules with their content
//! roots and output directories. A module carrying an `[module.android]`
//! table has the Android facet; that table is its facet configuration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{RDroidError, Result};

/// Name of the project descriptor file at the project root
pub const DESCRIPTOR_FILE_NAME: &str = "rdroid.toml";

/// Default name of the resources directory next to the manifest
pub const DEFAULT_RESOURCES_PATH: &str = "res";

/// Per-module Android facet settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetConfiguration {
    /// Path to the Android SDK; auto-detected when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdk_path: Option<PathBuf>,
    /// Directory name of the resources folder, relative to the manifest
    #[serde(default = "default_resources_path")]
    pub resources_path: String,
}

fn default_resources_path() -> String {
    DEFAULT_RESOURCES_PATH.to_string()
}

impl Default for FacetConfiguration {
    fn default() -> Self {
        Self {
            sdk_path: None,
            resources_path: default_resources_path(),
        }
    }
}

impl FacetConfiguration {
    /// Get Android SDK path, with auto-detection
    pub fn effective_sdk_path(&self) -> Option<PathBuf> {
        if let Some(ref path) = self.sdk_path {
            return Some(path.clone());
        }

        let from_env = ["ANDROID_HOME", "ANDROID_SDK_ROOT"]
            .iter()
            .filter_map(|var| std::env::var_os(var))
            .map(PathBuf::from);

        let candidates: Vec<PathBuf> = if cfg!(windows) {
            from_env
                .chain(dirs::config_local_dir().map(|d| d.join("Android").join("Sdk")))
                .collect()
        } else {
            from_env
                .chain(dirs::home_dir().map(|h| h.join("Android").join("Sdk")))
                .chain(Some(PathBuf::from("/usr/local/android-sdk")))
                .collect()
        };

        let found = candidates.into_iter().find(|p| p.exists());
        debug!("Auto-detected SDK path: {:?}", found);
        found
    }
}

/// One `[[module]]` entry of the descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub name: String,
    #[serde(default)]
    pub content_roots: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android: Option<FacetConfiguration>,
}

/// Contents of `rdroid.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleDescriptor>,
}

impl ProjectDescriptor {
    /// Load a descriptor from file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RDroidError::NotFound(format!("Project descriptor not found: {:?}", path)));
        }

        debug!("Loading project descriptor from {:?}", path);
        let contents = std::fs::read_to_string(path)?;
        let descriptor: ProjectDescriptor = toml::from_str(&contents).map_err(|source| RDroidError::DescriptorParse {
            path: path.to_path_buf(),
            source,
        })?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Save the descriptor to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        info!("Project descriptor saved to {:?}", path);
        Ok(())
    }

    /// Module names must be present and unique
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for module in &self.modules {
            if module.name.trim().is_empty() {
                return Err(RDroidError::Config("Module name must not be empty".into()));
            }
            if !seen.insert(module.name.as_str()) {
                return Err(RDroidError::Config(format!("Duplicate module name: {}", module.name)));
            }
            if let Some(ref android) = module.android {
                if android.resources_path.trim().is_empty() {
                    return Err(RDroidError::Config(format!(
                        "Module '{}' has an empty resources_path",
                        module.name
                    )));
                }
            }
        }
        Ok(())
    }
}
