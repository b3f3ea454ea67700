//! Validity states
//!
//! A validity state fingerprints everything that goes into a module's
//! package. The runner compares it against the state recorded after the last
//! successful pass to decide whether the module needs packaging again.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::BuildError;

const STATE_LEN: usize = 32;

/// Fingerprint of a module's manifest, resources and classes archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourcesValidityState {
    digest: [u8; STATE_LEN],
}

impl ResourcesValidityState {
    /// Hash the manifest, every file under `resources_dir` in file-name
    /// order, and `classes` if it exists. Paths are hashed relative to the
    /// directory containing each input.
    pub fn compute(manifest: &Path, resources_dir: &Path, classes: Option<&Path>) -> io::Result<Self> {
        let mut hasher = Sha256::new();
        hash_file(&mut hasher, manifest, base_of(manifest))?;

        let base = base_of(resources_dir);
        for entry in WalkDir::new(resources_dir).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_file() {
                hash_file(&mut hasher, entry.path(), base)?;
            }
        }

        if let Some(classes) = classes.filter(|c| c.is_file()) {
            hash_file(&mut hasher, classes, base_of(classes))?;
        }

        let mut digest = [0u8; STATE_LEN];
        digest.copy_from_slice(&hasher.finalize());
        Ok(Self { digest })
    }

    pub fn from_bytes(digest: [u8; STATE_LEN]) -> Self {
        Self { digest }
    }

    pub fn as_bytes(&self) -> &[u8; STATE_LEN] {
        &self.digest
    }

    /// Read a state written by [`save`](Self::save)
    pub fn load(reader: &mut dyn Read) -> io::Result<Self> {
        let mut digest = [0u8; STATE_LEN];
        reader.read_exact(&mut digest)?;
        Ok(Self { digest })
    }

    pub fn save(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_all(&self.digest)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.digest)
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        let digest: [u8; STATE_LEN] = bytes.try_into().ok()?;
        Some(Self { digest })
    }
}

fn base_of(path: &Path) -> &Path {
    path.parent().unwrap_or(path)
}

fn hash_file(hasher: &mut Sha256, path: &Path, base: &Path) -> io::Result<()> {
    let relative = path.strip_prefix(base).unwrap_or(path);
    hasher.update(relative.to_string_lossy().as_bytes());
    hasher.update([0u8]);
    hasher.update(std::fs::read(path)?);
    Ok(())
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    states: BTreeMap<String, String>,
}

/// Validity states recorded after successful passes, keyed by module name
#[derive(Debug)]
pub struct IncrementalCache {
    path: PathBuf,
    states: BTreeMap<String, ResourcesValidityState>,
}

impl IncrementalCache {
    /// Cache file of a project
    pub fn default_path(project_dir: &Path) -> PathBuf {
        project_dir.join(".rdroid").join("validity.json")
    }

    /// Load the cache at `path`. A missing or unreadable cache starts empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let states = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<CacheFile>(&content) {
                Ok(file) => file
                    .states
                    .into_iter()
                    .filter_map(|(key, value)| ResourcesValidityState::from_hex(&value).map(|s| (key, s)))
                    .collect(),
                Err(e) => {
                    warn!("Ignoring corrupt validity cache {:?}: {}", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Could not read validity cache {:?}: {}", path, e);
                BTreeMap::new()
            }
        };
        debug!("Loaded {} validity states from {:?}", states.len(), path);
        Self { path, states }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&ResourcesValidityState> {
        self.states.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, state: ResourcesValidityState) {
        self.states.insert(key.into(), state);
    }

    pub fn remove(&mut self, key: &str) -> Option<ResourcesValidityState> {
        self.states.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    pub fn save(&self) -> Result<(), BuildError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = CacheFile {
            states: self
                .states
                .iter()
                .map(|(key, state)| (key.clone(), state.to_hex()))
                .collect(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(dir: &Path) -> (PathBuf, PathBuf) {
        let manifest = dir.join("app/AndroidManifest.xml");
        let res = dir.join("app/res");
        std::fs::create_dir_all(res.join("values")).unwrap();
        std::fs::write(&manifest, "<manifest package=\"a.b\"/>").unwrap();
        std::fs::write(res.join("values/strings.xml"), "<resources/>").unwrap();
        (manifest, res)
    }

    #[test]
    fn test_state_changes_after_resource_edit() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, res) = module(dir.path());

        let before = ResourcesValidityState::compute(&manifest, &res, None).unwrap();
        assert_eq!(before, ResourcesValidityState::compute(&manifest, &res, None).unwrap());

        std::fs::write(res.join("values/strings.xml"), "<resources><string name=\"a\">b</string></resources>").unwrap();
        let after = ResourcesValidityState::compute(&manifest, &res, None).unwrap();
        assert_ne!(before, after);

        std::fs::write(dir.path().join("classes.dex"), "dex").unwrap();
        let with_classes = ResourcesValidityState::compute(&manifest, &res, Some(&dir.path().join("classes.dex"))).unwrap();
        assert_ne!(after, with_classes);
    }

    #[test]
    fn test_state_ignores_project_location() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let (ma, ra) = module(a.path());
        let (mb, rb) = module(b.path());
        assert_eq!(
            ResourcesValidityState::compute(&ma, &ra, None).unwrap(),
            ResourcesValidityState::compute(&mb, &rb, None).unwrap()
        );
    }

    #[test]
    fn test_binary_form() {
        let state = ResourcesValidityState::from_bytes([7u8; 32]);
        let mut buf = Vec::new();
        state.save(&mut buf).unwrap();
        assert_eq!(buf.len(), 32);
        assert_eq!(ResourcesValidityState::load(&mut buf.as_slice()).unwrap(), state);
        assert!(ResourcesValidityState::load(&mut &buf[..10]).is_err());
    }

    #[test]
    fn test_cache_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = IncrementalCache::default_path(dir.path());

        let mut cache = IncrementalCache::load(&path);
        assert!(cache.get("app").is_none());
        cache.insert("app", ResourcesValidityState::from_bytes([1u8; 32]));
        cache.save().unwrap();

        let reloaded = IncrementalCache::load(&path);
        assert_eq!(reloaded.get("app"), Some(&ResourcesValidityState::from_bytes([1u8; 32])));
        assert_eq!(reloaded.keys().collect::<Vec<_>>(), vec!["app"]);
    }

    #[test]
    fn test_corrupt_cache_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("validity.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(IncrementalCache::load(&path).keys().count(), 0);
    }
}
