//! SDK tool lookup

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

const BUILD_TOOLS_DIR: &str = "build-tools";
const PLATFORM_TOOLS_DIR: &str = "platform-tools";
const TOOLS_DIR: &str = "tools";
const PLATFORMS_DIR: &str = "platforms";
const ANDROID_JAR: &str = "android.jar";

fn executable(name: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", name)
    } else {
        name.to_string()
    }
}

fn script(name: &str) -> String {
    if cfg!(windows) {
        format!("{}.bat", name)
    } else {
        name.to_string()
    }
}

/// Numeric sort key for names like `28.0.3`, `android-33` or `33-rc1`
fn version_key(name: &str) -> Vec<u64> {
    name.split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse().ok())
        .collect()
}

/// Subdirectories of `dir`, newest version first
fn versioned_dirs(dir: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect(),
        Err(_) => return Vec::new(),
    };

    dirs.sort_by_key(|p| {
        std::cmp::Reverse(version_key(&p.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()))
    });
    dirs
}

fn not_found(what: &str, sdk: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} not found in Android SDK at {}", what, sdk.display()),
    )
}

/// Locates packaging tools inside an Android SDK installation
#[derive(Debug, Clone)]
pub struct SdkTools {
    sdk_path: PathBuf,
}

impl SdkTools {
    pub fn new(sdk_path: impl Into<PathBuf>) -> Self {
        Self { sdk_path: sdk_path.into() }
    }

    pub fn sdk_path(&self) -> &Path {
        &self.sdk_path
    }

    /// `aapt` from the newest build-tools, falling back to platform-tools and tools
    pub fn aapt(&self) -> io::Result<PathBuf> {
        let name = executable("aapt");
        let candidates = versioned_dirs(&self.sdk_path.join(BUILD_TOOLS_DIR))
            .into_iter()
            .chain([
                self.sdk_path.join(PLATFORM_TOOLS_DIR),
                self.sdk_path.join(TOOLS_DIR),
            ])
            .map(|dir| dir.join(&name));

        self.first_file(candidates, "aapt")
    }

    pub fn apk_builder(&self) -> io::Result<PathBuf> {
        let path = self.sdk_path.join(TOOLS_DIR).join(script("apkbuilder"));
        self.first_file(std::iter::once(path), "apkbuilder")
    }

    /// `android.jar` of the newest installed platform, or the one at the SDK root
    pub fn android_jar(&self) -> io::Result<PathBuf> {
        let candidates = versioned_dirs(&self.sdk_path.join(PLATFORMS_DIR))
            .into_iter()
            .chain(std::iter::once(self.sdk_path.clone()))
            .map(|dir| dir.join(ANDROID_JAR));

        self.first_file(candidates, ANDROID_JAR)
    }

    fn first_file(&self, mut candidates: impl Iterator<Item = PathBuf>, what: &str) -> io::Result<PathBuf> {
        match candidates.find(|p| p.is_file()) {
            Some(path) => {
                debug!("Using {} at {:?}", what, path);
                Ok(path)
            }
            None => Err(not_found(what, &self.sdk_path)),
        }
    }
}
