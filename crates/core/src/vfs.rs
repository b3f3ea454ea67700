//! Virtual File System
//!
//! A thin, local-disk backed view of files and directories. Lookups never
//! fail loudly: a child that does not exist is simply `None`.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Xml,
    Image,
    Java,
    Kotlin,
    Archive,
    Dex,
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "xml" => FileType::Xml,
            "png" | "jpg" | "jpeg" | "gif" | "webp" => FileType::Image,
            "java" => FileType::Java,
            "kt" | "kts" => FileType::Kotlin,
            "apk" | "jar" | "zip" | "tmp" => FileType::Archive,
            "dex" => FileType::Dex,
            _ => FileType::Unknown,
        }
    }
}

/// A file or directory as seen by the project model
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct VirtualFile {
    path: PathBuf,
}

impl VirtualFile {
    /// Wrap an existing path. Returns `None` if nothing exists there.
    pub fn find(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        if path.exists() {
            Some(Self { path })
        } else {
            None
        }
    }

    /// File name including extension
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Absolute or project-relative path of this file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_directory(&self) -> bool {
        self.path.is_dir()
    }

    pub fn file_type(&self) -> FileType {
        if self.is_directory() {
            return FileType::Unknown;
        }
        self.path
            .extension()
            .map(|e| FileType::from_extension(&e.to_string_lossy()))
            .unwrap_or(FileType::Unknown)
    }

    /// Parent directory, `None` for a file system root
    pub fn parent(&self) -> Option<VirtualFile> {
        self.path.parent().and_then(VirtualFile::find)
    }

    /// Direct child with the given name
    pub fn find_child(&self, name: &str) -> Option<VirtualFile> {
        if !self.is_directory() {
            return None;
        }
        VirtualFile::find(self.path.join(name))
    }

    /// Direct children, sorted by file name. Unreadable directories have no children.
    pub fn children(&self) -> Vec<VirtualFile> {
        let entries = match std::fs::read_dir(&self.path) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot list {:?}: {}", self.path, e);
                return Vec::new();
            }
        };

        let mut children: Vec<VirtualFile> = entries
            .filter_map(|e| e.ok())
            .map(|e| VirtualFile { path: e.path() })
            .collect();
        children.sort_by_key(|f| f.name());
        children
    }

    /// Read the whole file as UTF-8 text
    pub fn read_to_string(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.path)
    }
}

impl fmt::Debug for VirtualFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VirtualFile({:?})", self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(FileType::from_extension("xml"), FileType::Xml);
        assert_eq!(FileType::from_extension("PNG"), FileType::Image);
        assert_eq!(FileType::from_extension("dex"), FileType::Dex);
        assert_eq!(FileType::from_extension("unknown"), FileType::Unknown);
    }

    #[test]
    fn test_find_child_and_children() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.xml"), "<b/>").unwrap();
        std::fs::write(dir.path().join("a.png"), [0u8; 4]).unwrap();
        std::fs::create_dir(dir.path().join("values")).unwrap();

        let root = VirtualFile::find(dir.path()).unwrap();
        assert!(root.is_directory());
        assert!(root.find_child("missing.xml").is_none());

        let child = root.find_child("b.xml").unwrap();
        assert_eq!(child.file_type(), FileType::Xml);
        assert_eq!(child.parent(), Some(root.clone()));
        assert!(child.find_child("anything").is_none());

        let names: Vec<String> = root.children().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["a.png", "b.xml", "values"]);
    }
}
