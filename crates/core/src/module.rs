//! Project Model
//!
//! Modules, their content roots and output directories, and the project-wide
//! read action that guards model queries.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::{ModuleDescriptor, ProjectDescriptor, DESCRIPTOR_FILE_NAME};
use crate::error::{RDroidError, Result};
use crate::vfs::VirtualFile;

/// A project subdivision owning content roots and a compiler output directory
pub struct Module {
    name: String,
    content_roots: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
}

impl Module {
    /// Create a module from already resolved paths
    pub fn new(name: impl Into<String>, content_roots: Vec<PathBuf>, output_dir: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            content_roots,
            output_dir,
        }
    }

    fn from_descriptor(root: &Path, descriptor: &ModuleDescriptor) -> Self {
        Self::new(
            descriptor.name.clone(),
            descriptor.content_roots.iter().map(|p| root.join(p)).collect(),
            descriptor.output_dir.as_ref().map(|p| root.join(p)),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Content roots that currently exist on disk, in declaration order
    pub fn content_roots(&self) -> Vec<VirtualFile> {
        self.content_roots
            .iter()
            .filter_map(|p| VirtualFile::find(p.clone()))
            .collect()
    }

    /// Compiler output directory, whether or not it exists yet
    pub fn compiler_output_path(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Module {}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("content_roots", &self.content_roots)
            .finish()
    }
}

/// A loaded project: its modules and the lock guarding model queries
pub struct Project {
    root: PathBuf,
    descriptor: ProjectDescriptor,
    modules: Vec<Arc<Module>>,
    model_lock: RwLock<()>,
}

impl Project {
    /// Open the project rooted at `root` by reading its descriptor file
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(RDroidError::NotFound(format!("Project path not found: {:?}", root)));
        }

        let descriptor = ProjectDescriptor::load(&root.join(DESCRIPTOR_FILE_NAME))?;
        let project = Self::from_descriptor(root, descriptor)?;
        info!("Opened project at {:?} ({} modules)", project.root, project.modules.len());
        Ok(project)
    }

    /// Build a project from an in-memory descriptor
    pub fn from_descriptor(root: impl Into<PathBuf>, descriptor: ProjectDescriptor) -> Result<Self> {
        let root = root.into();
        descriptor.validate()?;

        let modules = descriptor
            .modules
            .iter()
            .map(|m| Arc::new(Module::from_descriptor(&root, m)))
            .collect();

        Ok(Self {
            root,
            descriptor,
            modules,
            model_lock: RwLock::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn descriptor(&self) -> &ProjectDescriptor {
        &self.descriptor
    }

    pub fn modules(&self) -> &[Arc<Module>] {
        &self.modules
    }

    /// Find a module by name
    pub fn module(&self, name: &str) -> Option<Arc<Module>> {
        self.modules.iter().find(|m| m.name() == name).cloned()
    }

    /// Run `action` while holding the model read lock.
    ///
    /// Any number of read actions may run at once; they exclude write actions
    /// only. The guard is released when `action` returns or unwinds.
    pub fn run_read_action<T>(&self, action: impl FnOnce() -> T) -> T {
        let _guard = self.model_lock.read_recursive();
        debug!("read action acquired");
        action()
    }

    /// Run `action` while holding the model write lock
    pub fn run_write_action<T>(&self, action: impl FnOnce() -> T) -> T {
        let _guard = self.model_lock.write();
        action()
    }
}
