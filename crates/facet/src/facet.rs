//! Android Facet
//!
//! Per-module Android support: where the manifest and resources live, and
//! typed access to them. Every lookup treats absence as `None`; parse
//! failures are logged and skipped.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use r_droid_core::{FacetConfiguration, FileType, Module, Project, VirtualFile};
use r_droid_manifest_manager::{DomElement, DomManager, Manifest, ResourceElement, ResourceType, Resources, MANIFEST_FILE_NAME};

use crate::drawable;
use crate::registry::FacetManager;

/// Android support attached to one module
pub struct AndroidFacet {
    project: Arc<Project>,
    module: Arc<Module>,
    name: String,
    configuration: FacetConfiguration,
}

impl AndroidFacet {
    pub fn new(
        project: Arc<Project>,
        module: Arc<Module>,
        name: impl Into<String>,
        configuration: FacetConfiguration,
    ) -> Self {
        Self {
            project,
            module,
            name: name.into(),
            configuration,
        }
    }

    /// The Android facet of `module`, if it has one
    pub fn get_instance(facets: &FacetManager, module: &Module) -> Option<Arc<AndroidFacet>> {
        facets.facet(module)
    }

    pub fn module(&self) -> &Arc<Module> {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn configuration(&self) -> &FacetConfiguration {
        &self.configuration
    }

    /// SDK path from the configuration, falling back to auto-detection.
    /// A relative path is taken from the project root.
    pub fn sdk_path(&self) -> Option<PathBuf> {
        self.configuration
            .effective_sdk_path()
            .map(|path| if path.is_relative() { self.project.root().join(path) } else { path })
    }

    /// First `AndroidManifest.xml` found directly under a content root
    pub fn manifest_file(&self) -> Option<VirtualFile> {
        self.module
            .content_roots()
            .iter()
            .find_map(|root| root.find_child(MANIFEST_FILE_NAME))
    }

    /// Resources directory next to the manifest
    pub fn resources_dir(&self) -> Option<VirtualFile> {
        let manifest = self.manifest_file()?;
        let parent = manifest.parent()?;
        parent.find_child(&self.configuration.resources_path)
    }

    /// A resource type directory such as `values` or `drawable`
    pub fn resource_type_dir(&self, resource_type: &str) -> Option<VirtualFile> {
        self.resources_dir()?.find_child(resource_type)
    }

    /// Path of the final package in the module's compiler output
    pub fn output_package(&self) -> Option<PathBuf> {
        self.module
            .compiler_output_path()
            .map(|out| out.join(format!("{}.apk", self.module.name())))
    }

    /// Parse the manifest. Not cached; every call reads the file again.
    pub fn manifest(&self) -> Option<Manifest> {
        let file = self.manifest_file()?;
        self.load_dom_element(&file)
    }

    /// All `res/values` files that parse as `<resources>`
    pub fn value_resources(&self) -> Vec<Resources> {
        let values_dir = match self.resource_type_dir("values") {
            Some(dir) => dir,
            None => return Vec::new(),
        };

        values_dir
            .children()
            .iter()
            .filter(|f| !f.is_directory() && f.file_type() == FileType::Xml)
            .filter_map(|f| self.load_dom_element::<Resources>(f))
            .collect()
    }

    /// Declared resources of one type across all values files.
    ///
    /// Only `string`, `drawable`, `color` and `style` are declared in values
    /// files; any other type yields nothing.
    pub fn resources_of_type(&self, resource_type: &str) -> Vec<ResourceElement> {
        let resource_type: ResourceType = match resource_type.parse() {
            Ok(t) => t,
            Err(_) => return Vec::new(),
        };

        self.value_resources()
            .iter()
            .flat_map(|res| res.of_type(resource_type).iter().cloned())
            .collect()
    }

    /// File backing a file-based resource; only drawables resolve
    pub fn find_resource_file(&self, resource_type: &str, resource_name: &str) -> Option<VirtualFile> {
        if resource_type != ResourceType::Drawable.as_str() {
            return None;
        }
        let dir = self.resource_type_dir(resource_type)?;
        self.project
            .run_read_action(|| drawable::find_drawable(&dir, resource_name))
    }

    /// Names of the file-based resources of a type; only drawables are listed
    pub fn resource_file_names(&self, resource_type: &str) -> Vec<String> {
        if resource_type != ResourceType::Drawable.as_str() {
            return Vec::new();
        }
        self.resource_type_dir(resource_type)
            .map(|dir| drawable::drawable_names(&dir))
            .unwrap_or_default()
    }

    fn load_dom_element<T: DomElement>(&self, file: &VirtualFile) -> Option<T> {
        self.project.run_read_action(|| match DomManager::file_element::<T>(file) {
            Ok(element) => element,
            Err(e) => {
                warn!("Skipping {:?}: {}", file, e);
                None
            }
        })
    }
}

impl std::fmt::Debug for AndroidFacet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AndroidFacet")
            .field("module", &self.module.name())
            .field("configuration", &self.configuration)
            .finish()
    }
}
