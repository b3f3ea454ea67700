//! Facet registration
//!
//! Facet types are registered explicitly; the manager instantiates them for
//! every module whose descriptor carries the matching configuration.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use r_droid_core::{FacetConfiguration, Module, ModuleDescriptor, Project};

use crate::facet::AndroidFacet;

/// Identifier of a facet type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FacetTypeId(pub &'static str);

/// A kind of facet that can be attached to modules
pub trait FacetType: Send + Sync {
    fn id(&self) -> FacetTypeId;

    fn presentable_name(&self) -> &'static str;

    /// Configuration for `module`, or `None` if the module does not carry this facet
    fn configuration(&self, module: &ModuleDescriptor) -> Option<FacetConfiguration>;

    fn create_facet(
        &self,
        project: Arc<Project>,
        module: Arc<Module>,
        configuration: FacetConfiguration,
    ) -> AndroidFacet;
}

/// The Android facet type
pub struct AndroidFacetType;

impl AndroidFacetType {
    pub const ID: FacetTypeId = FacetTypeId("android");
}

impl FacetType for AndroidFacetType {
    fn id(&self) -> FacetTypeId {
        Self::ID
    }

    fn presentable_name(&self) -> &'static str {
        "Android"
    }

    fn configuration(&self, module: &ModuleDescriptor) -> Option<FacetConfiguration> {
        module.android.clone()
    }

    fn create_facet(
        &self,
        project: Arc<Project>,
        module: Arc<Module>,
        configuration: FacetConfiguration,
    ) -> AndroidFacet {
        AndroidFacet::new(project, module, self.presentable_name(), configuration)
    }
}

/// Facets of a project, keyed by module name
#[derive(Default)]
pub struct FacetManager {
    types: Vec<Box<dyn FacetType>>,
    facets: HashMap<String, Arc<AndroidFacet>>,
}

impl FacetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager with the Android facet type registered and instantiated for `project`
    pub fn for_project(project: Arc<Project>) -> Self {
        let mut manager = Self::new();
        manager.register_type(Box::new(AndroidFacetType));
        manager.attach(project);
        manager
    }

    /// Register a facet type; a second registration of the same id is ignored
    pub fn register_type(&mut self, facet_type: Box<dyn FacetType>) {
        if self.types.iter().any(|t| t.id() == facet_type.id()) {
            debug!("Facet type {:?} already registered", facet_type.id());
            return;
        }
        self.types.push(facet_type);
    }

    /// Create facets for every module of `project` that carries a registered type
    pub fn attach(&mut self, project: Arc<Project>) {
        for descriptor in &project.descriptor().modules {
            let Some(module) = project.module(&descriptor.name) else {
                continue;
            };
            for facet_type in &self.types {
                if let Some(configuration) = facet_type.configuration(descriptor) {
                    let facet = facet_type.create_facet(project.clone(), module.clone(), configuration);
                    debug!("Attached {} facet to module {}", facet_type.presentable_name(), descriptor.name);
                    self.facets.insert(descriptor.name.clone(), Arc::new(facet));
                }
            }
        }
        info!("{} of {} modules have an Android facet", self.facets.len(), project.modules().len());
    }

    /// Facet attached to `module`
    pub fn facet(&self, module: &Module) -> Option<Arc<AndroidFacet>> {
        self.facets.get(module.name()).cloned()
    }

    pub fn facets(&self) -> impl Iterator<Item = &Arc<AndroidFacet>> {
        self.facets.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use r_droid_core::ProjectDescriptor;

    fn project() -> Arc<Project> {
        let descriptor = ProjectDescriptor {
            modules: vec![
                ModuleDescriptor {
                    name: "app".into(),
                    content_roots: vec![PathBuf::from("app")],
                    output_dir: None,
                    android: Some(FacetConfiguration::default()),
                },
                ModuleDescriptor {
                    name: "common".into(),
                    content_roots: vec![PathBuf::from("common")],
                    output_dir: None,
                    android: None,
                },
            ],
        };
        Arc::new(Project::from_descriptor("/work", descriptor).unwrap())
    }

    #[test]
    fn test_only_configured_modules_get_facets() {
        let project = project();
        let facets = FacetManager::for_project(project.clone());

        let app = project.module("app").unwrap();
        let facet = AndroidFacet::get_instance(&facets, &app).unwrap();
        assert_eq!(facet.module().name(), "app");
        assert_eq!(facet.name(), "Android");

        assert!(AndroidFacet::get_instance(&facets, &project.module("common").unwrap()).is_none());
        assert_eq!(facets.facets().count(), 1);
    }

    #[test]
    fn test_duplicate_type_registration_ignored() {
        let mut facets = FacetManager::new();
        facets.register_type(Box::new(AndroidFacetType));
        facets.register_type(Box::new(AndroidFacetType));
        facets.attach(project());
        assert_eq!(facets.facets().count(), 1);
    }
}
