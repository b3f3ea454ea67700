//! R-Droid Android support
//!
//! Android project support for R-Droid: per-module Android facets that locate
//! the manifest and resources, typed access to manifest and values files, and
//! an incremental packaging compiler that turns modules into `.apk` archives.
//!
//! ## Architecture
//!
//! - `r-droid-core`: project model, descriptor and virtual files
//! - `r-droid-manifest-manager`: DOM bindings and schema for manifest and values files
//! - `r-droid-facet`: the Android facet and its registry
//! - `r-droid-build-engine`: packaging compiler, SDK tools and the build runner

#![warn(clippy::all)]

pub mod commands;

pub use r_droid_build_engine as build;
pub use r_droid_core as core;
pub use r_droid_facet as facet;
pub use r_droid_manifest_manager as manifest;

/// Prelude module for convenient imports
pub mod prelude {
    pub use r_droid_build_engine::{build_project, BuildConfig, BuildRunner, PassReport};
    pub use r_droid_core::{Module, Project, VirtualFile};
    pub use r_droid_facet::{AndroidFacet, FacetManager};
    pub use r_droid_manifest_manager::{DomManager, Manifest, Resources};
}
