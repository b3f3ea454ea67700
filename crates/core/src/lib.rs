//! R-Droid Core - project model and shared types
//! 
//! This crate provides the host-side building blocks the Android support
//! crates query: virtual files, modules with content roots, the project
//! read action, and the project descriptor holding facet configuration.

pub mod config;
pub mod error;
pub mod module;
pub mod vfs;

pub use config::{FacetConfiguration, ModuleDescriptor, ProjectDescriptor};
pub use error::{RDroidError, Result};
pub use module::{Module, Project};
pub use vfs::{FileType, VirtualFile};

/// R-Droid version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "R-Droid";
