//! Android Manifest Manager
//!
//! Typed DOM bindings for AndroidManifest.xml and `res/values` files, with an
//! explicit schema layer describing manifest element attributes.

pub mod components;
pub mod dom;
pub mod manifest;
pub mod resources;
pub mod schema;

pub use components::{Activity, IntentFilter, ManifestElementWithName, Provider, Receiver, Service};
pub use dom::{AttributeValue, DomElement, DomError, DomManager, Position, ANDROID_NS};
pub use manifest::{Application, Manifest, UsesPermission, UsesSdk};
pub use resources::{ResourceElement, ResourceType, Resources, StyleItem, UnknownResourceType};
pub use schema::{ClassHierarchy, DomProblem, ElementSchema, ProblemSeverity, SchemaElement, StaticClassHierarchy};

/// Fixed file name of the Android manifest
pub const MANIFEST_FILE_NAME: &str = "AndroidManifest.xml";
