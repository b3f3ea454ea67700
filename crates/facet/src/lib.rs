//! Android Facet
//!
//! Android support attached to project modules: manifest and resource
//! directory lookup, typed access to manifest and values files, and drawable
//! resolution.

pub mod drawable;
pub mod facet;
pub mod registry;

pub use drawable::{drawable_names, find_drawable, DRAWABLE_EXTENSIONS};
pub use facet::AndroidFacet;
pub use registry::{AndroidFacetType, FacetManager, FacetType, FacetTypeId};
