//! External Android tools
//!
//! The packaging compiler drives two tools: a resource packager that turns
//! the manifest and resources into a package, and an archive builder that
//! merges that package with the compiled classes into the final archive.

pub mod aapt;
pub mod apk_builder;
pub mod exec;
pub mod sdk;

use std::io;
use std::path::Path;

use crate::messages::ToolMessages;

pub use aapt::AndroidApt;
pub use apk_builder::AndroidApkBuilder;
pub use exec::{classify_output, execute};
pub use sdk::SdkTools;

/// Packages the manifest and resources of a module
#[allow(async_fn_in_trait)]
pub trait ResourcePackager {
    /// Package `resources_dir` together with `<root_dir>/AndroidManifest.xml` into `output`
    async fn package(
        &self,
        root_dir: &Path,
        sdk_path: &Path,
        resources_dir: &Path,
        output: &Path,
    ) -> io::Result<ToolMessages>;
}

/// Builds the final package archive
#[allow(async_fn_in_trait)]
pub trait ArchiveBuilder {
    /// Combine the packaged `resources` with `classes` into `output`
    async fn build(
        &self,
        sdk_path: &Path,
        resources: &Path,
        classes: &Path,
        output: &Path,
    ) -> io::Result<ToolMessages>;
}
