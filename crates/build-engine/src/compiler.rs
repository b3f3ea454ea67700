//! Android packaging compiler
//!
//! One pass goes Scan, Process, Report. Scan turns every Android module in
//! scope into a [`PackagingItem`]. Process runs the resource packager and,
//! when that reported no error, the archive builder. Report keeps an item
//! only while the pass as a whole has no errors.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use r_droid_core::{Module, VirtualFile};
use r_droid_facet::{AndroidFacet, FacetManager};

use crate::context::{CompileContext, CompileScope};
use crate::messages::{CompilerMessage, CompilerMessageCategory};
use crate::tools::{AndroidApkBuilder, AndroidApt, ArchiveBuilder, ResourcePackager};
use crate::validity::ResourcesValidityState;
use crate::CLASSES_FILE_NAME;

pub const DESCRIPTION: &str = "Android Packaging Compiler";
pub const PROGRESS_TEXT: &str = "Building Android package...";

/// One unit of work in a build pass
pub trait ProcessingItem {
    /// File the item is keyed on
    fn file(&self) -> &VirtualFile;

    /// Key under which the item's validity state is recorded
    fn cache_key(&self) -> &str;

    /// Fingerprint of the item's current inputs
    fn validity_state(&self) -> io::Result<ResourcesValidityState>;
}

/// A compiler that produces a package per processing item
#[allow(async_fn_in_trait)]
pub trait PackagingCompiler {
    type Item: ProcessingItem;

    fn description(&self) -> &'static str;

    fn validate_configuration(&self, scope: &CompileScope) -> bool;

    /// Scan: the items of this pass
    fn processing_items(&self, context: &dyn CompileContext) -> Vec<Self::Item>;

    /// Process and report: the items that were packaged successfully
    async fn process(&self, context: &dyn CompileContext, items: Vec<Self::Item>) -> Vec<Self::Item>;

    /// Decode a state stored by an earlier pass
    fn create_validity_state(&self, reader: &mut dyn Read) -> io::Result<ResourcesValidityState>;

    /// Called for recorded items that no longer exist
    fn process_outdated_item(&self, context: &dyn CompileContext, key: &str, state: Option<&ResourcesValidityState>);
}

/// Packaging work for one module. Paths are fixed at construction.
#[derive(Debug, Clone)]
pub struct PackagingItem {
    module: Arc<Module>,
    manifest: VirtualFile,
    root_dir: PathBuf,
    sdk_path: Option<PathBuf>,
    resources_path: PathBuf,
    temp_output: PathBuf,
    final_output: PathBuf,
    classes: PathBuf,
}

impl PackagingItem {
    pub fn new(
        module: Arc<Module>,
        manifest: VirtualFile,
        sdk_path: Option<PathBuf>,
        resources_path: PathBuf,
        output_dir: &Path,
    ) -> Self {
        let root_dir = manifest
            .path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let name = module.name().to_string();
        Self {
            module,
            manifest,
            root_dir,
            sdk_path,
            resources_path,
            temp_output: output_dir.join(format!("{}.apk.tmp", name)),
            final_output: output_dir.join(format!("{}.apk", name)),
            classes: output_dir.join(CLASSES_FILE_NAME),
        }
    }

    pub fn module(&self) -> &Arc<Module> {
        &self.module
    }

    pub fn manifest(&self) -> &VirtualFile {
        &self.manifest
    }

    /// Directory holding the manifest
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn sdk_path(&self) -> Option<&Path> {
        self.sdk_path.as_deref()
    }

    pub fn resources_path(&self) -> &Path {
        &self.resources_path
    }

    pub fn temp_output(&self) -> &Path {
        &self.temp_output
    }

    pub fn final_output(&self) -> &Path {
        &self.final_output
    }

    pub fn classes(&self) -> &Path {
        &self.classes
    }
}

impl ProcessingItem for PackagingItem {
    fn file(&self) -> &VirtualFile {
        &self.manifest
    }

    fn cache_key(&self) -> &str {
        self.module.name()
    }

    fn validity_state(&self) -> io::Result<ResourcesValidityState> {
        ResourcesValidityState::compute(self.manifest.path(), &self.resources_path, Some(&self.classes))
    }
}

/// Packages Android modules with a resource packager and an archive builder
pub struct AndroidPackagingCompiler<P = AndroidApt, B = AndroidApkBuilder> {
    facets: Arc<FacetManager>,
    packager: P,
    builder: B,
}

impl AndroidPackagingCompiler {
    /// Compiler driving the SDK's `aapt` and `apkbuilder`
    pub fn with_sdk_tools(facets: Arc<FacetManager>) -> Self {
        Self::new(facets, AndroidApt::new(), AndroidApkBuilder::new())
    }
}

impl<P: ResourcePackager, B: ArchiveBuilder> AndroidPackagingCompiler<P, B> {
    pub fn new(facets: Arc<FacetManager>, packager: P, builder: B) -> Self {
        Self { facets, packager, builder }
    }

    async fn package(&self, context: &dyn CompileContext, item: &PackagingItem) -> io::Result<()> {
        let sdk_path = item.sdk_path().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("Android SDK not found for module {}", item.module().name()),
            )
        })?;

        let messages = self
            .packager
            .package(item.root_dir(), sdk_path, item.resources_path(), item.temp_output())
            .await?;
        let packaged = !messages.has_errors();
        for message in messages {
            context.add_message(message);
        }
        if !packaged {
            debug!("Resource packaging of {} failed, skipping archive", item.module().name());
            return Ok(());
        }

        let messages = self
            .builder
            .build(sdk_path, item.temp_output(), item.classes(), item.final_output())
            .await?;
        for message in messages {
            context.add_message(message);
        }
        Ok(())
    }
}

impl<P: ResourcePackager, B: ArchiveBuilder> PackagingCompiler for AndroidPackagingCompiler<P, B> {
    type Item = PackagingItem;

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn validate_configuration(&self, _scope: &CompileScope) -> bool {
        true
    }

    fn processing_items(&self, context: &dyn CompileContext) -> Vec<PackagingItem> {
        let mut items = Vec::new();

        for module in context.compile_scope().affected_modules() {
            let Some(facet) = AndroidFacet::get_instance(&self.facets, module) else {
                continue;
            };
            let (Some(manifest), Some(resources)) = (facet.manifest_file(), facet.resources_dir()) else {
                debug!("Module {} has no manifest or resources directory", module.name());
                continue;
            };
            let Some(output_dir) = context.module_output_directory(module) else {
                warn!("Module {} has no output directory, not packaging it", module.name());
                continue;
            };

            items.push(PackagingItem::new(
                module.clone(),
                manifest,
                facet.sdk_path(),
                resources.path().to_path_buf(),
                &output_dir,
            ));
        }

        debug!("{} Android modules to package", items.len());
        items
    }

    async fn process(&self, context: &dyn CompileContext, items: Vec<PackagingItem>) -> Vec<PackagingItem> {
        context.set_progress_text(PROGRESS_TEXT);

        let mut compiled = Vec::with_capacity(items.len());
        for item in items {
            if let Err(e) = self.package(context, &item).await {
                context.add_message(CompilerMessage::error(e.to_string()));
            }

            if context.message_count(CompilerMessageCategory::Error) == 0 {
                info!("Packaged {:?}", item.final_output());
                compiled.push(item);
            }
        }
        compiled
    }

    fn create_validity_state(&self, reader: &mut dyn Read) -> io::Result<ResourcesValidityState> {
        ResourcesValidityState::load(reader)
    }

    fn process_outdated_item(&self, _context: &dyn CompileContext, _key: &str, _state: Option<&ResourcesValidityState>) {}
}
