//! Android Build Engine
//!
//! Packages Android modules into `.apk` archives with the SDK's `aapt` and
//! `apkbuilder`, skipping modules whose inputs did not change since the last
//! successful pass.

pub mod apk;
pub mod compiler;
pub mod config;
pub mod context;
pub mod messages;
pub mod runner;
pub mod tools;
pub mod validity;

pub use apk::{ApkAnalyzer, ApkSummary};
pub use compiler::{AndroidPackagingCompiler, PackagingCompiler, PackagingItem, ProcessingItem};
pub use config::BuildConfig;
pub use context::{BuildContext, CompileContext, CompileScope};
pub use messages::{CompilerMessage, CompilerMessageCategory, ToolMessages};
pub use runner::{build_project, BuildRunner, PassReport};
pub use tools::{AndroidApkBuilder, AndroidApt, ArchiveBuilder, ResourcePackager, SdkTools};
pub use validity::{IncrementalCache, ResourcesValidityState};

use r_droid_core::RDroidError;

/// Compiled classes archive expected in a module's output directory
pub const CLASSES_FILE_NAME: &str = "classes.dex";

/// Build errors
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Build failed: {0}")]
    BuildFailed(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validity cache error: {0}")]
    Cache(#[from] serde_json::Error),
    #[error(transparent)]
    Project(#[from] RDroidError),
}
