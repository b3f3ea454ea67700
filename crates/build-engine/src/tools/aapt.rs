//! aapt resource packager

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use tracing::info;

use r_droid_manifest_manager::MANIFEST_FILE_NAME;

use super::{exec, ResourcePackager, SdkTools};
use crate::messages::ToolMessages;

/// Runs `aapt package` from the module's SDK
#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidApt;

impl AndroidApt {
    pub fn new() -> Self {
        Self
    }
}

impl ResourcePackager for AndroidApt {
    async fn package(
        &self,
        root_dir: &Path,
        sdk_path: &Path,
        resources_dir: &Path,
        output: &Path,
    ) -> io::Result<ToolMessages> {
        let tools = SdkTools::new(sdk_path);
        let aapt = tools.aapt()?;
        let android_jar = tools.android_jar()?;

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        info!("Packaging resources of {:?}", root_dir);
        let manifest = root_dir.join(MANIFEST_FILE_NAME);
        exec::execute(
            &aapt,
            [
                OsStr::new("package"),
                OsStr::new("-f"),
                OsStr::new("-M"),
                manifest.as_os_str(),
                OsStr::new("-S"),
                resources_dir.as_os_str(),
                OsStr::new("-I"),
                android_jar.as_os_str(),
                OsStr::new("-F"),
                output.as_os_str(),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_sdk_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = AndroidApt::new()
            .package(dir.path(), &dir.path().join("sdk"), &dir.path().join("res"), &dir.path().join("out/app.apk.tmp"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!dir.path().join("out").exists());
    }
}
