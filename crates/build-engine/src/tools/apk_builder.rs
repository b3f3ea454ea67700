//! apkbuilder archive builder

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use tracing::info;

use super::{exec, ArchiveBuilder, SdkTools};
use crate::messages::{CompilerMessage, ToolMessages};

/// Runs the SDK's `apkbuilder` script
#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidApkBuilder;

impl AndroidApkBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveBuilder for AndroidApkBuilder {
    async fn build(
        &self,
        sdk_path: &Path,
        resources: &Path,
        classes: &Path,
        output: &Path,
    ) -> io::Result<ToolMessages> {
        let apk_builder = SdkTools::new(sdk_path).apk_builder()?;

        if !classes.is_file() {
            return Ok(ToolMessages::from(vec![CompilerMessage::error(format!(
                "Classes archive not found: {}",
                classes.display()
            ))]));
        }

        info!("Building {:?}", output);
        exec::execute(
            &apk_builder,
            [
                output.as_os_str(),
                OsStr::new("-z"),
                resources.as_os_str(),
                OsStr::new("-f"),
                classes.as_os_str(),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_classes_is_an_error_message() {
        let sdk = tempfile::tempdir().unwrap();
        let tool = sdk.path().join("tools").join(if cfg!(windows) { "apkbuilder.bat" } else { "apkbuilder" });
        std::fs::create_dir_all(tool.parent().unwrap()).unwrap();
        std::fs::write(&tool, "").unwrap();

        let messages = AndroidApkBuilder::new()
            .build(sdk.path(), &sdk.path().join("app.apk.tmp"), &sdk.path().join("classes.dex"), &sdk.path().join("app.apk"))
            .await
            .unwrap();
        assert!(messages.has_errors());
        assert!(messages.messages()[0].text.starts_with("Classes archive not found"));
    }
}
