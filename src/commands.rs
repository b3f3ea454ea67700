//! CLI commands for R-Droid
//!
//! Each command opens the project, does its work and returns plain data; the
//! binary decides how to print it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use r_droid_build_engine::{build_project, ApkAnalyzer, ApkSummary, BuildConfig, PassReport};
use r_droid_core::Project;
use r_droid_facet::{AndroidFacet, FacetManager};
use r_droid_manifest_manager::{DomProblem, ManifestElementWithName, ResourceElement};

/// Android facet of `module` in the project at `project_path`
fn android_facet(project_path: &Path, module: &str) -> Result<Arc<AndroidFacet>> {
    let project = Arc::new(
        Project::open(project_path)
            .with_context(|| format!("Failed to open project at {}", project_path.display()))?,
    );
    let module = project
        .module(module)
        .with_context(|| format!("Module {} not found", module))?;
    let facets = FacetManager::for_project(project);

    AndroidFacet::get_instance(&facets, &module)
        .with_context(|| format!("Module {} has no Android facet", module.name()))
}

/// Build command options
pub struct BuildCommand {
    pub project_path: PathBuf,
    pub modules: Vec<String>,
    pub force: bool,
}

/// Result of a build with summaries of the produced packages
#[derive(Debug, Serialize)]
pub struct BuildOutcome {
    pub report: PassReport,
    pub packages: Vec<ApkSummary>,
}

impl BuildCommand {
    /// Execute the build command
    pub async fn execute(&self) -> Result<BuildOutcome> {
        info!("Building project: {:?}", self.project_path);

        let config = BuildConfig {
            project_dir: self.project_path.clone(),
            modules: self.modules.clone(),
            force: self.force,
            cache_file: None,
        };
        let report = build_project(&config).await?;

        let project = Arc::new(Project::open(&self.project_path)?);
        let facets = FacetManager::for_project(project.clone());
        let packages = report
            .processed
            .iter()
            .filter_map(|name| project.module(name))
            .filter_map(|module| AndroidFacet::get_instance(&facets, &module)?.output_package())
            .filter_map(|apk| ApkAnalyzer::summarize(&apk).ok())
            .collect();

        Ok(BuildOutcome { report, packages })
    }
}

/// Lists declared resources of one type
pub struct ResourcesCommand {
    pub project_path: PathBuf,
    pub module: String,
    pub resource_type: String,
}

impl ResourcesCommand {
    pub fn execute(&self) -> Result<Vec<ResourceElement>> {
        let facet = android_facet(&self.project_path, &self.module)?;
        Ok(facet.resources_of_type(&self.resource_type))
    }
}

/// Resolves one drawable to its file
pub struct DrawableCommand {
    pub project_path: PathBuf,
    pub module: String,
    pub name: String,
}

impl DrawableCommand {
    pub fn execute(&self) -> Result<Option<PathBuf>> {
        let facet = android_facet(&self.project_path, &self.module)?;
        Ok(facet
            .find_resource_file("drawable", &self.name)
            .map(|file| file.path().to_path_buf()))
    }
}

/// Lists drawable names
pub struct DrawablesCommand {
    pub project_path: PathBuf,
    pub module: String,
}

impl DrawablesCommand {
    pub fn execute(&self) -> Result<Vec<String>> {
        let facet = android_facet(&self.project_path, &self.module)?;
        Ok(facet.resource_file_names("drawable"))
    }
}

/// Manifest overview of a module
#[derive(Debug, Serialize)]
pub struct ManifestSummary {
    pub package: String,
    pub main_activity: Option<String>,
    pub components: Vec<String>,
    pub permissions: Vec<String>,
    pub problems: Vec<DomProblem>,
}

/// Shows and validates a module's manifest
pub struct ManifestCommand {
    pub project_path: PathBuf,
    pub module: String,
}

impl ManifestCommand {
    pub fn execute(&self) -> Result<ManifestSummary> {
        let facet = android_facet(&self.project_path, &self.module)?;
        let manifest = facet
            .manifest()
            .with_context(|| format!("Module {} has no readable AndroidManifest.xml", self.module))?;
        let package = manifest.package_name().to_string();

        Ok(ManifestSummary {
            main_activity: manifest.main_activity().and_then(|a| a.class_name(&package)),
            components: manifest.all_component_names(),
            permissions: manifest
                .uses_permissions
                .iter()
                .filter_map(|p| p.name.string_value().map(str::to_string))
                .collect(),
            problems: manifest.validate(None),
            package,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR: &str = r#"
[[module]]
name = "notes"
content_roots = ["app"]
output_dir = "out/notes"

[module.android]
sdk_path = "sdk"

[[module]]
name = "common"
content_roots = ["common"]
"#;

    const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android" package="com.example.notes">
    <uses-permission android:name="android.permission.INTERNET"/>
    <application android:label="@string/app_name">
        <activity android:name=".NotesActivity">
            <intent-filter>
                <action android:name="android.intent.action.MAIN"/>
                <category android:name="android.intent.category.LAUNCHER"/>
            </intent-filter>
        </activity>
        <receiver/>
    </application>
</manifest>"#;

    fn write(path: &Path, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("rdroid.toml"), DESCRIPTOR);
        write(&dir.path().join("app/AndroidManifest.xml"), MANIFEST);
        write(
            &dir.path().join("app/res/values/strings.xml"),
            r#"<resources><string name="app_name">Notes</string><string name="empty">Nothing here</string></resources>"#,
        );
        write(&dir.path().join("app/res/drawable/icon.png"), "png");
        write(&dir.path().join("app/res/drawable/frame.9.png"), "png");
        std::fs::create_dir_all(dir.path().join("common")).unwrap();
        dir
    }

    #[test]
    fn test_resources_and_drawables() {
        let dir = project();

        let strings = ResourcesCommand {
            project_path: dir.path().to_path_buf(),
            module: "notes".into(),
            resource_type: "string".into(),
        }
        .execute()
        .unwrap();
        let names: Vec<_> = strings.iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["app_name", "empty"]);

        let icon = DrawableCommand {
            project_path: dir.path().to_path_buf(),
            module: "notes".into(),
            name: "frame".into(),
        }
        .execute()
        .unwrap();
        assert_eq!(icon, Some(dir.path().join("app/res/drawable/frame.9.png")));

        let mut drawables = DrawablesCommand {
            project_path: dir.path().to_path_buf(),
            module: "notes".into(),
        }
        .execute()
        .unwrap();
        drawables.sort();
        assert_eq!(drawables, vec!["frame", "icon"]);
    }

    #[test]
    fn test_manifest_summary() {
        let dir = project();
        let summary = ManifestCommand {
            project_path: dir.path().to_path_buf(),
            module: "notes".into(),
        }
        .execute()
        .unwrap();

        assert_eq!(summary.package, "com.example.notes");
        assert_eq!(summary.main_activity.as_deref(), Some("com.example.notes.NotesActivity"));
        assert_eq!(summary.permissions, vec!["android.permission.INTERNET"]);
        assert_eq!(summary.problems.len(), 1);
        assert_eq!(summary.problems[0].element, "receiver");
    }

    #[test]
    fn test_module_errors() {
        let dir = project();
        let missing = DrawablesCommand {
            project_path: dir.path().to_path_buf(),
            module: "nope".into(),
        };
        assert!(missing.execute().unwrap_err().to_string().contains("not found"));

        let plain = DrawablesCommand {
            project_path: dir.path().to_path_buf(),
            module: "common".into(),
        };
        assert!(plain.execute().unwrap_err().to_string().contains("no Android facet"));
    }

    #[tokio::test]
    async fn test_build_without_sdk_reports_errors() {
        let dir = project();
        let outcome = BuildCommand {
            project_path: dir.path().to_path_buf(),
            modules: Vec::new(),
            force: false,
        }
        .execute()
        .await
        .unwrap();

        assert!(!outcome.report.succeeded());
        assert_eq!(outcome.report.failed, vec!["notes"]);
        assert!(outcome.packages.is_empty());
    }
}
