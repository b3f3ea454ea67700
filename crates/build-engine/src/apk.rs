//! Package inspection
//!
//! Summarizes a built package so the CLI can report what it produced.

use std::path::{Path, PathBuf};
use serde::Serialize;
use zip::ZipArchive;

use crate::{BuildError, CLASSES_FILE_NAME};

const RESOURCE_TABLE: &str = "resources.arsc";

/// What a built package contains
#[derive(Debug, Clone, Serialize)]
pub struct ApkSummary {
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    pub entries: usize,
    pub has_classes: bool,
    pub has_resource_table: bool,
}

pub struct ApkAnalyzer;

impl ApkAnalyzer {
    pub fn summarize(path: &Path) -> Result<ApkSummary, BuildError> {
        let file = std::fs::File::open(path)?;
        let size = file.metadata()?.len();

        let archive = ZipArchive::new(file)
            .map_err(|e| BuildError::BuildFailed(format!("Invalid APK {}: {}", path.display(), e)))?;

        let names: Vec<&str> = archive.file_names().collect();
        Ok(ApkSummary {
            path: path.to_path_buf(),
            size,
            entries: names.len(),
            has_classes: names.contains(&CLASSES_FILE_NAME),
            has_resource_table: names.contains(&RESOURCE_TABLE),
        })
    }

    /// Size in human-readable format
    pub fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;

        if bytes >= MB {
            format!("{:.2} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.2} KB", bytes as f64 / KB as f64)
        } else {
            format!("{} bytes", bytes)
        }
    }
}
