//! Drawable resolution
//!
//! Drawables are plain files in `res/drawable`; a logical name maps to the
//! first file carrying one of the known extensions.

use r_droid_core::VirtualFile;

/// Extensions tried in order when resolving a drawable name
pub const DRAWABLE_EXTENSIONS: [&str; 3] = [".png", ".9.png", ".jpg"];

/// Resolve `name` to a file in `drawable_dir`
pub fn find_drawable(drawable_dir: &VirtualFile, name: &str) -> Option<VirtualFile> {
    DRAWABLE_EXTENSIONS
        .iter()
        .find_map(|ext| {
            drawable_dir
                .find_child(&format!("{}{}", name, ext))
                .filter(|f| !f.is_directory())
        })
}

/// Strip the longest known drawable extension from a file name
pub fn drawable_stem(file_name: &str) -> Option<&str> {
    DRAWABLE_EXTENSIONS
        .iter()
        .filter(|ext| file_name.len() > ext.len())
        .filter_map(|ext| file_name.strip_suffix(*ext))
        .min_by_key(|stem| stem.len())
}

/// Names of all drawables in `drawable_dir`, in directory order, without duplicates
pub fn drawable_names(drawable_dir: &VirtualFile) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for file in drawable_dir.children() {
        if file.is_directory() {
            continue;
        }
        if let Some(stem) = drawable_stem(&file.name()) {
            if !names.iter().any(|n| n == stem) {
                names.push(stem.to_string());
            }
        }
    }
    names
}
