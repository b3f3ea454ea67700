//! XML to typed element binding
//!
//! A `DomElement` knows its root tag and how to build itself from a parsed
//! node. `DomManager` reads a file, checks the root tag and hands the node
//! to the binding.

use serde::Serialize;
use tracing::debug;

use r_droid_core::{FileType, VirtualFile};

/// Android namespace
pub const ANDROID_NS: &str = "http://schemas.android.com/apk/res/android";

/// DOM loading errors
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parsing error: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// Line and column (both 1-based) of an element or attribute in its file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    fn of(node: roxmltree::Node) -> Self {
        let pos = node.document().text_pos_at(node.range().start);
        Self {
            line: pos.row,
            column: pos.col,
        }
    }
}

/// Raw value of one XML attribute together with where its element sits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeValue {
    value: Option<String>,
    position: Option<Position>,
}

impl AttributeValue {
    pub fn new(value: Option<String>, position: Option<Position>) -> Self {
        Self { value, position }
    }

    /// Read `android:<name>` from `node`
    pub fn android(node: roxmltree::Node, name: &str) -> Self {
        Self::new(
            node.attribute((ANDROID_NS, name)).map(str::to_string),
            Some(Position::of(node)),
        )
    }

    /// Read a non-namespaced attribute from `node`
    pub fn plain(node: roxmltree::Node, name: &str) -> Self {
        Self::new(node.attribute(name).map(str::to_string), Some(Position::of(node)))
    }

    /// Attribute text, `None` when the attribute is absent
    pub fn string_value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
    }

    pub fn u32_value(&self) -> Option<u32> {
        self.value.as_deref().and_then(|s| s.trim().parse().ok())
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }
}

/// A typed view over an XML element
pub trait DomElement: Sized {
    /// Tag the root element of a file must carry for this binding
    const ROOT_TAG: &'static str;

    /// Build the typed view from the matching element
    fn from_node(node: roxmltree::Node) -> Self;
}

/// Element children of `node` with the given tag name
pub fn child_elements<'a, 'input: 'a>(
    node: roxmltree::Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

/// Concatenated text content of `node`, trimmed
pub fn text_content(node: roxmltree::Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Loads typed root elements from XML files
pub struct DomManager;

impl DomManager {
    /// Load the typed root element of `file`.
    ///
    /// Returns `Ok(None)` when the file is not XML or its root element is not
    /// `T::ROOT_TAG`.
    pub fn file_element<T: DomElement>(file: &VirtualFile) -> Result<Option<T>, DomError> {
        if file.is_directory() || file.file_type() != FileType::Xml {
            return Ok(None);
        }

        let content = file.read_to_string()?;
        let element = Self::parse_str::<T>(&content)?;
        if element.is_none() {
            debug!("{:?} is not a <{}> document", file, T::ROOT_TAG);
        }
        Ok(element)
    }

    /// Parse `xml` and bind its root element
    pub fn parse_str<T: DomElement>(xml: &str) -> Result<Option<T>, DomError> {
        let document = roxmltree::Document::parse(xml)?;
        let root = document.root_element();
        if root.tag_name().name() != T::ROOT_TAG {
            return Ok(None);
        }
        Ok(Some(T::from_node(root)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget {
        id: AttributeValue,
        label: String,
    }

    impl DomElement for Widget {
        const ROOT_TAG: &'static str = "widget";

        fn from_node(node: roxmltree::Node) -> Self {
            Self {
                id: AttributeValue::android(node, "id"),
                label: text_content(node),
            }
        }
    }

    #[test]
    fn test_parse_matching_root() {
        let xml = r#"<widget xmlns:android="http://schemas.android.com/apk/res/android"
    android:id="w1"> Hello </widget>"#;
        let widget = DomManager::parse_str::<Widget>(xml).unwrap().unwrap();
        assert_eq!(widget.id.string_value(), Some("w1"));
        assert_eq!(widget.id.position(), Some(Position { line: 1, column: 1 }));
        assert_eq!(widget.label, "Hello");
    }

    #[test]
    fn test_foreign_root_is_none() {
        assert!(DomManager::parse_str::<Widget>("<gadget/>").unwrap().is_none());
    }

    #[test]
    fn test_malformed_xml_is_error() {
        assert!(matches!(
            DomManager::parse_str::<Widget>("<widget>"),
            Err(DomError::Xml(_))
        ));
    }

    #[test]
    fn test_non_xml_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.txt");
        std::fs::write(&path, "<widget/>").unwrap();

        let file = VirtualFile::find(path).unwrap();
        assert!(DomManager::file_element::<Widget>(&file).unwrap().is_none());
    }
}
