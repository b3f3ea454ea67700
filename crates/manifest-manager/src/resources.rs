//! Values resource binding
//!
//! Typed view over a `res/values/*.xml` file: `<resources>` with its
//! strings, drawables, colors and styles.

use std::fmt;
use std::str::FromStr;
use serde::Serialize;

use crate::dom::{child_elements, text_content, AttributeValue, DomElement};

/// Resource categories that values files can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceType {
    String,
    Drawable,
    Color,
    Style,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::String,
        ResourceType::Drawable,
        ResourceType::Color,
        ResourceType::Style,
    ];

    /// Tag name inside `<resources>`, also the resource type name
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::String => "string",
            ResourceType::Drawable => "drawable",
            ResourceType::Color => "color",
            ResourceType::Style => "style",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown resource type name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource type: {0}")]
pub struct UnknownResourceType(pub String);

impl FromStr for ResourceType {
    type Err = UnknownResourceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownResourceType(s.to_string()))
    }
}

/// `<item>` inside a `<style>`
#[derive(Debug, Clone, Default, Serialize)]
pub struct StyleItem {
    pub name: AttributeValue,
    pub value: String,
}

/// One declared resource
#[derive(Debug, Clone, Serialize)]
pub struct ResourceElement {
    pub resource_type: ResourceType,
    pub name: AttributeValue,
    /// Text content; empty for styles
    pub value: String,
    /// Parent style, styles only
    pub parent: AttributeValue,
    /// Style items, styles only
    pub items: Vec<StyleItem>,
}

impl ResourceElement {
    fn from_node(resource_type: ResourceType, node: roxmltree::Node) -> Self {
        let items: Vec<StyleItem> = child_elements(node, "item")
            .map(|item| StyleItem {
                name: AttributeValue::plain(item, "name"),
                value: text_content(item),
            })
            .collect();

        let value = if resource_type == ResourceType::Style {
            String::new()
        } else {
            text_content(node)
        };

        Self {
            resource_type,
            name: AttributeValue::plain(node, "name"),
            value,
            parent: AttributeValue::plain(node, "parent"),
            items,
        }
    }

    /// Resource name, empty when undeclared
    pub fn name(&self) -> &str {
        self.name.string_value().unwrap_or_default()
    }
}

/// Root `<resources>` element of a values file
#[derive(Debug, Clone, Default, Serialize)]
pub struct Resources {
    pub strings: Vec<ResourceElement>,
    pub drawables: Vec<ResourceElement>,
    pub colors: Vec<ResourceElement>,
    pub styles: Vec<ResourceElement>,
}

impl DomElement for Resources {
    const ROOT_TAG: &'static str = "resources";

    fn from_node(node: roxmltree::Node) -> Self {
        let collect = |t: ResourceType| -> Vec<ResourceElement> {
            child_elements(node, t.as_str())
                .map(|n| ResourceElement::from_node(t, n))
                .collect()
        };

        Self {
            strings: collect(ResourceType::String),
            drawables: collect(ResourceType::Drawable),
            colors: collect(ResourceType::Color),
            styles: collect(ResourceType::Style),
        }
    }
}

impl Resources {
    /// Declared resources of one category
    pub fn of_type(&self, resource_type: ResourceType) -> &[ResourceElement] {
        match resource_type {
            ResourceType::String => &self.strings,
            ResourceType::Drawable => &self.drawables,
            ResourceType::Color => &self.colors,
            ResourceType::Style => &self.styles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DomManager;

    const VALUES: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="app_name">Notes</string>
    <string name="greeting">Hello, <b>world</b></string>
    <color name="accent">#FF4081</color>
    <drawable name="screen_background">#ffffff</drawable>
    <style name="Theme.Notes" parent="android:Theme.Light">
        <item name="android:windowNoTitle">true</item>
    </style>
</resources>"#;

    #[test]
    fn test_parse_values_file() {
        let resources = DomManager::parse_str::<Resources>(VALUES).unwrap().unwrap();

        assert_eq!(resources.strings.len(), 2);
        assert_eq!(resources.strings[0].name(), "app_name");
        assert_eq!(resources.strings[1].value, "Hello, world");
        assert_eq!(resources.of_type(ResourceType::Color)[0].value, "#FF4081");
        assert_eq!(resources.drawables[0].name(), "screen_background");

        let style = &resources.styles[0];
        assert_eq!(style.parent.string_value(), Some("android:Theme.Light"));
        assert_eq!(style.items[0].value, "true");
        assert!(style.value.is_empty());
    }

    #[test]
    fn test_resource_type_names() {
        assert_eq!("style".parse::<ResourceType>(), Ok(ResourceType::Style));
        assert!("layout".parse::<ResourceType>().is_err());
        assert_eq!(ResourceType::Drawable.to_string(), "drawable");
    }
}
