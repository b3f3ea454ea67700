//! Android Component Types
//!
//! Activity, Service, BroadcastReceiver, and ContentProvider bindings.

use serde::Serialize;

use crate::dom::{child_elements, AttributeValue};
use crate::schema::{self, resolve_package_class, ElementSchema, SchemaElement};

/// Manifest elements identified by an `android:name` class attribute
pub trait ManifestElementWithName {
    fn name(&self) -> &AttributeValue;

    /// Fully qualified class name, relative names resolved against `package`
    fn class_name(&self, package: &str) -> Option<String> {
        self.name()
            .string_value()
            .filter(|n| !n.trim().is_empty())
            .map(|n| resolve_package_class(package, n))
    }
}

/// `<intent-filter>` contents
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntentFilter {
    pub actions: Vec<String>,
    pub categories: Vec<String>,
}

impl IntentFilter {
    fn from_node(node: roxmltree::Node) -> Self {
        let names = |tag: &'static str| -> Vec<String> {
            child_elements(node, tag)
                .filter_map(|n| AttributeValue::android(n, "name").string_value().map(str::to_string))
                .collect()
        };
        Self {
            actions: names("action"),
            categories: names("category"),
        }
    }

    /// MAIN action with LAUNCHER category
    pub fn is_launcher(&self) -> bool {
        self.actions.iter().any(|a| a == "android.intent.action.MAIN")
            && self.categories.iter().any(|c| c == "android.intent.category.LAUNCHER")
    }
}

fn intent_filters(node: roxmltree::Node) -> Vec<IntentFilter> {
    child_elements(node, "intent-filter")
        .map(IntentFilter::from_node)
        .collect()
}

/// Activity component
#[derive(Debug, Clone, Default, Serialize)]
pub struct Activity {
    /// Class name (.MainActivity or full package.Class)
    pub name: AttributeValue,
    pub label: AttributeValue,
    pub exported: AttributeValue,
    pub intent_filters: Vec<IntentFilter>,
}

impl Activity {
    pub(crate) fn from_node(node: roxmltree::Node) -> Self {
        Self {
            name: AttributeValue::android(node, "name"),
            label: AttributeValue::android(node, "label"),
            exported: AttributeValue::android(node, "exported"),
            intent_filters: intent_filters(node),
        }
    }

    /// Check if this is the main launcher activity
    pub fn is_launcher(&self) -> bool {
        self.intent_filters.iter().any(IntentFilter::is_launcher)
    }
}

/// Service component
#[derive(Debug, Clone, Default, Serialize)]
pub struct Service {
    pub name: AttributeValue,
    pub exported: AttributeValue,
    pub intent_filters: Vec<IntentFilter>,
}

impl Service {
    pub(crate) fn from_node(node: roxmltree::Node) -> Self {
        Self {
            name: AttributeValue::android(node, "name"),
            exported: AttributeValue::android(node, "exported"),
            intent_filters: intent_filters(node),
        }
    }
}

/// Broadcast Receiver component.
///
/// `android:name` is required and must name a class extending
/// `android.content.IntentReceiver`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Receiver {
    pub name: AttributeValue,
    pub exported: AttributeValue,
    pub intent_filters: Vec<IntentFilter>,
}

impl Receiver {
    pub(crate) fn from_node(node: roxmltree::Node) -> Self {
        Self {
            name: AttributeValue::android(node, "name"),
            exported: AttributeValue::android(node, "exported"),
            intent_filters: intent_filters(node),
        }
    }

    /// The receiver class attribute
    pub fn receiver_class(&self) -> &AttributeValue {
        &self.name
    }
}

/// Content Provider component
#[derive(Debug, Clone, Default, Serialize)]
pub struct Provider {
    pub name: AttributeValue,
    /// Authorities (unique identifier)
    pub authorities: AttributeValue,
    pub exported: AttributeValue,
}

impl Provider {
    pub(crate) fn from_node(node: roxmltree::Node) -> Self {
        Self {
            name: AttributeValue::android(node, "name"),
            authorities: AttributeValue::android(node, "authorities"),
            exported: AttributeValue::android(node, "exported"),
        }
    }
}

macro_rules! named_component {
    ($ty:ty, $schema:expr, { $($attr:literal => $field:ident),* }) => {
        impl ManifestElementWithName for $ty {
            fn name(&self) -> &AttributeValue {
                &self.name
            }
        }

        impl SchemaElement for $ty {
            fn schema(&self) -> &'static ElementSchema {
                &$schema
            }

            fn attribute(&self, name: &str) -> Option<&AttributeValue> {
                match name {
                    "name" => Some(&self.name),
                    $($attr => Some(&self.$field),)*
                    _ => None,
                }
            }
        }
    };
}

named_component!(Activity, schema::ACTIVITY, { "label" => label, "exported" => exported });
named_component!(Service, schema::SERVICE, { "exported" => exported });
named_component!(Receiver, schema::RECEIVER, { "exported" => exported });
named_component!(Provider, schema::PROVIDER, { "authorities" => authorities, "exported" => exported });
