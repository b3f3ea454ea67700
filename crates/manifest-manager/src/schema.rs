//! Manifest element schemas
//!
//! Static attribute tables per manifest element: which attributes are
//! required, how class names are converted, and which base class a named
//! component must extend. Validation walks a bound element against its table.

use std::collections::HashMap;
use serde::Serialize;

use crate::dom::{AttributeValue, Position};

/// How an attribute's text is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    /// Plain string
    Text,
    /// Class name, possibly relative to the manifest package
    PackageClass,
}

/// One attribute of an element schema
#[derive(Debug, Clone, Copy)]
pub struct AttributeSchema {
    /// Local name, always in the android namespace
    pub name: &'static str,
    pub required: bool,
    pub converter: Converter,
    /// Base class the referenced class must extend
    pub extends: Option<&'static str>,
}

/// Attribute table of a manifest element
#[derive(Debug, Clone, Copy)]
pub struct ElementSchema {
    pub tag: &'static str,
    pub attributes: &'static [AttributeSchema],
}

const fn class_name(extends: &'static str) -> AttributeSchema {
    AttributeSchema {
        name: "name",
        required: true,
        converter: Converter::PackageClass,
        extends: Some(extends),
    }
}

pub static ACTIVITY: ElementSchema = ElementSchema {
    tag: "activity",
    attributes: &[class_name("android.app.Activity")],
};

pub static SERVICE: ElementSchema = ElementSchema {
    tag: "service",
    attributes: &[class_name("android.app.Service")],
};

pub static RECEIVER: ElementSchema = ElementSchema {
    tag: "receiver",
    attributes: &[class_name("android.content.IntentReceiver")],
};

pub static PROVIDER: ElementSchema = ElementSchema {
    tag: "provider",
    attributes: &[
        class_name("android.content.ContentProvider"),
        AttributeSchema {
            name: "authorities",
            required: true,
            converter: Converter::Text,
            extends: None,
        },
    ],
};

pub static USES_PERMISSION: ElementSchema = ElementSchema {
    tag: "uses-permission",
    attributes: &[AttributeSchema {
        name: "name",
        required: true,
        converter: Converter::Text,
        extends: None,
    }],
};

/// Look up the schema of a manifest element by tag
pub fn schema_for(tag: &str) -> Option<&'static ElementSchema> {
    [&ACTIVITY, &SERVICE, &RECEIVER, &PROVIDER, &USES_PERMISSION]
        .into_iter()
        .find(|s| s.tag == tag)
}

/// Qualify a class name against the manifest package.
///
/// `.Foo` and `Foo` become `<package>.Foo`; dotted names are kept.
pub fn resolve_package_class(package: &str, name: &str) -> String {
    let name = name.trim();
    if let Some(relative) = name.strip_prefix('.') {
        format!("{}.{}", package, relative)
    } else if name.contains('.') || package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}

/// Class lookups needed to check `extends` constraints
pub trait ClassHierarchy {
    /// Whether the class is known at all
    fn contains(&self, class: &str) -> bool;

    /// Whether `class` is `base` or inherits from it
    fn is_inheritor(&self, class: &str, base: &str) -> bool;
}

/// Class hierarchy backed by a class -> superclass map
#[derive(Debug, Clone, Default)]
pub struct StaticClassHierarchy {
    supers: HashMap<String, Option<String>>,
}

impl StaticClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class and its direct superclass
    pub fn with_class(mut self, class: &str, superclass: Option<&str>) -> Self {
        self.supers
            .insert(class.to_string(), superclass.map(str::to_string));
        self
    }
}

impl ClassHierarchy for StaticClassHierarchy {
    fn contains(&self, class: &str) -> bool {
        self.supers.contains_key(class)
    }

    fn is_inheritor(&self, class: &str, base: &str) -> bool {
        let mut current = Some(class.to_string());
        let mut steps = 0;
        while let Some(name) = current {
            if name == base {
                return true;
            }
            // guards against cyclic registrations
            steps += 1;
            if steps > self.supers.len() {
                return false;
            }
            current = self.supers.get(&name).cloned().flatten();
        }
        false
    }
}

/// Severity of a schema problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProblemSeverity {
    Warning,
    Error,
}

/// A schema violation found on a bound element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomProblem {
    pub severity: ProblemSeverity,
    pub element: &'static str,
    pub attribute: &'static str,
    pub message: String,
    pub position: Option<Position>,
}

/// An element that can be checked against its schema
pub trait SchemaElement {
    fn schema(&self) -> &'static ElementSchema;

    /// Value of the named android attribute, if the binding exposes it
    fn attribute(&self, name: &str) -> Option<&AttributeValue>;

    /// Check required attributes and class constraints
    fn validate(
        &self,
        package: &str,
        hierarchy: Option<&dyn ClassHierarchy>,
        problems: &mut Vec<DomProblem>,
    ) {
        let schema = self.schema();
        for attr in schema.attributes {
            let value = self.attribute(attr.name);
            let problem = |severity, message: String| DomProblem {
                severity,
                element: schema.tag,
                attribute: attr.name,
                message,
                position: value.and_then(AttributeValue::position),
            };

            let text = match value.filter(|v| v.is_set()).and_then(AttributeValue::string_value) {
                Some(text) => text,
                None => {
                    if attr.required {
                        problems.push(problem(
                            ProblemSeverity::Error,
                            format!("Attribute android:{} is required on <{}>", attr.name, schema.tag),
                        ));
                    }
                    continue;
                }
            };

            let (Converter::PackageClass, Some(base), Some(hierarchy)) =
                (attr.converter, attr.extends, hierarchy)
            else {
                continue;
            };

            let class = resolve_package_class(package, text);
            if !hierarchy.contains(&class) {
                problems.push(problem(
                    ProblemSeverity::Warning,
                    format!("Cannot resolve class {}", class),
                ));
            } else if !hierarchy.is_inheritor(&class, base) {
                problems.push(problem(
                    ProblemSeverity::Error,
                    format!("{} is not assignable to {}", class, base),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_package_class() {
        assert_eq!(resolve_package_class("com.example", ".Boot"), "com.example.Boot");
        assert_eq!(resolve_package_class("com.example", "Boot"), "com.example.Boot");
        assert_eq!(resolve_package_class("com.example", "org.other.Boot"), "org.other.Boot");
        assert_eq!(resolve_package_class("", "Boot"), "Boot");
    }

    #[test]
    fn test_schema_lookup() {
        let receiver = schema_for("receiver").unwrap();
        assert_eq!(receiver.attributes[0].extends, Some("android.content.IntentReceiver"));
        assert!(receiver.attributes[0].required);
        assert!(schema_for("application").is_none());
    }

    #[test]
    fn test_hierarchy_walks_superclasses() {
        let hierarchy = StaticClassHierarchy::new()
            .with_class("android.content.IntentReceiver", None)
            .with_class("com.example.Base", Some("android.content.IntentReceiver"))
            .with_class("com.example.Boot", Some("com.example.Base"))
            .with_class("com.example.Loop", Some("com.example.Loop"));

        assert!(hierarchy.is_inheritor("com.example.Boot", "android.content.IntentReceiver"));
        assert!(!hierarchy.is_inheritor("com.example.Base", "com.example.Boot"));
        assert!(!hierarchy.is_inheritor("com.example.Loop", "android.content.IntentReceiver"));
    }
}
