//! Android Manifest binding
//!
//! Typed view over the `<manifest>` root element of AndroidManifest.xml.

use serde::Serialize;

use crate::components::{Activity, ManifestElementWithName, Provider, Receiver, Service};
use crate::dom::{child_elements, AttributeValue, DomElement};
use crate::schema::{self, ClassHierarchy, DomProblem, ElementSchema, SchemaElement};

/// `<uses-permission>` element
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsesPermission {
    pub name: AttributeValue,
    pub max_sdk_version: AttributeValue,
}

impl SchemaElement for UsesPermission {
    fn schema(&self) -> &'static ElementSchema {
        &schema::USES_PERMISSION
    }

    fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        match name {
            "name" => Some(&self.name),
            "maxSdkVersion" => Some(&self.max_sdk_version),
            _ => None,
        }
    }
}

/// `<uses-sdk>` element
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsesSdk {
    pub min_sdk_version: AttributeValue,
    pub target_sdk_version: AttributeValue,
}

/// `<application>` element
#[derive(Debug, Clone, Default, Serialize)]
pub struct Application {
    /// Application class name
    pub name: AttributeValue,
    /// Application label (@string/app_name or literal)
    pub label: AttributeValue,
    /// Icon resource
    pub icon: AttributeValue,
    pub theme: AttributeValue,
    pub activities: Vec<Activity>,
    pub services: Vec<Service>,
    pub receivers: Vec<Receiver>,
    pub providers: Vec<Provider>,
}

impl Application {
    fn from_node(node: roxmltree::Node) -> Self {
        Self {
            name: AttributeValue::android(node, "name"),
            label: AttributeValue::android(node, "label"),
            icon: AttributeValue::android(node, "icon"),
            theme: AttributeValue::android(node, "theme"),
            activities: child_elements(node, "activity").map(Activity::from_node).collect(),
            services: child_elements(node, "service").map(Service::from_node).collect(),
            receivers: child_elements(node, "receiver").map(Receiver::from_node).collect(),
            providers: child_elements(node, "provider").map(Provider::from_node).collect(),
        }
    }
}

/// Root `<manifest>` element
#[derive(Debug, Clone, Default, Serialize)]
pub struct Manifest {
    /// Package name (e.g., "com.example.app")
    pub package: AttributeValue,
    pub version_code: AttributeValue,
    pub version_name: AttributeValue,
    pub uses_sdk: Option<UsesSdk>,
    pub uses_permissions: Vec<UsesPermission>,
    pub application: Option<Application>,
}

impl DomElement for Manifest {
    const ROOT_TAG: &'static str = "manifest";

    fn from_node(node: roxmltree::Node) -> Self {
        Self {
            package: AttributeValue::plain(node, "package"),
            version_code: AttributeValue::android(node, "versionCode"),
            version_name: AttributeValue::android(node, "versionName"),
            uses_sdk: child_elements(node, "uses-sdk").next().map(|n| UsesSdk {
                min_sdk_version: AttributeValue::android(n, "minSdkVersion"),
                target_sdk_version: AttributeValue::android(n, "targetSdkVersion"),
            }),
            uses_permissions: child_elements(node, "uses-permission")
                .map(|n| UsesPermission {
                    name: AttributeValue::android(n, "name"),
                    max_sdk_version: AttributeValue::android(n, "maxSdkVersion"),
                })
                .collect(),
            application: child_elements(node, "application").next().map(Application::from_node),
        }
    }
}

impl Manifest {
    /// Package name, empty when undeclared
    pub fn package_name(&self) -> &str {
        self.package.string_value().unwrap_or_default()
    }

    /// Check if permission is declared
    pub fn has_permission(&self, permission: &str) -> bool {
        self.uses_permissions
            .iter()
            .any(|p| p.name.string_value() == Some(permission))
    }

    /// Get the main activity
    pub fn main_activity(&self) -> Option<&Activity> {
        self.application.as_ref()?.activities.iter().find(|a| a.is_launcher())
    }

    /// Get all component class names, qualified with the manifest package
    pub fn all_component_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let package = self.package_name();

        if let Some(ref app) = self.application {
            let components = app.activities.iter().map(|c| ("Activity", c.class_name(package)))
                .chain(app.services.iter().map(|c| ("Service", c.class_name(package))))
                .chain(app.receivers.iter().map(|c| ("Receiver", c.class_name(package))))
                .chain(app.providers.iter().map(|c| ("Provider", c.class_name(package))));

            for (kind, name) in components {
                if let Some(name) = name {
                    names.push(format!("{}: {}", kind, name));
                }
            }
        }

        names
    }

    /// Validate every schema-bound element of the manifest.
    ///
    /// Class constraints are checked only when a hierarchy is supplied.
    pub fn validate(&self, hierarchy: Option<&dyn ClassHierarchy>) -> Vec<DomProblem> {
        let mut problems = Vec::new();
        let package = self.package_name();

        for permission in &self.uses_permissions {
            permission.validate(package, hierarchy, &mut problems);
        }

        if let Some(ref app) = self.application {
            let elements = app.activities.iter().map(|e| e as &dyn SchemaElement)
                .chain(app.services.iter().map(|e| e as &dyn SchemaElement))
                .chain(app.receivers.iter().map(|e| e as &dyn SchemaElement))
                .chain(app.providers.iter().map(|e| e as &dyn SchemaElement));

            for element in elements {
                element.validate(package, hierarchy, &mut problems);
            }
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DomManager;
    use crate::schema::{ProblemSeverity, StaticClassHierarchy};

    const SAMPLE_MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android"
    package="com.example.app"
    android:versionCode="1"
    android:versionName="1.0">

    <uses-sdk android:minSdkVersion="3"/>
    <uses-permission android:name="android.permission.INTERNET"/>

    <application android:label="@string/app_name" android:icon="@drawable/icon">
        <activity android:name=".MainActivity">
            <intent-filter>
                <action android:name="android.intent.action.MAIN"/>
                <category android:name="android.intent.category.LAUNCHER"/>
            </intent-filter>
        </activity>
        <receiver android:name=".BootReceiver"/>
        <receiver android:exported="false"/>
        <provider android:name="com.example.app.NotesProvider"/>
    </application>
</manifest>"#;

    fn manifest() -> Manifest {
        DomManager::parse_str::<Manifest>(SAMPLE_MANIFEST).unwrap().unwrap()
    }

    #[test]
    fn test_parse_manifest() {
        let manifest = manifest();

        assert_eq!(manifest.package_name(), "com.example.app");
        assert_eq!(manifest.version_code.u32_value(), Some(1));
        assert_eq!(manifest.uses_sdk.as_ref().unwrap().min_sdk_version.u32_value(), Some(3));
        assert!(manifest.has_permission("android.permission.INTERNET"));

        let app = manifest.application.as_ref().unwrap();
        assert_eq!(app.receivers.len(), 2);
        assert_eq!(app.icon.string_value(), Some("@drawable/icon"));

        let main = manifest.main_activity().unwrap();
        assert_eq!(main.class_name("com.example.app").as_deref(), Some("com.example.app.MainActivity"));
    }

    #[test]
    fn test_component_names() {
        assert_eq!(
            manifest().all_component_names(),
            vec![
                "Activity: com.example.app.MainActivity",
                "Receiver: com.example.app.BootReceiver",
                "Provider: com.example.app.NotesProvider",
            ]
        );
    }

    #[test]
    fn test_validate_required_attributes() {
        let problems = manifest().validate(None);

        assert_eq!(problems.len(), 2);
        assert!(problems.iter().all(|p| p.severity == ProblemSeverity::Error));
        assert_eq!((problems[0].element, problems[0].attribute), ("receiver", "name"));
        assert_eq!((problems[1].element, problems[1].attribute), ("provider", "authorities"));
        assert_eq!(problems[0].position.map(|p| p.line), Some(18));
    }

    #[test]
    fn test_validate_receiver_base_class() {
        let hierarchy = StaticClassHierarchy::new()
            .with_class("android.app.Activity", None)
            .with_class("android.content.IntentReceiver", None)
            .with_class("android.content.ContentProvider", None)
            .with_class("com.example.app.MainActivity", Some("android.app.Activity"))
            .with_class("com.example.app.BootReceiver", Some("android.app.Activity"))
            .with_class("com.example.app.NotesProvider", Some("android.content.ContentProvider"));

        let problems = manifest().validate(Some(&hierarchy));
        let receiver: Vec<&DomProblem> = problems
            .iter()
            .filter(|p| p.element == "receiver")
            .collect();

        assert_eq!(receiver.len(), 2);
        assert_eq!(
            receiver[0].message,
            "com.example.app.BootReceiver is not assignable to android.content.IntentReceiver"
        );
        assert!(receiver[1].message.contains("required"));
    }
}
