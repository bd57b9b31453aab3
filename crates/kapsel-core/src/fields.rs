//! Field-by-name access.
//!
//! Build tools consume the descriptor field by field. Paths are dotted and
//! mirror the on-disk layout (`application.id`, `sdk.min`,
//! `variant.release.key-alias`, `dependencies[0].coordinate`). Signing
//! secrets are not exposed here.

use crate::descriptor::Descriptor;

impl Descriptor {
    /// Every readable field as a `(path, rendered value)` pair, in a stable
    /// order.
    pub fn fields(&self) -> Vec<(String, String)> {
        let mut out = vec![
            ("application.id".into(), self.application.id.clone()),
            (
                "application.namespace".into(),
                self.application.namespace.clone(),
            ),
            (
                "application.version-code".into(),
                self.application.version_code.to_string(),
            ),
            (
                "application.version-name".into(),
                self.application.version_name.clone(),
            ),
            ("sdk.min".into(), self.sdk.min.to_string()),
            ("sdk.target".into(), self.sdk.target.to_string()),
            ("sdk.compile".into(), self.sdk.compile.to_string()),
        ];
        if let Some(ndk) = &self.sdk.ndk {
            out.push(("sdk.ndk".into(), ndk.clone()));
        }
        out.push((
            "java.source-compatibility".into(),
            self.java.source_compatibility.to_string(),
        ));
        out.push((
            "java.target-compatibility".into(),
            self.java.target_compatibility.to_string(),
        ));
        out.push((
            "java.core-library-desugaring".into(),
            self.java.core_library_desugaring.to_string(),
        ));
        for (variant, config) in &self.variants {
            out.push((format!("variant.{variant}.signing-config"), config.name.clone()));
            out.push((format!("variant.{variant}.key-alias"), config.key_alias.clone()));
            out.push((
                format!("variant.{variant}.store-file"),
                config.store_file.display().to_string(),
            ));
        }
        for (idx, dep) in self.dependencies.iter().enumerate() {
            out.push((format!("dependencies[{idx}].coordinate"), dep.coordinate.to_string()));
            out.push((format!("dependencies[{idx}].purpose"), dep.purpose.as_str().to_string()));
        }
        out
    }

    /// Read one field by dotted path.
    pub fn field(&self, path: &str) -> Option<String> {
        self.fields()
            .into_iter()
            .find_map(|(name, value)| (name == path).then_some(value))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::descriptor::Descriptor;

    const DESCRIPTOR: &str = r#"
[application]
id = "com.example.app"
version-code = 3
version-name = "0.9.0"

[sdk]
min = 24
target = 34
compile = 34
ndk = "27.0.12077973"

[signing.debug-key]
key-alias = "androiddebugkey"
key-password-env = "DEBUG_KEY_PASSWORD"
store-file = "debug.jks"
store-password-env = "DEBUG_STORE_PASSWORD"

[variant.debug]
signing-config = "debug-key"

[variant.release]
signing-config = "debug-key"

[[dependencies]]
coordinate = "io.grpc:grpc-okhttp:1.62.2"
"#;

    fn load() -> Descriptor {
        let secrets: HashMap<String, String> = [
            ("DEBUG_KEY_PASSWORD".to_string(), "a".to_string()),
            ("DEBUG_STORE_PASSWORD".to_string(), "b".to_string()),
        ]
        .into();
        Descriptor::parse(DESCRIPTOR, "kapsel.toml", &secrets).unwrap()
    }

    #[test]
    fn reads_fields_by_dotted_path() {
        let descriptor = load();
        assert_eq!(descriptor.field("application.id").as_deref(), Some("com.example.app"));
        assert_eq!(descriptor.field("sdk.min").as_deref(), Some("24"));
        assert_eq!(descriptor.field("sdk.ndk").as_deref(), Some("27.0.12077973"));
        assert_eq!(
            descriptor.field("variant.release.key-alias").as_deref(),
            Some("androiddebugkey")
        );
        assert_eq!(
            descriptor.field("dependencies[0].coordinate").as_deref(),
            Some("io.grpc:grpc-okhttp:1.62.2")
        );
        assert_eq!(descriptor.field("no.such.field"), None);
    }

    #[test]
    fn fields_never_contain_secrets() {
        let descriptor = load();
        for (path, _) in descriptor.fields() {
            assert!(!path.contains("password"), "`{path}` should not be exposed");
        }
    }
}
