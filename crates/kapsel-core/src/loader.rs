//! Reading descriptor files and turning them into validated [`Descriptor`]s.
//!
//! Loading is two-phased: serde gives us the raw on-disk shape with every
//! leaf optional, then validation checks each invariant and reports the
//! first violation with its full field path. The raw shapes never leave
//! this module.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use kapsel_maven::Coordinate;
use miette::NamedSource;
use serde::Deserialize;
use tracing::debug;

use crate::descriptor::{
    is_valid_package_name, ApplicationIdentity, BuildVariant, CompileTargets, DependencyPurpose,
    Descriptor, JavaOptions, NativeDependency, SigningConfig, DEFAULT_JAVA_LEVEL,
};
use crate::error::DescriptorError;
use crate::secret::{EnvSecrets, Secret, SecretSource};

/// Conventional descriptor file name.
pub const DESCRIPTOR_FILE: &str = "kapsel.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RawDescriptor {
    application: Option<RawApplication>,
    sdk: Option<RawSdk>,
    #[serde(default)]
    java: RawJava,
    #[serde(default)]
    signing: BTreeMap<String, RawSigning>,
    #[serde(default)]
    variant: BTreeMap<String, RawVariant>,
    #[serde(default)]
    dependencies: Vec<RawDependency>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RawApplication {
    id: Option<String>,
    namespace: Option<String>,
    version_code: Option<i64>,
    version_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RawSdk {
    min: Option<u32>,
    target: Option<u32>,
    compile: Option<u32>,
    ndk: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RawJava {
    source_compatibility: Option<u32>,
    target_compatibility: Option<u32>,
    core_library_desugaring: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RawSigning {
    key_alias: Option<String>,
    key_password_env: Option<String>,
    store_file: Option<PathBuf>,
    store_password_env: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RawVariant {
    signing_config: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RawDependency {
    coordinate: Option<String>,
    #[serde(default)]
    purpose: DependencyPurpose,
}

impl Descriptor {
    /// Load and validate `path`, resolving signing credentials from the
    /// process environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DescriptorError> {
        Self::load_with(path, &EnvSecrets)
    }

    /// Load and validate `path` with an explicit credential source.
    pub fn load_with(
        path: impl AsRef<Path>,
        secrets: &dyn SecretSource,
    ) -> Result<Self, DescriptorError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading packaging descriptor");
        let text = fs::read_to_string(path).map_err(|source| DescriptorError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string(), secrets)
    }

    /// Parse and validate descriptor text. `origin` names the source in
    /// diagnostics (a file path, `<stdin>`, ...).
    pub fn parse(
        text: &str,
        origin: &str,
        secrets: &dyn SecretSource,
    ) -> Result<Self, DescriptorError> {
        let raw: RawDescriptor = toml::from_str(text).map_err(|err| DescriptorError::Parse {
            src: NamedSource::new(origin, text.to_string()),
            span: err.span().map(Into::into),
            message: err.message().to_string(),
        })?;
        validate(raw, secrets)
    }
}

fn validate(raw: RawDescriptor, secrets: &dyn SecretSource) -> Result<Descriptor, DescriptorError> {
    let application = validate_application(raw.application)?;
    let sdk = validate_sdk(raw.sdk)?;
    let java = validate_java(raw.java)?;
    let dependencies = validate_dependencies(raw.dependencies)?;
    let variants = validate_variants(&raw.variant, &raw.signing, secrets)?;
    check_desugaring(&java, &dependencies)?;
    debug!(
        application = %application.id,
        variants = variants.len(),
        dependencies = dependencies.len(),
        "descriptor validated"
    );
    Ok(Descriptor {
        application,
        sdk,
        java,
        variants,
        dependencies,
    })
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, DescriptorError> {
    value.ok_or_else(|| DescriptorError::MissingField {
        field: field.to_string(),
    })
}

fn require_str(value: Option<String>, field: &str) -> Result<String, DescriptorError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(DescriptorError::MissingField {
            field: field.to_string(),
        }),
    }
}

fn validate_application(
    raw: Option<RawApplication>,
) -> Result<ApplicationIdentity, DescriptorError> {
    let raw = require(raw, "application")?;

    let id = require_str(raw.id, "application.id")?;
    if !is_valid_package_name(&id) {
        return Err(DescriptorError::InvalidApplicationId {
            field: "application.id",
            value: id,
        });
    }

    let namespace = match raw.namespace {
        Some(ns) => {
            if !is_valid_package_name(&ns) {
                return Err(DescriptorError::InvalidApplicationId {
                    field: "application.namespace",
                    value: ns,
                });
            }
            ns
        }
        None => id.clone(),
    };

    let value = require(raw.version_code, "application.version-code")?;
    let version_code = u32::try_from(value)
        .ok()
        .filter(|code| *code > 0)
        .ok_or(DescriptorError::InvalidVersionCode { value })?;

    let version_name = require_str(raw.version_name, "application.version-name")?;

    Ok(ApplicationIdentity {
        id,
        namespace,
        version_code,
        version_name,
    })
}

fn validate_sdk(raw: Option<RawSdk>) -> Result<CompileTargets, DescriptorError> {
    let raw = require(raw, "sdk")?;
    let min = require(raw.min, "sdk.min")?;
    let target = require(raw.target, "sdk.target")?;
    let compile = require(raw.compile, "sdk.compile")?;
    if min > target || target > compile {
        return Err(DescriptorError::InvalidVersionOrdering {
            min,
            target,
            compile,
        });
    }
    Ok(CompileTargets {
        min,
        target,
        compile,
        ndk: raw.ndk,
    })
}

fn validate_java(raw: RawJava) -> Result<JavaOptions, DescriptorError> {
    let source_level = raw.source_compatibility.unwrap_or(DEFAULT_JAVA_LEVEL);
    let target_level = raw.target_compatibility.unwrap_or(DEFAULT_JAVA_LEVEL);
    if source_level > target_level {
        return Err(DescriptorError::InvalidCompatibilityOrdering {
            source_level,
            target_level,
        });
    }
    Ok(JavaOptions {
        source_compatibility: source_level,
        target_compatibility: target_level,
        core_library_desugaring: raw.core_library_desugaring.unwrap_or(false),
    })
}

fn validate_dependencies(
    raw: Vec<RawDependency>,
) -> Result<Vec<NativeDependency>, DescriptorError> {
    raw.into_iter()
        .enumerate()
        .map(|(idx, dep)| {
            let text = require_str(dep.coordinate, &format!("dependencies[{idx}].coordinate"))?;
            let coordinate = text.parse::<Coordinate>().map_err(|err| {
                DescriptorError::UnresolvedDependencyCoordinate {
                    coordinate: text.clone(),
                    reason: err.to_string(),
                }
            })?;
            Ok(NativeDependency {
                coordinate,
                purpose: dep.purpose,
            })
        })
        .collect()
}

fn validate_variants(
    declared: &BTreeMap<String, RawVariant>,
    signing: &BTreeMap<String, RawSigning>,
    secrets: &dyn SecretSource,
) -> Result<BTreeMap<BuildVariant, SigningConfig>, DescriptorError> {
    for name in declared.keys() {
        if BuildVariant::from_name(name).is_none() {
            return Err(DescriptorError::UnknownBuildVariant { name: name.clone() });
        }
    }

    let mut variants = BTreeMap::new();
    for variant in BuildVariant::ALL {
        let raw = declared
            .get(variant.as_str())
            .ok_or_else(|| unresolved(variant, "variant is not declared"))?;
        let config_name = raw
            .signing_config
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| unresolved(variant, "no signing config is bound"))?;
        let raw_config = signing.get(config_name).ok_or_else(|| {
            unresolved(
                variant,
                format!("signing config `{config_name}` is not declared under [signing]"),
            )
        })?;
        let config = resolve_signing(variant, config_name, raw_config, secrets)?;
        variants.insert(variant, config);
    }
    Ok(variants)
}

fn resolve_signing(
    variant: BuildVariant,
    name: &str,
    raw: &RawSigning,
    secrets: &dyn SecretSource,
) -> Result<SigningConfig, DescriptorError> {
    let key_alias = require_str(raw.key_alias.clone(), &format!("signing.{name}.key-alias"))?;
    let store_file = raw
        .store_file
        .clone()
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or_else(|| DescriptorError::MissingField {
            field: format!("signing.{name}.store-file"),
        })?;
    let key_password = resolve_secret(
        variant,
        name,
        "key-password-env",
        raw.key_password_env.as_deref(),
        secrets,
    )?;
    let store_password = resolve_secret(
        variant,
        name,
        "store-password-env",
        raw.store_password_env.as_deref(),
        secrets,
    )?;
    Ok(SigningConfig {
        name: name.to_string(),
        key_alias,
        key_password,
        store_file,
        store_password,
    })
}

fn resolve_secret(
    variant: BuildVariant,
    config: &str,
    field: &str,
    var: Option<&str>,
    secrets: &dyn SecretSource,
) -> Result<Secret, DescriptorError> {
    let var = var
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DescriptorError::MissingField {
            field: format!("signing.{config}.{field}"),
        })?;
    secrets.lookup(var).map(Secret::new).ok_or_else(|| {
        unresolved(
            variant,
            format!("environment variable `{var}` (`signing.{config}.{field}`) is not set"),
        )
    })
}

fn unresolved(variant: BuildVariant, reason: impl Into<String>) -> DescriptorError {
    DescriptorError::UnresolvedSigningCredential {
        variant: variant.to_string(),
        reason: reason.into(),
    }
}

fn check_desugaring(
    java: &JavaOptions,
    dependencies: &[NativeDependency],
) -> Result<(), DescriptorError> {
    let backport = dependencies
        .iter()
        .find(|dep| dep.purpose == DependencyPurpose::CoreLibraryDesugaring);
    match (java.core_library_desugaring, backport) {
        (true, None) => Err(DescriptorError::DesugaringDependencyMissing),
        (false, Some(dep)) => Err(DescriptorError::DesugaringNotEnabled {
            coordinate: dep.coordinate.to_string(),
        }),
        _ => Ok(()),
    }
}
