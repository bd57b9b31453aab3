//! The validated descriptor model.
//!
//! Everything in this module is the *output* of a successful load: the types
//! hold already-validated data and are immutable for the duration of a
//! build. Raw on-disk shapes live in the loader.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use kapsel_maven::Coordinate;
use serde::{Deserialize, Serialize};

use crate::secret::Secret;

/// Java language level applied when a descriptor does not pin one.
pub const DEFAULT_JAVA_LEVEL: u32 = 11;

/// A validated packaging descriptor.
///
/// Field paths referenced in error messages (`sdk.min`,
/// `application.version-code`, ...) follow the on-disk TOML layout; see
/// [`Descriptor::fields`] for the same paths on the loaded record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Descriptor {
    pub application: ApplicationIdentity,
    pub sdk: CompileTargets,
    pub java: JavaOptions,
    /// One resolved signing config per build variant.
    pub variants: BTreeMap<BuildVariant, SigningConfig>,
    pub dependencies: Vec<NativeDependency>,
}

impl Descriptor {
    /// The signing config bound to `variant`.
    ///
    /// Validation binds every variant, so this only returns `None` for a
    /// hand-assembled descriptor.
    pub fn signing_for(&self, variant: BuildVariant) -> Option<&SigningConfig> {
        self.variants.get(&variant)
    }
}

/// Who the application is: its published identity and release counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApplicationIdentity {
    /// Reverse-DNS application id. Immutable once the application has been
    /// published under it.
    pub id: String,
    /// Source namespace; defaults to `id` when the descriptor omits it.
    pub namespace: String,
    /// Monotonic release counter.
    pub version_code: u32,
    /// Human-readable version string.
    pub version_name: String,
}

/// Platform API levels the application is built against.
///
/// Invariant: `min <= target <= compile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompileTargets {
    pub min: u32,
    pub target: u32,
    pub compile: u32,
    /// Optional NDK version pin, kept opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ndk: Option<String>,
}

/// Java compile options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct JavaOptions {
    pub source_compatibility: u32,
    pub target_compatibility: u32,
    /// Whether newer `java.*` APIs are backported at packaging time. When
    /// enabled, a dependency with purpose `core-library-desugaring` must
    /// supply the backport runtime.
    pub core_library_desugaring: bool,
}

impl Default for JavaOptions {
    fn default() -> Self {
        Self {
            source_compatibility: DEFAULT_JAVA_LEVEL,
            target_compatibility: DEFAULT_JAVA_LEVEL,
            core_library_desugaring: false,
        }
    }
}

/// The build variants an artifact can be assembled as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildVariant {
    Debug,
    Release,
}

impl BuildVariant {
    pub const ALL: [BuildVariant; 2] = [BuildVariant::Debug, BuildVariant::Release];

    pub fn as_str(self) -> &'static str {
        match self {
            BuildVariant::Debug => "debug",
            BuildVariant::Release => "release",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == name)
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signing identity with its credentials already resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SigningConfig {
    /// The `[signing.<name>]` key this config was declared under.
    pub name: String,
    pub key_alias: String,
    pub key_password: Secret,
    pub store_file: PathBuf,
    pub store_password: Secret,
}

/// A native library bundled into the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct NativeDependency {
    pub coordinate: Coordinate,
    pub purpose: DependencyPurpose,
}

/// What a native dependency is packaged for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyPurpose {
    /// An ordinary dependency shipped in the artifact.
    #[default]
    Runtime,
    /// Supplies the backported `java.*` API runtime.
    CoreLibraryDesugaring,
}

impl DependencyPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            DependencyPurpose::Runtime => "runtime",
            DependencyPurpose::CoreLibraryDesugaring => "core-library-desugaring",
        }
    }
}

/// Whether `s` is acceptable as an application id or namespace: at least two
/// dot-separated segments, each starting with a letter and containing only
/// ASCII letters, digits and underscores.
pub fn is_valid_package_name(s: &str) -> bool {
    let segments: Vec<&str> = s.split('.').collect();
    segments.len() >= 2
        && segments.iter().all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
