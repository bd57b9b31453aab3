//! Descriptor load failures.
//!
//! Every failure is fatal to the build: there is nothing to retry, so the
//! taxonomy is flat and each variant names the offending field and the
//! constraint it violated.

use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum DescriptorError {
    #[error("failed to read descriptor `{path}`")]
    #[diagnostic(code(kapsel::descriptor::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("descriptor is not valid TOML")]
    #[diagnostic(code(kapsel::descriptor::parse))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("missing required field `{field}`")]
    #[diagnostic(code(kapsel::descriptor::missing_field))]
    MissingField { field: String },

    #[error("`{field}`: `{value}` is not a reverse-DNS package name")]
    #[diagnostic(
        code(kapsel::descriptor::package_name),
        help("use at least two dot-separated segments, each starting with a letter, e.g. `com.example.app`")
    )]
    InvalidApplicationId { field: &'static str, value: String },

    #[error("`application.version-code` must be a positive 32-bit integer, got {value}")]
    #[diagnostic(code(kapsel::descriptor::version_code))]
    InvalidVersionCode { value: i64 },

    #[error(
        "platform versions out of order: `sdk.min` ({min}) <= `sdk.target` ({target}) <= `sdk.compile` ({compile}) must hold"
    )]
    #[diagnostic(code(kapsel::descriptor::version_ordering))]
    InvalidVersionOrdering { min: u32, target: u32, compile: u32 },

    #[error(
        "`java.source-compatibility` ({source_level}) must not exceed `java.target-compatibility` ({target_level})"
    )]
    #[diagnostic(code(kapsel::descriptor::compatibility_ordering))]
    InvalidCompatibilityOrdering { source_level: u32, target_level: u32 },

    #[error("cannot resolve signing for variant `{variant}`: {reason}")]
    #[diagnostic(
        code(kapsel::descriptor::signing),
        help("declare `[signing.<name>]` and bind it with `signing-config` under `[variant.{variant}]`")
    )]
    UnresolvedSigningCredential { variant: String, reason: String },

    #[error("dependency coordinate `{coordinate}` cannot be resolved: {reason}")]
    #[diagnostic(code(kapsel::descriptor::coordinate))]
    UnresolvedDependencyCoordinate { coordinate: String, reason: String },

    #[error("unknown build variant `{name}`")]
    #[diagnostic(
        code(kapsel::descriptor::variant),
        help("supported variants are `debug` and `release`")
    )]
    UnknownBuildVariant { name: String },

    #[error(
        "`java.core-library-desugaring` is enabled but no dependency has purpose `core-library-desugaring`"
    )]
    #[diagnostic(
        code(kapsel::descriptor::desugaring),
        help("declare the desugaring runtime, e.g. `com.android.tools:desugar_jdk_libs:2.1.5`")
    )]
    DesugaringDependencyMissing,

    #[error(
        "dependency `{coordinate}` has purpose `core-library-desugaring` but `java.core-library-desugaring` is disabled"
    )]
    #[diagnostic(code(kapsel::descriptor::desugaring))]
    DesugaringNotEnabled { coordinate: String },
}
