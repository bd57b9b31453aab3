//! Packaging descriptor model and loader for Android-style application builds.
//!
//! A descriptor (`kapsel.toml` by convention) declares everything the
//! package-assembly step needs to know about an application: its identity,
//! the platform API levels it compiles against, Java compile options, one
//! signing config per build variant, and the native dependencies bundled
//! into the artifact.
//!
//! The descriptor is read once per build invocation, validated as a whole,
//! and handed to the build tool as an immutable record. Loading is
//! side-effect free; loading the same file twice yields equal descriptors.
//!
//! ```no_run
//! use kapsel_core::Descriptor;
//!
//! let descriptor = Descriptor::load("kapsel.toml")?;
//! assert!(descriptor.sdk.min <= descriptor.sdk.target);
//! # Ok::<(), kapsel_core::DescriptorError>(())
//! ```
//!
//! Signing credentials are never written into the descriptor itself. The
//! file names environment variables, and [`Descriptor::load`] resolves them
//! through a [`SecretSource`] at load time.

pub mod descriptor;
pub mod error;
mod fields;
mod loader;
pub mod secret;

pub use descriptor::{
    is_valid_package_name, ApplicationIdentity, BuildVariant, CompileTargets, DependencyPurpose,
    Descriptor, JavaOptions, NativeDependency, SigningConfig, DEFAULT_JAVA_LEVEL,
};
pub use error::DescriptorError;
pub use loader::DESCRIPTOR_FILE;
pub use secret::{EnvSecrets, Secret, SecretSource};
