//! `kapsel`: inspect, validate and scaffold packaging descriptors.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use console::style;
use kapsel_core::{is_valid_package_name, Descriptor, DESCRIPTOR_FILE};
use miette::{miette, IntoDiagnostic, Result};
use toml_edit::{value, DocumentMut};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "kapsel",
    version,
    about = "Packaging descriptor tool for Android application builds"
)]
struct Cli {
    /// Path to the descriptor file
    #[arg(
        short,
        long,
        global = true,
        default_value = DESCRIPTOR_FILE,
        env = "KAPSEL_DESCRIPTOR"
    )]
    descriptor: PathBuf,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the descriptor and report whether it is valid
    Validate,
    /// Print the validated descriptor
    Show {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print a single descriptor field by dotted path, e.g. `sdk.min`
    Get { field: String },
    /// Write a starter descriptor
    Init {
        /// Application id to scaffold with
        #[arg(long, default_value = "com.example.app")]
        id: String,
        /// Overwrite an existing descriptor
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Validate => validate(&cli.descriptor),
        Command::Show { format } => show(&cli.descriptor, format),
        Command::Get { field } => get(&cli.descriptor, &field),
        Command::Init { id, force } => init(&cli.descriptor, &id, force),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("KAPSEL_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn validate(path: &Path) -> Result<()> {
    let descriptor = Descriptor::load(path)?;
    println!(
        "{} {} v{} ({} dependencies)",
        style("valid").green().bold(),
        descriptor.application.id,
        descriptor.application.version_name,
        descriptor.dependencies.len()
    );
    Ok(())
}

fn show(path: &Path, format: Format) -> Result<()> {
    let descriptor = Descriptor::load(path)?;
    match format {
        Format::Text => {
            for (field, value) in descriptor.fields() {
                println!("{field} = {value}");
            }
        }
        Format::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&descriptor).into_diagnostic()?
            );
        }
    }
    Ok(())
}

fn get(path: &Path, field: &str) -> Result<()> {
    let descriptor = Descriptor::load(path)?;
    match descriptor.field(field) {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => Err(miette!(
            code = "kapsel::cli::unknown_field",
            help = "run `kapsel show` to list readable fields",
            "descriptor has no field `{field}`"
        )),
    }
}

const TEMPLATE: &str = r#"# Packaging descriptor. Credentials are never stored here; the descriptor
# names environment variables and they are resolved at load time.

[application]
id = "com.example.app"
version-code = 1
version-name = "0.1.0"

[sdk]
min = 24
target = 34
compile = 34

[java]
source-compatibility = 11
target-compatibility = 11
core-library-desugaring = true

[signing.upload]
key-alias = "upload"
key-password-env = "KAPSEL_UPLOAD_KEY_PASSWORD"
store-file = "keys/upload.jks"
store-password-env = "KAPSEL_UPLOAD_STORE_PASSWORD"

[variant.debug]
signing-config = "upload"

[variant.release]
signing-config = "upload"

[[dependencies]]
coordinate = "com.android.tools:desugar_jdk_libs:2.1.5"
purpose = "core-library-desugaring"
"#;

fn init(path: &Path, id: &str, force: bool) -> Result<()> {
    if !is_valid_package_name(id) {
        return Err(miette!(
            code = "kapsel::cli::application_id",
            help = "use at least two dot-separated segments, e.g. `com.example.app`",
            "`{id}` is not a reverse-DNS application id"
        ));
    }
    if path.exists() && !force {
        return Err(miette!(
            code = "kapsel::cli::exists",
            "`{}` already exists (pass --force to overwrite)",
            path.display()
        ));
    }

    let mut doc: DocumentMut = TEMPLATE.parse().into_diagnostic()?;
    doc["application"]["id"] = value(id);
    debug!(path = %path.display(), id, "writing starter descriptor");
    fs::write(path, doc.to_string()).into_diagnostic()?;
    println!("{} {}", style("created").green().bold(), path.display());
    Ok(())
}
