//! `jsonschema-ts`: compile JSON Schema files into TypeScript declarations.

mod config;

use anyhow::Context;
use clap::Parser;
use config::CliConfig;
use jsonschema_ts::{Settings, compile_from_files};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jsonschema-ts")]
#[command(about = "Compile JSON Schema files into TypeScript declarations")]
#[command(version)]
struct Cli {
    /// Schema files, compiled in order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Write declarations to this file instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Config file (default: ./jsonschema-ts.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Inline simple `$ref` targets instead of declaring each one
    #[arg(long)]
    no_declare_referenced: bool,

    /// Don't end interface properties with `;`
    #[arg(long)]
    no_property_semicolons: bool,

    /// Don't end type aliases with `;`
    #[arg(long)]
    no_type_semicolons: bool,

    /// Emit `enum` instead of `const enum`
    #[arg(long)]
    no_const_enums: bool,

    /// Name `$ref` declarations after their whole pointer path
    #[arg(long)]
    full_reference_names: bool,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Flags only ever switch a setting away from its default.
    fn apply(&self, settings: &mut Settings) {
        if self.no_declare_referenced {
            settings.declare_referenced = false;
        }
        if self.no_property_semicolons {
            settings.end_property_with_semicolon = false;
        }
        if self.no_type_semicolons {
            settings.end_type_with_semicolon = false;
        }
        if self.no_const_enums {
            settings.use_const_enums = false;
        }
        if self.full_reference_names {
            settings.use_full_reference_path_as_name = true;
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to read working directory")?;
    let mut settings = CliConfig::load(cli.config.as_deref(), &cwd)?.settings;
    cli.apply(&mut settings);
    tracing::debug!(?settings, "resolved settings");

    let output = compile_from_files(&cli.inputs, &settings)?;

    match &cli.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, format!("{output}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote declarations");
        }
        None => println!("{output}"),
    }
    Ok(())
}
