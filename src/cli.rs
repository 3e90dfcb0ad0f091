//! Command-line interface implementation for tstmpl.
//! Provides argument parsing and help text formatting using clap.

use crate::config::{Config, OutputMode, VerbatimPolicy};
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments structure for tstmpl.
#[derive(Parser, Debug)]
#[command(author, version, about = "tstmpl: turn a project tree into templates and back", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a project tree into a manifest or TypeScript modules
    Extract(ExtractArgs),
    /// Recreate a project tree from a manifest
    Materialize(MaterializeArgs),
}

#[derive(clap::Args, Debug)]
pub struct ExtractArgs {
    /// Output directory, relative to the project root [default: .ts-tmpl]
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Project root to extract
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Output mode
    #[arg(short, long, value_enum)]
    pub mode: Option<OutputMode>,

    /// Write the manifest here instead of OUTPUT_DIR/manifest.json
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Ignore file, relative to the project root [default: .gitignore]
    #[arg(long, value_name = "PATH")]
    pub ignore_file: Option<PathBuf>,

    /// Additional exclusion pattern (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Additional extension to copy verbatim instead of templating (repeatable)
    #[arg(long = "verbatim-ext", value_name = "EXT")]
    pub verbatim_ext: Vec<String>,

    /// Leave verbatim files out instead of copying them
    #[arg(long)]
    pub skip_verbatim: bool,

    /// Replace an existing output directory without asking
    #[arg(short, long)]
    pub force: bool,
}

impl ExtractArgs {
    /// Overrides project configuration values with the ones given on the
    /// command line.
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(ignore_file) = &self.ignore_file {
            config.ignore_file = ignore_file.clone();
        }
        config.exclude.extend(self.exclude.iter().cloned());
        config.verbatim_extensions.extend(self.verbatim_ext.iter().cloned());
        if self.skip_verbatim {
            config.verbatim = VerbatimPolicy::Skip;
        }
        config
    }
}

#[derive(clap::Args, Debug)]
pub struct MaterializeArgs {
    /// Manifest produced by `extract`
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Directory to create the files in
    #[arg(value_name = "TARGET_DIR")]
    pub target_dir: PathBuf,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 and the help text if the subcommand or required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if matches!(
                e.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::MissingSubcommand
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
