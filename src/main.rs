//! tstmpl's main application entry point.
//! Handles command-line argument parsing and dispatches to extraction or
//! materialization.

use tstmpl::{
    cli::{get_args, Args, Command, ExtractArgs, MaterializeArgs},
    config::{get_config, OutputMode},
    error::{default_error_handler, Result},
    extract::{extract, prepare_output_dir, ExtractOptions},
    manifest::read_manifest,
    materialize::materialize,
    overlay::SidecarOverlays,
    prompt::{DialoguerPrompter, Prompter},
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Extract(extract_args) => run_extract(extract_args, &DialoguerPrompter::new()),
        Command::Materialize(materialize_args) => run_materialize(materialize_args),
    }
}

/// Extracts the project at `--root`.
///
/// # Flow
/// 1. Loads the project configuration and applies command-line overrides
/// 2. Builds the ignore rules from the ignore file and exclusions
/// 3. Clears the output directory, asking first unless `--force`
/// 4. Walks the tree and writes the manifest or modules
fn run_extract(args: ExtractArgs, prompt: &dyn Prompter) -> Result<()> {
    let root = args.root.clone();
    let config = args.apply_to(get_config(&root)?);

    let mut options = ExtractOptions::from_config(&root, &config);
    options.manifest_path = args.manifest.clone();

    let force = args.force
        || (options.output_dir.exists()
            && prompt.confirm(
                false,
                format!(
                    "Output directory '{}' already exists. Replace it?",
                    options.output_dir.display()
                ),
            )?);
    prepare_output_dir(&options.output_dir, &root, force)?;

    let extraction = extract(&root, &options, &SidecarOverlays)?;

    match options.mode {
        OutputMode::Manifest => println!(
            "Wrote {} templates to '{}'.",
            extraction.records.len(),
            options.manifest_path().display()
        ),
        OutputMode::Modules => println!(
            "Wrote {} template modules to '{}'.",
            extraction.records.len(),
            options.output_dir.display()
        ),
    }
    Ok(())
}

/// Recreates a tree from a manifest. The manifest is parsed in full before
/// anything is written.
fn run_materialize(args: MaterializeArgs) -> Result<()> {
    let records = read_manifest(&args.manifest)?;
    for path in materialize(&records, &args.target_dir)? {
        println!("Created: '{}'", path.display());
    }
    println!("Materialization completed successfully in {}.", args.target_dir.display());
    Ok(())
}
