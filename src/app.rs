// Declare modules
pub mod assembler;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod formatter;
pub mod language;
pub mod models;
pub mod scanner;
pub mod toc;

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use self::assembler::assemble_document;
use self::cli::Cli;
use self::config::load_config;
use self::diagnostics::Diagnostics;
use self::error::PrepareError;
use self::models::{Configuration, OutputTarget, Rule};

/// Loads the configuration and writes every output document.
pub fn run(args: &Cli, diag: &dyn Diagnostics) -> Result<()> {
    let config = load_config(&args.config, diag)
        .with_context(|| format!("Failed to load configuration {:?}", args.config))?;

    prepare_documents(&config, &args.output_dir, args.keep_going, diag)?;

    diag.info("Markdown documents prepared successfully.");
    Ok(())
}

/// Builds each configured output in order.
///
/// Output-stage failures end the run unless `keep_going` is set; then they
/// are reported and the run fails only after every output was attempted.
pub fn prepare_documents(
    config: &Configuration,
    output_dir: &Path,
    keep_going: bool,
    diag: &dyn Diagnostics,
) -> Result<()> {
    let mut failed = Vec::new();

    for target in &config.outputs {
        diag.info(&format!("Generating '{}'...", target.name));
        let Some(rules) = &target.rules else {
            diag.warn(&format!(
                "Skipping output '{}': Rules should be a list of mappings.",
                target.name
            ));
            continue;
        };

        match write_output(target, rules, config.sort_paths, output_dir, diag) {
            Ok(path) => diag.info(&format!("Generated Markdown: '{}'", path.display())),
            Err(e) if keep_going && e.is_output_stage() => {
                diag.error(&e.to_string());
                failed.push(target.name.clone());
            }
            Err(e) => return Err(e.into()),
        }
    }

    if !failed.is_empty() {
        bail!("{} output(s) failed: {}", failed.len(), failed.join(", "));
    }
    Ok(())
}

fn write_output(
    target: &OutputTarget,
    rules: &[Rule],
    sort_paths: bool,
    output_dir: &Path,
    diag: &dyn Diagnostics,
) -> Result<PathBuf, PrepareError> {
    fs::create_dir_all(output_dir).map_err(|source| PrepareError::DirCreation {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let document = assemble_document(&target.name, rules, sort_paths, diag);

    let output_path = output_dir.join(&target.name);
    fs::write(&output_path, document).map_err(|source| PrepareError::FileWrite {
        path: output_path.clone(),
        source,
    })?;
    Ok(output_path)
}
