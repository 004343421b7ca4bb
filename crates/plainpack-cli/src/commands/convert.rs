//! Convert command - run the conversion pipeline over manifest files

use miette::{IntoDiagnostic, Result, WrapErr};
use plainpack_convert::Pipeline;
use plainpack_core::{ConvertContext, Manifest};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::display;

pub fn run(files: &[PathBuf], output: Option<&Path>, all: bool) -> Result<()> {
    let paths = collect_paths(files)?;
    if paths.is_empty() {
        return Err(miette::miette!("no manifest files found"));
    }

    let mut manifests = Vec::new();
    for path in &paths {
        let docs = Manifest::load_file(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to load {}", path.display()))?;
        manifests.extend(docs);
    }

    let pipeline = Pipeline::with_defaults();
    let mut ctx = ConvertContext::new();
    let summary = pipeline.run(&manifests, &mut ctx);

    // Synthetic outputs first, in publication order; passthrough on demand.
    let mut outputs: Vec<Manifest> = Vec::new();
    for name in &summary.produced {
        if let Some(configmap) = ctx.configmaps.get(name) {
            outputs.push(configmap.to_manifest().into_diagnostic()?);
        }
    }
    if all {
        outputs.extend(summary.passthrough.iter().cloned());
    }

    match output {
        Some(dir) => write_dir(dir, &outputs)?,
        None => print_stdout(&outputs)?,
    }

    display::print_run_summary(&summary, &ctx.warnings);
    Ok(())
}

/// Expand files and directories into a sorted list of YAML files.
fn collect_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
            {
                let path = entry.path();
                if path.is_file() && is_yaml(path) {
                    paths.push(path.to_path_buf());
                }
            }
        } else if input.is_file() {
            paths.push(input.clone());
        } else {
            return Err(miette::miette!("path not found: {}", input.display()));
        }
    }
    Ok(paths)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|extension| extension.to_str()),
        Some("yaml" | "yml")
    )
}

fn write_dir(dir: &Path, outputs: &[Manifest]) -> Result<()> {
    fs::create_dir_all(dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to create {}", dir.display()))?;

    for manifest in outputs {
        let kind = manifest.kind().unwrap_or("resource").to_lowercase();
        let name = manifest.name().unwrap_or("unnamed");
        let path = dir.join(format!("{kind}-{name}.yaml"));
        let yaml = manifest.to_yaml().into_diagnostic()?;
        fs::write(&path, yaml)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}

fn print_stdout(outputs: &[Manifest]) -> Result<()> {
    let mut first = true;
    for manifest in outputs {
        if !first {
            println!("---");
        }
        first = false;
        print!("{}", manifest.to_yaml().into_diagnostic()?);
    }
    Ok(())
}
