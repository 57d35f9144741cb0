use super::OutputFormat;
use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use console::style;
use log::{info, warn};
use pkgsplit_lib::util::{create_routing_bar, create_scan_spinner};
use pkgsplit_lib::{
    build_manifests, read_path_list, render_file_listing, scan_install_root, PackageGenerator,
    PackageManifest, ScanOptions,
};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

pub fn handle_classify_command(
    mut generator: PackageGenerator,
    root: Option<PathBuf>,
    list: Option<PathBuf>,
    source: &str,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let paths = collect_paths(root, list, quiet)?;

    let bar = create_routing_bar(paths.len() as u64, quiet);
    for path in &paths {
        generator.add_file(path);
        bar.inc(1);
    }
    bar.finish_and_clear();

    let manifests = build_manifests(source, generator.emit_packages());
    info!(
        "Classified {} file(s) into {} package(s)",
        paths.len(),
        manifests.len()
    );

    match format {
        OutputFormat::Table => print_table(&manifests, quiet),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&manifests)?);
        }
        OutputFormat::Files => print!("{}", render_file_listing(&manifests)),
    }

    Ok(())
}

fn collect_paths(root: Option<PathBuf>, list: Option<PathBuf>, quiet: bool) -> Result<Vec<String>> {
    match (root, list) {
        (_, Some(list)) if list.as_os_str() == "-" => {
            Ok(read_path_list(io::stdin().lock()).context("Failed to read paths from stdin")?)
        }
        (_, Some(list)) => {
            let file = File::open(&list)
                .with_context(|| format!("Failed to open path list {}", list.display()))?;
            Ok(read_path_list(BufReader::new(file))
                .with_context(|| format!("Failed to read path list {}", list.display()))?)
        }
        (Some(root), None) => {
            let spinner = create_scan_spinner(&format!("Scanning {}", root.display()), quiet);
            let (paths, stats) = scan_install_root(&root, &ScanOptions::default())
                .with_context(|| format!("Failed to scan install root {}", root.display()))?;
            spinner.finish_and_clear();

            if stats.errors > 0 {
                warn!("{} entries under {} could not be read", stats.errors, root.display());
            }
            info!(
                "Scanned {} file(s) ({} symlink(s)) in {} director(ies)",
                stats.files_scanned, stats.symlinks_found, stats.dirs_scanned
            );
            Ok(paths)
        }
        (None, None) => bail!("Either an install root or --list is required"),
    }
}

fn print_table(manifests: &[PackageManifest], quiet: bool) {
    if manifests.is_empty() {
        if !quiet {
            println!("{}", style("No files to package").yellow());
        }
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Package").fg(Color::Cyan),
        Cell::new("Bucket").fg(Color::Cyan),
        Cell::new("Files").fg(Color::Cyan),
        Cell::new("Declarations").fg(Color::Cyan),
        Cell::new("Depends").fg(Color::Cyan),
    ]);

    for manifest in manifests {
        table.add_row(vec![
            Cell::new(&manifest.name),
            Cell::new(&manifest.bucket),
            Cell::new(manifest.files.len()),
            Cell::new(manifest.declarations.join("\n")),
            Cell::new(if manifest.depends.is_empty() {
                "-".to_string()
            } else {
                manifest.depends.join(", ")
            }),
        ]);
    }

    println!("{}", table);

    if !quiet {
        let total: usize = manifests.iter().map(|m| m.files.len()).sum();
        println!(
            "{} {} file(s) across {} package(s)",
            style("✓").green(),
            style(total).bold(),
            style(manifests.len()).bold()
        );
    }
}
