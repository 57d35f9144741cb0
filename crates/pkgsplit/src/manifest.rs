//! Finalized per-package output handed to archive and metadata writers.

use crate::classify::{Package, MAIN_PACKAGE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full package name for a bucket: `main` takes the source name, subpackages
/// are suffixed, e.g. `zlib-devel`.
pub fn package_name(source: &str, bucket: &str) -> String {
    if bucket == MAIN_PACKAGE {
        source.to_string()
    } else {
        format!("{}-{}", source, bucket)
    }
}

fn implicit_siblings(bucket: &str) -> &'static [&'static str] {
    match bucket {
        "devel" | "32bit" => &[MAIN_PACKAGE],
        "32bit-devel" => &["32bit", MAIN_PACKAGE],
        _ => &[],
    }
}

/// Sibling packages `bucket` depends on, as full package names.
///
/// Only siblings that will actually be produced (present with at least one
/// emitted file) are listed.
pub fn implicit_dependencies(
    source: &str,
    bucket: &str,
    packages: &BTreeMap<String, Package>,
) -> Vec<String> {
    implicit_siblings(bucket)
        .iter()
        .filter(|sibling| **sibling != bucket)
        .filter(|sibling| {
            packages
                .get(**sibling)
                .map(|package| !package.is_empty())
                .unwrap_or(false)
        })
        .map(|sibling| package_name(source, sibling))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    /// Bucket name inside the generator (`main`, `devel`, ...)
    pub bucket: String,
    /// Full package name
    pub name: String,
    /// Every emitted file, sorted
    pub files: Vec<String>,
    /// Pattern declarations plus individually listed default-policy files
    pub declarations: Vec<String>,
    pub depends: Vec<String>,
}

/// Build manifests for every non-empty package, ordered by bucket name.
pub fn build_manifests(source: &str, packages: &BTreeMap<String, Package>) -> Vec<PackageManifest> {
    packages
        .iter()
        .filter(|(_, package)| !package.is_empty())
        .map(|(bucket, package)| PackageManifest {
            bucket: bucket.clone(),
            name: package_name(source, bucket),
            files: package.emit_files(),
            declarations: package.emit_files_by_pattern(),
            depends: implicit_dependencies(source, bucket, packages),
        })
        .collect()
}

/// One `name: path` line per emitted file.
pub fn render_file_listing(manifests: &[PackageManifest]) -> String {
    let mut listing = String::new();
    for manifest in manifests {
        for file in &manifest.files {
            listing.push_str(&manifest.name);
            listing.push_str(": ");
            listing.push_str(file);
            listing.push('\n');
        }
    }
    listing
}
