use pkgsplit_lib::{PackageGenerator, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Paths a typical library build stages under its install root.
pub const SAMPLE_INSTALL: &[&str] = &[
    "/usr/bin/minigzip",
    "/usr/include/zconf.h",
    "/usr/include/zlib.h",
    "/usr/lib32/libz.so",
    "/usr/lib32/libz.so.1",
    "/usr/lib32/pkgconfig/zlib.pc",
    "/usr/lib64/libz.a",
    "/usr/lib64/libz.so",
    "/usr/lib64/libz.so.1",
    "/usr/lib64/pkgconfig/zlib.pc",
    "/usr/share/doc/zlib/README",
    "/usr/share/man3/zlib.3",
];

pub fn route_all(generator: &mut PackageGenerator, paths: &[&str]) {
    for path in paths {
        generator.add_file(path);
    }
}

/// Finalize and collect every package's emitted files.
pub fn emitted(generator: &mut PackageGenerator) -> BTreeMap<String, Vec<String>> {
    generator
        .emit_packages()
        .iter()
        .map(|(name, package)| (name.clone(), package.emit_files()))
        .collect()
}

/// Create an install root containing empty files at `paths`.
pub fn create_install_root(paths: &[&str]) -> Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    for path in paths {
        write_file(temp_dir.path(), path)?;
    }
    Ok(temp_dir)
}

fn write_file(root: &Path, path: &str) -> Result<()> {
    let full_path = root.join(path.trim_start_matches('/'));
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(full_path, b"")?;
    Ok(())
}
