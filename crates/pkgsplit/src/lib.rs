pub mod classify;
pub mod config;
pub mod error;
pub mod index;
pub mod manifest;
pub mod util;

pub use classify::{
    Capture, GeneratorState, Package, PackageGenerator, PathPattern, PatternRule, PatternRules,
    RegisteredPattern, BUILTIN_PATTERNS, MAIN_PACKAGE, PRIORITY_DEFAULT, PRIORITY_USER,
};
pub use config::Config;
pub use error::{PkgsplitError, Result};
pub use index::{read_path_list, scan_install_root, ScanOptions, ScanStats};
pub use manifest::{
    build_manifests, implicit_dependencies, package_name, render_file_listing, PackageManifest,
};
