pub mod list;
pub mod scanner;

pub use list::read_path_list;
pub use scanner::{scan_install_root, ScanOptions, ScanStats};
