pub mod progress;

pub use progress::{create_routing_bar, create_scan_spinner};
