//! Scan options.

/// Default name of the directory valid keyboxes are moved into.
pub const DEFAULT_DESTINATION_DIR: &str = "Strong Keyboxes";

/// How a directory scan treats valid keyboxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Move valid keyboxes into `destination_dir`.
    pub move_valid: bool,
    /// Subdirectory of the scanned directory that receives valid keyboxes.
    pub destination_dir: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            move_valid: true,
            destination_dir: DEFAULT_DESTINATION_DIR.to_string(),
        }
    }
}

impl ScanOptions {
    /// Report only, leave files in place.
    pub fn report_only() -> Self {
        Self {
            move_valid: false,
            ..Default::default()
        }
    }
}
