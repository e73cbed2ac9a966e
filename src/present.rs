// 🖼️ Present - Hand Off to the System Image Viewer
// Only compiled with the `viewer` feature (on by default)

use anyhow::{Context, Result};
use std::path::Path;

/// Open an already-written image in the platform's default viewer.
///
/// The file must exist before this is called; the viewer runs detached, so
/// the process does not wait for it to close.
pub fn show(path: &Path, title: Option<&str>) -> Result<()> {
    if let Some(title) = title {
        println!("🖼️  {}", title);
    }
    open::that(path)
        .with_context(|| format!("Failed to open {} in the system image viewer", path.display()))
}
