use anyhow::{Context, Result};
use std::path::Path;

/// Open a saved certificate with the user's default viewer
///
/// # Errors
/// Returns error if no browser or viewer can be launched
pub fn open_path(path: &Path) -> Result<()> {
    let target = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: {}", path.display()))?;
    let target = target.to_string_lossy();
    webbrowser::open(&target).with_context(|| format!("Failed to open viewer for: {}", target))?;
    Ok(())
}
