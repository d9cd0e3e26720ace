use anyhow::{Context, Result};

/// Open `url` in a new browser context. A configured command wins over the
/// system default handler. Both paths detach, so no child is left to reap.
pub fn open_url(url: &str, open_command: Option<&str>) -> Result<()> {
    match open_command {
        Some(cmd) => open::with_detached(url, cmd).with_context(|| format!("failed to run {}", cmd)),
        None => open::that_detached(url).with_context(|| format!("failed to open {}", url)),
    }
}
