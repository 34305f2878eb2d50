pub mod links;

pub use links::{follow_up_calendar_url, follow_up_mailto};

use anyhow::{Context, Result};

/// Open a URL in the user's default browser or mail client
///
/// # Arguments
/// * `url` - The URL to open (e.g., a Google Calendar or mailto link)
///
/// # Errors
/// Returns error if no handler can be launched (e.g., no browser available)
pub fn open_url(url: &str) -> Result<()> {
    webbrowser::open(url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}
