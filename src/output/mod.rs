use anyhow::Result;
use std::path::Path;

use crate::cli::OutputFormat;

pub mod formatters;
pub mod segmenter;

pub use formatters::*;

/// Render a response in the requested format
pub fn render(response: &JsonResponse, format: &OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Text => response.text().to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(response)?,
    };
    Ok(content)
}

/// Save a response to file
pub fn save_to_file(response: &JsonResponse, path: &Path, format: &OutputFormat) -> Result<()> {
    let content = render(response, format)?;
    fs_err::write(path, content)?;
    Ok(())
}

/// Print a response to the console
pub fn print_to_console(response: &JsonResponse, format: &OutputFormat) -> Result<()> {
    let content = render(response, format)?;
    println!("{}", content);
    Ok(())
}
