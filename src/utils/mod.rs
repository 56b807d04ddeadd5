use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Read input text from a file, or from stdin when no path is given
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs_err::read_to_string(path).context("Failed to read input file"),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read text from stdin")?;
            Ok(buffer)
        }
    }
}

/// Check if the current environment has required tools
pub async fn check_dependencies(yt_dlp_path: &str) -> Vec<String> {
    let mut missing = Vec::new();

    if !check_command_available(yt_dlp_path).await {
        missing.push(format!(
            "{} - required for the subtitle fallback (https://github.com/yt-dlp/yt-dlp)",
            yt_dlp_path
        ));
    }

    missing
}

/// Check if a command is available in PATH
async fn check_command_available(command: &str) -> bool {
    use tokio::process::Command;

    Command::new(command)
        .arg("--version")
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs_err::write(&path, "some text\n").unwrap();

        assert_eq!(read_input(Some(&path)).unwrap(), "some text\n");
    }

    #[test]
    fn test_read_input_missing_file() {
        assert!(read_input(Some(Path::new("/nonexistent/input.txt"))).is_err());
    }

    #[tokio::test]
    async fn test_check_dependencies_reports_missing_tool() {
        let missing = check_dependencies("/nonexistent/yt-dlp").await;
        assert_eq!(missing.len(), 1);
        assert!(missing[0].starts_with("/nonexistent/yt-dlp"));
    }
}
