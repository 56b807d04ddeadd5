use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vidscript",
    about = "vidscript - Fetch video transcripts, reflow text into SRT subtitles and paraphrase it",
    version,
    long_about = "A CLI tool for fetching spoken-word transcripts of YouTube videos. Captions are read from YouTube's caption tracks first; when they are disabled, missing or malformed, subtitle tracks reported by yt-dlp are used instead."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators and informational logs
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the transcript of a video
    Transcribe {
        /// Video URL (youtube.com/watch?v=... or youtu.be/...)
        #[arg(value_name = "URL")]
        url: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Reflow the transcript into SRT subtitle blocks
        #[arg(long)]
        srt: bool,
    },

    /// Reflow text into time-coded SRT subtitle blocks
    Segment {
        /// Input text file (reads stdin if not specified)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Maximum characters per subtitle block
        #[arg(long, value_name = "CHARS")]
        max_chars: Option<usize>,

        /// Duration of each block in seconds
        #[arg(long, value_name = "SECONDS")]
        block_duration: Option<u64>,

        /// Silent gap between blocks in seconds
        #[arg(long, value_name = "SECONDS")]
        gap: Option<u64>,
    },

    /// Rewrite text with a language model, keeping its meaning
    Paraphrase {
        /// Input text file (reads stdin if not specified)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Target language (defaults to the configured language)
        #[arg(short, long, value_name = "LANGUAGE")]
        language: Option<String>,

        /// Model name (defaults to the configured model)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,
    },

    /// Print the thumbnail URL of a video
    Thumbnail {
        /// Video URL
        #[arg(value_name = "URL")]
        url: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show or initialize the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write the default configuration file
        #[arg(long, conflicts_with = "show")]
        init: bool,
    },
}

impl Commands {
    /// Output format requested by the command (used for error reporting too)
    pub fn output_format(&self) -> OutputFormat {
        match self {
            Commands::Transcribe { format, .. }
            | Commands::Segment { format, .. }
            | Commands::Paraphrase { format, .. }
            | Commands::Thumbnail { format, .. } => format.clone(),
            Commands::Config { .. } => OutputFormat::Text,
        }
    }
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON envelope ({"transcription": ...}, {"result": ...} or {"error": ...})
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_segment_overrides() {
        let cli = Cli::parse_from(["vidscript", "segment", "--max-chars", "42", "--gap", "0", "-f", "json"]);
        match cli.command {
            Commands::Segment {
                max_chars,
                gap,
                block_duration,
                format,
                ..
            } => {
                assert_eq!(max_chars, Some(42));
                assert_eq!(gap, Some(0));
                assert_eq!(block_duration, None);
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected segment command"),
        }
    }
}
