use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidscript::cli::{Cli, Commands, OutputFormat};
use vidscript::config::Config;
use vidscript::extractors::{youtube::YoutubeCaptionSource, ytdlp::YtDlpMediaInfo, VideoId};
use vidscript::output::{self, segmenter::segment_into_subtitles, JsonResponse};
use vidscript::paraphrase::{openai::OpenAI, Paraphraser};
use vidscript::transcribe::TranscriptAcquirer;
use vidscript::{utils, TranscriptorError};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "vidscript=debug"
    } else if cli.quiet {
        "vidscript=warn"
    } else {
        "vidscript=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = cli.command.output_format();

    match run(cli.command, cli.quiet).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e, &format),
    }
}

async fn run(command: Commands, quiet: bool) -> Result<()> {
    let config = Config::load()?;

    match command {
        Commands::Transcribe {
            url,
            output,
            format,
            srt,
        } => {
            // Check for required external dependencies (non-fatal)
            let missing_deps = utils::check_dependencies(&config.fallback.yt_dlp_path).await;
            if !missing_deps.is_empty() && !quiet {
                eprintln!("{}", console::style("Dependency check warnings:").yellow());
                for dep in missing_deps {
                    eprintln!("   • {}", dep);
                }
            }

            let acquirer = TranscriptAcquirer::new(
                Box::new(YoutubeCaptionSource::new(&config.captions, &config.network)?),
                Box::new(YtDlpMediaInfo::new(&config.fallback, &config.network)?),
                &config.captions,
                &config.fallback,
            );

            let progress = spinner("Fetching transcript...", quiet)?;
            let transcript = acquirer.acquire_transcript(&url).await;
            progress.finish_and_clear();
            let transcript = transcript?;

            let response = if srt {
                let blocks = segment_into_subtitles(&transcript, &config.segmenter)?;
                JsonResponse::Result {
                    result: output::format_as_srt(&blocks),
                }
            } else {
                JsonResponse::Transcription {
                    transcription: transcript,
                }
            };

            emit(&response, output.as_deref(), &format)?;
        }
        Commands::Segment {
            input,
            output,
            format,
            max_chars,
            block_duration,
            gap,
        } => {
            let text = utils::read_input(input.as_deref())?;

            let mut segmenter = config.segmenter.clone();
            if let Some(max_chars) = max_chars {
                segmenter.max_chars = max_chars;
            }
            if let Some(block_duration) = block_duration {
                segmenter.block_duration_secs = block_duration;
            }
            if let Some(gap) = gap {
                segmenter.gap_secs = gap;
            }
            segmenter.validate()?;

            let blocks = segment_into_subtitles(&text, &segmenter)?;
            tracing::info!("Generated {} subtitle blocks", blocks.len());

            let response = JsonResponse::Result {
                result: output::format_as_srt(&blocks),
            };
            emit(&response, output.as_deref(), &format)?;
        }
        Commands::Paraphrase {
            input,
            output,
            format,
            language,
            model,
        } => {
            let text = utils::read_input(input.as_deref())?;
            let text = text.trim();
            if text.is_empty() {
                return Err(TranscriptorError::EmptyInput.into());
            }

            let mut client = OpenAI::new(&config.paraphrase, &config.network)?;
            if let Some(model) = model {
                client = client.with_model(model);
            }
            let paraphraser = Paraphraser::new(Box::new(client), &config.paraphrase);
            let language = language.unwrap_or_else(|| config.paraphrase.language.clone());

            let progress = spinner("Paraphrasing...", quiet)?;
            let result = paraphraser.paraphrase(text, &language).await;
            progress.finish_and_clear();

            emit(&JsonResponse::Result { result: result? }, output.as_deref(), &format)?;
        }
        Commands::Thumbnail { url, format } => {
            let video_id = VideoId::from_url(&url)?;
            let response = JsonResponse::Thumbnail {
                thumbnail_url: video_id.thumbnail_url(),
            };
            emit(&response, None, &format)?;
        }
        Commands::Config { show, init } => {
            if init {
                let path = Config::default().save()?;
                println!("Default configuration written to: {}", path.display());
            } else {
                if !show {
                    println!("Config file: {}", Config::config_path()?.display());
                }
                config.display();
            }
        }
    }

    Ok(())
}

fn spinner(message: &'static str, quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    progress.set_message(message);
    progress.enable_steady_tick(Duration::from_millis(120));
    Ok(progress)
}

fn emit(response: &JsonResponse, path: Option<&Path>, format: &OutputFormat) -> Result<()> {
    match path {
        Some(path) => {
            output::save_to_file(response, path, format)?;
            eprintln!("Saved to: {}", path.display());
        }
        None => output::print_to_console(response, format)?,
    }
    Ok(())
}

/// Print a failure and map it to an exit code (2 for caller input errors, 1 otherwise)
fn report_error(error: &anyhow::Error, format: &OutputFormat) -> ExitCode {
    let status = error
        .downcast_ref::<TranscriptorError>()
        .map(TranscriptorError::status_code)
        .unwrap_or(500);

    let message = match error.downcast_ref::<TranscriptorError>() {
        Some(e) => e.to_string(),
        None => format!("{:#}", error),
    };

    match format {
        OutputFormat::Json => {
            let response = JsonResponse::Error { error: message };
            if output::print_to_console(&response, format).is_err() {
                eprintln!("Error: {}", response.text());
            }
        }
        OutputFormat::Text => {
            eprintln!("{} {}", console::style("Error:").red().bold(), message);
        }
    }

    if status == 400 {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}
