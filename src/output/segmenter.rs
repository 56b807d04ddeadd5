use std::time::Duration;

use crate::config::SegmenterConfig;
use crate::TranscriptorError;

/// One time-coded subtitle unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleBlock {
    /// 1-based position in the sequence
    pub index: usize,
    pub start: Duration,
    pub end: Duration,
    pub text: String,
}

/// Collapse whitespace runs (newlines included) to single spaces and trim
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reflow text into subtitle blocks of at most `max_chars` characters.
///
/// Blocks break after the last period of the window when there is one, otherwise at
/// the last space, otherwise the full window is taken. Every block lasts
/// `block_duration_secs` and is followed by a `gap_secs` silence.
pub fn segment_into_subtitles(
    text: &str,
    config: &SegmenterConfig,
) -> Result<Vec<SubtitleBlock>, TranscriptorError> {
    let normalized = normalize_text(text);
    if normalized.is_empty() {
        return Err(TranscriptorError::EmptyInput);
    }

    let chars: Vec<char> = normalized.chars().collect();
    let max_chars = config.max_chars.max(1);
    let block_duration = Duration::from_secs(config.block_duration_secs);
    let step = Duration::from_secs(config.block_duration_secs + config.gap_secs);

    let mut blocks = Vec::new();
    let mut offset = 0;
    let mut start = Duration::ZERO;

    while offset < chars.len() {
        let window_end = (offset + max_chars).min(chars.len());
        let window = &chars[offset..window_end];

        let (block_len, advance) = if offset + max_chars < chars.len() {
            break_point(window)
        } else {
            (window.len(), window.len())
        };

        blocks.push(SubtitleBlock {
            index: blocks.len() + 1,
            start,
            end: start + block_duration,
            text: window[..block_len].iter().collect(),
        });

        offset += advance;
        // the space separating two blocks belongs to neither
        if chars.get(offset) == Some(&' ') {
            offset += 1;
        }
        start += step;
    }

    tracing::debug!("Segmented {} chars into {} blocks", chars.len(), blocks.len());
    Ok(blocks)
}

/// Length of the block cut from `window` and how far the offset moves
fn break_point(window: &[char]) -> (usize, usize) {
    if let Some(pos) = window.iter().rposition(|&c| c == '.') {
        (pos + 1, pos + 1)
    } else if let Some(pos) = window.iter().rposition(|&c| c == ' ') {
        (pos, pos + 1)
    } else {
        (window.len(), window.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_chars: usize) -> SegmenterConfig {
        SegmenterConfig {
            max_chars,
            ..SegmenterConfig::default()
        }
    }

    fn texts(blocks: &[SubtitleBlock]) -> Vec<&str> {
        blocks.iter().map(|b| b.text.as_str()).collect()
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_text("  one\n\ntwo \t three  "), "one two three");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_text(" a  b\nc\r\n d ");
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            segment_into_subtitles(" \n\t ", &SegmenterConfig::default()),
            Err(TranscriptorError::EmptyInput)
        );
    }

    #[test]
    fn test_short_text_single_block() {
        let blocks = segment_into_subtitles("Hello\n  world.", &SegmenterConfig::default()).unwrap();
        assert_eq!(
            blocks,
            vec![SubtitleBlock {
                index: 1,
                start: Duration::ZERO,
                end: Duration::from_secs(30),
                text: "Hello world.".to_string(),
            }]
        );
    }

    #[test]
    fn test_exact_budget_without_break_point() {
        let text = "x".repeat(360);
        let blocks = segment_into_subtitles(&text, &SegmenterConfig::default()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text.chars().count(), 360);
    }

    #[test]
    fn test_unbroken_run_is_cut_at_budget() {
        let text = "x".repeat(400);
        let blocks = segment_into_subtitles(&text, &SegmenterConfig::default()).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text.len(), 360);
        assert_eq!(blocks[1].text.len(), 40);
    }

    #[test]
    fn test_period_preferred_over_later_space() {
        let text = format!("A. {}", "x".repeat(400));
        let blocks = segment_into_subtitles(&text, &SegmenterConfig::default()).unwrap();

        assert_eq!(blocks[0].text, "A.");
        assert_eq!(blocks[1].text, "x".repeat(360));
        assert_eq!(blocks[2].text, "x".repeat(40));
        assert_eq!(blocks.len(), 3);
    }

    #[test]
    fn test_sentence_boundaries() {
        let blocks = segment_into_subtitles("One two. Three four. Five six", &config(12)).unwrap();
        assert_eq!(texts(&blocks), vec!["One two.", "Three four.", "Five six"]);
    }

    #[test]
    fn test_word_boundary_fallback() {
        let blocks = segment_into_subtitles("alpha beta gamma delta", &config(12)).unwrap();
        assert_eq!(texts(&blocks), vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn test_blocks_never_exceed_budget_or_start_with_space() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod \
            tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam quis \
            nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.";
        for max_chars in [5, 17, 40, 80] {
            let blocks = segment_into_subtitles(text, &config(max_chars)).unwrap();
            for block in &blocks {
                assert!(block.text.chars().count() <= max_chars);
                assert!(!block.text.is_empty());
                assert!(!block.text.starts_with(' '));
            }
        }
    }

    #[test]
    fn test_trailing_period_gives_clean_final_block() {
        let blocks = segment_into_subtitles("First one. Second one.", &config(11)).unwrap();
        assert_eq!(texts(&blocks), vec!["First one.", "Second one."]);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let blocks = segment_into_subtitles("ação ação ação", &config(10)).unwrap();
        assert_eq!(texts(&blocks), vec!["ação ação", "ação"]);
    }

    #[test]
    fn test_timing_and_indices() {
        let text = "word ".repeat(400);
        let blocks = segment_into_subtitles(&text, &SegmenterConfig::default()).unwrap();
        assert!(blocks.len() > 3);

        for (k, block) in blocks.iter().enumerate() {
            let k = k as u64;
            assert_eq!(block.index, k as usize + 1);
            assert_eq!(block.start, Duration::from_secs(k * 40));
            assert_eq!(block.end, Duration::from_secs(k * 40 + 30));
            assert!(block.start < block.end);
        }
    }
}
