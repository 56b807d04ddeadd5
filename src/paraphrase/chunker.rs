/// Split text into consecutive slices of `max_chars` characters; the last may be shorter
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let chars: Vec<char> = text.chars().collect();

    chars
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
