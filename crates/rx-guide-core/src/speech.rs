//! Text preparation for speech synthesis.

/// Per-call character limit of the speech service.
pub const SPEECH_CHUNK_CHARS: usize = 500;

/// Codes the speech service can voice; anything else is read in English.
pub const SPEECH_LANGUAGES: &[&str] = &["en", "es", "fr", "hi", "ta", "bn", "kn", "mr", "te"];

/// Markdown markup and decorative symbols that should not be read aloud.
const UNSPOKEN: &[&str] = &[
    "**", "---", "*", "#", "|", "`", "_", "✅", "⚠️", "⚠", "🔎", "💊", "🚨", "❌", "✔", "📋", "👉",
    "🧾", "👤", "👨‍⚕️", "👨", "🔊", "↔", "🔴", "🟡", "🟢",
];

/// Remove markup and emoji, trim lines and drop empty or dash-only ones.
pub fn clean_for_speech(text: &str) -> String {
    let mut cleaned = text.to_string();
    for symbol in UNSPOKEN {
        cleaned = cleaned.replace(symbol, "");
    }
    cleaned
        .lines()
        .map(str::trim)
        .filter(|line| !line.trim_matches('-').trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split text into pieces of at most `limit` characters.
///
/// Prefers to cut after the last full stop inside the window, then after the
/// last newline, and only then mid-text. Pieces are trimmed; empty ones are dropped.
pub fn chunk_for_speech(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut rest = text.trim();

    while rest.chars().count() > limit {
        // Byte offset just past the `limit`-th character.
        let window_end = rest
            .char_indices()
            .nth(limit)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let window = &rest[..window_end];

        let cut = window
            .rfind('.')
            .or_else(|| window.rfind('\n'))
            .map(|i| i + 1)
            .unwrap_or(window_end);

        let piece = rest[..cut].trim();
        if !piece.is_empty() {
            chunks.push(piece.to_string());
        }
        rest = rest[cut..].trim();
    }

    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }
    chunks
}

/// Speech language for an ISO code, falling back to English.
pub fn speech_language(code: &str) -> &'static str {
    SPEECH_LANGUAGES
        .iter()
        .find(|&&supported| supported == code)
        .copied()
        .unwrap_or("en")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_markup() {
        let text = "---\n### 💊 1. Augmentin\n\n✅ **Usage:**\n- Infections\n  ---  \n";
        assert_eq!(clean_for_speech(text), "1. Augmentin\nUsage:\n- Infections");
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(chunk_for_speech("  Take with food.  ", 500), vec!["Take with food."]);
        assert!(chunk_for_speech("   ", 500).is_empty());
    }

    #[test]
    fn test_chunks_split_on_sentences() {
        let text = "One two. Three four. Five six.";
        let chunks = chunk_for_speech(text, 12);
        assert_eq!(chunks, vec!["One two.", "Three four.", "Five six."]);
    }

    #[test]
    fn test_chunks_fall_back_to_newline_then_hard_cut() {
        assert_eq!(chunk_for_speech("abc\ndefgh", 6), vec!["abc", "defgh"]);
        assert_eq!(chunk_for_speech("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_chunks_respect_char_boundaries() {
        let text = "दिन में दो बार".repeat(40);
        let chunks = chunk_for_speech(&text, 50);
        assert!(chunks.iter().all(|c| c.chars().count() <= 50));
        assert_eq!(chunks.concat().replace(' ', ""), text.replace(' ', ""));
    }

    #[test]
    fn test_speech_language_fallback() {
        assert_eq!(speech_language("hi"), "hi");
        assert_eq!(speech_language("de"), "en");
    }
}
