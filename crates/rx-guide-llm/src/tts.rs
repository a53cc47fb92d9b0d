//! Speech synthesis for the guide's text sections.
//!
//! Text is cleaned and chunked by `rx_guide_core::speech`; each chunk is voiced
//! separately and the MP3 pieces are concatenated. Chunks that fail are skipped.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rx_guide_core::speech::{chunk_for_speech, clean_for_speech, speech_language, SPEECH_CHUNK_CHARS};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("No text to speak")]
    NothingToSpeak,

    #[error("Speech request failed: {0}")]
    Request(String),

    #[error("Speech service returned {0}")]
    Status(u16),

    #[error("No audio could be generated")]
    NoAudio,
}

/// Voices one chunk of plain text.
pub trait SpeechSynthesizer {
    /// Return MP3 bytes for `text` spoken in `lang` (an ISO 639-1 code).
    fn synthesize_chunk(&self, text: &str, lang: &str) -> Result<Vec<u8>, SpeechError>;
}

/// Clean, chunk and voice `text`, returning one concatenated MP3 stream.
pub fn synthesize(
    text: &str,
    lang_code: &str,
    synth: &dyn SpeechSynthesizer,
) -> Result<Vec<u8>, SpeechError> {
    let cleaned = clean_for_speech(text);
    if cleaned.trim().is_empty() {
        return Err(SpeechError::NothingToSpeak);
    }
    let lang = speech_language(lang_code);

    let mut audio = Vec::new();
    for (i, chunk) in chunk_for_speech(&cleaned, SPEECH_CHUNK_CHARS).iter().enumerate() {
        match synth.synthesize_chunk(chunk, lang) {
            Ok(bytes) => audio.extend_from_slice(&bytes),
            Err(e) => tracing::warn!(chunk = i, error = %e, "Skipping speech chunk"),
        }
    }

    if audio.is_empty() {
        return Err(SpeechError::NoAudio);
    }
    Ok(audio)
}

/// `data:` URI for embedding MP3 bytes.
pub fn audio_data_uri(audio: &[u8]) -> String {
    format!("data:audio/mp3;base64,{}", STANDARD.encode(audio))
}

/// HTML audio player for MP3 bytes.
pub fn audio_html(audio: &[u8]) -> String {
    format!(
        r#"<audio controls src="{}">Your browser does not support audio.</audio>"#,
        audio_data_uri(audio)
    )
}

/// Split on whitespace into pieces of at most `max` characters.
///
/// A single word longer than `max` becomes its own piece.
#[cfg_attr(not(feature = "http"), allow(dead_code))]
fn split_words(text: &str, max: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
        if needed > max && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

#[cfg(feature = "http")]
pub use google::GoogleTranslateTts;

#[cfg(feature = "http")]
mod google {
    use std::time::Duration;

    use super::{split_words, SpeechError, SpeechSynthesizer};

    const TTS_URL: &str = "https://translate.google.com/translate_tts";
    /// The endpoint rejects longer requests.
    const REQUEST_CHARS: usize = 100;

    /// Google Translate's public speech endpoint.
    pub struct GoogleTranslateTts {
        client: reqwest::blocking::Client,
        url: String,
    }

    impl GoogleTranslateTts {
        pub fn new(timeout_secs: u64) -> Result<Self, SpeechError> {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .user_agent("Mozilla/5.0")
                .build()
                .map_err(|e| SpeechError::Request(e.to_string()))?;
            Ok(Self {
                client,
                url: TTS_URL.to_string(),
            })
        }

        fn request(&self, text: &str, lang: &str, idx: usize, total: usize) -> Result<Vec<u8>, SpeechError> {
            let total = total.to_string();
            let idx = idx.to_string();
            let textlen = text.chars().count().to_string();
            let response = self
                .client
                .get(&self.url)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", lang),
                    ("q", text),
                    ("total", total.as_str()),
                    ("idx", idx.as_str()),
                    ("textlen", textlen.as_str()),
                ])
                .send()
                .map_err(|e| SpeechError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(SpeechError::Status(status.as_u16()));
            }
            let bytes = response
                .bytes()
                .map_err(|e| SpeechError::Request(e.to_string()))?;
            Ok(bytes.to_vec())
        }
    }

    impl SpeechSynthesizer for GoogleTranslateTts {
        fn synthesize_chunk(&self, text: &str, lang: &str) -> Result<Vec<u8>, SpeechError> {
            let pieces = split_words(text, REQUEST_CHARS);
            let mut audio = Vec::new();
            for (idx, piece) in pieces.iter().enumerate() {
                audio.extend(self.request(piece, lang, idx, pieces.len())?);
            }
            Ok(audio)
        }
    }
}

/// Synthesizer for tests: "audio" is the chunk text as bytes.
#[derive(Default)]
pub struct MockSpeech {
    /// Chunks containing this text fail.
    pub fail_on: Option<String>,
    calls: std::cell::RefCell<Vec<(String, String)>>,
}

impl MockSpeech {
    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_on: Some(needle.to_string()),
            ..Self::default()
        }
    }

    /// (text, lang) pairs received so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }
}

impl SpeechSynthesizer for MockSpeech {
    fn synthesize_chunk(&self, text: &str, lang: &str) -> Result<Vec<u8>, SpeechError> {
        self.calls
            .borrow_mut()
            .push((text.to_string(), lang.to_string()));
        match &self.fail_on {
            Some(needle) if text.contains(needle.as_str()) => Err(SpeechError::Status(500)),
            _ => Ok(text.as_bytes().to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize_cleans_and_falls_back_to_english() {
        let synth = MockSpeech::default();
        let audio = synthesize("## 💊 **Augmentin**\n---\nTake twice daily.", "de", &synth).unwrap();
        assert_eq!(String::from_utf8(audio).unwrap(), "Augmentin\nTake twice daily.");
        assert_eq!(synth.calls()[0].1, "en");
    }

    #[test]
    fn test_synthesize_skips_failed_chunks() {
        let first = format!("{}.", "a".repeat(300));
        let second = format!("{}.", "b".repeat(300));
        let synth = MockSpeech::failing_on("aaa");
        let audio = synthesize(&format!("{first} {second}"), "hi", &synth).unwrap();
        assert_eq!(String::from_utf8(audio).unwrap(), second);
        assert_eq!(synth.calls().len(), 2);
    }

    #[test]
    fn test_synthesize_errors() {
        let synth = MockSpeech::default();
        assert!(matches!(synthesize("** --- **", "en", &synth), Err(SpeechError::NothingToSpeak)));
        assert!(synth.calls().is_empty());

        let failing = MockSpeech::failing_on("Take");
        assert!(matches!(synthesize("Take it.", "en", &failing), Err(SpeechError::NoAudio)));
    }

    #[test]
    fn test_audio_html() {
        let html = audio_html(b"mp3");
        assert_eq!(
            html,
            r#"<audio controls src="data:audio/mp3;base64,bXAz">Your browser does not support audio.</audio>"#
        );
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("one two three", 7), vec!["one two", "three"]);
        assert_eq!(split_words("abcdefghij xy", 4), vec!["abcdefghij", "xy"]);
        assert!(split_words("   ", 10).is_empty());
    }
}
