//! Hosted-model side of the prescription guide.
//!
//! This crate talks to a generative model (Gemini by default) to read the
//! prescription photo, write per-medicine notes and translate, and to a speech
//! service to voice the results. All outbound calls are blocking and go through
//! the [`GenerativeModel`] and [`SpeechSynthesizer`] traits so tests can script them.
//!
//! The `http` feature (on by default) provides the real clients.

pub mod client;
pub mod extraction;
#[cfg(feature = "http")]
pub mod gemini;
pub mod image;
pub mod pipeline;
pub mod prompts;
pub mod translate;
pub mod tts;

pub use client::{GenerateRequest, GenerativeModel, MockModel, ModelError};
pub use extraction::{
    parse_medicine_info, parse_prescription, parse_translations, ExtractionError,
    ExtractionResult,
};
#[cfg(feature = "http")]
pub use gemini::{GeminiClient, GeminiConfig};
pub use image::{ImageError, ImageInput};
pub use pipeline::{AnalysisError, AnalysisResult, Analyzer};
pub use translate::{translate_dosage_fields, translate_text};
#[cfg(feature = "http")]
pub use tts::GoogleTranslateTts;
pub use tts::{audio_data_uri, audio_html, synthesize, MockSpeech, SpeechError, SpeechSynthesizer};
