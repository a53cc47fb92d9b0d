//! Output languages offered to the user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages the analysis can be written and spoken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    Hindi,
    Telugu,
    Tamil,
    Kannada,
    Marathi,
    Bengali,
}

impl Language {
    pub const ALL: [Language; 9] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::Hindi,
        Language::Telugu,
        Language::Tamil,
        Language::Kannada,
        Language::Marathi,
        Language::Bengali,
    ];

    /// Plain English name, used inside prompts.
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::Hindi => "Hindi",
            Language::Telugu => "Telugu",
            Language::Tamil => "Tamil",
            Language::Kannada => "Kannada",
            Language::Marathi => "Marathi",
            Language::Bengali => "Bengali",
        }
    }

    /// Label shown in a language picker, with the native script.
    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::Hindi => "Hindi (हिंदी)",
            Language::Telugu => "Telugu (తెలుగు)",
            Language::Tamil => "Tamil (தமிழ்)",
            Language::Kannada => "Kannada (ಕನ್ನಡ)",
            Language::Marathi => "Marathi (मराठी)",
            Language::Bengali => "Bengali (বাংলা)",
        }
    }

    /// ISO 639-1 code, used for speech synthesis.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::Hindi => "hi",
            Language::Telugu => "te",
            Language::Tamil => "ta",
            Language::Kannada => "kn",
            Language::Marathi => "mr",
            Language::Bengali => "bn",
        }
    }

    pub fn is_english(self) -> bool {
        self == Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown language name or code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    /// Accepts the English name, the picker label or the ISO code, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| {
                lang.name().to_lowercase() == wanted
                    || lang.label().to_lowercase() == wanted
                    || lang.code() == wanted
            })
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}
