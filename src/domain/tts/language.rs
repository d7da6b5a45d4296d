use lingua::{Language, LanguageDetectorBuilder};
use serde::{Deserialize, Serialize};

/// Languages the provider chain can speak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "pt")]
    Portuguese,
}

impl LanguageCode {
    /// ISO 639-1 code
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::English => "en",
            LanguageCode::Spanish => "es",
            LanguageCode::French => "fr",
            LanguageCode::German => "de",
            LanguageCode::Italian => "it",
            LanguageCode::Portuguese => "pt",
        }
    }

    /// Default BCP 47 locale for the language
    pub fn default_locale(&self) -> &'static str {
        match self {
            LanguageCode::English => "en-US",
            LanguageCode::Spanish => "es-ES",
            LanguageCode::French => "fr-FR",
            LanguageCode::German => "de-DE",
            LanguageCode::Italian => "it-IT",
            LanguageCode::Portuguese => "pt-PT",
        }
    }

    /// espeak-ng voice name for the language
    pub fn espeak_voice(&self) -> &'static str {
        match self {
            LanguageCode::English => "en",
            LanguageCode::Spanish => "es",
            LanguageCode::French => "fr",
            LanguageCode::German => "de",
            LanguageCode::Italian => "it",
            LanguageCode::Portuguese => "pt",
        }
    }

    /// Parse the coarse language out of a BCP 47 locale such as "en-US" or
    /// a bare "en". Unknown languages return None.
    pub fn from_locale(locale: &str) -> Option<Self> {
        let primary = locale.split(['-', '_']).next()?.to_lowercase();
        match primary.as_str() {
            "en" => Some(LanguageCode::English),
            "es" => Some(LanguageCode::Spanish),
            "fr" => Some(LanguageCode::French),
            "de" => Some(LanguageCode::German),
            "it" => Some(LanguageCode::Italian),
            "pt" => Some(LanguageCode::Portuguese),
            _ => None,
        }
    }

    fn from_lingua(language: Language) -> Self {
        match language {
            Language::English => LanguageCode::English,
            Language::Spanish => LanguageCode::Spanish,
            Language::French => LanguageCode::French,
            Language::German => LanguageCode::German,
            Language::Italian => LanguageCode::Italian,
            Language::Portuguese => LanguageCode::Portuguese,
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detect the language of the given text. Returns `None` when detection is
/// inconclusive (too little text, or no letters at all) so the caller can
/// apply its own configured default.
pub fn detect_language(text: &str) -> Option<LanguageCode> {
    let languages = vec![
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Italian,
        Language::Portuguese,
    ];

    let detector = LanguageDetectorBuilder::from_languages(&languages).build();

    detector.detect_language_of(text).map(LanguageCode::from_lingua)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_locale_parses_region_variants() {
        assert_eq!(LanguageCode::from_locale("en-US"), Some(LanguageCode::English));
        assert_eq!(LanguageCode::from_locale("en_GB"), Some(LanguageCode::English));
        assert_eq!(LanguageCode::from_locale("pt"), Some(LanguageCode::Portuguese));
        assert_eq!(LanguageCode::from_locale("FR-fr"), Some(LanguageCode::French));
    }

    #[test]
    fn test_from_locale_unknown_language() {
        assert_eq!(LanguageCode::from_locale("ja-JP"), None);
        assert_eq!(LanguageCode::from_locale(""), None);
    }

    #[test]
    fn test_detect_language_english() {
        let text = "This is a test in English. The quick brown fox jumps over the lazy dog.";
        assert_eq!(detect_language(text), Some(LanguageCode::English));
    }

    #[test]
    fn test_detect_language_spanish() {
        let text =
            "Esto es una prueba en español. El rápido zorro marrón salta sobre el perro perezoso.";
        assert_eq!(detect_language(text), Some(LanguageCode::Spanish));
    }

    #[test]
    fn test_detect_language_german() {
        let text =
            "Dies ist ein Test auf Deutsch. Der schnelle braune Fuchs springt über den faulen Hund.";
        assert_eq!(detect_language(text), Some(LanguageCode::German));
    }

    #[test]
    fn test_detect_language_inconclusive_on_letterless_text() {
        assert_eq!(detect_language("1234 5678 9012"), None);
    }
}
