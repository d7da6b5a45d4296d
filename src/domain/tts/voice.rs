use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Neutral,
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "neutral" | "notspecified" => Ok(Gender::Neutral),
            other => Err(format!("unknown gender: {}", other)),
        }
    }
}

/// A catalog entry as reported by a provider. Read-only; the catalog is
/// re-fetched rather than mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub id: String,
    pub gender: Gender,
    pub locale: String,
    pub tags: BTreeSet<String>,
}

/// Optional narrowing criteria for `filter_voices`. Every criterion that is
/// present must match; absent criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct VoiceFilter {
    pub gender: Option<Gender>,
    pub locale: Option<String>,
    pub tags: Option<BTreeSet<String>>,
}

impl VoiceFilter {
    fn matches(&self, voice: &Voice) -> bool {
        if let Some(gender) = self.gender {
            if voice.gender != gender {
                return false;
            }
        }
        if let Some(locale) = &self.locale {
            if !voice.locale.eq_ignore_ascii_case(locale) {
                return false;
            }
        }
        if let Some(tags) = &self.tags {
            if !tags.is_subset(&voice.tags) {
                return false;
            }
        }
        true
    }
}

/// Narrow a materialized voice list. Pure and total: no criteria returns the
/// input unchanged, no matches returns an empty list, never an error.
pub fn filter_voices(voices: &[Voice], filter: &VoiceFilter) -> Vec<Voice> {
    voices
        .iter()
        .filter(|voice| filter.matches(voice))
        .cloned()
        .collect()
}
