use std::sync::OnceLock;

use regex::Regex;

use crate::config::FlyDictionary;
use crate::model::FlyMention;

/// "Sz 20-24 Midge", "Sz. 18–22 RS2", "sz 16 Caddis".
fn size_qualifier() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)Sz\.?\s*\d+(?:[-–]\d+)?\s+\w+").expect("size qualifier pattern")
    })
}

/// Every size-qualified phrase in `text`, in order of appearance.
pub fn size_qualified_mentions(text: &str) -> Vec<String> {
    size_qualifier()
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Substring matcher over the known fly dictionary.
///
/// Matching is deliberately loose: a pattern counts as mentioned when its
/// lowercase form occurs anywhere in the lowercase report, so "Mole Fly" is also
/// reported whenever "Charlie Craven's Mole Fly" is.
#[derive(Debug, Clone)]
pub struct MentionMatcher {
    patterns: Vec<(String, String)>,
}

impl MentionMatcher {
    pub fn new(dictionary: &FlyDictionary) -> Self {
        let patterns = dictionary
            .patterns
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(|name| (name.clone(), name.to_lowercase()))
            .collect();
        Self { patterns }
    }

    /// Dictionary hits in declaration order, then free-text size-qualified hits
    /// that no earlier mention already covers.
    pub fn find_mentions(&self, report_text: &str) -> Vec<FlyMention> {
        let lowered = report_text.to_lowercase();
        let mut mentions: Vec<FlyMention> = self
            .patterns
            .iter()
            .filter(|(_, needle)| lowered.contains(needle.as_str()))
            .map(|(name, _)| FlyMention {
                text: name.clone(),
                is_dictionary_match: true,
            })
            .collect();

        for phrase in size_qualified_mentions(report_text) {
            let phrase_lower = phrase.to_lowercase();
            let covered = mentions
                .iter()
                .any(|known| phrase_lower.contains(&known.text.to_lowercase()));
            if !covered {
                mentions.push(FlyMention {
                    text: phrase,
                    is_dictionary_match: false,
                });
            }
        }
        mentions
    }
}

impl Default for MentionMatcher {
    fn default() -> Self {
        Self::new(&FlyDictionary::default())
    }
}
