use crate::config::CategoryKeywords;
use crate::model::FlyCategory;

/// Keyword classifier. Dry keywords are checked before streamer keywords, and
/// anything matching neither is a nymph.
#[derive(Debug, Clone)]
pub struct Categorizer {
    dry: Vec<String>,
    streamer: Vec<String>,
}

impl Categorizer {
    pub fn new(keywords: &CategoryKeywords) -> Self {
        Self {
            dry: lowered(&keywords.dry),
            streamer: lowered(&keywords.streamer),
        }
    }

    pub fn categorize(&self, fly_name: &str) -> FlyCategory {
        let name = fly_name.to_lowercase();
        if contains_any(&name, &self.dry) {
            FlyCategory::Dry
        } else if contains_any(&name, &self.streamer) {
            FlyCategory::Streamer
        } else {
            FlyCategory::Nymph
        }
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new(&CategoryKeywords::default())
    }
}

fn lowered(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

fn contains_any(name: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| name.contains(k.as_str()))
}
