use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Plain-text fields pulled out of the report page. Missing pieces are empty
/// strings, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportSection {
    pub flow_info: String,
    pub report_text: String,
}

impl ReportSection {
    pub fn is_empty(&self) -> bool {
        self.flow_info.is_empty() && self.report_text.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSnapshot {
    pub flow_info: String,
    pub report_text: String,
    pub source_url: String,
    pub captured_at: DateTime<Utc>,
}

impl ReportSnapshot {
    pub fn from_section(
        section: ReportSection,
        source_url: impl Into<String>,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            flow_info: section.flow_info,
            report_text: section.report_text,
            source_url: source_url.into(),
            captured_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlyMention {
    /// Canonical dictionary name, or the literal matched text for free-text hits.
    pub text: String,
    pub is_dictionary_match: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlyCategory {
    Dry,
    Nymph,
    Streamer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFly {
    pub name: String,
    pub image_url: Option<String>,
    pub category: FlyCategory,
}

/// One displayable fly in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlyCatalog {
    pub dry_flies: Vec<CatalogEntry>,
    pub nymphs: Vec<CatalogEntry>,
    pub streamers: Vec<CatalogEntry>,
}

impl FlyCatalog {
    pub fn bucket(&self, category: FlyCategory) -> &[CatalogEntry] {
        match category {
            FlyCategory::Dry => &self.dry_flies,
            FlyCategory::Nymph => &self.nymphs,
            FlyCategory::Streamer => &self.streamers,
        }
    }
}

/// The JSON artifact handed to the delivery and caching layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportManifest {
    pub last_updated: DateTime<Utc>,
    pub source_url: String,
    pub flow_info: String,
    pub report_text: String,
    pub mentioned_flies: Vec<String>,
    pub dry_flies: Vec<CatalogEntry>,
    pub nymphs: Vec<CatalogEntry>,
    pub streamers: Vec<CatalogEntry>,
}

impl ReportManifest {
    pub fn assemble(snapshot: ReportSnapshot, mentions: &[FlyMention], catalog: FlyCatalog) -> Self {
        Self {
            last_updated: snapshot.captured_at,
            source_url: snapshot.source_url,
            flow_info: snapshot.flow_info,
            report_text: snapshot.report_text,
            mentioned_flies: mentions.iter().map(|m| m.text.clone()).collect(),
            dry_flies: catalog.dry_flies,
            nymphs: catalog.nymphs,
            streamers: catalog.streamers,
        }
    }
}
