//! Report core: pure extraction, matching and classification logic.
mod catalog;
mod categorize;
mod config;
mod mentions;
mod model;
mod normalize;
mod section;

pub use catalog::CatalogBuilder;
pub use categorize::Categorizer;
pub use config::{
    CategoryKeywords, FlyDictionary, ImageConfig, PipelineConfig, SectionMarkers, SourceConfig,
};
pub use mentions::{size_qualified_mentions, MentionMatcher};
pub use model::{
    CatalogEntry, FlyCatalog, FlyCategory, FlyMention, ReportManifest, ReportSection,
    ReportSnapshot, ResolvedFly,
};
pub use normalize::{normalize, structured_text};
pub use section::{MarkerSectionExtractor, SectionExtractor};
