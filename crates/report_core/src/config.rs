use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Everything the pipeline needs to know about the upstream site and the fly
/// vocabulary. Passed explicitly into the extractor, matcher, resolver and
/// categorizer so tests can substitute their own tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub sources: SourceConfig,
    pub markers: SectionMarkers,
    pub dictionary: FlyDictionary,
    pub keywords: CategoryKeywords,
    pub images: ImageConfig,
    pub display_cap: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sources: SourceConfig::default(),
            markers: SectionMarkers::default(),
            dictionary: FlyDictionary::default(),
            keywords: CategoryKeywords::default(),
            images: ImageConfig::default(),
            display_cap: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub report_url: String,
    pub dry_flies_collection: String,
    pub nymphs_collection: String,
    pub streamers_collection: String,
    /// Detail pages live at `{product_base_url}/{slug}`.
    pub product_base_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            report_url:
                "https://stpetes.com/pages/poudre-river-fishing-report-fort-collins-fly-fishing"
                    .to_string(),
            dry_flies_collection: "https://stpetes.com/collections/poudre-river-report-dry-flies"
                .to_string(),
            nymphs_collection: "https://stpetes.com/collections/poudre-river-report-nymphs"
                .to_string(),
            streamers_collection: "https://stpetes.com/collections/poudre-river-report-streamers"
                .to_string(),
            product_base_url: "https://stpetes.com/products".to_string(),
        }
    }
}

/// Phrases that bound the human-authored report on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionMarkers {
    pub start: String,
    pub terminators: Vec<String>,
    pub flow: String,
}

impl Default for SectionMarkers {
    fn default() -> Self {
        Self {
            start: "Latest Update:".to_string(),
            terminators: vec![
                "Poudre River Recommended Flies".to_string(),
                "Poudre River Dry Flies".to_string(),
            ],
            flow: "Current Streamflow".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyDictionary {
    /// Known pattern names. Declaration order is the order mentions are reported in.
    pub patterns: Vec<String>,
    /// Fly display name to product slug, for detail-page lookups.
    pub slugs: BTreeMap<String, String>,
}

impl FlyDictionary {
    /// Case-insensitive slug lookup.
    pub fn slug_for(&self, name: &str) -> Option<&str> {
        self.slugs
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, slug)| slug.as_str())
    }
}

impl Default for FlyDictionary {
    fn default() -> Self {
        let patterns = [
            "UV Emerger",
            "Bling Midge",
            "Charlie Craven's Mole Fly",
            "Mole Fly",
            "Shucking Midge",
            "RS2",
            "Foam Wing RS2",
            "Grey Foam Wing RS2",
            "BWO",
            "Blue Wing Olive",
            "Extended Body BWO",
            "Parachute Adams",
            "Griffith's Gnat",
            "Zebra Midge",
            "Top Secret Midge",
            "Mercury Midge",
            "Juju Baetis",
            "Pheasant Tail",
            "Copper John",
            "Two Bit Hooker",
            "Poison Tung",
            "San Juan Worm",
            "Pat's Rubber Legs",
            "Sparkle Dun",
            "Comparadun",
            "Hi-Vis Midge",
            "Eric's Hi-Vis Midge",
            "Medallion Midge",
            "WD-40",
            "Barr Emerger",
            "Stalcup Baetis",
            "Rojo Midge",
            "Black Beauty",
            "Rainbow Warrior",
            "Hopper",
            "Stimulator",
            "Elk Hair Caddis",
            "Woolly Bugger",
            "Slumpbuster",
            "Circus Peanut",
        ];
        let slugs = [
            ("Zebra Midge", "zebra-midge"),
            ("Parachute Adams", "parachute-adams"),
            ("Pheasant Tail", "pheasant-tail-nymph"),
            ("Copper John", "copper-john"),
            ("RS2", "rs2"),
            ("Juju Baetis", "juju-baetis"),
            ("Pat's Rubber Legs", "pats-rubber-legs"),
            ("Elk Hair Caddis", "elk-hair-caddis"),
            ("Woolly Bugger", "woolly-bugger"),
            ("Griffith's Gnat", "griffiths-gnat"),
        ];
        Self {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            slugs: slugs
                .iter()
                .map(|(name, slug)| (name.to_string(), slug.to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryKeywords {
    pub dry: Vec<String>,
    pub streamer: Vec<String>,
}

impl Default for CategoryKeywords {
    fn default() -> Self {
        let dry = [
            "dry",
            "adams",
            "parachute",
            "caddis",
            "stimulator",
            "hopper",
            "comparadun",
            "sparkle dun",
            "gnat",
            "extended body",
        ];
        let streamer = [
            "streamer",
            "bugger",
            "slumpbuster",
            "circus peanut",
            "sculpin",
            "leech",
            "minnow",
            "zonker",
        ];
        Self {
            dry: dry.iter().map(|k| k.to_string()).collect(),
            streamer: streamer.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub target_width: u32,
    /// Substrings identifying the site's product asset paths.
    pub asset_markers: Vec<String>,
    /// Substrings of assets that are never product images.
    pub denylist: Vec<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            target_width: 400,
            asset_markers: vec!["/cdn/shop/".to_string(), "cdn.shopify.com".to_string()],
            denylist: vec![
                "logo".to_string(),
                "gift-card".to_string(),
                "gift_card".to_string(),
                "giftcard".to_string(),
            ],
        }
    }
}
