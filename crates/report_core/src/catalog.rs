use std::collections::HashSet;

use crate::model::{CatalogEntry, FlyCatalog, FlyCategory, ResolvedFly};

/// Collects resolved flies into the three display buckets.
///
/// Flies without an image are dropped. A fly whose name or image is already in
/// its bucket is ignored, and each bucket keeps at most `cap` entries in
/// insertion order.
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    cap: usize,
    catalog: FlyCatalog,
    seen_names: HashSet<(FlyCategory, String)>,
    seen_images: HashSet<(FlyCategory, String)>,
}

impl CatalogBuilder {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            catalog: FlyCatalog::default(),
            seen_names: HashSet::new(),
            seen_images: HashSet::new(),
        }
    }

    /// Returns whether the fly was added.
    pub fn push(&mut self, fly: ResolvedFly) -> bool {
        let Some(image) = fly.image_url else {
            return false;
        };
        let name_key = (fly.category, fly.name.trim().to_lowercase());
        let image_key = (fly.category, image.clone());
        let bucket = match fly.category {
            FlyCategory::Dry => &mut self.catalog.dry_flies,
            FlyCategory::Nymph => &mut self.catalog.nymphs,
            FlyCategory::Streamer => &mut self.catalog.streamers,
        };
        if bucket.len() >= self.cap
            || self.seen_names.contains(&name_key)
            || self.seen_images.contains(&image_key)
        {
            return false;
        }
        self.seen_names.insert(name_key);
        self.seen_images.insert(image_key);
        bucket.push(CatalogEntry {
            name: fly.name,
            image,
        });
        true
    }

    pub fn extend(&mut self, flies: impl IntoIterator<Item = ResolvedFly>) {
        for fly in flies {
            self.push(fly);
        }
    }

    pub fn finish(self) -> FlyCatalog {
        self.catalog
    }
}
